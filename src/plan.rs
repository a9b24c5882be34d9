//! Plan-time value modifiers.
//!
//! These adjust a proposed attribute value before it is committed to a
//! plan: force full replacement instead of in-place update, fall back to
//! prior state for unresolved computed fields, or substitute a constant
//! default.

use crate::attr::Attr;

/// True when changing `planned` away from the prior value requires the
/// entity to be destroyed and recreated rather than updated in place.
///
/// Unknown and null proposals do not trigger replacement; only a concrete
/// value that differs from the prior one does.
pub fn requires_replace<T: PartialEq>(prior: &T, planned: &Attr<T>) -> bool {
    match planned {
        Attr::Value(v) => v != prior,
        Attr::Null | Attr::Unknown => false,
    }
}

/// Substitute the prior state's value when the proposal is unknown.
///
/// Prevents spurious diffs on computed, stable fields such as ids.
pub fn use_state_for_unknown<T: Clone>(prior: &T, planned: Attr<T>) -> Attr<T> {
    if planned.is_unknown() {
        Attr::Value(prior.clone())
    } else {
        planned
    }
}

/// Substitute a constant default when the proposal is null or unknown and
/// no prior state exists.
pub fn string_default(planned: Attr<String>, default: &str) -> Attr<String> {
    if planned.is_value() {
        planned
    } else {
        Attr::str(default)
    }
}
