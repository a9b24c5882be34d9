//! Three-state attribute values.
//!
//! Declarative configuration distinguishes between an attribute that is
//! concretely set, one that is explicitly null, and one whose value is not
//! yet known at plan time (a placeholder for a computed value). Validators
//! and plan modifiers treat the three states differently, so the
//! distinction is carried in the type rather than in sentinel values.

/// An attribute value from declared configuration or prior state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Attr<T> {
    /// A concrete value.
    Value(T),

    /// Explicitly unset.
    #[default]
    Null,

    /// Not yet resolved at plan time.
    Unknown,
}

impl<T> Attr<T> {
    /// Borrow the concrete value, if there is one.
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Null | Self::Unknown => None,
        }
    }

    /// Consume the attribute, yielding the concrete value if present.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Null | Self::Unknown => None,
        }
    }

    /// True when the value has not been resolved yet.
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// True when the attribute is explicitly unset.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True when a concrete value is present.
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Map the concrete value, preserving null/unknown.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Attr<U> {
        match self {
            Self::Value(v) => Attr::Value(f(v)),
            Self::Null => Attr::Null,
            Self::Unknown => Attr::Unknown,
        }
    }
}

impl<T: Clone> Attr<T> {
    /// The concrete value, or `fallback` when null or unknown.
    pub fn value_or(&self, fallback: T) -> T {
        self.value().cloned().unwrap_or(fallback)
    }
}

impl<T> From<Option<T>> for Attr<T> {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Self::Value)
    }
}

impl Attr<String> {
    /// Convenience constructor for string attributes.
    pub fn str(s: &str) -> Self {
        Self::Value(s.to_string())
    }
}
