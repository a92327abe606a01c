//! Query-string value types.

/// Three-valued membership flag used by `is_favorited` and `is_in_shopping_cart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriState {
    /// Keep only rows that are members.
    Include,
    /// Drop rows that are members.
    Exclude,
    /// No filtering on this dimension.
    #[default]
    Any,
}

impl TriState {
    /// Parse a raw query value. `"1"`/`"true"` include, `"0"`/`"false"` exclude,
    /// anything else (including absence) means no filtering.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("1" | "true") => Self::Include,
            Some("0" | "false") => Self::Exclude,
            _ => Self::Any,
        }
    }

    /// `Some(true)` for include, `Some(false)` for exclude, `None` for any.
    pub fn as_membership(self) -> Option<bool> {
        match self {
            Self::Include => Some(true),
            Self::Exclude => Some(false),
            Self::Any => None,
        }
    }
}
