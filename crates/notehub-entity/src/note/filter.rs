//! Tag filter combination mode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a multi-tag filter combines its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterMode {
    /// Notes carrying every requested tag (intersection).
    #[default]
    And,
    /// Notes carrying at least one requested tag (union).
    Or,
}

impl FilterMode {
    /// Parse a user-supplied mode string.
    ///
    /// Only a case-insensitive `"OR"` selects [`FilterMode::Or`]. Anything
    /// else, including unknown values, selects [`FilterMode::And`].
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("or") {
            Self::Or
        } else {
            Self::And
        }
    }

    /// Resolve an optional mode string, defaulting to AND.
    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map(Self::parse_lenient).unwrap_or_default()
    }

    /// Return the mode as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl From<&str> for FilterMode {
    fn from(raw: &str) -> Self {
        Self::parse_lenient(raw)
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
