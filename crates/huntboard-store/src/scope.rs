use serde::{Deserialize, Serialize};
use std::fmt;

/// The storage partition an operation targets: the single guest-local
/// partition, or one authenticated identity's remote partition.
///
/// The identity key is opaque — the store layer never interprets
/// credentials, only whether a signed-in identity is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum Scope {
    Guest,
    Account(String),
}

impl Scope {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Account(_))
    }

    /// The identity key, when signed in.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::Guest => None,
            Self::Account(id) => Some(id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guest => f.write_str("guest"),
            Self::Account(id) => write!(f, "account:{id}"),
        }
    }
}
