use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{QueryError, Result};

static SET_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Forms handed out by [`NameGenerator`](crate::NameGenerator)
static GENERATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^_(s[0-9]+|a[0-9a-f]{16})$").unwrap());

/// Name of an interpreter set (`->.name`).
///
/// Unique within one environment and never reused there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Validate a user supplied name.
    ///
    /// Names of the generated forms `_s<n>` and `_a<hex>` are refused.
    pub fn parse(name: &str) -> Result<Self> {
        if SET_NAME.is_match(name) && !GENERATED.is_match(name) {
            Ok(Identifier(name.to_string()))
        } else {
            Err(QueryError::InvalidName(name.to_string()))
        }
    }

    /// Wrap a name that is known to be well formed
    pub(crate) fn new_unchecked(name: String) -> Self {
        Identifier(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
