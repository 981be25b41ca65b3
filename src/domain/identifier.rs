//! SQL identifiers derived from configuration.
//!
//! Table and column names cannot be bound as statement parameters, so every
//! name that reaches a schema or insert statement goes through [`Identifier`]
//! first: ASCII letters, digits and underscore only, at most
//! [`MAX_IDENTIFIER_LEN`] characters, and never in SQLite's reserved
//! `sqlite_` namespace.

use crate::domain::error::IngestError;
use std::fmt;

pub const MAX_IDENTIFIER_LEN: usize = 64;
const RESERVED_PREFIX: &str = "sqlite_";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: &str) -> Result<Self, IngestError> {
        let reject = |reason: &str| IngestError::InvalidIdentifier {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(reject("empty"));
        }
        if name.len() > MAX_IDENTIFIER_LEN {
            return Err(reject("too long"));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(reject("only ASCII letters, digits and '_' are allowed"));
        }
        if name.len() >= RESERVED_PREFIX.len()
            && name[..RESERVED_PREFIX.len()].eq_ignore_ascii_case(RESERVED_PREFIX)
        {
            return Err(reject("the sqlite_ prefix is reserved"));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for interpolation into SQL.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
