//! Compiled commands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal query text tagged with the dialect it is written in.
///
/// Produced once per compile call and never modified afterwards; a driver
/// sends [`script`](Command::script) verbatim to the engine for
/// [`dialect`](Command::dialect).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    script: String,
    dialect: String,
}

impl Command {
    /// Creates a command.
    pub fn new(script: impl Into<String>, dialect: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            dialect: dialect.into(),
        }
    }

    /// The query text.
    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }

    /// The dialect tag.
    #[must_use]
    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    /// Splits the command into `(script, dialect)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.script, self.dialect)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.script)
    }
}
