//! The dialect processor contract.
//!
//! A processor lowers a [`Bag`] to a [`Command`]. Processors hold no
//! per-compilation state: every call builds its own [`ScriptBuffer`] and
//! threads a [`CompileContext`] through any embedded compilations, so one
//! processor can serve concurrent callers.

use spider_common::utils::error::{ClauseStep, CompileError, Result};

use crate::bag::Bag;
use crate::command::Command;

/// Default bound on embedded command nesting.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Compiles Bags into dialect text.
pub trait DialectProcessor: Send + Sync {
    /// Dialect tag stamped on every produced [`Command`].
    fn dialect(&self) -> &str;

    /// Compiles a top-level Bag.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if the Bag cannot be lowered.
    fn compile(&self, bag: &Bag) -> Result<Command>;

    /// Compiles a Bag nested inside another command and returns only its
    /// script text; the caller splices it in place.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::NestingTooDeep`] when `ctx` is already at its
    /// depth bound, or any error the nested compilation raises.
    fn compile_embedded(&self, bag: &Bag, ctx: CompileContext) -> Result<String>;

    /// Compiles several Bags into one transactional script.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::EmptyBatch`] for an empty slice, or the
    /// first error raised by a member.
    fn compile_batch(&self, bags: &[Bag]) -> Result<Command>;
}

/// Per-call compilation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileContext {
    depth: usize,
    max_depth: usize,
}

impl CompileContext {
    /// Context for a top-level compilation.
    #[must_use]
    pub fn root(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    /// Context one level deeper.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::NestingTooDeep`] past the bound.
    pub fn nested(self) -> std::result::Result<Self, CompileError> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(CompileError::NestingTooDeep {
                depth,
                limit: self.max_depth,
            });
        }
        Ok(Self { depth, ..self })
    }

    /// Current nesting depth, zero at the top level.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true inside an embedded compilation.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.depth > 0
    }

    /// Configured depth bound.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for CompileContext {
    fn default() -> Self {
        Self::root(DEFAULT_MAX_DEPTH)
    }
}

/// Accumulates script tokens separated by single spaces.
#[derive(Debug, Default, Clone)]
pub struct ScriptBuffer {
    script: String,
}

impl ScriptBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token, preceded by a space unless the buffer is empty.
    ///
    /// # Errors
    ///
    /// Blank tokens would leave holes in the statement, so they are
    /// rejected with [`CompileError::InvalidScriptToken`].
    pub fn push(&mut self, step: ClauseStep, token: &str) -> std::result::Result<(), CompileError> {
        if token.trim().is_empty() {
            return Err(CompileError::InvalidScriptToken {
                step,
                value: format!("{token:?}"),
            });
        }
        if !self.script.is_empty() {
            self.script.push(' ');
        }
        self.script.push_str(token);
        Ok(())
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    /// Text written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.script
    }

    /// Consumes the buffer.
    #[must_use]
    pub fn into_script(self) -> String {
        self.script
    }
}
