//! Error types for Spider.
//!
//! Compile errors are raised by dialect processors, driver errors by the
//! engine layer, and response errors by result accessors. Everything is
//! folded into [`Error`] so callers deal with one type.

use std::fmt;

use thiserror::Error;

/// Result type alias for Spider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Spider operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A Bag could not be lowered to dialect text.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// The driver or the engine behind it failed.
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    /// A response was read through the wrong accessor.
    #[error("response error: {0}")]
    Response(#[from] ResponseError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Clause-emission step that was running when compilation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseStep {
    /// Dialect verb and projections.
    Start,
    /// Target resolution for retrieve and delete.
    Target,
    /// Class resolution for create and update.
    Class,
    /// Edge endpoints.
    Endpoints,
    /// Predicate clause.
    Where,
    /// Content payload.
    Content,
    /// Return clause.
    Return,
    /// Ordering clause.
    Order,
    /// Limit clause.
    Limit,
}

impl fmt::Display for ClauseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClauseStep::Start => "start",
            ClauseStep::Target => "target",
            ClauseStep::Class => "class",
            ClauseStep::Endpoints => "endpoints",
            ClauseStep::Where => "where",
            ClauseStep::Content => "content",
            ClauseStep::Return => "return",
            ClauseStep::Order => "order",
            ClauseStep::Limit => "limit",
        };
        f.write_str(name)
    }
}

/// Errors raised while compiling a Bag.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A token that is not usable script text reached the script buffer.
    ///
    /// This is a contract violation in whatever produced the Bag, not a
    /// condition callers are expected to recover from.
    #[error("invalid script token during {step} step: {value}")]
    InvalidScriptToken {
        /// Clause step being emitted.
        step: ClauseStep,
        /// Offending value, rendered for diagnostics.
        value: String,
    },

    /// No class could be resolved for a command that needs one.
    #[error("no target class could be resolved for {command} command")]
    UnresolvedTarget {
        /// Command kind being compiled.
        command: String,
    },

    /// Embedded commands were nested beyond the configured bound.
    #[error("embedded command depth {depth} exceeds limit of {limit}")]
    NestingTooDeep {
        /// Depth that was reached.
        depth: usize,
        /// Configured maximum depth.
        limit: usize,
    },

    /// An edge creation is missing one of its endpoints.
    #[error("edge creation is missing its {endpoint} vertex")]
    MissingEdgeEndpoint {
        /// Which endpoint is missing (`out` or `in`).
        endpoint: &'static str,
    },

    /// A batch was compiled with no commands.
    #[error("cannot compile an empty batch")]
    EmptyBatch,
}

/// Errors raised by drivers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// A command was executed before `open` or after `close`.
    #[error("driver connection is not open")]
    NotOpen,

    /// The engine could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The engine rejected the command.
    #[error("engine rejected command: {0}")]
    Engine(String),

    /// The command was compiled for another dialect.
    #[error("driver speaks {expected}, command is {actual}")]
    DialectMismatch {
        /// Dialect the driver understands.
        expected: String,
        /// Dialect the command was compiled for.
        actual: String,
    },

    /// The engine answered with something that is not a result set.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors raised by response accessors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    /// An accessor was called that does not match the active format.
    #[error("response is formatted as {active}, cannot read it as {requested}")]
    FormatMismatch {
        /// Format the accessor reads.
        requested: &'static str,
        /// Format the response carries.
        active: &'static str,
    },
}
