//! # Spider
//!
//! A backend-agnostic way to describe graph operations once and run them
//! against different engines.
//!
//! You describe an operation as a [`Bag`]: what kind of command it is, which
//! elements it targets, what data it carries. A [`DialectProcessor`] compiles
//! the Bag into a [`Command`] in one engine's query language, and a
//! [`Driver`] executes it and hands back a [`Response`]. The [`Client`] does
//! all three in one call.
//!
//! ## Dialects
//!
//! | Feature | Dialect | Notes |
//! | ------- | ------- | ----- |
//! | `orientsql` | OrientDB SQL | Enabled by default |
//!
//! ## Quick Start
//!
//! ```rust
//! use spider::{Bag, CommandKind, Constraint, DialectProcessor, MetaField, Operator};
//! use spider::dialect::orientsql::OrientSqlProcessor;
//!
//! let bag = Bag::new(CommandKind::Retrieve)
//!     .with_constraint(Constraint::equals(MetaField::ElementLabel, "Cat"))
//!     .with_constraint(Constraint::new("age", Operator::Gt, 2))
//!     .with_limit(5);
//!
//! let command = OrientSqlProcessor::new().compile(&bag)?;
//! assert_eq!(command.script(), "SELECT FROM Cat WHERE age > 2 LIMIT 5");
//! # Ok::<(), spider::Error>(())
//! ```

// The Bag IR and the processor contract
pub use spider_core::{
    Bag, Command, CommandKind, CompileContext, Conjunction, Constraint, DEFAULT_MAX_DEPTH,
    DialectProcessor, FieldRef, Format, MetaField, Operator, OrderBy, OrderDirection, Target,
};

// Execution
pub use spider_engine::{
    Client, Config, Credentials, Driver, Record, RecordShape, Response, Route, Row,
    ScriptedDriver, TreeNode,
};

// Values and errors
pub use spider_common::types::Value;
pub use spider_common::utils::error::{
    ClauseStep, CompileError, DriverError, Error, ResponseError, Result,
};

/// Dialect processors, one module per enabled dialect.
pub use spider_adapters::dialect;
