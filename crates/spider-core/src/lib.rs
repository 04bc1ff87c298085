//! # spider-core
//!
//! Core layer for Spider: the dialect-neutral command description (the
//! "Bag"), the compiled [`Command`] a driver executes, and the
//! [`DialectProcessor`] contract every dialect compiler implements.
//!
//! This crate depends only on `spider-common`.
//!
//! ## Modules
//!
//! - [`bag`] - The Bag IR (constraints, fields, command kinds, formats)
//! - [`command`] - Compiled, dialect-tagged script text
//! - [`processor`] - Processor trait, script buffer, and compilation context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bag;
pub mod command;
pub mod processor;

// Re-export commonly used types
pub use bag::{
    Bag, CommandKind, Conjunction, Constraint, FieldRef, Format, MetaField, Operator, OrderBy,
    OrderDirection, Target,
};
pub use command::Command;
pub use processor::{CompileContext, DEFAULT_MAX_DEPTH, DialectProcessor, ScriptBuffer};
