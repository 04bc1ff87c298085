//! Core type definitions for Spider.
//!
//! - Property values ([`Value`]) carried by constraints, content payloads
//!   and driver results.

mod value;

pub use value::Value;
