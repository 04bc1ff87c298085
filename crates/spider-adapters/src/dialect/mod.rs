//! Dialect processors.
//!
//! Each processor turns a Bag into a [`Command`](spider_core::Command) for
//! one query language. Enable what you need via feature flags.
//!
//! | Module | Language | Tag | Feature |
//! | ------ | -------- | --- | ------- |
//! | [`orientsql`] | OrientDB SQL | `orientSQL` | `orientsql` (default) |

#[cfg(feature = "orientsql")]
pub mod orientsql;

use spider_core::{DEFAULT_MAX_DEPTH, DialectProcessor};

/// Returns a processor for the given dialect tag, if one is compiled in.
#[must_use]
pub fn processor_for(dialect: &str) -> Option<Box<dyn DialectProcessor>> {
    processor_with_max_depth(dialect, DEFAULT_MAX_DEPTH)
}

/// Like [`processor_for`], with an explicit bound on embedded command
/// nesting.
#[must_use]
#[cfg_attr(not(feature = "orientsql"), allow(unused_variables))]
pub fn processor_with_max_depth(
    dialect: &str,
    max_depth: usize,
) -> Option<Box<dyn DialectProcessor>> {
    match dialect {
        #[cfg(feature = "orientsql")]
        orientsql::DIALECT => Some(Box::new(
            orientsql::OrientSqlProcessor::new().with_max_depth(max_depth),
        )),
        _ => None,
    }
}

/// Dialect tags compiled into this build.
#[must_use]
pub fn available() -> &'static [&'static str] {
    &[
        #[cfg(feature = "orientsql")]
        orientsql::DIALECT,
    ]
}
