//! # spider-adapters
//!
//! Adapters layer for Spider: the dialect processors that lower a
//! [`Bag`](spider_core::Bag) into literal query text.
//!
//! ## Modules
//!
//! - [`dialect`] - Dialect processors and their translation tables

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dialect;
