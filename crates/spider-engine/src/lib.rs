//! # spider-engine
//!
//! Execution side of Spider: the driver contract, normalized responses,
//! connection settings, and the client that ties a processor to a driver.
//!
//! ## Modules
//!
//! - [`client`] - Compile-and-execute entry point
//! - [`config`] - Credentials and client configuration
//! - [`driver`] - The `Driver` trait and an in-process scripted driver
//! - [`response`] - Rows, records, trees, and format-checked accessors

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod config;
pub mod driver;
pub mod response;

pub use client::Client;
pub use config::{Config, Credentials};
pub use driver::{Driver, Route, ScriptedDriver};
pub use response::{Record, RecordShape, Response, Row, TreeNode};
