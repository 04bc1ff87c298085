//! The driver contract.
//!
//! A driver owns the connection to one engine and executes [`Command`]s
//! written in that engine's dialect. Reads and writes have separate entry
//! points so a driver can route them differently (replicas, transactions).

mod scripted;

pub use scripted::{Route, ScriptedDriver};

use spider_common::utils::error::Result;
use spider_core::Command;

use crate::config::Credentials;
use crate::response::Response;

/// Executes compiled commands against a graph engine.
pub trait Driver: Send + Sync {
    /// Dialect tag of the commands this driver accepts.
    fn dialect(&self) -> &str;

    /// Connects to the engine.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Connection`](spider_common::DriverError::Connection)
    /// if the engine cannot be reached.
    fn open(&mut self, credentials: &Credentials) -> Result<()>;

    /// Disconnects. Closing a closed driver is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine reports a failure on disconnect.
    fn close(&mut self) -> Result<()>;

    /// Returns true between a successful `open` and the next `close`.
    fn is_open(&self) -> bool;

    /// Executes a command that does not modify the graph.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::NotOpen`](spider_common::DriverError::NotOpen)
    /// when closed, or the engine's error. An engine answering with no rows
    /// is an empty [`Response`], not an error.
    fn execute_read_command(&self, command: &Command) -> Result<Response>;

    /// Executes a command that modifies the graph.
    ///
    /// # Errors
    ///
    /// Same as [`execute_read_command`](Driver::execute_read_command).
    fn execute_write_command(&self, command: &Command) -> Result<Response>;
}
