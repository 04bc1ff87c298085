//! In-process driver with canned replies.

use std::collections::VecDeque;

use parking_lot::Mutex;
use spider_common::utils::error::{DriverError, Result};
use spider_core::Command;
use tracing::{debug, info};

use super::Driver;
use crate::config::Credentials;
use crate::response::{RecordShape, Response, Row};

#[derive(Debug)]
enum Reply {
    Rows(Vec<Row>),
    Fail(DriverError),
}

/// Which entry point a recorded command came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `execute_read_command`.
    Read,
    /// `execute_write_command`.
    Write,
}

/// A driver that records every command it is given and answers from a
/// queue of scripted replies.
///
/// Replies are consumed in order regardless of route. With the queue empty
/// every command gets an empty response.
///
/// # Examples
///
/// ```
/// use spider_engine::{Credentials, Driver, ScriptedDriver};
/// use spider_core::Command;
///
/// let mut driver = ScriptedDriver::orientsql();
/// driver.open(&Credentials::default())?;
/// let response = driver.execute_read_command(&Command::new("SELECT FROM Cat", "orientSQL"))?;
/// assert!(response.is_empty());
/// assert_eq!(driver.executed().len(), 1);
/// # Ok::<(), spider_common::Error>(())
/// ```
#[derive(Debug)]
pub struct ScriptedDriver {
    dialect: String,
    shape: RecordShape,
    credentials: Option<Credentials>,
    replies: Mutex<VecDeque<Reply>>,
    log: Mutex<Vec<(Route, Command)>>,
}

impl ScriptedDriver {
    /// Creates a closed driver for `dialect`.
    pub fn new(dialect: impl Into<String>, shape: RecordShape) -> Self {
        Self {
            dialect: dialect.into(),
            shape,
            credentials: None,
            replies: Mutex::new(VecDeque::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// A driver speaking `orientSQL` with OrientDB record keys.
    #[must_use]
    pub fn orientsql() -> Self {
        Self::new("orientSQL", RecordShape::orientsql())
    }

    /// Queues rows for the next command.
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.replies.lock().push_back(Reply::Rows(rows));
    }

    /// Queues a failure for the next command.
    pub fn push_error(&self, error: DriverError) {
        self.replies.lock().push_back(Reply::Fail(error));
    }

    /// Number of replies not yet consumed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.replies.lock().len()
    }

    /// Commands executed so far, oldest first.
    #[must_use]
    pub fn executed(&self) -> Vec<Command> {
        self.log.lock().iter().map(|(_, cmd)| cmd.clone()).collect()
    }

    /// Commands executed so far with the route each one took.
    #[must_use]
    pub fn executed_routes(&self) -> Vec<(Route, Command)> {
        self.log.lock().clone()
    }

    /// Credentials of the current connection.
    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    fn execute(&self, route: Route, command: &Command) -> Result<Response> {
        if !self.is_open() {
            return Err(DriverError::NotOpen.into());
        }
        debug!(?route, script = command.script(), "executing scripted command");
        self.log.lock().push((route, command.clone()));

        match self.replies.lock().pop_front() {
            Some(Reply::Rows(rows)) => Ok(Response::new(rows, self.shape.clone())),
            Some(Reply::Fail(err)) => Err(err.into()),
            None => Ok(Response::empty(self.shape.clone())),
        }
    }
}

impl Driver for ScriptedDriver {
    fn dialect(&self) -> &str {
        &self.dialect
    }

    fn open(&mut self, credentials: &Credentials) -> Result<()> {
        info!(address = %credentials.address(), database = %credentials.database, "opening scripted driver");
        self.credentials = Some(credentials.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.credentials.take().is_some() {
            info!("closed scripted driver");
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.credentials.is_some()
    }

    fn execute_read_command(&self, command: &Command) -> Result<Response> {
        self.execute(Route::Read, command)
    }

    fn execute_write_command(&self, command: &Command) -> Result<Response> {
        self.execute(Route::Write, command)
    }
}
