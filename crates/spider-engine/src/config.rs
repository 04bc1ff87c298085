//! Connection and compilation settings.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use spider_common::utils::error::Result;
use spider_core::DEFAULT_MAX_DEPTH;

/// Where and as whom a driver connects.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Engine host.
    pub hostname: String,
    /// Engine port.
    pub port: u16,
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
    /// Database to open. Empty means the server default.
    pub database: String,
}

impl Credentials {
    /// Sets the host.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets user name and password.
    #[must_use]
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Sets the database.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// `host:port` address.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: 2424,
            username: "root".to_string(),
            password: "root".to_string(),
            database: String::new(),
        }
    }
}

// Keeps passwords out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// Client configuration.
///
/// # Examples
///
/// ```
/// use spider_engine::{Config, Credentials};
///
/// let config = Config::default()
///     .with_credentials(Credentials::default().with_database("pets"))
///     .with_max_depth(4);
/// assert_eq!(config.credentials.port, 2424);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Credentials handed to the driver on open.
    pub credentials: Credentials,
    /// Bound on embedded command nesting.
    pub max_depth: usize,
}

impl Config {
    /// Sets the credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the nesting bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reads a configuration from a JSON file. Missing keys take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
