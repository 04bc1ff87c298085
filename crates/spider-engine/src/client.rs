//! Compiles Bags and runs them through a driver.

use spider_adapters::dialect;
use spider_common::utils::error::{DriverError, Error, Result};
use spider_core::{Bag, Command, DialectProcessor, Format};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::driver::Driver;
use crate::response::Response;

/// Statement verbs that only read.
const READ_VERBS: [&str; 3] = ["SELECT", "TRAVERSE", "MATCH"];

/// Owns a driver and the processor for its dialect.
///
/// # Examples
///
/// ```
/// use spider_core::{Bag, CommandKind, Constraint, MetaField};
/// use spider_engine::{Client, Config, ScriptedDriver};
///
/// let mut client = Client::with_config(ScriptedDriver::orientsql(), Config::default())?;
/// client.open()?;
///
/// let bag = Bag::new(CommandKind::Retrieve)
///     .with_constraint(Constraint::equals(MetaField::ElementLabel, "Cat"));
/// let response = client.execute(&bag)?;
/// assert!(response.get_set()?.is_empty());
/// assert_eq!(client.driver().executed()[0].script(), "SELECT FROM Cat");
/// # Ok::<(), spider_common::Error>(())
/// ```
pub struct Client<D: Driver> {
    driver: D,
    processor: Box<dyn DialectProcessor>,
    config: Config,
}

impl<D: Driver> Client<D> {
    /// Creates a client from explicit parts.
    pub fn new(driver: D, processor: Box<dyn DialectProcessor>, config: Config) -> Self {
        Self {
            driver,
            processor,
            config,
        }
    }

    /// Creates a client using the built-in processor for the driver's
    /// dialect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if no processor for that dialect is
    /// compiled in.
    pub fn with_config(driver: D, config: Config) -> Result<Self> {
        let processor = dialect::processor_with_max_depth(driver.dialect(), config.max_depth)
            .ok_or_else(|| {
                Error::Internal(format!(
                    "no processor for dialect {} (available: {})",
                    driver.dialect(),
                    dialect::available().join(", ")
                ))
            })?;
        Ok(Self::new(driver, processor, config))
    }

    /// Opens the driver with the configured credentials.
    ///
    /// # Errors
    ///
    /// Propagates the driver's connection error.
    pub fn open(&mut self) -> Result<()> {
        info!(dialect = self.driver.dialect(), "opening client");
        self.driver.open(&self.config.credentials)
    }

    /// Closes the driver.
    ///
    /// # Errors
    ///
    /// Propagates the driver's error.
    pub fn close(&mut self) -> Result<()> {
        info!(dialect = self.driver.dialect(), "closing client");
        self.driver.close()
    }

    /// Returns true while the driver is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.driver.is_open()
    }

    /// Compiles a Bag without executing it.
    ///
    /// # Errors
    ///
    /// Returns the processor's compile error.
    pub fn compile(&self, bag: &Bag) -> Result<Command> {
        self.processor.compile(bag)
    }

    /// Compiles Bags into one transactional script without executing it.
    ///
    /// # Errors
    ///
    /// Returns the processor's compile error.
    pub fn compile_batch(&self, bags: &[Bag]) -> Result<Command> {
        self.processor.compile_batch(bags)
    }

    /// Compiles and executes a Bag, reading the response in the Bag's
    /// format.
    ///
    /// # Errors
    ///
    /// Returns compile, dialect, or driver errors.
    pub fn execute(&self, bag: &Bag) -> Result<Response> {
        let command = self.compile(bag)?;
        let response = self.run(&command, bag.command.is_read())?;
        Ok(response.with_format(bag.format))
    }

    /// Compiles Bags as one batch and executes it on the write path.
    ///
    /// # Errors
    ///
    /// Returns compile, dialect, or driver errors.
    pub fn execute_batch(&self, bags: &[Bag]) -> Result<Response> {
        let command = self.compile_batch(bags)?;
        Ok(self.run(&command, false)?.with_format(Format::Set))
    }

    /// Executes a pre-built command, routed by its leading verb.
    ///
    /// # Errors
    ///
    /// Returns dialect or driver errors.
    pub fn dispatch(&self, command: &Command) -> Result<Response> {
        self.run(command, is_read_script(command.script()))
    }

    fn run(&self, command: &Command, read: bool) -> Result<Response> {
        if command.dialect() != self.driver.dialect() {
            warn!(
                expected = self.driver.dialect(),
                actual = command.dialect(),
                "dialect mismatch"
            );
            return Err(DriverError::DialectMismatch {
                expected: self.driver.dialect().to_string(),
                actual: command.dialect().to_string(),
            }
            .into());
        }

        debug!(read, script = command.script(), "dispatching command");
        if read {
            self.driver.execute_read_command(command)
        } else {
            self.driver.execute_write_command(command)
        }
    }

    /// The driver.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The driver, mutably.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The processor.
    #[must_use]
    pub fn processor(&self) -> &dyn DialectProcessor {
        self.processor.as_ref()
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the driver, closing nothing.
    #[must_use]
    pub fn into_driver(self) -> D {
        self.driver
    }
}

/// Returns true if the script starts with a read-only verb.
#[must_use]
pub fn is_read_script(script: &str) -> bool {
    script
        .split_whitespace()
        .next()
        .is_some_and(|verb| READ_VERBS.iter().any(|r| r.eq_ignore_ascii_case(verb)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Route, ScriptedDriver};
    use crate::response::Row;
    use spider_common::CompileError;
    use spider_common::types::Value;
    use spider_core::{CommandKind, Constraint, MetaField};

    fn client() -> Client<ScriptedDriver> {
        let mut client = Client::with_config(ScriptedDriver::orientsql(), Config::default()).unwrap();
        client.open().unwrap();
        client
    }

    fn routes(client: &Client<ScriptedDriver>) -> Vec<Route> {
        client
            .driver()
            .executed_routes()
            .into_iter()
            .map(|(route, _)| route)
            .collect()
    }

    #[test]
    fn test_read_verbs() {
        assert!(is_read_script("SELECT FROM Cat"));
        assert!(is_read_script("  traverse out() FROM #12:0"));
        assert!(!is_read_script("INSERT INTO Owner"));
        assert!(!is_read_script("BEGIN\nLET t0 = SELECT FROM Cat"));
        assert!(!is_read_script(""));
    }

    #[test]
    fn test_execute_routes_by_command() {
        let client = client();
        let retrieve = Bag::new(CommandKind::Retrieve)
            .with_constraint(Constraint::equals(MetaField::ElementLabel, "Cat"));
        let create = Bag::new(CommandKind::Create)
            .with_data(MetaField::ElementLabel, "Owner")
            .with_data("first_name", "nicole");

        client.execute(&retrieve).unwrap();
        client.execute(&create).unwrap();
        assert_eq!(routes(&client), vec![Route::Read, Route::Write]);

        let scripts: Vec<String> = client
            .driver()
            .executed()
            .iter()
            .map(|c| c.script().to_string())
            .collect();
        assert_eq!(
            scripts,
            vec![
                "SELECT FROM Cat".to_string(),
                r#"INSERT INTO Owner CONTENT {"first_name":"nicole"}"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_execute_applies_bag_format() {
        let client = client();
        let mut row = Row::new();
        row.insert("count".to_string(), Value::from(2));
        client.driver().push_rows(vec![row]);

        let bag = Bag::new(CommandKind::Retrieve)
            .with_projection("count")
            .with_format(Format::Scalar);
        let response = client.execute(&bag).unwrap();
        assert_eq!(response.format(), Format::Scalar);
        assert_eq!(response.get_scalar().unwrap(), Value::from(2));
    }

    #[test]
    fn test_dispatch_and_mismatch() {
        let client = client();
        client
            .dispatch(&Command::new("DELETE VERTEX #12:0", "orientSQL"))
            .unwrap();
        client
            .dispatch(&Command::new("SELECT FROM Cat", "orientSQL"))
            .unwrap();
        assert_eq!(routes(&client), vec![Route::Write, Route::Read]);

        let err = client
            .dispatch(&Command::new("MATCH (n) RETURN n", "cypher"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Driver(DriverError::DialectMismatch { ref expected, ref actual })
                if expected == "orientSQL" && actual == "cypher"
        ));
        assert_eq!(client.driver().executed().len(), 2);
    }

    #[test]
    fn test_batch_goes_through_write_path() {
        let client = client();
        let bags = vec![
            Bag::new(CommandKind::Create).with_data(MetaField::ElementLabel, "Owner"),
            Bag::new(CommandKind::Retrieve)
                .with_constraint(Constraint::equals(MetaField::ElementId, "#12:0")),
        ];
        client.execute_batch(&bags).unwrap();
        assert_eq!(routes(&client), vec![Route::Write]);
        assert!(client.driver().executed()[0].script().starts_with("BEGIN\n"));

        let err = client.execute_batch(&[]).unwrap_err();
        assert!(matches!(err, Error::Compile(CompileError::EmptyBatch)));
    }

    #[test]
    fn test_compile_errors_skip_the_driver() {
        let client = client();
        let bag = Bag::new(CommandKind::Create).with_data("name", "oreo");
        assert!(client.execute(&bag).is_err());
        assert!(client.driver().executed().is_empty());
    }

    #[test]
    fn test_configured_depth_reaches_processor() {
        let config = Config::default().with_max_depth(0);
        let client = Client::with_config(ScriptedDriver::orientsql(), config).unwrap();
        let bag = Bag::new(CommandKind::Retrieve).with_target(Bag::new(CommandKind::Retrieve));
        let err = client.compile(&bag).unwrap_err();
        assert!(matches!(
            err,
            Error::Compile(CompileError::NestingTooDeep { depth: 1, limit: 0 })
        ));
    }

    #[test]
    fn test_unknown_dialect() {
        let driver = ScriptedDriver::new("cobol", crate::response::RecordShape::default());
        assert!(matches!(
            Client::with_config(driver, Config::default()),
            Err(Error::Internal(_))
        ));
    }

    #[test]
    fn test_open_uses_configured_credentials() {
        let config = Config::default()
            .with_credentials(crate::config::Credentials::default().with_database("pets"));
        let mut client = Client::with_config(ScriptedDriver::orientsql(), config).unwrap();
        client.open().unwrap();
        assert_eq!(
            client.driver().credentials().map(|c| c.database.as_str()),
            Some("pets")
        );
        client.close().unwrap();
        assert!(!client.is_open());
    }
}
