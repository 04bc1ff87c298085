//! Single Bag compilation command.

use std::path::Path;

use anyhow::{Context, Result};
use spider::{Bag, Command, DEFAULT_MAX_DEPTH};
use tracing::info;

use crate::OutputFormat;
use crate::output::{self, Format};

/// Parses a Bag and compiles it.
pub fn compile_json(json: &str, dialect: &str, max_depth: usize) -> Result<Command> {
    let bag: Bag = serde_json::from_str(json).context("input is not a valid bag")?;
    let processor = super::processor(dialect, max_depth)?;
    Ok(processor.compile(&bag)?)
}

/// Run the compile command.
pub fn run(
    input: &Path,
    dialect: &str,
    max_depth: Option<usize>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let json = super::read_input(input)?;
    let command = compile_json(&json, dialect, max_depth.unwrap_or(DEFAULT_MAX_DEPTH))?;
    info!(dialect = command.dialect(), "compiled {}", input.display());

    let fmt: Format = format.into();
    output::print_command(&command, fmt, quiet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_retrieve() {
        let json = r#"{
            "command": "retrieve",
            "where": [
                {"field": "spider:label", "operator": "eq", "value": "Cat"},
                {"field": "age", "operator": "gt", "value": 2}
            ],
            "limit": 5
        }"#;
        let command = compile_json(json, "orientSQL", DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(command.script(), "SELECT FROM Cat WHERE age > 2 LIMIT 5");
    }

    #[test]
    fn test_compile_create_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("owner.json");
        std::fs::write(
            &path,
            r#"{"command": "create", "data": {"spider:label": "Owner", "first_name": "nicole"}}"#,
        )
        .unwrap();

        let json = crate::commands::read_input(&path).unwrap();
        let command = compile_json(&json, "orientSQL", DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(
            command.script(),
            r#"INSERT INTO Owner CONTENT {"first_name":"nicole"}"#
        );
    }

    #[test]
    fn test_compile_rejects_bad_input() {
        assert!(compile_json("[]", "orientSQL", DEFAULT_MAX_DEPTH).is_err());
        assert!(compile_json(r#"{"command": "retrieve"}"#, "cobol", DEFAULT_MAX_DEPTH).is_err());
    }

    #[test]
    fn test_compile_rejects_arrays_and_unknown_keys() {
        let batch = r#"[{"command": "delete", "target": "Cat"}]"#;
        let err = compile_json(batch, "orientSQL", DEFAULT_MAX_DEPTH).unwrap_err();
        assert!(format!("{err:#}").contains("bag object"));

        let typo = r#"{"comand": "delete"}"#;
        assert!(compile_json(typo, "orientSQL", DEFAULT_MAX_DEPTH).is_err());
    }
}
