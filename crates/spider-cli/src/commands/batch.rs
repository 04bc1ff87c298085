//! Batch compilation command.

use std::path::Path;

use anyhow::{Context, Result};
use spider::{Bag, Command, DEFAULT_MAX_DEPTH};
use tracing::info;

use crate::OutputFormat;
use crate::output::{self, Format};

/// Parses a JSON array of Bags and compiles them as one batch.
pub fn compile_json(json: &str, dialect: &str, max_depth: usize) -> Result<Command> {
    let bags: Vec<Bag> = serde_json::from_str(json).context("input is not an array of bags")?;
    let processor = super::processor(dialect, max_depth)?;
    Ok(processor.compile_batch(&bags)?)
}

/// Run the batch command.
pub fn run(
    input: &Path,
    dialect: &str,
    max_depth: Option<usize>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let json = super::read_input(input)?;
    let command = compile_json(&json, dialect, max_depth.unwrap_or(DEFAULT_MAX_DEPTH))?;
    info!(
        dialect = command.dialect(),
        lines = command.script().lines().count(),
        "compiled batch {}",
        input.display()
    );

    let fmt: Format = format.into();
    output::print_command(&command, fmt, quiet)
}
