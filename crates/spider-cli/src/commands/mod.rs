//! CLI command implementations.

pub mod batch;
pub mod compile;
pub mod tables;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use spider::DialectProcessor;

/// Reads a file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Looks up a processor, listing the available dialects on failure.
pub fn processor(dialect: &str, max_depth: usize) -> Result<Box<dyn DialectProcessor>> {
    spider::dialect::processor_with_max_depth(dialect, max_depth).with_context(|| {
        format!(
            "unknown dialect {dialect} (available: {})",
            spider::dialect::available().join(", ")
        )
    })
}
