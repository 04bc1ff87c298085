//! Output formatting for CLI commands.

use comfy_table::{Cell, Color, ContentArrangement, Table};
use spider::Command;

/// Output format selection.
#[derive(Clone, Copy)]
pub enum Format {
    Table,
    Json,
}

impl From<crate::OutputFormat> for Format {
    fn from(f: crate::OutputFormat) -> Self {
        match f {
            crate::OutputFormat::Table => Format::Table,
            crate::OutputFormat::Json => Format::Json,
        }
    }
}

/// Create a styled table with consistent formatting.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table
}

/// Add a header row to a table.
pub fn add_header(table: &mut Table, headers: &[&str]) {
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
}

/// Print a key-value table, or a JSON object with the same entries.
pub fn print_key_value_table(
    items: &[(&str, String)],
    format: Format,
    quiet: bool,
) -> anyhow::Result<()> {
    if quiet {
        return Ok(());
    }

    match format {
        Format::Json => {
            let map: serde_json::Map<String, serde_json::Value> = items
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.as_str().into()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        Format::Table => {
            let mut table = create_table();
            add_header(&mut table, &["Property", "Value"]);
            for (key, value) in items {
                table.add_row(vec![Cell::new(key).fg(Color::Green), Cell::new(value)]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

/// Print a compiled command. Table output shows the script on its own so
/// it can be copied as is.
pub fn print_command(command: &Command, format: Format, quiet: bool) -> anyhow::Result<()> {
    if quiet {
        return Ok(());
    }

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(command)?),
        Format::Table => {
            let mut table = create_table();
            add_header(&mut table, &["Dialect"]);
            table.add_row(vec![Cell::new(command.dialect()).fg(Color::Green)]);
            println!("{table}");
            println!("{}", command.script());
        }
    }
    Ok(())
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("✗ {msg}");
}
