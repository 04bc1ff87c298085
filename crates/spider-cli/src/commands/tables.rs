//! Translation table and dialect listing commands.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color};
use serde::Serialize;
use spider::dialect::{self, orientsql};
use spider::{CommandKind, Conjunction, MetaField, Operator, OrderDirection};

use crate::OutputFormat;
use crate::output::{self, Format};

/// One translated token.
#[derive(Serialize)]
struct TableEntry {
    table: &'static str,
    token: String,
    translation: String,
}

impl TableEntry {
    fn new(table: &'static str, token: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            table,
            token: token.into(),
            translation: translation.into(),
        }
    }
}

fn orientsql_entries() -> Vec<TableEntry> {
    let mut entries = Vec::new();
    for op in Operator::ALL {
        let token = serde_json::to_value(op)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("{op:?}"));
        entries.push(TableEntry::new("operator", token, orientsql::operator(op)));
    }
    for conj in [Conjunction::And, Conjunction::Or] {
        entries.push(TableEntry::new(
            "conjunction",
            format!("{conj:?}").to_lowercase(),
            orientsql::conjunction(conj),
        ));
    }
    for dir in [OrderDirection::Asc, OrderDirection::Desc] {
        entries.push(TableEntry::new(
            "order",
            format!("{dir:?}").to_lowercase(),
            orientsql::order(dir),
        ));
    }
    for meta in MetaField::ALL {
        entries.push(TableEntry::new(
            "field",
            meta.reserved_name(),
            orientsql::native_field(meta).unwrap_or("-"),
        ));
    }
    for command in [
        CommandKind::Retrieve,
        CommandKind::Create,
        CommandKind::Update,
        CommandKind::Delete,
    ] {
        let vertex = orientsql::verb(command, orientsql::ElementKind::Vertex);
        let edge = orientsql::verb(command, orientsql::ElementKind::Edge);
        let translation = if vertex == edge {
            vertex.to_string()
        } else {
            format!("{vertex} | {edge}")
        };
        entries.push(TableEntry::new("command", command.as_str(), translation));
    }
    entries
}

/// Run the tables command.
pub fn run(dialect: &str, format: OutputFormat, quiet: bool) -> Result<()> {
    if dialect != orientsql::DIALECT {
        bail!(
            "no tables for dialect {dialect} (available: {})",
            dialect::available().join(", ")
        );
    }
    let entries = orientsql_entries();

    let fmt: Format = format.into();
    match fmt {
        Format::Json => {
            if !quiet {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        }
        Format::Table => {
            if !quiet {
                let mut table = output::create_table();
                output::add_header(&mut table, &["Table", "Token", dialect]);
                for entry in &entries {
                    table.add_row(vec![
                        Cell::new(entry.table).fg(Color::Green),
                        Cell::new(&entry.token),
                        Cell::new(&entry.translation),
                    ]);
                }
                println!("{table}");
            }
        }
    }
    Ok(())
}

/// Run the dialects command.
pub fn list_dialects(format: OutputFormat, quiet: bool) -> Result<()> {
    let items: Vec<(&str, String)> = dialect::available()
        .iter()
        .map(|tag| (*tag, "available".to_string()))
        .collect();
    output::print_key_value_table(&items, format.into(), quiet)
}
