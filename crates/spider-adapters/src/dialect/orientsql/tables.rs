//! Translation tables from Bag tokens to OrientDB SQL.
//!
//! Every table is an exhaustive `match`, so a token without a translation
//! is a compile error here rather than a missing key at runtime.

use spider_common::types::Value;
use spider_core::{CommandKind, Conjunction, FieldRef, MetaField, Operator, OrderDirection};

/// Dialect tag stamped on compiled commands.
pub const DIALECT: &str = "orientSQL";

/// Class used when a command names no target: all vertices.
pub const DEFAULT_CLASS: &str = "V";

/// Whether a command addresses vertices or edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementKind {
    /// Vertex records.
    #[default]
    Vertex,
    /// Edge records.
    Edge,
}

impl ElementKind {
    /// Reads an `ElementType` value; only the string `edge` selects edges.
    #[must_use]
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some(kind) if kind.eq_ignore_ascii_case("edge") => ElementKind::Edge,
            _ => ElementKind::Vertex,
        }
    }
}

/// Comparison operator token.
#[must_use]
pub const fn operator(op: Operator) -> &'static str {
    match op {
        Operator::Eq => "=",
        Operator::Gt => ">",
        Operator::Lt => "<",
        Operator::Le => "<=",
        Operator::Ge => ">=",
        Operator::Ne => "<>",
        Operator::Without => "WITHOUT",
        Operator::In => "IN",
    }
}

/// Conjunction token.
#[must_use]
pub const fn conjunction(conj: Conjunction) -> &'static str {
    match conj {
        Conjunction::And => "AND",
        Conjunction::Or => "OR",
    }
}

/// Sort direction token.
#[must_use]
pub const fn order(direction: OrderDirection) -> &'static str {
    match direction {
        OrderDirection::Asc => "ASC",
        OrderDirection::Desc => "DESC",
    }
}

/// Native OrientDB name of a meta-field, if it has one.
#[must_use]
pub const fn native_field(meta: MetaField) -> Option<&'static str> {
    match meta {
        MetaField::ElementId => Some("@rid"),
        MetaField::ElementLabel => Some("@class"),
        MetaField::EdgeOutVertex => Some("out"),
        MetaField::EdgeInVertex => Some("in"),
        MetaField::ElementType => None,
    }
}

/// Field name as written in a statement. Fields without a native name
/// pass through unchanged.
#[must_use]
pub fn field_name(field: &FieldRef) -> &str {
    match field {
        FieldRef::Meta(meta) => native_field(*meta).unwrap_or(meta.reserved_name()),
        FieldRef::Data(name) => name,
    }
}

/// True when the field maps to a native token whose values are already
/// OrientDB literals (record ids, links) and must not be quoted.
#[must_use]
pub fn has_native_name(field: &FieldRef) -> bool {
    field.meta().and_then(native_field).is_some()
}

/// Statement verb.
#[must_use]
pub const fn verb(command: CommandKind, kind: ElementKind) -> &'static str {
    match (command, kind) {
        (CommandKind::Retrieve, _) => "SELECT",
        (CommandKind::Create, ElementKind::Vertex) => "INSERT INTO",
        (CommandKind::Create, ElementKind::Edge) => "CREATE EDGE",
        (CommandKind::Update, _) => "UPDATE",
        (CommandKind::Delete, ElementKind::Vertex) => "DELETE VERTEX",
        (CommandKind::Delete, ElementKind::Edge) => "DELETE EDGE",
    }
}
