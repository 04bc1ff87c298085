//! The command Bag: a dialect-neutral description of one graph operation.
//!
//! A Bag is what an application (usually through a query builder) hands to a
//! [`DialectProcessor`](crate::processor::DialectProcessor). It says *what*
//! should happen (retrieve these vertices, create that edge) without saying
//! how any particular database spells it.
//!
//! ```
//! use spider_core::{Bag, CommandKind, Constraint, MetaField, Operator};
//!
//! let bag = Bag::new(CommandKind::Retrieve)
//!     .with_constraint(Constraint::equals(MetaField::ElementLabel, "Cat"))
//!     .with_constraint(Constraint::new("age", Operator::Gt, 2))
//!     .with_limit(5);
//!
//! assert_eq!(bag.constraints.len(), 2);
//! ```

mod constraint;
mod field;

pub use constraint::{Conjunction, Constraint, Operator};
pub use field::{FieldRef, MetaField};

use std::fmt;

use indexmap::IndexMap;
use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use spider_common::types::Value;

/// The kind of operation a Bag describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// Read records.
    #[default]
    Retrieve,
    /// Create a record.
    Create,
    /// Modify records.
    Update,
    /// Remove records.
    Delete,
}

impl CommandKind {
    /// Returns true for commands that do not modify the graph.
    #[must_use]
    pub fn is_read(self) -> bool {
        matches!(self, CommandKind::Retrieve)
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandKind::Retrieve => "retrieve",
            CommandKind::Create => "create",
            CommandKind::Update => "update",
            CommandKind::Delete => "delete",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape in which results should be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Ordered records along a traversal.
    Path,
    /// Nested records.
    Tree,
    /// A single value.
    Scalar,
    /// A flat collection of records.
    #[default]
    Set,
}

impl Format {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Format::Path => "path",
            Format::Tree => "tree",
            Format::Scalar => "scalar",
            Format::Set => "set",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Field to sort on.
    pub field: FieldRef,
    /// Direction.
    #[serde(default)]
    pub direction: OrderDirection,
}

/// Explicit target of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    /// A class (label) or record id, emitted as-is.
    Class(String),
    /// A nested command whose results are the target.
    Embedded(Box<Bag>),
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Class(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::Class(name)
    }
}

impl From<Bag> for Target {
    fn from(bag: Bag) -> Self {
        Target::Embedded(Box::new(bag))
    }
}

/// The intermediate representation of one graph operation.
///
/// As JSON a Bag is always an object. Arrays and unknown keys are rejected
/// so that a misspelled field cannot quietly turn into a default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(remote = "Self", default, deny_unknown_fields)]
pub struct Bag {
    /// Operation kind.
    pub command: CommandKind,
    /// Ordered predicates. Order decides clause order and conjunction
    /// placement.
    #[serde(rename = "where")]
    pub constraints: Vec<Constraint>,
    /// Content payload for create and update, in insertion order.
    pub data: IndexMap<FieldRef, Value>,
    /// Fields to return; empty means all.
    pub projections: Vec<FieldRef>,
    /// Explicit target, superseded by a label or id constraint.
    pub target: Option<Target>,
    /// Maximum number of records.
    pub limit: Option<u64>,
    /// Sort keys, retrieve only.
    pub order_by: Vec<OrderBy>,
    /// Result shape.
    pub format: Format,
}

impl Bag {
    /// Creates an empty Bag for the given command.
    #[must_use]
    pub fn new(command: CommandKind) -> Self {
        Self {
            command,
            ..Self::default()
        }
    }

    /// Appends a constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Sets one payload entry, replacing any previous value for the field.
    #[must_use]
    pub fn with_data(mut self, field: impl Into<FieldRef>, value: impl Into<Value>) -> Self {
        self.data.insert(field.into(), value.into());
        self
    }

    /// Appends a projected field.
    #[must_use]
    pub fn with_projection(mut self, field: impl Into<FieldRef>) -> Self {
        self.projections.push(field.into());
        self
    }

    /// Sets the explicit target.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<Target>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Sets the limit.
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Appends a sort key.
    #[must_use]
    pub fn with_order(mut self, field: impl Into<FieldRef>, direction: OrderDirection) -> Self {
        self.order_by.push(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Sets the result format.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Payload entries that belong in a content clause: everything except
    /// the structural meta-fields. A record id in `data` is kept.
    pub fn content(&self) -> impl Iterator<Item = (&FieldRef, &Value)> {
        self.data
            .iter()
            .filter(|(field, _)| !field.meta().is_some_and(MetaField::is_structural))
    }

    /// Payload value stored under a meta-field.
    #[must_use]
    pub fn meta_data(&self, meta: MetaField) -> Option<&Value> {
        self.data.get(&FieldRef::Meta(meta))
    }
}

impl Serialize for Bag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Bag::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Bag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BagVisitor)
    }
}

struct BagVisitor;

impl<'de> Visitor<'de> for BagVisitor {
    type Value = Bag;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a bag object")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Bag, A::Error> {
        Bag::deserialize(MapAccessDeserializer::new(map))
    }
}
