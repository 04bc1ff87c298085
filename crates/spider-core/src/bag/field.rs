//! Field references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reserved fields naming structural graph concepts rather than user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaField {
    /// Record identifier.
    ElementId,
    /// Element label (class).
    ElementLabel,
    /// Element kind (vertex or edge).
    ElementType,
    /// Outgoing vertex of an edge.
    EdgeOutVertex,
    /// Incoming vertex of an edge.
    EdgeInVertex,
}

impl MetaField {
    /// Every meta-field, in declaration order.
    pub const ALL: [MetaField; 5] = [
        MetaField::ElementId,
        MetaField::ElementLabel,
        MetaField::ElementType,
        MetaField::EdgeOutVertex,
        MetaField::EdgeInVertex,
    ];

    /// Reserved spelling used when a Bag travels as JSON.
    #[must_use]
    pub const fn reserved_name(self) -> &'static str {
        match self {
            MetaField::ElementId => "spider:id",
            MetaField::ElementLabel => "spider:label",
            MetaField::ElementType => "spider:type",
            MetaField::EdgeOutVertex => "spider:outV",
            MetaField::EdgeInVertex => "spider:inV",
        }
    }

    /// Returns true for meta-fields that shape a statement rather than
    /// travel in its content. A record id is the only one that is not.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        !matches!(self, MetaField::ElementId)
    }

    /// Looks up a meta-field by its reserved spelling.
    #[must_use]
    pub fn from_reserved_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.reserved_name() == name)
    }
}

impl fmt::Display for MetaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reserved_name())
    }
}

/// A field a constraint, projection, or payload entry refers to.
///
/// Strings are parsed so that reserved spellings (`spider:id`,
/// `spider:label`, ...) become [`FieldRef::Meta`] and everything else stays
/// a user data field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldRef {
    /// A reserved meta-field.
    Meta(MetaField),
    /// A user data field, kept verbatim.
    Data(String),
}

impl FieldRef {
    /// Creates a user data field reference.
    pub fn data(name: impl Into<String>) -> Self {
        Self::Data(name.into())
    }

    /// Returns the meta-field, if this is one.
    #[must_use]
    pub fn meta(&self) -> Option<MetaField> {
        match self {
            FieldRef::Meta(m) => Some(*m),
            FieldRef::Data(_) => None,
        }
    }

    /// Returns true if this refers to the given meta-field.
    #[must_use]
    pub fn is(&self, meta: MetaField) -> bool {
        self.meta() == Some(meta)
    }

    /// Returns true if this is any reserved meta-field.
    #[must_use]
    pub fn is_meta(&self) -> bool {
        matches!(self, FieldRef::Meta(_))
    }

    /// Name as written in a serialized Bag.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            FieldRef::Meta(m) => m.reserved_name(),
            FieldRef::Data(name) => name,
        }
    }
}

impl From<MetaField> for FieldRef {
    fn from(meta: MetaField) -> Self {
        FieldRef::Meta(meta)
    }
}

impl From<&str> for FieldRef {
    fn from(name: &str) -> Self {
        MetaField::from_reserved_name(name)
            .map_or_else(|| FieldRef::Data(name.to_string()), FieldRef::Meta)
    }
}

impl From<String> for FieldRef {
    fn from(name: String) -> Self {
        match MetaField::from_reserved_name(&name) {
            Some(meta) => FieldRef::Meta(meta),
            None => FieldRef::Data(name),
        }
    }
}

impl From<FieldRef> for String {
    fn from(field: FieldRef) -> Self {
        match field {
            FieldRef::Meta(m) => m.reserved_name().to_string(),
            FieldRef::Data(name) => name,
        }
    }
}

impl FromStr for FieldRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldRef::from(s))
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
