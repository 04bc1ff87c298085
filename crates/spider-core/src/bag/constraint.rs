//! Predicates.

use serde::{Deserialize, Serialize};
use spider_common::types::Value;

use super::field::{FieldRef, MetaField};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Equal.
    Eq,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than or equal.
    Ge,
    /// Not equal.
    Ne,
    /// Collection does not contain.
    Without,
    /// Member of a collection.
    In,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 8] = [
        Operator::Eq,
        Operator::Gt,
        Operator::Lt,
        Operator::Le,
        Operator::Ge,
        Operator::Ne,
        Operator::Without,
        Operator::In,
    ];
}

/// How a constraint joins the predicate before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conjunction {
    /// Both must hold.
    #[default]
    And,
    /// Either may hold.
    Or,
}

/// One predicate of a Bag's `where` sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constraint {
    /// Field being compared.
    pub field: FieldRef,
    /// Comparison operator.
    pub operator: Operator,
    /// Right-hand side.
    pub value: Value,
    /// Conjunction with the preceding retained predicate.
    #[serde(default)]
    pub conjunction: Conjunction,
}

impl Constraint {
    /// Creates a constraint joined with `AND`.
    pub fn new(field: impl Into<FieldRef>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            conjunction: Conjunction::And,
        }
    }

    /// Shorthand for an equality constraint.
    pub fn equals(field: impl Into<FieldRef>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    /// Sets the conjunction.
    #[must_use]
    pub fn with_conjunction(mut self, conjunction: Conjunction) -> Self {
        self.conjunction = conjunction;
        self
    }

    /// Returns true if the field is the given meta-field.
    #[must_use]
    pub fn is_on(&self, meta: MetaField) -> bool {
        self.field.is(meta)
    }
}
