//! Normalized driver results.
//!
//! A driver hands back raw rows; [`Response`] wraps them together with the
//! [`RecordShape`] that says which keys carry record identity, and exposes
//! them through one accessor per [`Format`]. Reading a response through an
//! accessor that does not match its format is an error, not a conversion.

use indexmap::IndexMap;
use spider_common::types::Value;
use spider_common::utils::error::{DriverError, ResponseError, Result};
use spider_core::Format;

/// One raw result row, keyed by field name in engine order.
pub type Row = IndexMap<String, Value>;

/// Names of the keys that carry record identity in an engine's rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordShape {
    id_key: String,
    label_key: String,
    meta_prefix: Option<String>,
}

impl RecordShape {
    /// Creates a shape from explicit key names.
    pub fn new(id_key: impl Into<String>, label_key: impl Into<String>) -> Self {
        Self {
            id_key: id_key.into(),
            label_key: label_key.into(),
            meta_prefix: None,
        }
    }

    /// OrientDB rows: `@rid` and `@class`, with every `@`-prefixed key
    /// treated as engine metadata.
    #[must_use]
    pub fn orientsql() -> Self {
        Self::new("@rid", "@class").with_meta_prefix("@")
    }

    /// Treats keys starting with `prefix` as metadata rather than properties.
    #[must_use]
    pub fn with_meta_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.meta_prefix = Some(prefix.into());
        self
    }

    /// Key holding the record id.
    #[must_use]
    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    /// Key holding the record label.
    #[must_use]
    pub fn label_key(&self) -> &str {
        &self.label_key
    }

    /// Returns true if `key` is engine metadata.
    #[must_use]
    pub fn is_meta(&self, key: &str) -> bool {
        key == self.id_key
            || key == self.label_key
            || self
                .meta_prefix
                .as_deref()
                .is_some_and(|prefix| key.starts_with(prefix))
    }
}

impl Default for RecordShape {
    fn default() -> Self {
        Self::orientsql()
    }
}

/// A graph element read back from the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    id: Option<String>,
    label: Option<String>,
    properties: IndexMap<String, Value>,
}

impl Record {
    /// Builds a record from a row, splitting identity from properties.
    #[must_use]
    pub fn from_row(row: &Row, shape: &RecordShape) -> Self {
        Self {
            id: row.get(shape.id_key()).and_then(identity),
            label: row.get(shape.label_key()).and_then(identity),
            properties: row
                .iter()
                .filter(|(key, _)| !shape.is_meta(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    /// Record id, e.g. `#12:0`.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Record label (class).
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Property by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.properties.get(field)
    }

    /// All properties in engine order.
    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    /// Consumes the record, returning its properties.
    #[must_use]
    pub fn into_properties(self) -> IndexMap<String, Value> {
        self.properties
    }
}

/// Text of an id or label value. Null and structured values carry no
/// identity.
fn identity(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_string()),
        Value::Int64(i) => Some(i.to_string()),
        _ => None,
    }
}

/// A record and the records nested under it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeNode {
    /// The element at this node. Nested records are moved to `children`.
    pub record: Record,
    /// Nested records, in field order.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn from_row(row: &Row, shape: &RecordShape) -> Self {
        let mut record = Record::from_row(row, shape);
        let mut children = Vec::new();
        record.properties.retain(|_, value| {
            let nested = nested_rows(value, shape);
            if nested.is_empty() {
                return true;
            }
            children.extend(nested.iter().map(|row| TreeNode::from_row(row, shape)));
            false
        });
        Self { record, children }
    }

    /// Number of nodes in this subtree, including this one.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Rows nested in a property value: a map carrying an id, or a non-empty
/// list made only of such maps.
fn nested_rows(value: &Value, shape: &RecordShape) -> Vec<Row> {
    let as_row = |value: &Value| {
        value
            .as_map()
            .filter(|map| map.contains_key(shape.id_key()))
            .map(|map| {
                map.iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect::<Row>()
            })
    };

    match value {
        Value::Map(_) => as_row(value).into_iter().collect(),
        Value::List(items) => items
            .iter()
            .map(as_row)
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    rows: Vec<Row>,
    shape: RecordShape,
    format: Format,
}

impl Response {
    /// Wraps raw rows. The format starts as [`Format::Set`].
    #[must_use]
    pub fn new(rows: Vec<Row>, shape: RecordShape) -> Self {
        Self {
            rows,
            shape,
            format: Format::Set,
        }
    }

    /// A response without rows.
    #[must_use]
    pub fn empty(shape: RecordShape) -> Self {
        Self::new(Vec::new(), shape)
    }

    /// Parses an engine reply: a JSON array of objects, a single object, or
    /// `null` for no rows.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::MalformedResponse`] for any other JSON.
    pub fn from_json(json: &str, shape: RecordShape) -> Result<Self> {
        let malformed = |e: serde_json::Error| DriverError::MalformedResponse(e.to_string());
        let raw: serde_json::Value = serde_json::from_str(json).map_err(malformed)?;
        let rows = match raw {
            serde_json::Value::Null => Vec::new(),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<Row>, _>>()
                .map_err(malformed)?,
            object @ serde_json::Value::Object(_) => {
                vec![serde_json::from_value(object).map_err(malformed)?]
            }
            other => {
                return Err(DriverError::MalformedResponse(format!(
                    "expected rows, found {other}"
                ))
                .into());
            }
        };
        Ok(Self::new(rows, shape))
    }

    /// Replaces the active format.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Active format.
    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Key names used to read identity from rows.
    #[must_use]
    pub fn shape(&self) -> &RecordShape {
        &self.shape
    }

    /// Raw rows, whatever the format.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn require(&self, requested: Format) -> std::result::Result<(), ResponseError> {
        if self.format == requested {
            Ok(())
        } else {
            Err(ResponseError::FormatMismatch {
                requested: requested.as_str(),
                active: self.format.as_str(),
            })
        }
    }

    fn records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| Record::from_row(row, &self.shape))
            .collect()
    }

    /// First record, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::FormatMismatch`] unless the format is `set`.
    pub fn get_record(&self) -> Result<Option<Record>> {
        self.require(Format::Set)?;
        Ok(self
            .rows
            .first()
            .map(|row| Record::from_row(row, &self.shape)))
    }

    /// All records.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::FormatMismatch`] unless the format is `set`.
    pub fn get_set(&self) -> Result<Vec<Record>> {
        self.require(Format::Set)?;
        Ok(self.records())
    }

    /// Records in traversal order.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::FormatMismatch`] unless the format is `path`.
    pub fn get_path(&self) -> Result<Vec<Record>> {
        self.require(Format::Path)?;
        Ok(self.records())
    }

    /// One tree per row.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::FormatMismatch`] unless the format is `tree`.
    pub fn get_tree(&self) -> Result<Vec<TreeNode>> {
        self.require(Format::Tree)?;
        Ok(self
            .rows
            .iter()
            .map(|row| TreeNode::from_row(row, &self.shape))
            .collect())
    }

    /// First property value of the first row, or `Null` without rows.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::FormatMismatch`] unless the format is
    /// `scalar`.
    pub fn get_scalar(&self) -> Result<Value> {
        self.require(Format::Scalar)?;
        Ok(self
            .rows
            .first()
            .and_then(|row| row.iter().find(|(key, _)| !self.shape.is_meta(key)))
            .map(|(_, value)| value.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use spider_common::Error;

    fn row(entries: &[(&str, Value)]) -> Row {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    fn cats() -> Response {
        Response::new(
            vec![
                row(&[
                    ("@rid", "#12:0".into()),
                    ("@class", "Cat".into()),
                    ("@version", 3.into()),
                    ("name", "oreo".into()),
                ]),
                row(&[
                    ("@rid", "#12:1".into()),
                    ("@class", "Cat".into()),
                    ("name", "milo".into()),
                ]),
            ],
            RecordShape::orientsql(),
        )
    }

    #[test]
    fn test_record_identity() {
        let record = cats().get_record().unwrap().unwrap();
        assert_eq!(record.id(), Some("#12:0"));
        assert_eq!(record.label(), Some("Cat"));
        assert_eq!(record.get("name"), Some(&Value::from("oreo")));
        assert_eq!(record.properties().len(), 1);
        assert!(record.get("@version").is_none());
    }

    #[test]
    fn test_null_identity_is_absent() {
        let shape = RecordShape::orientsql();
        let record = Record::from_row(
            &row(&[("@rid", Value::Null), ("@class", Value::Null), ("name", "oreo".into())]),
            &shape,
        );
        assert_eq!(record.id(), None);
        assert_eq!(record.label(), None);
        assert_eq!(record.get("name"), Some(&Value::from("oreo")));

        let record = Record::from_row(&row(&[("@rid", Value::Int64(7))]), &shape);
        assert_eq!(record.id(), Some("7"));
    }

    #[test]
    fn test_set_and_empty() {
        let records = cats().get_set().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("name"), Some(&Value::from("milo")));

        let empty = Response::empty(RecordShape::orientsql());
        assert!(empty.get_set().unwrap().is_empty());
        assert!(empty.get_record().unwrap().is_none());
    }

    #[test]
    fn test_format_mismatch() {
        let response = cats();
        assert_eq!(response.format(), Format::Set);

        let err = response.get_path().unwrap_err();
        assert!(matches!(
            err,
            Error::Response(ResponseError::FormatMismatch {
                requested: "path",
                active: "set"
            })
        ));

        let response = response.with_format(Format::Path);
        assert_eq!(response.get_path().unwrap().len(), 2);
        assert!(response.get_set().is_err());
        assert!(response.get_scalar().is_err());
        assert!(response.get_tree().is_err());
    }

    #[test]
    fn test_scalar() {
        let response = Response::new(
            vec![row(&[("@rid", "#-1:0".into()), ("count", 2.into())])],
            RecordShape::orientsql(),
        )
        .with_format(Format::Scalar);
        assert_eq!(response.get_scalar().unwrap(), Value::from(2));

        let empty = Response::empty(RecordShape::orientsql()).with_format(Format::Scalar);
        assert_eq!(empty.get_scalar().unwrap(), Value::Null);
    }

    #[test]
    fn test_tree_from_nested_records() {
        let json = r##"[{
            "@rid": "#13:0",
            "@class": "Owner",
            "first_name": "nicole",
            "tags": [1, 2],
            "owns": [
                {"@rid": "#12:0", "@class": "Cat", "name": "oreo"},
                {"@rid": "#12:1", "@class": "Cat", "name": "milo",
                 "vet": {"@rid": "#15:0", "@class": "Vet", "name": "dr. bo"}}
            ],
            "address": {"city": "Paris"}
        }]"##;
        let response = Response::from_json(json, RecordShape::orientsql())
            .unwrap()
            .with_format(Format::Tree);

        let trees = response.get_tree().unwrap();
        assert_eq!(trees.len(), 1);
        let owner = &trees[0];
        assert_eq!(owner.size(), 4);
        assert_eq!(owner.record.id(), Some("#13:0"));
        // Plain lists and maps without an id stay properties.
        assert!(owner.record.get("tags").is_some());
        assert!(owner.record.get("address").is_some());
        assert!(owner.record.get("owns").is_none());

        let labels: Vec<_> = owner.children.iter().map(|c| c.record.label()).collect();
        assert_eq!(labels, vec![Some("Cat"), Some("Cat")]);
        let vet = &owner.children[1].children[0].record;
        assert_eq!(vet.get("name"), Some(&Value::from("dr. bo")));
    }

    #[test]
    fn test_from_json_shapes() {
        let one =
            Response::from_json(r##"{"@rid": "#1:0", "x": 1}"##, RecordShape::orientsql()).unwrap();
        assert_eq!(one.len(), 1);

        let none = Response::from_json("null", RecordShape::orientsql()).unwrap();
        assert!(none.is_empty());

        let err = Response::from_json("42", RecordShape::orientsql()).unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::MalformedResponse(_))));

        let err = Response::from_json("[1, 2]", RecordShape::orientsql()).unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::MalformedResponse(_))));
    }

    #[test]
    fn test_custom_shape() {
        let shape = RecordShape::new("id", "label");
        assert!(shape.is_meta("id"));
        assert!(!shape.is_meta("@rid"));

        let response = Response::new(
            vec![row(&[("id", 7.into()), ("label", "person".into()), ("name", "ada".into())])],
            shape,
        );
        let record = response.get_record().unwrap().unwrap();
        assert_eq!(record.id(), Some("7"));
        assert_eq!(record.label(), Some("person"));
    }

    proptest! {
        #[test]
        fn prop_records_split_meta_from_properties(
            keys in prop::collection::vec("@?[a-z]{1,6}", 0..10),
        ) {
            let row: Row = keys
                .iter()
                .enumerate()
                .map(|(i, key)| (key.clone(), Value::from(i64::try_from(i).unwrap())))
                .collect();
            let shape = RecordShape::orientsql();
            let record = Record::from_row(&row, &shape);

            prop_assert!(record.properties().keys().all(|key| !key.starts_with('@')));
            let meta = row.keys().filter(|key| shape.is_meta(key)).count();
            prop_assert_eq!(record.properties().len() + meta, row.len());
        }
    }
}
