//! Clause emitters and value casting for OrientDB SQL.
//!
//! These are free functions over a borrowed [`Bag`] and a caller-owned
//! [`ScriptBuffer`]; nothing here keeps state between calls.

use std::borrow::Cow;

use indexmap::IndexMap;
use smallvec::SmallVec;
use spider_common::types::Value;
use spider_common::utils::error::{ClauseStep, CompileError, Result};
use spider_core::{Bag, Constraint, FieldRef, MetaField, ScriptBuffer};

use super::tables;

/// Constraints left after target resolution.
pub type Remaining<'a> = SmallVec<[&'a Constraint; 8]>;

/// Splits `constraints` into the target named by a label or id constraint
/// and the constraints that remain predicates.
///
/// Every `ElementLabel` and `ElementId` constraint is removed. When several
/// are present the last one scanned names the target.
#[must_use]
pub fn resolve_target(constraints: &[Constraint]) -> (Option<&Value>, Remaining<'_>) {
    let mut target = None;
    let mut remaining = Remaining::new();
    for constraint in constraints {
        if constraint.is_on(MetaField::ElementLabel) || constraint.is_on(MetaField::ElementId) {
            target = Some(&constraint.value);
        } else {
            remaining.push(constraint);
        }
    }
    (target, remaining)
}

/// Resolves the class of a create or update.
///
/// Looks at the label stored in `data`, then the first label constraint,
/// then falls back to `default`.
///
/// # Errors
///
/// Returns [`CompileError::InvalidScriptToken`] when a label is not a
/// string, or whatever `default` fails with.
pub fn resolve_class<'a, F>(bag: &'a Bag, default: F) -> Result<Option<Cow<'a, str>>>
where
    F: FnOnce() -> Result<Option<Cow<'a, str>>>,
{
    if let Some(label) = bag.meta_data(MetaField::ElementLabel) {
        return Ok(Some(Cow::Borrowed(token(label, ClauseStep::Class)?)));
    }
    if let Some(constraint) = bag
        .constraints
        .iter()
        .find(|c| c.is_on(MetaField::ElementLabel))
    {
        return Ok(Some(Cow::Borrowed(token(&constraint.value, ClauseStep::Class)?)));
    }
    default()
}

/// Borrows a value that is about to be written verbatim into the script.
///
/// # Errors
///
/// Only strings can be written verbatim; anything else is rejected with
/// [`CompileError::InvalidScriptToken`].
pub fn token(value: &Value, step: ClauseStep) -> std::result::Result<&str, CompileError> {
    value.as_str().ok_or_else(|| invalid_token(value, step))
}

fn invalid_token(value: &Value, step: ClauseStep) -> CompileError {
    CompileError::InvalidScriptToken {
        step,
        value: format!("{value} ({})", value.type_name()),
    }
}

/// Rejects NaN and infinities anywhere inside `value`; neither has a SQL or
/// JSON literal.
fn ensure_finite(value: &Value, step: ClauseStep) -> std::result::Result<(), CompileError> {
    match value {
        Value::Float64(f) if !f.is_finite() => Err(invalid_token(value, step)),
        Value::List(items) => items.iter().try_for_each(|item| ensure_finite(item, step)),
        Value::Map(map) => map.values().try_for_each(|item| ensure_finite(item, step)),
        _ => Ok(()),
    }
}

/// Emits the predicate clause.
///
/// Label and type constraints are structural and never become predicates.
/// The first emitted predicate carries no conjunction.
///
/// # Errors
///
/// Propagates buffer and casting errors.
pub fn append_wheres<'a, I>(buf: &mut ScriptBuffer, constraints: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Constraint>,
{
    let mut predicates = ScriptBuffer::new();
    for constraint in constraints {
        if constraint.is_on(MetaField::ElementLabel) || constraint.is_on(MetaField::ElementType) {
            continue;
        }
        if !predicates.is_empty() {
            predicates.push(ClauseStep::Where, tables::conjunction(constraint.conjunction))?;
        }
        predicates.push(ClauseStep::Where, tables::field_name(&constraint.field))?;
        predicates.push(ClauseStep::Where, tables::operator(constraint.operator))?;
        predicates.push(
            ClauseStep::Where,
            &cast_value(&constraint.value, &constraint.field)?,
        )?;
    }

    if !predicates.is_empty() {
        buf.push(ClauseStep::Where, "WHERE")?;
        buf.push(ClauseStep::Where, predicates.as_str())?;
    }
    Ok(())
}

/// Emits `keyword {json}` for the payload entries that are not structural
/// meta-fields, or nothing when there are none. A record id is written
/// under its native name.
///
/// # Errors
///
/// Returns [`CompileError::InvalidScriptToken`] for a non-finite float and
/// propagates buffer and encoding errors.
pub fn append_content(buf: &mut ScriptBuffer, keyword: &str, bag: &Bag) -> Result<()> {
    let mut content: IndexMap<&str, &Value> = IndexMap::new();
    for (field, value) in bag.content() {
        ensure_finite(value, ClauseStep::Content)?;
        content.insert(tables::field_name(field), value);
    }
    if content.is_empty() {
        return Ok(());
    }
    buf.push(ClauseStep::Content, keyword)?;
    buf.push(ClauseStep::Content, &serde_json::to_string(&content)?)?;
    Ok(())
}

/// Emits `ORDER BY field dir, ...` when sort keys are present.
///
/// # Errors
///
/// Propagates buffer errors.
pub fn append_order(buf: &mut ScriptBuffer, bag: &Bag) -> Result<()> {
    if bag.order_by.is_empty() {
        return Ok(());
    }
    let keys: Vec<String> = bag
        .order_by
        .iter()
        .map(|key| {
            format!(
                "{} {}",
                tables::field_name(&key.field),
                tables::order(key.direction)
            )
        })
        .collect();
    buf.push(ClauseStep::Order, "ORDER BY")?;
    buf.push(ClauseStep::Order, &keys.join(", "))?;
    Ok(())
}

/// Emits `LIMIT n` for a positive limit.
///
/// # Errors
///
/// Propagates buffer errors.
pub fn append_limit(buf: &mut ScriptBuffer, bag: &Bag) -> Result<()> {
    if let Some(limit) = bag.limit.filter(|&n| n > 0) {
        buf.push(ClauseStep::Limit, &format!("LIMIT {limit}"))?;
    }
    Ok(())
}

/// Emits the projected fields, joined with commas.
///
/// # Errors
///
/// Propagates buffer errors.
pub fn append_projections(buf: &mut ScriptBuffer, projections: &[FieldRef]) -> Result<()> {
    if projections.is_empty() {
        return Ok(());
    }
    let fields: Vec<&str> = projections.iter().map(tables::field_name).collect();
    buf.push(ClauseStep::Start, &fields.join(", "))?;
    Ok(())
}

/// Renders a value as an OrientDB SQL literal for comparison with `field`.
///
/// Strings are single-quoted unless the field maps to a native token.
/// List elements are cast one by one under the same field, so a list of
/// names becomes `['a','b']` while a list of record ids stays `[#1:0,#1:1]`.
///
/// Floats always carry a fractional part or exponent, so `2.0` stays a
/// float in the script.
///
/// # Errors
///
/// Returns [`CompileError::InvalidScriptToken`] for NaN or an infinity, and
/// a serialization error if a map cannot be encoded.
pub fn cast_value(value: &Value, field: &FieldRef) -> Result<String> {
    ensure_finite(value, ClauseStep::Where)?;
    Ok(match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Int64(i) => i.to_string(),
        Value::Float64(f) => format!("{f:?}"),
        Value::String(s) if tables::has_native_name(field) => s.to_string(),
        Value::String(s) => quote(s),
        Value::List(items) => {
            let items = items
                .iter()
                .map(|item| cast_value(item, field))
                .collect::<Result<Vec<_>>>()?;
            format!("[{}]", items.join(","))
        }
        Value::Map(map) => serde_json::to_string(&**map)?,
    })
}

/// Single-quotes a string, escaping backslashes, quotes, and line breaks.
///
/// Batch scripts are newline separated, so a quoted literal never contains
/// a raw line break.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for ch in s.chars() {
        match ch {
            '\'' | '\\' => {
                quoted.push('\\');
                quoted.push(ch);
            }
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use spider_core::{CommandKind, Conjunction, Operator};

    fn rendered<F>(f: F) -> String
    where
        F: FnOnce(&mut ScriptBuffer) -> Result<()>,
    {
        let mut buf = ScriptBuffer::new();
        f(&mut buf).unwrap();
        buf.into_script()
    }

    // === Target resolution ===

    #[test]
    fn test_resolve_target_strips_label_and_id() {
        let constraints = vec![
            Constraint::equals(MetaField::ElementLabel, "Cat"),
            Constraint::equals("name", "oreo"),
        ];
        let (target, remaining) = resolve_target(&constraints);
        assert_eq!(target, Some(&Value::from("Cat")));
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].field, FieldRef::data("name"));
    }

    #[test]
    fn test_resolve_target_without_label() {
        let constraints = vec![Constraint::equals("name", "oreo")];
        let (target, remaining) = resolve_target(&constraints);
        assert!(target.is_none());
        assert_eq!(remaining.len(), 1);
    }

    // === Class resolution ===

    #[test]
    fn test_resolve_class_priority() {
        let bag = Bag::new(CommandKind::Create)
            .with_data(MetaField::ElementLabel, "Owner")
            .with_constraint(Constraint::equals(MetaField::ElementLabel, "Cat"));
        let class = resolve_class(&bag, || Ok(Some("V".into()))).unwrap();
        assert_eq!(class.as_deref(), Some("Owner"));

        let bag = Bag::new(CommandKind::Create)
            .with_constraint(Constraint::equals(MetaField::ElementLabel, "Cat"))
            .with_constraint(Constraint::equals(MetaField::ElementLabel, "Dog"));
        let class = resolve_class(&bag, || Ok(None)).unwrap();
        assert_eq!(class.as_deref(), Some("Cat"));

        let bag = Bag::new(CommandKind::Create);
        assert_eq!(
            resolve_class(&bag, || Ok(Some("V".into()))).unwrap().as_deref(),
            Some("V")
        );
        assert_eq!(resolve_class(&bag, || Ok(None)).unwrap(), None);
    }

    #[test]
    fn test_resolve_class_rejects_non_string_label() {
        let bag = Bag::new(CommandKind::Create).with_data(MetaField::ElementLabel, 7);
        let err = resolve_class(&bag, || Ok(None)).unwrap_err();
        assert!(matches!(
            err,
            spider_common::Error::Compile(CompileError::InvalidScriptToken {
                step: ClauseStep::Class,
                ..
            })
        ));
    }

    // === Predicates ===

    #[test]
    fn test_wheres_first_predicate_has_no_conjunction() {
        let constraints = vec![
            Constraint::equals("name", "oreo").with_conjunction(Conjunction::Or),
            Constraint::new("age", Operator::Gt, 2),
        ];
        let script = rendered(|buf| append_wheres(buf, &constraints));
        assert_eq!(script, "WHERE name = 'oreo' AND age > 2");
    }

    #[test]
    fn test_wheres_skip_structural_constraints() {
        let constraints = vec![
            Constraint::equals(MetaField::ElementLabel, "Cat"),
            Constraint::equals(MetaField::ElementType, "vertex"),
            Constraint::equals("name", "oreo"),
            Constraint::equals(MetaField::ElementType, "vertex"),
            Constraint::new("age", Operator::Le, 9).with_conjunction(Conjunction::Or),
        ];
        let script = rendered(|buf| append_wheres(buf, &constraints));
        assert_eq!(script, "WHERE name = 'oreo' OR age <= 9");
    }

    #[test]
    fn test_wheres_empty_emits_nothing() {
        let constraints = vec![Constraint::equals(MetaField::ElementLabel, "Cat")];
        assert_eq!(rendered(|buf| append_wheres(buf, &constraints)), "");
    }

    #[test]
    fn test_wheres_use_native_field_names() {
        let constraints = vec![Constraint::equals(MetaField::ElementId, "#12:0")];
        let script = rendered(|buf| append_wheres(buf, &constraints));
        assert_eq!(script, "WHERE @rid = #12:0");
    }

    // === Content ===

    #[test]
    fn test_content_strips_meta_fields() {
        let bag = Bag::new(CommandKind::Create)
            .with_data(MetaField::ElementLabel, "Owner")
            .with_data("first_name", "nicole")
            .with_data(MetaField::ElementType, "vertex")
            .with_data("last_name", "lowman");
        let script = rendered(|buf| append_content(buf, "CONTENT", &bag));
        assert_eq!(
            script,
            r#"CONTENT {"first_name":"nicole","last_name":"lowman"}"#
        );
    }

    #[test]
    fn test_content_keeps_record_id_as_rid() {
        let bag = Bag::new(CommandKind::Update)
            .with_data(MetaField::ElementId, "#13:0")
            .with_data("last_name", "wilson");
        let script = rendered(|buf| append_content(buf, "MERGE", &bag));
        assert_eq!(script, r##"MERGE {"@rid":"#13:0","last_name":"wilson"}"##);
    }

    #[test]
    fn test_content_rejects_non_finite_floats() {
        let bag = Bag::new(CommandKind::Create).with_data("weight", f64::INFINITY);
        let mut buf = ScriptBuffer::new();
        let err = append_content(&mut buf, "CONTENT", &bag).unwrap_err();
        assert!(matches!(
            err,
            spider_common::Error::Compile(CompileError::InvalidScriptToken {
                step: ClauseStep::Content,
                ..
            })
        ));
    }

    #[test]
    fn test_content_only_meta_fields_emits_nothing() {
        let bag = Bag::new(CommandKind::Create)
            .with_data(MetaField::ElementLabel, "Owner")
            .with_data(MetaField::EdgeOutVertex, "#1:0");
        assert_eq!(rendered(|buf| append_content(buf, "CONTENT", &bag)), "");
    }

    // === Limit and order ===

    #[test]
    fn test_limit() {
        let bag = Bag::default().with_limit(5);
        assert_eq!(rendered(|buf| append_limit(buf, &bag)), "LIMIT 5");

        let bag = Bag::default().with_limit(0);
        assert_eq!(rendered(|buf| append_limit(buf, &bag)), "");

        assert_eq!(rendered(|buf| append_limit(buf, &Bag::default())), "");
    }

    #[test]
    fn test_order() {
        let bag = Bag::default()
            .with_order("name", spider_core::OrderDirection::Asc)
            .with_order(MetaField::ElementId, spider_core::OrderDirection::Desc);
        assert_eq!(
            rendered(|buf| append_order(buf, &bag)),
            "ORDER BY name ASC, @rid DESC"
        );
    }

    // === Value casting ===

    #[test]
    fn test_cast_scalars() {
        let name = FieldRef::data("name");
        assert_eq!(cast_value(&Value::from(true), &name).unwrap(), "true");
        assert_eq!(cast_value(&Value::from(false), &name).unwrap(), "false");
        assert_eq!(cast_value(&Value::from(2), &name).unwrap(), "2");
        assert_eq!(cast_value(&Value::from(2.5), &name).unwrap(), "2.5");
        assert_eq!(cast_value(&Value::from(2.0), &name).unwrap(), "2.0");
        assert_eq!(cast_value(&Value::Null, &name).unwrap(), "NULL");
        assert_eq!(cast_value(&Value::from("oreo"), &name).unwrap(), "'oreo'");
    }

    #[test]
    fn test_cast_native_field_strings_are_raw() {
        let rid = FieldRef::Meta(MetaField::ElementId);
        assert_eq!(cast_value(&Value::from("#12:0"), &rid).unwrap(), "#12:0");
        // Booleans are never quoted, native field or not.
        assert_eq!(cast_value(&Value::from(true), &rid).unwrap(), "true");
    }

    #[test]
    fn test_cast_escapes_quotes() {
        let name = FieldRef::data("name");
        assert_eq!(
            cast_value(&Value::from("o'brien"), &name).unwrap(),
            r"'o\'brien'"
        );
        assert_eq!(cast_value(&Value::from(r"a\b"), &name).unwrap(), r"'a\\b'");
    }

    #[test]
    fn test_quote_escapes_line_breaks() {
        assert_eq!(quote("two\nlines"), r"'two\nlines'");
        assert_eq!(quote("crlf\r\n"), r"'crlf\r\n'");
        assert!(!quote("a\nb").contains('\n'));
    }

    #[test]
    fn test_cast_rejects_non_finite_floats() {
        let weight = FieldRef::data("weight");
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = cast_value(&Value::from(bad), &weight).unwrap_err();
            assert!(matches!(
                err,
                spider_common::Error::Compile(CompileError::InvalidScriptToken {
                    step: ClauseStep::Where,
                    ..
                })
            ));
        }

        let nested = Value::from(vec![Value::from(1.5), Value::from(f64::NAN)]);
        assert!(cast_value(&nested, &weight).is_err());
    }

    #[test]
    fn list_elements_are_cast_individually() {
        // Each element is cast by its own type instead of being joined raw.
        let name = FieldRef::data("name");
        let list = Value::from(vec![Value::from("oreo"), Value::from(3), Value::from(true)]);
        assert_eq!(cast_value(&list, &name).unwrap(), "['oreo',3,true]");

        let rid = FieldRef::Meta(MetaField::ElementId);
        let ids = Value::from(vec!["#12:0", "#12:1"]);
        assert_eq!(cast_value(&ids, &rid).unwrap(), "[#12:0,#12:1]");
    }

    #[test]
    fn test_cast_map_as_json() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("city".to_string(), Value::from("Paris"));
        assert_eq!(
            cast_value(&Value::from(map), &FieldRef::data("address")).unwrap(),
            r#"{"city":"Paris"}"#
        );
    }
}
