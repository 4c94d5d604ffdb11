use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{ValidationError, Validator};
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use serde_path_to_error::Segment;

use crate::{
    describe_value, Contract, FieldPath, PageOutcome, PaginatedResponse, RejectPolicy,
    SchemaViolation,
};

/// Compiled validators keyed by schema name; built on first use of each contract.
static VALIDATORS: Lazy<RwLock<HashMap<String, Arc<Validator>>>> = Lazy::new(Default::default);

/// Returns the JSON Schema describing `T`.
///
/// # Panics
///
/// Panics if the generated schema cannot be serialized; this indicates a programming error.
pub fn contract_schema<T: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(&schema).expect("contract schema json")
}

fn validator<T: JsonSchema>() -> Arc<Validator> {
    let name = T::schema_name();
    if let Some(found) = VALIDATORS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&name)
    {
        return Arc::clone(found);
    }
    let schema = contract_schema::<T>();
    let compiled = Arc::new(
        jsonschema::validator_for(&schema).expect("generated contract schema must compile"),
    );
    let mut cache = VALIDATORS
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(cache.entry(name).or_insert(compiled))
}

fn violation_from(err: &ValidationError<'_>) -> SchemaViolation {
    let path = FieldPath::from_pointer(&err.instance_path.to_string());
    match &err.kind {
        ValidationErrorKind::Required { property } => {
            let field = property
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| property.to_string());
            SchemaViolation::missing(path.join(field))
        }
        ValidationErrorKind::Enum { options } => {
            SchemaViolation::new(path, format!("one of {options}"), describe_value(&err.instance))
        }
        ValidationErrorKind::Type {
            kind: TypeKind::Single(ty),
        } => SchemaViolation::new(path, ty.to_string(), describe_value(&err.instance)),
        _ => SchemaViolation::new(path, err.to_string(), describe_value(&err.instance)),
    }
}

/// Every structural issue `value` has against the schema of `T`.
pub fn structural_violations<T: JsonSchema>(value: &Value) -> Vec<SchemaViolation> {
    validator::<T>()
        .iter_errors(value)
        .map(|err| violation_from(&err))
        .collect()
}

/// Structural check plus typed deserialization, without field-level rules.
fn decode_shape<T: DeserializeOwned + JsonSchema>(value: &Value) -> Result<T, SchemaViolation> {
    if let Some(first) = structural_violations::<T>(value).into_iter().next() {
        return Err(first);
    }
    serde_path_to_error::deserialize(value).map_err(|err| {
        SchemaViolation::new(
            path_of(err.path()),
            format!("value deserializable as {}", T::schema_name()),
            err.inner().to_string(),
        )
    })
}

fn path_of(path: &serde_path_to_error::Path) -> FieldPath {
    path.iter().fold(FieldPath::root(), |acc, seg| match seg {
        Segment::Seq { index } => acc.join(index.to_string()),
        Segment::Map { key } => acc.join(key.as_str()),
        Segment::Enum { .. } | Segment::Unknown => acc,
    })
}

/// Encodes a record back into its wire form.
pub fn encode<T: Serialize>(record: &T) -> Result<Value, SchemaViolation> {
    serde_json::to_value(record).map_err(|err| {
        SchemaViolation::new(FieldPath::root(), "record encodable as JSON", err.to_string())
    })
}

/// Decodes and validates a single record.
pub fn decode<T: Contract>(value: &Value) -> Result<T, SchemaViolation> {
    let result = decode_shape::<T>(value).and_then(|record| {
        record.validate()?;
        Ok(record)
    });
    if let Err(violation) = &result {
        tracing::debug!(
            contract = %T::schema_name(),
            path = %violation.path,
            expected = %violation.expected,
            actual = %violation.actual,
            "payload rejected"
        );
    }
    result
}

/// Decodes a record from JSON text. Text that is not JSON is a violation at the root.
pub fn decode_str<T: Contract>(text: &str) -> Result<T, SchemaViolation> {
    let value = parse_json(text)?;
    decode(&value)
}

pub fn parse_json(text: &str) -> Result<Value, SchemaViolation> {
    serde_json::from_str(text).map_err(|err| {
        SchemaViolation::new(
            FieldPath::root(),
            "JSON document",
            format!("unparseable input ({err})"),
        )
    })
}

/// All structural violations, or the first field-level one when the shape is sound.
pub fn check<T: Contract>(value: &Value) -> Vec<SchemaViolation> {
    let structural = structural_violations::<T>(value);
    if !structural.is_empty() {
        return structural;
    }
    match decode::<T>(value) {
        Ok(_) => Vec::new(),
        Err(violation) => vec![violation],
    }
}

/// Decodes a paginated response of `T` under the caller's rejection policy.
///
/// The envelope itself must always be valid. With [`RejectPolicy::Response`] the first
/// malformed item fails the whole page; with [`RejectPolicy::Record`] malformed items are
/// dropped and reported alongside the kept ones.
pub fn decode_page<T: Contract>(
    value: &Value,
    policy: RejectPolicy,
) -> Result<PageOutcome<T>, SchemaViolation> {
    if policy == RejectPolicy::Response {
        let page = decode::<PaginatedResponse<T>>(value)?;
        return Ok(PageOutcome {
            page,
            rejected: Vec::new(),
        });
    }

    let envelope = decode_shape::<PaginatedResponse<Value>>(value)?;
    envelope.validate_envelope()?;

    let PaginatedResponse {
        items,
        total,
        page,
        page_size,
        total_pages,
    } = envelope;
    let mut kept = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match decode::<T>(item) {
            Ok(record) => kept.push(record),
            Err(violation) => {
                let violation = violation.within(FieldPath::field("items").join(idx.to_string()));
                tracing::warn!(
                    contract = %T::schema_name(),
                    index = idx,
                    %violation,
                    "dropping malformed record from page"
                );
                rejected.push((idx, violation));
            }
        }
    }

    Ok(PageOutcome {
        page: PaginatedResponse {
            items: kept,
            total,
            page,
            page_size,
            total_pages,
        },
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Post, Reaction};
    use serde_json::json;

    fn post(id: u64) -> Value {
        json!({
            "id": id,
            "thread_id": 2,
            "author_name": "alice",
            "content": "hi",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "upvotes": 0,
            "downvotes": 0
        })
    }

    fn page_of(items: Vec<Value>) -> Value {
        let total = items.len();
        json!({
            "items": items,
            "total": total,
            "page": 1,
            "page_size": 20,
            "total_pages": 1
        })
    }

    #[test]
    fn unparseable_text_is_a_root_violation() {
        let err = decode_str::<Post>("{not json").unwrap_err();
        assert!(err.path.is_root());
        assert_eq!(err.expected, "JSON document");
    }

    #[test]
    fn check_collects_every_structural_issue() {
        let mut value = post(1);
        let obj = value.as_object_mut().unwrap();
        obj.remove("content");
        obj.insert("upvotes".into(), json!("many"));
        let issues = check::<Post>(&value);
        assert_eq!(issues.len(), 2);
        let fields: Vec<_> = issues.iter().filter_map(|v| v.field()).collect();
        assert!(fields.contains(&"content"));
        assert!(fields.contains(&"upvotes"));
    }

    #[test]
    fn check_reports_field_rules_once_shape_is_sound() {
        let mut value = post(1);
        value["created_at"] = json!("not a time");
        let issues = check::<Post>(&value);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field(), Some("created_at"));
        assert!(check::<Post>(&post(1)).is_empty());
    }

    #[test]
    fn type_mismatch_names_expected_type() {
        let mut value = post(1);
        value["thread_id"] = json!("2");
        let err = decode::<Post>(&value).unwrap_err();
        assert_eq!(err.field(), Some("thread_id"));
        assert_eq!(err.expected, "integer");
        assert_eq!(err.actual, "string \"2\"");
    }

    #[test]
    fn enum_violation_lists_allowed_values() {
        let err = decode::<Reaction>(&json!({
            "id": 1,
            "post_id": 1,
            "reaction_type": "meh",
            "reactor_name": "x",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap_err();
        assert!(err.expected.contains("upvote") && err.expected.contains("downvote"));
    }

    #[test]
    fn response_policy_rejects_whole_page() {
        let mut bad = post(2);
        bad.as_object_mut().unwrap().remove("content");
        let value = page_of(vec![post(1), bad, post(3)]);
        let err = decode_page::<Post>(&value, RejectPolicy::Response).unwrap_err();
        assert_eq!(err.path.to_string(), "/items/1/content");
    }

    #[test]
    fn record_policy_drops_only_malformed_items() {
        let mut bad = post(2);
        bad["upvotes"] = json!(-1);
        let value = page_of(vec![post(1), bad, post(3)]);
        let outcome = decode_page::<Post>(&value, RejectPolicy::Record).unwrap();
        assert!(!outcome.is_clean());
        let ids: Vec<u64> = outcome.page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].0, 1);
        assert_eq!(outcome.rejected[0].1.path.to_string(), "/items/1/upvotes");
        assert_eq!(outcome.page.total, 3);
    }

    #[test]
    fn record_policy_on_sound_page_is_clean() {
        let value = page_of(vec![post(1), post(2)]);
        let outcome = decode_page::<Post>(&value, RejectPolicy::Record).unwrap();
        assert!(outcome.is_clean());
        assert_eq!(outcome.page.items.len(), 2);
    }

    #[test]
    fn record_policy_still_requires_a_valid_envelope() {
        let mut value = page_of(vec![post(1)]);
        value["total_pages"] = json!(7);
        let err = decode_page::<Post>(&value, RejectPolicy::Record).unwrap_err();
        assert_eq!(err.field(), Some("total_pages"));

        value.as_object_mut().unwrap().remove("page");
        let err = decode_page::<Post>(&value, RejectPolicy::Record).unwrap_err();
        assert_eq!(err.field(), Some("page"));
    }

    #[test]
    fn integer_fields_reject_fractional_and_oversized_numbers() {
        let mut value = post(1);
        value["upvotes"] = json!(1.0);
        let err = decode::<Post>(&value).unwrap_err();
        assert_eq!(err.field(), Some("upvotes"));
        assert_eq!(err.path.to_string(), "/upvotes");

        let mut value = post(1);
        value["id"] = serde_json::from_str("18446744073709551616").unwrap();
        assert_eq!(decode::<Post>(&value).unwrap_err().field(), Some("id"));

        let mut page = page_of(vec![post(1)]);
        page["total"] = json!(1.0);
        let err = decode_page::<Post>(&page, RejectPolicy::Record).unwrap_err();
        assert_eq!(err.field(), Some("total"));

        let mut bad = post(2);
        bad["downvotes"] = json!(0.5);
        let page = page_of(vec![post(1), bad]);
        let err = decode_page::<Post>(&page, RejectPolicy::Response).unwrap_err();
        assert_eq!(err.path.to_string(), "/items/1/downvotes");
    }

    #[test]
    fn encode_restores_the_wire_form() {
        let value = post(7);
        let record: Post = decode(&value).unwrap();
        assert_eq!(encode(&record).unwrap(), value);
    }

    #[test]
    fn validators_are_cached_per_contract() {
        let a = validator::<Post>();
        let b = validator::<Post>();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
