use itertools::Itertools;
use serde_json::{Map, Value};

use crate::{coerce, error::UpdateError, schema::Mapping};

/// String form used for change detection on both sides of a comparison.
/// Numeric and string values that render identically never force an update.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolves a leaf mapping against the response. `None` means the response
/// carries no usable data for this field; absent keys and empty strings are
/// both "no data".
fn remote_value(mapping: &Mapping, response: &Map<String, Value>) -> Option<String> {
    match mapping {
        Mapping::Direct(key) => scalar(response.get(*key)),
        Mapping::Indexed(outer, inner) => {
            scalar(response.get(*outer).and_then(|nested| nested.get(*inner)))
        }
        // all keys or nothing; never a partial join
        Mapping::Composite(keys) => keys
            .iter()
            .map(|key| response.get(*key).map(stringify))
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.iter().join(".")),
        Mapping::NoSource | Mapping::Nested(_) => None,
    }
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::Null) | None => None,
        Some(value) => Some(stringify(value)),
    }
}

/// Default shape for a nested branch: every leaf null. Old records store a
/// bare null where new ones store an object of nulls; this is the migration
/// shim for them.
fn null_object(children: &[(&'static str, Mapping)]) -> Map<String, Value> {
    children
        .iter()
        .map(|(field, child)| {
            let value = match child {
                Mapping::Nested(inner) => Value::Object(null_object(inner)),
                _ => Value::Null,
            };
            ((*field).to_string(), value)
        })
        .collect()
}

/// Walks the schema and the record substructure in parallel and returns an
/// updated copy. Per leaf: a differing remote value overwrites (coerced per
/// the field policy), a missing remote value nulls the field, an equal one
/// leaves it alone. `original` is the unmerged top-level substructure, the
/// fallback lookup once recursion has rebound `current` below it.
///
/// Re-running with the same response is a no-op.
pub fn reconcile(
    schema: &Mapping,
    current: &Map<String, Value>,
    response: &Map<String, Value>,
    original: &Map<String, Value>,
) -> Result<Map<String, Value>, UpdateError> {
    let Mapping::Nested(children) = schema else {
        return Err(UpdateError::SchemaMismatch(
            "expected a nested mapping at the root".to_string(),
        ));
    };

    let mut updated = current.clone();
    for (field, child) in children {
        match child {
            Mapping::Nested(inner) => match updated.get(*field) {
                Some(Value::Object(nested)) => {
                    let merged = reconcile(child, nested, response, original)?;
                    updated.insert((*field).to_string(), Value::Object(merged));
                }
                Some(Value::Null) => {
                    let merged = reconcile(child, &null_object(inner), response, original)?;
                    updated.insert((*field).to_string(), Value::Object(merged));
                }
                Some(_) => {
                    return Err(UpdateError::SchemaMismatch(format!(
                        "expected an object at {field}"
                    )))
                }
                // absent nested fields are left untouched, never defaulted in
                None => {}
            },
            leaf => {
                let local = match updated.get(*field).or_else(|| original.get(*field)) {
                    Some(value) => stringify(value),
                    None => {
                        return Err(UpdateError::SchemaMismatch(format!("missing field {field}")))
                    }
                };

                match remote_value(leaf, response) {
                    Some(remote) if local != remote => {
                        let value = coerce::apply(field, &remote)?;
                        updated.insert((*field).to_string(), value);
                    }
                    Some(_) => {}
                    None => {
                        updated.insert((*field).to_string(), Value::Null);
                    }
                }
            }
        }
    }

    Ok(updated)
}
