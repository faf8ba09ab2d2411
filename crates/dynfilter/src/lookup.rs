//! Dotted-path lookup over JSON values.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// Walk `path` (dot-separated) through `object`.
///
/// Arrays broadcast: indexing an array by a segment indexes every element and
/// collects the results, so `teams.id` over `{"teams": [{"id": 1}, {"id": 2}]}`
/// yields `[1, 2]`. Missing keys never fail; when the final result is missing
/// or `null`, `default` is returned instead.
///
/// ```
/// use dynfilter::get;
/// use serde_json::{json, Value};
///
/// let user = json!({"department": {"id": 7}, "teams": [{"id": 1}, {"id": 2}]});
/// assert_eq!(get(&user, "department.id", Value::Null), json!(7));
/// assert_eq!(get(&user, "teams.id", Value::Null), json!([1, 2]));
/// assert_eq!(get(&user, "manager.id", json!("n/a")), json!("n/a"));
/// ```
pub fn get(object: &Value, path: &str, default: Value) -> Value {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    finish(walk(step(Cow::Borrowed(object), first), segments), default)
}

/// Same as [`get`], rooted at a JSON object rather than a value.
pub(crate) fn get_in_map(map: &Map<String, Value>, path: &str, default: Value) -> Value {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    let start = map.get(first).map(Cow::Borrowed);
    finish(walk(start, segments), default)
}

fn walk<'a, 's>(
    mut current: Option<Cow<'a, Value>>,
    segments: impl Iterator<Item = &'s str>,
) -> Option<Cow<'a, Value>> {
    for segment in segments {
        current = step(current?, segment);
    }
    current
}

fn step<'a>(current: Cow<'a, Value>, key: &str) -> Option<Cow<'a, Value>> {
    match current {
        Cow::Borrowed(Value::Object(map)) => map.get(key).map(Cow::Borrowed),
        Cow::Owned(Value::Object(mut map)) => map.remove(key).map(Cow::Owned),
        Cow::Borrowed(Value::Array(items)) => Some(Cow::Owned(broadcast(items, key))),
        Cow::Owned(Value::Array(items)) => Some(Cow::Owned(broadcast(&items, key))),
        _ => None,
    }
}

fn broadcast(items: &[Value], key: &str) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| match item {
                Value::Object(map) => map.get(key).cloned().unwrap_or(Value::Null),
                _ => Value::Null,
            })
            .collect(),
    )
}

fn finish(result: Option<Cow<'_, Value>>, default: Value) -> Value {
    match result {
        Some(value) if !value.is_null() => value.into_owned(),
        _ => default,
    }
}
