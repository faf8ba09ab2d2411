//! The filter resolver.
//!
//! [`FilterResolver`] walks a [`Filter`] and returns a new tree in which
//! dynamic variable leaves have been replaced by concrete values. The input is
//! never modified. Every key is classified once with [`FilterKey::classify`]
//! and its value is handled according to that class:
//!
//! - `_and` / `_or`: each child filter is resolved recursively.
//! - multi-value operators: the value is coerced to an array, each element is
//!   resolved as a leaf and array results are flattened one level.
//! - other operators: the value is resolved as a single leaf.
//! - fields: the value is resolved recursively as a nested filter.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::adjust::adjust_date;
use crate::context::{Accountability, ParseContext};
use crate::error::{json_type_name, Error, Result};
use crate::filter::{Filter, FilterKey};
use crate::variable::DynamicVariable;

/// Maximum nesting depth of filters accepted by the resolver.
pub const MAX_FILTER_DEPTH: usize = 64;

/// Resolves dynamic variables in filters for one accountability and context.
///
/// The instant substituted for `$NOW` is captured when the resolver is
/// created, so every `$NOW` token in a single call sees the same time.
#[derive(Debug, Clone)]
pub struct FilterResolver<'a> {
    accountability: Option<&'a Accountability>,
    context: &'a ParseContext,
    now: DateTime<Utc>,
}

impl<'a> FilterResolver<'a> {
    /// Create a resolver using the current time for `$NOW`.
    pub fn new(accountability: Option<&'a Accountability>, context: &'a ParseContext) -> Self {
        Self {
            accountability,
            context,
            now: Utc::now(),
        }
    }

    /// Use `now` instead of the current time for `$NOW`.
    #[must_use]
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// The instant substituted for `$NOW`.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Resolve a filter, returning `None` when there is no filter.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - an `_and` / `_or` value is not an array
    /// - a field value or logical group member is neither an object nor falsy
    ///   (`null`, `false`, `0`, `""`)
    /// - nesting exceeds [`MAX_FILTER_DEPTH`]
    pub fn resolve(&self, filter: Option<&Filter>) -> Result<Option<Filter>> {
        let Some(filter) = filter else {
            tracing::debug!("No filter to resolve");
            return Ok(None);
        };

        tracing::debug!(keys = filter.len(), now = %self.now, "Resolving filter");
        let resolved = self.resolve_map(filter.as_map(), 0)?;
        tracing::debug!("Filter resolved");

        Ok(Some(Filter::from(resolved)))
    }

    /// Resolve a single leaf value.
    ///
    /// Converts the literals `"true"`, `"false"`, `"null"` and `"NULL"`,
    /// substitutes dynamic variables and passes everything else through.
    pub fn resolve_value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => match s.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                "null" | "NULL" => Value::Null,
                token => match DynamicVariable::parse(token) {
                    Some(variable) => {
                        let resolved = self.substitute(variable);
                        tracing::trace!(token, value = %resolved, "Substituted dynamic variable");
                        resolved
                    }
                    None => value.clone(),
                },
            },
            other => other.clone(),
        }
    }

    fn resolve_map(&self, map: &Map<String, Value>, depth: usize) -> Result<Map<String, Value>> {
        if depth >= MAX_FILTER_DEPTH {
            return Err(Error::DepthExceeded(MAX_FILTER_DEPTH));
        }

        map.iter()
            .map(|(key, value)| {
                self.resolve_entry(FilterKey::classify(key), value, depth)
                    .map(|resolved| (key.clone(), resolved))
                    .map_err(|e| e.within(key))
            })
            .collect()
    }

    fn resolve_entry(&self, key: FilterKey<'_>, value: &Value, depth: usize) -> Result<Value> {
        match key {
            FilterKey::Logical(op) => {
                let Value::Array(children) = value else {
                    return Err(Error::malformed(format!(
                        "{op} expects an array of filters, found {}",
                        json_type_name(value)
                    )));
                };
                children
                    .iter()
                    .enumerate()
                    .map(|(index, child)| {
                        self.resolve_nested(child, depth)
                            .map_err(|e| e.within(&format!("[{index}]")))
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            FilterKey::MultiValue(_) => {
                let mut resolved = Vec::new();
                for item in to_array(value) {
                    match self.resolve_value(item) {
                        Value::Array(expanded) => resolved.extend(expanded),
                        single => resolved.push(single),
                    }
                }
                Ok(Value::Array(resolved))
            }
            FilterKey::Operator(_) => Ok(self.resolve_value(value)),
            FilterKey::Field(_) => self.resolve_nested(value, depth),
        }
    }

    fn resolve_nested(&self, value: &Value, depth: usize) -> Result<Value> {
        match value {
            falsy if is_falsy(falsy) => Ok(Value::Null),
            Value::Object(map) => self.resolve_map(map, depth + 1).map(Value::Object),
            other => Err(Error::malformed(format!(
                "expected a nested filter object, found {}",
                json_type_name(other)
            ))),
        }
    }

    fn substitute(&self, variable: DynamicVariable<'_>) -> Value {
        match variable {
            DynamicVariable::Now { adjustment } => {
                let instant = match adjustment {
                    Some(adjustment) => match adjust_date(self.now, adjustment) {
                        Ok(adjusted) => adjusted,
                        Err(e) => {
                            tracing::warn!(
                                adjustment,
                                error = %e,
                                "Ignoring unusable $NOW adjustment"
                            );
                            self.now
                        }
                    },
                    None => self.now,
                };
                Value::String(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            DynamicVariable::CurrentUser { context_path: None } => self
                .accountability
                .map_or(Value::Null, Accountability::user_value),
            DynamicVariable::CurrentRole { context_path: None } => self
                .accountability
                .map_or(Value::Null, Accountability::role_value),
            DynamicVariable::CurrentUser {
                context_path: Some(path),
            }
            | DynamicVariable::CurrentRole {
                context_path: Some(path),
            } => self.context.lookup(path),
        }
    }
}

/// `null`, `false`, zero and the empty string stand for "no filter".
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Treat an array as its elements and anything else as a single element.
fn to_array(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        single => std::slice::from_ref(single),
    }
}

/// Resolve dynamic variables in `filter`.
///
/// Shorthand for [`FilterResolver::new`] followed by
/// [`FilterResolver::resolve`].
pub fn parse_filter(
    filter: Option<&Filter>,
    accountability: Option<&Accountability>,
    context: &ParseContext,
) -> Result<Option<Filter>> {
    FilterResolver::new(accountability, context).resolve(filter)
}
