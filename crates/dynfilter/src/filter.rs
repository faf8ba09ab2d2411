//! Filter data model and key classification.
//!
//! A [`Filter`] is a JSON object. Every key falls into exactly one
//! [`FilterKey`] class, and that class decides how the key's value is walked:
//!
//! | key                                   | class        | value                     |
//! |---------------------------------------|--------------|---------------------------|
//! | `_and`, `_or`                         | `Logical`    | array of child filters    |
//! | `_in`, `_nin`, `_between`, `_nbetween`| `MultiValue` | array (or scalar) of leaves |
//! | any other `_`-prefixed key            | `Operator`   | single leaf               |
//! | anything else                         | `Field`      | nested filter             |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{json_type_name, Error, Result};
use crate::variable::is_dynamic_variable;

/// Operators whose right-hand side is a set or range of values.
pub const MULTI_VALUE_OPERATORS: [&str; 4] = ["_in", "_nin", "_between", "_nbetween"];

/// Boolean combinator over a sequence of child filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    /// Every child filter must match.
    And,
    /// At least one child filter must match.
    Or,
}

impl LogicalOperator {
    /// The reserved key for this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "_and",
            Self::Or => "_or",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single filter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey<'a> {
    /// `_and` / `_or`.
    Logical(LogicalOperator),
    /// One of [`MULTI_VALUE_OPERATORS`].
    MultiValue(&'a str),
    /// Any other operator key (`_eq`, `_gte`, `_contains`, ...).
    Operator(&'a str),
    /// A field name; its value is a nested filter.
    Field(&'a str),
}

impl<'a> FilterKey<'a> {
    /// Classify a key, most specific class first.
    ///
    /// ```
    /// use dynfilter::{FilterKey, LogicalOperator};
    ///
    /// assert_eq!(FilterKey::classify("_or"), FilterKey::Logical(LogicalOperator::Or));
    /// assert_eq!(FilterKey::classify("_nin"), FilterKey::MultiValue("_nin"));
    /// assert_eq!(FilterKey::classify("_eq"), FilterKey::Operator("_eq"));
    /// assert_eq!(FilterKey::classify("title"), FilterKey::Field("title"));
    /// ```
    pub fn classify(key: &'a str) -> Self {
        match key {
            "_and" => Self::Logical(LogicalOperator::And),
            "_or" => Self::Logical(LogicalOperator::Or),
            k if MULTI_VALUE_OPERATORS.contains(&k) => Self::MultiValue(k),
            k if k.starts_with('_') => Self::Operator(k),
            k => Self::Field(k),
        }
    }

    /// Short human-readable name of the class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Logical(_) => "logical",
            Self::MultiValue(_) => "multi-value operator",
            Self::Operator(_) => "operator",
            Self::Field(_) => "field",
        }
    }

    /// Dynamic variable tokens the resolver substitutes in `value` when it is
    /// held by this key.
    ///
    /// Multi-value operators are scanned element by element. Other operators
    /// hold a single leaf, so an array under `_contains` is never scanned.
    /// Logical and field keys hold filters, not leaves, and yield nothing.
    ///
    /// ```
    /// use dynfilter::FilterKey;
    /// use serde_json::json;
    ///
    /// let tokens = json!(["$CURRENT_USER", "x"]);
    /// assert_eq!(FilterKey::classify("_in").leaf_variables(&tokens), vec!["$CURRENT_USER"]);
    /// assert!(FilterKey::classify("_contains").leaf_variables(&tokens).is_empty());
    /// ```
    pub fn leaf_variables(&self, value: &Value) -> Vec<String> {
        let mut found = Vec::new();
        match self {
            Self::MultiValue(_) => match value {
                Value::Array(items) => {
                    for item in items {
                        push_variable(item, &mut found);
                    }
                }
                leaf => push_variable(leaf, &mut found),
            },
            Self::Operator(_) => push_variable(value, &mut found),
            Self::Logical(_) | Self::Field(_) => {}
        }
        found
    }
}

/// A nested filter tree.
///
/// Serializes transparently as the underlying JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a filter from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the filter, returning it as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the filter has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every dynamic variable token in the tree, in document order.
    ///
    /// Only positions the resolver would substitute are reported: values
    /// under operator keys and elements of multi-value operators.
    pub fn dynamic_variables(&self) -> Vec<String> {
        let mut found = Vec::new();
        collect_variables(&self.0, &mut found);
        found
    }
}

fn collect_variables(map: &Map<String, Value>, found: &mut Vec<String>) {
    for (key, value) in map {
        let class = FilterKey::classify(key);
        match class {
            FilterKey::Logical(_) => {
                if let Value::Array(children) = value {
                    for child in children {
                        if let Value::Object(child) = child {
                            collect_variables(child, found);
                        }
                    }
                }
            }
            FilterKey::Field(_) => {
                if let Value::Object(nested) = value {
                    collect_variables(nested, found);
                }
            }
            FilterKey::MultiValue(_) | FilterKey::Operator(_) => {
                found.extend(class.leaf_variables(value));
            }
        }
    }
}

fn push_variable(value: &Value, found: &mut Vec<String>) {
    if let Value::String(token) = value
        && is_dynamic_variable(value)
    {
        found.push(token.clone());
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(s)?)
    }
}

impl TryFrom<Value> for Filter {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<Map<String, Value>> for Filter {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Filter> for Value {
    fn from(filter: Filter) -> Self {
        filter.into_value()
    }
}
