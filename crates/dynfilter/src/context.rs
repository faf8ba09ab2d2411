//! Caller-supplied identity and lookup context.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lookup::get_in_map;
use crate::variable::{CURRENT_ROLE, CURRENT_USER};

/// The identity under which a filter is evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accountability {
    /// Identifier of the current user, if any.
    #[serde(default)]
    pub user: Option<String>,

    /// Identifier of the current role, if any.
    #[serde(default)]
    pub role: Option<String>,
}

impl Accountability {
    /// Create an accountability record.
    pub fn new(user: Option<&str>, role: Option<&str>) -> Self {
        Self {
            user: user.map(str::to_string),
            role: role.map(str::to_string),
        }
    }

    /// `user` as a JSON value, `null` when unset.
    pub(crate) fn user_value(&self) -> Value {
        self.user.clone().map_or(Value::Null, Value::String)
    }

    /// `role` as a JSON value, `null` when unset.
    pub(crate) fn role_value(&self) -> Value {
        self.role.clone().map_or(Value::Null, Value::String)
    }
}

/// Extended records that dotted variables such as
/// `$CURRENT_USER.department.id` are looked up in.
///
/// Keys are variable names (`$CURRENT_USER`, `$CURRENT_ROLE`); values are
/// arbitrary JSON records. Serializes transparently as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParseContext(Map<String, Value>);

impl ParseContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `$CURRENT_USER` record.
    #[must_use]
    pub fn with_current_user(mut self, record: Value) -> Self {
        self.0.insert(CURRENT_USER.to_string(), record);
        self
    }

    /// Set the `$CURRENT_ROLE` record.
    #[must_use]
    pub fn with_current_role(mut self, record: Value) -> Self {
        self.0.insert(CURRENT_ROLE.to_string(), record);
        self
    }

    /// Insert or replace an entry, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, record: Value) -> Option<Value> {
        self.0.insert(key.into(), record)
    }

    /// Merge `other` into this context; entries in `other` win.
    pub fn extend(&mut self, other: ParseContext) {
        self.0.extend(other.0);
    }

    /// The `$CURRENT_USER` record, if present.
    pub fn current_user(&self) -> Option<&Value> {
        self.0.get(CURRENT_USER)
    }

    /// The `$CURRENT_ROLE` record, if present.
    pub fn current_role(&self) -> Option<&Value> {
        self.0.get(CURRENT_ROLE)
    }

    /// Whether the context has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a dotted path such as `$CURRENT_USER.department.id`.
    ///
    /// Missing entries resolve to `null`.
    pub fn lookup(&self, path: &str) -> Value {
        get_in_map(&self.0, path, Value::Null)
    }
}

impl From<Map<String, Value>> for ParseContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
