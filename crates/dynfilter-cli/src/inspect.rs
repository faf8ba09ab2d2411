//! Key classification report for `dynfilter inspect`.

use dynfilter::{Filter, FilterKey};
use serde::Serialize;
use serde_json::{Map, Value};

/// One key of a filter, with how the resolver treats it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectNode {
    /// The key, or `[n]` for members of a logical group.
    pub key: String,
    /// Classification of the key.
    pub kind: &'static str,
    /// Leaf value for operator keys (and non-object field values).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Dynamic variable tokens in `value`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dynamic: Vec<String>,
    /// Nested keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<InspectNode>,
}

/// Full inspection report for a filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    /// Every dynamic variable token, in document order.
    pub dynamic_variables: Vec<String>,
    /// Classified key tree.
    pub keys: Vec<InspectNode>,
}

impl InspectReport {
    /// Build the report for `filter`.
    pub fn new(filter: &Filter) -> Self {
        Self {
            dynamic_variables: filter.dynamic_variables(),
            keys: classify_map(filter.as_map()),
        }
    }
}

fn classify_map(map: &Map<String, Value>) -> Vec<InspectNode> {
    map.iter().map(|(key, value)| classify_entry(key, value)).collect()
}

fn classify_entry(key: &str, value: &Value) -> InspectNode {
    let class = FilterKey::classify(key);
    let mut node = InspectNode {
        key: key.to_string(),
        kind: class.kind(),
        value: None,
        dynamic: Vec::new(),
        children: Vec::new(),
    };

    match (class, value) {
        (FilterKey::Logical(_), Value::Array(members)) => {
            node.children = members
                .iter()
                .enumerate()
                .map(|(index, member)| group_member(index, member))
                .collect();
        }
        (FilterKey::Field(_), Value::Object(nested)) => {
            node.children = classify_map(nested);
        }
        (FilterKey::MultiValue(_) | FilterKey::Operator(_), leaf) => {
            node.dynamic = class.leaf_variables(leaf);
            node.value = Some(leaf.clone());
        }
        (_, other) => node.value = Some(other.clone()),
    }

    node
}

fn group_member(index: usize, member: &Value) -> InspectNode {
    let (value, children) = match member {
        Value::Object(nested) => (None, classify_map(nested)),
        other => (Some(other.clone()), Vec::new()),
    };
    InspectNode {
        key: format!("[{index}]"),
        kind: "group member",
        value,
        dynamic: Vec::new(),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_classifies_every_key() {
        let filter = Filter::from_value(json!({
            "_or": [
                {"owner": {"_eq": "$CURRENT_USER"}},
                {"tags": {"_in": ["a", "$CURRENT_ROLE"]}}
            ]
        }))
        .unwrap();

        let report = InspectReport::new(&filter);

        assert_eq!(report.dynamic_variables, vec!["$CURRENT_USER", "$CURRENT_ROLE"]);
        assert_eq!(report.keys.len(), 1);

        let or = &report.keys[0];
        assert_eq!(or.kind, "logical");
        assert_eq!(or.children.len(), 2);
        assert_eq!(or.children[0].key, "[0]");

        let owner = &or.children[0].children[0];
        assert_eq!((owner.key.as_str(), owner.kind), ("owner", "field"));
        let eq = &owner.children[0];
        assert_eq!(eq.kind, "operator");
        assert_eq!(eq.dynamic, vec!["$CURRENT_USER"]);

        let tags_in = &or.children[1].children[0].children[0];
        assert_eq!(tags_in.kind, "multi-value operator");
        assert_eq!(tags_in.value, Some(json!(["a", "$CURRENT_ROLE"])));
        assert_eq!(tags_in.dynamic, vec!["$CURRENT_ROLE"]);
    }

    #[test]
    fn operator_arrays_are_not_flagged_as_dynamic() {
        let filter = Filter::from_value(json!({
            "tags": {"_contains": ["$CURRENT_USER"], "_in": ["$CURRENT_ROLE"]}
        }))
        .unwrap();

        let report = InspectReport::new(&filter);
        let tags = &report.keys[0];
        let contains = &tags.children[0];
        let within = &tags.children[1];

        assert_eq!(contains.value, Some(json!(["$CURRENT_USER"])));
        assert!(contains.dynamic.is_empty());
        assert_eq!(within.dynamic, vec!["$CURRENT_ROLE"]);

        let flagged: Vec<&String> = tags.children.iter().flat_map(|n| &n.dynamic).collect();
        assert_eq!(flagged, report.dynamic_variables.iter().collect::<Vec<_>>());
    }

    #[test]
    fn report_serializes_without_empty_sections() {
        let filter = Filter::from_value(json!({"status": {"_eq": "draft"}})).unwrap();
        let json = serde_json::to_value(InspectReport::new(&filter)).unwrap();

        assert_eq!(
            json,
            json!({
                "dynamic_variables": [],
                "keys": [{
                    "key": "status",
                    "kind": "field",
                    "children": [{"key": "_eq", "kind": "operator", "value": "draft"}]
                }]
            })
        );
    }
}
