//! Per-execution data context
//!
//! Holds the output of every completed node for the lifetime of a single run and
//! assembles each node's inputs from its upstream outputs.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Key/value map a node consumes or produces
pub type NodeData = Map<String, Value>;

/// Execution context holding the user query and completed node outputs
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Query the run was started with
    query: String,

    /// Outputs from completed nodes, keyed by node id
    node_outputs: HashMap<String, NodeData>,
}

impl ExecutionContext {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            node_outputs: HashMap::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_node_output(&mut self, node_id: impl Into<String>, output: NodeData) {
        self.node_outputs.insert(node_id.into(), output);
    }

    pub fn get_node_output(&self, node_id: &str) -> Option<&NodeData> {
        self.node_outputs.get(node_id)
    }

    pub fn completed_count(&self) -> usize {
        self.node_outputs.len()
    }

    /// Build a node's inputs.
    ///
    /// Starts from `{query}` and merges the output of each upstream node that has
    /// already completed, in the order given. Later sources overwrite keys set by
    /// earlier ones.
    pub fn gather_inputs<'a, I>(&self, sources: I) -> NodeData
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut inputs = NodeData::new();
        inputs.insert("query".to_string(), Value::String(self.query.clone()));

        for source in sources {
            if let Some(output) = self.node_outputs.get(source) {
                for (key, value) in output {
                    inputs.insert(key.clone(), value.clone());
                }
            }
        }

        inputs
    }
}

/// First of `keys` present in `data` with a non-null value
pub fn first_present<'a>(data: &'a NodeData, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| data.get(*key))
        .find(|value| !value.is_null())
}

/// String value of `key`, or `""` when absent or not a string
pub fn str_field<'a>(data: &'a NodeData, key: &str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Render a value as text; strings are taken verbatim, other values as JSON
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
