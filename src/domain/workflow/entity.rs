//! Workflow graph entities

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::WorkflowError;
use super::node_types::{KnowledgeBaseConfig, LlmEngineConfig, NodeKind, NodeType};

/// Editor canvas position, carried through untouched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A typed node in the workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct Node {
    id: String,
    label: String,
    kind: NodeKind,
    position: Option<Position>,
}

impl Node {
    /// Create a node labelled with its own id
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            kind,
            position: None,
        }
    }

    pub fn user_query(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::UserQuery)
    }

    pub fn knowledge_base(id: impl Into<String>, config: KnowledgeBaseConfig) -> Self {
        Self::new(id, NodeKind::KnowledgeBase(config))
    }

    pub fn llm_engine(id: impl Into<String>, config: LlmEngineConfig) -> Self {
        Self::new(id, NodeKind::LlmEngine(config))
    }

    pub fn output(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Output)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }
}

/// Wire shape of a node.
///
/// Accepts both the flat `{id, type, label, config}` form and the graph editor
/// form where label, type and config live under `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    id: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    node_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,

    #[serde(default, skip_serializing)]
    data: Option<RawNodeData>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawNodeData {
    #[serde(default)]
    label: Option<String>,

    #[serde(rename = "type", default)]
    node_type: Option<String>,

    #[serde(default)]
    config: Option<Value>,
}

impl TryFrom<RawNode> for Node {
    type Error = WorkflowError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let (node_type, label, config) = match raw.data {
            Some(data) => (
                data.node_type.or(raw.node_type),
                data.label.or(raw.label),
                data.config.or(raw.config),
            ),
            None => (raw.node_type, raw.label, raw.config),
        };

        let node_type = node_type.ok_or_else(|| {
            WorkflowError::invalid_definition(format!("Node '{}' is missing a type", raw.id))
        })?;

        let node_type: NodeType = node_type.parse().map_err(|_| {
            WorkflowError::invalid_definition(format!(
                "Node '{}' has unknown type '{}'",
                raw.id, node_type
            ))
        })?;

        let kind = NodeKind::from_config(node_type, config).map_err(|e| {
            WorkflowError::invalid_definition(format!(
                "Node '{}' has invalid config: {}",
                raw.id,
                detail(&e)
            ))
        })?;

        let label = label
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| raw.id.clone());

        Ok(Self {
            id: raw.id,
            label,
            kind,
            position: raw.position,
        })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        Self {
            node_type: Some(node.node_type().as_str().to_string()),
            config: node.kind.config_value(),
            id: node.id,
            label: Some(node.label),
            position: node.position,
            data: None,
        }
    }
}

fn detail(error: &WorkflowError) -> String {
    match error {
        WorkflowError::InvalidDefinition(message) => message.clone(),
        other => other.to_string(),
    }
}

/// A directed data-flow connection between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub source: String,

    pub target: String,

    #[serde(default, alias = "source_handle", skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    #[serde(default, alias = "target_handle", skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_handles(
        mut self,
        source_handle: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        self.source_handle = Some(source_handle.into());
        self.target_handle = Some(target_handle.into());
        self
    }
}

/// A workflow graph: ordered nodes and ordered edges.
///
/// Node ids are unique. Edges may reference ids that are not in the node list;
/// the validator reports the resulting disconnection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDefinition")]
pub struct WorkflowDefinition {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

#[derive(Deserialize)]
struct RawDefinition {
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl TryFrom<RawDefinition> for WorkflowDefinition {
    type Error = WorkflowError;

    fn try_from(raw: RawDefinition) -> Result<Self, Self::Error> {
        Self::new(raw.nodes, raw.edges)
    }
}

impl WorkflowDefinition {
    /// Create a definition, rejecting duplicate node ids
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, WorkflowError> {
        let mut seen = HashSet::with_capacity(nodes.len());

        for node in &nodes {
            if !seen.insert(node.id()) {
                return Err(WorkflowError::invalid_definition(format!(
                    "Duplicate node id '{}'",
                    node.id()
                )));
            }
        }

        Ok(Self { nodes, edges })
    }

    /// Parse a definition from JSON
    pub fn from_json(json: &str) -> Result<Self, WorkflowError> {
        serde_json::from_str(json).map_err(|e| WorkflowError::invalid_definition(e.to_string()))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of nodes of the given type
    pub fn count_of(&self, node_type: NodeType) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.node_type() == node_type)
            .count()
    }
}
