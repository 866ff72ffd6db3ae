//! Structural validation of workflow graphs

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::WorkflowDefinition;
use super::graph::has_cycle;
use super::node_types::NodeType;

/// Closed set of structural violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorCode {
    MissingUserQuery,
    MultipleUserQuery,
    MissingOutput,
    MultipleOutput,
    NoProcessing,
    DisconnectedUserQuery,
    DisconnectedOutput,
    OrphanNode,
    CycleDetected,
}

impl ValidationErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingUserQuery => "MISSING_USER_QUERY",
            Self::MultipleUserQuery => "MULTIPLE_USER_QUERY",
            Self::MissingOutput => "MISSING_OUTPUT",
            Self::MultipleOutput => "MULTIPLE_OUTPUT",
            Self::NoProcessing => "NO_PROCESSING",
            Self::DisconnectedUserQuery => "DISCONNECTED_USER_QUERY",
            Self::DisconnectedOutput => "DISCONNECTED_OUTPUT",
            Self::OrphanNode => "ORPHAN_NODE",
            Self::CycleDetected => "CYCLE_DETECTED",
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structural violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub code: ValidationErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

impl ValidationError {
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            node_id: None,
        }
    }

    pub fn for_node(
        code: ValidationErrorCode,
        message: impl Into<String>,
        node_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            node_id: Some(node_id.into()),
        }
    }
}

/// Outcome of validating a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowValidation {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<ValidationError>,
}

impl WorkflowValidation {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn codes(&self) -> Vec<ValidationErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }

    /// Messages joined with "; "
    pub fn joined_messages(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Check a workflow's structure.
///
/// Every rule is evaluated and all violations are returned. The cycle check
/// only runs once every other rule has passed.
pub fn validate(workflow: &WorkflowDefinition) -> WorkflowValidation {
    use ValidationErrorCode::*;

    let mut errors = Vec::new();

    match workflow.count_of(NodeType::UserQuery) {
        0 => errors.push(ValidationError::new(
            MissingUserQuery,
            "Workflow must have a User Query component as entry point",
        )),
        1 => {}
        _ => errors.push(ValidationError::new(
            MultipleUserQuery,
            "Workflow can only have one User Query component",
        )),
    }

    match workflow.count_of(NodeType::Output) {
        0 => errors.push(ValidationError::new(
            MissingOutput,
            "Workflow must have an Output component",
        )),
        1 => {}
        _ => errors.push(ValidationError::new(
            MultipleOutput,
            "Workflow can only have one Output component",
        )),
    }

    if !workflow.nodes().iter().any(|n| n.node_type().is_processing()) {
        errors.push(ValidationError::new(
            NoProcessing,
            "Workflow must have at least one LLM Engine or Knowledge Base component",
        ));
    }

    let has_outgoing: HashSet<&str> = workflow.edges().iter().map(|e| e.source.as_str()).collect();
    let has_incoming: HashSet<&str> = workflow.edges().iter().map(|e| e.target.as_str()).collect();

    for node in workflow.nodes() {
        let id = node.id();

        match node.node_type() {
            NodeType::UserQuery if !has_outgoing.contains(id) => {
                errors.push(ValidationError::for_node(
                    DisconnectedUserQuery,
                    "User Query must be connected to next component",
                    id,
                ));
            }
            NodeType::Output if !has_incoming.contains(id) => {
                errors.push(ValidationError::for_node(
                    DisconnectedOutput,
                    "Output must receive input from a component",
                    id,
                ));
            }
            NodeType::KnowledgeBase | NodeType::LlmEngine
                if !has_incoming.contains(id) && !has_outgoing.contains(id) =>
            {
                errors.push(ValidationError::for_node(
                    OrphanNode,
                    format!("Component '{}' is not connected", node.label()),
                    id,
                ));
            }
            _ => {}
        }
    }

    if errors.is_empty() && has_cycle(workflow) {
        errors.push(ValidationError::new(
            CycleDetected,
            "Workflow cannot contain cycles",
        ));
    }

    WorkflowValidation::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::ValidationErrorCode::*;
    use super::*;
    use crate::domain::workflow::entity::{Edge, Node};
    use crate::domain::workflow::node_types::{KnowledgeBaseConfig, LlmEngineConfig};
    use serde_json::json;

    fn kb(id: &str) -> Node {
        Node::knowledge_base(id, KnowledgeBaseConfig::new())
    }

    fn llm(id: &str) -> Node {
        Node::llm_engine(id, LlmEngineConfig::new())
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
        pairs.iter().map(|(s, t)| Edge::new(*s, *t)).collect()
    }

    fn definition(nodes: Vec<Node>, pairs: &[(&str, &str)]) -> WorkflowDefinition {
        WorkflowDefinition::new(nodes, edges(pairs)).unwrap()
    }

    #[test]
    fn test_retrieval_pipeline_is_valid() {
        let wf = definition(
            vec![Node::user_query("Q"), kb("K"), Node::output("O")],
            &[("Q", "K"), ("K", "O")],
        );

        let result = validate(&wf);
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_unconnected_output() {
        let wf = definition(
            vec![Node::user_query("Q"), llm("L"), Node::output("O")],
            &[("Q", "L")],
        );

        let result = validate(&wf);
        assert!(!result.valid);
        assert_eq!(result.codes(), vec![DisconnectedOutput]);
        assert_eq!(result.errors[0].node_id.as_deref(), Some("O"));
    }

    #[test]
    fn test_cycle_reported_alone() {
        let wf = definition(
            vec![Node::user_query("Q"), llm("L1"), llm("L2"), Node::output("O")],
            &[("Q", "L1"), ("L1", "L2"), ("L2", "L1"), ("L2", "O")],
        );

        let result = validate(&wf);
        assert_eq!(result.codes(), vec![CycleDetected]);
        assert_eq!(result.errors[0].message, "Workflow cannot contain cycles");
        assert!(result.errors[0].node_id.is_none());
    }

    #[test]
    fn test_cycle_not_checked_when_structure_invalid() {
        let wf = definition(
            vec![Node::user_query("Q"), llm("L1"), llm("L2")],
            &[("Q", "L1"), ("L1", "L2"), ("L2", "L1")],
        );

        assert_eq!(validate(&wf).codes(), vec![MissingOutput]);
    }

    #[test]
    fn test_empty_workflow_collects_all_errors() {
        let wf = definition(vec![], &[]);

        assert_eq!(
            validate(&wf).codes(),
            vec![MissingUserQuery, MissingOutput, NoProcessing]
        );
    }

    #[test]
    fn test_missing_user_query() {
        let wf = definition(vec![kb("K"), Node::output("O")], &[("K", "O")]);

        let result = validate(&wf);
        assert!(result.codes().contains(&MissingUserQuery));
        assert_eq!(
            result.errors[0].message,
            "Workflow must have a User Query component as entry point"
        );
    }

    #[test]
    fn test_multiple_entry_and_exit_nodes() {
        let wf = definition(
            vec![
                Node::user_query("Q1"),
                Node::user_query("Q2"),
                kb("K"),
                Node::output("O1"),
                Node::output("O2"),
            ],
            &[("Q1", "K"), ("Q2", "K"), ("K", "O1"), ("K", "O2")],
        );

        assert_eq!(validate(&wf).codes(), vec![MultipleUserQuery, MultipleOutput]);
    }

    #[test]
    fn test_no_processing_node() {
        let wf = definition(
            vec![Node::user_query("Q"), Node::output("O")],
            &[("Q", "O")],
        );

        assert_eq!(validate(&wf).codes(), vec![NoProcessing]);
    }

    #[test]
    fn test_orphan_message_uses_label() {
        let wf = definition(
            vec![
                Node::user_query("Q"),
                kb("K"),
                llm("L").with_label("Summarizer"),
                Node::output("O"),
            ],
            &[("Q", "K"), ("K", "O")],
        );

        let result = validate(&wf);
        assert_eq!(result.codes(), vec![OrphanNode]);
        assert_eq!(result.errors[0].message, "Component 'Summarizer' is not connected");
        assert_eq!(result.errors[0].node_id.as_deref(), Some("L"));
    }

    #[test]
    fn test_processing_node_with_one_side_connected_is_not_orphan() {
        let wf = definition(
            vec![Node::user_query("Q"), kb("K"), llm("L"), Node::output("O")],
            &[("Q", "K"), ("Q", "L"), ("K", "O")],
        );

        assert!(validate(&wf).valid);
    }

    #[test]
    fn test_connectivity_errors_in_declaration_order() {
        let wf = definition(
            vec![Node::output("O"), llm("L"), Node::user_query("Q")],
            &[],
        );

        assert_eq!(
            validate(&wf).codes(),
            vec![DisconnectedOutput, OrphanNode, DisconnectedUserQuery]
        );
    }

    #[test]
    fn test_dangling_edge_target_is_tolerated() {
        let wf = definition(
            vec![Node::user_query("Q"), kb("K"), Node::output("O")],
            &[("Q", "ghost"), ("K", "O")],
        );

        assert!(validate(&wf).valid);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let wf = definition(
            vec![llm("L"), Node::output("O"), Node::output("O2")],
            &[("L", "L")],
        );

        let first = validate(&wf);
        for _ in 0..10 {
            assert_eq!(validate(&wf), first);
        }
    }

    #[test]
    fn test_joined_messages() {
        let wf = definition(vec![], &[]);

        assert_eq!(
            validate(&wf).joined_messages(),
            "Workflow must have a User Query component as entry point; \
             Workflow must have an Output component; \
             Workflow must have at least one LLM Engine or Knowledge Base component"
        );
    }

    #[test]
    fn test_serialization() {
        let wf = definition(
            vec![Node::user_query("Q"), llm("L"), Node::output("O")],
            &[("Q", "L")],
        );

        assert_eq!(
            serde_json::to_value(validate(&wf)).unwrap(),
            json!({
                "valid": false,
                "errors": [{
                    "code": "DISCONNECTED_OUTPUT",
                    "message": "Output must receive input from a component",
                    "nodeId": "O"
                }]
            })
        );
    }
}
