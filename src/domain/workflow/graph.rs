//! Graph algorithms over a workflow definition

use std::collections::{HashMap, HashSet, VecDeque};

use super::entity::{Node, WorkflowDefinition};

/// Outgoing adjacency in edge declaration order
fn successors(workflow: &WorkflowDefinition) -> HashMap<&str, Vec<&str>> {
    let mut graph: HashMap<&str, Vec<&str>> = HashMap::new();

    for edge in workflow.edges() {
        graph
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    graph
}

/// Incoming adjacency: target id -> source ids, in edge declaration order
pub fn predecessors(workflow: &WorkflowDefinition) -> HashMap<&str, Vec<&str>> {
    let mut graph: HashMap<&str, Vec<&str>> = HashMap::new();

    for edge in workflow.edges() {
        graph
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }

    graph
}

/// Whether the graph contains a directed cycle.
///
/// Depth-first search started from every unvisited node in declaration order, so
/// cyclic fragments unreachable from the entry node are still found. Uses an
/// explicit stack of `(node, next successor index)` frames.
pub fn has_cycle(workflow: &WorkflowDefinition) -> bool {
    let graph = successors(workflow);
    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();

    for node in workflow.nodes() {
        let start = node.id();
        if visited.contains(start) {
            continue;
        }

        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        visited.insert(start);
        on_stack.insert(start);

        while let Some(frame) = stack.last_mut() {
            let (current, index) = *frame;
            let neighbors = graph.get(current).map(Vec::as_slice).unwrap_or(&[]);

            match neighbors.get(index) {
                Some(&next) => {
                    frame.1 += 1;

                    if on_stack.contains(next) {
                        return true;
                    }

                    if visited.insert(next) {
                        on_stack.insert(next);
                        stack.push((next, 0));
                    }
                }
                None => {
                    on_stack.remove(current);
                    stack.pop();
                }
            }
        }
    }

    false
}

/// Execution order via Kahn's algorithm.
///
/// Roots are queued in declaration order; nodes unlocked during traversal are
/// queued in edge declaration order. Nodes on a cycle never reach in-degree zero
/// and are left out, so callers must validate first. Edges touching unknown ids
/// are ignored.
pub fn topological_sort(workflow: &WorkflowDefinition) -> Vec<&Node> {
    let nodes: HashMap<&str, &Node> = workflow.nodes().iter().map(|n| (n.id(), n)).collect();

    let mut in_degree: HashMap<&str, usize> = nodes.keys().map(|id| (*id, 0)).collect();
    let mut graph: HashMap<&str, Vec<&str>> = HashMap::new();

    for edge in workflow.edges() {
        let (source, target) = (edge.source.as_str(), edge.target.as_str());
        if !nodes.contains_key(source) || !nodes.contains_key(target) {
            continue;
        }

        graph.entry(source).or_default().push(target);
        if let Some(degree) = in_degree.get_mut(target) {
            *degree += 1;
        }
    }

    let mut queue: VecDeque<&str> = workflow
        .nodes()
        .iter()
        .map(Node::id)
        .filter(|id| in_degree.get(id) == Some(&0))
        .collect();

    let mut sorted = Vec::with_capacity(nodes.len());

    while let Some(id) = queue.pop_front() {
        if let Some(node) = nodes.get(id) {
            sorted.push(*node);
        }

        for &next in graph.get(id).map(Vec::as_slice).unwrap_or(&[]) {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::entity::Edge;
    use crate::domain::workflow::node_types::{KnowledgeBaseConfig, LlmEngineConfig};

    fn workflow(ids: &[&str], edges: &[(&str, &str)]) -> WorkflowDefinition {
        WorkflowDefinition::new(
            ids.iter()
                .map(|id| Node::llm_engine(*id, LlmEngineConfig::new()))
                .collect(),
            edges.iter().map(|(s, t)| Edge::new(*s, *t)).collect(),
        )
        .unwrap()
    }

    fn order(workflow: &WorkflowDefinition) -> Vec<&str> {
        topological_sort(workflow).into_iter().map(Node::id).collect()
    }

    fn assert_respects_edges(workflow: &WorkflowDefinition) {
        let order = order(workflow);
        assert_eq!(order.len(), workflow.node_count());

        for edge in workflow.edges() {
            let source = order.iter().position(|id| *id == edge.source).unwrap();
            let target = order.iter().position(|id| *id == edge.target).unwrap();
            assert!(source < target, "{} must precede {}", edge.source, edge.target);
        }
    }

    #[test]
    fn test_linear_chain_has_no_cycle() {
        let wf = workflow(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert!(!has_cycle(&wf));
    }

    #[test]
    fn test_diamond_has_no_cycle() {
        let wf = workflow(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        assert!(!has_cycle(&wf));
    }

    #[test]
    fn test_two_node_cycle() {
        let wf = workflow(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "b")]);
        assert!(has_cycle(&wf));
    }

    #[test]
    fn test_self_loop() {
        let wf = workflow(&["a"], &[("a", "a")]);
        assert!(has_cycle(&wf));
    }

    #[test]
    fn test_cycle_in_disconnected_component() {
        let wf = workflow(
            &["a", "b", "x", "y", "z"],
            &[("a", "b"), ("x", "y"), ("y", "z"), ("z", "x")],
        );
        assert!(has_cycle(&wf));
    }

    #[test]
    fn test_cycle_entered_through_shared_node() {
        let wf = workflow(&["a", "c", "b"], &[("a", "b"), ("c", "b"), ("b", "c")]);
        assert!(has_cycle(&wf));
    }

    #[test]
    fn test_converging_edges_are_not_a_cycle() {
        let wf = workflow(&["a", "b", "c"], &[("a", "b"), ("c", "b")]);
        assert!(!has_cycle(&wf));
    }

    #[test]
    fn test_dangling_edges_do_not_panic() {
        let wf = workflow(&["a"], &[("a", "ghost"), ("ghost", "a")]);
        assert!(has_cycle(&wf));
        assert_eq!(order(&workflow(&["a"], &[("a", "ghost")])), vec!["a"]);
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let ids: Vec<String> = (0..50_000).map(|i| format!("n{}", i)).collect();
        let nodes = ids
            .iter()
            .map(|id| Node::knowledge_base(id.clone(), KnowledgeBaseConfig::new()))
            .collect();
        let edges = ids
            .windows(2)
            .map(|pair| Edge::new(pair[0].clone(), pair[1].clone()))
            .collect();
        let wf = WorkflowDefinition::new(nodes, edges).unwrap();

        assert!(!has_cycle(&wf));
        assert_eq!(topological_sort(&wf).len(), 50_000);
    }

    #[test]
    fn test_roots_keep_declaration_order() {
        let wf = workflow(&["c", "a", "b"], &[]);
        assert_eq!(order(&wf), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_unlocked_nodes_follow_edge_order() {
        let wf = workflow(&["root", "x", "y", "z"], &[("root", "z"), ("root", "x"), ("root", "y")]);
        assert_eq!(order(&wf), vec!["root", "z", "x", "y"]);
    }

    #[test]
    fn test_diamond_order() {
        let wf = workflow(
            &["q", "k", "l", "o"],
            &[("q", "l"), ("q", "k"), ("k", "l"), ("l", "o")],
        );
        assert_eq!(order(&wf), vec!["q", "k", "l", "o"]);
        assert_respects_edges(&wf);
    }

    #[test]
    fn test_order_respects_every_edge() {
        let wf = workflow(
            &["e", "d", "c", "b", "a"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("d", "e"), ("a", "e")],
        );
        assert_respects_edges(&wf);
    }

    #[test]
    fn test_cycle_nodes_are_omitted() {
        let wf = workflow(
            &["q", "l1", "l2", "o"],
            &[("q", "l1"), ("l1", "l2"), ("l2", "l1"), ("l2", "o")],
        );
        assert_eq!(order(&wf), vec!["q"]);
    }

    #[test]
    fn test_predecessors_keep_edge_order() {
        let wf = workflow(&["a", "b", "c"], &[("b", "c"), ("a", "c")]);
        let incoming = predecessors(&wf);
        assert_eq!(incoming.get("c"), Some(&vec!["b", "a"]));
        assert!(incoming.get("a").is_none());
    }
}
