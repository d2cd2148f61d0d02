use std::collections::HashMap;

use warroom_shared::TreeSnapshot;

use crate::layout::{elk_layout_options, LayoutEdge, LayoutGraph, LayoutNode};

pub const NODE_WIDTH: f64 = 30.0;
pub const NODE_HEIGHT: f64 = 30.0;

/// One TREE event rendered to a layout-ready graph plus the ids of nodes
/// whose labels changed since the previous snapshot.
#[derive(Debug, Clone)]
pub struct TreeFrame {
    pub graph: LayoutGraph,
    pub changed: Vec<String>,
}

/// Assigns stable positional ids to snapshot nodes and tracks which node
/// labels changed between consecutive snapshots. Trees are rebuilt fresh per
/// event; only the signature map persists.
#[derive(Debug, Default)]
pub struct TreeDiffTracker {
    previous: HashMap<String, String>,
}

impl TreeDiffTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, root: &TreeSnapshot) -> TreeFrame {
        let mut graph = LayoutGraph::new("root", elk_layout_options());
        let mut signatures = HashMap::new();
        flatten(root, "n1", 1, None, &mut graph, &mut signatures);

        let mut changed: Vec<String> = signatures
            .iter()
            .filter(|&(id, signature)| self.previous.get(id) != Some(signature))
            .map(|(id, _)| id.clone())
            .collect();
        changed.sort();
        self.previous = signatures;

        TreeFrame { graph, changed }
    }
}

/// Positional id for child `index` of `parent` sitting at `level`.
/// Root is `n1`; child 2 of the root is `n1|n2_2`, and so on down.
fn child_id(parent: &str, level: usize, index: usize) -> String {
    format!("{parent}|n{}_{index}", level + 1)
}

fn node_label(node: &TreeSnapshot) -> String {
    let action = node
        .action
        .as_ref()
        .map(|info| info.action.as_str())
        .unwrap_or("root");
    format!(
        "{action} v={} t={:.2} ucb={:.3}",
        node.visits, node.total, node.ucb_value
    )
}

fn flatten(
    node: &TreeSnapshot,
    id: &str,
    level: usize,
    parent: Option<&str>,
    graph: &mut LayoutGraph,
    signatures: &mut HashMap<String, String>,
) {
    let label = node_label(node);
    graph
        .children
        .push(LayoutNode::new(id, NODE_WIDTH, NODE_HEIGHT, label.clone()));
    if let Some(parent) = parent {
        let edge_id = format!("e{}", graph.edges.len() + 1);
        let action = node.action.as_ref().map(|info| info.action.clone());
        graph.edges.push(LayoutEdge::new(edge_id, parent, id, action));
    }
    signatures.insert(id.to_string(), label);

    for (index, child) in node.children.iter().enumerate() {
        let child_id = child_id(id, level, index);
        flatten(child, &child_id, level + 1, Some(id), graph, signatures);
    }
}

#[cfg(test)]
mod tests {
    use warroom_shared::{ActionInfo, TreeSnapshot};

    use super::TreeDiffTracker;

    fn leaf(action: &str, visits: u64) -> TreeSnapshot {
        TreeSnapshot {
            action: Some(ActionInfo {
                action: action.to_string(),
            }),
            visits,
            total: visits as f64,
            ucb_value: 0.5,
            children: Vec::new(),
        }
    }

    fn sample_root() -> TreeSnapshot {
        TreeSnapshot {
            action: None,
            visits: 10,
            total: 5.0,
            ucb_value: -1.0,
            children: vec![
                TreeSnapshot {
                    children: vec![leaf("4 -> 7", 2)],
                    ..leaf("attack 4", 6)
                },
                leaf("end phase", 4),
            ],
        }
    }

    fn node_ids(frame: &super::TreeFrame) -> Vec<String> {
        frame
            .graph
            .children
            .iter()
            .map(|node| node.id.clone())
            .collect()
    }

    #[test]
    fn ids_are_positional_and_deterministic() {
        let mut tracker = TreeDiffTracker::new();
        let frame = tracker.observe(&sample_root());
        assert_eq!(
            node_ids(&frame),
            vec!["n1", "n1|n2_0", "n1|n2_0|n3_0", "n1|n2_1"]
        );

        let again = TreeDiffTracker::new().observe(&sample_root());
        assert_eq!(node_ids(&frame), node_ids(&again));
    }

    #[test]
    fn edges_connect_parents_to_children_in_traversal_order() {
        let frame = TreeDiffTracker::new().observe(&sample_root());
        let edges = &frame.graph.edges;
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0].id, "e1");
        assert_eq!(edges[0].sources, vec!["n1"]);
        assert_eq!(edges[0].targets, vec!["n1|n2_0"]);
        assert_eq!(edges[1].sources, vec!["n1|n2_0"]);
        assert_eq!(edges[1].targets, vec!["n1|n2_0|n3_0"]);
        assert_eq!(edges[2].targets, vec!["n1|n2_1"]);
        assert_eq!(edges[0].labels[0].text, "attack 4");
    }

    #[test]
    fn first_snapshot_marks_every_node_changed() {
        let frame = TreeDiffTracker::new().observe(&sample_root());
        assert_eq!(frame.changed.len(), 4);
    }

    #[test]
    fn identical_snapshot_marks_nothing_changed() {
        let mut tracker = TreeDiffTracker::new();
        tracker.observe(&sample_root());
        let frame = tracker.observe(&sample_root());
        assert!(frame.changed.is_empty());
    }

    #[test]
    fn only_the_altered_node_is_marked_changed() {
        let mut tracker = TreeDiffTracker::new();
        tracker.observe(&sample_root());

        let mut altered = sample_root();
        altered.children[1].visits = 9;
        let frame = tracker.observe(&altered);
        assert_eq!(frame.changed, vec!["n1|n2_1".to_string()]);
    }

    #[test]
    fn a_new_child_is_marked_changed() {
        let mut tracker = TreeDiffTracker::new();
        tracker.observe(&sample_root());

        let mut grown = sample_root();
        grown.children.push(leaf("fortify", 1));
        let frame = tracker.observe(&grown);
        assert_eq!(frame.changed, vec!["n1|n2_2".to_string()]);
    }

    #[test]
    fn node_labels_carry_action_and_statistics() {
        let frame = TreeDiffTracker::new().observe(&sample_root());
        let root = &frame.graph.children[0];
        assert_eq!(root.labels[0].text, "root v=10 t=5.00 ucb=-1.000");
        let second = &frame.graph.children[3];
        assert_eq!(second.labels[0].text, "end phase v=4 t=4.00 ucb=0.500");
    }
}
