//! Inspector that records a composed structure as a serializable tree.

use super::{Inspector, Node};
use serde::{Deserialize, Serialize};

/// Kind of a recorded node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Empty,
    Link,
    Activity,
    Event,
    Try,
    Handlers,
}

/// One recorded node and its children, in visiting order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<GraphNode>,
}

impl From<Node<'_>> for GraphNode {
    fn from(node: Node<'_>) -> Self {
        let (kind, label) = match node {
            Node::Empty => (NodeKind::Empty, None),
            Node::Link => (NodeKind::Link, None),
            Node::Activity(name) => (NodeKind::Activity, Some(name.to_string())),
            Node::Event(event) => (NodeKind::Event, Some(event.name().to_string())),
            Node::Try(event) => (NodeKind::Try, Some(event.name().to_string())),
            Node::Handlers(fault) => (NodeKind::Handlers, Some(fault.to_string())),
        };
        Self {
            kind,
            label,
            children: Vec::new(),
        }
    }
}

/// Builds a [`GraphNode`] tree while visiting.
///
/// # Example
///
/// ```rust
/// use trellis::activity::{from_fn, Activity};
/// use trellis::behavior::{BehaviorContext, Chain};
/// use trellis::inspect::{GraphInspector, NodeKind};
/// # trellis::fault_kind! {
/// #     enum AppFault { Root, Unhandled: Root }
/// #     unhandled: Unhandled
/// # }
///
/// let chain: Chain<u32, AppFault> = Chain::compose(vec![
///     from_fn("increment", |ctx: &mut BehaviorContext<'_, u32, AppFault>| {
///         *ctx.instance_mut() += 1;
///         Ok(())
///     }),
/// ]);
///
/// let mut inspector = GraphInspector::new();
/// Activity::accept(&chain, &mut inspector);
/// let graph = inspector.into_graph();
///
/// assert_eq!(graph[0].kind, NodeKind::Link);
/// assert_eq!(graph[0].children[0].label.as_deref(), Some("increment"));
/// ```
#[derive(Debug, Default)]
pub struct GraphInspector {
    open: Vec<GraphNode>,
    roots: Vec<GraphNode>,
}

impl GraphInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level nodes recorded so far.
    pub fn graph(&self) -> &[GraphNode] {
        &self.roots
    }

    pub fn into_graph(self) -> Vec<GraphNode> {
        self.roots
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.roots)
    }
}

impl Inspector for GraphInspector {
    fn inspect(&mut self, node: Node<'_>, descend: &mut dyn FnMut(&mut dyn Inspector)) {
        self.open.push(GraphNode::from(node));
        descend(self);

        let Some(done) = self.open.pop() else {
            return;
        };
        match self.open.last_mut() {
            Some(parent) => parent.children.push(done),
            None => self.roots.push(done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Event;
    use crate::inspect::leaf;

    #[test]
    fn nested_nodes_become_children() {
        let event = Event::new("Submit");
        let mut inspector = GraphInspector::new();

        inspector.inspect(Node::Try(&event), &mut |inspector: &mut dyn Inspector| {
            inspector.inspect(Node::Activity("reserve"), &mut leaf);
            inspector.inspect(Node::Handlers("Timeout"), &mut |inspector: &mut dyn Inspector| {
                inspector.inspect(Node::Activity("refund"), &mut leaf);
            });
        });

        let graph = inspector.into_graph();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph[0].kind, NodeKind::Try);
        assert_eq!(graph[0].label.as_deref(), Some("Submit"));
        assert_eq!(graph[0].children.len(), 2);
        assert_eq!(graph[0].children[1].children[0].label.as_deref(), Some("refund"));
    }

    #[test]
    fn graph_serializes_to_json() {
        let mut inspector = GraphInspector::new();
        inspector.inspect(Node::Empty, &mut leaf);

        let json = inspector.to_json().unwrap();
        let parsed: Vec<GraphNode> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, inspector.graph());
        assert!(json.contains("\"empty\""));
    }
}
