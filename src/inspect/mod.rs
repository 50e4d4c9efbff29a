//! Structural inspection of composed behaviors.
//!
//! Every node (chain links, activities, guarded activities) accepts an
//! [`Inspector`] and describes itself with a [`Node`]. The inspector gets a
//! `descend` callback along with the node; calling it once walks the node's
//! children, so an inspector decides what happens before and after them
//! without knowing any concrete node type.

mod graph;

pub use graph::{GraphInspector, GraphNode, NodeKind};

use crate::core::Event;

/// Description of one node in a composed structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node<'n> {
    /// Pass-through chain with no activities.
    Empty,
    /// A chain link wrapping one activity and the rest of the chain.
    Link,
    /// A plain activity.
    Activity(&'n str),
    /// An activity bound to an event.
    Event(&'n Event),
    /// A guarded activity for an event.
    Try(&'n Event),
    /// The handlers registered for one fault kind.
    Handlers(&'static str),
}

/// Visitor over composed behavior structures.
///
/// Implementations must call `descend` exactly once per node, after any
/// bookkeeping of their own.
pub trait Inspector {
    fn inspect(&mut self, node: Node<'_>, descend: &mut dyn FnMut(&mut dyn Inspector));
}

/// Descend callback for nodes without children.
pub(crate) fn leaf(_: &mut dyn Inspector) {}
