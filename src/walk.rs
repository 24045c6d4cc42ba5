//! Depth-first traversal over the computation graph.
//!
//! The walk starts at an arbitrary node and visits every reachable node
//! exactly once: operators recurse into their inputs in declared order,
//! output nodes resolve to their owning operator, and leaves terminate the
//! recursion. A node is appended to the result only after all of its
//! dependencies have been recorded, so the result is in post-order (a
//! topological order when the graph is a DAG).

use crate::store::{GraphRegistry, NodeId, NodeKind};
use std::collections::HashSet;

/// Low-level recursive walk.
///
/// `visited` and `accum` are owned by the caller so a single traversal can
/// be resumed from several roots. Most callers want [`visit`], which starts
/// from fresh state. The predicate is evaluated exactly once per reachable
/// node, after that node's dependencies, and `accum` receives the node when
/// it returns `true`.
pub fn dfs_walk<F>(
    registry: &GraphRegistry,
    node: NodeId,
    visitor: &mut F,
    accum: &mut Vec<NodeId>,
    visited: &mut HashSet<NodeId>,
) where
    F: FnMut(NodeId) -> bool,
{
    if !visited.insert(node) {
        return;
    }

    match registry.kind(node) {
        NodeKind::Operator => {
            for &input in registry.inputs(node) {
                dfs_walk(registry, input, visitor, accum, visited);
            }
        }
        NodeKind::Output { owner } => {
            dfs_walk(registry, *owner, visitor, accum, visited);
        }
        NodeKind::Leaf => {}
    }

    if visitor(node) {
        accum.push(node);
    }
}

/// Walks the graph from `start` and returns every node for which
/// `predicate` holds, in post-order.
///
/// Each call uses its own visited set, so independent traversals over a
/// shared `&GraphRegistry` may run concurrently.
pub fn visit<F>(registry: &GraphRegistry, start: NodeId, mut predicate: F) -> Vec<NodeId>
where
    F: FnMut(NodeId) -> bool,
{
    let mut accum = Vec::new();
    let mut visited = HashSet::new();
    dfs_walk(registry, start, &mut predicate, &mut accum, &mut visited);
    accum
}

/// Returns all nodes reachable from `start` whose name equals `name`,
/// in post-order.
pub fn find_nodes_by_name(registry: &GraphRegistry, start: NodeId, name: &str) -> Vec<NodeId> {
    visit(registry, start, |id| registry.meta(id).name == name)
}
