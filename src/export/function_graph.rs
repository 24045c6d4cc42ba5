//! Walk-coupled emission of graph-description records.
//!
//! Mirrors the plain walker's traversal order and visited-once guarantee
//! while feeding a [`Renderer`] as a side channel: every visited operator
//! contributes a labeled node record, an edge from each of its inputs, and
//! an edge to its first output.

use super::{DotGraph, ExportError, GraphvizRenderer, Renderer};
use crate::store::{GraphRegistry, NodeId, NodeKind};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

/// Recursive walk that both collects predicate matches into `accum` and
/// emits renderer records for every operator it encounters.
///
/// Traversal order and the visited-once guarantee are identical to
/// [`crate::walk::dfs_walk`]; the renderer is a parallel accumulator.
pub fn build_graph<F>(
    registry: &GraphRegistry,
    node: NodeId,
    visitor: &mut F,
    accum: &mut Vec<NodeId>,
    renderer: &mut dyn Renderer,
    visited: &mut HashSet<NodeId>,
) where
    F: FnMut(NodeId) -> bool,
{
    if !visited.insert(node) {
        return;
    }

    match registry.kind(node) {
        NodeKind::Operator => {
            emit_operator(registry, node, renderer);
            for &child in registry.inputs(node) {
                build_graph(registry, child, visitor, accum, renderer, visited);
            }
        }
        NodeKind::Output { owner } => {
            build_graph(registry, *owner, visitor, accum, renderer, visited);
        }
        NodeKind::Leaf => {}
    }

    if visitor(node) {
        accum.push(node);
    }
}

/// Renders the graph reachable from `start` as DOT text.
pub fn render_dot(registry: &GraphRegistry, start: NodeId) -> String {
    let mut graph = DotGraph::new();
    let mut accum = Vec::new();
    let mut visited = HashSet::new();
    build_graph(registry, start, &mut |_| false, &mut accum, &mut graph, &mut visited);
    graph.to_dot()
}

/// Walks the graph reachable from `start` and renders it as a PNG at `path`.
///
/// Fails with [`ExportError::DependencyUnavailable`] before any traversal
/// work if Graphviz is not installed.
pub fn png_graph(registry: &GraphRegistry, start: NodeId, path: &Path) -> Result<(), ExportError> {
    let mut renderer = GraphvizRenderer::new()?;
    let mut accum = Vec::new();
    let mut visited = HashSet::new();
    build_graph(registry, start, &mut |_| false, &mut accum, &mut renderer, &mut visited);
    renderer.write_png(path)
}

/// Walks every node reachable from `start` with an explicit stack and
/// returns a textual edge list, one line per operator:
/// `op_name(child_uid, ...) -> output_uid`.
///
/// When `dot_path` or `png_path` is given, the same walk also feeds a
/// renderer and the corresponding files are written after the walk. Line
/// order follows traversal encounter order and is not a contract beyond
/// determinism.
pub fn output_function_graph(
    registry: &GraphRegistry,
    start: NodeId,
    dot_path: Option<&Path>,
    png_path: Option<&Path>,
) -> Result<String, ExportError> {
    // Probe the PNG backend up front so a missing dependency surfaces
    // before any traversal work.
    let mut renderer: Option<Box<dyn Renderer>> = if png_path.is_some() {
        Some(Box::new(GraphvizRenderer::new()?))
    } else if dot_path.is_some() {
        Some(Box::new(DotGraph::new()))
    } else {
        None
    };

    let mut model = String::new();
    let mut stack = vec![start];
    let mut visited = HashSet::new();

    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }

        match registry.kind(node) {
            NodeKind::Operator => {
                let inputs = registry.inputs(node);
                stack.extend(inputs.iter().copied());

                if let Some(r) = renderer.as_deref_mut() {
                    emit_operator(registry, node, r);
                }

                let args: Vec<String> = inputs.iter().map(|&c| registry.uid(c)).collect();
                if let Some(out) = registry.outputs(node).next() {
                    let _ = writeln!(
                        model,
                        "{}({}) -> {}",
                        registry.meta(node).name,
                        args.join(", "),
                        registry.uid(out)
                    );
                }
            }
            NodeKind::Output { owner } => stack.push(*owner),
            NodeKind::Leaf => {}
        }
    }

    if let Some(r) = &renderer {
        if let Some(path) = dot_path {
            r.write_raw(path)?;
        }
        if let Some(path) = png_path {
            r.write_png(path)?;
        }
    }

    Ok(model)
}

/// Emits the records for one operator: its own node, its first output with
/// the connecting edge, and an edge from each input. Shape strings annotate
/// edges where the endpoint carries a shape.
fn emit_operator(registry: &GraphRegistry, op: NodeId, renderer: &mut dyn Renderer) {
    let op_uid = registry.uid(op);
    renderer.add_node(&op_uid, &registry.meta(op).name);

    if let Some(out) = registry.outputs(op).next() {
        renderer.add_node(&registry.uid(out), &value_label(registry, out));
        renderer.add_edge(&op_uid, &registry.uid(out), shape_string(registry, out).as_deref());
    }

    for &child in registry.inputs(op) {
        renderer.add_node(&registry.uid(child), &value_label(registry, child));
        renderer.add_edge(&registry.uid(child), &op_uid, shape_string(registry, child).as_deref());
    }
}

fn shape_string(registry: &GraphRegistry, id: NodeId) -> Option<String> {
    registry.meta(id).shape.as_ref().map(|s| s.to_string())
}

fn value_label(registry: &GraphRegistry, id: NodeId) -> String {
    match registry.kind(id) {
        // An operator wired directly in value position keeps its plain name.
        NodeKind::Operator => registry.meta(id).name.clone(),
        _ => match shape_string(registry, id) {
            Some(shape) => format!("{}\nshape: {}", registry.uid(id), shape),
            None => registry.uid(id),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Shape;

    fn matmul_add_graph() -> (GraphRegistry, NodeId) {
        let mut reg = GraphRegistry::new();
        let x = reg.add_leaf("X", Shape(vec![2, 3]));
        let w = reg.add_leaf("W", Shape(vec![3, 4]));
        let matmul = reg.add_operator("MatMul", &[x, w], &[Shape(vec![2, 4])]).unwrap();
        let b = reg.add_leaf("B", Shape(vec![4]));
        let add = reg.add_operator("Add", &[matmul, b], &[Shape(vec![2, 4])]).unwrap();
        (reg, add)
    }

    #[test]
    fn test_text_edge_list() {
        let (reg, add) = matmul_add_graph();
        let text = output_function_graph(&reg, add, None, None).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // One line per operator.
        assert_eq!(lines.len(), 2);
        assert!(lines.contains(&"Add(MatMul_2, B_4) -> Add_Output_0_6"));
        assert!(lines.contains(&"MatMul(X_0, W_1) -> MatMul_Output_0_3"));
    }

    #[test]
    fn test_text_edge_list_is_deterministic() {
        let (reg, add) = matmul_add_graph();
        let first = output_function_graph(&reg, add, None, None).unwrap();
        for _ in 0..10 {
            assert_eq!(output_function_graph(&reg, add, None, None).unwrap(), first);
        }
    }

    #[test]
    fn test_render_dot_records() {
        let (reg, add) = matmul_add_graph();
        let dot = render_dot(&reg, add);

        assert!(dot.contains("\"Add_5\" [label=\"Add\"];"));
        assert!(dot.contains("\"MatMul_2\" [label=\"MatMul\"];"));
        assert!(dot.contains("\"X_0\" [label=\"X_0\\nshape: (2, 3)\"];"));
        // Input edges point into the operator, the operator points at its first output.
        assert!(dot.contains("\"X_0\" -> \"MatMul_2\" [label=\"(2, 3)\"];"));
        assert!(dot.contains("\"W_1\" -> \"MatMul_2\" [label=\"(3, 4)\"];"));
        assert!(dot.contains("\"MatMul_2\" -> \"Add_5\""));
        assert!(dot.contains("\"Add_5\" -> \"Add_Output_0_6\" [label=\"(2, 4)\"];"));
    }

    #[test]
    fn test_diamond_emits_shared_record_once() {
        let mut reg = GraphRegistry::new();
        let src = reg.add_operator("Source", &[], &[Shape(vec![8])]).unwrap();
        let o = reg.outputs(src).next().unwrap();
        let p = reg.add_operator("P", &[o], &[Shape(vec![8])]).unwrap();
        let q = reg.add_operator("Q", &[o], &[Shape(vec![8])]).unwrap();
        let r = reg.add_operator("Combine", &[p, q], &[Shape(vec![8])]).unwrap();

        let dot = render_dot(&reg, r);
        let decl = format!("\"{}\" [label=", reg.uid(o));
        let node_lines = dot
            .lines()
            .filter(|l| l.trim_start().starts_with(&decl) && !l.contains("->"))
            .count();
        assert_eq!(node_lines, 1);
    }

    #[test]
    fn test_build_graph_accumulates_like_plain_walk() {
        let (reg, add) = matmul_add_graph();

        let mut graph = DotGraph::new();
        let mut accum = Vec::new();
        let mut visited = HashSet::new();
        build_graph(&reg, add, &mut |_| true, &mut accum, &mut graph, &mut visited);

        assert_eq!(accum, crate::walk::visit(&reg, add, |_| true));
    }

    #[test]
    fn test_dot_file_written() {
        let (reg, add) = matmul_add_graph();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.dot");

        let text = output_function_graph(&reg, add, Some(&path), None).unwrap();
        assert!(!text.is_empty());

        let dot = std::fs::read_to_string(&path).unwrap();
        assert!(dot.starts_with("digraph network_graph {"));
        assert!(dot.contains("\"MatMul_2\" [label=\"MatMul\"];"));
    }

    #[test]
    fn test_no_paths_writes_nothing() {
        let (reg, add) = matmul_add_graph();
        let text = output_function_graph(&reg, add, None, None).unwrap();
        assert!(text.contains("MatMul"));
    }
}
