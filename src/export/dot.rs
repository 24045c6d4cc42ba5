//! In-memory builder for the Graphviz DOT textual format.

use super::{ExportError, Renderer};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Accumulates node and edge records and serializes them as a `digraph`.
#[derive(Debug, Clone, Default)]
pub struct DotGraph {
    nodes: Vec<(String, String)>, // (uid, label)
    seen: HashSet<String>,
    edges: Vec<(String, String, Option<String>)>,
}

impl DotGraph {
    pub fn new() -> Self { Self::default() }

    /// Serializes the accumulated records as DOT text.
    pub fn to_dot(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "digraph network_graph {{");
        let _ = writeln!(output, "    rankdir=TB;");
        let _ = writeln!(output, "    node [shape=rectangle];");
        let _ = writeln!(output);

        for (uid, label) in &self.nodes {
            let _ = writeln!(
                output,
                "    \"{}\" [label=\"{}\"];",
                escape_dot_string(uid),
                escape_dot_string(label)
            );
        }
        let _ = writeln!(output);

        for (from, to, label) in &self.edges {
            match label {
                Some(l) => {
                    let _ = writeln!(
                        output,
                        "    \"{}\" -> \"{}\" [label=\"{}\"];",
                        escape_dot_string(from),
                        escape_dot_string(to),
                        escape_dot_string(l)
                    );
                }
                None => {
                    let _ = writeln!(
                        output,
                        "    \"{}\" -> \"{}\";",
                        escape_dot_string(from),
                        escape_dot_string(to)
                    );
                }
            }
        }

        output.push_str("}\n");
        output
    }
}

impl Renderer for DotGraph {
    fn add_node(&mut self, uid: &str, label: &str) {
        if self.seen.insert(uid.to_string()) {
            self.nodes.push((uid.to_string(), label.to_string()));
        }
    }

    fn add_edge(&mut self, from_uid: &str, to_uid: &str, label: Option<&str>) {
        self.edges.push((from_uid.to_string(), to_uid.to_string(), label.map(str::to_string)));
    }

    fn write_raw(&self, path: &Path) -> Result<(), ExportError> {
        fs::write(path, self.to_dot())?;
        Ok(())
    }

    fn write_png(&self, path: &Path) -> Result<(), ExportError> {
        super::graphviz::render_png(&self.to_dot(), path)
    }
}

fn escape_dot_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_dot_layout() {
        let mut g = DotGraph::new();
        g.add_node("X_0", "X_0\nshape: (2, 3)");
        g.add_node("MatMul_2", "MatMul");
        g.add_edge("X_0", "MatMul_2", Some("(2, 3)"));
        g.add_edge("MatMul_2", "MatMul_Output_0_3", None);

        let dot = g.to_dot();
        assert!(dot.starts_with("digraph network_graph {"));
        assert!(dot.contains("rankdir=TB;"));
        assert!(dot.contains("\"X_0\" [label=\"X_0\\nshape: (2, 3)\"];"));
        assert!(dot.contains("\"MatMul_2\" [label=\"MatMul\"];"));
        assert!(dot.contains("\"X_0\" -> \"MatMul_2\" [label=\"(2, 3)\"];"));
        assert!(dot.contains("\"MatMul_2\" -> \"MatMul_Output_0_3\";"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_duplicate_node_records_collapse() {
        let mut g = DotGraph::new();
        g.add_node("a", "first");
        g.add_node("a", "second");
        let dot = g.to_dot();
        assert!(dot.contains("[label=\"first\"]"));
        assert!(!dot.contains("second"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        let mut g = DotGraph::new();
        g.add_node("n\"1", "say \"hi\"");
        let dot = g.to_dot();
        assert!(dot.contains("\"n\\\"1\" [label=\"say \\\"hi\\\"\"];"));
    }

    #[test]
    fn test_write_raw() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.dot");

        let mut g = DotGraph::new();
        g.add_node("a", "a");
        g.add_node("b", "b");
        g.add_edge("a", "b", None);
        g.write_raw(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, g.to_dot());
    }
}
