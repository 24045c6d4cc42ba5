//! Graph-description export: a renderer capability, a DOT builder, a
//! Graphviz PNG backend, and the walk-coupled emitters.

pub mod dot;
pub mod error;
pub mod function_graph;
pub mod graphviz;

pub use dot::DotGraph;
pub use error::ExportError;
pub use function_graph::{build_graph, output_function_graph, png_graph, render_dot};
pub use graphviz::GraphvizRenderer;

use std::path::Path;

/// Sink for the (node-label, edge) records emitted while walking a graph.
///
/// The walker depends only on this interface; concrete backends are supplied
/// by the caller. Records arrive in visit order.
pub trait Renderer {
    /// Registers a node record. Repeated registrations of the same uid are
    /// collapsed; the first label wins.
    fn add_node(&mut self, uid: &str, label: &str);
    /// Registers a directed edge, optionally annotated with a shape string.
    fn add_edge(&mut self, from_uid: &str, to_uid: &str, label: Option<&str>);
    /// Writes the accumulated description in the backend's raw textual form.
    fn write_raw(&self, path: &Path) -> Result<(), ExportError>;
    /// Materializes the accumulated description as a PNG image.
    fn write_png(&self, path: &Path) -> Result<(), ExportError>;
}
