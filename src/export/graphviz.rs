//! PNG materialization through the external Graphviz `dot` binary.

use super::{DotGraph, ExportError, Renderer};
use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Stdio};

/// Renderer backed by Graphviz.
///
/// Construction probes for the `dot` binary so a missing backend is reported
/// before any traversal work happens, not partway through an export.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    graph: DotGraph,
}

impl GraphvizRenderer {
    pub fn new() -> Result<Self, ExportError> {
        probe_dot_binary()?;
        Ok(Self { graph: DotGraph::new() })
    }
}

impl Renderer for GraphvizRenderer {
    fn add_node(&mut self, uid: &str, label: &str) {
        self.graph.add_node(uid, label);
    }

    fn add_edge(&mut self, from_uid: &str, to_uid: &str, label: Option<&str>) {
        self.graph.add_edge(from_uid, to_uid, label);
    }

    fn write_raw(&self, path: &Path) -> Result<(), ExportError> {
        self.graph.write_raw(path)
    }

    fn write_png(&self, path: &Path) -> Result<(), ExportError> {
        // Construction already probed for the binary; go straight to `dot`.
        run_dot(&self.graph.to_dot(), path)
    }
}

fn probe_dot_binary() -> Result<(), ExportError> {
    let status = Command::new("dot")
        .arg("-V")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => Err(ExportError::DependencyUnavailable(
            "PNG output requires the Graphviz 'dot' binary on PATH".to_string(),
        )),
    }
}

/// Pipes DOT source through `dot -Tpng`, writing the image to `path`.
/// Probes for the binary first; callers that probed at construction use
/// [`GraphvizRenderer::write_png`] instead.
pub fn render_png(dot_source: &str, path: &Path) -> Result<(), ExportError> {
    probe_dot_binary()?;
    run_dot(dot_source, path)
}

fn run_dot(dot_source: &str, path: &Path) -> Result<(), ExportError> {
    let mut child = Command::new("dot")
        .arg("-Tpng")
        .arg("-o")
        .arg(path)
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(dot_source.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(ExportError::RenderFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(())
}
