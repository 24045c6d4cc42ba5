use crate::export;
use crate::store::{GraphRegistry, NodeId, Shape};
use crate::walk;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::path::Path;

#[pyclass(name = "_ModelGraph")]
#[derive(Debug, Clone, Default)]
pub struct PyModelGraph {
    registry: GraphRegistry,
}

impl PyModelGraph {
    fn check_id(&self, id: usize) -> PyResult<NodeId> {
        if id < self.registry.count() {
            Ok(NodeId::new(id))
        } else {
            Err(PyValueError::new_err("Invalid Node ID"))
        }
    }
}

#[pymethods]
impl PyModelGraph {
    #[new]
    pub fn new() -> Self { Self::default() }

    pub fn add_leaf(&mut self, name: String, shape: Vec<usize>) -> usize {
        self.registry.add_leaf(&name, Shape(shape)).index()
    }

    /// Adds an operator and its outputs; returns `(op_id, [output_ids])`.
    pub fn add_operator(
        &mut self,
        op_name: String,
        inputs: Vec<usize>,
        output_shapes: Vec<Vec<usize>>,
    ) -> PyResult<(usize, Vec<usize>)> {
        let input_ids: Vec<NodeId> = inputs.into_iter().map(NodeId::new).collect();
        let shapes: Vec<Shape> = output_shapes.into_iter().map(Shape).collect();
        let op = self
            .registry
            .add_operator(&op_name, &input_ids, &shapes)
            .map_err(PyValueError::new_err)?;
        let outs = self.registry.outputs(op).map(|o| o.index()).collect();
        Ok((op.index(), outs))
    }

    pub fn find_nodes_by_name(&self, start: usize, name: String) -> PyResult<Vec<usize>> {
        let start = self.check_id(start)?;
        Ok(walk::find_nodes_by_name(&self.registry, start, &name)
            .into_iter()
            .map(|id| id.index())
            .collect())
    }

    /// All nodes reachable from `start`, in post-order.
    pub fn find_all(&self, start: usize) -> PyResult<Vec<usize>> {
        let start = self.check_id(start)?;
        Ok(walk::visit(&self.registry, start, |_| true)
            .into_iter()
            .map(|id| id.index())
            .collect())
    }

    pub fn node_name(&self, id: usize) -> PyResult<String> {
        Ok(self.registry.meta(self.check_id(id)?).name.clone())
    }

    pub fn node_uid(&self, id: usize) -> PyResult<String> {
        Ok(self.registry.uid(self.check_id(id)?))
    }

    pub fn node_count(&self) -> usize { self.registry.count() }

    pub fn to_dot(&self, start: usize) -> PyResult<String> {
        Ok(export::render_dot(&self.registry, self.check_id(start)?))
    }

    #[pyo3(signature = (start, dot_path=None, png_path=None))]
    pub fn output_graph(
        &self,
        start: usize,
        dot_path: Option<String>,
        png_path: Option<String>,
    ) -> PyResult<String> {
        let start = self.check_id(start)?;
        export::output_function_graph(
            &self.registry,
            start,
            dot_path.as_deref().map(Path::new),
            png_path.as_deref().map(Path::new),
        )
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    pub fn png_graph(&self, start: usize, path: String) -> PyResult<()> {
        let start = self.check_id(start)?;
        export::png_graph(&self.registry, start, Path::new(&path))
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.registry).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    #[staticmethod]
    pub fn from_json(data: &str) -> PyResult<Self> {
        let registry: GraphRegistry =
            serde_json::from_str(data).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { registry })
    }
}
