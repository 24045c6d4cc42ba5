use super::types::*;
use serde::{Serialize, Deserialize};

/// Columnar storage for the computation graph.
///
/// Node identity is the index into the columnar arrays. Input topology is
/// stored CSR-style (`inputs_flat` + `inputs_ranges`); the outputs of an
/// operator are created together with it and occupy a contiguous id range,
/// so only `(first, count)` is stored per node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphRegistry {
    // Columnar Arrays
    pub kinds: Vec<NodeKind>,
    pub meta: Vec<NodeMetadata>,

    // Topology (CSR): inputs of each node, in declared order.
    pub inputs_flat: Vec<NodeId>,
    pub inputs_ranges: Vec<(u32, u32)>, // (start, count)

    // (first output id, count) per node; (0, 0) for non-operators.
    pub outputs_ranges: Vec<(u32, u32)>,
}

impl GraphRegistry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.kinds.len() }

    fn push_node(&mut self, kind: NodeKind, inputs: &[NodeId], meta: NodeMetadata) -> NodeId {
        let id = NodeId(self.kinds.len() as u32);

        let start = self.inputs_flat.len() as u32;
        let count = inputs.len() as u32;
        self.inputs_flat.extend_from_slice(inputs);
        self.inputs_ranges.push((start, count));

        self.kinds.push(kind);
        self.meta.push(meta);
        self.outputs_ranges.push((0, 0));

        id
    }

    /// Adds a leaf node (a parameter or free input variable).
    pub fn add_leaf(&mut self, name: &str, shape: Shape) -> NodeId {
        let meta = NodeMetadata { name: name.to_string(), shape: Some(shape) };
        self.push_node(NodeKind::Leaf, &[], meta)
    }

    /// Adds an operator node together with its output nodes.
    ///
    /// Inputs may be operator, output, or leaf ids. One output node is
    /// created per entry in `output_shapes`, each owned by the new operator
    /// and named `<op_name>_Output_<i>`.
    ///
    /// # Errors
    /// Returns an error if `output_shapes` is empty (an operator must
    /// produce at least one value) or if an input id is out of range.
    pub fn add_operator(
        &mut self,
        op_name: &str,
        inputs: &[NodeId],
        output_shapes: &[Shape],
    ) -> Result<NodeId, String> {
        if output_shapes.is_empty() {
            return Err(format!("Operator '{}' must declare at least one output", op_name));
        }
        if let Some(bad) = inputs.iter().find(|i| i.index() >= self.count()) {
            return Err(format!("Invalid input node id {:?} for operator '{}'", bad, op_name));
        }

        let meta = NodeMetadata { name: op_name.to_string(), shape: None };
        let op_id = self.push_node(NodeKind::Operator, inputs, meta);

        let first_out = self.kinds.len() as u32;
        for (i, shape) in output_shapes.iter().enumerate() {
            let out_meta = NodeMetadata {
                name: format!("{}_Output_{}", op_name, i),
                shape: Some(shape.clone()),
            };
            self.push_node(NodeKind::Output { owner: op_id }, &[], out_meta);
        }
        self.outputs_ranges[op_id.index()] = (first_out, output_shapes.len() as u32);

        Ok(op_id)
    }

    // --- Accessors ---

    pub fn kind(&self, id: NodeId) -> &NodeKind { &self.kinds[id.index()] }
    pub fn meta(&self, id: NodeId) -> &NodeMetadata { &self.meta[id.index()] }

    #[inline(always)]
    pub fn inputs(&self, id: NodeId) -> &[NodeId] {
        let (start, count) = self.inputs_ranges[id.index()];
        &self.inputs_flat[start as usize..(start + count) as usize]
    }

    /// The outputs of an operator, in declaration order. Empty for non-operators.
    pub fn outputs(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        let (first, count) = self.outputs_ranges[id.index()];
        (first..first + count).map(NodeId)
    }

    /// A unique, stable identifier string for a node.
    ///
    /// Names are allowed to repeat across nodes, so the uid suffixes the
    /// name with the node index.
    pub fn uid(&self, id: NodeId) -> String {
        format!("{}_{}", self.meta[id.index()].name, id.0)
    }
}
