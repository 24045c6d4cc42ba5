use serde::{Serialize, Deserialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// Tensor shape of a value node. `Shape(vec![])` is a scalar.
///
/// The `Display` form is the annotation string used by the exporters,
/// e.g. `(2, 3)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Shape(pub Vec<usize>);

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, dim) in self.0.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{}", dim)?;
        }
        write!(f, ")")
    }
}

/// Contains metadata for a node, used for search and export labeling.
///
/// Names need not be unique; `GraphRegistry::uid` derives a unique stable
/// identifier from the name and the node index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// A human-readable name (operator name for operators, variable name otherwise).
    pub name: String,
    /// The shape of the value this node carries, where applicable.
    pub shape: Option<Shape>,
}

/// The primary enum classifying a node in the computation graph.
///
/// The kind is fixed at construction time; traversal dispatches on this tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A computation with ordered inputs and at least one output.
    Operator,
    /// A value produced by exactly one owning operator.
    Output { owner: NodeId },
    /// A node with neither capability (parameters, free inputs). Terminates recursion.
    Leaf,
}
