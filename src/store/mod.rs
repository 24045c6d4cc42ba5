//! Columnar storage for the computation graph: node kinds, metadata,
//! and input/output topology.

pub mod registry;
pub mod types;

pub use registry::GraphRegistry;
pub use types::{NodeId, NodeKind, NodeMetadata, Shape};
