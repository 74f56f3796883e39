//! poslist-blend-core: weighted position list blending (engine-agnostic)
//!
//! An ordered list of weighted positions is folded into one position and the translation
//! matrices derived from it. The pipeline is pure; [`PositionListNode`] wraps it with the
//! dirty/clean bookkeeping a host needs to recompute on demand.
//!
//! - [`blend`], [`normalize`] and [`transform`] are the pure stages.
//! - [`schema`] declares the node's attributes and dependency edges.
//! - [`controller`] owns the output group state and runs the stages.
//! - [`host`] is the read/write contract; [`runtime`] is an in-memory implementation of it.
//! - [`registry`] handles node type registration.

pub mod blend;
pub mod config;
pub mod contribution;
pub mod controller;
pub mod host;
pub mod normalize;
pub mod registry;
pub mod runtime;
pub mod schema;
pub mod transform;

pub use blend::average;
pub use config::{NamingScheme, NodeConfig};
pub use contribution::Contribution;
pub use controller::{
    evaluate, read_snapshot, ComputeStatus, Evaluation, GroupState, InputSnapshot,
    PositionListNode,
};
pub use host::{HostError, InputSource, OutputSink};
pub use normalize::normalize;
pub use registry::{
    initialize_plugin, uninitialize_plugin, NodeRegistry, NodeTypeInfo, RegistryError, TypeId,
};
pub use runtime::{EntryInput, NodeRuntime};
pub use schema::{AttrId, AttributeDescriptor, OutputKind, Schema, SchemaError};
pub use transform::{build_position_matrix, invert_position_matrix};
pub use poslist_api_core::{Distance, LinearUnit, Matrix4, Value, ValueKind, Vec3};
