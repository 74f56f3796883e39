//! Read/write contract between a node and the host that owns its attribute storage.

use poslist_api_core::{Value, ValueKind, WriteBatch};
use thiserror::Error;

use crate::schema::AttrId;

/// Failures reported by a host while serving reads or accepting writes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    #[error("attribute '{0}' is not available on this node")]
    MissingAttribute(String),
    #[error("attribute '{attribute}' expects {expected:?}, got {found:?}")]
    KindMismatch {
        attribute: String,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("list element {index} out of range (len {len})")]
    EntryOutOfRange { index: usize, len: usize },
    #[error("attribute '{attribute}' value {value} outside [{min}, {max}]")]
    OutOfRange {
        attribute: String,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("attribute '{0}' is read-only")]
    ReadOnly(String),
    #[error("host rejected write: {0}")]
    Rejected(String),
}

/// Read side of the host boundary.
///
/// Values come back in the host's representation: positions are [`Value::Distance`] in
/// whatever unit the host stores. The controller does unit conversion itself.
pub trait InputSource {
    /// Value of a non-array attribute.
    fn read(&self, attr: AttrId) -> Result<Value, HostError>;

    /// Number of elements in an array attribute.
    fn element_count(&self, list: AttrId) -> Result<usize, HostError>;

    /// Value of `child` inside element `index` of the array attribute `list`.
    fn read_element(&self, list: AttrId, index: usize, child: AttrId) -> Result<Value, HostError>;
}

/// Write side of the host boundary.
pub trait OutputSink {
    /// Store every output of one recompute. Implementations must apply the whole batch or
    /// return an error without applying any of it.
    fn write_batch(&mut self, batch: WriteBatch) -> Result<(), HostError>;
}
