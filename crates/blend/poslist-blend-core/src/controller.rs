//! Evaluation controller: dirty tracking and on-demand recompute of the output group.
//!
//! Every output of a node (vector components, vector compound, matrix, optional inverse
//! matrix) belongs to one group with one [`GroupState`]. A change to any declared dependency
//! marks the group dirty; the next read of any group member snapshots the inputs, runs
//! normalize -> blend -> matrix, hands the complete batch to the host and marks the group
//! clean. Reads of a clean group are served from the host's stored outputs.

use std::sync::Arc;

use log::{debug, trace};
use poslist_api_core::{Distance, Matrix4, Value, Vec3, WriteBatch, WriteOp};

use crate::blend::average;
use crate::host::{HostError, InputSource, OutputSink};
use crate::normalize::normalize;
use crate::schema::{AttrId, OutputKind, Schema};
use crate::transform::{build_position_matrix, invert_position_matrix};
use crate::Contribution;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GroupState {
    /// Outputs do not reflect the current inputs (initial state).
    #[default]
    Dirty,
    Clean,
}

/// Outcome of a [`PositionListNode::compute`] request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComputeStatus {
    /// The group was dirty; outputs were recomputed and written.
    Computed,
    /// The group was already clean; nothing ran.
    Cached,
    /// The attribute is not one of this node's outputs. Route it elsewhere.
    Unhandled,
}

/// Inputs captured at the start of one recompute, positions in centimeters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// Reserved selector. Read and tracked as a dependency but not used by the blend.
    pub active: i32,
    pub normalize_weights: bool,
    pub contributions: Vec<Contribution>,
}

/// Result of running the pipeline over one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Contributions as consumed by the blend (weights normalized when requested).
    pub contributions: Vec<Contribution>,
    pub result: Vec3,
    pub matrix: Matrix4,
    pub inverse_matrix: Option<Matrix4>,
}

/// Run normalize (if enabled) -> blend -> matrix over `snapshot`.
pub fn evaluate(snapshot: InputSnapshot, expose_inverse_matrix: bool) -> Evaluation {
    let InputSnapshot {
        normalize_weights,
        mut contributions,
        ..
    } = snapshot;

    if normalize_weights {
        normalize(&mut contributions);
    }
    let result = average(&contributions);
    let matrix = build_position_matrix(result);
    let inverse_matrix = expose_inverse_matrix.then(|| invert_position_matrix(&matrix));

    Evaluation {
        contributions,
        result,
        matrix,
        inverse_matrix,
    }
}

impl Evaluation {
    /// Every output in `schema`'s group, vector components converted to the host unit.
    pub fn to_write_batch(&self, schema: &Schema) -> WriteBatch {
        let unit = schema.config().unit;
        let group = schema.output_group();
        let component = |cm: f64| Value::Distance(Distance::from_centimeters(cm, unit));
        let mut batch = WriteBatch::with_capacity(group.len());
        for id in group {
            let attr = schema.attribute(*id);
            let value = match attr.output {
                Some(OutputKind::VectorX) => component(self.result.x),
                Some(OutputKind::VectorY) => component(self.result.y),
                Some(OutputKind::VectorZ) => component(self.result.z),
                Some(OutputKind::Vector) => Value::Vec3(schema.vec3_to_host(self.result)),
                Some(OutputKind::Matrix) => Value::Matrix(self.matrix),
                Some(OutputKind::InverseMatrix) => Value::Matrix(
                    self.inverse_matrix
                        .unwrap_or_else(|| invert_position_matrix(&self.matrix)),
                ),
                None => continue,
            };
            batch.push(WriteOp::new(attr.name, value));
        }
        batch
    }
}

/// Capture the current inputs through `data`.
pub fn read_snapshot(
    schema: &Schema,
    data: &impl InputSource,
) -> Result<InputSnapshot, HostError> {
    let h = schema.handles();

    let active = expect_kind(schema, h.active, data.read(h.active)?, Value::as_int)?;
    let normalize_weights = expect_kind(
        schema,
        h.normalize_weights,
        data.read(h.normalize_weights)?,
        Value::as_bool,
    )?;

    let count = data.element_count(h.list)?;
    let mut contributions = Vec::with_capacity(count);
    for index in 0..count {
        let element = |child: AttrId| data.read_element(h.list, index, child);

        let name = expect_kind(schema, h.name, element(h.name)?, |v| {
            v.as_text().map(str::to_string)
        })?;
        let weight = expect_kind(schema, h.weight, element(h.weight)?, Value::as_float)?;
        let absolute = expect_kind(schema, h.absolute, element(h.absolute)?, Value::as_bool)?;

        let mut position = [0.0f64; 3];
        for (slot, child) in position.iter_mut().zip(h.entry_components) {
            let distance = expect_kind(schema, child, element(child)?, Value::as_distance)?;
            *slot = distance.as_centimeters();
        }

        contributions.push(Contribution {
            name,
            weight,
            absolute,
            position: position.into(),
        });
    }

    Ok(InputSnapshot {
        active,
        normalize_weights,
        contributions,
    })
}

fn expect_kind<T>(
    schema: &Schema,
    attr: AttrId,
    value: Value,
    get: impl FnOnce(&Value) -> Option<T>,
) -> Result<T, HostError> {
    get(&value).ok_or_else(|| {
        let descriptor = schema.attribute(attr);
        HostError::KindMismatch {
            attribute: descriptor.name.to_string(),
            expected: descriptor.kind.value_kind(),
            found: value.kind(),
        }
    })
}

/// One position list node: a schema handle plus the state of its output group.
#[derive(Debug)]
pub struct PositionListNode {
    name: String,
    schema: Arc<Schema>,
    state: GroupState,
    recomputes: u64,
}

impl PositionListNode {
    pub fn new(name: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self {
            name: name.into(),
            schema,
            state: GroupState::Dirty,
            recomputes: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn state(&self) -> GroupState {
        self.state
    }

    /// Number of times the pipeline has run for this node.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Notify the node that `attr` changed. Returns `true` when `attr` drives the output group,
    /// in which case the group is now dirty.
    pub fn input_changed(&mut self, attr: AttrId) -> bool {
        if self.schema.affected_outputs(attr).is_empty() {
            return false;
        }
        if self.state == GroupState::Clean {
            trace!(
                "{}: '{}' changed, output group dirty",
                self.name,
                self.schema.attribute(attr).name
            );
        }
        self.state = GroupState::Dirty;
        true
    }

    /// Serve a read request for `plug`.
    ///
    /// Attributes outside the output group return [`ComputeStatus::Unhandled`] without side
    /// effects. A clean group returns [`ComputeStatus::Cached`]. Otherwise the pipeline runs
    /// and the whole group is written in one batch; the group only turns clean once the host
    /// accepted that batch.
    pub fn compute(
        &mut self,
        plug: AttrId,
        data: &impl InputSource,
        sink: &mut impl OutputSink,
    ) -> Result<ComputeStatus, HostError> {
        let Some(kind) = self.schema.output_kind(plug) else {
            return Ok(ComputeStatus::Unhandled);
        };
        if self.state == GroupState::Clean {
            return Ok(ComputeStatus::Cached);
        }

        let snapshot = read_snapshot(&self.schema, data)?;
        let entries = snapshot.contributions.len();
        let normalized = snapshot.normalize_weights;
        let evaluation = evaluate(snapshot, self.schema.config().expose_inverse_matrix);
        sink.write_batch(evaluation.to_write_batch(&self.schema))?;

        self.state = GroupState::Clean;
        self.recomputes += 1;
        debug!(
            "{}: recomputed for {:?} ({} entries, normalize={}) -> {:?}",
            self.name, kind, entries, normalized, evaluation.result
        );
        Ok(ComputeStatus::Computed)
    }
}
