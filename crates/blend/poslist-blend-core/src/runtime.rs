//! In-memory host for a single position list node.
//!
//! [`NodeRuntime`] stores input values in the host unit, forwards every change to the node so
//! the output group is dirtied, and serves reads by computing on demand. It is the reference
//! host used by tests and benchmarks.

use std::sync::Arc;

use hashbrown::HashMap;
use poslist_api_core::{Distance, Value, Vec3, WriteBatch};

use crate::controller::{ComputeStatus, PositionListNode};
use crate::host::{HostError, InputSource, OutputSink};
use crate::schema::{AttrId, Schema};

/// One list element as supplied by a host, position in the host unit.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryInput {
    pub name: String,
    pub weight: f32,
    pub absolute: bool,
    pub position: Vec3,
}

impl EntryInput {
    pub fn new(name: impl Into<String>, weight: f32, absolute: bool, position: Vec3) -> Self {
        Self {
            name: name.into(),
            weight,
            absolute,
            position,
        }
    }
}

/// Stored input values. Missing values fall back to the schema defaults.
#[derive(Debug)]
pub struct InputStore {
    schema: Arc<Schema>,
    values: HashMap<AttrId, Value>,
    elements: Vec<HashMap<AttrId, Value>>,
}

impl InputStore {
    fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            values: HashMap::new(),
            elements: Vec::new(),
        }
    }

    fn default_for(&self, attr: AttrId) -> Result<Value, HostError> {
        let descriptor = self.schema.attribute(attr);
        descriptor
            .default
            .clone()
            .ok_or_else(|| HostError::MissingAttribute(descriptor.name.to_string()))
    }

    fn element(&self, index: usize) -> Result<&HashMap<AttrId, Value>, HostError> {
        self.elements.get(index).ok_or(HostError::EntryOutOfRange {
            index,
            len: self.elements.len(),
        })
    }
}

impl InputSource for InputStore {
    fn read(&self, attr: AttrId) -> Result<Value, HostError> {
        match self.values.get(&attr) {
            Some(v) => Ok(v.clone()),
            None => self.default_for(attr),
        }
    }

    fn element_count(&self, list: AttrId) -> Result<usize, HostError> {
        if list != self.schema.handles().list {
            return Err(HostError::MissingAttribute(
                self.schema.attribute(list).name.to_string(),
            ));
        }
        Ok(self.elements.len())
    }

    fn read_element(&self, list: AttrId, index: usize, child: AttrId) -> Result<Value, HostError> {
        self.element_count(list)?;
        match self.element(index)?.get(&child) {
            Some(v) => Ok(v.clone()),
            None => self.default_for(child),
        }
    }
}

/// Last written outputs, keyed by long attribute name.
#[derive(Debug, Default)]
pub struct OutputStore {
    values: HashMap<String, Value>,
    batches: u64,
}

impl OutputStore {
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute)
    }

    /// Number of batches accepted so far.
    pub fn batches(&self) -> u64 {
        self.batches
    }
}

impl OutputSink for OutputStore {
    fn write_batch(&mut self, batch: WriteBatch) -> Result<(), HostError> {
        self.batches += 1;
        self.values.extend(batch.into_iter().map(|op| (op.attribute, op.value)));
        Ok(())
    }
}

/// A node together with the attribute storage it reads from and writes to.
#[derive(Debug)]
pub struct NodeRuntime {
    node: PositionListNode,
    inputs: InputStore,
    outputs: OutputStore,
}

impl NodeRuntime {
    pub fn new(node: PositionListNode) -> Self {
        let inputs = InputStore::new(node.schema().clone());
        Self {
            node,
            inputs,
            outputs: OutputStore::default(),
        }
    }

    pub fn node(&self) -> &PositionListNode {
        &self.node
    }

    pub fn schema(&self) -> &Arc<Schema> {
        self.node.schema()
    }

    pub fn outputs(&self) -> &OutputStore {
        &self.outputs
    }

    pub fn entry_count(&self) -> usize {
        self.inputs.elements.len()
    }

    /// Set a top-level input (`active`, `normalizeWeights`).
    pub fn set(&mut self, attribute: &str, value: Value) -> Result<(), HostError> {
        let attr = self.resolve(attribute)?;
        let schema = self.node.schema().clone();
        let descriptor = schema.attribute(attr);
        if descriptor.is_output() || !descriptor.writable {
            return Err(HostError::ReadOnly(descriptor.name.to_string()));
        }
        if schema.is_within(attr, schema.handles().list) {
            return Err(HostError::Rejected(format!(
                "'{}' belongs to a list element, use set_entry",
                descriptor.name
            )));
        }
        check_value(&schema, attr, &value)?;
        self.inputs.values.insert(attr, value);
        self.node.input_changed(attr);
        Ok(())
    }

    /// Append an element to the list and return its index.
    pub fn push_entry(&mut self, entry: EntryInput) -> Result<usize, HostError> {
        let schema = self.node.schema().clone();
        let h = *schema.handles();
        check_value(&schema, h.weight, &Value::Float(entry.weight))?;

        let mut element = HashMap::new();
        element.insert(h.name, Value::Text(entry.name));
        element.insert(h.weight, Value::Float(entry.weight));
        element.insert(h.absolute, Value::Bool(entry.absolute));
        element.extend(self.split_position(entry.position));
        self.inputs.elements.push(element);

        self.node.input_changed(h.list);
        Ok(self.inputs.elements.len() - 1)
    }

    /// Remove the element at `index`; later elements shift down.
    pub fn remove_entry(&mut self, index: usize) -> Result<EntryInput, HostError> {
        let entry = self.entry(index)?;
        self.inputs.elements.remove(index);
        let list = self.node.schema().handles().list;
        self.node.input_changed(list);
        Ok(entry)
    }

    /// Current values of element `index`, position in the host unit.
    pub fn entry(&self, index: usize) -> Result<EntryInput, HostError> {
        let h = *self.node.schema().handles();
        let list = h.list;
        let read = |child| self.inputs.read_element(list, index, child);

        let mut position = [0.0f64; 3];
        let unit = self.node.schema().config().unit;
        for (slot, child) in position.iter_mut().zip(h.entry_components) {
            *slot = read(child)?
                .as_distance()
                .map(|d| d.to_unit(unit).value)
                .unwrap_or_default();
        }
        Ok(EntryInput {
            name: read(h.name)?.as_text().unwrap_or_default().to_string(),
            weight: read(h.weight)?.as_float().unwrap_or_default(),
            absolute: read(h.absolute)?.as_bool().unwrap_or_default(),
            position: position.into(),
        })
    }

    /// Set one field of element `index`. The entry vector compound accepts [`Value::Vec3`]
    /// in the host unit.
    pub fn set_entry(
        &mut self,
        index: usize,
        attribute: &str,
        value: Value,
    ) -> Result<(), HostError> {
        let attr = self.resolve(attribute)?;
        let schema = self.node.schema().clone();
        let h = *schema.handles();
        if attr == h.list || !schema.is_within(attr, h.list) {
            return Err(HostError::Rejected(format!(
                "'{}' is not a list element field",
                schema.attribute(attr).name
            )));
        }
        check_value(&schema, attr, &value)?;
        self.inputs.element(index)?;

        let updates: Vec<(AttrId, Value)> = match value {
            Value::Vec3(v) if attr == h.entry_vector => self.split_position(v).collect(),
            other => vec![(attr, other)],
        };
        let element = &mut self.inputs.elements[index];
        element.extend(updates);
        self.node.input_changed(attr);
        Ok(())
    }

    /// Read an attribute. Outputs are computed first if the group is dirty; anything else is
    /// served from the input store.
    pub fn get(&mut self, attribute: &str) -> Result<Value, HostError> {
        let attr = self.resolve(attribute)?;
        let list = self.node.schema().handles().list;
        if self.node.schema().is_within(attr, list) {
            return Err(HostError::Rejected(format!(
                "'{attribute}' belongs to a list element, use entry"
            )));
        }
        match self.node.compute(attr, &self.inputs, &mut self.outputs)? {
            ComputeStatus::Computed | ComputeStatus::Cached => {
                let name = self.node.schema().attribute(attr).name;
                match self.outputs.get(name) {
                    Some(v) => Ok(v.clone()),
                    None => self.inputs.default_for(attr),
                }
            }
            ComputeStatus::Unhandled => self.inputs.read(attr),
        }
    }

    fn resolve(&self, attribute: &str) -> Result<AttrId, HostError> {
        self.node
            .schema()
            .lookup(attribute)
            .map_err(|_| HostError::MissingAttribute(attribute.to_string()))
    }

    fn split_position(&self, position: Vec3) -> impl Iterator<Item = (AttrId, Value)> {
        let unit = self.node.schema().config().unit;
        let components = self.node.schema().handles().entry_components;
        components
            .into_iter()
            .zip(position.to_array())
            .map(move |(id, v)| (id, Value::Distance(Distance::new(v, unit))))
    }
}

/// Kind and range checks applied to every host write.
fn check_value(schema: &Schema, attr: AttrId, value: &Value) -> Result<(), HostError> {
    let descriptor = schema.attribute(attr);
    let expected = descriptor.kind.value_kind();
    if value.kind() != expected {
        return Err(HostError::KindMismatch {
            attribute: descriptor.name.to_string(),
            expected,
            found: value.kind(),
        });
    }
    if let (Some((min, max)), Value::Float(f)) = (descriptor.range, value) {
        if *f < min || *f > max {
            return Err(HostError::OutOfRange {
                attribute: descriptor.name.to_string(),
                value: *f,
                min,
                max,
            });
        }
    }
    Ok(())
}
