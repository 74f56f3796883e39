//! Write operations produced by a recompute, addressed by attribute name.
//!
//! A recompute builds the complete [`WriteBatch`] for its output group before anything is
//! handed to the host, so the host either receives every output or none of them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOp {
    /// Long attribute name, e.g. `valueX` or `inverseMatrix`
    pub attribute: String,
    pub value: Value,
}

impl WriteOp {
    pub fn new(attribute: impl Into<String>, value: Value) -> Self {
        Self {
            attribute: attribute.into(),
            value,
        }
    }
}

/// A batch of write operations. One batch per output group recompute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBatch(pub Vec<WriteOp>);

impl WriteBatch {
    pub fn with_capacity(n: usize) -> Self {
        WriteBatch(Vec::with_capacity(n))
    }

    pub fn push(&mut self, op: WriteOp) {
        self.0.push(op);
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|op| op.attribute == attribute)
            .map(|op| &op.value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOp;
    type IntoIter = std::vec::IntoIter<WriteOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val = serde_json::to_string(&self.value).map_err(|_| fmt::Error)?;
        write!(f, "{{ attribute: {}, value: {} }}", self.attribute, val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Distance, Matrix4};

    #[test]
    fn get_finds_by_attribute_name() {
        let mut b = WriteBatch::with_capacity(2);
        b.push(WriteOp::new("valueX", Value::Distance(Distance::centimeters(5.0))));
        b.push(WriteOp::new("matrix", Value::Matrix(Matrix4::IDENTITY)));
        assert_eq!(b.len(), 2);
        assert_eq!(
            b.get("valueX"),
            Some(&Value::Distance(Distance::centimeters(5.0)))
        );
        assert!(b.get("valueY").is_none());
    }

    #[test]
    fn display_includes_json_value() {
        let op = WriteOp::new("weight", Value::Float(0.25));
        assert_eq!(
            op.to_string(),
            r#"{ attribute: weight, value: {"type":"float","data":0.25} }"#
        );
    }
}
