//! Value: attribute payloads exchanged with a host across the read/write boundary.

use serde::{Deserialize, Serialize};

use crate::{Distance, Matrix4, Vec3};

/// Coarse kind of a [`Value`], used for type checks and error reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Int,
    Bool,
    Float,
    Distance,
    Vec3,
    Matrix,
    Text,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    /// Integer (enum-like selectors such as `active`)
    Int(i32),

    /// Boolean toggle
    Bool(bool),

    /// Unit-less scalar (weights)
    Float(f32),

    /// Length in an explicit unit
    Distance(Distance),

    /// Unit-less 3D vector in the engine's internal space
    Vec3(Vec3),

    /// Row-major 4x4 matrix
    Matrix(Matrix4),

    /// Display text
    Text(String),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Bool(_) => ValueKind::Bool,
            Value::Float(_) => ValueKind::Float,
            Value::Distance(_) => ValueKind::Distance,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Matrix(_) => ValueKind::Matrix,
            Value::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_distance(&self) -> Option<Distance> {
        match self {
            Value::Distance(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Value::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix4> {
        match self {
            Value::Matrix(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}
