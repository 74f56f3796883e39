//! poslist-api-core: value types shared by the position list blender (engine-agnostic)

pub mod matrix;
pub mod unit;
pub mod value;
pub mod vector;
pub mod write_ops;

pub use matrix::Matrix4;
pub use unit::{Distance, LinearUnit, UnitParseError};
pub use value::{Value, ValueKind};
pub use vector::Vec3;
pub use write_ops::{WriteBatch, WriteOp};
