//! Node type registration.
//!
//! A host registers node types once at load time. Registration builds the type's [`Schema`];
//! every node created from the type shares it.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use log::{info, warn};
use thiserror::Error;

use crate::config::NodeConfig;
use crate::controller::PositionListNode;
use crate::schema::Schema;

/// Numeric node type id, unique per host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

pub const POSITION_LIST_ID: TypeId = TypeId(0x0013_b1c5);
pub const TRANSLATE_LIST_ID: TypeId = TypeId(0x0013_b1c6);

#[derive(Clone, Debug, PartialEq)]
pub struct NodeTypeInfo {
    pub name: String,
    pub id: TypeId,
    pub config: NodeConfig,
}

impl NodeTypeInfo {
    pub fn new(name: impl Into<String>, id: TypeId, config: NodeConfig) -> Self {
        Self {
            name: name.into(),
            id,
            config,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("node type name '{0}' is already registered")]
    DuplicateName(String),
    #[error("node type id {0} is already registered")]
    DuplicateId(TypeId),
    #[error("node type id {0} is not registered")]
    UnknownId(TypeId),
    #[error("node type '{0}' is not registered")]
    UnknownName(String),
}

#[derive(Debug)]
struct Registered {
    info: NodeTypeInfo,
    schema: Arc<Schema>,
    created: u64,
}

#[derive(Debug, Default)]
pub struct NodeRegistry {
    types: HashMap<TypeId, Registered>,
    names: HashMap<String, TypeId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node type and build its schema.
    pub fn register(&mut self, info: NodeTypeInfo) -> Result<Arc<Schema>, RegistryError> {
        if self.names.contains_key(&info.name) {
            return Err(RegistryError::DuplicateName(info.name));
        }
        if self.types.contains_key(&info.id) {
            return Err(RegistryError::DuplicateId(info.id));
        }

        let schema = Arc::new(Schema::new(&info.config));
        info!(
            "registered node type '{}' ({}, {} attributes)",
            info.name,
            info.id,
            schema.attributes().len()
        );
        self.names.insert(info.name.clone(), info.id);
        self.types.insert(
            info.id,
            Registered {
                info,
                schema: schema.clone(),
                created: 0,
            },
        );
        Ok(schema)
    }

    /// Remove a node type. Nodes already created keep their schema alive.
    pub fn deregister(&mut self, id: TypeId) -> Result<NodeTypeInfo, RegistryError> {
        let registered = self.types.remove(&id).ok_or(RegistryError::UnknownId(id))?;
        self.names.remove(&registered.info.name);
        info!("deregistered node type '{}' ({})", registered.info.name, id);
        Ok(registered.info)
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    pub fn info(&self, id: TypeId) -> Option<&NodeTypeInfo> {
        self.types.get(&id).map(|r| &r.info)
    }

    pub fn schema(&self, id: TypeId) -> Option<&Arc<Schema>> {
        self.types.get(&id).map(|r| &r.schema)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Create a node of the named type. Nodes are named `<type><n>` with `n` counting from 1.
    pub fn create(&mut self, type_name: &str) -> Result<PositionListNode, RegistryError> {
        let id = self
            .lookup(type_name)
            .ok_or_else(|| RegistryError::UnknownName(type_name.to_string()))?;
        let registered = self.types.get_mut(&id).ok_or(RegistryError::UnknownId(id))?;
        registered.created += 1;
        let name = format!("{}{}", registered.info.name, registered.created);
        Ok(PositionListNode::new(name, registered.schema.clone()))
    }
}

/// Node types shipped with the plugin.
pub fn builtin_types() -> [NodeTypeInfo; 2] {
    [
        NodeTypeInfo::new("positionList", POSITION_LIST_ID, NodeConfig::position_list()),
        NodeTypeInfo::new("translateList", TRANSLATE_LIST_ID, NodeConfig::translate_list()),
    ]
}

/// Register every builtin type. On failure, types registered by this call are removed again.
pub fn initialize_plugin(registry: &mut NodeRegistry) -> Result<(), RegistryError> {
    let mut done = Vec::new();
    for info in builtin_types() {
        let id = info.id;
        if let Err(err) = registry.register(info) {
            warn!("register node type failed: {err}");
            for id in done {
                // Just registered by us, cannot be missing.
                let _ = registry.deregister(id);
            }
            return Err(err);
        }
        done.push(id);
    }
    Ok(())
}

/// Deregister every builtin type. All types are attempted; the first error is returned.
pub fn uninitialize_plugin(registry: &mut NodeRegistry) -> Result<(), RegistryError> {
    let mut first_err = None;
    for info in builtin_types() {
        if let Err(err) = registry.deregister(info.id) {
            warn!("deregister node type failed: {err}");
            first_err.get_or_insert(err);
        }
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
