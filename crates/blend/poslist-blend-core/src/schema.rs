//! Static attribute schema for a position list node.
//!
//! A [`Schema`] is built once per node type from its [`NodeConfig`] and shared (behind an
//! `Arc`) by every node of that type. It owns the attribute table, the `affects` edges from
//! inputs to outputs, and the membership of the single output group.

use hashbrown::HashMap;
use poslist_api_core::{Distance, Matrix4, Value, ValueKind, Vec3};
use thiserror::Error;

use crate::config::NodeConfig;

/// Index of an attribute inside its [`Schema`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrId(pub u16);

/// Storage kind of an attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttrKind {
    Int,
    Bool,
    Float,
    Distance,
    Text,
    Matrix,
    /// Parent of child attributes. Reads and writes of a three-distance compound use
    /// [`Value::Vec3`] in the host unit.
    Compound,
}

impl AttrKind {
    /// Value kind a host must supply for this attribute.
    pub fn value_kind(self) -> ValueKind {
        match self {
            AttrKind::Int => ValueKind::Int,
            AttrKind::Bool => ValueKind::Bool,
            AttrKind::Float => ValueKind::Float,
            AttrKind::Distance => ValueKind::Distance,
            AttrKind::Text => ValueKind::Text,
            AttrKind::Matrix => ValueKind::Matrix,
            AttrKind::Compound => ValueKind::Vec3,
        }
    }
}

/// Role of an output attribute inside the output group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OutputKind {
    VectorX,
    VectorY,
    VectorZ,
    Vector,
    Matrix,
    InverseMatrix,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDescriptor {
    pub id: AttrId,
    pub name: &'static str,
    pub short_name: &'static str,
    pub kind: AttrKind,
    pub parent: Option<AttrId>,
    pub children: Vec<AttrId>,
    /// Array attribute (one value per list element).
    pub array: bool,
    pub writable: bool,
    pub storable: bool,
    pub default: Option<Value>,
    /// Inclusive soft range enforced at the input boundary.
    pub range: Option<(f32, f32)>,
    /// `Some` for members of the output group.
    pub output: Option<OutputKind>,
}

impl AttributeDescriptor {
    fn new(id: AttrId, name: &'static str, short_name: &'static str, kind: AttrKind) -> Self {
        Self {
            id,
            name,
            short_name,
            kind,
            parent: None,
            children: Vec::new(),
            array: false,
            writable: true,
            storable: true,
            default: None,
            range: None,
            output: None,
        }
    }

    pub fn is_output(&self) -> bool {
        self.output.is_some()
    }
}

/// Handles to the attributes the controller touches on every recompute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SchemaHandles {
    pub active: AttrId,
    pub normalize_weights: AttrId,
    pub list: AttrId,
    pub name: AttrId,
    pub weight: AttrId,
    pub absolute: AttrId,
    pub entry_vector: AttrId,
    pub entry_components: [AttrId; 3],
    pub output_vector: AttrId,
    pub output_components: [AttrId; 3],
    pub matrix: AttrId,
    pub inverse_matrix: Option<AttrId>,
}

#[derive(Debug)]
pub struct Schema {
    config: NodeConfig,
    attributes: Vec<AttributeDescriptor>,
    by_name: HashMap<&'static str, AttrId>,
    affects: HashMap<AttrId, Vec<AttrId>>,
    output_group: Vec<AttrId>,
    handles: SchemaHandles,
}

struct Builder {
    attributes: Vec<AttributeDescriptor>,
}

impl Builder {
    fn add(&mut self, name: &'static str, short_name: &'static str, kind: AttrKind) -> AttrId {
        let id = AttrId(self.attributes.len() as u16);
        self.attributes.push(AttributeDescriptor::new(id, name, short_name, kind));
        id
    }

    fn get_mut(&mut self, id: AttrId) -> &mut AttributeDescriptor {
        &mut self.attributes[id.0 as usize]
    }

    fn compound(
        &mut self,
        name: &'static str,
        short_name: &'static str,
        children: &[AttrId],
    ) -> AttrId {
        let parent = self.add(name, short_name, AttrKind::Compound);
        for child in children {
            self.get_mut(*child).parent = Some(parent);
        }
        self.get_mut(parent).children = children.to_vec();
        parent
    }

    fn distance_triplet(&mut self, names: [(&'static str, &'static str); 3]) -> [AttrId; 3] {
        names.map(|(n, s)| {
            let id = self.add(n, s, AttrKind::Distance);
            self.get_mut(id).default = Some(Value::Distance(Distance::centimeters(0.0)));
            id
        })
    }

    fn mark_output(&mut self, id: AttrId, kind: OutputKind) {
        let attr = self.get_mut(id);
        attr.output = Some(kind);
        attr.writable = false;
        attr.storable = false;
    }
}

impl Schema {
    /// Declare every attribute of a position list node configured by `config`.
    pub fn new(config: &NodeConfig) -> Self {
        let mut b = Builder {
            attributes: Vec::new(),
        };

        // Inputs
        let active = b.add("active", "a", AttrKind::Int);
        b.get_mut(active).default = Some(Value::Int(0));

        let normalize_weights = b.add("normalizeWeights", "nw", AttrKind::Bool);
        b.get_mut(normalize_weights).default = Some(Value::Bool(false));

        let name = b.add("name", "n", AttrKind::Text);
        b.get_mut(name).default = Some(Value::Text(String::new()));

        let weight = b.add("weight", "w", AttrKind::Float);
        b.get_mut(weight).default = Some(Value::Float(1.0));
        b.get_mut(weight).range = Some((-1.0, 1.0));

        let absolute = b.add("absolute", "abs", AttrKind::Bool);
        b.get_mut(absolute).default = Some(Value::Bool(false));

        let (entry_long, entry_short) = config.naming.entry_vector();
        let entry_components = b.distance_triplet(config.naming.entry_components());
        let entry_vector = b.compound(entry_long, entry_short, &entry_components);

        let list = b.compound("list", "l", &[name, weight, absolute, entry_vector]);
        b.get_mut(list).array = true;

        // Outputs
        let (out_long, out_short) = config.naming.output_vector();
        let output_components = b.distance_triplet(config.naming.output_components());
        let output_vector = b.compound(out_long, out_short, &output_components);
        for (id, kind) in output_components
            .iter()
            .zip([OutputKind::VectorX, OutputKind::VectorY, OutputKind::VectorZ])
        {
            b.mark_output(*id, kind);
        }
        b.mark_output(output_vector, OutputKind::Vector);

        let matrix = b.add("matrix", "m", AttrKind::Matrix);
        b.get_mut(matrix).default = Some(Value::Matrix(Matrix4::IDENTITY));
        b.mark_output(matrix, OutputKind::Matrix);

        let inverse_matrix = if config.expose_inverse_matrix {
            let id = b.add("inverseMatrix", "im", AttrKind::Matrix);
            b.get_mut(id).default = Some(Value::Matrix(Matrix4::IDENTITY));
            b.mark_output(id, OutputKind::InverseMatrix);
            Some(id)
        } else {
            None
        };

        let mut output_group: Vec<AttrId> = output_components.to_vec();
        output_group.push(output_vector);
        output_group.push(matrix);
        output_group.extend(inverse_matrix);

        // Every output depends on the flags, the list itself, and every entry field except
        // `name`.
        let mut drivers = vec![active, normalize_weights, list, weight, absolute, entry_vector];
        drivers.extend(entry_components);
        let affects: HashMap<AttrId, Vec<AttrId>> = drivers
            .into_iter()
            .map(|input| (input, output_group.clone()))
            .collect();

        let mut by_name = HashMap::new();
        for attr in &b.attributes {
            by_name.insert(attr.name, attr.id);
            by_name.insert(attr.short_name, attr.id);
        }

        Schema {
            config: config.clone(),
            attributes: b.attributes,
            by_name,
            affects,
            output_group,
            handles: SchemaHandles {
                active,
                normalize_weights,
                list,
                name,
                weight,
                absolute,
                entry_vector,
                entry_components,
                output_vector,
                output_components,
                matrix,
                inverse_matrix,
            },
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn handles(&self) -> &SchemaHandles {
        &self.handles
    }

    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// Descriptor for `id`. Ids are only ever minted by this schema.
    pub fn attribute(&self, id: AttrId) -> &AttributeDescriptor {
        &self.attributes[id.0 as usize]
    }

    /// Resolve a long or short attribute name.
    pub fn lookup(&self, name: &str) -> Result<AttrId, SchemaError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SchemaError::UnknownAttribute(name.to_string()))
    }

    /// Output role of `id`, or `None` when it is not part of the output group.
    pub fn output_kind(&self, id: AttrId) -> Option<OutputKind> {
        self.attributes.get(id.0 as usize).and_then(|a| a.output)
    }

    /// Outputs in the single recompute group, in write order.
    pub fn output_group(&self) -> &[AttrId] {
        &self.output_group
    }

    /// Outputs that must be dirtied when `input` changes. Empty for `name` and for outputs.
    pub fn affected_outputs(&self, input: AttrId) -> &[AttrId] {
        self.affects.get(&input).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when `child` is `ancestor` or sits below it.
    pub fn is_within(&self, child: AttrId, ancestor: AttrId) -> bool {
        let mut cursor = Some(child);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.attribute(id).parent;
        }
        false
    }

    /// Blend result vector in the host unit.
    pub(crate) fn vec3_to_host(&self, internal: Vec3) -> Vec3 {
        let unit = self.config.unit;
        internal.map(|cm| unit.from_centimeters(cm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NamingScheme;

    fn names(schema: &Schema, ids: &[AttrId]) -> Vec<&'static str> {
        ids.iter().map(|id| schema.attribute(*id).name).collect()
    }

    #[test]
    fn position_variant_declares_value_and_matrix() {
        let schema = Schema::new(&NodeConfig::position_list());
        assert_eq!(
            names(&schema, schema.output_group()),
            vec!["valueX", "valueY", "valueZ", "value", "matrix"]
        );
        assert!(schema.lookup("inverseMatrix").is_err());
        assert_eq!(schema.lookup("px"), schema.lookup("positionX"));
        let pos = schema.lookup("position").unwrap();
        assert_eq!(
            names(&schema, &schema.attribute(pos).children),
            vec!["positionX", "positionY", "positionZ"]
        );
    }

    #[test]
    fn translate_variant_declares_output_and_inverse() {
        let schema = Schema::new(&NodeConfig::translate_list());
        assert_eq!(schema.config().naming, NamingScheme::Translate);
        assert_eq!(
            names(&schema, schema.output_group()),
            vec!["outputX", "outputY", "outputZ", "output", "matrix", "inverseMatrix"]
        );
        assert!(schema.lookup("translateZ").is_ok());
        assert_eq!(schema.lookup("tz"), schema.lookup("translateZ"));
        assert!(schema.lookup("position").is_err());
    }

    #[test]
    fn name_affects_nothing_and_weight_affects_everything() {
        let schema = Schema::new(&NodeConfig::translate_list());
        let h = *schema.handles();
        assert!(schema.affected_outputs(h.name).is_empty());
        assert_eq!(schema.affected_outputs(h.weight), schema.output_group());
        assert_eq!(schema.affected_outputs(h.active), schema.output_group());
        for component in h.entry_components {
            assert_eq!(schema.affected_outputs(component), schema.output_group());
        }
        assert!(schema.affected_outputs(h.matrix).is_empty());
    }

    #[test]
    fn output_kinds_and_flags() {
        let schema = Schema::new(&NodeConfig::translate_list());
        let h = *schema.handles();
        assert_eq!(schema.output_kind(h.matrix), Some(OutputKind::Matrix));
        assert_eq!(
            schema.output_kind(h.inverse_matrix.unwrap()),
            Some(OutputKind::InverseMatrix)
        );
        assert_eq!(schema.output_kind(h.output_components[1]), Some(OutputKind::VectorY));
        assert_eq!(schema.output_kind(h.weight), None);
        assert_eq!(schema.output_kind(AttrId(999)), None);
        let m = schema.attribute(h.matrix);
        assert!(!m.writable && !m.storable);
    }

    #[test]
    fn weight_is_ranged_list_child() {
        let schema = Schema::new(&NodeConfig::default());
        let h = *schema.handles();
        let w = schema.attribute(h.weight);
        assert_eq!(w.range, Some((-1.0, 1.0)));
        assert_eq!(w.default, Some(Value::Float(1.0)));
        assert_eq!(w.parent, Some(h.list));
        assert!(schema.attribute(h.list).array);
        assert!(schema.is_within(h.entry_components[2], h.list));
        assert!(!schema.is_within(h.matrix, h.list));
    }

    #[test]
    fn unknown_lookup_reports_name() {
        let schema = Schema::new(&NodeConfig::default());
        assert_eq!(
            schema.lookup("scale"),
            Err(SchemaError::UnknownAttribute("scale".to_string()))
        );
    }
}
