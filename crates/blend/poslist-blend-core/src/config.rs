//! Node configuration: which attribute names a node exposes, whether it publishes the
//! inverse matrix, and which length unit the host speaks.

use poslist_api_core::LinearUnit;
use serde::{Deserialize, Serialize};

/// Attribute naming used by a node variant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// Entries carry `position`, the blend is published as `value`.
    #[default]
    Position,
    /// Entries carry `translate`, the blend is published as `output`.
    Translate,
}

impl NamingScheme {
    /// Long and short name of the per-entry vector compound.
    pub fn entry_vector(self) -> (&'static str, &'static str) {
        match self {
            NamingScheme::Position => ("position", "p"),
            NamingScheme::Translate => ("translate", "t"),
        }
    }

    /// Long and short names of the entry vector's X/Y/Z children.
    pub fn entry_components(self) -> [(&'static str, &'static str); 3] {
        match self {
            NamingScheme::Position => {
                [("positionX", "px"), ("positionY", "py"), ("positionZ", "pz")]
            }
            NamingScheme::Translate => {
                [("translateX", "tx"), ("translateY", "ty"), ("translateZ", "tz")]
            }
        }
    }

    /// Long and short name of the blended output compound.
    pub fn output_vector(self) -> (&'static str, &'static str) {
        match self {
            NamingScheme::Position => ("value", "v"),
            NamingScheme::Translate => ("output", "o"),
        }
    }

    /// Long and short names of the output vector's X/Y/Z children.
    pub fn output_components(self) -> [(&'static str, &'static str); 3] {
        match self {
            NamingScheme::Position => [("valueX", "vx"), ("valueY", "vy"), ("valueZ", "vz")],
            NamingScheme::Translate => [("outputX", "ox"), ("outputY", "oy"), ("outputZ", "oz")],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub naming: NamingScheme,
    /// Publish `inverseMatrix` alongside `matrix`.
    #[serde(default)]
    pub expose_inverse_matrix: bool,
    /// Length unit used for positions on both sides of the host boundary.
    #[serde(default)]
    pub unit: LinearUnit,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::position_list()
    }
}

impl NodeConfig {
    /// `position` / `value` / `matrix`.
    pub fn position_list() -> Self {
        Self {
            naming: NamingScheme::Position,
            expose_inverse_matrix: false,
            unit: LinearUnit::Centimeters,
        }
    }

    /// `translate` / `output` / `matrix` / `inverseMatrix`.
    pub fn translate_list() -> Self {
        Self {
            naming: NamingScheme::Translate,
            expose_inverse_matrix: true,
            unit: LinearUnit::Centimeters,
        }
    }

    pub fn with_unit(mut self, unit: LinearUnit) -> Self {
        self.unit = unit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: NodeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, NodeConfig::position_list());
    }

    #[test]
    fn parses_translate_variant_with_unit() {
        let cfg: NodeConfig = serde_json::from_str(
            r#"{ "naming": "translate", "expose_inverse_matrix": true, "unit": "inches" }"#,
        )
        .unwrap();
        assert_eq!(cfg, NodeConfig::translate_list().with_unit(LinearUnit::Inches));
        assert_eq!(cfg.naming.output_vector(), ("output", "o"));
        assert_eq!(cfg.naming.entry_components()[0], ("translateX", "tx"));
    }
}
