//! Linear units at the host boundary.
//!
//! The blend engine is unit-agnostic and works in centimeters internally. Hosts hand
//! positions over as [`Distance`] values in whatever unit their UI uses; conversion happens
//! once on read and once on write.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported length units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinearUnit {
    Millimeters,
    #[default]
    Centimeters,
    Meters,
    Kilometers,
    Inches,
    Feet,
    Yards,
    Miles,
}

impl LinearUnit {
    pub const ALL: [LinearUnit; 8] = [
        LinearUnit::Millimeters,
        LinearUnit::Centimeters,
        LinearUnit::Meters,
        LinearUnit::Kilometers,
        LinearUnit::Inches,
        LinearUnit::Feet,
        LinearUnit::Yards,
        LinearUnit::Miles,
    ];

    /// Number of centimeters in one of this unit.
    pub fn centimeters_per_unit(self) -> f64 {
        match self {
            LinearUnit::Millimeters => 0.1,
            LinearUnit::Centimeters => 1.0,
            LinearUnit::Meters => 100.0,
            LinearUnit::Kilometers => 100_000.0,
            LinearUnit::Inches => 2.54,
            LinearUnit::Feet => 30.48,
            LinearUnit::Yards => 91.44,
            LinearUnit::Miles => 160_934.4,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LinearUnit::Millimeters => "mm",
            LinearUnit::Centimeters => "cm",
            LinearUnit::Meters => "m",
            LinearUnit::Kilometers => "km",
            LinearUnit::Inches => "in",
            LinearUnit::Feet => "ft",
            LinearUnit::Yards => "yd",
            LinearUnit::Miles => "mi",
        }
    }

    /// Lowercase long name, as used in serialized configs.
    pub fn name(self) -> &'static str {
        match self {
            LinearUnit::Millimeters => "millimeters",
            LinearUnit::Centimeters => "centimeters",
            LinearUnit::Meters => "meters",
            LinearUnit::Kilometers => "kilometers",
            LinearUnit::Inches => "inches",
            LinearUnit::Feet => "feet",
            LinearUnit::Yards => "yards",
            LinearUnit::Miles => "miles",
        }
    }

    /// Convert a raw value expressed in this unit to centimeters.
    #[inline]
    pub fn to_centimeters(self, value: f64) -> f64 {
        match self {
            LinearUnit::Centimeters => value,
            other => value * other.centimeters_per_unit(),
        }
    }

    /// Convert a raw centimeter value into this unit.
    #[inline]
    pub fn from_centimeters(self, cm: f64) -> f64 {
        match self {
            LinearUnit::Centimeters => cm,
            other => cm / other.centimeters_per_unit(),
        }
    }
}

impl fmt::Display for LinearUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown linear unit '{0}'")]
pub struct UnitParseError(pub String);

impl FromStr for LinearUnit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        LinearUnit::ALL
            .into_iter()
            .find(|unit| unit.symbol() == lowered || unit.name() == lowered)
            .ok_or_else(|| UnitParseError(s.to_string()))
    }
}

/// A length tagged with its unit.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub unit: LinearUnit,
}

impl Distance {
    pub fn new(value: f64, unit: LinearUnit) -> Self {
        Distance { value, unit }
    }

    pub fn centimeters(value: f64) -> Self {
        Distance::new(value, LinearUnit::Centimeters)
    }

    /// Build a distance in `unit` from an internal centimeter value.
    pub fn from_centimeters(cm: f64, unit: LinearUnit) -> Self {
        Distance::new(unit.from_centimeters(cm), unit)
    }

    #[inline]
    pub fn as_centimeters(&self) -> f64 {
        self.unit.to_centimeters(self.value)
    }

    /// Re-express the same length in `unit`.
    pub fn to_unit(self, unit: LinearUnit) -> Distance {
        if unit == self.unit {
            return self;
        }
        Distance::from_centimeters(self.as_centimeters(), unit)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}
