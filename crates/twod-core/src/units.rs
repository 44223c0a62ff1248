//! Energy unit conversions.
//!
//! Internal units are angular frequencies in rad/fs; wavenumbers are the
//! customary spectroscopic input units.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TwodError};

/// Speed of light in cm/fs.
pub const SPEED_OF_LIGHT_CM_PER_FS: f64 = 2.997_924_58e-5;

/// Conversion factor from 1/cm to rad/fs.
pub const CM_TO_INTERNAL: f64 = 2.0 * std::f64::consts::PI * SPEED_OF_LIGHT_CM_PER_FS;

/// Energy units in which values are supplied or persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EnergyUnits {
    /// Angular frequency in rad/fs.
    #[default]
    #[serde(rename = "int")]
    Internal,
    /// Wavenumbers.
    #[serde(rename = "1/cm")]
    InverseCm,
}

impl EnergyUnits {
    /// Converts a value expressed in these units to internal units.
    pub fn to_internal(self, value: f64) -> f64 {
        match self {
            EnergyUnits::Internal => value,
            EnergyUnits::InverseCm => value * CM_TO_INTERNAL,
        }
    }

    /// Converts a value expressed in internal units to these units.
    pub fn from_internal(self, value: f64) -> f64 {
        match self {
            EnergyUnits::Internal => value,
            EnergyUnits::InverseCm => value / CM_TO_INTERNAL,
        }
    }

    /// Canonical label of the units.
    pub fn label(self) -> &'static str {
        match self {
            EnergyUnits::Internal => "int",
            EnergyUnits::InverseCm => "1/cm",
        }
    }
}

impl fmt::Display for EnergyUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EnergyUnits {
    type Err = TwodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(EnergyUnits::Internal),
            "1/cm" => Ok(EnergyUnits::InverseCm),
            other => Err(TwodError::Serde(
                ErrorInfo::new("unknown-units", "energy units not recognised")
                    .with_context("units", other)
                    .with_hint("use `int` or `1/cm`"),
            )),
        }
    }
}

/// Converts `value` between two unit systems.
pub fn convert(value: f64, from: EnergyUnits, to: EnergyUnits) -> f64 {
    to.from_internal(from.to_internal(value))
}
