//! YAML-configurable calculator settings.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::EnergyUnits;

use crate::lineshape::LineShape;

/// Settings of the exact calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Rotating-wave frequency, in `units`.
    #[serde(default)]
    pub rwa: f64,
    /// Floor of the dephasing rates (1/fs).
    #[serde(default = "default_rmin")]
    pub rmin: f64,
    /// Order of the population-transfer corrections.
    #[serde(default = "default_correction_order")]
    pub correction_order: usize,
    /// Report progress at info level.
    #[serde(default)]
    pub verbose: bool,
    /// Units of `rwa`.
    #[serde(default)]
    pub units: EnergyUnits,
}

fn default_rmin() -> f64 {
    1.0e-4
}

fn default_correction_order() -> usize {
    3
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            rwa: 0.0,
            rmin: default_rmin(),
            correction_order: default_correction_order(),
            verbose: false,
            units: EnergyUnits::Internal,
        }
    }
}

impl CalculatorConfig {
    /// Rotating-wave frequency in internal units.
    pub fn rwa_internal(&self) -> f64 {
        self.units.to_internal(self.rwa)
    }

    /// Parses YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, TwodError> {
        parse_yaml(text)
    }

    /// Reads a YAML file.
    pub fn load(path: &Path) -> Result<Self, TwodError> {
        load_yaml(path)
    }
}

/// Settings of the mock calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockConfig {
    /// Rotating-wave frequency, in `units`.
    #[serde(default)]
    pub rwa: f64,
    /// Peak shape name, `Gaussian` or `Lorentzian`.
    #[serde(default = "default_shape")]
    pub shape: String,
    /// Replace prefactors by their modulus.
    #[serde(default)]
    pub all_positive: bool,
    /// Default Gaussian width, in `units`.
    #[serde(default = "default_width_cm")]
    pub width: f64,
    /// Default Lorentzian dephasing, in `units`.
    #[serde(default = "default_width_cm")]
    pub dephasing: f64,
    /// Report progress at info level.
    #[serde(default)]
    pub verbose: bool,
    /// Units of `rwa`, `width` and `dephasing`.
    #[serde(default = "default_mock_units")]
    pub units: EnergyUnits,
}

fn default_width_cm() -> f64 {
    300.0
}

fn default_shape() -> String {
    LineShape::Gaussian.to_string()
}

fn default_mock_units() -> EnergyUnits {
    EnergyUnits::InverseCm
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            rwa: 0.0,
            shape: default_shape(),
            all_positive: false,
            width: default_width_cm(),
            dephasing: default_width_cm(),
            verbose: false,
            units: default_mock_units(),
        }
    }
}

impl MockConfig {
    /// Rotating-wave frequency in internal units.
    pub fn rwa_internal(&self) -> f64 {
        self.units.to_internal(self.rwa)
    }

    /// Default width in internal units.
    pub fn width_internal(&self) -> f64 {
        self.units.to_internal(self.width)
    }

    /// Default dephasing in internal units.
    pub fn dephasing_internal(&self) -> f64 {
        self.units.to_internal(self.dephasing)
    }

    /// The peak shape, failing with `UnknownShape` for unrecognised names.
    pub fn line_shape(&self) -> Result<LineShape, TwodError> {
        self.shape.parse()
    }

    /// Parses YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, TwodError> {
        let config: Self = parse_yaml(text)?;
        config.line_shape()?;
        Ok(config)
    }

    /// Reads a YAML file.
    pub fn load(path: &Path) -> Result<Self, TwodError> {
        let config: Self = load_yaml(path)?;
        config.line_shape().map_err(|err| match err {
            TwodError::UnknownShape(info) => {
                TwodError::UnknownShape(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })?;
        Ok(config)
    }
}

fn parse_yaml<T: DeserializeOwned>(text: &str) -> Result<T, TwodError> {
    serde_yaml::from_str(text)
        .map_err(|err| TwodError::Serde(ErrorInfo::new("config-parse", err.to_string())))
}

fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, TwodError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        TwodError::Serde(
            ErrorInfo::new("config-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    parse_yaml(&contents).map_err(|err| match err {
        TwodError::Serde(info) => {
            TwodError::Serde(info.with_context("path", path.display().to_string()))
        }
        other => other,
    })
}
