//! Data type selectors of a spectrum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use twod_core::errors::{ErrorInfo, TwodError};

/// Which array of a spectrum a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    /// Combined total spectrum.
    Tot,
    /// Rephasing part.
    Reph,
    /// Non-rephasing part.
    Nonr,
}

/// Mutually exclusive storage layouts of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFamily {
    /// One total array.
    Combined,
    /// Separate rephasing and non-rephasing arrays.
    Separated,
}

impl DataKind {
    /// Label used in persisted payloads.
    pub fn label(self) -> &'static str {
        match self {
            DataKind::Tot => "Tot",
            DataKind::Reph => "Reph",
            DataKind::Nonr => "Nonr",
        }
    }

    /// Storage layout this kind belongs to.
    pub fn family(self) -> DataFamily {
        match self {
            DataKind::Tot => DataFamily::Combined,
            DataKind::Reph | DataKind::Nonr => DataFamily::Separated,
        }
    }
}

impl FromStr for DataKind {
    type Err = TwodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tot" => Ok(DataKind::Tot),
            "Reph" => Ok(DataKind::Reph),
            "Nonr" => Ok(DataKind::Nonr),
            other => Err(TwodError::InvalidDataType(
                ErrorInfo::new("invalid-data-type", "data type must be Tot, Reph or Nonr")
                    .with_context("dtype", other),
            )),
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
