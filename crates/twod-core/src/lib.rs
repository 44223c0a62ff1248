#![deny(missing_docs)]
#![doc = "Core error taxonomy, axes, units and grid helpers shared by the 2D spectroscopy crates."]

pub mod axis;
pub mod errors;
pub mod grid;
pub mod provenance;
pub mod units;

pub use axis::{AxisType, FrequencyAxis, TimeAxis};
pub use errors::{ErrorInfo, TwodError};
pub use grid::ComplexGrid;
pub use provenance::SchemaVersion;
pub use units::{convert, EnergyUnits, CM_TO_INTERNAL};

pub use num_complex::Complex64;
