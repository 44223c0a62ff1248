#![deny(missing_docs)]
#![doc = "Two-dimensional spectrum entity with data operations, plot frames, persistence and t2 containers."]

pub mod container;
pub mod kind;
pub mod persist;
pub mod render;
pub mod spectrum;

pub use container::{ContainerStatus, SpectrumContainer};
pub use kind::{DataFamily, DataKind};
pub use persist::{SpectrumFile, SPECTRUM_SCHEMA};
pub use render::{PlotFrame, PlotOptions, SpectrumPart, SpectrumType};
pub use spectrum::TwoDSpectrum;
