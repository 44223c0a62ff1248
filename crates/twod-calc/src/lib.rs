#![deny(missing_docs)]
#![doc = "Exact and mock calculators producing two-dimensional spectra."]

pub mod axes;
pub mod band;
pub mod config;
pub mod engine;
pub mod exact;
pub mod fft;
pub mod lab;
pub mod lineshape;
pub mod mock;
pub mod pathway;
pub mod propagator;
pub mod system;

pub use band::BandSystem;
pub use config::{CalculatorConfig, MockConfig};
pub use engine::{
    ElementaryProcess, PathwayResponseEngine, ResponseContext, SecularResponseEngine,
    UnavailableEngine,
};
pub use exact::TwoDSpectrumCalculator;
pub use lab::LabSettings;
pub use lineshape::{render_pathway, LineShape, PeakParameters};
pub use mock::MockSpectrumCalculator;
pub use pathway::{LiouvillePathway, PathwayKind};
pub use propagator::PopulationPropagator;
pub use system::{Aggregate, Molecule, OpticalSystem, SystemBathInteraction};
