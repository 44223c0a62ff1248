#![deny(missing_docs)]
#![doc = "Pathway taxonomy, resolution policy, aggregation and resolution-aware storage of 2D spectra."]

pub mod aggregate;
pub mod resolution;
pub mod store;
pub mod taxonomy;

pub use resolution::{level_of, Resolution, StoreState};
pub use store::{ResolutionAwareStore, SpectrumStore};
pub use taxonomy::{LiouvilleType, Process, Signal, StoreKey, PATHWAY_TYPES, PROCESSES, SIGNALS};
