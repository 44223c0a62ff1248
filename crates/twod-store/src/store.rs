//! Resolution-aware storage of the pathway contributions of one spectrum.

use ndarray::s;
use tracing::debug;
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::grid::{self, ComplexGrid};

use crate::aggregate::{self, PathwayMap};
use crate::resolution::{self, Resolution, StoreState};
use crate::taxonomy::{LiouvilleType, Process, Signal, StoreKey};

/// Storage that keeps spectral contributions at a resolution which can only
/// be lowered.
pub trait ResolutionAwareStore {
    /// Active resolution.
    fn resolution(&self) -> Resolution;

    /// Whether any data has been written.
    fn is_initialized(&self) -> bool;

    /// Lowers the resolution by one supported summation step. Setting the
    /// active resolution again is a no-op.
    fn set_resolution(&mut self, to: Resolution) -> Result<(), TwodError>;

    /// Returns the array addressed by `key` (and `tag` at pathways
    /// resolution), summing finer data on the fly.
    fn read(&self, key: StoreKey, tag: Option<&str>) -> Result<ComplexGrid, TwodError>;

    /// Stores one tagged pathway array. Only legal at pathways resolution.
    fn write(&mut self, ty: LiouvilleType, tag: &str, data: ComplexGrid) -> Result<(), TwodError>;
}

/// Default [`ResolutionAwareStore`] backed by an explicit [`StoreState`].
///
/// The store is not synchronised; concurrent writers must be serialised by
/// the caller (typically one store per t2 sample).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumStore {
    state: StoreState,
    shape: Option<(usize, usize)>,
    initialized: bool,
    address: Option<(StoreKey, Option<String>)>,
}

fn unsupported_read(key: StoreKey, resolution: Resolution) -> TwodError {
    TwodError::UnsupportedConversion(
        ErrorInfo::new(
            "unavailable-at-resolution",
            "data type is not available at the active resolution",
        )
        .with_context("key", key.to_string())
        .with_context("resolution", resolution.label()),
    )
}

fn unknown_tag(ty: LiouvilleType, tag: &str) -> TwodError {
    TwodError::UnknownTag(
        ErrorInfo::new("unknown-tag", "no pathway stored under this tag")
            .with_context("type", ty.label())
            .with_context("tag", tag),
    )
}

impl SpectrumStore {
    /// Empty store at pathways resolution; the first write fixes the shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store whose arrays must have the given `(n1, n3)` shape.
    pub fn with_shape(shape: (usize, usize)) -> Self {
        Self {
            shape: Some(shape),
            ..Self::default()
        }
    }

    /// Declared array shape, if known.
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.shape
    }

    /// Backing state.
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Selects the data type (and pathway tag) used by [`get`](Self::get)
    /// and [`put`](Self::put).
    pub fn set_address(&mut self, key: StoreKey, tag: Option<String>) {
        self.address = Some((key, tag));
    }

    /// Currently selected address.
    pub fn address(&self) -> Option<(StoreKey, Option<&str>)> {
        self.address
            .as_ref()
            .map(|(key, tag)| (*key, tag.as_deref()))
    }

    /// Reads the data at the current address.
    pub fn get(&self) -> Result<ComplexGrid, TwodError> {
        let (key, tag) = self.address().ok_or_else(|| {
            TwodError::NoData(ErrorInfo::new("no-address", "no storage address selected"))
        })?;
        self.read(key, tag)
    }

    /// Writes a pathway array at the current address.
    pub fn put(&mut self, data: ComplexGrid) -> Result<(), TwodError> {
        let (key, tag) = self.address.clone().ok_or_else(|| {
            TwodError::NoData(ErrorInfo::new("no-address", "no storage address selected"))
        })?;
        let StoreKey::Type(ty) = key else {
            return Err(TwodError::UnknownPathwayType(
                ErrorInfo::new("not-a-pathway-type", "pathway writes need a pathway type")
                    .with_context("key", key.to_string()),
            ));
        };
        let tag = tag.ok_or_else(|| {
            TwodError::UnknownTag(
                ErrorInfo::new("missing-tag", "tag for Liouville pathway not specified")
                    .with_context("type", ty.label()),
            )
        })?;
        self.write(ty, &tag, data)
    }

    /// Tags stored for `ty`, sorted. Empty below pathways resolution.
    pub fn tags(&self, ty: LiouvilleType) -> Vec<String> {
        match &self.state {
            StoreState::Pathways(map) => map
                .get(&ty)
                .map(|tagged| tagged.keys().cloned().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Every stored `(type, tag)` pair, ordered by type then tag. Empty
    /// below pathways resolution.
    pub fn all_tags(&self) -> impl Iterator<Item = (LiouvilleType, &str)> + '_ {
        let map = match &self.state {
            StoreState::Pathways(map) => Some(map),
            _ => None,
        };
        map.into_iter().flat_map(|map| {
            map.iter()
                .flat_map(|(ty, tagged)| tagged.keys().map(move |tag| (*ty, tag.as_str())))
        })
    }

    /// Number of stored pathway arrays (zero below pathways resolution).
    pub fn pathway_count(&self) -> usize {
        match &self.state {
            StoreState::Pathways(map) => map.values().map(|tagged| tagged.len()).sum(),
            _ => 0,
        }
    }

    /// Keeps the inclusive sub-block `rows x cols` of every stored array.
    pub fn trim(
        &mut self,
        rows: (usize, usize),
        cols: (usize, usize),
    ) -> Result<(), TwodError> {
        if let Some((n1, n3)) = self.shape {
            if rows.0 > rows.1 || cols.0 > cols.1 || rows.1 >= n1 || cols.1 >= n3 {
                return Err(TwodError::Axis(
                    ErrorInfo::new("invalid-range", "trim window does not fit the stored arrays")
                        .with_context("rows", format!("{}..={}", rows.0, rows.1))
                        .with_context("cols", format!("{}..={}", cols.0, cols.1))
                        .with_context("shape", format!("{n1}x{n3}")),
                ));
            }
            if self.initialized {
                self.state.for_each_grid_mut(|data| {
                    *data = data
                        .slice(s![rows.0..=rows.1, cols.0..=cols.1])
                        .to_owned();
                });
            }
            self.shape = Some((rows.1 - rows.0 + 1, cols.1 - cols.0 + 1));
        }
        Ok(())
    }

    fn read_pathways(
        &self,
        map: &PathwayMap,
        key: StoreKey,
        tag: Option<&str>,
    ) -> Result<ComplexGrid, TwodError> {
        match (key, tag) {
            (StoreKey::Type(ty), Some(tag)) => map
                .get(&ty)
                .and_then(|tagged| tagged.get(tag))
                .cloned()
                .ok_or_else(|| unknown_tag(ty, tag)),
            (StoreKey::Type(ty), None) => aggregate::sum_tags(map.get(&ty), self.shape),
            (StoreKey::Process(process), _) => {
                aggregate::pathways_to_process(map, process, self.shape)
            }
            (StoreKey::Signal(signal), _) => aggregate::pathways_to_signal(map, signal, self.shape),
            (StoreKey::Total, _) => aggregate::pathways_to_total(map, self.shape),
        }
    }

    fn read_state(&self, key: StoreKey, tag: Option<&str>) -> Result<ComplexGrid, TwodError> {
        let resolution = self.state.resolution();
        if resolution != Resolution::Pathways {
            if let (StoreKey::Type(ty), Some(tag)) = (key, tag) {
                return Err(unknown_tag(ty, tag));
            }
        }
        let zeros = || grid::zeros(self.shape);
        match &self.state {
            StoreState::Pathways(map) => self.read_pathways(map, key, tag),
            StoreState::Types(map) => match key {
                StoreKey::Type(ty) => Ok(map.get(&ty).cloned().unwrap_or_else(zeros)),
                StoreKey::Process(process) => {
                    aggregate::types_to_process(map, process, self.shape)
                }
                StoreKey::Signal(signal) => aggregate::types_to_signal(map, signal, self.shape),
                StoreKey::Total => aggregate::types_to_total(map, self.shape),
            },
            StoreState::Processes(map) => match key {
                StoreKey::Process(process) => Ok(map.get(&process).cloned().unwrap_or_else(zeros)),
                StoreKey::Signal(Signal::DC) => {
                    Ok(map.get(&Process::DC).cloned().unwrap_or_else(zeros))
                }
                StoreKey::Total => aggregate::processes_to_total(map, self.shape),
                _ => Err(unsupported_read(key, resolution)),
            },
            StoreState::Signals(map) => match key {
                StoreKey::Signal(signal) => Ok(map.get(&signal).cloned().unwrap_or_else(zeros)),
                StoreKey::Process(Process::DC) => {
                    Ok(map.get(&Signal::DC).cloned().unwrap_or_else(zeros))
                }
                StoreKey::Total => aggregate::signals_to_total(map, self.shape),
                _ => Err(unsupported_read(key, resolution)),
            },
            StoreState::Off(data) => match key {
                StoreKey::Total => Ok(data.clone()),
                _ => Err(unsupported_read(key, resolution)),
            },
        }
    }
}

impl ResolutionAwareStore for SpectrumStore {
    fn resolution(&self) -> Resolution {
        self.state.resolution()
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn set_resolution(&mut self, to: Resolution) -> Result<(), TwodError> {
        let from = self.state.resolution();
        if from == to {
            return Ok(());
        }
        self.state = if self.initialized {
            resolution::convert(&self.state, self.shape, to)?
        } else {
            resolution::empty_state(from, to)?
        };
        debug!(from = from.label(), to = to.label(), "lowered storage resolution");
        Ok(())
    }

    fn read(&self, key: StoreKey, tag: Option<&str>) -> Result<ComplexGrid, TwodError> {
        if !self.initialized {
            return Ok(grid::placeholder());
        }
        self.read_state(key, tag)
    }

    fn write(&mut self, ty: LiouvilleType, tag: &str, data: ComplexGrid) -> Result<(), TwodError> {
        let resolution = self.state.resolution();
        let StoreState::Pathways(map) = &mut self.state else {
            return Err(TwodError::UnsupportedConversion(
                ErrorInfo::new(
                    "write-below-pathways",
                    "pathway data can only be written at pathways resolution",
                )
                .with_context("resolution", resolution.label()),
            ));
        };
        match self.shape {
            Some(shape) => grid::ensure_shape(&data, shape)?,
            None => self.shape = Some(data.dim()),
        }
        let tagged = map.entry(ty).or_default();
        if tagged.contains_key(tag) {
            return Err(TwodError::DuplicateTag(
                ErrorInfo::new("duplicate-tag", "tag already exists for this pathway type")
                    .with_context("type", ty.label())
                    .with_context("tag", tag),
            ));
        }
        tagged.insert(tag.to_string(), data);
        self.initialized = true;
        Ok(())
    }
}
