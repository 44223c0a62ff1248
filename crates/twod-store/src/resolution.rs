//! Storage resolution levels and the one-way conversions between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::grid::ComplexGrid;

use crate::aggregate::{self, PathwayMap, ProcessMap, SignalMap, TypeMap};

/// Granularity at which a spectrum keeps its contributions.
///
/// Levels are ordered: `Pathways (4) > Types (3) > Processes (2) > Signals (1)
/// > Off (0)`. Lowering sums contributions irreversibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Total spectrum only.
    Off = 0,
    /// Rephasing, non-rephasing and double-coherence signals.
    Signals = 1,
    /// GSB, SE, ESA and DC processes.
    Processes = 2,
    /// One array per Liouville pathway type.
    Types = 3,
    /// Every tagged pathway separately.
    Pathways = 4,
}

impl Resolution {
    /// All levels from the finest down.
    pub const ALL: [Resolution; 5] = [
        Resolution::Pathways,
        Resolution::Types,
        Resolution::Processes,
        Resolution::Signals,
        Resolution::Off,
    ];

    /// Numeric level (`off = 0` ... `pathways = 4`).
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Name used in configuration and persisted payloads.
    pub fn label(self) -> &'static str {
        match self {
            Resolution::Off => "off",
            Resolution::Signals => "signals",
            Resolution::Processes => "processes",
            Resolution::Types => "types",
            Resolution::Pathways => "pathways",
        }
    }

    /// Whether data stored at `self` may be reduced to `to`.
    pub fn can_lower(self, to: Resolution) -> bool {
        to <= self
    }

    /// Whether `self -> to` is one of the direct summation steps.
    pub fn converts_directly(self, to: Resolution) -> bool {
        matches!(
            (self, to),
            (Resolution::Pathways, Resolution::Types)
                | (Resolution::Types, Resolution::Processes)
                | (Resolution::Types, Resolution::Signals)
                | (Resolution::Signals, Resolution::Off)
                | (Resolution::Processes, Resolution::Off)
        )
    }
}

/// Numeric level of a resolution name.
pub fn level_of(name: &str) -> Result<u8, TwodError> {
    name.parse::<Resolution>().map(Resolution::level)
}

impl FromStr for Resolution {
    type Err = TwodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .iter()
            .copied()
            .find(|res| res.label() == s)
            .ok_or_else(|| {
                TwodError::UnknownResolution(
                    ErrorInfo::new("unknown-resolution", "unknown storage resolution")
                        .with_context("resolution", s)
                        .with_hint("use one of off, signals, processes, types, pathways"),
                )
            })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Backing data of a store, tagged by the resolution it is held at.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreState {
    /// Type label -> tag -> array.
    Pathways(PathwayMap),
    /// Type label -> array.
    Types(TypeMap),
    /// Process -> array.
    Processes(ProcessMap),
    /// Signal -> array.
    Signals(SignalMap),
    /// Total spectrum.
    Off(ComplexGrid),
}

impl Default for StoreState {
    fn default() -> Self {
        StoreState::Pathways(PathwayMap::new())
    }
}

impl StoreState {
    /// Resolution the state is held at.
    pub fn resolution(&self) -> Resolution {
        match self {
            StoreState::Pathways(_) => Resolution::Pathways,
            StoreState::Types(_) => Resolution::Types,
            StoreState::Processes(_) => Resolution::Processes,
            StoreState::Signals(_) => Resolution::Signals,
            StoreState::Off(_) => Resolution::Off,
        }
    }

    /// Applies `f` to every array held in the state.
    pub fn for_each_grid_mut(&mut self, mut f: impl FnMut(&mut ComplexGrid)) {
        match self {
            StoreState::Pathways(map) => map.values_mut().flat_map(|t| t.values_mut()).for_each(f),
            StoreState::Types(map) => map.values_mut().for_each(f),
            StoreState::Processes(map) => map.values_mut().for_each(f),
            StoreState::Signals(map) => map.values_mut().for_each(f),
            StoreState::Off(data) => f(data),
        }
    }
}

fn unsupported(from: Resolution, to: Resolution) -> TwodError {
    let message = if to > from {
        "cannot convert from lower to higher resolution"
    } else {
        "no direct conversion between these resolutions"
    };
    TwodError::UnsupportedConversion(
        ErrorInfo::new("unsupported-conversion", message)
            .with_context("from", from.label())
            .with_context("to", to.label()),
    )
}

/// Performs one lowering step, summing the state into the coarser buckets.
///
/// Only `pathways -> types`, `types -> processes`, `types -> signals`,
/// `signals -> off` and `processes -> off` are supported; every other pair
/// fails with `UnsupportedConversion`.
pub fn convert(
    state: &StoreState,
    shape: Option<(usize, usize)>,
    to: Resolution,
) -> Result<StoreState, TwodError> {
    let from = state.resolution();
    match (state, to) {
        (StoreState::Pathways(map), Resolution::Types) => {
            Ok(StoreState::Types(aggregate::pathways_to_types(map, shape)?))
        }
        (StoreState::Types(map), Resolution::Processes) => {
            Ok(StoreState::Processes(aggregate::types_to_processes(map, shape)?))
        }
        (StoreState::Types(map), Resolution::Signals) => {
            Ok(StoreState::Signals(aggregate::types_to_signals(map, shape)?))
        }
        (StoreState::Signals(map), Resolution::Off) => {
            Ok(StoreState::Off(aggregate::signals_to_total(map, shape)?))
        }
        (StoreState::Processes(map), Resolution::Off) => {
            Ok(StoreState::Off(aggregate::processes_to_total(map, shape)?))
        }
        _ => Err(unsupported(from, to)),
    }
}

/// Empty state at `to`, used when lowering a store that holds no data yet.
pub fn empty_state(from: Resolution, to: Resolution) -> Result<StoreState, TwodError> {
    if !from.converts_directly(to) {
        return Err(unsupported(from, to));
    }
    Ok(match to {
        Resolution::Pathways => StoreState::Pathways(PathwayMap::new()),
        Resolution::Types => StoreState::Types(TypeMap::new()),
        Resolution::Processes => StoreState::Processes(ProcessMap::new()),
        Resolution::Signals => StoreState::Signals(SignalMap::new()),
        Resolution::Off => StoreState::Off(twod_core::grid::placeholder()),
    })
}
