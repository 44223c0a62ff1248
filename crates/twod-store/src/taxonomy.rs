//! Fixed pathway taxonomy: Liouville pathway types and their grouping into
//! physical processes and signal categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use twod_core::errors::{ErrorInfo, TwodError};

/// Shape of a Feynman diagram contributing to the third-order response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LiouvilleType {
    /// Ground-state pathway, non-rephasing.
    R1g,
    /// Ground-state pathway, rephasing.
    R2g,
    /// Ground-state pathway, rephasing.
    R3g,
    /// Ground-state pathway, non-rephasing.
    R4g,
    /// Two-exciton pathway, rephasing.
    R1fs,
    /// Two-exciton pathway, non-rephasing.
    R2fs,
    /// Double-coherence pathway.
    R3fs,
    /// Double-coherence pathway.
    R4fs,
}

/// All pathway types in canonical order.
pub const PATHWAY_TYPES: [LiouvilleType; 8] = [
    LiouvilleType::R1g,
    LiouvilleType::R2g,
    LiouvilleType::R3g,
    LiouvilleType::R4g,
    LiouvilleType::R1fs,
    LiouvilleType::R2fs,
    LiouvilleType::R3fs,
    LiouvilleType::R4fs,
];

/// Physical process a pathway type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Process {
    /// Ground-state bleach.
    GSB,
    /// Stimulated emission.
    SE,
    /// Excited-state absorption.
    ESA,
    /// Double coherence.
    DC,
}

/// Process table: every pathway type appears exactly once.
pub const PROCESSES: [(Process, &[LiouvilleType]); 4] = [
    (Process::GSB, &[LiouvilleType::R1g, LiouvilleType::R2g]),
    (Process::SE, &[LiouvilleType::R3g, LiouvilleType::R4g]),
    (Process::ESA, &[LiouvilleType::R1fs, LiouvilleType::R2fs]),
    (Process::DC, &[LiouvilleType::R3fs, LiouvilleType::R4fs]),
];

/// Signal category a pathway type contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// Rephasing signal.
    REPH,
    /// Non-rephasing signal.
    NONR,
    /// Double-coherence signal.
    DC,
}

/// Signal table: every pathway type appears exactly once.
pub const SIGNALS: [(Signal, &[LiouvilleType]); 3] = [
    (
        Signal::REPH,
        &[LiouvilleType::R2g, LiouvilleType::R3g, LiouvilleType::R1fs],
    ),
    (
        Signal::NONR,
        &[LiouvilleType::R1g, LiouvilleType::R4g, LiouvilleType::R2fs],
    ),
    (Signal::DC, &[LiouvilleType::R3fs, LiouvilleType::R4fs]),
];

impl LiouvilleType {
    /// Label used in storage keys and persisted payloads.
    pub fn label(self) -> &'static str {
        match self {
            LiouvilleType::R1g => "R1g",
            LiouvilleType::R2g => "R2g",
            LiouvilleType::R3g => "R3g",
            LiouvilleType::R4g => "R4g",
            LiouvilleType::R1fs => "R1fs",
            LiouvilleType::R2fs => "R2fs",
            LiouvilleType::R3fs => "R3fs",
            LiouvilleType::R4fs => "R4fs",
        }
    }

    /// Process this type belongs to.
    pub fn process(self) -> Process {
        PROCESSES
            .iter()
            .find(|(_, types)| types.contains(&self))
            .map(|(process, _)| *process)
            .unwrap_or(Process::DC)
    }

    /// Signal category this type contributes to.
    pub fn signal(self) -> Signal {
        SIGNALS
            .iter()
            .find(|(_, types)| types.contains(&self))
            .map(|(signal, _)| *signal)
            .unwrap_or(Signal::DC)
    }
}

impl Process {
    /// All processes in canonical order.
    pub const ALL: [Process; 4] = [Process::GSB, Process::SE, Process::ESA, Process::DC];

    /// Pathway types summed into this process.
    pub fn types(self) -> &'static [LiouvilleType] {
        PROCESSES
            .iter()
            .find(|(process, _)| *process == self)
            .map(|(_, types)| *types)
            .unwrap_or(&[])
    }

    /// Label used in storage keys.
    pub fn label(self) -> &'static str {
        match self {
            Process::GSB => "GSB",
            Process::SE => "SE",
            Process::ESA => "ESA",
            Process::DC => "DC",
        }
    }
}

impl Signal {
    /// All signals in canonical order.
    pub const ALL: [Signal; 3] = [Signal::REPH, Signal::NONR, Signal::DC];

    /// Pathway types summed into this signal.
    pub fn types(self) -> &'static [LiouvilleType] {
        SIGNALS
            .iter()
            .find(|(signal, _)| *signal == self)
            .map(|(_, types)| *types)
            .unwrap_or(&[])
    }

    /// Label used in storage keys.
    pub fn label(self) -> &'static str {
        match self {
            Signal::REPH => "REPH",
            Signal::NONR => "NONR",
            Signal::DC => "DC",
        }
    }
}

impl FromStr for LiouvilleType {
    type Err = TwodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PATHWAY_TYPES
            .iter()
            .copied()
            .find(|ty| ty.label() == s)
            .ok_or_else(|| {
                TwodError::UnknownPathwayType(
                    ErrorInfo::new("unknown-pathway-type", "unknown type of Liouville pathway")
                        .with_context("type", s),
                )
            })
    }
}

impl FromStr for Process {
    type Err = TwodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Process::ALL
            .iter()
            .copied()
            .find(|process| process.label() == s)
            .ok_or_else(|| {
                TwodError::UnknownProcess(
                    ErrorInfo::new("unknown-process", "unknown process").with_context("process", s),
                )
            })
    }
}

impl FromStr for Signal {
    type Err = TwodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signal::ALL
            .iter()
            .copied()
            .find(|signal| signal.label() == s)
            .ok_or_else(|| {
                TwodError::UnknownSignal(
                    ErrorInfo::new("unknown-signal", "unknown signal").with_context("signal", s),
                )
            })
    }
}

impl fmt::Display for LiouvilleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Data type addressed in a store read: a single pathway type, a process,
/// a signal or the total spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreKey {
    /// One pathway type.
    Type(LiouvilleType),
    /// Sum of the types of a process.
    Process(Process),
    /// Sum of the types of a signal.
    Signal(Signal),
    /// Sum of everything.
    Total,
}

impl FromStr for StoreKey {
    type Err = TwodError;

    /// Parses a key label. `DC` names both a process and a signal with the
    /// same member types; it resolves to the process.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "total" {
            return Ok(StoreKey::Total);
        }
        if let Ok(ty) = s.parse::<LiouvilleType>() {
            return Ok(StoreKey::Type(ty));
        }
        if let Ok(process) = s.parse::<Process>() {
            return Ok(StoreKey::Process(process));
        }
        if let Ok(signal) = s.parse::<Signal>() {
            return Ok(StoreKey::Signal(signal));
        }
        Err(TwodError::UnknownKey(
            ErrorInfo::new("unknown-key", "label names no pathway type, process or signal")
                .with_context("key", s),
        ))
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKey::Type(ty) => write!(f, "{ty}"),
            StoreKey::Process(process) => write!(f, "{process}"),
            StoreKey::Signal(signal) => write!(f, "{signal}"),
            StoreKey::Total => f.write_str("total"),
        }
    }
}

impl From<LiouvilleType> for StoreKey {
    fn from(value: LiouvilleType) -> Self {
        StoreKey::Type(value)
    }
}

impl From<Process> for StoreKey {
    fn from(value: Process) -> Self {
        StoreKey::Process(value)
    }
}

impl From<Signal> for StoreKey {
    fn from(value: Signal) -> Self {
        StoreKey::Signal(value)
    }
}
