//! Structured error types shared across the 2D spectroscopy crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`TwodError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (labels, shapes, indices).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for spectrum storage and calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum TwodError {
    /// Resolution name outside `off|signals|processes|types|pathways`.
    #[error("unknown resolution: {0}")]
    UnknownResolution(ErrorInfo),
    /// Resolution change or resolution-dependent access that cannot be performed.
    #[error("unsupported conversion: {0}")]
    UnsupportedConversion(ErrorInfo),
    /// Pathway tag not present in the store.
    #[error("unknown tag: {0}")]
    UnknownTag(ErrorInfo),
    /// Pathway tag already populated for the given type.
    #[error("duplicate tag: {0}")]
    DuplicateTag(ErrorInfo),
    /// Array shape disagrees with the declared axes or accumulator.
    #[error("type mismatch: {0}")]
    TypeMismatch(ErrorInfo),
    /// Data type label outside `Tot|Reph|Nonr`.
    #[error("invalid data type: {0}")]
    InvalidDataType(ErrorInfo),
    /// Write whose data type conflicts with the one already fixed.
    #[error("data type conflict: {0}")]
    DataTypeConflict(ErrorInfo),
    /// Requested data is not present.
    #[error("no data: {0}")]
    NoData(ErrorInfo),
    /// Process label outside `GSB|SE|ESA|DC`.
    #[error("unknown process: {0}")]
    UnknownProcess(ErrorInfo),
    /// Signal label outside `REPH|NONR|DC`.
    #[error("unknown signal: {0}")]
    UnknownSignal(ErrorInfo),
    /// Pathway type label not recognised.
    #[error("unknown pathway type: {0}")]
    UnknownPathwayType(ErrorInfo),
    /// Lineshape name outside `Gaussian|Lorentzian`.
    #[error("unknown shape: {0}")]
    UnknownShape(ErrorInfo),
    /// Feature not available for the given input.
    #[error("not implemented: {0}")]
    NotImplemented(ErrorInfo),
    /// Storage key naming no type, process, signal or total.
    #[error("unknown key: {0}")]
    UnknownKey(ErrorInfo),
    /// Malformed Liouville pathway descriptor.
    #[error("invalid pathway: {0}")]
    InvalidPathway(ErrorInfo),
    /// Calculator used before it was bootstrapped.
    #[error("not bootstrapped: {0}")]
    NotBootstrapped(ErrorInfo),
    /// Pathway response engine cannot evaluate responses.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(ErrorInfo),
    /// Axis construction and lookup errors.
    #[error("axis error: {0}")]
    Axis(ErrorInfo),
    /// Serialization, configuration and I/O errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl TwodError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            TwodError::UnknownResolution(info)
            | TwodError::UnsupportedConversion(info)
            | TwodError::UnknownTag(info)
            | TwodError::DuplicateTag(info)
            | TwodError::TypeMismatch(info)
            | TwodError::InvalidDataType(info)
            | TwodError::DataTypeConflict(info)
            | TwodError::NoData(info)
            | TwodError::UnknownProcess(info)
            | TwodError::UnknownSignal(info)
            | TwodError::UnknownPathwayType(info)
            | TwodError::UnknownShape(info)
            | TwodError::NotImplemented(info)
            | TwodError::UnknownKey(info)
            | TwodError::InvalidPathway(info)
            | TwodError::NotBootstrapped(info)
            | TwodError::EngineUnavailable(info)
            | TwodError::Axis(info)
            | TwodError::Serde(info) => info,
        }
    }

    /// Returns the stable machine readable code of the error.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}
