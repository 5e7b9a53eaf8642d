//! Error types for the nudec workspace.
use thiserror::Error;

use crate::types::Particle;

/// Coarse classification shared by the error enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied a value outside the operation's domain.
    InvalidArgument,
    /// A file could not be read, parsed, or written.
    Io,
    /// The evolution engine was used out of order or rejected a request.
    Engine,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateError {
    #[error("dimension mismatch: lifetime matrix is {lifetimes}x{lifetimes}, mass vector has {masses} entries")] DimensionMismatch { lifetimes: usize, masses: usize },
    #[error("invalid lifetime {value} for channel ({row},{col}): must be positive and finite")] InvalidLifetime { row: usize, col: usize, value: f64 },
    #[error("invalid decay channel {heavier}->{lighter} for {size} states")] InvalidChannel { lighter: usize, heavier: usize, size: usize },
}

impl RateError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MassError {
    #[error("empty mass vector")] Empty,
    #[error("negative mass {value} at index {index}")] Negative { index: usize, value: f64 },
    #[error("non-finite mass at index {index}")] NonFinite { index: usize },
}

impl MassError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FluxError {
    #[error("I/O error on {path}: {reason}")] Io { path: String, reason: String },
    #[error("line {line}: cannot parse {token:?} as a number")] Parse { line: usize, token: String },
    #[error("line {line}: expected {expected} columns, got {got}")] RaggedRow { line: usize, expected: usize, got: usize },
    #[error("flux table is empty")] Empty,
    #[error("flux table has {have} rows, need {need}")] TooFewRows { have: usize, need: usize },
    #[error("flux table has {have} columns, need {need}")] TooFewColumns { have: usize, need: usize },
}

impl FluxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } | Self::Parse { .. } | Self::RaggedRow { .. } | Self::Empty => ErrorKind::Io,
            Self::TooFewRows { .. } | Self::TooFewColumns { .. } => ErrorKind::InvalidArgument,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("engine not configured: missing {0}")] NotConfigured(&'static str),
    #[error("flavor index {flavor} out of range for {num_neutrinos} states")] FlavorOutOfRange { flavor: usize, num_neutrinos: usize },
    #[error("energy node {node} out of range for {nodes} nodes")] NodeOutOfRange { node: usize, nodes: usize },
    #[error("state shape mismatch: expected {expected:?}, got {got:?}")] StateShape { expected: (usize, usize, usize), got: (usize, usize, usize) },
    #[error("matrix is {got}x{got}, engine has {expected} states")] MatrixSize { expected: usize, got: usize },
    #[error("engine has {expected} states, setup has {got}")] StateCount { expected: usize, got: usize },
    #[error("engine has {expected} energy nodes, setup has {got}")] NodeCount { expected: usize, got: usize },
    #[error("invalid splitting index {k} for {num_neutrinos} states")] SplittingIndex { k: usize, num_neutrinos: usize },
    #[error("{0:?} component not carried by this engine")] ParticleNotCarried(Particle),
    #[error("invalid mixing indices ({i},{j}) for {num_neutrinos} states")] MixingIndex { i: usize, j: usize, num_neutrinos: usize },
    #[error("state has not been evolved")] NotEvolved,
    #[error("backend: {0}")] Backend(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Engine
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")] InvalidParameter { name: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum NudecError {
    #[error(transparent)] Rate(#[from] RateError),
    #[error(transparent)] Mass(#[from] MassError),
    #[error(transparent)] Flux(#[from] FluxError),
    #[error(transparent)] Engine(#[from] EngineError),
    #[error(transparent)] Config(#[from] ConfigError),
    #[error("serialization: {0}")] Serialization(String),
}

impl NudecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rate(e) => e.kind(),
            Self::Mass(e) => e.kind(),
            Self::Flux(e) => e.kind(),
            Self::Engine(e) => e.kind(),
            Self::Config(_) => ErrorKind::InvalidArgument,
            Self::Serialization(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_errors_are_invalid_argument() {
        let e = RateError::DimensionMismatch { lifetimes: 4, masses: 3 };
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        let e = RateError::InvalidLifetime { row: 0, col: 3, value: 0.0 };
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn umbrella_preserves_kind() {
        let e: NudecError = RateError::InvalidLifetime { row: 0, col: 1, value: -1.0 }.into();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        let e: NudecError = FluxError::Empty.into();
        assert_eq!(e.kind(), ErrorKind::Io);
        let e: NudecError = EngineError::NotEvolved.into();
        assert_eq!(e.kind(), ErrorKind::Engine);
    }

    #[test]
    fn messages_name_the_channel() {
        let e = RateError::InvalidLifetime { row: 0, col: 3, value: 0.0 };
        let msg = e.to_string();
        assert!(msg.contains("(0,3)"), "{msg}");
    }

    #[test]
    fn shape_mismatches_name_both_sides() {
        let msg = EngineError::NodeCount { expected: 10, got: 2 }.to_string();
        assert_eq!(msg, "engine has 10 energy nodes, setup has 2");
        let msg = EngineError::StateCount { expected: 3, got: 4 }.to_string();
        assert_eq!(msg, "engine has 3 states, setup has 4");
    }
}
