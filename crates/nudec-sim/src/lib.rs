//! # nudec-sim: Run assembly for the sterile-neutrino decay drivers.
//!
//! - **Config**: energy grid, mixing, geometry, integration, and physics
//!   switches in one serde-serializable [`SimulationConfig`].
//! - **Setup**: a validated config plus masses and decay model, pushed into
//!   any [`EvolutionEngine`](nudec_core::traits::EvolutionEngine) and
//!   exportable as a JSON manifest.
//! - **Engine**: [`RecordingEngine`], the in-process engine that records its
//!   configuration without propagating.
//! - **Runner**: [`Simulation`] sequences configure, seed, evolve, and write.
//! - **Presets**: the atmospheric partial-rates run and the beam coupling run.

pub mod config;
pub mod engine;
pub mod presets;
pub mod runner;
pub mod setup;

pub use config::{EnergyGrid, MixingParameters, PairValue, SimulationConfig, Spacing};
pub use engine::RecordingEngine;
pub use presets::{CouplingRun, PartialRatesRun};
pub use runner::Simulation;
pub use setup::SimulationSetup;
