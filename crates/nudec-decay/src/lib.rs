//! # nudec-decay: Decay-rate matrices for the sterile-neutrino decay model.
//!
//! - **Rate builder**: per-channel lifetimes become decay rates, with the
//!   mass-weighted total decay rate of each state on the diagonal.
//! - **Process classes**: chirality-preserving and chirality-violating decays
//!   for scalar and pseudoscalar couplings, each with its own matrix.
//! - **Decay model**: either explicit rate matrices or a coupling matrix,
//!   handed to an [`EvolutionEngine`](nudec_core::traits::EvolutionEngine).

pub mod builder;
pub mod channels;
pub mod model;

pub use builder::build_decay_rate_matrix;
pub use channels::{ChannelLifetimes, DecayRates, ProcessClass, RatePair};
pub use model::{CouplingType, DecayModel};
