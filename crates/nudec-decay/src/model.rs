//! How decay is described to the engine.
//!
//! Either the caller supplies partial rate matrices for all four process
//! classes, or it supplies Lagrangian couplings and lets the engine derive the
//! rates (which implies Majorana neutrinos and a single coupling type).

use nudec_core::error::{EngineError, RateError};
use nudec_core::traits::EvolutionEngine;
use nudec_core::types::{CouplingMatrix, MassVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::channels::{ChannelLifetimes, DecayRates};

/// Scalar or pseudoscalar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouplingType {
    #[default]
    Scalar,
    Pseudoscalar,
}

/// Decay description handed to an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DecayModel {
    /// Explicit rate matrices for every process class.
    PartialRates(DecayRates),
    /// Couplings g_ij; the engine computes rates internally.
    Couplings {
        couplings: CouplingMatrix,
        coupling_type: CouplingType,
    },
}

impl DecayModel {
    /// Build rates from lifetimes.
    pub fn from_lifetimes(lifetimes: &ChannelLifetimes, masses: &MassVector) -> Result<Self, RateError> {
        Ok(Self::PartialRates(lifetimes.build(masses)?))
    }

    /// A single open channel `heavier -> lighter` with coupling `g`.
    pub fn single_coupling(
        size: usize,
        heavier: usize,
        lighter: usize,
        g: f64,
        coupling_type: CouplingType,
    ) -> Result<Self, RateError> {
        let mut couplings = CouplingMatrix::zeros(size);
        couplings.set(heavier, lighter, g)?;
        Ok(Self::Couplings {
            couplings,
            coupling_type,
        })
    }

    /// Number of mass states the model describes.
    pub fn size(&self) -> usize {
        match self {
            Self::PartialRates(rates) => rates.scalar.cpp.size(),
            Self::Couplings { couplings, .. } => couplings.size(),
        }
    }

    /// Hand the model to an engine.
    pub fn apply(&self, engine: &mut dyn EvolutionEngine) -> Result<(), EngineError> {
        match self {
            Self::PartialRates(rates) => {
                debug!("handing partial rate matrices to engine");
                engine.set_scalar_matrices(&rates.scalar.cpp, &rates.scalar.cvp)?;
                engine.set_pseudoscalar_matrices(&rates.pseudoscalar.cpp, &rates.pseudoscalar.cvp)
            }
            Self::Couplings {
                couplings,
                coupling_type,
            } => {
                debug!(?coupling_type, "handing coupling matrix to engine");
                engine.set_couplings(couplings, *coupling_type == CouplingType::Pseudoscalar)
            }
        }
    }
}
