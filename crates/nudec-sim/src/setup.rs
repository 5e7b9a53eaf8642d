//! A validated run description and how it is pushed into an engine.

use std::fs;
use std::path::Path;

use nudec_core::constants::Units;
use nudec_core::error::{ConfigError, EngineError, FluxError, NudecError};
use nudec_core::traits::EvolutionEngine;
use nudec_core::types::{EnergyNodes, MassVector};
use nudec_decay::DecayModel;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SimulationConfig;

/// Configuration, masses, and decay model for one run, checked for
/// consistency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSetup {
    pub config: SimulationConfig,
    /// Energy nodes in natural units.
    pub energy_nodes: EnergyNodes,
    pub masses: MassVector,
    pub decay: DecayModel,
}

impl SimulationSetup {
    /// Validate and assemble a setup. Energies are converted with `units`.
    pub fn new(
        config: SimulationConfig,
        masses: MassVector,
        decay: DecayModel,
        units: &Units,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let n = config.num_neutrinos;
        if masses.len() != n {
            return Err(ConfigError::InvalidParameter {
                name: "masses",
                reason: format!("{} masses for {n} states", masses.len()),
            });
        }
        if decay.size() != n {
            return Err(ConfigError::InvalidParameter {
                name: "decay",
                reason: format!("{}x{} decay model for {n} states", decay.size(), decay.size()),
            });
        }
        let energy_nodes = config.energy.nodes(units);
        debug!(
            nodes = energy_nodes.len(),
            baseline = ?config.geometry.baseline(units),
            "setup assembled"
        );
        Ok(Self {
            config,
            energy_nodes,
            masses,
            decay,
        })
    }

    /// Push every parameter into `engine`.
    ///
    /// Order: mixing angles, splittings, phases, masses, geometry,
    /// integration, switches, decay model. The engine must have been built
    /// for the same state count and energy nodes.
    pub fn configure(&self, engine: &mut dyn EvolutionEngine) -> Result<(), EngineError> {
        let n = self.config.num_neutrinos;
        if engine.num_neutrinos() != n {
            return Err(EngineError::StateCount {
                expected: engine.num_neutrinos(),
                got: n,
            });
        }
        if engine.energy_nodes().len() != self.energy_nodes.len() {
            return Err(EngineError::NodeCount {
                expected: engine.energy_nodes().len(),
                got: self.energy_nodes.len(),
            });
        }

        let mixing = &self.config.mixing;
        for p in &mixing.angles {
            engine.set_mixing_angle(p.i, p.j, p.value)?;
        }
        for (k, dm2) in mixing.square_mass_differences.iter().enumerate() {
            engine.set_square_mass_difference(k + 1, *dm2)?;
        }
        for p in &mixing.phases {
            engine.set_cp_phase(p.i, p.j, p.value)?;
        }
        engine.set_masses(&self.masses, self.config.phi_mass)?;
        engine.set_geometry(&self.config.geometry)?;
        engine.set_integration(&self.config.integration)?;
        engine.set_switches(&self.config.switches)?;
        self.decay.apply(engine)?;

        debug!(
            num_neutrinos = n,
            nodes = self.energy_nodes.len(),
            geometry = ?self.config.geometry,
            "engine configured"
        );
        Ok(())
    }

    /// Pretty JSON description of the run.
    pub fn manifest_json(&self) -> Result<String, NudecError> {
        serde_json::to_string_pretty(self).map_err(|e| NudecError::Serialization(e.to_string()))
    }

    /// Write [`manifest_json`](Self::manifest_json) to `path`.
    pub fn write_manifest(&self, path: &Path) -> Result<(), NudecError> {
        let json = self.manifest_json()?;
        let io_err = |e: std::io::Error| FluxError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, json).map_err(io_err)?;
        info!(path = %path.display(), "wrote run manifest");
        Ok(())
    }
}
