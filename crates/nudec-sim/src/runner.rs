//! Drives one engine through a run: configure, seed, evolve, write.

use std::path::Path;
use std::time::Instant;

use nudec_core::error::{EngineError, NudecError};
use nudec_core::traits::EvolutionEngine;
use nudec_core::types::{Basis, FlavorState};
use nudec_flux::{render_flux, write_flux_file, FluxLayout};
use tracing::info;

use crate::setup::SimulationSetup;

/// An engine configured from a [`SimulationSetup`].
pub struct Simulation<E: EvolutionEngine> {
    setup: SimulationSetup,
    engine: E,
    seeded: bool,
    evolved: bool,
}

impl<E: EvolutionEngine> Simulation<E> {
    /// Configure `engine` from `setup`.
    pub fn new(setup: SimulationSetup, mut engine: E) -> Result<Self, EngineError> {
        setup.configure(&mut engine)?;
        Ok(Self {
            setup,
            engine,
            seeded: false,
            evolved: false,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_evolved(&self) -> bool {
        self.evolved
    }

    /// Seed the engine. Clears any previous evolution.
    pub fn set_initial_state(&mut self, state: &FlavorState, basis: Basis) -> Result<(), EngineError> {
        self.engine.set_initial_state(state, basis)?;
        self.seeded = true;
        self.evolved = false;
        Ok(())
    }

    /// Propagate the seeded state.
    pub fn evolve(&mut self) -> Result<(), EngineError> {
        if !self.seeded {
            return Err(EngineError::NotConfigured("initial state"));
        }
        let start = Instant::now();
        self.engine.evolve()?;
        self.evolved = true;
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            nodes = self.setup.energy_nodes.len(),
            "evolution finished"
        );
        Ok(())
    }

    /// Render the engine's current flux (initial before evolution, final after).
    pub fn render(&self, layout: &FluxLayout) -> Result<String, EngineError> {
        render_flux(&self.engine, layout)
    }

    /// Render the evolved flux; fails before [`evolve`](Self::evolve).
    pub fn render_final(&self, layout: &FluxLayout) -> Result<String, EngineError> {
        if !self.evolved {
            return Err(EngineError::NotEvolved);
        }
        self.render(layout)
    }

    /// Write the engine's current flux to `path`.
    pub fn write_flux(&self, layout: &FluxLayout, path: &Path) -> Result<usize, NudecError> {
        write_flux_file(&self.engine, layout, path)
    }

    /// Write the evolved flux; fails before [`evolve`](Self::evolve).
    pub fn write_final(&self, layout: &FluxLayout, path: &Path) -> Result<usize, NudecError> {
        if !self.evolved {
            return Err(EngineError::NotEvolved.into());
        }
        self.write_flux(layout, path)
    }
}
