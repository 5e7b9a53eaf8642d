//! Simulation configuration.
//!
//! Provides [`SimulationConfig`] with defaults matching the engine's standard
//! three-flavor parameters plus one sterile state. Values are set
//! programmatically by the driver presets and can be dumped to JSON as part
//! of a run manifest.

use nudec_core::constants::{
    Units, DEFAULT_NUM_NEUTRINOS, DM2_21, DM2_31, THETA_12, THETA_13, THETA_23,
};
use nudec_core::error::ConfigError;
use nudec_core::params::{Geometry, IntegrationSettings, PhysicsSwitches};
use nudec_core::types::{EnergyNodes, NeutrinoType};
use serde::{Deserialize, Serialize};

/// Node spacing of an energy grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    Linear,
    #[default]
    Log,
}

/// Energy range in GeV and how it is sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyGrid {
    pub min_gev: f64,
    pub max_gev: f64,
    pub nodes: usize,
    pub spacing: Spacing,
}

impl EnergyGrid {
    /// Nodes in natural units.
    pub fn nodes(&self, units: &Units) -> EnergyNodes {
        let (lo, hi) = (self.min_gev * units.gev, self.max_gev * units.gev);
        match self.spacing {
            Spacing::Linear => EnergyNodes::linspace(lo, hi, self.nodes),
            Spacing::Log => EnergyNodes::logspace(lo, hi, self.nodes),
        }
    }
}

impl Default for EnergyGrid {
    fn default() -> Self {
        Self {
            min_gev: 1.0e2,
            max_gev: 1.0e3,
            nodes: 10,
            spacing: Spacing::Log,
        }
    }
}

/// A value attached to a pair of mass states `(i, j)`, `i < j`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairValue {
    pub i: usize,
    pub j: usize,
    pub value: f64,
}

/// Mixing angles, CP phases, and mass-squared splittings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixingParameters {
    /// θ_ij in radians. Pairs not listed are zero.
    pub angles: Vec<PairValue>,
    /// δ_ij in radians. Pairs not listed are zero.
    pub phases: Vec<PairValue>,
    /// `square_mass_differences[k - 1]` is Δm²_{k1} in eV².
    pub square_mass_differences: Vec<f64>,
}

fn upsert(list: &mut Vec<PairValue>, i: usize, j: usize, value: f64) {
    match list.iter_mut().find(|p| p.i == i && p.j == j) {
        Some(p) => p.value = value,
        None => list.push(PairValue { i, j, value }),
    }
}

fn lookup(list: &[PairValue], i: usize, j: usize) -> f64 {
    list.iter()
        .find(|p| p.i == i && p.j == j)
        .map_or(0.0, |p| p.value)
}

impl MixingParameters {
    /// Standard three-flavor values; sterile angles and splittings zero.
    pub fn standard(num_neutrinos: usize) -> Self {
        let mut m = Self {
            angles: Vec::new(),
            phases: Vec::new(),
            square_mass_differences: vec![0.0; num_neutrinos.saturating_sub(1)],
        };
        if num_neutrinos >= 3 {
            m.set_angle(0, 1, THETA_12);
            m.set_angle(0, 2, THETA_13);
            m.set_angle(1, 2, THETA_23);
            m.square_mass_differences[0] = DM2_21;
            m.square_mass_differences[1] = DM2_31;
        }
        m
    }

    pub fn set_angle(&mut self, i: usize, j: usize, theta: f64) {
        upsert(&mut self.angles, i, j, theta);
    }

    pub fn angle(&self, i: usize, j: usize) -> f64 {
        lookup(&self.angles, i, j)
    }

    pub fn set_phase(&mut self, i: usize, j: usize, delta: f64) {
        upsert(&mut self.phases, i, j, delta);
    }

    pub fn phase(&self, i: usize, j: usize) -> f64 {
        lookup(&self.phases, i, j)
    }

    /// Set Δm²_{k1}; grows the list if needed. `k == 0` is ignored.
    pub fn set_square_mass_difference(&mut self, k: usize, dm2: f64) {
        if k == 0 {
            return;
        }
        if self.square_mass_differences.len() < k {
            self.square_mass_differences.resize(k, 0.0);
        }
        self.square_mass_differences[k - 1] = dm2;
    }

    pub fn square_mass_difference(&self, k: usize) -> f64 {
        k.checked_sub(1)
            .and_then(|idx| self.square_mass_differences.get(idx))
            .copied()
            .unwrap_or(0.0)
    }

    fn validate(&self, num_neutrinos: usize) -> Result<(), ConfigError> {
        for p in self.angles.iter().chain(&self.phases) {
            if p.i >= p.j || p.j >= num_neutrinos {
                return Err(ConfigError::InvalidParameter {
                    name: "mixing",
                    reason: format!("pair ({},{}) invalid for {num_neutrinos} states", p.i, p.j),
                });
            }
        }
        if self.square_mass_differences.len() >= num_neutrinos {
            return Err(ConfigError::InvalidParameter {
                name: "square_mass_differences",
                reason: format!(
                    "{} splittings for {num_neutrinos} states",
                    self.square_mass_differences.len()
                ),
            });
        }
        Ok(())
    }
}

/// Complete configuration of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub num_neutrinos: usize,
    pub energy: EnergyGrid,
    pub neutrino_type: NeutrinoType,
    pub mixing: MixingParameters,
    pub geometry: Geometry,
    pub integration: IntegrationSettings,
    pub switches: PhysicsSwitches,
    /// Mass of the scalar decay product in eV.
    pub phi_mass: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_neutrinos: DEFAULT_NUM_NEUTRINOS,
            energy: EnergyGrid::default(),
            neutrino_type: NeutrinoType::Both,
            mixing: MixingParameters::standard(DEFAULT_NUM_NEUTRINOS),
            geometry: Geometry::default(),
            integration: IntegrationSettings::default(),
            switches: PhysicsSwitches::default(),
            phi_mass: 0.0,
        }
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

impl SimulationConfig {
    /// Reject configurations no engine could run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_neutrinos == 0 {
            return Err(invalid("num_neutrinos", "must be at least 1"));
        }
        let e = &self.energy;
        if e.nodes == 0 {
            return Err(invalid("energy.nodes", "must be at least 1"));
        }
        if !(e.min_gev > 0.0 && e.max_gev.is_finite()) {
            return Err(invalid("energy", format!("range {}..{} GeV must be positive", e.min_gev, e.max_gev)));
        }
        if e.nodes > 1 && e.min_gev >= e.max_gev {
            return Err(invalid("energy", format!("min {} GeV must be below max {} GeV", e.min_gev, e.max_gev)));
        }
        let tol = &self.integration;
        if !(tol.rel_error > 0.0 && tol.abs_error > 0.0) {
            return Err(invalid("integration", "tolerances must be positive"));
        }
        for (name, step) in [("initial_step_km", tol.initial_step_km), ("max_step_km", tol.max_step_km)] {
            if step.is_some_and(|h| !(h > 0.0)) {
                return Err(invalid(name, "must be positive"));
            }
        }
        match self.geometry {
            Geometry::Vacuum { baseline_km } | Geometry::ConstantDensity { baseline_km, .. }
                if !(baseline_km > 0.0) =>
            {
                return Err(invalid("geometry", "baseline must be positive"));
            }
            Geometry::ConstantDensity { density, ye, .. } if density < 0.0 || !(0.0..=1.0).contains(&ye) => {
                return Err(invalid("geometry", format!("density {density} / ye {ye} out of range")));
            }
            _ => {}
        }
        if self.phi_mass < 0.0 {
            return Err(invalid("phi_mass", "must be non-negative"));
        }
        self.mixing.validate(self.num_neutrinos)
    }
}
