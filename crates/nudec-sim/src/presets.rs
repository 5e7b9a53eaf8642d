//! Ready-made runs.
//!
//! * [`PartialRatesRun`]: an upgoing atmospheric track through the Earth with
//!   the heaviest state decaying to each lighter one, decay described by
//!   explicit rate matrices.
//! * [`CouplingRun`]: a short-baseline beam through constant-density matter,
//!   decay described by a single scalar or pseudoscalar coupling.

use nudec_core::constants::{Units, DM2_21, DM2_31, NU_MU, NU_STERILE, NU_TAU};
use nudec_core::error::{NudecError, RateError};
use nudec_core::params::{Geometry, IntegrationSettings, PhysicsSwitches, Stepper};
use nudec_core::types::{MassVector, NeutrinoType, Particle};
use nudec_decay::{ChannelLifetimes, CouplingType, DecayModel};
use nudec_flux::{ColumnMapping, FluxLayout, OutputName};
use tracing::info;

use crate::config::{EnergyGrid, MixingParameters, SimulationConfig, Spacing};
use crate::setup::SimulationSetup;

/// Maximal active-sterile mixing angle used by the atmospheric run.
pub const MAXIMAL_MIXING: f64 = 0.785398;

/// Lifetime of every open channel in the atmospheric run.
pub const DEFAULT_CHANNEL_LIFETIME: f64 = 100.0;

/// Flux file read by the beam run.
pub const BEAM_FLUX_FILE: &str = "MicroBooNE_SQuIDSFormat_Flux_NumuAndAntiNuMu.dat";

/// m3² used for the beam run's decay kinematics (eV²).
const BEAM_M3_SQUARED: f64 = 0.0024;

const BEAM_BASELINE_KM: f64 = 0.47;

/// Atmospheric run with the decay model given as partial rate matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialRatesRun {
    pub sterile_mass: f64,
    pub lifetimes: ChannelLifetimes,
}

impl PartialRatesRun {
    /// The heaviest state decays to each lighter one with
    /// [`DEFAULT_CHANNEL_LIFETIME`] in every process class.
    pub fn new(sterile_mass: f64) -> Result<Self, RateError> {
        Ok(Self {
            sterile_mass,
            lifetimes: ChannelLifetimes::heaviest_unstable(4, DEFAULT_CHANNEL_LIFETIME)?,
        })
    }

    /// m1 = 0, m2 and m3 from the standard splittings, m4 the sterile mass.
    pub fn masses(&self) -> Result<MassVector, NudecError> {
        Ok(MassVector::new(vec![0.0, DM2_21.sqrt(), DM2_31.sqrt(), self.sterile_mass])?)
    }

    pub fn config(&self, masses: &MassVector) -> SimulationConfig {
        let mut mixing = MixingParameters::standard(4);
        for active in 0..NU_STERILE {
            mixing.set_angle(active, NU_STERILE, MAXIMAL_MIXING);
        }
        if let Some(dm41) = masses.square_mass_difference(NU_STERILE) {
            mixing.set_square_mass_difference(NU_STERILE, dm41);
        }
        SimulationConfig {
            num_neutrinos: 4,
            energy: EnergyGrid {
                min_gev: 1.0e2,
                max_gev: 1.0e3,
                nodes: 10,
                spacing: Spacing::Log,
            },
            neutrino_type: NeutrinoType::Both,
            mixing,
            geometry: Geometry::upgoing(),
            integration: IntegrationSettings::with_tolerance(1.0e-16),
            switches: PhysicsSwitches {
                incoherent_interactions: false,
                majorana: true,
                decay_regeneration: true,
                ..PhysicsSwitches::default()
            },
            phi_mass: 0.0,
        }
    }

    pub fn setup(&self, units: &Units) -> Result<SimulationSetup, NudecError> {
        let masses = self.masses()?;
        let decay = DecayModel::from_lifetimes(&self.lifetimes, &masses)?;
        let setup = SimulationSetup::new(self.config(&masses), masses, decay, units)?;
        info!(sterile_mass = self.sterile_mass, "partial-rates run assembled");
        Ok(setup)
    }

    /// Energy in GeV, then every neutrino flavor, then every antineutrino flavor.
    pub fn layout(&self, units: &Units) -> FluxLayout {
        FluxLayout::all_flavors(4, NeutrinoType::Both, units.gev)
    }

    /// The initial state is pure ν_μ.
    pub fn initial_flavor(&self) -> usize {
        NU_MU
    }
}

/// Beam run with the decay model given as a coupling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingRun {
    /// Sterile mass m4 in eV.
    pub mass: f64,
    /// θ24 in radians.
    pub theta24: f64,
    /// Coupling g between the heaviest state and m3.
    pub coupling: f64,
    pub coupling_type: CouplingType,
}

impl Default for CouplingRun {
    fn default() -> Self {
        Self {
            mass: 1.0,
            theta24: 1.0,
            coupling: 1.0,
            coupling_type: CouplingType::Scalar,
        }
    }
}

impl CouplingRun {
    pub fn masses(&self) -> Result<MassVector, NudecError> {
        Ok(MassVector::new(vec![0.0, DM2_21.sqrt(), BEAM_M3_SQUARED.sqrt(), self.mass])?)
    }

    pub fn config(&self) -> SimulationConfig {
        let mut mixing = MixingParameters::standard(4);
        mixing.set_angle(0, NU_STERILE, 0.0);
        mixing.set_angle(NU_MU, NU_STERILE, self.theta24);
        mixing.set_angle(NU_TAU, NU_STERILE, 0.0);
        mixing.set_square_mass_difference(NU_STERILE, self.mass * self.mass);
        for (i, j) in [(0, NU_TAU), (0, NU_STERILE), (NU_MU, NU_STERILE)] {
            mixing.set_phase(i, j, 0.0);
        }
        SimulationConfig {
            num_neutrinos: 4,
            energy: EnergyGrid {
                min_gev: 0.025,
                max_gev: 9.975,
                nodes: 200,
                spacing: Spacing::Linear,
            },
            neutrino_type: NeutrinoType::Both,
            mixing,
            geometry: Geometry::ConstantDensity {
                density: 5.0,
                ye: 0.3,
                baseline_km: BEAM_BASELINE_KM,
            },
            integration: IntegrationSettings {
                rel_error: 1.0e-15,
                abs_error: 1.0e-15,
                stepper: Stepper::Rkf45,
                initial_step_km: Some(BEAM_BASELINE_KM / 2000.0),
                max_step_km: Some(BEAM_BASELINE_KM / 100.0),
                progress_bar: true,
            },
            switches: PhysicsSwitches {
                incoherent_interactions: true,
                majorana: true,
                decay_regeneration: true,
                tau_regeneration: true,
                include_oscillations: true,
            },
            phi_mass: 0.0,
        }
    }

    pub fn setup(&self, units: &Units) -> Result<SimulationSetup, NudecError> {
        let masses = self.masses()?;
        let decay =
            DecayModel::single_coupling(4, NU_STERILE, NU_TAU, self.coupling, self.coupling_type)?;
        let setup = SimulationSetup::new(self.config(), masses, decay, units)?;
        info!(
            mass = self.mass,
            theta24 = self.theta24,
            coupling = self.coupling,
            coupling_type = ?self.coupling_type,
            "coupling run assembled"
        );
        Ok(setup)
    }

    /// Column 1 of the flux file is ν_μ, column 2 is ν̄_μ.
    pub fn flux_columns(&self) -> [ColumnMapping; 2] {
        [
            ColumnMapping { column: 1, particle: Particle::Neutrino, flavor: NU_MU },
            ColumnMapping { column: 2, particle: Particle::Antineutrino, flavor: NU_MU },
        ]
    }

    pub fn layout(&self) -> FluxLayout {
        FluxLayout::single_flavor(NU_MU)
    }

    pub fn initial_name(&self) -> OutputName {
        OutputName::new("ub_initial")
    }

    pub fn final_name(&self) -> OutputName {
        OutputName::new("ub_final")
            .param("m", self.mass)
            .param("t", self.theta24)
            .param("c", self.coupling)
    }
}
