//! In-process [`EvolutionEngine`] that records its configuration.
//!
//! [`RecordingEngine`] accepts and validates everything a decay-aware
//! propagator is given, keeps it for inspection, and carries the initial
//! state through [`evolve`](EvolutionEngine::evolve) unchanged. It does not
//! integrate anything: it is the stand-in used when no external propagator is
//! attached, and the engine the tests drive.

use std::collections::BTreeMap;

use nudec_core::error::EngineError;
use nudec_core::params::{Geometry, IntegrationSettings, PhysicsSwitches};
use nudec_core::traits::EvolutionEngine;
use nudec_core::types::{
    Basis, CouplingMatrix, DecayRateMatrix, EnergyNodes, FlavorState, MassVector, NeutrinoType,
    Particle,
};
use tracing::{debug, warn};

/// Engine that stores its inputs and performs no propagation.
#[derive(Debug, Clone)]
pub struct RecordingEngine {
    nodes: EnergyNodes,
    num_neutrinos: usize,
    neutrino_type: NeutrinoType,
    angles: BTreeMap<(usize, usize), f64>,
    phases: BTreeMap<(usize, usize), f64>,
    square_mass_differences: BTreeMap<usize, f64>,
    masses: Option<MassVector>,
    phi_mass: f64,
    geometry: Option<Geometry>,
    integration: Option<IntegrationSettings>,
    switches: Option<PhysicsSwitches>,
    scalar: Option<(DecayRateMatrix, DecayRateMatrix)>,
    pseudoscalar: Option<(DecayRateMatrix, DecayRateMatrix)>,
    couplings: Option<(CouplingMatrix, bool)>,
    initial: Option<(FlavorState, Basis)>,
    evolved: Option<FlavorState>,
}

impl RecordingEngine {
    pub fn new(nodes: EnergyNodes, num_neutrinos: usize, neutrino_type: NeutrinoType) -> Self {
        Self {
            nodes,
            num_neutrinos,
            neutrino_type,
            angles: BTreeMap::new(),
            phases: BTreeMap::new(),
            square_mass_differences: BTreeMap::new(),
            masses: None,
            phi_mass: 0.0,
            geometry: None,
            integration: None,
            switches: None,
            scalar: None,
            pseudoscalar: None,
            couplings: None,
            initial: None,
            evolved: None,
        }
    }

    pub fn mixing_angle(&self, i: usize, j: usize) -> Option<f64> {
        self.angles.get(&(i, j)).copied()
    }

    pub fn cp_phase(&self, i: usize, j: usize) -> Option<f64> {
        self.phases.get(&(i, j)).copied()
    }

    pub fn square_mass_difference(&self, k: usize) -> Option<f64> {
        self.square_mass_differences.get(&k).copied()
    }

    pub fn masses(&self) -> Option<&MassVector> {
        self.masses.as_ref()
    }

    pub fn phi_mass(&self) -> f64 {
        self.phi_mass
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    pub fn integration(&self) -> Option<&IntegrationSettings> {
        self.integration.as_ref()
    }

    pub fn switches(&self) -> Option<&PhysicsSwitches> {
        self.switches.as_ref()
    }

    /// `(cpp, cvp)` scalar rates, if handed over.
    pub fn scalar_matrices(&self) -> Option<&(DecayRateMatrix, DecayRateMatrix)> {
        self.scalar.as_ref()
    }

    /// `(cpp, cvp)` pseudoscalar rates, if handed over.
    pub fn pseudoscalar_matrices(&self) -> Option<&(DecayRateMatrix, DecayRateMatrix)> {
        self.pseudoscalar.as_ref()
    }

    /// Couplings and the pseudoscalar flag, if handed over.
    pub fn couplings(&self) -> Option<&(CouplingMatrix, bool)> {
        self.couplings.as_ref()
    }

    pub fn initial_state(&self) -> Option<&FlavorState> {
        self.initial.as_ref().map(|(s, _)| s)
    }

    pub fn is_evolved(&self) -> bool {
        self.evolved.is_some()
    }

    fn check_pair(&self, i: usize, j: usize) -> Result<(), EngineError> {
        if i < j && j < self.num_neutrinos {
            Ok(())
        } else {
            Err(EngineError::MixingIndex {
                i,
                j,
                num_neutrinos: self.num_neutrinos,
            })
        }
    }

    fn check_size(&self, size: usize) -> Result<(), EngineError> {
        if size == self.num_neutrinos {
            Ok(())
        } else {
            Err(EngineError::MatrixSize {
                expected: self.num_neutrinos,
                got: size,
            })
        }
    }

    fn expected_shape(&self) -> (usize, usize, usize) {
        (self.nodes.len(), self.neutrino_type.count(), self.num_neutrinos)
    }
}

impl EvolutionEngine for RecordingEngine {
    fn num_neutrinos(&self) -> usize {
        self.num_neutrinos
    }

    fn energy_nodes(&self) -> &EnergyNodes {
        &self.nodes
    }

    fn neutrino_type(&self) -> NeutrinoType {
        self.neutrino_type
    }

    fn set_mixing_angle(&mut self, i: usize, j: usize, theta: f64) -> Result<(), EngineError> {
        self.check_pair(i, j)?;
        self.angles.insert((i, j), theta);
        Ok(())
    }

    fn set_square_mass_difference(&mut self, k: usize, dm2: f64) -> Result<(), EngineError> {
        if k == 0 || k >= self.num_neutrinos {
            return Err(EngineError::SplittingIndex {
                k,
                num_neutrinos: self.num_neutrinos,
            });
        }
        self.square_mass_differences.insert(k, dm2);
        Ok(())
    }

    fn set_cp_phase(&mut self, i: usize, j: usize, delta: f64) -> Result<(), EngineError> {
        self.check_pair(i, j)?;
        self.phases.insert((i, j), delta);
        Ok(())
    }

    fn set_masses(&mut self, masses: &MassVector, phi_mass: f64) -> Result<(), EngineError> {
        self.check_size(masses.len())?;
        self.masses = Some(masses.clone());
        self.phi_mass = phi_mass;
        Ok(())
    }

    fn set_geometry(&mut self, geometry: &Geometry) -> Result<(), EngineError> {
        self.geometry = Some(geometry.clone());
        Ok(())
    }

    fn set_integration(&mut self, settings: &IntegrationSettings) -> Result<(), EngineError> {
        self.integration = Some(settings.clone());
        Ok(())
    }

    fn set_switches(&mut self, switches: &PhysicsSwitches) -> Result<(), EngineError> {
        self.switches = Some(*switches);
        Ok(())
    }

    fn set_scalar_matrices(
        &mut self,
        cpp: &DecayRateMatrix,
        cvp: &DecayRateMatrix,
    ) -> Result<(), EngineError> {
        self.check_size(cpp.size())?;
        self.check_size(cvp.size())?;
        self.scalar = Some((cpp.clone(), cvp.clone()));
        Ok(())
    }

    fn set_pseudoscalar_matrices(
        &mut self,
        cpp: &DecayRateMatrix,
        cvp: &DecayRateMatrix,
    ) -> Result<(), EngineError> {
        self.check_size(cpp.size())?;
        self.check_size(cvp.size())?;
        self.pseudoscalar = Some((cpp.clone(), cvp.clone()));
        Ok(())
    }

    fn set_couplings(
        &mut self,
        couplings: &CouplingMatrix,
        pseudoscalar: bool,
    ) -> Result<(), EngineError> {
        self.check_size(couplings.size())?;
        self.couplings = Some((couplings.clone(), pseudoscalar));
        Ok(())
    }

    fn set_initial_state(&mut self, state: &FlavorState, basis: Basis) -> Result<(), EngineError> {
        let expected = self.expected_shape();
        if state.shape() != expected {
            return Err(EngineError::StateShape {
                expected,
                got: state.shape(),
            });
        }
        self.initial = Some((state.clone(), basis));
        self.evolved = None;
        debug!(shape = ?expected, ?basis, "initial state recorded");
        Ok(())
    }

    fn evolve(&mut self) -> Result<(), EngineError> {
        if self.masses.is_none() {
            return Err(EngineError::NotConfigured("masses"));
        }
        if self.geometry.is_none() {
            return Err(EngineError::NotConfigured("geometry"));
        }
        let has_rates = self.scalar.is_some() && self.pseudoscalar.is_some();
        if !has_rates && self.couplings.is_none() {
            return Err(EngineError::NotConfigured("decay rates or couplings"));
        }
        let Some((state, _)) = &self.initial else {
            return Err(EngineError::NotConfigured("initial state"));
        };

        warn!("recording engine: no propagator attached, flux is carried through unevolved");
        self.evolved = Some(state.clone());
        Ok(())
    }

    fn eval_flavor_at_node(
        &self,
        flavor: usize,
        node: usize,
        particle: Particle,
    ) -> Result<f64, EngineError> {
        if flavor >= self.num_neutrinos {
            return Err(EngineError::FlavorOutOfRange {
                flavor,
                num_neutrinos: self.num_neutrinos,
            });
        }
        if node >= self.nodes.len() {
            return Err(EngineError::NodeOutOfRange {
                node,
                nodes: self.nodes.len(),
            });
        }
        let slot = self
            .neutrino_type
            .slot(particle)
            .ok_or(EngineError::ParticleNotCarried(particle))?;
        let state = match (&self.evolved, &self.initial) {
            (Some(evolved), _) => evolved,
            (None, Some((initial, _))) => initial,
            (None, None) => return Err(EngineError::NotConfigured("initial state")),
        };
        state
            .get(node, slot, flavor)
            .ok_or(EngineError::NodeOutOfRange {
                node,
                nodes: self.nodes.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudec_core::types::LifetimeMatrix;
    use nudec_decay::build_decay_rate_matrix;

    fn engine() -> RecordingEngine {
        RecordingEngine::new(EnergyNodes::linspace(1.0, 3.0, 3), 4, NeutrinoType::Both)
    }

    fn masses() -> MassVector {
        MassVector::new(vec![0.0, 0.1, 0.2, 1.0]).unwrap()
    }

    fn rates() -> DecayRateMatrix {
        let tau = LifetimeMatrix::stable(4).with_channel(2, 3, 10.0).unwrap();
        build_decay_rate_matrix(&tau, &masses()).unwrap()
    }

    fn configured() -> RecordingEngine {
        let mut e = engine();
        e.set_masses(&masses(), 0.0).unwrap();
        e.set_geometry(&Geometry::upgoing()).unwrap();
        e.set_scalar_matrices(&rates(), &rates()).unwrap();
        e.set_pseudoscalar_matrices(&rates(), &rates()).unwrap();
        e
    }

    fn muon_state() -> FlavorState {
        let mut s = FlavorState::zeros(3, 2, 4);
        s.fill_with(|e, p, f| if f == 1 { (e + 1) as f64 * 10.0 + p as f64 } else { 0.0 });
        s
    }

    #[test]
    fn records_mixing() {
        let mut e = engine();
        e.set_mixing_angle(1, 3, 0.7).unwrap();
        e.set_cp_phase(0, 2, 0.1).unwrap();
        e.set_square_mass_difference(3, 1.0).unwrap();
        assert_eq!(e.mixing_angle(1, 3), Some(0.7));
        assert_eq!(e.cp_phase(0, 2), Some(0.1));
        assert_eq!(e.square_mass_difference(3), Some(1.0));
        assert_eq!(e.mixing_angle(0, 1), None);
    }

    #[test]
    fn rejects_bad_mixing_indices() {
        let mut e = engine();
        assert!(matches!(e.set_mixing_angle(3, 1, 0.1), Err(EngineError::MixingIndex { .. })));
        assert!(e.set_mixing_angle(0, 4, 0.1).is_err());
        assert_eq!(
            e.set_square_mass_difference(0, 1.0),
            Err(EngineError::SplittingIndex { k: 0, num_neutrinos: 4 })
        );
        assert_eq!(
            e.set_square_mass_difference(4, 1.0),
            Err(EngineError::SplittingIndex { k: 4, num_neutrinos: 4 })
        );
    }

    #[test]
    fn rejects_wrong_matrix_size() {
        let mut e = engine();
        let small = build_decay_rate_matrix(
            &LifetimeMatrix::stable(2),
            &MassVector::new(vec![0.0, 1.0]).unwrap(),
        )
        .unwrap();
        assert_eq!(
            e.set_scalar_matrices(&small, &small),
            Err(EngineError::MatrixSize { expected: 4, got: 2 })
        );
        assert!(e.set_couplings(&CouplingMatrix::zeros(3), false).is_err());
    }

    #[test]
    fn rejects_wrong_state_shape() {
        let mut e = engine();
        let err = e.set_initial_state(&FlavorState::zeros(3, 1, 4), Basis::Flavor).unwrap_err();
        assert_eq!(
            err,
            EngineError::StateShape { expected: (3, 2, 4), got: (3, 1, 4) }
        );
    }

    #[test]
    fn evolve_requires_configuration() {
        let mut e = engine();
        assert_eq!(e.evolve(), Err(EngineError::NotConfigured("masses")));
        e.set_masses(&masses(), 0.0).unwrap();
        assert_eq!(e.evolve(), Err(EngineError::NotConfigured("geometry")));
        e.set_geometry(&Geometry::upgoing()).unwrap();
        assert_eq!(e.evolve(), Err(EngineError::NotConfigured("decay rates or couplings")));
        e.set_scalar_matrices(&rates(), &rates()).unwrap();
        assert_eq!(e.evolve(), Err(EngineError::NotConfigured("decay rates or couplings")));
        e.set_pseudoscalar_matrices(&rates(), &rates()).unwrap();
        assert_eq!(e.evolve(), Err(EngineError::NotConfigured("initial state")));
    }

    #[test]
    fn couplings_alone_satisfy_decay_requirement() {
        let mut e = engine();
        e.set_masses(&masses(), 0.0).unwrap();
        e.set_geometry(&Geometry::upgoing()).unwrap();
        let mut g = CouplingMatrix::zeros(4);
        g.set(3, 2, 1.0).unwrap();
        e.set_couplings(&g, true).unwrap();
        e.set_initial_state(&muon_state(), Basis::Flavor).unwrap();
        e.evolve().unwrap();
        assert_eq!(e.couplings().map(|(_, ps)| *ps), Some(true));
    }

    #[test]
    fn eval_before_and_after_evolve() {
        let mut e = configured();
        assert_eq!(
            e.eval_flavor_at_node(1, 0, Particle::Neutrino),
            Err(EngineError::NotConfigured("initial state"))
        );
        e.set_initial_state(&muon_state(), Basis::Flavor).unwrap();
        assert_eq!(e.eval_flavor_at_node(1, 2, Particle::Antineutrino), Ok(31.0));
        assert!(!e.is_evolved());
        e.evolve().unwrap();
        assert!(e.is_evolved());
        assert_eq!(e.eval_flavor_at_node(1, 2, Particle::Antineutrino), Ok(31.0));
        assert_eq!(e.eval_flavor_at_node(0, 2, Particle::Neutrino), Ok(0.0));
    }

    #[test]
    fn eval_bounds() {
        let mut e = configured();
        e.set_initial_state(&muon_state(), Basis::Flavor).unwrap();
        assert!(matches!(
            e.eval_flavor_at_node(4, 0, Particle::Neutrino),
            Err(EngineError::FlavorOutOfRange { .. })
        ));
        assert!(matches!(
            e.eval_flavor_at_node(0, 3, Particle::Neutrino),
            Err(EngineError::NodeOutOfRange { .. })
        ));
    }

    #[test]
    fn eval_uncarried_particle() {
        let mut e = RecordingEngine::new(EnergyNodes::linspace(1.0, 2.0, 2), 4, NeutrinoType::Neutrino);
        e.set_initial_state(&FlavorState::zeros(2, 1, 4), Basis::Flavor).unwrap();
        assert_eq!(
            e.eval_flavor_at_node(0, 0, Particle::Antineutrino),
            Err(EngineError::ParticleNotCarried(Particle::Antineutrino))
        );
    }

    #[test]
    fn default_eval_flavors_at_node() {
        let mut e = configured();
        e.set_initial_state(&muon_state(), Basis::Flavor).unwrap();
        let row = e.eval_flavors_at_node(0, Particle::Neutrino).unwrap();
        assert_eq!(row, vec![0.0, 10.0, 0.0, 0.0]);
    }

    #[test]
    fn new_initial_state_resets_evolution() {
        let mut e = configured();
        e.set_initial_state(&muon_state(), Basis::Flavor).unwrap();
        e.evolve().unwrap();
        e.set_initial_state(&FlavorState::zeros(3, 2, 4), Basis::Flavor).unwrap();
        assert!(!e.is_evolved());
        assert_eq!(e.eval_flavor_at_node(1, 0, Particle::Neutrino), Ok(0.0));
    }
}
