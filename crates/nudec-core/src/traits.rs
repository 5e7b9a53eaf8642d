//! Trait interface for the flavor-evolution engine.
//!
//! The oscillation Hamiltonian, decay kinematics, and ODE integration live in
//! an external propagator. This trait is the whole contract between the
//! drivers in this workspace and that propagator: configuration goes in
//! through the setters, [`evolve`](EvolutionEngine::evolve) runs once, and
//! results come back through flavor queries per energy node.

use crate::error::EngineError;
use crate::params::{Geometry, IntegrationSettings, PhysicsSwitches};
use crate::types::{
    Basis, CouplingMatrix, DecayRateMatrix, EnergyNodes, FlavorState, MassVector, NeutrinoType,
    Particle,
};

/// A decay-aware neutrino flavor evolution engine.
///
/// Setters may be called in any order before [`set_initial_state`](Self::set_initial_state);
/// implementations report missing pieces from [`evolve`](Self::evolve) with
/// [`EngineError::NotConfigured`].
pub trait EvolutionEngine: Send {
    /// Number of mass states (and flavors) the engine was built for.
    fn num_neutrinos(&self) -> usize;

    /// Energy nodes in natural units.
    fn energy_nodes(&self) -> &EnergyNodes;

    /// Particle components carried by the state.
    fn neutrino_type(&self) -> NeutrinoType;

    /// Set mixing angle θ_ij (radians), `i < j`.
    fn set_mixing_angle(&mut self, i: usize, j: usize, theta: f64) -> Result<(), EngineError>;

    /// Set Δm²_{k1} in eV², `k >= 1`.
    fn set_square_mass_difference(&mut self, k: usize, dm2: f64) -> Result<(), EngineError>;

    /// Set CP phase δ_ij (radians), `i < j`.
    fn set_cp_phase(&mut self, i: usize, j: usize, delta: f64) -> Result<(), EngineError>;

    /// Set absolute neutrino masses (eV) and the mass of the scalar decay product.
    fn set_masses(&mut self, masses: &MassVector, phi_mass: f64) -> Result<(), EngineError>;

    /// Set the matter profile and propagation path.
    fn set_geometry(&mut self, geometry: &Geometry) -> Result<(), EngineError>;

    /// Set integrator tolerances and step control.
    fn set_integration(&mut self, settings: &IntegrationSettings) -> Result<(), EngineError>;

    /// Toggle optional physics.
    fn set_switches(&mut self, switches: &PhysicsSwitches) -> Result<(), EngineError>;

    /// Hand over the chirality-preserving and chirality-violating scalar rates.
    fn set_scalar_matrices(
        &mut self,
        cpp: &DecayRateMatrix,
        cvp: &DecayRateMatrix,
    ) -> Result<(), EngineError>;

    /// Hand over the chirality-preserving and chirality-violating pseudoscalar rates.
    fn set_pseudoscalar_matrices(
        &mut self,
        cpp: &DecayRateMatrix,
        cvp: &DecayRateMatrix,
    ) -> Result<(), EngineError>;

    /// Hand over Lagrangian couplings; the engine derives partial rates itself.
    ///
    /// `pseudoscalar` selects pure pseudoscalar instead of pure scalar coupling.
    fn set_couplings(
        &mut self,
        couplings: &CouplingMatrix,
        pseudoscalar: bool,
    ) -> Result<(), EngineError>;

    /// Set the state at the start of the track. Shape must be
    /// `(energy nodes, neutrino_type().count(), num_neutrinos())`.
    fn set_initial_state(&mut self, state: &FlavorState, basis: Basis) -> Result<(), EngineError>;

    /// Propagate the initial state along the configured track.
    fn evolve(&mut self) -> Result<(), EngineError>;

    /// Flavor content at an energy node for the given particle.
    ///
    /// Before [`evolve`](Self::evolve) this reflects the initial state.
    fn eval_flavor_at_node(
        &self,
        flavor: usize,
        node: usize,
        particle: Particle,
    ) -> Result<f64, EngineError>;

    /// All flavors at one node, in flavor order.
    ///
    /// Default implementation queries [`eval_flavor_at_node`](Self::eval_flavor_at_node)
    /// once per flavor.
    fn eval_flavors_at_node(&self, node: usize, particle: Particle) -> Result<Vec<f64>, EngineError> {
        (0..self.num_neutrinos())
            .map(|flavor| self.eval_flavor_at_node(flavor, node, particle))
            .collect()
    }
}
