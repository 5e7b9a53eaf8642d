//! Physical constants, unit conversions, and model defaults.
//!
//! Energies and lengths handed to an evolution engine are in natural units
//! (eV and 1/eV). Conversions go through a [`Units`] value that callers pass
//! explicitly; nothing in this workspace reads units from global state.

/// Lifetime assigned to a decay channel that is switched off.
///
/// Large but finite, so that its reciprocal is a negligible rate instead of a
/// division by zero or infinity.
pub const STABLE_LIFETIME: f64 = 1e60;

/// Number of active (standard model) flavors.
pub const ACTIVE_FLAVORS: usize = 3;

/// Default number of mass states: three active plus one sterile.
pub const DEFAULT_NUM_NEUTRINOS: usize = 4;

/// Solar mixing angle θ12 in radians.
pub const THETA_12: f64 = 0.563942;

/// Reactor mixing angle θ13 in radians.
pub const THETA_13: f64 = 0.154085;

/// Atmospheric mixing angle θ23 in radians.
pub const THETA_23: f64 = 0.785398;

/// Δm²21 in eV².
pub const DM2_21: f64 = 7.65e-05;

/// Δm²31 in eV².
pub const DM2_31: f64 = 0.00247;

/// Unit conversion table into natural units (ħ = c = 1, energies in eV).
///
/// Multiply a quantity expressed in a unit by the matching field to obtain it
/// in natural units, divide to go back.
///
/// # Examples
///
/// ```
/// use nudec_core::constants::Units;
/// let units = Units::natural();
/// assert_eq!(100.0 * units.gev / units.gev, 100.0);
/// assert!(units.km > units.meter);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Units {
    /// Electronvolt.
    pub ev: f64,
    /// Kiloelectronvolt.
    pub kev: f64,
    /// Megaelectronvolt.
    pub mev: f64,
    /// Gigaelectronvolt.
    pub gev: f64,
    /// Teraelectronvolt.
    pub tev: f64,
    /// Meter in 1/eV.
    pub meter: f64,
    /// Centimeter in 1/eV.
    pub cm: f64,
    /// Kilometer in 1/eV.
    pub km: f64,
    /// Second in 1/eV.
    pub second: f64,
    /// Gram in eV.
    pub gram: f64,
}

impl Units {
    /// The natural-unit table used by the oscillation engine.
    pub fn natural() -> Self {
        let ev = 1.0;
        let meter = 5.067_731_237e6;
        Self {
            ev,
            kev: 1.0e3 * ev,
            mev: 1.0e6 * ev,
            gev: 1.0e9 * ev,
            tev: 1.0e12 * ev,
            meter,
            cm: 1.0e-2 * meter,
            km: 1.0e3 * meter,
            second: 1.519_267_5e15,
            gram: 5.609_589_2e32 * ev,
        }
    }
}

impl Default for Units {
    fn default() -> Self {
        Self::natural()
    }
}

/// Flavor index of the electron neutrino.
pub const NU_E: usize = 0;
/// Flavor index of the muon neutrino.
pub const NU_MU: usize = 1;
/// Flavor index of the tau neutrino.
pub const NU_TAU: usize = 2;
/// Flavor index of the (first) sterile neutrino.
pub const NU_STERILE: usize = 3;
