//! Propagation parameters handed to an evolution engine.
//!
//! Lengths are stored in kilometers and angles in radians. Conversion to
//! natural units happens at the engine boundary through [`Units`].

use serde::{Deserialize, Serialize};

use crate::constants::Units;

/// Matter profile and path the flux is propagated along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    /// Straight path through vacuum.
    Vacuum { baseline_km: f64 },
    /// Straight path through uniform matter.
    ConstantDensity {
        /// Density in g/cm³.
        density: f64,
        /// Electron fraction.
        ye: f64,
        baseline_km: f64,
    },
    /// Atmospheric trajectory through the Earth model, by zenith angle.
    EarthAtm { zenith: f64 },
}

impl Geometry {
    /// Path length in natural units, where the geometry fixes it directly.
    ///
    /// Earth-atmosphere tracks derive their length from the zenith angle
    /// inside the engine, so this returns `None` for them.
    pub fn baseline(&self, units: &Units) -> Option<f64> {
        match self {
            Self::Vacuum { baseline_km } | Self::ConstantDensity { baseline_km, .. } => {
                Some(baseline_km * units.km)
            }
            Self::EarthAtm { .. } => None,
        }
    }

    /// Straight up-going trajectory through the Earth's center.
    pub fn upgoing() -> Self {
        Self::EarthAtm {
            zenith: std::f64::consts::PI,
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::upgoing()
    }
}

/// ODE stepping scheme requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stepper {
    Rk2,
    Rk4,
    #[default]
    Rkf45,
    Rkck,
    Rk8pd,
}

/// Integrator accuracy and step control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationSettings {
    pub rel_error: f64,
    pub abs_error: f64,
    pub stepper: Stepper,
    /// Initial step in km; engine default when `None`.
    pub initial_step_km: Option<f64>,
    /// Maximum step in km; engine default when `None`.
    pub max_step_km: Option<f64>,
    pub progress_bar: bool,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            rel_error: 1.0e-16,
            abs_error: 1.0e-16,
            stepper: Stepper::default(),
            initial_step_km: None,
            max_step_km: None,
            progress_bar: false,
        }
    }
}

impl IntegrationSettings {
    /// Same tolerance for relative and absolute error.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            rel_error: tolerance,
            abs_error: tolerance,
            ..Self::default()
        }
    }
}

/// Physics toggles understood by a decay-aware engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsSwitches {
    /// Absorption, Glashow resonance and other incoherent scattering.
    pub incoherent_interactions: bool,
    pub majorana: bool,
    /// Regeneration of lighter states from decay products.
    pub decay_regeneration: bool,
    pub tau_regeneration: bool,
    pub include_oscillations: bool,
}

impl Default for PhysicsSwitches {
    fn default() -> Self {
        Self {
            incoherent_interactions: false,
            majorana: true,
            decay_regeneration: true,
            tau_regeneration: false,
            include_oscillations: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_converts_km() {
        let u = Units::natural();
        let g = Geometry::ConstantDensity {
            density: 5.0,
            ye: 0.3,
            baseline_km: 0.47,
        };
        assert!((g.baseline(&u).unwrap() - 0.47 * u.km).abs() < 1e-3);
        assert_eq!(Geometry::upgoing().baseline(&u), None);
    }

    #[test]
    fn geometry_json_is_tagged() {
        let g = Geometry::Vacuum { baseline_km: 12000.0 };
        let json = serde_json::to_string(&g).unwrap();
        assert!(json.contains("\"kind\":\"vacuum\""), "{json}");
        let back: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn tolerance_sets_both_errors() {
        let s = IntegrationSettings::with_tolerance(1e-15);
        assert_eq!(s.rel_error, 1e-15);
        assert_eq!(s.abs_error, 1e-15);
        assert_eq!(s.stepper, Stepper::Rkf45);
    }

    #[test]
    fn default_switches() {
        let s = PhysicsSwitches::default();
        assert!(s.majorana && s.decay_regeneration && s.include_oscillations);
        assert!(!s.incoherent_interactions && !s.tau_regeneration);
    }
}
