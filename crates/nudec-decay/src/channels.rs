//! The four decay process classes and their lifetime / rate matrices.
//!
//! A run carries one lifetime matrix per process class: chirality-preserving
//! (CPP) and chirality-violating (CVP) decays, each for a scalar and a
//! pseudoscalar coupling. Each matrix is turned into rates independently and
//! the results are paired per coupling type for the engine.

use std::fmt;

use nudec_core::error::RateError;
use nudec_core::types::{DecayRateMatrix, LifetimeMatrix, MassVector};
use serde::{Deserialize, Serialize};

use crate::builder::build_decay_rate_matrix;

/// One decay process class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessClass {
    CppScalar,
    CvpScalar,
    CppPseudoscalar,
    CvpPseudoscalar,
}

impl ProcessClass {
    /// All classes, in the order they are built.
    pub const ALL: [ProcessClass; 4] = [
        Self::CppScalar,
        Self::CvpScalar,
        Self::CppPseudoscalar,
        Self::CvpPseudoscalar,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::CppScalar => "cpp_scalar",
            Self::CvpScalar => "cvp_scalar",
            Self::CppPseudoscalar => "cpp_pseudoscalar",
            Self::CvpPseudoscalar => "cvp_pseudoscalar",
        }
    }
}

impl fmt::Display for ProcessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifetime matrices for all four process classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelLifetimes {
    pub cpp_scalar: LifetimeMatrix,
    pub cvp_scalar: LifetimeMatrix,
    pub cpp_pseudoscalar: LifetimeMatrix,
    pub cvp_pseudoscalar: LifetimeMatrix,
}

impl ChannelLifetimes {
    /// Every channel of every class closed.
    pub fn stable(size: usize) -> Self {
        Self {
            cpp_scalar: LifetimeMatrix::stable(size),
            cvp_scalar: LifetimeMatrix::stable(size),
            cpp_pseudoscalar: LifetimeMatrix::stable(size),
            cvp_pseudoscalar: LifetimeMatrix::stable(size),
        }
    }

    /// The heaviest state decays into every lighter one with `lifetime`, in
    /// every class; all other channels closed.
    pub fn heaviest_unstable(size: usize, lifetime: f64) -> Result<Self, RateError> {
        let mut lifetimes = Self::stable(size);
        if let Some(heaviest) = size.checked_sub(1) {
            for lighter in 0..heaviest {
                lifetimes.set_channel_all(lighter, heaviest, lifetime)?;
            }
        }
        Ok(lifetimes)
    }

    pub fn get(&self, class: ProcessClass) -> &LifetimeMatrix {
        match class {
            ProcessClass::CppScalar => &self.cpp_scalar,
            ProcessClass::CvpScalar => &self.cvp_scalar,
            ProcessClass::CppPseudoscalar => &self.cpp_pseudoscalar,
            ProcessClass::CvpPseudoscalar => &self.cvp_pseudoscalar,
        }
    }

    pub fn get_mut(&mut self, class: ProcessClass) -> &mut LifetimeMatrix {
        match class {
            ProcessClass::CppScalar => &mut self.cpp_scalar,
            ProcessClass::CvpScalar => &mut self.cvp_scalar,
            ProcessClass::CppPseudoscalar => &mut self.cpp_pseudoscalar,
            ProcessClass::CvpPseudoscalar => &mut self.cvp_pseudoscalar,
        }
    }

    /// Open `heavier -> lighter` with the same lifetime in all four classes.
    pub fn set_channel_all(&mut self, lighter: usize, heavier: usize, lifetime: f64) -> Result<(), RateError> {
        for class in ProcessClass::ALL {
            self.get_mut(class).set_channel(lighter, heavier, lifetime)?;
        }
        Ok(())
    }

    /// Build the rate matrix of every class.
    pub fn build(&self, masses: &MassVector) -> Result<DecayRates, RateError> {
        Ok(DecayRates {
            scalar: RatePair {
                cpp: build_decay_rate_matrix(&self.cpp_scalar, masses)?,
                cvp: build_decay_rate_matrix(&self.cvp_scalar, masses)?,
            },
            pseudoscalar: RatePair {
                cpp: build_decay_rate_matrix(&self.cpp_pseudoscalar, masses)?,
                cvp: build_decay_rate_matrix(&self.cvp_pseudoscalar, masses)?,
            },
        })
    }
}

/// Chirality-preserving and chirality-violating rates for one coupling type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePair {
    pub cpp: DecayRateMatrix,
    pub cvp: DecayRateMatrix,
}

/// Rate matrices for all four process classes, paired by coupling type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayRates {
    pub scalar: RatePair,
    pub pseudoscalar: RatePair,
}

impl DecayRates {
    pub fn get(&self, class: ProcessClass) -> &DecayRateMatrix {
        match class {
            ProcessClass::CppScalar => &self.scalar.cpp,
            ProcessClass::CvpScalar => &self.scalar.cvp,
            ProcessClass::CppPseudoscalar => &self.pseudoscalar.cpp,
            ProcessClass::CvpPseudoscalar => &self.pseudoscalar.cvp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudec_core::constants::STABLE_LIFETIME;

    fn masses() -> MassVector {
        MassVector::new(vec![0.0, 0.00875, 0.04899, 1.0]).unwrap()
    }

    #[test]
    fn stable_set_has_four_stable_matrices() {
        let c = ChannelLifetimes::stable(4);
        for class in ProcessClass::ALL {
            assert_eq!(c.get(class), &LifetimeMatrix::stable(4), "{class}");
        }
    }

    #[test]
    fn heaviest_unstable_opens_only_top_column() {
        let c = ChannelLifetimes::heaviest_unstable(4, 100.0).unwrap();
        for class in ProcessClass::ALL {
            let t = c.get(class);
            assert_eq!(t.get(0, 3), Some(100.0));
            assert_eq!(t.get(1, 3), Some(100.0));
            assert_eq!(t.get(2, 3), Some(100.0));
            assert_eq!(t.get(0, 1), Some(STABLE_LIFETIME));
            assert_eq!(t.get(1, 2), Some(STABLE_LIFETIME));
        }
    }

    #[test]
    fn build_pairs_classes_by_coupling() {
        let mut c = ChannelLifetimes::heaviest_unstable(4, 100.0).unwrap();
        c.get_mut(ProcessClass::CvpPseudoscalar).set_channel(2, 3, 50.0).unwrap();
        let rates = c.build(&masses()).unwrap();
        assert_eq!(rates.scalar.cpp[(2, 3)], 0.01);
        assert_eq!(rates.scalar.cvp[(2, 3)], 0.01);
        assert_eq!(rates.pseudoscalar.cpp[(2, 3)], 0.01);
        assert_eq!(rates.pseudoscalar.cvp[(2, 3)], 0.02);
        assert_eq!(rates.get(ProcessClass::CvpPseudoscalar), &rates.pseudoscalar.cvp);
    }

    #[test]
    fn build_classes_independently() {
        let c = ChannelLifetimes::heaviest_unstable(4, 100.0).unwrap();
        let rates = c.build(&masses()).unwrap();
        for class in ProcessClass::ALL {
            let single = build_decay_rate_matrix(c.get(class), &masses()).unwrap();
            assert_eq!(rates.get(class), &single, "{class}");
        }
    }

    #[test]
    fn build_fails_on_any_invalid_class() {
        let mut c = ChannelLifetimes::heaviest_unstable(4, 100.0).unwrap();
        c.get_mut(ProcessClass::CppPseudoscalar).set_channel(0, 3, 0.0).unwrap();
        let err = c.build(&masses()).unwrap_err();
        assert_eq!(err, RateError::InvalidLifetime { row: 0, col: 3, value: 0.0 });
    }

    #[test]
    fn set_channel_all_rejects_upward_decay() {
        let mut c = ChannelLifetimes::stable(4);
        assert!(c.set_channel_all(3, 1, 10.0).is_err());
    }

    #[test]
    fn labels_are_snake_case() {
        assert_eq!(ProcessClass::CppPseudoscalar.to_string(), "cpp_pseudoscalar");
        let json = serde_json::to_string(&ProcessClass::CvpScalar).unwrap();
        assert_eq!(json, "\"cvp_scalar\"");
    }
}
