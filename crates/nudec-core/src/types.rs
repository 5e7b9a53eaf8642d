//! Shared value types: matrices, mass vectors, energy grids, and flux states.
//!
//! All matrices are owned, row-major `Vec<f64>` buffers indexed by
//! `(row, col)`. Nothing here allocates outside its own value.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::constants::STABLE_LIFETIME;
use crate::error::{MassError, RateError};

// --- SquareMatrix ---

/// Dense N×N matrix of `f64`, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareMatrix {
    size: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    /// An N×N matrix of zeros.
    pub fn zeros(size: usize) -> Self {
        Self::filled(size, 0.0)
    }

    /// An N×N matrix with every entry set to `value`.
    pub fn filled(size: usize, value: f64) -> Self {
        Self {
            size,
            data: vec![value; size * size],
        }
    }

    /// Side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.size && col < self.size {
            Some(self.data[row * self.size + col])
        } else {
            None
        }
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics; an empty matrix has no rows anyway.
        self.data.chunks(self.size.max(1))
    }

    /// Row-major backing storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize)> for SquareMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(row < self.size && col < self.size, "index ({row},{col}) out of bounds for {0}x{0}", self.size);
        &self.data[row * self.size + col]
    }
}

impl IndexMut<(usize, usize)> for SquareMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(row < self.size && col < self.size, "index ({row},{col}) out of bounds for {0}x{0}", self.size);
        &mut self.data[row * self.size + col]
    }
}

// --- MassVector ---

/// Neutrino masses in eV, ordered by mass-eigenstate index (lightest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct MassVector(Vec<f64>);

impl MassVector {
    /// Validate and wrap a list of masses.
    ///
    /// Every mass must be finite and non-negative.
    pub fn new(masses: Vec<f64>) -> Result<Self, MassError> {
        if masses.is_empty() {
            return Err(MassError::Empty);
        }
        for (index, &value) in masses.iter().enumerate() {
            if !value.is_finite() {
                return Err(MassError::NonFinite { index });
            }
            if value < 0.0 {
                return Err(MassError::Negative { index, value });
            }
        }
        Ok(Self(masses))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Mass-squared splitting `m_k² - m_0²`.
    pub fn square_mass_difference(&self, k: usize) -> Option<f64> {
        let m0 = *self.0.first()?;
        let mk = *self.0.get(k)?;
        Some(mk * mk - m0 * m0)
    }
}

impl Index<usize> for MassVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl TryFrom<Vec<f64>> for MassVector {
    type Error = MassError;

    fn try_from(masses: Vec<f64>) -> Result<Self, MassError> {
        Self::new(masses)
    }
}

impl From<MassVector> for Vec<f64> {
    fn from(m: MassVector) -> Self {
        m.0
    }
}

// --- decay matrices ---

/// Mean lifetimes per decay channel.
///
/// Entry `(lighter, heavier)` with `lighter < heavier` is the lifetime of the
/// decay `heavier -> lighter`. Every entry starts at [`STABLE_LIFETIME`];
/// entries on or below the diagonal are never read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifetimeMatrix(SquareMatrix);

impl LifetimeMatrix {
    /// All channels closed.
    pub fn stable(size: usize) -> Self {
        Self(SquareMatrix::filled(size, STABLE_LIFETIME))
    }

    /// Open the channel `heavier -> lighter` with the given lifetime.
    ///
    /// Only the channel indices are checked here; the lifetime value itself
    /// is validated when rates are built.
    pub fn set_channel(&mut self, lighter: usize, heavier: usize, lifetime: f64) -> Result<(), RateError> {
        let size = self.0.size();
        if lighter >= heavier || heavier >= size {
            return Err(RateError::InvalidChannel { lighter, heavier, size });
        }
        self.0[(lighter, heavier)] = lifetime;
        Ok(())
    }

    /// Builder-style variant of [`set_channel`](Self::set_channel).
    pub fn with_channel(mut self, lighter: usize, heavier: usize, lifetime: f64) -> Result<Self, RateError> {
        self.set_channel(lighter, heavier, lifetime)?;
        Ok(self)
    }

    /// Overwrite an arbitrary entry, including unused ones.
    pub fn set_raw(&mut self, row: usize, col: usize, value: f64) {
        self.0[(row, col)] = value;
    }

    pub fn size(&self) -> usize {
        self.0.size()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.0.get(row, col)
    }

    pub fn as_matrix(&self) -> &SquareMatrix {
        &self.0
    }
}

/// Decay rates between mass states plus the mass-weighted total on the diagonal.
///
/// Produced by the rate builder in `nudec-decay` and consumed by an
/// [`EvolutionEngine`](crate::traits::EvolutionEngine). Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayRateMatrix(SquareMatrix);

impl DecayRateMatrix {
    /// Wrap an already computed rate matrix.
    pub fn from_matrix(matrix: SquareMatrix) -> Self {
        Self(matrix)
    }

    pub fn size(&self) -> usize {
        self.0.size()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.0.get(row, col)
    }

    /// Total mass-weighted decay rate out of state `state`.
    pub fn total_rate(&self, state: usize) -> Option<f64> {
        self.0.get(state, state)
    }

    pub fn as_matrix(&self) -> &SquareMatrix {
        &self.0
    }
}

impl Index<(usize, usize)> for DecayRateMatrix {
    type Output = f64;

    fn index(&self, idx: (usize, usize)) -> &f64 {
        &self.0[idx]
    }
}

/// Lagrangian couplings g_ij between mass states.
///
/// When an engine receives couplings instead of rate matrices it derives
/// the partial rates itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplingMatrix(SquareMatrix);

impl CouplingMatrix {
    pub fn zeros(size: usize) -> Self {
        Self(SquareMatrix::zeros(size))
    }

    /// Set g_{heavier, lighter}.
    pub fn set(&mut self, heavier: usize, lighter: usize, coupling: f64) -> Result<(), RateError> {
        let size = self.0.size();
        if lighter >= heavier || heavier >= size {
            return Err(RateError::InvalidChannel { lighter, heavier, size });
        }
        self.0[(heavier, lighter)] = coupling;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.0.size()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.0.get(row, col)
    }

    pub fn as_matrix(&self) -> &SquareMatrix {
        &self.0
    }
}

// --- energy grid ---

/// Energy nodes in natural units (eV), strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyNodes(Vec<f64>);

impl EnergyNodes {
    /// `count` evenly spaced nodes from `min` to `max` inclusive.
    pub fn linspace(min: f64, max: f64, count: usize) -> Self {
        match count {
            0 => Self(Vec::new()),
            1 => Self(vec![min]),
            _ => {
                let step = (max - min) / (count - 1) as f64;
                Self((0..count).map(|i| min + step * i as f64).collect())
            }
        }
    }

    /// `count` logarithmically spaced nodes from `min` to `max` inclusive.
    pub fn logspace(min: f64, max: f64, count: usize) -> Self {
        match count {
            0 => Self(Vec::new()),
            1 => Self(vec![min]),
            _ => {
                let (lo, hi) = (min.log10(), max.log10());
                let step = (hi - lo) / (count - 1) as f64;
                Self((0..count).map(|i| 10f64.powf(lo + step * i as f64)).collect())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl Index<usize> for EnergyNodes {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

// --- particle selection ---

/// Neutrino or antineutrino component of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Particle {
    Neutrino,
    Antineutrino,
}

/// Which particle components a simulation carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NeutrinoType {
    Neutrino,
    Antineutrino,
    #[default]
    Both,
}

impl NeutrinoType {
    /// Length of the particle axis of a [`FlavorState`].
    pub fn count(self) -> usize {
        match self {
            Self::Both => 2,
            _ => 1,
        }
    }

    /// Components in state order.
    pub fn particles(self) -> &'static [Particle] {
        match self {
            Self::Neutrino => &[Particle::Neutrino],
            Self::Antineutrino => &[Particle::Antineutrino],
            Self::Both => &[Particle::Neutrino, Particle::Antineutrino],
        }
    }

    /// Index of `particle` on the state's particle axis, if carried.
    pub fn slot(self, particle: Particle) -> Option<usize> {
        self.particles().iter().position(|p| *p == particle)
    }
}

/// Basis an initial state is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Basis {
    #[default]
    Flavor,
    Mass,
}

// --- flavor state ---

/// Flux content indexed `[energy][particle][flavor]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlavorState {
    shape: (usize, usize, usize),
    data: Vec<f64>,
}

impl FlavorState {
    /// A zeroed state of `energies × particles × flavors`.
    pub fn zeros(energies: usize, particles: usize, flavors: usize) -> Self {
        Self {
            shape: (energies, particles, flavors),
            data: vec![0.0; energies * particles * flavors],
        }
    }

    /// `(energies, particles, flavors)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.shape
    }

    pub fn get(&self, energy: usize, particle: usize, flavor: usize) -> Option<f64> {
        let (ne, np, nf) = self.shape;
        if energy < ne && particle < np && flavor < nf {
            Some(self.data[(energy * np + particle) * nf + flavor])
        } else {
            None
        }
    }

    /// Set every entry from a function of its indices.
    pub fn fill_with(&mut self, mut f: impl FnMut(usize, usize, usize) -> f64) {
        let (ne, np, nf) = self.shape;
        for e in 0..ne {
            for p in 0..np {
                for fl in 0..nf {
                    self.data[(e * np + p) * nf + fl] = f(e, p, fl);
                }
            }
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize, usize)> for FlavorState {
    type Output = f64;

    fn index(&self, (e, p, f): (usize, usize, usize)) -> &f64 {
        let (ne, np, nf) = self.shape;
        assert!(e < ne && p < np && f < nf, "index ({e},{p},{f}) out of bounds for {:?}", self.shape);
        &self.data[(e * np + p) * nf + f]
    }
}

impl IndexMut<(usize, usize, usize)> for FlavorState {
    fn index_mut(&mut self, (e, p, f): (usize, usize, usize)) -> &mut f64 {
        let (ne, np, nf) = self.shape;
        assert!(e < ne && p < np && f < nf, "index ({e},{p},{f}) out of bounds for {:?}", self.shape);
        &mut self.data[(e * np + p) * nf + f]
    }
}
