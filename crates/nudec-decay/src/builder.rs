//! Decay-rate matrix construction from channel lifetimes.
//!
//! Decay only runs from a higher mass-state index to a lower one. For every
//! column `col` the builder writes `1 / lifetime[row][col]` for each lighter
//! `row < col`, and places the mass-weighted sum of those rates on the
//! diagonal. Entries below the diagonal are never written and stay zero;
//! lifetime entries on or below the diagonal are never read.

use nudec_core::error::RateError;
use nudec_core::types::{DecayRateMatrix, LifetimeMatrix, MassVector, SquareMatrix};
use tracing::debug;

/// Build the decay-rate matrix for one process class.
///
/// Off-diagonal `[row][col]` (`row < col`) is the rate `col -> row`; the
/// diagonal `[col][col]` is `Σ_{row<col} rate[row][col] * masses[col]`.
/// Closed channels carry [`STABLE_LIFETIME`](nudec_core::constants::STABLE_LIFETIME)
/// and come out as negligible, not zero, rates.
///
/// # Errors
///
/// [`RateError::DimensionMismatch`] if the matrix size differs from the number
/// of masses, and [`RateError::InvalidLifetime`] if any lifetime above the
/// diagonal is zero, negative, NaN, or infinite.
///
/// # Examples
///
/// ```
/// use nudec_core::types::{LifetimeMatrix, MassVector};
/// use nudec_decay::build_decay_rate_matrix;
///
/// let masses = MassVector::new(vec![0.0, 1.0]).unwrap();
/// let tau = LifetimeMatrix::stable(2).with_channel(0, 1, 10.0).unwrap();
/// let rates = build_decay_rate_matrix(&tau, &masses).unwrap();
/// assert_eq!(rates[(0, 1)], 0.1);
/// assert_eq!(rates[(1, 1)], 0.1);
/// assert_eq!(rates[(0, 0)], 0.0);
/// ```
pub fn build_decay_rate_matrix(
    lifetimes: &LifetimeMatrix,
    masses: &MassVector,
) -> Result<DecayRateMatrix, RateError> {
    let n = masses.len();
    if lifetimes.size() != n {
        return Err(RateError::DimensionMismatch {
            lifetimes: lifetimes.size(),
            masses: n,
        });
    }

    let tau = lifetimes.as_matrix();
    let mut rates = SquareMatrix::zeros(n);

    for col in 0..n {
        let mut colrate = 0.0;

        for row in 0..col {
            let lifetime = tau[(row, col)];
            if !(lifetime > 0.0 && lifetime.is_finite()) {
                return Err(RateError::InvalidLifetime {
                    row,
                    col,
                    value: lifetime,
                });
            }
            let rate = 1.0 / lifetime;
            rates[(row, col)] = rate;
            colrate += rate * masses[col];
        }

        rates[(col, col)] = colrate;
    }

    let rates = DecayRateMatrix::from_matrix(rates);
    debug!(
        states = n,
        heaviest_total_rate = ?n.checked_sub(1).and_then(|k| rates.total_rate(k)),
        "built decay-rate matrix"
    );

    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudec_core::constants::STABLE_LIFETIME;
    use nudec_core::error::ErrorKind;
    use proptest::prelude::*;

    fn masses(v: &[f64]) -> MassVector {
        MassVector::new(v.to_vec()).unwrap()
    }

    /// Four states, only the heaviest decaying into each lighter one.
    fn sterile_scenario() -> (LifetimeMatrix, MassVector) {
        let mut tau = LifetimeMatrix::stable(4);
        tau.set_channel(0, 3, 100.0).unwrap();
        tau.set_channel(1, 3, 100.0).unwrap();
        tau.set_channel(2, 3, 100.0).unwrap();
        (tau, masses(&[0.0, 0.00875, 0.04899, 1.0]))
    }

    // --- concrete scenarios ---

    #[test]
    fn sterile_decay_rates() {
        let (tau, m) = sterile_scenario();
        let r = build_decay_rate_matrix(&tau, &m).unwrap();
        assert_eq!(r[(0, 3)], 0.01);
        assert_eq!(r[(1, 3)], 0.01);
        assert_eq!(r[(2, 3)], 0.01);
        assert!((r[(3, 3)] - 0.03).abs() < 1e-15, "diag = {}", r[(3, 3)]);
    }

    #[test]
    fn closed_channels_are_negligible_not_special_cased() {
        let (tau, m) = sterile_scenario();
        let r = build_decay_rate_matrix(&tau, &m).unwrap();
        let tiny = 1.0 / STABLE_LIFETIME;
        assert_eq!(r[(0, 1)], tiny);
        assert_eq!(r[(0, 2)], tiny);
        assert_eq!(r[(1, 2)], tiny);
        // Diagonals of the light states pick up the negligible rates times their mass.
        assert_eq!(r[(1, 1)], tiny * 0.00875);
        assert!(r[(2, 2)] < 1e-60);
    }

    #[test]
    fn lightest_state_has_zero_total_rate() {
        let (tau, m) = sterile_scenario();
        let r = build_decay_rate_matrix(&tau, &m).unwrap();
        assert_eq!(r[(0, 0)], 0.0);
        assert_eq!(r.total_rate(0), Some(0.0));
        assert_eq!(r.total_rate(3), Some(r[(3, 3)]));
        assert_eq!(r.total_rate(4), None);
    }

    #[test]
    fn lower_triangle_is_zero() {
        let (tau, m) = sterile_scenario();
        let r = build_decay_rate_matrix(&tau, &m).unwrap();
        for row in 0..4 {
            for col in 0..row {
                assert_eq!(r[(row, col)], 0.0, "({row},{col})");
            }
        }
    }

    #[test]
    fn lower_triangle_lifetimes_are_ignored() {
        let (mut tau, m) = sterile_scenario();
        let before = build_decay_rate_matrix(&tau, &m).unwrap();
        tau.set_raw(3, 0, 0.0);
        tau.set_raw(2, 1, -5.0);
        tau.set_raw(1, 1, f64::NAN);
        let after = build_decay_rate_matrix(&tau, &m).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn single_state_has_no_channel() {
        let r = build_decay_rate_matrix(&LifetimeMatrix::stable(1), &masses(&[0.3])).unwrap();
        assert_eq!(r.size(), 1);
        assert_eq!(r[(0, 0)], 0.0);
    }

    #[test]
    fn diagonal_weighted_by_parent_mass() {
        let tau = LifetimeMatrix::stable(3)
            .with_channel(0, 2, 4.0)
            .unwrap()
            .with_channel(1, 2, 2.0)
            .unwrap();
        let r = build_decay_rate_matrix(&tau, &masses(&[0.0, 0.0, 2.0])).unwrap();
        assert_eq!(r[(2, 2)], (0.25 + 0.5) * 2.0);
    }

    // --- errors ---

    #[test]
    fn zero_lifetime_is_invalid_argument() {
        let (mut tau, m) = sterile_scenario();
        tau.set_channel(0, 3, 0.0).unwrap();
        let err = build_decay_rate_matrix(&tau, &m).unwrap_err();
        assert_eq!(err, RateError::InvalidLifetime { row: 0, col: 3, value: 0.0 });
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn negative_and_non_finite_lifetimes_rejected() {
        for bad in [-1.0, f64::INFINITY, f64::NAN] {
            let tau = LifetimeMatrix::stable(2).with_channel(0, 1, bad).unwrap();
            let err = build_decay_rate_matrix(&tau, &masses(&[0.0, 1.0])).unwrap_err();
            assert!(matches!(err, RateError::InvalidLifetime { row: 0, col: 1, .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn dimension_mismatch_is_invalid_argument() {
        let err = build_decay_rate_matrix(&LifetimeMatrix::stable(4), &masses(&[0.0, 1.0, 2.0]))
            .unwrap_err();
        assert_eq!(err, RateError::DimensionMismatch { lifetimes: 4, masses: 3 });
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    // --- proptest ---

    /// Masses in increasing order and a lifetime matrix with random open channels.
    fn arb_inputs() -> impl Strategy<Value = (LifetimeMatrix, MassVector)> {
        (1usize..7).prop_flat_map(|n| {
            (
                prop::collection::vec(0.0f64..10.0, n),
                prop::collection::vec(prop::option::of(1e-3f64..1e6), n * n),
            )
                .prop_map(move |(mut m, lifetimes)| {
                    m.sort_by(|a, b| a.total_cmp(b));
                    let mut tau = LifetimeMatrix::stable(n);
                    for row in 0..n {
                        for col in (row + 1)..n {
                            if let Some(t) = lifetimes[row * n + col] {
                                tau.set_channel(row, col, t).unwrap();
                            }
                        }
                    }
                    (tau, MassVector::new(m).unwrap())
                })
        })
    }

    proptest! {
        #[test]
        fn first_diagonal_always_zero((tau, m) in arb_inputs()) {
            let r = build_decay_rate_matrix(&tau, &m).unwrap();
            prop_assert_eq!(r[(0, 0)], 0.0);
        }

        #[test]
        fn diagonal_is_mass_weighted_column_sum((tau, m) in arb_inputs()) {
            let r = build_decay_rate_matrix(&tau, &m).unwrap();
            for col in 0..m.len() {
                let expected: f64 = (0..col)
                    .map(|row| (1.0 / tau.get(row, col).unwrap()) * m[col])
                    .sum();
                let got = r[(col, col)];
                prop_assert!(
                    (got - expected).abs() <= 1e-12 * expected.abs().max(1.0),
                    "col {}: {} vs {}", col, got, expected
                );
            }
        }

        #[test]
        fn strictly_lower_entries_zero((tau, m) in arb_inputs()) {
            let r = build_decay_rate_matrix(&tau, &m).unwrap();
            for row in 0..m.len() {
                for col in 0..row {
                    prop_assert_eq!(r[(row, col)], 0.0);
                }
            }
        }

        #[test]
        fn all_entries_non_negative((tau, m) in arb_inputs()) {
            let r = build_decay_rate_matrix(&tau, &m).unwrap();
            prop_assert!(r.as_matrix().as_slice().iter().all(|&v| v >= 0.0));
        }

        #[test]
        fn deterministic((tau, m) in arb_inputs()) {
            let a = build_decay_rate_matrix(&tau, &m).unwrap();
            let b = build_decay_rate_matrix(&tau, &m).unwrap();
            let bits_a: Vec<u64> = a.as_matrix().as_slice().iter().map(|v| v.to_bits()).collect();
            let bits_b: Vec<u64> = b.as_matrix().as_slice().iter().map(|v| v.to_bits()).collect();
            prop_assert_eq!(bits_a, bits_b);
        }
    }
}
