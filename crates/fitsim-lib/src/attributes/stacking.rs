//! Stacking penalties.
//!
//! Penalised modifiers on one attribute are split by direction (boosts and
//! reductions), each direction is sorted strongest first, and the n-th entry
//! (0-based) keeps only `exp(-(n / STACKING_PENALTY_SPREAD)^2)` of its
//! strength. The sort is on magnitude alone, so the result never depends on
//! the order modifiers were issued in.

use std::cmp::Ordering;

use crate::constants::STACKING_PENALTY_SPREAD;

/// Fraction of its strength the modifier at `rank` keeps.
pub fn penalty_factor(rank: usize) -> f64 {
    let scaled = rank as f64 / STACKING_PENALTY_SPREAD;
    (-(scaled * scaled)).exp()
}

fn strongest_first(a: &f64, b: &f64) -> Ordering {
    b.abs().total_cmp(&a.abs()).then_with(|| a.total_cmp(b))
}

/// Penalised strengths of additive-style modifiers, strongest first within
/// each direction (boosts, then reductions).
pub fn effective_magnitudes(values: &[f64]) -> Vec<f64> {
    let (mut boosts, mut reductions): (Vec<f64>, Vec<f64>) = values
        .iter()
        .copied()
        .filter(|value| *value != 0.0)
        .partition(|value| *value > 0.0);
    boosts.sort_by(strongest_first);
    reductions.sort_by(strongest_first);

    boosts
        .iter()
        .enumerate()
        .chain(reductions.iter().enumerate())
        .map(|(rank, value)| value * penalty_factor(rank))
        .collect()
}

/// Sum of penalised additive modifiers.
pub fn penalized_sum(values: &[f64]) -> f64 {
    effective_magnitudes(values).iter().sum()
}

/// Product of penalised multipliers.
///
/// Each multiplier is penalised on its deviation from 1; boosts (`> 1`) and
/// reductions (`< 1`) form separate groups.
pub fn penalized_product(multipliers: &[f64]) -> f64 {
    let deviations: Vec<f64> = multipliers.iter().map(|m| m - 1.0).collect();
    effective_magnitudes(&deviations)
        .iter()
        .fold(1.0, |product, deviation| product * (1.0 + deviation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_modifier_is_unpenalised() {
        assert_eq!(penalty_factor(0), 1.0);
        assert!((penalty_factor(1) - 0.869_119).abs() < 1e-6);
        assert!((penalty_factor(2) - 0.570_583).abs() < 1e-6);
        assert!(penalty_factor(5) < 0.05);
    }

    #[test]
    fn factors_decrease_with_rank() {
        let factors: Vec<f64> = (0..8).map(penalty_factor).collect();
        assert!(factors.windows(2).all(|pair| pair[1] < pair[0]));
    }

    #[test]
    fn equal_modifiers_sum_sub_linearly_and_increase() {
        let magnitude = 10.0;
        let mut previous = 0.0;
        for count in 1..=8 {
            let total = penalized_sum(&vec![magnitude; count]);
            if count > 1 {
                assert!(total < magnitude * count as f64, "n={count}: {total}");
            }
            assert!(total > previous, "n={count}: {total} <= {previous}");
            previous = total;
        }
    }

    #[test]
    fn directions_are_penalised_independently() {
        let mixed = penalized_product(&[1.5, 0.5]);
        assert!((mixed - 0.75).abs() < 1e-12);
    }

    #[test]
    fn strongest_modifier_applies_in_full_regardless_of_order() {
        let a = penalized_product(&[1.1, 1.3, 1.2]);
        let b = penalized_product(&[1.3, 1.2, 1.1]);
        assert_eq!(a.to_bits(), b.to_bits());
        let expected = 1.3 * (1.0 + 0.2 * penalty_factor(1)) * (1.0 + 0.1 * penalty_factor(2));
        assert!((a - expected).abs() < 1e-12);
    }

    #[test]
    fn identity_multipliers_are_ignored() {
        assert_eq!(penalized_product(&[1.0, 1.0, 1.25]), 1.25);
        assert_eq!(penalized_product(&[]), 1.0);
    }
}
