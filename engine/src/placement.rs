//! Finish-position probabilities under the Independent Chip Model
//!
//! A forward pass from the full remaining-set: every mask carries the
//! probability of being reached, and the player chosen to take the next open
//! place is credited with that place.

use log::debug;

use crate::error::IcmResult;
use crate::evaluator::{validate_chips, DEFAULT_MAX_PLAYERS};
use crate::subset;

/// `p[j][pos]`: probability that player `j` finishes in position `pos`
/// (0 = champion). Each row and each column sums to 1.
pub fn finish_distribution(chips: &[f64]) -> IcmResult<Vec<Vec<f64>>> {
    finish_distribution_capped(chips, DEFAULT_MAX_PLAYERS)
}

/// [`finish_distribution`] with an explicit player cap
pub fn finish_distribution_capped(chips: &[f64], max_players: usize) -> IcmResult<Vec<Vec<f64>>> {
    validate_chips(chips, max_players)?;
    let n = chips.len();
    debug!("placements: {} players, {} masks", n, subset::count(n));

    let mut reach = vec![0.0_f64; subset::count(n)];
    let mut dist = vec![vec![0.0_f64; n]; n];
    let full = subset::full(n);
    reach[full as usize] = 1.0;

    // Descending: every successor mask is smaller than its predecessor
    for mask in (1..=full).rev() {
        let here = reach[mask as usize];
        if here == 0.0 {
            continue;
        }
        let total = subset::stack_total(mask, chips);
        let pos = n - mask.count_ones() as usize;
        for i in subset::members(mask) {
            let p = here * chips[i] / total;
            dist[i][pos] += p;
            reach[subset::without(mask, i) as usize] += p;
        }
    }
    Ok(dist)
}

/// Expected payout from a finish distribution: `Σ_pos p[j][pos] · payouts[pos]`
pub fn expected_payouts(dist: &[Vec<f64>], payouts: &[f64]) -> Vec<f64> {
    dist.iter()
        .map(|row| row.iter().zip(payouts).map(|(p, pay)| p * pay).sum::<f64>())
        .collect()
}

/// Probability of finishing at `pos` or better, per player
pub fn cumulative(dist: &[Vec<f64>], pos: usize) -> Vec<f64> {
    dist.iter()
        .map(|row| row.iter().take(pos + 1).sum::<f64>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IcmError;
    use crate::evaluator::{evaluate, synthetic_field};

    #[test]
    fn test_rows_and_columns_sum_to_one() {
        let (chips, _) = synthetic_field(6, 3);
        let dist = finish_distribution(&chips).unwrap();
        for (j, row) in dist.iter().enumerate() {
            let s: f64 = row.iter().sum();
            assert!((s - 1.0).abs() < 1e-12, "row {} sums to {}", j, s);
        }
        for pos in 0..chips.len() {
            let s: f64 = dist.iter().map(|row| row[pos]).sum();
            assert!((s - 1.0).abs() < 1e-12, "column {} sums to {}", pos, s);
        }
    }

    #[test]
    fn test_win_probability_is_chip_share() {
        let chips = [7000.0, 20000.0, 8000.0];
        let dist = finish_distribution(&chips).unwrap();
        for (j, &c) in chips.iter().enumerate() {
            assert!((dist[j][0] - c / 35000.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_reproduces_evaluator() {
        let (chips, payouts) = synthetic_field(8, 11);
        let dist = finish_distribution(&chips).unwrap();
        let from_dist = expected_payouts(&dist, &payouts);
        let direct = evaluate(&chips, &payouts).unwrap();
        for (a, b) in from_dist.iter().zip(direct.iter()) {
            assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_cumulative_reaches_one() {
        let dist = finish_distribution(&[1.0, 2.0, 3.0]).unwrap();
        let top2 = cumulative(&dist, 1);
        assert!(top2.iter().all(|&p| p > 0.0 && p < 1.0));
        assert!(cumulative(&dist, 2).iter().all(|&p| (p - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_single_player_always_wins() {
        assert_eq!(finish_distribution(&[10.0]).unwrap(), vec![vec![1.0]]);
    }

    #[test]
    fn test_rejects_invalid_stacks() {
        assert_eq!(finish_distribution(&[]).unwrap_err(), IcmError::NoPlayers);
        assert_eq!(
            finish_distribution(&[1.0, 0.0]).unwrap_err(),
            IcmError::InvalidChips { player: 1, chips: 0.0 }
        );
        assert_eq!(
            finish_distribution_capped(&[1.0, 2.0, 3.0], 2).unwrap_err(),
            IcmError::TooManyPlayers { players: 3, max: 2 }
        );
    }

    #[test]
    fn test_rejects_overflowing_chip_total() {
        assert_eq!(
            finish_distribution(&[1e308, 1e308]).unwrap_err(),
            IcmError::ChipTotalOverflow { player: 1 }
        );
        let dist = finish_distribution(&[1e307, 3e307]).unwrap();
        assert!((dist[0][0] - 0.25).abs() < 1e-12);
        assert!((dist[1][0] - 0.75).abs() < 1e-12);
    }
}
