//! ICM evaluator: expected tournament payouts from chip stacks
//!
//! Each remaining player takes the best open place with probability equal to
//! their share of the remaining chips. The expectation is filled bottom-up
//! over remaining-set masks:
//!
//! ```text
//! V(R, pos)[j] = Σ_{i∈R} c_i / S(R) · ([i = j]·payout[pos] + V(R∖{i}, pos+1)[j])
//! ```
//!
//! with `V(∅, ·) = 0`. The answer is `V(all players, 0)`.

use std::time::Instant;

use log::{debug, trace};
use rayon::prelude::*;

use crate::error::{IcmError, IcmResult};
use crate::subset::{self, Mask};
use crate::table::EvTable;

/// Player cap used by `IcmEvaluator::default()`
pub const DEFAULT_MAX_PLAYERS: usize = 16;

/// Hard ceiling on any configured cap. The table at 18 players is
/// `2^18 · 19 · 18` values (about 720 MB).
pub const MAX_PLAYERS: usize = 18;

/// Converts stacks and a payout schedule into per-player expected payouts
pub trait PayoutModel {
    /// Expected payout per player, in the same order as `chips`
    fn equity(&self, chips: &[f64], payouts: &[f64]) -> IcmResult<Vec<f64>>;
}

/// Exact Independent Chip Model evaluator
///
/// Memory and time grow as `2^n · n²`, so the player count is capped.
/// With `parallel(true)` each popcount layer of the table is filled on the
/// rayon pool; results are identical to the sequential fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmEvaluator {
    max_players: usize,
    parallel: bool,
}

impl IcmEvaluator {
    /// Sequential evaluator capped at `DEFAULT_MAX_PLAYERS`
    pub fn new() -> Self {
        IcmEvaluator {
            max_players: DEFAULT_MAX_PLAYERS,
            parallel: false,
        }
    }

    /// Set the player cap (clamped to `MAX_PLAYERS`)
    pub fn max_players(mut self, max: usize) -> Self {
        self.max_players = max.min(MAX_PLAYERS);
        self
    }

    /// Fill the table layer by layer on the rayon pool
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn player_limit(&self) -> usize {
        self.max_players
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Expected payout for every player
    ///
    /// Fails before any allocation if the inputs break the contract checked
    /// by [`validate`].
    pub fn evaluate(&self, chips: &[f64], payouts: &[f64]) -> IcmResult<Vec<f64>> {
        validate(chips, payouts, self.max_players)?;
        let n = chips.len();

        let table = if self.parallel {
            fill_layered(chips, payouts)
        } else {
            fill_sequential(chips, payouts)
        };
        debug!(
            "icm: {} players, {} table values, {} fill",
            n,
            table.len(),
            if self.parallel { "layered" } else { "sequential" }
        );

        let ev = table.into_cell(subset::full(n), 0);
        trace!("icm: ev = {:?}", ev);
        Ok(ev)
    }
}

impl Default for IcmEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl PayoutModel for IcmEvaluator {
    fn equity(&self, chips: &[f64], payouts: &[f64]) -> IcmResult<Vec<f64>> {
        self.evaluate(chips, payouts)
    }
}

/// Expected payout per player with the default evaluator
pub fn evaluate(chips: &[f64], payouts: &[f64]) -> IcmResult<Vec<f64>> {
    IcmEvaluator::default().evaluate(chips, payouts)
}

/// Check the stacks on their own: non-empty, within `max_players`, every
/// stack finite and positive, and a finite total.
pub fn validate_chips(chips: &[f64], max_players: usize) -> IcmResult<()> {
    if chips.is_empty() {
        return Err(IcmError::NoPlayers);
    }
    let max = max_players.min(MAX_PLAYERS);
    if chips.len() > max {
        return Err(IcmError::TooManyPlayers {
            players: chips.len(),
            max,
        });
    }
    let mut total = 0.0_f64;
    for (player, &c) in chips.iter().enumerate() {
        if !c.is_finite() || c <= 0.0 {
            return Err(IcmError::InvalidChips { player, chips: c });
        }
        total += c;
        if !total.is_finite() {
            return Err(IcmError::ChipTotalOverflow { player });
        }
    }
    Ok(())
}

/// Full input contract for [`IcmEvaluator::evaluate`]
pub fn validate(chips: &[f64], payouts: &[f64], max_players: usize) -> IcmResult<()> {
    if chips.is_empty() && payouts.is_empty() {
        return Err(IcmError::NoPlayers);
    }
    if chips.len() != payouts.len() {
        return Err(IcmError::LengthMismatch {
            chips: chips.len(),
            payouts: payouts.len(),
        });
    }
    validate_chips(chips, max_players)?;

    for (place, &payout) in payouts.iter().enumerate() {
        if !payout.is_finite() || payout < 0.0 {
            return Err(IcmError::InvalidPayout { place, payout });
        }
        if place > 0 && payout > payouts[place - 1] {
            return Err(IcmError::UnsortedPayouts {
                place,
                payout,
                previous: payouts[place - 1],
            });
        }
    }
    Ok(())
}

/// Compute every position for `mask` into `block` (position-major, `n * n`).
///
/// Reads only masks with one fewer player, which must already be stored.
fn fill_block(table: &EvTable, mask: Mask, chips: &[f64], payouts: &[f64], block: &mut [f64]) {
    let n = chips.len();
    let total = subset::stack_total(mask, chips);
    block.fill(0.0);

    for (pos, ev) in block.chunks_exact_mut(n).enumerate() {
        for i in subset::members(mask) {
            let prob = chips[i] / total;
            let next = table.cell(subset::without(mask, i), pos + 1);
            ev[i] += prob * payouts[pos];
            for (e, &v) in ev.iter_mut().zip(next) {
                *e += prob * v;
            }
        }
    }
}

/// Ascending mask order; removing a player always yields a smaller mask.
fn fill_sequential(chips: &[f64], payouts: &[f64]) -> EvTable {
    let n = chips.len();
    let mut table = EvTable::new(n);
    let mut block = vec![0.0; n * n];
    for mask in 1..subset::count(n) as Mask {
        fill_block(&table, mask, chips, payouts, &mut block);
        table.store_block(mask, &block);
    }
    table
}

/// One popcount layer at a time; masks within a layer are independent.
fn fill_layered(chips: &[f64], payouts: &[f64]) -> EvTable {
    let n = chips.len();
    let mut table = EvTable::new(n);
    for layer in subset::layers(n) {
        let blocks: Vec<Vec<f64>> = layer
            .par_iter()
            .map(|&mask| {
                let mut block = vec![0.0; n * n];
                fill_block(&table, mask, chips, payouts, &mut block);
                block
            })
            .collect();
        for (&mask, block) in layer.iter().zip(blocks.iter()) {
            table.store_block(mask, block);
        }
    }
    table
}

/// Benchmark helper for CLI
///
/// Evaluates a synthetic `players`-handed field `iterations` times and
/// returns (evals_per_sec, duration_ms).
pub fn benchmark_throughput(
    evaluator: &IcmEvaluator,
    players: usize,
    iterations: usize,
) -> IcmResult<(f64, u64)> {
    let (chips, payouts) = synthetic_field(players, 12345);

    // Warm-up, also surfaces contract errors before timing
    evaluator.evaluate(&chips, &payouts)?;

    let start = Instant::now();
    for _ in 0..iterations {
        evaluator.evaluate(&chips, &payouts)?;
    }
    let duration = start.elapsed();

    let evals_per_sec = iterations as f64 / duration.as_secs_f64().max(f64::EPSILON);
    Ok((evals_per_sec, duration.as_millis() as u64))
}

/// Deterministic stacks in [1000, 50000) and a top-heavy payout schedule
pub fn synthetic_field(players: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut state = seed;
    let mut lcg_next = || {
        state = state.wrapping_mul(1103515245).wrapping_add(12345) & 0x7fffffff;
        state
    };
    let chips = (0..players)
        .map(|_| 1000.0 + (lcg_next() % 49_000) as f64)
        .collect();
    // Halving prizes keep the schedule non-increasing
    let payouts = (0..players)
        .map(|place| 1000.0 / (1u64 << place.min(62)) as f64)
        .collect();
    (chips, payouts)
}
