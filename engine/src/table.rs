//! Flat DP table for the ICM recursion
//!
//! Cells are addressed by `(mask, pos)`; each cell is a contiguous row of `n`
//! per-player values. The empty mask and the `pos == n` column are never
//! written and stay zero, which is the recursion's boundary condition.

use crate::subset::{self, Mask};

/// Expected-value arena sized `2^n x (n+1) x n`
pub struct EvTable {
    players: usize,
    values: Vec<f64>,
}

impl EvTable {
    /// Allocate a zeroed table for `players` players
    pub fn new(players: usize) -> Self {
        let len = subset::count(players) * Self::stride(players);
        EvTable {
            players,
            values: vec![0.0; len],
        }
    }

    /// Values per mask: `(n + 1)` positions of `n` players each
    #[inline]
    fn stride(players: usize) -> usize {
        (players + 1) * players
    }

    #[inline]
    fn offset(&self, mask: Mask, pos: usize) -> usize {
        debug_assert!(pos <= self.players);
        mask as usize * Self::stride(self.players) + pos * self.players
    }

    /// Number of stored `f64` values
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    /// Per-player values for `(mask, pos)`
    #[inline]
    pub fn cell(&self, mask: Mask, pos: usize) -> &[f64] {
        let start = self.offset(mask, pos);
        &self.values[start..start + self.players]
    }

    /// Write every position for `mask` at once. `block` is laid out
    /// position-major with `n * n` values (the `pos == n` column is skipped).
    pub fn store_block(&mut self, mask: Mask, block: &[f64]) {
        let n = self.players;
        debug_assert_eq!(block.len(), n * n);
        let start = self.offset(mask, 0);
        self.values[start..start + n * n].copy_from_slice(block);
    }

    /// Consume the table, returning the row for `(mask, pos)`
    pub fn into_cell(mut self, mask: Mask, pos: usize) -> Vec<f64> {
        let start = self.offset(mask, pos);
        self.values.truncate(start + self.players);
        self.values.drain(..start);
        self.values
    }
}
