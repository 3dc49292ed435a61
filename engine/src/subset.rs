//! Remaining-set encoding
//!
//! A set of still-active players is a bitmask: bit `i` set means player `i`
//! has not been placed yet. Removing a player always lowers the integer
//! value, so ascending mask order is a valid bottom-up fill order.

/// Remaining-set bitmask (bit i = player i still active)
pub type Mask = u32;

/// Largest player count a `Mask` can address while keeping the table index in range
pub const MASK_BITS: usize = 24;

/// Mask with all `n` players active
pub fn full(n: usize) -> Mask {
    debug_assert!(n <= MASK_BITS, "player count exceeds mask width");
    ((1u64 << n) - 1) as Mask
}

/// Number of distinct masks over `n` players (including the empty set)
pub fn count(n: usize) -> usize {
    1usize << n
}

/// `mask` with player `i` removed
#[inline]
pub fn without(mask: Mask, i: usize) -> Mask {
    mask & !((1 as Mask) << i)
}

/// Active players in ascending index order
pub fn members(mask: Mask) -> Members {
    Members(mask)
}

/// Iterator over set bits, lowest first
#[derive(Debug, Clone, Copy)]
pub struct Members(Mask);

impl Iterator for Members {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let i = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let k = self.0.count_ones() as usize;
        (k, Some(k))
    }
}

impl ExactSizeIterator for Members {}

/// Total chips held by the players in `mask`
pub fn stack_total(mask: Mask, chips: &[f64]) -> f64 {
    members(mask).map(|i| chips[i]).sum()
}

/// Non-empty masks over `n` players grouped by popcount: `layers[k]` holds
/// every mask with `k + 1` active players, ascending.
pub fn layers(n: usize) -> Vec<Vec<Mask>> {
    let mut layers = vec![Vec::new(); n];
    for mask in 1..count(n) as Mask {
        layers[mask.count_ones() as usize - 1].push(mask);
    }
    layers
}
