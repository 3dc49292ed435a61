//! Error types for ICM evaluation
//!
//! Every check runs before the DP table is allocated, so a failed call never
//! does any exponential work.

use thiserror::Error;

/// Input contract violations reported by the evaluator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IcmError {
    /// No players were given
    #[error("at least one player is required")]
    NoPlayers,

    /// `chips` and `payouts` differ in length
    #[error("payouts length {payouts} does not match chips length {chips}")]
    LengthMismatch { chips: usize, payouts: usize },

    /// A payout is larger than the one for the better place before it
    #[error(
        "payouts must be sorted in non-increasing order: place {place} pays {payout}, \
         more than the previous place ({previous})"
    )]
    UnsortedPayouts {
        place: usize,
        payout: f64,
        previous: f64,
    },

    /// Zero, negative or non-finite stack
    #[error("player {player} has invalid chip count {chips}; stacks must be finite and positive")]
    InvalidChips { player: usize, chips: f64 },

    /// Stacks are individually finite but their sum is not
    #[error("chip total overflows at player {player}; rescale the stacks")]
    ChipTotalOverflow { player: usize },

    /// Negative or non-finite prize
    #[error("place {place} has invalid payout {payout}; payouts must be finite and non-negative")]
    InvalidPayout { place: usize, payout: f64 },

    /// Player count exceeds the configured limit
    #[error("{players} players exceeds the limit of {max}")]
    TooManyPlayers { players: usize, max: usize },
}

pub type IcmResult<T> = Result<T, IcmError>;
