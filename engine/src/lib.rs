//! icm Engine - Independent Chip Model evaluation
//!
//! This crate turns chip stacks and a payout schedule into each player's
//! expected tournament payout, using an exact dynamic program over the sets
//! of players still in contention.
//!
//! The engine is pure computation: no I/O and no global state.

pub mod error;
pub mod evaluator;
pub mod placement;
pub mod subset;
pub mod table;

pub use error::{IcmError, IcmResult};
pub use evaluator::{evaluate, IcmEvaluator, PayoutModel, DEFAULT_MAX_PLAYERS};
pub use placement::finish_distribution;
