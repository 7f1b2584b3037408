//! Two-player dice wagering over a direct link.
//!
//! Each round both players pick a guess (1-6) and a stake, the host rolls the
//! die, both sides apply the same payout table to their own balance and then
//! report balances to each other to detect divergence.

pub mod decider;
pub mod dice;
pub mod engine;
pub mod error;
pub mod handshake;
pub mod payout;
pub mod player;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use decider::Decider;
pub use dice::{Dice, RandomDice, FACES};
pub use engine::{AbortReason, RoundEngine, RoundReport, RoundResult};
pub use error::{GameError, Result};
pub use payout::{Payout, Rule, Wager};
pub use player::{Player, Role};
pub use session::{Session, SessionOutcome, SessionState, Standings};
