use crate::dice::FACES;
use crate::engine::RoundReport;
use crate::session::Standings;
use crate::{GameError, Result};
use async_trait::async_trait;

/// Local player's choices, supplied by a terminal, a script or a bot.
///
/// Values are re-checked by the engine; anything out of range is passed back
/// through [`Decider::rejected`] and asked for again before it reaches the wire.
#[async_trait]
pub trait Decider: Send {
    async fn guess(&mut self) -> Result<i64>;

    async fn stake(&mut self, balance: i64) -> Result<i64>;

    async fn play_again(&mut self, standings: &Standings) -> Result<bool>;

    fn rejected(&mut self, _error: &GameError) {}

    fn round_finished(&mut self, _report: &RoundReport) {}
}

pub fn check_guess(guess: i64) -> Result<()> {
    if FACES.contains(&guess) {
        Ok(())
    } else {
        Err(GameError::invalid_input(format!(
            "guess must be between {} and {}, got {}",
            FACES.start(),
            FACES.end(),
            guess
        )))
    }
}

pub fn check_stake(stake: i64, balance: i64) -> Result<()> {
    if stake <= 0 {
        return Err(GameError::invalid_input("stake must be positive"));
    }
    if stake > balance {
        return Err(GameError::invalid_input(format!(
            "stake {} exceeds balance {}",
            stake, balance
        )));
    }
    Ok(())
}
