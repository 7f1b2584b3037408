use crate::display;
use async_trait::async_trait;
use diceduel_game::decider::{check_guess, check_stake};
use diceduel_game::{Decider, GameError, Result, RoundReport, Standings};
use dialoguer::{Confirm, Input};

/// Reads the local player's choices from the terminal.
pub struct TerminalDecider {
    opponent: String,
}

impl TerminalDecider {
    pub fn new(opponent: impl Into<String>) -> Self {
        Self {
            opponent: opponent.into(),
        }
    }
}

#[async_trait]
impl Decider for TerminalDecider {
    async fn guess(&mut self) -> Result<i64> {
        Input::<i64>::new()
            .with_prompt("[You] Enter your guess (1-6)")
            .validate_with(|guess: &i64| check_guess(*guess).map_err(|e| e.to_string()))
            .interact_text()
            .map_err(|e| GameError::dialog(e.to_string()))
    }

    async fn stake(&mut self, balance: i64) -> Result<i64> {
        Input::<i64>::new()
            .with_prompt(format!("[You] Enter your stake (1-{})", balance))
            .validate_with(move |stake: &i64| check_stake(*stake, balance).map_err(|e| e.to_string()))
            .interact_text()
            .map_err(|e| GameError::dialog(e.to_string()))
    }

    async fn play_again(&mut self, standings: &Standings) -> Result<bool> {
        println!("{}", display::standings_table(standings));
        Confirm::new()
            .with_prompt("[You] Play another round?")
            .default(true)
            .interact()
            .map_err(|e| GameError::dialog(e.to_string()))
    }

    fn rejected(&mut self, error: &GameError) {
        println!("{}. Try again.", error);
    }

    fn round_finished(&mut self, report: &RoundReport) {
        display::print_report(report, &self.opponent);
    }
}

pub fn ask_name(role_label: &str) -> Result<String> {
    let name: String = Input::new()
        .with_prompt(format!("[{}] Enter your name", role_label))
        .validate_with(|name: &String| {
            if name.trim().is_empty() {
                Err("Name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(|e| GameError::dialog(e.to_string()))?;
    Ok(name.trim().to_string())
}
