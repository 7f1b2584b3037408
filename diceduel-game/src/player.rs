use crate::dice::Dice;
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Sources the outcome of every round.
    Host,
    Guest,
}

impl Role {
    pub fn peer(self) -> Role {
        match self {
            Role::Host => Role::Guest,
            Role::Guest => Role::Host,
        }
    }
}

/// A participant's name, role and balance.
///
/// Each process owns one local player and one mirror of the peer. The mirror
/// only changes when the peer reports its balance.
pub struct Player {
    name: String,
    role: Role,
    balance: i64,
    dice: Option<Box<dyn Dice>>,
}

impl Player {
    pub fn host(name: impl Into<String>, balance: i64, dice: Box<dyn Dice>) -> Self {
        Self {
            name: name.into(),
            role: Role::Host,
            balance,
            dice: Some(dice),
        }
    }

    pub fn guest(name: impl Into<String>, balance: i64) -> Self {
        Self {
            name: name.into(),
            role: Role::Guest,
            balance,
            dice: None,
        }
    }

    /// Local copy of the peer. Never rolls.
    pub fn mirror(name: impl Into<String>, role: Role, balance: i64) -> Self {
        Self {
            name: name.into(),
            role,
            balance,
            dice: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn is_host(&self) -> bool {
        self.role == Role::Host
    }

    pub fn is_solvent(&self) -> bool {
        self.balance > 0
    }

    pub(crate) fn set_balance(&mut self, balance: i64) {
        self.balance = balance;
    }

    pub(crate) fn roll(&mut self) -> Result<i64> {
        let dice = self
            .dice
            .as_mut()
            .ok_or_else(|| GameError::internal(format!("{} has no dice to roll", self.name)))?;
        Ok(dice.roll())
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("balance", &self.balance)
            .field("has_dice", &self.dice.is_some())
            .finish()
    }
}
