//! Payout table applied by both peers after the outcome is known.
//!
//! Each side evaluates the table from its own point of view and applies only its
//! own delta. The peer's delta is kept to cross-check the balance the peer
//! later reports.

use serde::{Deserialize, Serialize};

/// One side's committed choice for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wager {
    pub guess: i64,
    pub stake: i64,
}

impl Wager {
    pub fn new(guess: i64, stake: i64) -> Self {
        Self { guess, stake }
    }
}

/// Rules in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    /// Both lose their own stake.
    NeitherCorrect,
    /// Local takes the remote stake.
    LocalCorrect,
    /// Remote takes the local stake.
    RemoteCorrect,
    /// Same guess and same stake: nothing moves.
    Standoff,
    /// Same guess, different stakes: each gains its own stake.
    SameGuess,
    /// Different guesses, both right: each gains its own stake.
    DifferentGuesses,
}

impl Rule {
    /// The same rule as seen from the other peer.
    pub fn mirrored(self) -> Rule {
        match self {
            Rule::LocalCorrect => Rule::RemoteCorrect,
            Rule::RemoteCorrect => Rule::LocalCorrect,
            other => other,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Rule::NeitherCorrect => "No one guessed correctly. Both lose their stakes.",
            Rule::LocalCorrect => "You guessed correctly and take your opponent's stake.",
            Rule::RemoteCorrect => "Your opponent guessed correctly and takes your stake.",
            Rule::Standoff => "Both guessed correctly with the same guess and stake. No gain or loss.",
            Rule::SameGuess => "Both guessed correctly. Each gains their own stake.",
            Rule::DifferentGuesses => {
                "Both guessed correctly with different numbers. Each gains their own stake."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub rule: Rule,
    pub local: i64,
    pub remote: i64,
}

impl Payout {
    pub fn mirrored(self) -> Payout {
        Payout {
            rule: self.rule.mirrored(),
            local: self.remote,
            remote: self.local,
        }
    }
}

pub fn resolve(local: Wager, remote: Wager, outcome: i64) -> Payout {
    let local_correct = local.guess == outcome;
    let remote_correct = remote.guess == outcome;

    let (rule, local_delta, remote_delta) = match (local_correct, remote_correct) {
        (false, false) => (Rule::NeitherCorrect, -local.stake, -remote.stake),
        (true, false) => (Rule::LocalCorrect, remote.stake, -remote.stake),
        (false, true) => (Rule::RemoteCorrect, -local.stake, local.stake),
        // standoff has to win over the general both-correct rules
        (true, true) if local == remote => (Rule::Standoff, 0, 0),
        (true, true) if local.guess == remote.guess => (Rule::SameGuess, local.stake, remote.stake),
        (true, true) => (Rule::DifferentGuesses, local.stake, remote.stake),
    };

    Payout {
        rule,
        local: local_delta,
        remote: remote_delta,
    }
}
