//! Round engine: drives one guess/stake/outcome/payout/reconciliation cycle.
//!
//! Both roles run the same protocol; the role only selects the order of the
//! first three steps (see [`schedule`]). The host never rolls before it holds
//! both wagers, and the guest never reveals its wager before it has received
//! the host's.

use crate::decider::{check_guess, check_stake, Decider};
use crate::dice::FACES;
use crate::payout::{self, Rule, Wager};
use crate::player::{Player, Role};
use crate::{GameError, Result};
use diceduel_core::{Connection, DuelError, Kind, Message};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Ask the local player for a guess and a stake and send both.
    CommitLocal,
    /// Read the peer's guess and stake.
    ReceivePeer,
    /// Roll and send the outcome. Host only.
    SendRoll,
    /// Read the outcome. Guest only.
    ReceiveRoll,
}

/// Exchange order for a role.
pub fn schedule(role: Role) -> [Step; 3] {
    match role {
        Role::Host => [Step::CommitLocal, Step::ReceivePeer, Step::SendRoll],
        Role::Guest => [Step::ReceivePeer, Step::CommitLocal, Step::ReceiveRoll],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// Peer sent EXIT in place of the expected item.
    PeerExit(String),
    /// Peer sent something unparseable, unexpected or out of range.
    Malformed(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::PeerExit(reason) => write!(f, "{}", reason),
            AbortReason::Malformed(detail) => write!(f, "protocol violation: {}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u32,
    pub local: Wager,
    pub remote: Wager,
    pub outcome: i64,
    pub rule: Rule,
    pub local_delta: i64,
    pub remote_delta: i64,
    pub local_balance: i64,
    pub remote_balance: i64,
    /// Peer reported a balance other than the one computed for it locally.
    pub diverged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundResult {
    Completed(RoundReport),
    Aborted(AbortReason),
}

pub struct RoundEngine {
    conn: Connection,
    local: Player,
    remote: Player,
    validate_peer_input: bool,
    rounds: u32,
}

impl RoundEngine {
    pub fn new(
        conn: Connection,
        local: Player,
        remote: Player,
        validate_peer_input: bool,
    ) -> Result<Self> {
        if local.role() == remote.role() {
            return Err(GameError::internal(format!(
                "both players hold the {:?} role",
                local.role()
            )));
        }

        Ok(Self {
            conn,
            local,
            remote,
            validate_peer_input,
            rounds: 0,
        })
    }

    pub fn local(&self) -> &Player {
        &self.local
    }

    pub fn remote(&self) -> &Player {
        &self.remote
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Plays one round. A peer EXIT or a bad peer message ends the round as
    /// [`RoundResult::Aborted`] with no balance change; connection failures
    /// are returned as errors.
    pub async fn play_round(&mut self, decider: &mut dyn Decider) -> Result<RoundResult> {
        self.rounds += 1;
        let round = self.rounds;

        match self.run_round(round, decider).await {
            Ok(report) => {
                tracing::info!(
                    "Round {} settled: outcome {}, {:?}, balances {} / {}",
                    round,
                    report.outcome,
                    report.rule,
                    report.local_balance,
                    report.remote_balance
                );
                Ok(RoundResult::Completed(report))
            }
            Err(GameError::PeerExit(reason)) => {
                tracing::warn!("Round {} aborted by peer: {}", round, reason);
                Ok(RoundResult::Aborted(AbortReason::PeerExit(reason)))
            }
            Err(GameError::Core(DuelError::Malformed(detail))) => {
                tracing::warn!("Round {} aborted on bad message: {}", round, detail);
                Ok(RoundResult::Aborted(AbortReason::Malformed(detail)))
            }
            Err(e) => Err(e),
        }
    }

    async fn run_round(&mut self, round: u32, decider: &mut dyn Decider) -> Result<RoundReport> {
        let mut local = None;
        let mut remote = None;
        let mut outcome = None;

        for step in schedule(self.local.role()) {
            match step {
                Step::CommitLocal => local = Some(self.commit_local(decider).await?),
                Step::ReceivePeer => remote = Some(self.receive_peer().await?),
                Step::SendRoll => {
                    if local.is_none() || remote.is_none() {
                        return Err(GameError::internal(
                            "cannot roll before both wagers are committed",
                        ));
                    }
                    outcome = Some(self.send_roll().await?);
                }
                Step::ReceiveRoll => outcome = Some(self.expect(Kind::Roll).await?),
            }
        }

        let (local, remote, outcome) = match (local, remote, outcome) {
            (Some(local), Some(remote), Some(outcome)) => (local, remote, outcome),
            _ => return Err(GameError::internal("round schedule left a step unfilled")),
        };

        let payout = payout::resolve(local, remote, outcome);
        let local_balance = self
            .local
            .balance()
            .checked_add(payout.local)
            .ok_or_else(|| GameError::malformed("peer stake overflows the local balance"))?;
        let expected_remote = self
            .remote
            .balance()
            .checked_add(payout.remote)
            .ok_or_else(|| GameError::malformed("peer balance overflows after payout"))?;

        // balances are committed only once the peer's report is in
        self.send(Message::Balance(local_balance)).await?;
        let reported = self.expect(Kind::Balance).await?;

        self.local.set_balance(local_balance);
        self.remote.set_balance(reported);

        let diverged = reported != expected_remote;
        if diverged {
            tracing::warn!(
                "{} reported balance {}, expected {}",
                self.remote.name(),
                reported,
                expected_remote
            );
        }

        Ok(RoundReport {
            round,
            local,
            remote,
            outcome,
            rule: payout.rule,
            local_delta: payout.local,
            remote_delta: payout.remote,
            local_balance,
            remote_balance: reported,
            diverged,
        })
    }

    async fn commit_local(&mut self, decider: &mut dyn Decider) -> Result<Wager> {
        let guess = loop {
            let guess = decider.guess().await?;
            match check_guess(guess) {
                Ok(()) => break guess,
                Err(e) => {
                    tracing::warn!("Rejected guess: {}", e);
                    decider.rejected(&e);
                }
            }
        };
        self.send(Message::Guess(guess)).await?;

        let balance = self.local.balance();
        let stake = loop {
            let stake = decider.stake(balance).await?;
            match check_stake(stake, balance) {
                Ok(()) => break stake,
                Err(e) => {
                    tracing::warn!("Rejected stake: {}", e);
                    decider.rejected(&e);
                }
            }
        };
        self.send(Message::Stake(stake)).await?;

        Ok(Wager::new(guess, stake))
    }

    async fn receive_peer(&mut self) -> Result<Wager> {
        let guess = self.expect(Kind::Guess).await?;
        let stake = self.expect(Kind::Stake).await?;
        Ok(Wager::new(guess, stake))
    }

    async fn send_roll(&mut self) -> Result<i64> {
        let outcome = self.local.roll()?;
        tracing::info!("{} rolled {}", self.local.name(), outcome);
        self.send(Message::Roll(outcome)).await?;
        Ok(outcome)
    }

    /// Sends `message`. If the peer already hung up, an EXIT it queued before
    /// leaving is reported in place of the transport failure.
    async fn send(&mut self, message: Message) -> Result<()> {
        let err = match self.conn.send(&message).await {
            Ok(()) => return Ok(()),
            Err(err @ DuelError::Transport(_)) => err,
            Err(err) => return Err(err.into()),
        };

        tracing::debug!("Sending {} failed, reading what the peer left: {}", message.kind(), err);
        loop {
            match self.conn.recv().await {
                Ok(Message::Exit(reason)) => return Err(GameError::PeerExit(reason)),
                Ok(other) => tracing::debug!("Discarding {} from departed peer", other.kind()),
                Err(_) => return Err(err.into()),
            }
        }
    }

    async fn expect(&mut self, kind: Kind) -> Result<i64> {
        let value = match self.conn.recv().await? {
            Message::Exit(reason) => return Err(GameError::PeerExit(reason)),
            Message::Guess(v) if kind == Kind::Guess => v,
            Message::Stake(v) if kind == Kind::Stake => v,
            Message::Roll(v) if kind == Kind::Roll => v,
            Message::Balance(v) if kind == Kind::Balance => v,
            other => {
                return Err(GameError::malformed(format!(
                    "expected {}, got {}",
                    kind,
                    other.kind()
                )))
            }
        };

        if self.validate_peer_input {
            check_peer_value(kind, value)?;
        }
        Ok(value)
    }

    /// Tells the peer the local player is leaving.
    pub async fn quit(&mut self) -> Result<()> {
        let reason = format!("{} quit the game.", self.local.name());
        self.conn.send(&Message::exit(reason)).await?;
        Ok(())
    }

    pub async fn close(&mut self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

fn check_peer_value(kind: Kind, value: i64) -> Result<()> {
    let valid = match kind {
        Kind::Guess | Kind::Roll => FACES.contains(&value),
        Kind::Stake => value > 0,
        Kind::Balance => value >= 0,
        Kind::Name | Kind::Exit => true,
    };

    if valid {
        Ok(())
    } else {
        Err(GameError::malformed(format!(
            "peer sent out-of-range {} {}",
            kind, value
        )))
    }
}
