//! Session driver: plays rounds until a peer aborts, a balance runs out or the
//! local player quits, then closes the connection exactly once.

use crate::decider::Decider;
use crate::dice::RandomDice;
use crate::engine::{AbortReason, RoundEngine, RoundResult};
use crate::handshake;
use crate::player::{Player, Role};
use crate::{GameError, Result};
use diceduel_core::{Connection, GameConfig, Transport};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Playing,
    RoundAborted(AbortReason),
    BalanceDepleted,
    UserQuit,
    /// Ended on an error, which was returned to the caller.
    Failed(String),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Playing)
    }
}

/// Both balances as this side currently sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub local_name: String,
    pub local_balance: i64,
    pub remote_name: String,
    pub remote_balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub id: Uuid,
    pub state: SessionState,
    pub rounds: u32,
    pub standings: Standings,
}

pub struct Session {
    id: Uuid,
    engine: RoundEngine,
    state: SessionState,
}

impl Session {
    /// Creates the local player for `role` and performs the greeting.
    pub async fn establish(
        transport: Box<dyn Transport>,
        config: &GameConfig,
        name: &str,
        role: Role,
    ) -> Result<Self> {
        let local = match role {
            Role::Host => {
                let dice = match config.seed {
                    Some(seed) => RandomDice::seeded(seed),
                    None => RandomDice::new(),
                };
                Player::host(name, config.starting_balance, Box::new(dice))
            }
            Role::Guest => Player::guest(name, config.starting_balance),
        };

        Self::start(transport, config, local).await
    }

    pub async fn start(
        transport: Box<dyn Transport>,
        config: &GameConfig,
        local: Player,
    ) -> Result<Self> {
        config.validate()?;
        let mut conn = Connection::new(transport, config);

        let greeting = match handshake::greet(&mut conn, local.name(), local.balance()).await {
            Ok(greeting) => greeting,
            Err(e) => {
                if let Err(close_err) = conn.close().await {
                    tracing::debug!("Close after failed greeting: {}", close_err);
                }
                return Err(e);
            }
        };

        let remote = Player::mirror(greeting.name, local.role().peer(), greeting.balance);
        let engine = RoundEngine::new(conn, local, remote, config.validate_peer_input)?;

        Ok(Self {
            id: Uuid::new_v4(),
            engine,
            state: SessionState::Playing,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn local(&self) -> &Player {
        self.engine.local()
    }

    pub fn remote(&self) -> &Player {
        self.engine.remote()
    }

    pub fn standings(&self) -> Standings {
        Standings {
            local_name: self.engine.local().name().to_string(),
            local_balance: self.engine.local().balance(),
            remote_name: self.engine.remote().name().to_string(),
            remote_balance: self.engine.remote().balance(),
        }
    }

    /// Plays until a terminal state is reached. The connection is closed on
    /// every path out, including errors.
    pub async fn run(&mut self, decider: &mut dyn Decider) -> Result<SessionOutcome> {
        if self.state.is_terminal() {
            return Err(GameError::internal("session already finished"));
        }
        let span = tracing::info_span!("session", id = %self.id);

        async move {
            tracing::info!(
                "Session started: {} vs {}",
                self.engine.local().name(),
                self.engine.remote().name()
            );

            let driven = self.drive(decider).await;
            let closed = self.engine.close().await;
            let state = match driven {
                Ok(state) => state,
                Err(e) => {
                    self.state = SessionState::Failed(e.to_string());
                    return Err(e);
                }
            };
            self.state = state.clone();
            closed?;

            tracing::info!(
                "Session ended after {} rounds: {:?}",
                self.engine.rounds(),
                state
            );

            Ok(SessionOutcome {
                id: self.id,
                state,
                rounds: self.engine.rounds(),
                standings: self.standings(),
            })
        }
        .instrument(span)
        .await
    }

    async fn drive(&mut self, decider: &mut dyn Decider) -> Result<SessionState> {
        if self.depleted() {
            return Ok(SessionState::BalanceDepleted);
        }

        loop {
            let report = match self.engine.play_round(decider).await? {
                RoundResult::Completed(report) => report,
                RoundResult::Aborted(reason) => return Ok(SessionState::RoundAborted(reason)),
            };
            decider.round_finished(&report);

            if self.depleted() {
                return Ok(SessionState::BalanceDepleted);
            }

            if !decider.play_again(&self.standings()).await? {
                self.engine.quit().await?;
                return Ok(SessionState::UserQuit);
            }
        }
    }

    fn depleted(&self) -> bool {
        !self.engine.local().is_solvent() || !self.engine.remote().is_solvent()
    }
}
