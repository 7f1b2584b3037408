//! Scripted collaborators shared by the unit tests.

use crate::decider::Decider;
use crate::dice::Dice;
use crate::engine::RoundReport;
use crate::session::Standings;
use crate::{GameError, Result};
use async_trait::async_trait;
use diceduel_core::{Connection, DuelError, GameConfig, Received, Transport, WaitBackoff};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Traffic {
    Sent(String),
    Received(String),
}

/// Shared view of what a [`ScriptedTransport`] did.
#[derive(Clone, Default)]
pub struct Script {
    traffic: Arc<Mutex<Vec<Traffic>>>,
    closes: Arc<Mutex<usize>>,
}

impl Script {
    pub fn traffic(&self) -> Vec<Traffic> {
        self.traffic.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.traffic()
            .into_iter()
            .filter_map(|t| match t {
                Traffic::Sent(line) => Some(line),
                Traffic::Received(_) => None,
            })
            .collect()
    }

    pub fn closes(&self) -> usize {
        *self.closes.lock().unwrap()
    }
}

/// Replays a fixed inbound script and records every line sent.
pub struct ScriptedTransport {
    inbound: VecDeque<Received>,
    script: Script,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&mut self, line: &str) -> diceduel_core::Result<()> {
        self.script
            .traffic
            .lock()
            .unwrap()
            .push(Traffic::Sent(line.to_string()));
        Ok(())
    }

    async fn receive(&mut self) -> diceduel_core::Result<Received> {
        let next = self
            .inbound
            .pop_front()
            .ok_or_else(|| DuelError::transport("script exhausted"))?;
        if let Received::Line(line) = &next {
            self.script
                .traffic
                .lock()
                .unwrap()
                .push(Traffic::Received(line.clone()));
        }
        Ok(next)
    }

    async fn close(&mut self) -> diceduel_core::Result<()> {
        *self.script.closes.lock().unwrap() += 1;
        Ok(())
    }
}

pub fn lines(raw: &[&str]) -> Vec<Received> {
    raw.iter().map(|l| Received::Line(l.to_string())).collect()
}

pub fn fast_config() -> GameConfig {
    GameConfig {
        wait_backoff: WaitBackoff {
            initial: Duration::from_millis(1),
            max: Duration::from_millis(2),
        },
        ..Default::default()
    }
}

pub fn scripted_transport(inbound: Vec<Received>) -> (Box<dyn Transport>, Script) {
    let script = Script::default();
    let transport = ScriptedTransport {
        inbound: inbound.into(),
        script: script.clone(),
    };
    (Box::new(transport), script)
}

pub fn scripted_connection(inbound: Vec<Received>) -> (Connection, Script) {
    let (transport, script) = scripted_transport(inbound);
    (Connection::new(transport, &fast_config()), script)
}

pub fn position(traffic: &[Traffic], item: Traffic) -> usize {
    traffic
        .iter()
        .position(|t| *t == item)
        .unwrap_or_else(|| panic!("{:?} not in traffic", item))
}

/// Rolls the given faces in order, cycling.
pub struct LoadedDice {
    faces: VecDeque<i64>,
}

impl LoadedDice {
    pub fn new(faces: Vec<i64>) -> Self {
        Self {
            faces: faces.into(),
        }
    }
}

impl Dice for LoadedDice {
    fn roll(&mut self) -> i64 {
        let face = self.faces.pop_front().unwrap_or(1);
        self.faces.push_back(face);
        face
    }
}

pub struct ScriptedDecider {
    guesses: VecDeque<i64>,
    stakes: VecDeque<i64>,
    continues: VecDeque<bool>,
    pub rejections: usize,
    pub reports: Vec<RoundReport>,
}

impl ScriptedDecider {
    pub fn new(guesses: Vec<i64>, stakes: Vec<i64>, continues: Vec<bool>) -> Self {
        Self {
            guesses: guesses.into(),
            stakes: stakes.into(),
            continues: continues.into(),
            rejections: 0,
            reports: Vec::new(),
        }
    }
}

#[async_trait]
impl Decider for ScriptedDecider {
    async fn guess(&mut self) -> Result<i64> {
        self.guesses
            .pop_front()
            .ok_or_else(|| GameError::internal("no guesses left"))
    }

    async fn stake(&mut self, _balance: i64) -> Result<i64> {
        self.stakes
            .pop_front()
            .ok_or_else(|| GameError::internal("no stakes left"))
    }

    async fn play_again(&mut self, _standings: &Standings) -> Result<bool> {
        Ok(self.continues.pop_front().unwrap_or(false))
    }

    fn rejected(&mut self, _error: &GameError) {
        self.rejections += 1;
    }

    fn round_finished(&mut self, report: &RoundReport) {
        self.reports.push(report.clone());
    }
}
