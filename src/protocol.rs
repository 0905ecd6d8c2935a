//! Newline-delimited JSON protocol spoken between `hebbd` and its clients.
//!
//! One request per line, one response per line, in order.

use serde::{Deserialize, Serialize};

use crate::driver::DriverState;
use crate::error::NetError;
use crate::graph::{ConnectionParam, ConnectionParams, NeuronKey, NeuronParam};
use crate::network::Direction;
use crate::observer::{Diagnostics, NetworkSnapshot};
use crate::world::WorldStats;

pub const DEFAULT_ADDR: &str = "127.0.0.1:9877";

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    GetState,
    GetGraph,
    Start,
    Stop,
    Reset,
    AddHidden {
        x: f32,
        y: f32,
        /// Apply the default fully-connected wiring.
        #[serde(default = "default_true")]
        wired: bool,
    },
    RemoveHidden {
        key: NeuronKey,
    },
    AddConnection {
        from: NeuronKey,
        to: NeuronKey,
        #[serde(default)]
        weight: Option<f32>,
        #[serde(default)]
        learning_rate: Option<f32>,
        #[serde(default)]
        decay: Option<f32>,
    },
    RemoveConnection {
        from: NeuronKey,
        to: NeuronKey,
    },
    SetNeuronParam {
        key: NeuronKey,
        param: NeuronParam,
    },
    SetConnectionParam {
        from: NeuronKey,
        to: NeuronKey,
        param: ConnectionParam,
    },
    SetTickPeriodMs {
        ms: u64,
    },
    Shutdown,
}

impl Request {
    /// Whether serving this request mutates the session.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Request::GetState | Request::GetGraph)
    }

    /// Edits to neurons or connections. Lifecycle requests are not edits.
    pub fn is_graph_edit(&self) -> bool {
        matches!(
            self,
            Request::AddHidden { .. }
                | Request::RemoveHidden { .. }
                | Request::AddConnection { .. }
                | Request::RemoveConnection { .. }
                | Request::SetNeuronParam { .. }
                | Request::SetConnectionParam { .. }
        )
    }

    /// Resolve optional connection fields against `defaults`.
    pub fn connection_params(
        defaults: ConnectionParams,
        weight: Option<f32>,
        learning_rate: Option<f32>,
        decay: Option<f32>,
    ) -> ConnectionParams {
        ConnectionParams {
            weight: weight.unwrap_or(defaults.weight),
            learning_rate: learning_rate.unwrap_or(defaults.learning_rate),
            decay: decay.unwrap_or(defaults.decay),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    pub size: usize,
    pub agent: (usize, usize),
    pub rewards: usize,
    pub stats: WorldStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state: DriverState,
    pub tick_period_ms: u64,
    pub last_action: Option<Direction>,
    pub diagnostics: Diagnostics,
    pub world: WorldView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    State(StateSnapshot),
    Graph(NetworkSnapshot),
    Success { message: String },
    Error { kind: String, message: String },
}

impl Response {
    pub fn success(message: impl Into<String>) -> Self {
        Response::Success {
            message: message.into(),
        }
    }

    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Response::Error {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl From<NetError> for Response {
    fn from(err: NetError) -> Self {
        Response::error(err.kind(), err.to_string())
    }
}

/// Serialize a message as a single protocol line, newline included.
pub fn encode_line<T: Serialize>(msg: &T) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(msg)?;
    line.push('\n');
    Ok(line)
}
