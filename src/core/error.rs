use thiserror::Error;

use crate::graph::NeuronKey;

/// Recoverable failures of graph mutation and parameter edits.
///
/// None of these leave the graph in a partially-updated state; callers can
/// re-read the network and retry or ignore.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetError {
    #[error("neuron {0} not found")]
    NeuronNotFound(NeuronKey),

    #[error("connection {from} -> {to} not found")]
    ConnectionNotFound { from: NeuronKey, to: NeuronKey },

    #[error("connection endpoint {0} does not exist")]
    InvalidEndpoint(NeuronKey),

    #[error("a connection between {from} and {to} already exists")]
    DuplicateConnection { from: NeuronKey, to: NeuronKey },

    #[error("{field} does not apply to {kind} neuron {key}")]
    InvalidKind {
        key: NeuronKey,
        kind: &'static str,
        field: &'static str,
    },

    #[error("invalid value {value} for {field}")]
    InvalidParameter { field: &'static str, value: f32 },

    #[error("network is busy with a tick")]
    Busy,
}

impl NetError {
    /// Stable machine-readable name, used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            NetError::NeuronNotFound(_) | NetError::ConnectionNotFound { .. } => "not_found",
            NetError::InvalidEndpoint(_) => "invalid_endpoint",
            NetError::DuplicateConnection { .. } => "duplicate_connection",
            NetError::InvalidKind { .. } => "invalid_kind",
            NetError::InvalidParameter { .. } => "invalid_parameter",
            NetError::Busy => "busy",
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == "not_found"
    }
}

pub type Result<T> = core::result::Result<T, NetError>;
