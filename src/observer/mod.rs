#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::{Connection, NeuronKey, NeuronKind, Position};
use crate::network::{Direction, Network};

/// A read-only copy of the graph, suitable for rendering or shipping over
/// the wire.
///
/// Observers cannot mutate or steer the network. Snapshotting allocates, so
/// it is meant to be taken on demand rather than every tick.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkSnapshot {
    pub tick: u64,
    pub neurons: Vec<NeuronView>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeuronView {
    pub key: NeuronKey,
    pub kind: NeuronKind,
    pub position: Position,
    pub activity: f32,
}

impl NetworkSnapshot {
    pub fn capture(network: &Network) -> Self {
        let graph = network.graph();
        let neurons = graph
            .neurons()
            .map(|n| NeuronView {
                key: n.key,
                kind: n.kind,
                position: n.position,
                activity: graph.activity(n.key).unwrap_or(0.0),
            })
            .collect();

        Self {
            tick: network.ticks(),
            neurons,
            connections: graph.connections().to_vec(),
        }
    }

    pub fn neuron(&self, key: NeuronKey) -> Option<&NeuronView> {
        self.neurons.iter().find(|n| n.key == key)
    }
}

/// Aggregate numbers for a status line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostics {
    pub ticks: u64,
    pub input_count: usize,
    pub hidden_count: usize,
    pub output_count: usize,
    pub connection_count: usize,
    pub mean_weight: f32,
    pub mean_hidden_activity: f32,
    /// Activities in canonical order: up, down, left, right.
    pub outputs: [f32; 4],
}

impl Diagnostics {
    pub fn capture(network: &Network) -> Self {
        let graph = network.graph();

        let connections = graph.connections();
        let mean_weight = if connections.is_empty() {
            0.0
        } else {
            connections.iter().map(|c| c.weight).sum::<f32>() / connections.len() as f32
        };

        let (hidden_sum, hidden_count) = graph
            .neurons()
            .filter(|n| n.kind.is_hidden())
            .fold((0.0f32, 0usize), |(sum, count), n| {
                (sum + graph.activity(n.key).unwrap_or(0.0), count + 1)
            });

        Self {
            ticks: network.ticks(),
            input_count: graph.count_where(NeuronKind::is_input),
            hidden_count,
            output_count: graph.count_where(NeuronKind::is_output),
            connection_count: connections.len(),
            mean_weight,
            mean_hidden_activity: if hidden_count == 0 {
                0.0
            } else {
                hidden_sum / hidden_count as f32
            },
            outputs: Direction::ALL.map(|d| network.output_activity(d)),
        }
    }
}
