//! Default-connection strategies applied on top of the graph primitives.

use crate::error::Result;
use crate::graph::{ConnectionParams, Graph, NeuronKey};

/// Decides which connections a freshly created hidden neuron receives.
pub trait WiringPolicy {
    /// Wire `hidden` into the graph; returns how many connections were made.
    fn wire_hidden(&self, graph: &mut Graph, hidden: NeuronKey) -> Result<usize>;
}

/// Every input feeds the new neuron, and the new neuron feeds every output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullyConnect {
    pub params: ConnectionParams,
}

impl FullyConnect {
    pub fn new(params: ConnectionParams) -> Self {
        Self { params }
    }
}

impl WiringPolicy for FullyConnect {
    fn wire_hidden(&self, graph: &mut Graph, hidden: NeuronKey) -> Result<usize> {
        let inputs: Vec<NeuronKey> = graph
            .neurons()
            .filter(|n| n.kind.is_input())
            .map(|n| n.key)
            .collect();
        let outputs: Vec<NeuronKey> = graph
            .neurons()
            .filter(|n| n.kind.is_output())
            .map(|n| n.key)
            .collect();

        for &i in &inputs {
            graph.add_connection(i, hidden, self.params)?;
        }
        for &o in &outputs {
            graph.add_connection(hidden, o, self.params)?;
        }
        Ok(inputs.len() + outputs.len())
    }
}

/// Leaves the neuron bare.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unwired;

impl WiringPolicy for Unwired {
    fn wire_hidden(&self, _graph: &mut Graph, _hidden: NeuronKey) -> Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{InputRole, NeuronKind, Position};

    #[test]
    fn fully_connect_wires_all_inputs_and_outputs() {
        let mut g = Graph::new();
        for _ in 0..3 {
            g.insert_neuron(NeuronKind::Input(InputRole::Vision), Position::default());
        }
        for _ in 0..2 {
            g.insert_neuron(NeuronKind::Output, Position::default());
        }
        let existing = g.add_hidden_neuron(Position::default());
        let h = g.add_hidden_neuron(Position::default());

        let made = FullyConnect::default().wire_hidden(&mut g, h).unwrap();
        assert_eq!(made, 5);
        assert_eq!(g.incoming(h).len(), 3);
        assert_eq!(g.outgoing(h).len(), 2);
        // Other hidden neurons are left alone.
        assert!(g.connection(existing, h).is_none());
        assert!(g
            .connections()
            .iter()
            .all(|c| c.weight == 0.5 && c.learning_rate == 0.1 && c.decay == 0.01));
    }

    #[test]
    fn unwired_makes_nothing() {
        let mut g = Graph::new();
        g.insert_neuron(NeuronKind::Input(InputRole::Reward), Position::default());
        let h = g.add_hidden_neuron(Position::default());
        assert_eq!(Unwired.wire_hidden(&mut g, h).unwrap(), 0);
        assert_eq!(g.connection_count(), 0);
    }
}
