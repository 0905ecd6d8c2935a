//! Correlational weight update.
//!
//! `dw = lr * pre * post`, then `w = clamp(w * (1 - decay) + dw, -1, 1)`.
//! Runs after the activation pass, so both endpoints are read post-update.

use crate::graph::{Connection, Graph, WEIGHT_LIMIT};

#[inline]
pub fn updated_weight(c: &Connection, pre: f32, post: f32) -> f32 {
    let dw = c.learning_rate * pre * post;
    (c.weight * (1.0 - c.decay) + dw).clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT)
}

/// Apply the rule to every connection in place.
pub fn learning_pass(graph: &mut Graph) {
    let (edges, activity) = graph.learning_view();
    for c in edges.iter_mut() {
        let pre = activity[c.from.0 as usize];
        let post = activity[c.to.0 as usize];
        c.weight = updated_weight(c, pre, post);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ConnectionParams, InputRole, NeuronKind, Position};

    fn edge(weight: f32, learning_rate: f32, decay: f32) -> Connection {
        Connection {
            from: crate::graph::NeuronKey(0),
            to: crate::graph::NeuronKey(1),
            weight,
            learning_rate,
            decay,
        }
    }

    #[test]
    fn coactive_endpoints_strengthen() {
        let w = updated_weight(&edge(0.2, 0.1, 0.1), 1.0, 1.0);
        assert!((w - 0.28).abs() < 1e-6);
    }

    #[test]
    fn decay_pulls_toward_zero_without_coactivity() {
        let w = updated_weight(&edge(-0.5, 0.1, 0.2), 1.0, 0.0);
        assert!((w + 0.4).abs() < 1e-6);
    }

    #[test]
    fn weight_stays_bounded() {
        let mut c = edge(0.95, 5.0, 0.0);
        for _ in 0..10 {
            c.weight = updated_weight(&c, 1.0, 1.0);
            assert!(c.weight <= WEIGHT_LIMIT);
        }
        assert_eq!(c.weight, 1.0);

        let mut c = edge(-0.9, 5.0, 0.0);
        c.weight = updated_weight(&c, 1.0, -3.0);
        assert_eq!(c.weight, -1.0);
    }

    #[test]
    fn pass_updates_every_edge_from_current_activity() {
        let mut g = Graph::new();
        let a = g.insert_neuron(NeuronKind::Input(InputRole::Vision), Position::default());
        let b = g.insert_neuron(NeuronKind::Output, Position::default());
        let c = g.insert_neuron(NeuronKind::Output, Position::default());
        let p = ConnectionParams {
            weight: 0.2,
            learning_rate: 0.1,
            decay: 0.1,
        };
        g.add_connection(a, b, p).unwrap();
        g.add_connection(a, c, p).unwrap();
        g.set_activity(a, 1.0);
        g.set_activity(b, 1.0);

        learning_pass(&mut g);
        assert!((g.connection(a, b).unwrap().weight - 0.28).abs() < 1e-6);
        assert!((g.connection(a, c).unwrap().weight - 0.18).abs() < 1e-6);
    }
}
