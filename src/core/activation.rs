//! Activation pass: leaky-integrator hidden units and linear clamped outputs.
//!
//! Every read in a pass sees the activities published by the previous tick;
//! results land in the graph's next-activity buffer and become visible in one
//! swap at the end.

use crate::graph::{ActivationKind, Graph, HiddenParams, NeuronKind};

/// Squash a raw hidden-unit value.
///
/// ReLU is only bounded below; it is intentionally not clamped to 1.
#[inline]
pub fn activate(kind: ActivationKind, raw: f32, threshold: f32) -> f32 {
    match kind {
        ActivationKind::Sigmoid => 1.0 / (1.0 + (-(raw - threshold)).exp()),
        ActivationKind::Relu => (raw - threshold).max(0.0),
        ActivationKind::Threshold => {
            if raw > threshold {
                1.0
            } else {
                0.0
            }
        }
    }
}

/// One Euler step of `dA/dt = (-A + input) / tau`.
#[inline]
pub fn integrate(activity: f32, total_input: f32, tau: f32, dt: f32) -> f32 {
    activity + ((-activity + total_input) / tau) * dt
}

#[inline]
pub fn hidden_update(params: &HiddenParams, activity: f32, total_input: f32, dt: f32) -> f32 {
    let raw = integrate(activity, total_input, params.tau, dt);
    activate(params.activation, raw, params.threshold)
}

#[inline]
pub fn output_update(total_input: f32) -> f32 {
    total_input.clamp(0.0, 1.0)
}

/// Run the activation pass and publish the new activities.
///
/// Input neurons carry their current activity over unchanged.
pub fn activation_pass(graph: &mut Graph, dt: f32) {
    let (slots, edges, current, next) = graph.activation_view();

    // Accumulate total input per target into the next buffer first.
    next.fill(0.0);
    for c in edges {
        next[c.to.0 as usize] += current[c.from.0 as usize] * c.weight;
    }

    for (slot, neuron) in slots.iter().enumerate() {
        let Some(neuron) = neuron else {
            next[slot] = 0.0;
            continue;
        };
        let total_input = next[slot];
        next[slot] = match &neuron.kind {
            NeuronKind::Input(_) => current[slot],
            NeuronKind::Hidden(p) => hidden_update(p, current[slot], total_input, dt),
            NeuronKind::Output => output_update(total_input),
        };
    }

    graph.swap_activity();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ConnectionParams, InputRole, NeuronParam, Position};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn activation_family() {
        assert!(approx(activate(ActivationKind::Sigmoid, 0.5, 0.5), 0.5));
        assert!(approx(activate(ActivationKind::Relu, 0.2, 0.5), 0.0));
        assert!(approx(activate(ActivationKind::Relu, 3.0, 0.5), 2.5));
        assert_eq!(activate(ActivationKind::Threshold, 0.5, 0.5), 0.0);
        assert_eq!(activate(ActivationKind::Threshold, 0.51, 0.5), 1.0);
    }

    #[test]
    fn leaky_integrator_step() {
        assert!(approx(integrate(0.0, 0.5, 1.0, 0.05), 0.025));
        assert!(approx(integrate(1.0, 0.0, 2.0, 0.1), 0.95));
    }

    #[test]
    fn hidden_unit_from_single_active_source() {
        let mut g = Graph::new();
        let reward = g.insert_neuron(NeuronKind::Input(InputRole::Reward), Position::default());
        let vision = g.insert_neuron(NeuronKind::Input(InputRole::Vision), Position::default());
        let h = g.add_hidden_neuron(Position::default());
        g.add_connection(reward, h, ConnectionParams::default())
            .unwrap();
        g.add_connection(vision, h, ConnectionParams::default())
            .unwrap();
        g.set_activity(reward, 1.0);

        activation_pass(&mut g, 0.05);

        let a = g.activity(h).unwrap();
        let expected = 1.0 / (1.0 + (-(0.025f32 - 0.5)).exp());
        assert!(approx(a, expected));
        assert!(approx(a, 0.3834));
        assert_eq!(g.activity(reward), Some(1.0));
        assert_eq!(g.activity(vision), Some(0.0));
    }

    #[test]
    fn output_is_linear_and_clamped() {
        let mut g = Graph::new();
        let a = g.insert_neuron(NeuronKind::Input(InputRole::Vision), Position::default());
        let b = g.insert_neuron(NeuronKind::Input(InputRole::Vision), Position::default());
        let o = g.insert_neuron(NeuronKind::Output, Position::default());
        let o2 = g.insert_neuron(NeuronKind::Output, Position::default());
        g.add_connection(a, o, ConnectionParams { weight: 0.7, ..Default::default() })
            .unwrap();
        g.add_connection(b, o, ConnectionParams { weight: 0.6, ..Default::default() })
            .unwrap();
        g.add_connection(a, o2, ConnectionParams { weight: -0.4, ..Default::default() })
            .unwrap();
        g.set_activity(a, 1.0);
        g.set_activity(b, 1.0);

        activation_pass(&mut g, 0.1);
        assert_eq!(g.activity(o), Some(1.0));
        assert_eq!(g.activity(o2), Some(0.0));

        g.set_activity(b, 0.0);
        activation_pass(&mut g, 0.1);
        assert!(approx(g.activity(o).unwrap(), 0.7));
    }

    #[test]
    fn pass_reads_previous_tick_only() {
        // Chain in -> h1 -> out. After one pass `out` must still see h1's old
        // (zero) activity even though h1 was updated in the same pass.
        let mut g = Graph::new();
        let i = g.insert_neuron(NeuronKind::Input(InputRole::Vision), Position::default());
        let h1 = g.add_hidden_neuron(Position::default());
        let o = g.insert_neuron(NeuronKind::Output, Position::default());
        g.set_neuron_param(h1, NeuronParam::Activation(ActivationKind::Relu))
            .unwrap();
        g.set_neuron_param(h1, NeuronParam::Threshold(0.0)).unwrap();
        g.add_connection(i, h1, ConnectionParams { weight: 1.0, ..Default::default() })
            .unwrap();
        g.add_connection(h1, o, ConnectionParams { weight: 1.0, ..Default::default() })
            .unwrap();
        g.set_activity(i, 1.0);

        activation_pass(&mut g, 1.0);
        assert!(approx(g.activity(h1).unwrap(), 1.0));
        assert_eq!(g.activity(o), Some(0.0));

        activation_pass(&mut g, 1.0);
        assert!(approx(g.activity(o).unwrap(), 1.0));
    }

    #[test]
    fn relu_is_not_clamped_above() {
        let mut g = Graph::new();
        let i = g.insert_neuron(NeuronKind::Input(InputRole::Vision), Position::default());
        let h = g.add_hidden_neuron(Position::default());
        g.set_neuron_param(h, NeuronParam::Activation(ActivationKind::Relu))
            .unwrap();
        g.set_neuron_param(h, NeuronParam::Threshold(-2.0)).unwrap();
        g.add_connection(i, h, ConnectionParams { weight: 1.0, ..Default::default() })
            .unwrap();
        g.set_activity(i, 1.0);

        activation_pass(&mut g, 1.0);
        assert!(approx(g.activity(h).unwrap(), 3.0));
    }
}
