use core::fmt;

use hashbrown::HashMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NetError, Result};

/// Stable neuron identity. Keys are handed out in increasing order and never
/// reused while the graph lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct NeuronKey(pub u32);

impl NeuronKey {
    #[inline]
    fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NeuronKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InputRole {
    Vision,
    Reward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActivationKind {
    #[default]
    Sigmoid,
    Relu,
    Threshold,
}

impl ActivationKind {
    pub fn name(self) -> &'static str {
        match self {
            ActivationKind::Sigmoid => "sigmoid",
            ActivationKind::Relu => "relu",
            ActivationKind::Threshold => "threshold",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sigmoid" => Some(ActivationKind::Sigmoid),
            "relu" => Some(ActivationKind::Relu),
            "threshold" => Some(ActivationKind::Threshold),
            _ => None,
        }
    }
}

/// Tunables that only exist on hidden neurons.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HiddenParams {
    pub threshold: f32,
    /// Leaky-integrator time constant; always > 0.
    pub tau: f32,
    pub activation: ActivationKind,
}

impl Default for HiddenParams {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            tau: 1.0,
            activation: ActivationKind::Sigmoid,
        }
    }
}

impl HiddenParams {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(NetError::InvalidParameter {
                field: "threshold",
                value: self.threshold,
            });
        }
        if !self.tau.is_finite() || self.tau <= 0.0 {
            return Err(NetError::InvalidParameter {
                field: "tau",
                value: self.tau,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NeuronKind {
    Input(InputRole),
    Hidden(HiddenParams),
    Output,
}

impl NeuronKind {
    pub fn name(&self) -> &'static str {
        match self {
            NeuronKind::Input(_) => "input",
            NeuronKind::Hidden(_) => "hidden",
            NeuronKind::Output => "output",
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, NeuronKind::Input(_))
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, NeuronKind::Hidden(_))
    }

    pub fn is_output(&self) -> bool {
        matches!(self, NeuronKind::Output)
    }
}

/// Layout hint for renderers. The engine never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Neuron {
    pub key: NeuronKey,
    pub kind: NeuronKind,
    pub position: Position,
}

impl Neuron {
    pub fn hidden_params(&self) -> Option<&HiddenParams> {
        match &self.kind {
            NeuronKind::Hidden(p) => Some(p),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Connection {
    pub from: NeuronKey,
    pub to: NeuronKey,
    pub weight: f32,
    pub learning_rate: f32,
    pub decay: f32,
}

pub const WEIGHT_LIMIT: f32 = 1.0;
/// Decay must stay strictly below 1.
pub const MAX_DECAY: f32 = 0.999;

/// Creation parameters of a connection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConnectionParams {
    pub weight: f32,
    pub learning_rate: f32,
    pub decay: f32,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            weight: 0.5,
            learning_rate: 0.1,
            decay: 0.01,
        }
    }
}

impl ConnectionParams {
    /// Reject non-finite values, then clamp each field into its range.
    pub fn sanitized(self) -> Result<Self> {
        Ok(Self {
            weight: clamp_weight(self.weight)?,
            learning_rate: clamp_learning_rate(self.learning_rate)?,
            decay: clamp_decay(self.decay)?,
        })
    }
}

/// A single editable field of a connection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "field", content = "value", rename_all = "snake_case"))]
pub enum ConnectionParam {
    Weight(f32),
    LearningRate(f32),
    Decay(f32),
}

/// A single editable field of a neuron.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "field", content = "value", rename_all = "snake_case"))]
pub enum NeuronParam {
    Threshold(f32),
    Tau(f32),
    Activation(ActivationKind),
    Position(Position),
}

impl NeuronParam {
    pub fn field_name(&self) -> &'static str {
        match self {
            NeuronParam::Threshold(_) => "threshold",
            NeuronParam::Tau(_) => "tau",
            NeuronParam::Activation(_) => "activation",
            NeuronParam::Position(_) => "position",
        }
    }
}

fn finite(field: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NetError::InvalidParameter { field, value })
    }
}

fn clamp_weight(w: f32) -> Result<f32> {
    Ok(finite("weight", w)?.clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT))
}

fn clamp_learning_rate(lr: f32) -> Result<f32> {
    Ok(finite("learning_rate", lr)?.max(0.0))
}

fn clamp_decay(d: f32) -> Result<f32> {
    Ok(finite("decay", d)?.clamp(0.0, MAX_DECAY))
}

/// Canonical owner of neurons and connections.
///
/// Neurons live in key-indexed slots so lookups are O(1); per-neuron incidence
/// lists make deletion cascades O(degree). Activity is kept in two buffers so
/// the activation pass can read last tick's values while writing the next.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    slots: Vec<Option<Neuron>>,
    activity: Vec<f32>,
    next_activity: Vec<f32>,
    incoming: Vec<Vec<NeuronKey>>,
    outgoing: Vec<Vec<NeuronKey>>,

    edges: Vec<Connection>,
    edge_index: HashMap<(NeuronKey, NeuronKey), usize>,

    live: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_neuron(&mut self, kind: NeuronKind, position: Position) -> NeuronKey {
        let key = NeuronKey(self.slots.len() as u32);
        self.slots.push(Some(Neuron {
            key,
            kind,
            position,
        }));
        self.activity.push(0.0);
        self.next_activity.push(0.0);
        self.incoming.push(Vec::new());
        self.outgoing.push(Vec::new());
        self.live += 1;
        key
    }

    /// Create a bare hidden neuron with default parameters and zero activity.
    pub fn add_hidden_neuron(&mut self, position: Position) -> NeuronKey {
        self.add_hidden_with(position, HiddenParams::default())
    }

    /// `params` must already satisfy [`HiddenParams::validate`].
    pub(crate) fn add_hidden_with(&mut self, position: Position, params: HiddenParams) -> NeuronKey {
        let key = self.insert_neuron(NeuronKind::Hidden(params), position);
        debug!(%key, "hidden neuron added");
        key
    }

    /// Remove a hidden neuron together with every connection touching it.
    ///
    /// Returns the number of connections removed by the cascade.
    pub fn remove_hidden_neuron(&mut self, key: NeuronKey) -> Result<usize> {
        match self.neuron(key) {
            Some(n) if n.kind.is_hidden() => {}
            _ => return Err(NetError::NeuronNotFound(key)),
        }

        let mut pairs: Vec<(NeuronKey, NeuronKey)> = self.incoming[key.slot()]
            .iter()
            .map(|&from| (from, key))
            .collect();
        pairs.extend(self.outgoing[key.slot()].iter().map(|&to| (key, to)));

        let mut removed = 0;
        for (from, to) in pairs {
            // Self-loops appear in both lists; the second detach is a no-op.
            if self.detach_edge(from, to).is_some() {
                removed += 1;
            }
        }

        self.slots[key.slot()] = None;
        self.activity[key.slot()] = 0.0;
        self.next_activity[key.slot()] = 0.0;
        self.live -= 1;

        debug!(%key, removed, "hidden neuron removed");
        Ok(removed)
    }

    /// Insert a connection. At most one edge may exist between any unordered
    /// pair of neurons, so `(to, from)` blocks `(from, to)` as well.
    pub fn add_connection(
        &mut self,
        from: NeuronKey,
        to: NeuronKey,
        params: ConnectionParams,
    ) -> Result<()> {
        if !self.contains(from) {
            return Err(NetError::InvalidEndpoint(from));
        }
        if !self.contains(to) {
            return Err(NetError::InvalidEndpoint(to));
        }
        if self.edge_index.contains_key(&(from, to)) || self.edge_index.contains_key(&(to, from)) {
            return Err(NetError::DuplicateConnection { from, to });
        }
        let params = params.sanitized()?;

        let idx = self.edges.len();
        self.edges.push(Connection {
            from,
            to,
            weight: params.weight,
            learning_rate: params.learning_rate,
            decay: params.decay,
        });
        self.edge_index.insert((from, to), idx);
        self.outgoing[from.slot()].push(to);
        self.incoming[to.slot()].push(from);

        debug!(%from, %to, weight = params.weight, "connection added");
        Ok(())
    }

    pub fn remove_connection(&mut self, from: NeuronKey, to: NeuronKey) -> Result<Connection> {
        let removed = self
            .detach_edge(from, to)
            .ok_or(NetError::ConnectionNotFound { from, to })?;
        debug!(%from, %to, "connection removed");
        Ok(removed)
    }

    pub fn set_connection_param(
        &mut self,
        from: NeuronKey,
        to: NeuronKey,
        param: ConnectionParam,
    ) -> Result<()> {
        let idx = *self
            .edge_index
            .get(&(from, to))
            .ok_or(NetError::ConnectionNotFound { from, to })?;
        let c = &mut self.edges[idx];
        match param {
            ConnectionParam::Weight(w) => c.weight = clamp_weight(w)?,
            ConnectionParam::LearningRate(lr) => c.learning_rate = clamp_learning_rate(lr)?,
            ConnectionParam::Decay(d) => c.decay = clamp_decay(d)?,
        }
        Ok(())
    }

    pub fn set_neuron_param(&mut self, key: NeuronKey, param: NeuronParam) -> Result<()> {
        let neuron = self
            .slots
            .get_mut(key.slot())
            .and_then(Option::as_mut)
            .ok_or(NetError::NeuronNotFound(key))?;

        if let NeuronParam::Position(p) = param {
            neuron.position = p;
            return Ok(());
        }

        let kind_name = neuron.kind.name();
        let NeuronKind::Hidden(hp) = &mut neuron.kind else {
            return Err(NetError::InvalidKind {
                key,
                kind: kind_name,
                field: param.field_name(),
            });
        };

        match param {
            NeuronParam::Threshold(t) => hp.threshold = finite("threshold", t)?,
            NeuronParam::Tau(tau) => {
                if !tau.is_finite() || tau <= 0.0 {
                    return Err(NetError::InvalidParameter {
                        field: "tau",
                        value: tau,
                    });
                }
                hp.tau = tau;
            }
            NeuronParam::Activation(a) => hp.activation = a,
            NeuronParam::Position(p) => neuron.position = p,
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────────────

    pub fn contains(&self, key: NeuronKey) -> bool {
        self.neuron(key).is_some()
    }

    pub fn neuron(&self, key: NeuronKey) -> Option<&Neuron> {
        self.slots.get(key.slot()).and_then(Option::as_ref)
    }

    /// Live neurons in key order.
    pub fn neurons(&self) -> impl Iterator<Item = &Neuron> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn neuron_count(&self) -> usize {
        self.live
    }

    pub fn count_where(&self, pred: impl Fn(&NeuronKind) -> bool) -> usize {
        self.neurons().filter(|n| pred(&n.kind)).count()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.edges
    }

    pub fn connection_count(&self) -> usize {
        self.edges.len()
    }

    pub fn connection(&self, from: NeuronKey, to: NeuronKey) -> Option<&Connection> {
        self.edge_index.get(&(from, to)).map(|&i| &self.edges[i])
    }

    /// Sources of every connection ending at `key`.
    pub fn incoming(&self, key: NeuronKey) -> &[NeuronKey] {
        match self.neuron(key) {
            Some(_) => &self.incoming[key.slot()],
            None => &[],
        }
    }

    /// Targets of every connection starting at `key`.
    pub fn outgoing(&self, key: NeuronKey) -> &[NeuronKey] {
        match self.neuron(key) {
            Some(_) => &self.outgoing[key.slot()],
            None => &[],
        }
    }

    /// Every connection with `key` as either endpoint.
    pub fn incident(&self, key: NeuronKey) -> impl Iterator<Item = &Connection> + '_ {
        let ins = self.incoming(key).iter().map(move |&from| (from, key));
        let outs = self
            .outgoing(key)
            .iter()
            .filter(move |&&to| to != key)
            .map(move |&to| (key, to));
        ins.chain(outs)
            .filter_map(move |(f, t)| self.connection(f, t))
    }

    pub fn activity(&self, key: NeuronKey) -> Option<f32> {
        self.neuron(key).map(|_| self.activity[key.slot()])
    }

    // ─────────────────────────────────────────────────────────────────────
    // Engine access
    // ─────────────────────────────────────────────────────────────────────

    pub(crate) fn set_activity(&mut self, key: NeuronKey, value: f32) {
        if self.contains(key) {
            self.activity[key.slot()] = value;
        }
    }

    /// Split borrow for the activation pass: slots, edges, current activity
    /// (read) and the next-activity buffer (write).
    pub(crate) fn activation_view(
        &mut self,
    ) -> (&[Option<Neuron>], &[Connection], &[f32], &mut [f32]) {
        (
            &self.slots,
            &self.edges,
            &self.activity,
            &mut self.next_activity,
        )
    }

    /// Publish the next-activity buffer as current.
    pub(crate) fn swap_activity(&mut self) {
        core::mem::swap(&mut self.activity, &mut self.next_activity);
    }

    /// Split borrow for the learning pass.
    pub(crate) fn learning_view(&mut self) -> (&mut [Connection], &[f32]) {
        (&mut self.edges, &self.activity)
    }

    fn detach_edge(&mut self, from: NeuronKey, to: NeuronKey) -> Option<Connection> {
        let idx = self.edge_index.remove(&(from, to))?;
        let removed = self.edges.swap_remove(idx);
        if let Some(moved) = self.edges.get(idx) {
            self.edge_index.insert((moved.from, moved.to), idx);
        }
        remove_key(&mut self.outgoing[from.slot()], to);
        remove_key(&mut self.incoming[to.slot()], from);
        Some(removed)
    }
}

fn remove_key(list: &mut Vec<NeuronKey>, key: NeuronKey) {
    if let Some(pos) = list.iter().position(|&k| k == key) {
        list.swap_remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(n_inputs: usize, n_outputs: usize) -> (Graph, Vec<NeuronKey>, Vec<NeuronKey>) {
        let mut g = Graph::new();
        let ins = (0..n_inputs)
            .map(|_| g.insert_neuron(NeuronKind::Input(InputRole::Vision), Position::default()))
            .collect();
        let outs = (0..n_outputs)
            .map(|_| g.insert_neuron(NeuronKind::Output, Position::default()))
            .collect();
        (g, ins, outs)
    }

    #[test]
    fn hidden_neuron_gets_defaults_and_fresh_key() {
        let (mut g, _, _) = graph_with(2, 1);
        let a = g.add_hidden_neuron(Position::new(1.0, 2.0));
        let b = g.add_hidden_neuron(Position::default());
        assert_ne!(a, b);

        let n = g.neuron(a).unwrap();
        assert_eq!(n.hidden_params(), Some(&HiddenParams::default()));
        assert_eq!(n.position, Position::new(1.0, 2.0));
        assert_eq!(g.activity(a), Some(0.0));
        assert_eq!(g.incident(a).count(), 0);
    }

    #[test]
    fn keys_are_not_reused_after_removal() {
        let (mut g, _, _) = graph_with(0, 0);
        let a = g.add_hidden_neuron(Position::default());
        g.remove_hidden_neuron(a).unwrap();
        let b = g.add_hidden_neuron(Position::default());
        assert_ne!(a, b);
        assert!(!g.contains(a));
    }

    #[test]
    fn removing_hidden_neuron_cascades_to_connections() {
        let (mut g, ins, outs) = graph_with(3, 2);
        let h = g.add_hidden_neuron(Position::default());
        let other = g.add_hidden_neuron(Position::default());
        for &i in &ins {
            g.add_connection(i, h, ConnectionParams::default()).unwrap();
        }
        for &o in &outs {
            g.add_connection(h, o, ConnectionParams::default()).unwrap();
        }
        g.add_connection(h, h, ConnectionParams::default()).unwrap();
        g.add_connection(ins[0], other, ConnectionParams::default())
            .unwrap();

        let removed = g.remove_hidden_neuron(h).unwrap();
        assert_eq!(removed, 6);
        assert_eq!(g.connection_count(), 1);
        assert!(g.connections().iter().all(|c| c.from != h && c.to != h));
        assert_eq!(g.outgoing(ins[0]), &[other]);
        assert!(g.incoming(outs[0]).is_empty());
        // The surviving edge is still reachable through the index.
        assert!(g.connection(ins[0], other).is_some());
    }

    #[test]
    fn remove_rejects_non_hidden_and_missing() {
        let (mut g, ins, outs) = graph_with(1, 1);
        assert_eq!(
            g.remove_hidden_neuron(ins[0]),
            Err(NetError::NeuronNotFound(ins[0]))
        );
        assert_eq!(
            g.remove_hidden_neuron(outs[0]),
            Err(NetError::NeuronNotFound(outs[0]))
        );
        assert_eq!(
            g.remove_hidden_neuron(NeuronKey(99)),
            Err(NetError::NeuronNotFound(NeuronKey(99)))
        );
        assert_eq!(g.neuron_count(), 2);
    }

    #[test]
    fn connection_endpoints_must_exist() {
        let (mut g, ins, _) = graph_with(1, 0);
        let err = g
            .add_connection(ins[0], NeuronKey(42), ConnectionParams::default())
            .unwrap_err();
        assert_eq!(err, NetError::InvalidEndpoint(NeuronKey(42)));
        assert_eq!(g.connection_count(), 0);
    }

    #[test]
    fn duplicate_in_either_direction_is_rejected() {
        let (mut g, ins, outs) = graph_with(1, 1);
        g.add_connection(ins[0], outs[0], ConnectionParams::default())
            .unwrap();
        assert!(matches!(
            g.add_connection(ins[0], outs[0], ConnectionParams::default()),
            Err(NetError::DuplicateConnection { .. })
        ));
        assert!(matches!(
            g.add_connection(outs[0], ins[0], ConnectionParams::default()),
            Err(NetError::DuplicateConnection { .. })
        ));
        assert_eq!(g.connection_count(), 1);
    }

    #[test]
    fn remove_connection_twice_reports_not_found() {
        let (mut g, ins, outs) = graph_with(2, 1);
        g.add_connection(ins[0], outs[0], ConnectionParams::default())
            .unwrap();
        g.add_connection(ins[1], outs[0], ConnectionParams::default())
            .unwrap();

        g.remove_connection(ins[0], outs[0]).unwrap();
        let err = g.remove_connection(ins[0], outs[0]).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(g.connection_count(), 1);
        assert_eq!(g.incoming(outs[0]), &[ins[1]]);
    }

    #[test]
    fn connection_params_are_clamped() {
        let (mut g, ins, outs) = graph_with(1, 1);
        g.add_connection(
            ins[0],
            outs[0],
            ConnectionParams {
                weight: 3.0,
                learning_rate: -1.0,
                decay: 1.5,
            },
        )
        .unwrap();
        let c = g.connection(ins[0], outs[0]).unwrap();
        assert_eq!(c.weight, 1.0);
        assert_eq!(c.learning_rate, 0.0);
        assert_eq!(c.decay, MAX_DECAY);

        g.set_connection_param(ins[0], outs[0], ConnectionParam::Weight(-7.0))
            .unwrap();
        assert_eq!(g.connection(ins[0], outs[0]).unwrap().weight, -1.0);

        let err = g
            .set_connection_param(ins[0], outs[0], ConnectionParam::Decay(f32::NAN))
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
        assert!(g
            .set_connection_param(outs[0], ins[0], ConnectionParam::Weight(0.1))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn neuron_params_respect_kind() {
        let (mut g, _, outs) = graph_with(0, 1);
        let h = g.add_hidden_neuron(Position::default());

        g.set_neuron_param(h, NeuronParam::Threshold(0.2)).unwrap();
        g.set_neuron_param(h, NeuronParam::Activation(ActivationKind::Relu))
            .unwrap();
        let hp = *g.neuron(h).unwrap().hidden_params().unwrap();
        assert_eq!(hp.threshold, 0.2);
        assert_eq!(hp.activation, ActivationKind::Relu);

        let err = g
            .set_neuron_param(outs[0], NeuronParam::Threshold(0.3))
            .unwrap_err();
        assert!(matches!(
            err,
            NetError::InvalidKind {
                field: "threshold",
                ..
            }
        ));

        // Position is editable on every kind.
        g.set_neuron_param(outs[0], NeuronParam::Position(Position::new(5.0, 5.0)))
            .unwrap();
        assert_eq!(g.neuron(outs[0]).unwrap().position, Position::new(5.0, 5.0));
    }

    #[test]
    fn non_positive_tau_is_rejected() {
        let (mut g, _, _) = graph_with(0, 0);
        let h = g.add_hidden_neuron(Position::default());
        for bad in [0.0, -1.0, f32::INFINITY] {
            assert_eq!(
                g.set_neuron_param(h, NeuronParam::Tau(bad)).unwrap_err().kind(),
                "invalid_parameter"
            );
        }
        assert_eq!(g.neuron(h).unwrap().hidden_params().unwrap().tau, 1.0);
    }

    #[test]
    fn incident_lists_self_loop_once() {
        let (mut g, ins, _) = graph_with(1, 0);
        let h = g.add_hidden_neuron(Position::default());
        g.add_connection(h, h, ConnectionParams::default()).unwrap();
        g.add_connection(ins[0], h, ConnectionParams::default())
            .unwrap();
        assert_eq!(g.incident(h).count(), 2);
    }
}
