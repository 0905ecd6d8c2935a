use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::activation::activation_pass;
use crate::error::{NetError, Result};
use crate::graph::{
    ConnectionParam, ConnectionParams, Graph, HiddenParams, InputRole, NeuronKey, NeuronKind,
    NeuronParam, Position,
};
use crate::hebbian::learning_pass;
use crate::wiring::{FullyConnect, WiringPolicy};

/// Side length of the vision window.
pub const VISION_SIZE: usize = 5;
pub const VISION_CELLS: usize = VISION_SIZE * VISION_SIZE;

/// `grid[y][x]`, non-zero meaning "reward visible".
pub type VisionGrid = [[u8; VISION_SIZE]; VISION_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Canonical order; also the tie-break order for action selection.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Grid offset, with y growing downwards.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defaults applied to user-created structure.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkConfig {
    /// Parameters given to connections made by the default wiring.
    pub wiring: ConnectionParams,
    /// Parameters given to new hidden neurons.
    pub hidden: HiddenParams,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            wiring: ConnectionParams::default(),
            hidden: HiddenParams::default(),
        }
    }
}

impl NetworkConfig {
    pub fn with_wiring(mut self, params: ConnectionParams) -> Self {
        self.wiring = params;
        self
    }

    pub fn with_hidden(mut self, params: HiddenParams) -> Self {
        self.hidden = params;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.hidden.validate()?;
        self.wiring.sanitized()?;
        Ok(())
    }
}

// Layout of the canonical neurons, in renderer units.
const VISION_ORIGIN: Position = Position::new(40.0, 60.0);
const VISION_SPACING: f32 = 30.0;
const REWARD_POS: Position = Position::new(100.0, 240.0);
const OUTPUT_X: f32 = 420.0;
const OUTPUT_Y0: f32 = 90.0;
const OUTPUT_SPACING: f32 = 40.0;

/// The aggregate: canonical input/output neurons plus user-built structure.
#[derive(Debug, Clone)]
pub struct Network {
    cfg: NetworkConfig,
    graph: Graph,
    vision: [NeuronKey; VISION_CELLS],
    reward: NeuronKey,
    outputs: [NeuronKey; 4],
    ticks: u64,
}

impl Default for Network {
    fn default() -> Self {
        Self::build(NetworkConfig::default())
    }
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical network with custom defaults for user-built structure.
    pub fn with_config(cfg: NetworkConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::build(cfg))
    }

    /// Build the canonical topology: 25 vision inputs, one reward input, one
    /// output per direction, nothing else.
    fn build(cfg: NetworkConfig) -> Self {
        let mut graph = Graph::new();

        let mut vision = [NeuronKey(0); VISION_CELLS];
        for (idx, key) in vision.iter_mut().enumerate() {
            let (x, y) = (idx % VISION_SIZE, idx / VISION_SIZE);
            *key = graph.insert_neuron(
                NeuronKind::Input(InputRole::Vision),
                Position::new(
                    VISION_ORIGIN.x + x as f32 * VISION_SPACING,
                    VISION_ORIGIN.y + y as f32 * VISION_SPACING,
                ),
            );
        }
        let reward = graph.insert_neuron(NeuronKind::Input(InputRole::Reward), REWARD_POS);

        let mut outputs = [NeuronKey(0); 4];
        for (i, key) in outputs.iter_mut().enumerate() {
            *key = graph.insert_neuron(
                NeuronKind::Output,
                Position::new(OUTPUT_X, OUTPUT_Y0 + i as f32 * OUTPUT_SPACING),
            );
        }

        Self {
            cfg,
            graph,
            vision,
            reward,
            outputs,
            ticks: 0,
        }
    }

    /// Discard all hidden neurons, connections and activity.
    pub fn reset(&mut self) {
        *self = Self::build(self.cfg);
        debug!("network reset to canonical topology");
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.cfg
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn vision_key(&self, x: usize, y: usize) -> Option<NeuronKey> {
        if x >= VISION_SIZE || y >= VISION_SIZE {
            return None;
        }
        Some(self.vision[y * VISION_SIZE + x])
    }

    pub fn vision_keys(&self) -> &[NeuronKey; VISION_CELLS] {
        &self.vision
    }

    pub fn reward_key(&self) -> NeuronKey {
        self.reward
    }

    pub fn output_key(&self, dir: Direction) -> NeuronKey {
        self.outputs[dir as usize]
    }

    // ─────────────────────────────────────────────────────────────────────
    // World I/O
    // ─────────────────────────────────────────────────────────────────────

    /// Write input activities ahead of a tick.
    pub fn set_input_activities(&mut self, vision: &VisionGrid, reward_nearby: bool) {
        for (y, row) in vision.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                let v = if cell != 0 { 1.0 } else { 0.0 };
                self.graph.set_activity(self.vision[y * VISION_SIZE + x], v);
            }
        }
        self.graph
            .set_activity(self.reward, if reward_nearby { 1.0 } else { 0.0 });
    }

    /// Set a single input neuron, clamped to [0, 1].
    pub fn set_input_activity(&mut self, key: NeuronKey, value: f32) -> Result<()> {
        let neuron = self
            .graph
            .neuron(key)
            .ok_or(NetError::NeuronNotFound(key))?;
        if !neuron.kind.is_input() {
            return Err(NetError::InvalidKind {
                key,
                kind: neuron.kind.name(),
                field: "activity",
            });
        }
        if !value.is_finite() {
            return Err(NetError::InvalidParameter {
                field: "activity",
                value,
            });
        }
        self.graph.set_activity(key, value.clamp(0.0, 1.0));
        Ok(())
    }

    pub fn output_activity(&self, dir: Direction) -> f32 {
        self.graph.activity(self.output_key(dir)).unwrap_or(0.0)
    }

    /// Most active output; ties go to the earliest direction in canonical order.
    pub fn choose_action(&self) -> Direction {
        let mut best = Direction::Up;
        let mut best_activity = self.output_activity(best);
        for dir in Direction::ALL.into_iter().skip(1) {
            let a = self.output_activity(dir);
            if a > best_activity {
                best = dir;
                best_activity = a;
            }
        }
        best
    }

    // ─────────────────────────────────────────────────────────────────────
    // Simulation
    // ─────────────────────────────────────────────────────────────────────

    /// Activation pass then learning pass.
    pub fn step(&mut self, dt: f32) {
        activation_pass(&mut self.graph, dt);
        learning_pass(&mut self.graph);
        self.ticks = self.ticks.wrapping_add(1);
        trace!(tick = self.ticks, dt, "network stepped");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────

    /// Bare hidden neuron with the configured hidden parameters.
    pub fn add_hidden_neuron(&mut self, position: Position) -> NeuronKey {
        self.graph.add_hidden_with(position, self.cfg.hidden)
    }

    /// The editor's "add" gesture: a hidden neuron wired by `policy`.
    ///
    /// If wiring fails the neuron is removed again so the graph is unchanged.
    pub fn add_hidden_wired(
        &mut self,
        position: Position,
        policy: &dyn WiringPolicy,
    ) -> Result<NeuronKey> {
        let key = self.add_hidden_neuron(position);
        match policy.wire_hidden(&mut self.graph, key) {
            Ok(made) => {
                debug!(%key, connections = made, "hidden neuron wired");
                Ok(key)
            }
            Err(e) => {
                self.graph.remove_hidden_neuron(key)?;
                Err(e)
            }
        }
    }

    /// `add_hidden_wired` with the fully-connected default policy.
    pub fn add_hidden_default(&mut self, position: Position) -> Result<NeuronKey> {
        let policy = FullyConnect::new(self.cfg.wiring);
        self.add_hidden_wired(position, &policy)
    }

    pub fn remove_hidden_neuron(&mut self, key: NeuronKey) -> Result<usize> {
        self.graph.remove_hidden_neuron(key)
    }

    pub fn add_connection(
        &mut self,
        from: NeuronKey,
        to: NeuronKey,
        params: ConnectionParams,
    ) -> Result<()> {
        self.graph.add_connection(from, to, params)
    }

    pub fn remove_connection(&mut self, from: NeuronKey, to: NeuronKey) -> Result<()> {
        self.graph.remove_connection(from, to).map(|_| ())
    }

    pub fn set_connection_param(
        &mut self,
        from: NeuronKey,
        to: NeuronKey,
        param: ConnectionParam,
    ) -> Result<()> {
        self.graph.set_connection_param(from, to, param)
    }

    pub fn set_neuron_param(&mut self, key: NeuronKey, param: NeuronParam) -> Result<()> {
        self.graph.set_neuron_param(key, param)
    }
}
