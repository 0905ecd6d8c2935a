//! Hebbian snake network: a small recurrent network of input, hidden and
//! output neurons that learns online while steering an agent around a grid.
//!
//! The engine is single-threaded and clock-agnostic. A host owns the timer,
//! feeds [`driver::TickDriver::tick`] the current instant and an
//! [`driver::Environment`], and edits the graph between ticks.

#[path = "core/error.rs"]
pub mod error;

#[path = "core/graph.rs"]
pub mod graph;

#[path = "core/activation.rs"]
pub mod activation;

#[path = "core/hebbian.rs"]
pub mod hebbian;

#[path = "core/wiring.rs"]
pub mod wiring;

#[path = "core/network.rs"]
pub mod network;

#[path = "core/driver.rs"]
pub mod driver;

#[path = "core/prng.rs"]
pub mod prng;

pub mod observer;
pub mod world;

#[cfg(feature = "serde")]
pub mod protocol;

pub mod prelude {
    pub use crate::driver::{DriverState, Environment, Senses, TickDriver, TickReport};
    pub use crate::error::{NetError, Result};
    pub use crate::graph::{
        ActivationKind, Connection, ConnectionParam, ConnectionParams, Graph, HiddenParams,
        InputRole, Neuron, NeuronKey, NeuronKind, NeuronParam, Position,
    };
    pub use crate::network::{Direction, Network, NetworkConfig, VisionGrid, VISION_SIZE};
    pub use crate::observer::{Diagnostics, NetworkSnapshot};
    pub use crate::wiring::{FullyConnect, Unwired, WiringPolicy};
    pub use crate::world::{World, WorldConfig};
}
