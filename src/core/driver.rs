//! Idle/Running tick state machine.
//!
//! The driver never schedules anything itself; the host calls [`TickDriver::tick`]
//! from whatever timer it owns and passes the wall-clock instant so `dt` tracks
//! real elapsed time instead of the nominal period.

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::network::{Direction, Network, VisionGrid};

/// What the world exposes to the network before a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Senses {
    pub vision: VisionGrid,
    pub reward_nearby: bool,
}

/// The agent's surroundings. Sensed before each tick, acted on after it.
pub trait Environment {
    fn sense(&mut self) -> Senses;
    fn act(&mut self, action: Direction);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DriverState {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub dt: f32,
    pub action: Direction,
}

/// Floor of the per-tick `dt` cap, in seconds. The cap itself is the larger
/// of this and two periods, so slow configured periods integrate in full and
/// only a stalled host gets truncated.
pub const DEFAULT_MAX_DT: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct TickDriver {
    state: DriverState,
    period: Duration,
    last_tick: Option<Instant>,
}

impl TickDriver {
    pub fn new(period: Duration) -> Self {
        Self {
            state: DriverState::Idle,
            period,
            last_tick: None,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Largest `dt` a single tick may integrate.
    pub fn max_dt(&self) -> f32 {
        (2.0 * self.period.as_secs_f32()).max(DEFAULT_MAX_DT)
    }

    /// Idle -> Running. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = DriverState::Running;
        // Time spent idle must not leak into the first dt.
        self.last_tick = None;
        debug!("tick driver started");
        true
    }

    /// Running -> Idle. Returns false if already idle.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = DriverState::Idle;
        self.last_tick = None;
        debug!("tick driver stopped");
        true
    }

    /// Restore the canonical network and go idle.
    pub fn reset(&mut self, network: &mut Network) {
        self.stop();
        network.reset();
    }

    /// Seconds since the previous tick; the nominal period for the first one.
    fn take_dt(&mut self, now: Instant) -> f32 {
        let elapsed = match self.last_tick {
            Some(prev) => now.saturating_duration_since(prev),
            None => self.period,
        };
        self.last_tick = Some(now);
        elapsed.as_secs_f32().min(self.max_dt())
    }

    /// Run one tick if running: sense, activation + learning, act.
    pub fn tick<E: Environment + ?Sized>(
        &mut self,
        network: &mut Network,
        env: &mut E,
        now: Instant,
    ) -> Option<TickReport> {
        if !self.is_running() {
            return None;
        }

        let dt = self.take_dt(now);

        let senses = env.sense();
        network.set_input_activities(&senses.vision, senses.reward_nearby);
        network.step(dt);
        let action = network.choose_action();
        env.act(action);

        trace!(tick = network.ticks(), dt, %action, "tick");
        Some(TickReport {
            tick: network.ticks(),
            dt,
            action,
        })
    }
}
