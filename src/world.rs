//! Headless snake world: a wraparound grid of reward cells and one agent.
//!
//! Each tick the agent sees a 5x5 window centred on itself; stepping onto a
//! reward consumes it and a replacement spawns on a random empty cell.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::driver::{Environment, Senses};
use crate::network::{Direction, VisionGrid, VISION_SIZE};
use crate::prng::Prng;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Side length of the square world.
    pub size: usize,
    /// Rewards present at any time (capped by the free cells).
    pub reward_count: usize,
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 100,
            reward_count: 400,
            seed: 1,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.size < VISION_SIZE {
            return Err("world size must be at least the vision size");
        }
        if self.reward_count >= self.size * self.size {
            return Err("reward_count must leave at least one free cell");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldStats {
    pub steps: u64,
    pub collected: u64,
}

#[derive(Debug, Clone)]
pub struct World {
    size: usize,
    cells: Vec<bool>,
    agent: (usize, usize),
    rng: Prng,
    stats: WorldStats,
}

impl World {
    pub fn new(cfg: WorldConfig) -> Self {
        let size = cfg.size.max(VISION_SIZE);
        let mut world = Self {
            size,
            cells: vec![false; size * size],
            agent: (1 % size, 1 % size),
            rng: Prng::new(cfg.seed),
            stats: WorldStats::default(),
        };
        let target = cfg.reward_count.min(size * size - 1);
        for _ in 0..target {
            world.spawn_reward();
        }
        world
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn agent(&self) -> (usize, usize) {
        self.agent
    }

    pub fn stats(&self) -> WorldStats {
        self.stats
    }

    #[cfg(test)]
    fn has_reward(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.cells[self.idx(x, y)]
    }

    pub fn reward_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    #[cfg(test)]
    fn place_reward(&mut self, x: usize, y: usize) {
        if x < self.size && y < self.size {
            let i = self.idx(x, y);
            self.cells[i] = true;
        }
    }

    #[cfg(test)]
    fn clear_rewards(&mut self) {
        self.cells.fill(false);
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    fn wrap(&self, v: i64) -> usize {
        v.rem_euclid(self.size as i64) as usize
    }

    /// 5x5 window centred on the agent, wrapping at the edges.
    pub fn vision(&self) -> VisionGrid {
        let half = (VISION_SIZE / 2) as i64;
        let (ax, ay) = (self.agent.0 as i64, self.agent.1 as i64);
        let mut grid: VisionGrid = [[0; VISION_SIZE]; VISION_SIZE];
        for (gy, row) in grid.iter_mut().enumerate() {
            for (gx, cell) in row.iter_mut().enumerate() {
                let wx = self.wrap(ax - half + gx as i64);
                let wy = self.wrap(ay - half + gy as i64);
                *cell = self.cells[self.idx(wx, wy)] as u8;
            }
        }
        grid
    }

    /// Consume a reward under the agent, respawning one elsewhere.
    fn collect(&mut self) -> bool {
        let i = self.idx(self.agent.0, self.agent.1);
        if !self.cells[i] {
            return false;
        }
        self.cells[i] = false;
        self.spawn_reward();
        self.stats.collected += 1;
        trace!(x = self.agent.0, y = self.agent.1, "reward collected");
        true
    }

    fn spawn_reward(&mut self) {
        let n = self.cells.len();
        // Random probing first; fall back to a scan when the grid is crowded.
        for _ in 0..64 {
            let i = self.rng.below(n);
            if !self.cells[i] {
                self.cells[i] = true;
                return;
            }
        }
        let start = self.rng.below(n);
        if let Some(i) = (0..n).map(|k| (start + k) % n).find(|&i| !self.cells[i]) {
            self.cells[i] = true;
        }
    }

    pub fn move_agent(&mut self, dir: Direction) {
        let (dx, dy) = dir.delta();
        self.agent = (
            self.wrap(self.agent.0 as i64 + dx),
            self.wrap(self.agent.1 as i64 + dy),
        );
        self.stats.steps += 1;
    }
}

impl Environment for World {
    fn sense(&mut self) -> Senses {
        let vision = self.vision();
        let reward_nearby = self.collect();
        Senses {
            vision,
            reward_nearby,
        }
    }

    fn act(&mut self, action: Direction) {
        self.move_agent(action);
    }
}
