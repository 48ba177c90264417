//! Random draw sources for particle placement
//!
//! The aggregation engine consumes draws in a fixed order: the seed position
//! once, then per particle its spawn samples (x before y) followed by its
//! walk steps (dx before dy). Hiding the generator behind [`WalkSource`]
//! lets tests replay a scripted sequence through the same code path.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Supplier of the random draws the aggregation engine needs
pub trait WalkSource {
    /// Uniform position in `[lo, hi)` on both axes, x drawn first
    fn next_position(&mut self, lo: usize, hi: usize) -> (i32, i32);

    /// Step delta with each component drawn independently from the given
    /// inclusive ranges, dx drawn first
    fn next_step(&mut self, x_range: (i32, i32), y_range: (i32, i32)) -> (i32, i32);
}

/// Reproducible source backed by a seeded `StdRng`
#[derive(Debug, Clone)]
pub struct SeededWalk {
    rng: StdRng,
    seed: u64,
}

impl SeededWalk {
    /// Create a deterministic source
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed the source was created with
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl WalkSource for SeededWalk {
    fn next_position(&mut self, lo: usize, hi: usize) -> (i32, i32) {
        if hi <= lo {
            return (lo as i32, lo as i32);
        }
        let x = self.rng.random_range(lo..hi);
        let y = self.rng.random_range(lo..hi);
        (x as i32, y as i32)
    }

    fn next_step(&mut self, x_range: (i32, i32), y_range: (i32, i32)) -> (i32, i32) {
        let dx = self.rng.random_range(x_range.0..=x_range.1);
        let dy = self.rng.random_range(y_range.0..=y_range.1);
        (dx, dy)
    }
}

/// Replays a fixed list of draws; used for tests and replays
///
/// Positions and steps are queued separately. Values are clamped into the
/// requested range so a script written for one grid size stays valid. An
/// exhausted queue yields the low end of the range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedWalk {
    positions: VecDeque<(i32, i32)>,
    steps: VecDeque<(i32, i32)>,
}

impl ScriptedWalk {
    /// Create a script from position and step queues
    pub fn new(positions: Vec<(i32, i32)>, steps: Vec<(i32, i32)>) -> Self {
        Self {
            positions: positions.into(),
            steps: steps.into(),
        }
    }

    /// Append a position draw
    pub fn push_position(&mut self, x: i32, y: i32) {
        self.positions.push_back((x, y));
    }

    /// Append a step draw
    pub fn push_step(&mut self, dx: i32, dy: i32) {
        self.steps.push_back((dx, dy));
    }

    /// Draws not yet consumed, as `(positions, steps)`
    pub fn remaining(&self) -> (usize, usize) {
        (self.positions.len(), self.steps.len())
    }
}

impl WalkSource for ScriptedWalk {
    fn next_position(&mut self, lo: usize, hi: usize) -> (i32, i32) {
        let lo = lo as i32;
        let hi = (hi as i32 - 1).max(lo);
        let (x, y) = self.positions.pop_front().unwrap_or((lo, lo));
        (x.clamp(lo, hi), y.clamp(lo, hi))
    }

    fn next_step(&mut self, x_range: (i32, i32), y_range: (i32, i32)) -> (i32, i32) {
        let (dx, dy) = self.steps.pop_front().unwrap_or((x_range.0, y_range.0));
        (dx.clamp(x_range.0, x_range.1), dy.clamp(y_range.0, y_range.1))
    }
}
