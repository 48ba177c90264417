//! Weight assignment strategies for the stick graph
//!
//! Which end of a ridge should be brightest is a visual choice, so the
//! assignment is pluggable. Tips-brightest is the default.

use crate::algorithm::stick_graph::StickGraph;
use crate::io::configuration::{MAX_INTENSITY, SEED_DISTANCE_FALLOFF};

/// Reassigns node weights across a whole graph
pub trait WeightStrategy {
    /// Overwrite the weight of every node that the strategy covers
    fn assign(&self, graph: &mut StickGraph);
}

/// Branch tips get the maximum weight, everything else is left alone
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalTips;

impl WeightStrategy for TerminalTips {
    fn assign(&self, graph: &mut StickGraph) {
        graph.assign_terminal_weights();
    }
}

/// Brightness falls off with the number of hops to the seed
#[derive(Debug, Clone, Copy)]
pub struct SeedDistance {
    /// Weight lost per hop
    pub falloff: i32,
}

impl Default for SeedDistance {
    fn default() -> Self {
        Self {
            falloff: SEED_DISTANCE_FALLOFF,
        }
    }
}

impl SeedDistance {
    /// Hop count from every node to its root, indexed like the arena
    ///
    /// Arena order is not topological after refinement, so depths are
    /// resolved by walking up to the nearest node with a known depth.
    pub fn depths(graph: &StickGraph) -> Vec<usize> {
        let len = graph.len();
        let mut depths: Vec<Option<usize>> = vec![None; len];
        let mut chain = Vec::new();

        for start in 0..len {
            chain.clear();
            let mut current = start;
            let base = loop {
                if let Some(Some(known)) = depths.get(current) {
                    break *known;
                }
                chain.push(current);
                match graph.parent_index(current) {
                    // A chain longer than the arena can only be a cycle
                    Some(parent) if chain.len() <= len => current = parent,
                    _ => break 0,
                }
            };

            // The last entry is the root (or the node just below a known depth)
            let mut depth = if depths.get(current).is_some_and(Option::is_some) {
                base + 1
            } else {
                base
            };
            for &node in chain.iter().rev() {
                if let Some(slot) = depths.get_mut(node) {
                    *slot = Some(depth);
                }
                depth += 1;
            }
        }

        depths.into_iter().map(Option::unwrap_or_default).collect()
    }
}

impl WeightStrategy for SeedDistance {
    fn assign(&self, graph: &mut StickGraph) {
        let depths = Self::depths(graph);
        let max = i32::from(MAX_INTENSITY);
        for (node, depth) in graph.nodes_mut().iter_mut().zip(depths) {
            let drop = self.falloff.saturating_mul(depth as i32);
            node.weight = (max - drop).max(1);
        }
    }
}

/// Weights fall off linearly with insertion order, first node brightest
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseInsertion;

impl WeightStrategy for ReverseInsertion {
    fn assign(&self, graph: &mut StickGraph) {
        let nodes = graph.nodes_mut();
        let last = nodes.len().saturating_sub(1).max(1) as i64;
        let max = i64::from(MAX_INTENSITY);
        for (i, node) in nodes.iter_mut().enumerate() {
            let weight = max - (i as i64 * (max - 1)) / last;
            node.weight = weight.max(1) as i32;
        }
    }
}

/// Selectable weight strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WeightScheme {
    /// Bright ridge tips
    #[default]
    Tips,
    /// Bright seed, dimming outward
    Seed,
    /// Bright early particles, dimming with insertion order
    Insertion,
}

impl WeightScheme {
    /// Strategy object for this scheme
    pub fn strategy(self) -> Box<dyn WeightStrategy> {
        match self {
            Self::Tips => Box::new(TerminalTips),
            Self::Seed => Box::new(SeedDistance::default()),
            Self::Insertion => Box::new(ReverseInsertion),
        }
    }
}
