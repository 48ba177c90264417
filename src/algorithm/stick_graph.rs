//! Provenance forest recording which particle stuck to which
//!
//! Nodes live in an arena in insertion order. Each node knows at most one
//! parent, referenced by [`NodeId`] rather than by index, so a refinement
//! pass can rebuild the whole arena from the old one without fixing up
//! references.

use std::collections::HashMap;
use std::fmt;

use bitvec::prelude::*;

use crate::algorithm::weights::WeightStrategy;
use crate::io::configuration::MAX_INTENSITY;
use crate::io::error::{Result, RidgeError};
use crate::math::pairing;
use crate::spatial::coordinate::Coordinate;

/// Stable identity of a node, derived from its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Id of the node that would sit at `(x, y)`
    pub const fn at(x: i32, y: i32) -> Self {
        Self(pairing::pair(x, y))
    }

    /// Id of the node that would sit at `position`
    pub const fn of(position: Coordinate) -> Self {
        Self::at(position.x, position.y)
    }

    /// Position encoded in this id
    pub fn position(self) -> Coordinate {
        let (x, y) = pairing::unpair(self.0);
        Coordinate::new(x, y)
    }

    /// Raw paired value
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One aggregated particle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickNode {
    /// Position on the grid
    pub position: Coordinate,
    /// Height contribution
    pub weight: i32,
    /// Node this one stuck to; `None` for seeds
    pub parent: Option<NodeId>,
}

impl StickNode {
    /// Identity derived from the position
    pub const fn id(&self) -> NodeId {
        NodeId::of(self.position)
    }

    /// True for nodes with no parent
    pub const fn is_seed(&self) -> bool {
        self.parent.is_none()
    }
}

/// Forest of stick nodes with id lookup
#[derive(Debug, Clone, Default)]
pub struct StickGraph {
    nodes: Vec<StickNode>,
    index: HashMap<NodeId, usize>,
}

impl StickGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[StickNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [StickNode] {
        &mut self.nodes
    }

    /// Look up a node by id
    pub fn get(&self, id: NodeId) -> Option<&StickNode> {
        self.index.get(&id).and_then(|&i| self.nodes.get(i))
    }

    /// Whether a node occupies `position`
    pub fn contains(&self, position: Coordinate) -> bool {
        self.index.contains_key(&NodeId::of(position))
    }

    /// Parent of the node with the given id
    pub fn parent_of(&self, id: NodeId) -> Option<&StickNode> {
        self.get(id)
            .and_then(|node| node.parent)
            .and_then(|parent| self.get(parent))
    }

    /// Arena index of a node's parent
    pub(crate) fn parent_index(&self, node_index: usize) -> Option<usize> {
        self.nodes
            .get(node_index)
            .and_then(|node| node.parent)
            .and_then(|parent| self.index.get(&parent).copied())
    }

    /// Number of child-to-parent edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.parent.is_some()).count()
    }

    /// Child and parent positions for every edge, in insertion order
    pub fn edges(&self) -> Vec<(Coordinate, Coordinate)> {
        self.nodes
            .iter()
            .filter_map(|node| node.parent.map(|p| (node.position, p.position())))
            .collect()
    }

    // Returns false when a node with the same id is already present
    fn insert(&mut self, node: StickNode) -> bool {
        let id = node.id();
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Insert a parentless node
    ///
    /// # Errors
    ///
    /// Returns `DuplicateNode` if a node already sits at `(x, y)`
    pub fn add_seed(&mut self, x: i32, y: i32, weight: i32) -> Result<NodeId> {
        let node = StickNode {
            position: Coordinate::new(x, y),
            weight,
            parent: None,
        };
        let id = node.id();
        if self.insert(node) {
            Ok(id)
        } else {
            Err(RidgeError::DuplicateNode { x, y })
        }
    }

    /// Insert a node at `(x, y)` stuck to the node at `neighbor`
    ///
    /// The graph is left untouched on failure.
    ///
    /// # Errors
    ///
    /// Returns `MissingNeighbor` if no node sits at `neighbor`, or
    /// `DuplicateNode` if a node already sits at `(x, y)`
    pub fn attach(&mut self, x: i32, y: i32, weight: i32, neighbor: Coordinate) -> Result<NodeId> {
        let parent = NodeId::of(neighbor);
        if !self.index.contains_key(&parent) {
            return Err(RidgeError::MissingNeighbor {
                x,
                y,
                neighbor: neighbor.to_array(),
            });
        }

        let node = StickNode {
            position: Coordinate::new(x, y),
            weight,
            parent: Some(parent),
        };
        let id = node.id();
        if self.insert(node) {
            Ok(id)
        } else {
            Err(RidgeError::DuplicateNode { x, y })
        }
    }

    /// Scale every position by two and bridge each stretched edge with a midpoint
    ///
    /// Every edge `child -> parent` becomes `2*child -> mid -> 2*parent` where
    /// `mid` is the truncated midpoint, weighted with the mean of both ends.
    /// No position is emitted twice.
    ///
    /// `jiggle_amount` is accepted but has no effect: an orthogonal midpoint
    /// is the only cell adjacent to both doubled ends, so any displacement
    /// would reopen the gap it exists to close.
    ///
    /// # Errors
    ///
    /// Returns `InternalConsistency` if a node references a parent that is not
    /// in the graph
    pub fn double_and_repair(&mut self, jiggle_amount: f32) -> Result<()> {
        if jiggle_amount != 0.0 {
            log::debug!("midpoint jiggle of {jiggle_amount} requested; midpoints are not displaced");
        }

        let mut rebuilt = Self::with_capacity(self.nodes.len() * 2);
        let mut skipped = 0usize;

        for node in &self.nodes {
            let doubled = node.position * 2;

            let Some(parent_id) = node.parent else {
                if !rebuilt.insert(StickNode {
                    position: doubled,
                    weight: node.weight,
                    parent: None,
                }) {
                    skipped += 1;
                }
                continue;
            };

            let parent = self
                .get(parent_id)
                .ok_or_else(|| RidgeError::InternalConsistency {
                    pass: 0,
                    reason: format!(
                        "node {} references missing parent {}",
                        node.position,
                        parent_id.position()
                    ),
                })?;

            let doubled_parent = parent.position * 2;
            let midpoint = doubled.midpoint(doubled_parent);
            let midpoint_id = NodeId::of(midpoint);

            if !rebuilt.insert(StickNode {
                position: doubled,
                weight: node.weight,
                parent: Some(midpoint_id),
            }) {
                skipped += 1;
            }
            if !rebuilt.insert(StickNode {
                position: midpoint,
                weight: (node.weight + parent.weight) / 2,
                parent: Some(NodeId::of(doubled_parent)),
            }) {
                skipped += 1;
            }
        }

        if skipped > 0 {
            log::debug!("skipped {skipped} already-emitted positions while doubling");
        }
        log::debug!(
            "doubled stick graph from {} to {} nodes",
            self.nodes.len(),
            rebuilt.nodes.len()
        );

        *self = rebuilt;
        Ok(())
    }

    /// Mark which arena indices are referenced as a parent
    pub(crate) fn parent_mask(&self) -> BitVec {
        let mut referenced = bitvec![0; self.nodes.len()];
        for i in 0..self.nodes.len() {
            if let Some(parent) = self.parent_index(i) {
                referenced.set(parent, true);
            }
        }
        referenced
    }

    /// Give every branch tip (a node nobody stuck to) the maximum weight
    pub fn assign_terminal_weights(&mut self) {
        let referenced = self.parent_mask();
        for (node, is_parent) in self.nodes.iter_mut().zip(referenced.iter()) {
            if !*is_parent {
                node.weight = i32::from(MAX_INTENSITY);
            }
        }
    }

    /// Reassign weights with a pluggable strategy
    pub fn assign_weights(&mut self, strategy: &dyn WeightStrategy) {
        strategy.assign(self);
    }

    /// Number of branch tips
    pub fn terminal_count(&self) -> usize {
        self.parent_mask().count_zeros()
    }
}
