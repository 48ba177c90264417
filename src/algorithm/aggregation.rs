//! Diffusion-limited aggregation on the occupancy grid
//!
//! Particles spawn on a random empty cell and random-walk until one of
//! their four orthogonal neighbours is occupied, then stick to it. Every
//! successful particle is written to the grid and recorded in the stick
//! graph together with the neighbour it stuck to.

use crate::algorithm::random::{SeededWalk, WalkSource};
use crate::algorithm::stick_graph::StickGraph;
use crate::io::configuration::{DEFAULT_AREA_DIVISOR, DEFAULT_SPAWN_BORDER, MAX_INTENSITY};
use crate::io::error::{Result, RidgeError};
use crate::spatial::coordinate::Coordinate;
use crate::spatial::grid::OccupancyGrid;

/// Aggregation parameters that stay fixed for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationSettings {
    /// Divisor applied to the grid area when computing the particle count
    pub area_divisor: usize,
    /// Cells excluded from the high edge of the spawn area
    pub spawn_border: usize,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            area_divisor: DEFAULT_AREA_DIVISOR,
            spawn_border: DEFAULT_SPAWN_BORDER,
        }
    }
}

/// Outcome of one populate batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateReport {
    /// Particles the batch attempted
    pub requested: usize,
    /// Particles that stuck
    pub placed: usize,
    /// Particles that found no empty spawn cell
    pub saturated: usize,
    /// Particles that never touched the aggregate
    pub timed_out: usize,
}

impl PopulateReport {
    /// Particles that failed for any reason
    pub const fn failed(&self) -> usize {
        self.saturated + self.timed_out
    }
}

/// Owns the sharp grid, the stick graph and the random source, and keeps
/// the first two in lockstep
#[derive(Debug, Clone)]
pub struct Aggregator<W: WalkSource = SeededWalk> {
    grid: OccupancyGrid,
    graph: StickGraph,
    source: W,
    settings: AggregationSettings,
}

impl Aggregator<SeededWalk> {
    /// Create an engine over an empty grid with a seeded source
    pub fn seeded(grid: OccupancyGrid, seed: u64, settings: AggregationSettings) -> Self {
        Self::new(grid, SeededWalk::new(seed), settings)
    }
}

impl<W: WalkSource> Aggregator<W> {
    /// Create an engine over `grid` drawing from `source`
    pub fn new(grid: OccupancyGrid, source: W, settings: AggregationSettings) -> Self {
        Self {
            grid,
            graph: StickGraph::new(),
            source,
            settings,
        }
    }

    /// Current sharp grid
    pub const fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Current stick graph
    pub const fn graph(&self) -> &StickGraph {
        &self.graph
    }

    /// Mutable access to the stick graph, for weight assignment
    pub const fn graph_mut(&mut self) -> &mut StickGraph {
        &mut self.graph
    }

    /// Aggregation parameters
    pub const fn settings(&self) -> AggregationSettings {
        self.settings
    }

    /// Drop every particle, keeping the grid size
    pub fn reset(&mut self) {
        self.grid.clear();
        self.graph = StickGraph::new();
    }

    /// Place the seed particle at a random interior cell
    ///
    /// The interior excludes the outermost ring when the grid is at least
    /// three cells wide.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` on an empty grid, or `DuplicateNode` if the
    /// chosen cell is already taken
    pub fn seed(&mut self, weight: u8) -> Result<Coordinate> {
        let size = self.grid.size();
        let (lo, hi) = if size >= 3 { (1, size - 1) } else { (0, size) };
        let (x, y) = self.source.next_position(lo, hi);
        self.seed_at(x, y, weight)
    }

    /// Place the seed particle at `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `(x, y)` is outside the grid, or
    /// `DuplicateNode` if the cell is already taken
    pub fn seed_at(&mut self, x: i32, y: i32, weight: u8) -> Result<Coordinate> {
        let weight = weight.max(1);
        if self.grid.is_occupied(x, y)? {
            return Err(RidgeError::DuplicateNode { x, y });
        }
        self.graph.add_seed(x, y, i32::from(weight))?;
        self.grid.place(x, y, weight)?;
        log::debug!("seeded at ({x}, {y}) with weight {weight}");
        Ok(Coordinate::weighted(x, y, i32::from(weight)))
    }

    /// Number of particles a populate batch at `density` attempts
    pub fn target_count(&self, density: f64) -> usize {
        let size = self.grid.size();
        let divisor = self.settings.area_divisor.max(1);
        let base = (size * size) as f64 / divisor as f64;
        (base * density).floor().max(0.0) as usize
    }

    /// Spawn one particle, walk it until it touches the aggregate, and stick it
    ///
    /// # Errors
    ///
    /// Returns `SpawnSaturation` if no empty cell turns up within `max_tries`
    /// samples, `WalkTimeout` if the walk takes `max_tries` steps without
    /// touching anything, or `MissingNeighbor`/`OutOfBounds` if the grid and
    /// graph disagree
    pub fn spawn_and_stick(&mut self, weight: u8, max_tries: usize) -> Result<Coordinate> {
        let weight = weight.max(1);
        let start = self.spawn(max_tries)?;
        let (position, neighbor) = self.walk(start, max_tries)?;

        self.graph
            .attach(position.x, position.y, i32::from(weight), neighbor)?;
        if !self.grid.place(position.x, position.y, weight)? {
            return Err(RidgeError::DuplicateNode {
                x: position.x,
                y: position.y,
            });
        }

        Ok(Coordinate::weighted(position.x, position.y, i32::from(weight)))
    }

    fn spawn(&mut self, max_tries: usize) -> Result<Coordinate> {
        let size = self.grid.size();
        let hi = size.saturating_sub(self.settings.spawn_border).max(1);

        let (mut x, mut y) = self.source.next_position(0, hi);
        let mut tries = 0;
        while self.grid.is_occupied(x, y)? {
            if tries == max_tries {
                return Err(RidgeError::SpawnSaturation { tries, size });
            }
            (x, y) = self.source.next_position(0, hi);
            tries += 1;
        }
        Ok(Coordinate::new(x, y))
    }

    // Returns the resting position and the neighbour it stuck to
    fn walk(&mut self, start: Coordinate, max_tries: usize) -> Result<(Coordinate, Coordinate)> {
        let max = self.grid.size() as i32 - 1;
        let mut position = start;
        let mut steps = 0;

        loop {
            if let Some(neighbor) = self.find_neighbor(position)? {
                return Ok((position, neighbor));
            }
            if steps == max_tries {
                return Err(RidgeError::WalkTimeout {
                    x: position.x,
                    y: position.y,
                    tries: steps,
                });
            }

            let (dx, dy) = self
                .source
                .next_step(step_range(position.x, max), step_range(position.y, max));
            steps += 1;

            let candidate = position + Coordinate::new(dx, dy);
            // Landed on the aggregate diagonally; stay put
            if !self.grid.is_occupied(candidate.x, candidate.y)? {
                position = candidate;
            }
        }
    }

    /// First occupied orthogonal neighbour in north, west, east, south order
    fn find_neighbor(&self, position: Coordinate) -> Result<Option<Coordinate>> {
        for neighbor in position.orthogonal_neighbors() {
            if self.grid.contains(neighbor.x, neighbor.y) && self.grid.is_occupied(neighbor.x, neighbor.y)? {
                return Ok(Some(neighbor));
            }
        }
        Ok(None)
    }

    /// Run a best-effort batch of particles
    ///
    /// Saturation and timeouts are counted and logged; the batch carries on.
    ///
    /// # Errors
    ///
    /// Propagates grid/graph invariant violations (`MissingNeighbor`,
    /// `OutOfBounds`, `DuplicateNode`)
    pub fn populate(&mut self, density: f64, weight: u8, max_tries: usize) -> Result<PopulateReport> {
        let requested = self.target_count(density);
        let mut report = PopulateReport {
            requested,
            ..PopulateReport::default()
        };

        for _ in 0..requested {
            match self.spawn_and_stick(weight, max_tries) {
                Ok(_) => report.placed += 1,
                Err(error @ RidgeError::SpawnSaturation { .. }) => {
                    report.saturated += 1;
                    log::warn!("particle failed: {error}");
                }
                Err(error @ RidgeError::WalkTimeout { .. }) => {
                    report.timed_out += 1;
                    log::warn!("particle failed: {error}");
                }
                Err(error) => return Err(error),
            }
        }

        log::info!(
            "populated {}x{} grid: {}/{} particles stuck ({} saturated, {} timed out)",
            self.grid.size(),
            self.grid.size(),
            report.placed,
            report.requested,
            report.saturated,
            report.timed_out
        );
        Ok(report)
    }

    /// Clear the grid and redraw it from the stick graph
    ///
    /// # Errors
    ///
    /// Returns `InternalConsistency` if a node lies outside the grid or two
    /// nodes share a cell
    pub fn render_graph(&mut self) -> Result<()> {
        self.grid.clear();
        let max = i32::from(MAX_INTENSITY);

        for node in self.graph.nodes() {
            let intensity = num_traits::clamp(node.weight, 0, max).max(1) as u8;
            let position = node.position;
            match self.grid.place(position.x, position.y, intensity) {
                Ok(true) => {}
                Ok(false) => {
                    return Err(RidgeError::InternalConsistency {
                        pass: 0,
                        reason: format!("two nodes rendered onto {position}"),
                    });
                }
                Err(error) => {
                    return Err(RidgeError::InternalConsistency {
                        pass: 0,
                        reason: error.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Double the grid and the graph, then redraw the grid from the graph
    ///
    /// # Errors
    ///
    /// Returns `InternalConsistency` if the doubled graph does not fit the
    /// doubled grid
    pub fn double_and_render(&mut self, jiggle_amount: f32) -> Result<()> {
        self.grid.double();
        self.graph.double_and_repair(jiggle_amount)?;
        self.render_graph()
    }
}

/// Inclusive step range that keeps a coordinate inside `[0, max]`
const fn step_range(value: i32, max: i32) -> (i32, i32) {
    let lo = if value <= 0 { 0 } else { -1 };
    let hi = if value >= max { 0 } else { 1 };
    (lo, hi)
}
