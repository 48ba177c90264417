//! Multi-resolution refinement driving aggregation, doubling and compositing
//!
//! A run starts `Seeded`, alternates between `Aggregating` and `Refining`
//! for the configured number of passes, and ends `Final`. Each pass doubles
//! the grid and the stick graph, redraws the grid from the graph, adds new
//! particles at the finer resolution, and advances the fuzzy field.

use crate::algorithm::aggregation::{AggregationSettings, Aggregator, PopulateReport};
use crate::algorithm::compositor::FuzzyField;
use crate::algorithm::random::{SeededWalk, WalkSource};
use crate::algorithm::stick_graph::StickGraph;
use crate::algorithm::weights::WeightScheme;
use crate::io::configuration::{
    DEFAULT_DENSITY, DEFAULT_INITIAL_SIZE, DEFAULT_JIGGLE, DEFAULT_MAX_TRIES,
    DEFAULT_PARTICLE_WEIGHT, DEFAULT_PASSES, DEFAULT_SEED, DEFAULT_SEED_WEIGHT,
    MAX_GRID_DIMENSION,
};
use crate::io::error::{Result, RidgeError, WithContext, invalid_parameter};
use crate::io::image::ResizeFilter;
use crate::spatial::grid::{GridConfig, OccupancyGrid};

/// Everything needed to reproduce a generation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Seed for the random source
    pub seed: u64,
    /// Side length of the starting grid
    pub initial_size: usize,
    /// Number of refinement passes
    pub passes: usize,
    /// Particle density per populate batch
    pub density: f64,
    /// Intensity of aggregated particles
    pub particle_weight: u8,
    /// Intensity of the seed particle
    pub seed_weight: u8,
    /// Bound on spawn samples and walk steps per particle
    pub max_tries: usize,
    /// Midpoint displacement passed to graph doubling
    pub jiggle: f32,
    /// Explicit seed position; random interior cell when `None`
    pub seed_position: Option<(i32, i32)>,
    /// Particle count divisor and spawn border
    pub aggregation: AggregationSettings,
    /// Blur stencil and doubling policy
    pub grid: GridConfig,
    /// Interpolation for the fuzzy field
    pub resize_filter: ResizeFilter,
    /// Final weight assignment
    pub weight_scheme: WeightScheme,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            initial_size: DEFAULT_INITIAL_SIZE,
            passes: DEFAULT_PASSES,
            density: DEFAULT_DENSITY,
            particle_weight: DEFAULT_PARTICLE_WEIGHT,
            seed_weight: DEFAULT_SEED_WEIGHT,
            max_tries: DEFAULT_MAX_TRIES,
            jiggle: DEFAULT_JIGGLE,
            seed_position: None,
            aggregation: AggregationSettings::default(),
            grid: GridConfig::default(),
            resize_filter: ResizeFilter::default(),
            weight_scheme: WeightScheme::default(),
        }
    }
}

impl GeneratorConfig {
    /// Side length after all passes
    pub fn final_size(&self) -> Option<usize> {
        u32::try_from(self.passes)
            .ok()
            .and_then(|p| 2usize.checked_pow(p))
            .and_then(|factor| self.initial_size.checked_mul(factor))
    }

    /// Check every parameter
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first offending field
    pub fn validate(&self) -> Result<()> {
        if self.initial_size == 0 {
            return Err(invalid_parameter(
                "initial_size",
                &self.initial_size,
                &"grid must be at least 1x1",
            ));
        }
        match self.final_size() {
            Some(size) if size <= MAX_GRID_DIMENSION => {}
            _ => {
                return Err(invalid_parameter(
                    "passes",
                    &self.passes,
                    &format!(
                        "final grid would exceed {MAX_GRID_DIMENSION} cells per side from {}",
                        self.initial_size
                    ),
                ));
            }
        }
        if !self.density.is_finite() || self.density < 0.0 {
            return Err(invalid_parameter(
                "density",
                &self.density,
                &"must be a non-negative number",
            ));
        }
        if self.max_tries == 0 {
            return Err(invalid_parameter(
                "max_tries",
                &self.max_tries,
                &"must be positive",
            ));
        }
        if self.aggregation.area_divisor == 0 {
            return Err(invalid_parameter(
                "area_divisor",
                &self.aggregation.area_divisor,
                &"must be positive",
            ));
        }
        if self.aggregation.spawn_border >= self.initial_size {
            return Err(invalid_parameter(
                "spawn_border",
                &self.aggregation.spawn_border,
                &"must be smaller than the initial grid",
            ));
        }
        if let Some((x, y)) = self.seed_position {
            let size = self.initial_size as i32;
            if x < 0 || y < 0 || x >= size || y >= size {
                return Err(invalid_parameter(
                    "seed_position",
                    &format!("({x}, {y})"),
                    &"must lie inside the initial grid",
                ));
            }
        }
        if !self.jiggle.is_finite() {
            return Err(invalid_parameter("jiggle", &self.jiggle, &"must be finite"));
        }
        Ok(())
    }
}

/// Stage of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    /// Seed placed, nothing aggregated yet
    Seeded,
    /// Adding particles at the current resolution
    Aggregating,
    /// Doubling grid and graph
    Refining,
    /// All passes done and weights assigned
    Final,
}

impl GenerationPhase {
    /// Lower-case name for messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::Seeded => "seeded",
            Self::Aggregating => "aggregating",
            Self::Refining => "refining",
            Self::Final => "final",
        }
    }
}

/// Summary of one refinement pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    /// Pass number, starting at 1
    pub pass: usize,
    /// Grid side length after the pass
    pub size: usize,
    /// Nodes after doubling and repair, before new particles
    pub repaired_nodes: usize,
    /// Nodes at the end of the pass
    pub nodes: usize,
    /// Particles added at the new resolution
    pub populate: PopulateReport,
}

/// Drives a complete ridge generation run
#[derive(Debug, Clone)]
pub struct RidgeGenerator<W: WalkSource = SeededWalk> {
    aggregator: Aggregator<W>,
    fuzzy: FuzzyField,
    config: GeneratorConfig,
    phase: GenerationPhase,
    pass: usize,
}

impl RidgeGenerator<SeededWalk> {
    /// Validate the configuration and place the seed
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a bad configuration, or the placement
    /// error if the seed cannot be placed
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::with_source(config, SeededWalk::new(config.seed))
    }
}

impl<W: WalkSource> RidgeGenerator<W> {
    /// Like [`RidgeGenerator::new`] with an explicit draw source
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a bad configuration, or the placement
    /// error if the seed cannot be placed
    pub fn with_source(config: GeneratorConfig, source: W) -> Result<Self> {
        config.validate()?;

        let grid = OccupancyGrid::with_config(config.initial_size, config.grid);
        let mut aggregator = Aggregator::new(grid, source, config.aggregation);
        let seed = match config.seed_position {
            Some((x, y)) => aggregator.seed_at(x, y, config.seed_weight)?,
            None => aggregator.seed(config.seed_weight)?,
        };
        log::info!(
            "seeded {}x{} grid at {seed}",
            config.initial_size,
            config.initial_size
        );

        let fuzzy = FuzzyField::new(aggregator.grid(), config.resize_filter, config.grid.kernel);

        Ok(Self {
            aggregator,
            fuzzy,
            config,
            phase: GenerationPhase::Seeded,
            pass: 0,
        })
    }

    /// Current stage
    pub const fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// Completed refinement passes
    pub const fn passes_done(&self) -> usize {
        self.pass
    }

    /// Configuration of this run
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Raw sharp field
    pub const fn sharp(&self) -> &OccupancyGrid {
        self.aggregator.grid()
    }

    /// Blurred field before it reaches `Final`, composite afterwards
    pub const fn fuzzy(&self) -> &OccupancyGrid {
        self.fuzzy.field()
    }

    /// Final user-visible field: the fuzzy field with the sharp field blended in
    pub const fn composite(&self) -> &OccupancyGrid {
        self.fuzzy.field()
    }

    /// Provenance graph
    pub const fn graph(&self) -> &StickGraph {
        self.aggregator.graph()
    }

    /// Underlying aggregation engine
    pub const fn aggregator(&self) -> &Aggregator<W> {
        &self.aggregator
    }

    fn ensure_open(&self, operation: &'static str) -> Result<()> {
        if self.phase == GenerationPhase::Final {
            return Err(RidgeError::InvalidPhase {
                phase: self.phase.name(),
                operation,
            });
        }
        Ok(())
    }

    /// Run one populate batch at the current resolution
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` after `Final`, or a grid/graph invariant error
    pub fn populate(&mut self) -> Result<PopulateReport> {
        self.ensure_open("populate")?;
        let starting = self.phase == GenerationPhase::Seeded;
        self.phase = GenerationPhase::Aggregating;

        let report = self
            .aggregator
            .populate(
                self.config.density,
                self.config.particle_weight,
                self.config.max_tries,
            )
            .with_pass(self.pass)?;

        if starting {
            // The fuzzy field starts from the first aggregate, not the lone seed
            self.fuzzy = FuzzyField::new(
                self.aggregator.grid(),
                self.config.resize_filter,
                self.config.grid.kernel,
            );
        }
        Ok(report)
    }

    /// Run one refinement pass without finishing the run
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` after `Final`, or `InternalConsistency` if the
    /// grid and the graph fall out of sync
    pub fn refine_once(&mut self) -> Result<PassReport> {
        self.run_pass(false)
    }

    fn run_pass(&mut self, finishing: bool) -> Result<PassReport> {
        self.ensure_open("refine")?;
        if self.phase == GenerationPhase::Seeded {
            self.populate()?;
        }

        let pass = self.pass + 1;
        self.phase = GenerationPhase::Refining;
        self.aggregator
            .double_and_render(self.config.jiggle)
            .with_pass(pass)?;
        let repaired_nodes = self.aggregator.graph().len();

        self.phase = GenerationPhase::Aggregating;
        let populate = self
            .aggregator
            .populate(
                self.config.density,
                self.config.particle_weight,
                self.config.max_tries,
            )
            .with_pass(pass)?;

        if finishing {
            self.assign_weights(pass)?;
        }
        self.fuzzy.advance(self.aggregator.grid()).with_pass(pass)?;
        self.pass = pass;

        let report = PassReport {
            pass,
            size: self.aggregator.grid().size(),
            repaired_nodes,
            nodes: self.aggregator.graph().len(),
            populate,
        };
        log::info!(
            "pass {pass}: {}x{} grid, {} nodes after repair, {} after aggregation",
            report.size,
            report.size,
            report.repaired_nodes,
            report.nodes
        );
        Ok(report)
    }

    fn assign_weights(&mut self, pass: usize) -> Result<()> {
        let strategy = self.config.weight_scheme.strategy();
        self.aggregator.graph_mut().assign_weights(strategy.as_ref());
        self.aggregator.render_graph().with_pass(pass)
    }

    /// Run `passes` refinement passes and finish the run
    ///
    /// The weight strategy is applied on the last pass, before that pass
    /// blends the sharp field into the fuzzy field.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` after `Final`, or `InternalConsistency` if the
    /// grid and the graph fall out of sync
    pub fn iterate(&mut self, passes: usize) -> Result<Vec<PassReport>> {
        self.iterate_with(passes, |_| {})
    }

    /// Like [`RidgeGenerator::iterate`], calling `on_pass` after every pass
    ///
    /// # Errors
    ///
    /// Same as [`RidgeGenerator::iterate`]
    pub fn iterate_with<F>(&mut self, passes: usize, mut on_pass: F) -> Result<Vec<PassReport>>
    where
        F: FnMut(&PassReport),
    {
        self.ensure_open("iterate")?;
        if self.phase == GenerationPhase::Seeded {
            self.populate()?;
        }

        let mut reports = Vec::with_capacity(passes);
        for i in 0..passes {
            let report = self.run_pass(i + 1 == passes)?;
            on_pass(&report);
            reports.push(report);
        }

        if passes == 0 {
            // Reweighting redraws the sharp grid, so its last blend is redone
            self.assign_weights(self.pass)?;
            self.fuzzy
                .redo_advance(self.aggregator.grid())
                .with_pass(self.pass)?;
        }

        self.phase = GenerationPhase::Final;
        Ok(reports)
    }

    /// Run the configured number of passes
    ///
    /// # Errors
    ///
    /// Same as [`RidgeGenerator::iterate`]
    pub fn run(&mut self) -> Result<Vec<PassReport>> {
        self.iterate(self.config.passes)
    }
}
