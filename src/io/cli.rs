//! Command-line interface for generating a ridge height map

use crate::algorithm::aggregation::AggregationSettings;
use crate::algorithm::refinement::{GeneratorConfig, RidgeGenerator};
use crate::algorithm::weights::WeightScheme;
use crate::io::configuration::{
    DEFAULT_AREA_DIVISOR, DEFAULT_DENSITY, DEFAULT_INITIAL_SIZE, DEFAULT_JPEG_QUALITY,
    DEFAULT_MAX_TRIES, DEFAULT_PARTICLE_WEIGHT, DEFAULT_PASSES, DEFAULT_SEED,
    DEFAULT_SEED_WEIGHT, DEFAULT_SPAWN_BORDER, SHARP_SUFFIX,
};
use crate::io::error::Result;
use crate::io::image::{RasterFormat, ResizeFilter, export_grid};
use crate::io::progress::PassProgress;
use crate::io::visualization::{render_edges, render_grid};
use crate::spatial::grid::GridConfig;
use crate::spatial::kernel::BlurKernel;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ridgegen")]
#[command(
    author,
    version,
    about = "Generate ridge height maps by diffusion-limited aggregation"
)]
/// Command-line arguments for the ridge generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Output image (.png or .jpg)
    #[arg(value_name = "OUTPUT", default_value = "ridge.png")]
    pub output: PathBuf,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Side length of the starting grid
    #[arg(long, default_value_t = DEFAULT_INITIAL_SIZE)]
    pub size: usize,

    /// Number of refinement passes (each doubles the grid)
    #[arg(short, long, default_value_t = DEFAULT_PASSES)]
    pub passes: usize,

    /// Particle density per batch
    #[arg(short, long, default_value_t = DEFAULT_DENSITY)]
    pub density: f64,

    /// Grid area divisor for the particle count (2 dense, 16 sparse)
    #[arg(long, default_value_t = DEFAULT_AREA_DIVISOR)]
    pub divisor: usize,

    /// Intensity of aggregated particles
    #[arg(short, long, default_value_t = DEFAULT_PARTICLE_WEIGHT)]
    pub weight: u8,

    /// Intensity of the seed particle
    #[arg(long, default_value_t = DEFAULT_SEED_WEIGHT)]
    pub seed_weight: u8,

    /// Spawn samples and walk steps allowed per particle
    #[arg(long, default_value_t = DEFAULT_MAX_TRIES)]
    pub max_tries: usize,

    /// Cells excluded from the high edge of the spawn area
    #[arg(long, default_value_t = DEFAULT_SPAWN_BORDER)]
    pub spawn_border: usize,

    /// Final weight assignment
    #[arg(long, value_enum, default_value_t = WeightScheme::Tips)]
    pub strategy: WeightScheme,

    /// Interpolation used for the fuzzy field
    #[arg(long, value_enum, default_value_t = ResizeFilter::Bilinear)]
    pub filter: ResizeFilter,

    /// Blur stencil used for the fuzzy field
    #[arg(long, value_enum, default_value_t = BlurKernel::Circular5)]
    pub kernel: BlurKernel,

    /// JPEG quality when the output is a JPEG
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    pub jpeg_quality: u8,

    /// Also export the raw sharp field next to the output
    #[arg(long)]
    pub sharp: bool,

    /// Print the sharp grid to stdout
    #[arg(long)]
    pub print: bool,

    /// Print the stick graph edges to stdout
    #[arg(long)]
    pub edges: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log pass summaries
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter for these flags
    pub const fn log_filter(&self) -> &'static str {
        if self.verbose { "info" } else { "warn" }
    }

    /// Generator configuration described by the flags
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            seed: self.seed,
            initial_size: self.size,
            passes: self.passes,
            density: self.density,
            particle_weight: self.weight,
            seed_weight: self.seed_weight,
            max_tries: self.max_tries,
            aggregation: AggregationSettings {
                area_divisor: self.divisor,
                spawn_border: self.spawn_border,
            },
            grid: GridConfig {
                kernel: self.kernel,
                ..GridConfig::default()
            },
            resize_filter: self.filter,
            weight_scheme: self.strategy,
            ..GeneratorConfig::default()
        }
    }

    /// Path of the raw sharp-field export
    pub fn sharp_path(&self) -> PathBuf {
        suffixed_path(&self.output, SHARP_SUFFIX)
    }
}

fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    let extension = path.extension().unwrap_or_default();
    let name = format!(
        "{}{}.{}",
        stem.to_string_lossy(),
        suffix,
        extension.to_string_lossy()
    );

    if let Some(parent) = path.parent() {
        parent.join(name)
    } else {
        PathBuf::from(name)
    }
}

/// Runs one generation described by the CLI arguments
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner with the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Generate, export and optionally print
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the run hits an
    /// internal consistency failure, or an export fails
    // Allow print for requested text output
    #[allow(clippy::print_stdout)]
    pub fn run(&self) -> Result<()> {
        let config = self.cli.generator_config();
        let mut generator = RidgeGenerator::new(config)?;

        let progress = if self.cli.should_show_progress() {
            PassProgress::new(config.passes)
        } else {
            PassProgress::hidden(config.passes)
        };
        generator.iterate_with(config.passes, |report| progress.record(report))?;
        progress.finish();

        let format = RasterFormat::from_path(&self.cli.output, self.cli.jpeg_quality);
        export_grid(generator.composite(), &self.cli.output, format)?;
        log::info!("saved composite to {}", self.cli.output.display());

        if self.cli.sharp {
            let sharp_path = self.cli.sharp_path();
            export_grid(generator.sharp(), &sharp_path, format)?;
            log::info!("saved sharp field to {}", sharp_path.display());
        }

        if self.cli.print {
            println!("{}", render_grid(generator.sharp(), false));
        }
        if self.cli.edges {
            print!("{}", render_edges(generator.graph()));
        }

        Ok(())
    }
}
