//! CLI entry point for the ridge height map generator

use clap::Parser;
use ridgegen::io::cli::{Cli, Runner};

fn main() -> ridgegen::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();
    Runner::new(cli).run()
}
