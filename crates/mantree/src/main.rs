//! mantree CLI - Manual page tree builder.
//!
//! Provides commands for:
//! - `build`: Generate, stage and publish manual pages
//! - `stage`: Restructure pages already in the staging directory
//! - `publish`: Copy changed staged pages to the destination tree

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, PublishArgs, StageArgs};
use output::Output;

/// mantree - Manual page tree builder.
#[derive(Parser)]
#[command(name = "mantree", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the generator, restructure its pages and publish the changes.
    Build(BuildArgs),
    /// Restructure flat pages already in the staging directory.
    Stage(StageArgs),
    /// Copy changed staged pages to the destination directory.
    Publish(PublishArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Build(args) => args.common.verbose,
            Self::Stage(args) => args.common.verbose,
            Self::Publish(args) => args.common.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Stage(args) => args.execute(),
        Commands::Publish(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
