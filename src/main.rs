// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Concept Atlas CLI - lay out concept maps from analyser payloads

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use concept_atlas::commands::{self, Globals};
use concept_atlas::config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "concept-atlas")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "CONCEPT_ATLAS_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Word list with font sizes, rotations, colours and cluster points
    Layout(commands::layout::LayoutArgs),

    /// Inverse-prominence hierarchy
    Tree(commands::tree::TreeArgs),

    /// Font scaling decision and weight statistics
    Scale(commands::scale::ScaleArgs),

    /// Ranked relatedness links and theme arcs
    Wheel(commands::wheel::WheelArgs),

    /// Export the concept graph or all derived views
    Export(commands::export::ExportArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Completions need no configuration
    if let Commands::Completions { shell } = cli.command {
        return commands::completions::run(&mut Cli::command(), shell);
    }

    let config = config::load(cli.config.as_deref())?;

    // Initialize logging; RUST_LOG wins over flags and config
    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .init();

    let globals = Globals {
        config,
        json: cli.json,
        color: !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Layout(args) => commands::layout::run(&args, &globals),
        Commands::Tree(args) => commands::tree::run(&args, &globals),
        Commands::Scale(args) => commands::scale::run(&args, &globals),
        Commands::Wheel(args) => commands::wheel::run(&args, &globals),
        Commands::Export(args) => commands::export::run(&args, &globals),
        Commands::Config { action } => commands::config::run(action, &globals),
        Commands::Completions { .. } => Ok(()),
    }
}
