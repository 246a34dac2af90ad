//! CLI for entropyguid: identifiers from the noise of your environment.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "entropyguid")]
#[command(about = "entropyguid: decentralized identifiers from weak environment entropy")]
#[command(version = entropyguid_core::VERSION)]
struct Cli {
    /// Print the raw concatenated stream and per-source failures; enables debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate identifiers from the configured entropy sources
    Generate {
        /// Digest algorithm: sha256 (default), sha384, sha512, sha512_256
        #[arg(long)]
        algorithm: Option<String>,

        /// Comma-separated source name filter (partial match)
        #[arg(long)]
        sources: Option<String>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<String>,

        /// Number of identifiers to generate
        #[arg(long, default_value = "1")]
        count: usize,

        /// Override the sleep window of sleep_timing, in milliseconds
        #[arg(long)]
        sleep_ms: Option<u64>,

        /// Per-source timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Directory counted by directory_count
        #[arg(long)]
        scan_dir: Option<String>,

        /// Print each generation with its diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in entropy sources and whether they work on this machine
    Scan,

    /// List the supported digest algorithms
    Algorithms,

    /// Print the effective configuration as JSON (a starting point for --config)
    Config {
        /// JSON configuration file to load and validate
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Generate {
            algorithm,
            sources,
            config,
            count,
            sleep_ms,
            timeout_ms,
            scan_dir,
            json,
        } => commands::generate::run(commands::generate::GenerateCommandConfig {
            algorithm: algorithm.as_deref(),
            source_filter: sources.as_deref(),
            config_path: config.as_deref(),
            count,
            sleep_ms,
            timeout_ms,
            scan_dir: scan_dir.as_deref(),
            json,
            verbose: cli.verbose,
        }),
        Commands::Scan => commands::scan::run(),
        Commands::Algorithms => commands::algorithms::run(),
        Commands::Config { config } => commands::config::run(config.as_deref()),
    }
}
