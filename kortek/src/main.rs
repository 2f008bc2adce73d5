use clap::{Parser, Subcommand};
use kortek_core::cli;
use kortek_core::conf::KortekConfig;
use kortek_core::logging::init_logging;
use kortek_core::runtime::{Engine, build_engine};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "kortek",
    version,
    about = "Kortek: fallback resolution across interchangeable content APIs"
)]
struct Cli {
    /// Path to the config file or its directory
    #[arg(long, global = true, default_value = "config")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage registered endpoints
    Endpoints {
        #[command(subcommand)]
        cmd: cli::endpoints::EndpointsCmd,
    },

    /// Per-path endpoint status
    Status {
        #[command(subcommand)]
        cmd: cli::status::StatusCmd,
    },

    /// Liveness probing
    Health {
        #[command(subcommand)]
        cmd: cli::health::HealthCmd,
    },

    /// Resolve a logical path through the fallback chain
    Fetch(cli::fetch::FetchArgs),

    /// Configuration tooling
    Conf {
        #[command(subcommand)]
        cmd: cli::conf::ConfCmd,
    },

    /// Show the endpoint currently in charge
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::Conf { cmd } => cli::conf::run(cmd),
        command => {
            let cfg = cli::load_or_default(&cli.config)?;
            let engine = build_engine(&cfg)?;
            run(&engine, &cfg, command).await
        }
    }
}

async fn run(engine: &Engine, cfg: &KortekConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Endpoints { cmd } => cli::endpoints::run(engine, cmd).await,
        Command::Status { cmd } => cli::status::run(engine, cmd).await,
        Command::Health { cmd } => cli::health::run(engine, cfg.health.failure_threshold, cmd).await,
        Command::Fetch(args) => cli::fetch::run(engine, args).await,
        Command::Info => cli::info::run(engine),
        Command::Conf { cmd } => cli::conf::run(cmd),
    }
}
