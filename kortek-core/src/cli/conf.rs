use crate::conf::{ConfigError, load_config};
use anyhow::{Result, bail};
use clap::Subcommand;
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfCmd {
    /// Validate configuration and exit
    Check {
        /// Path to the config file or its directory
        #[arg(default_value = "config")]
        path: PathBuf,
    },

    /// Print resolved configuration as JSON
    Dump {
        #[arg(default_value = "config")]
        path: PathBuf,
    },
}

pub fn run(cmd: ConfCmd) -> Result<()> {
    match cmd {
        ConfCmd::Check { path } => check(path),
        ConfCmd::Dump { path } => super::print_json(&load_config(&path)?),
    }
}

pub fn check(path: PathBuf) -> Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            println!("✔ Config loaded successfully");
            println!("✔ {} seed endpoints", cfg.endpoints.len());
            println!(
                "✔ default endpoint {}",
                if cfg.default_endpoint.enable {
                    cfg.default_endpoint.url.as_str()
                } else {
                    "disabled"
                }
            );
            println!(
                "✔ registry stored in {}",
                cfg.registry
                    .database
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "memory".to_string())
            );
            println!("✔ {} monitored paths", cfg.monitor.paths.len());
            Ok(())
        }
        Err(ConfigError::Validation { issues }) => {
            println!(
                "configuration validation failed ({} errors)\n",
                issues.len()
            );
            for issue in &issues {
                println!("  {}: {}", "error".red().bold(), issue);
            }
            bail!("invalid configuration")
        }
        Err(err) => Err(err.into()),
    }
}
