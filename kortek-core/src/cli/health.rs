use crate::runtime::Engine;
use anyhow::Result;
use clap::Subcommand;
use std::time::Duration;

#[derive(Subcommand, Debug)]
pub enum HealthCmd {
    /// Probe active endpoints and deactivate the ones that keep failing
    Sweep {
        /// Probe rounds to run; defaults to the configured failure threshold
        #[arg(long)]
        rounds: Option<u32>,

        /// Pause between rounds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        #[arg(long)]
        json: bool,
    },
}

pub async fn run(engine: &Engine, threshold: u32, cmd: HealthCmd) -> Result<()> {
    match cmd {
        HealthCmd::Sweep {
            rounds,
            interval_ms,
            json,
        } => {
            let rounds = rounds.unwrap_or(threshold).max(1);
            let mut deactivated = Vec::new();
            let mut last = Default::default();

            for round in 0..rounds {
                if round > 0 {
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
                let report = engine.sweep.sweep().await;
                deactivated.extend(report.deactivated.iter().cloned());
                last = report;
            }

            if json {
                return super::print_json(&last);
            }
            println!("✔ {} healthy", last.healthy.len());
            println!("✔ {} unhealthy", last.unhealthy.len());
            for name in &deactivated {
                println!("✔ deactivated {name}");
            }
        }
    }

    Ok(())
}
