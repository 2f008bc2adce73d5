use crate::monitor::{MonitorStatus, StatusCounts};
use crate::runtime::Engine;
use anyhow::Result;
use clap::Subcommand;
use owo_colors::OwoColorize;

#[derive(Subcommand, Debug)]
pub enum StatusCmd {
    /// Hit every monitored path on every active endpoint and record the outcome
    Check {
        #[arg(long)]
        json: bool,
    },

    /// Show the latest recorded outcome per endpoint and path
    Summary {
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(engine: &Engine, cmd: StatusCmd) -> Result<()> {
    match cmd {
        StatusCmd::Check { json } => {
            let report = engine.status.check_all().await;
            if json {
                return super::print_json(&report);
            }
            for check in &report.checks {
                let timing = check
                    .response_time_ms
                    .map(|ms| format!(" {ms}ms"))
                    .unwrap_or_default();
                println!(
                    "{:<20} {:<16} {}{}",
                    check.endpoint,
                    check.path,
                    colored(check.status),
                    timing
                );
            }
            print_counts(&report.counts);
        }

        StatusCmd::Summary { json } => {
            let summary = engine.recorder.summary()?;
            if json {
                return super::print_json(&summary);
            }
            for endpoint in &summary.endpoints {
                println!("{} ({}, priority {})", endpoint.name.bold(), endpoint.url, endpoint.priority);
                if endpoint.paths.is_empty() {
                    println!("  {}", "no checks recorded".dimmed());
                }
                for record in &endpoint.paths {
                    println!(
                        "  {:<16} {:<8} {}",
                        record.logical_path,
                        colored(record.status),
                        record.last_checked.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
            print_counts(&summary.status_counts);
        }
    }

    Ok(())
}

fn colored(status: MonitorStatus) -> String {
    match status {
        MonitorStatus::Up => status.green().to_string(),
        MonitorStatus::Down | MonitorStatus::Error => status.red().to_string(),
        MonitorStatus::Timeout => status.yellow().to_string(),
        MonitorStatus::Unknown => status.dimmed().to_string(),
    }
}

fn print_counts(counts: &StatusCounts) {
    let parts: Vec<String> = MonitorStatus::ALL
        .iter()
        .map(|s| format!("{} {}", counts.get(*s), s))
        .collect();
    println!("\n{}", parts.join(", "));
}
