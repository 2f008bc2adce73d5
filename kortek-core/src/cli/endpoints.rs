use crate::endpoint::{Endpoint, EndpointId, EndpointPatch, NewEndpoint, PersistedEndpoint};
use crate::runtime::Engine;
use anyhow::{Result, bail};
use clap::Subcommand;
use owo_colors::OwoColorize;

#[derive(Subcommand, Debug)]
pub enum EndpointsCmd {
    /// List all endpoints in candidate order
    List {
        #[arg(long)]
        json: bool,
    },

    /// Register a new endpoint
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        url: String,

        /// Source domain used to resolve relative asset paths
        #[arg(long, default_value = "")]
        domain: String,

        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        priority: i32,

        /// Register without making it a candidate
        #[arg(long)]
        inactive: bool,
    },

    /// Change fields of an existing endpoint
    Update {
        #[arg(long)]
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        domain: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        priority: Option<i32>,

        #[arg(long, conflicts_with = "inactive")]
        active: bool,

        #[arg(long)]
        inactive: bool,
    },

    /// Remove an endpoint and its monitor records
    Delete {
        #[arg(long)]
        id: i64,
    },

    /// Probe liveness of one endpoint, or of all of them
    Test {
        #[arg(long)]
        id: Option<i64>,
    },

    SetPriority {
        #[arg(long)]
        id: i64,

        #[arg(long, allow_negative_numbers = true)]
        priority: i32,
    },

    Activate {
        #[arg(long)]
        id: i64,
    },

    Deactivate {
        #[arg(long)]
        id: i64,
    },
}

pub async fn run(engine: &Engine, cmd: EndpointsCmd) -> Result<()> {
    let registry = &engine.registry;

    match cmd {
        EndpointsCmd::List { json } => {
            let endpoints = registry.list_all()?;
            if json {
                return super::print_json(&endpoints);
            }
            if endpoints.is_empty() {
                println!("no endpoints registered");
            }
            for endpoint in &endpoints {
                print_row(endpoint);
            }
        }

        EndpointsCmd::Add {
            name,
            url,
            domain,
            priority,
            inactive,
        } => {
            let mut new = NewEndpoint::new(name, url, priority).with_source_domain(domain);
            if inactive {
                new = new.inactive();
            }
            let created = registry.create(new)?;
            println!("✔ added {} as #{}", created.name, created.id);
        }

        EndpointsCmd::Update {
            id,
            name,
            url,
            domain,
            priority,
            active,
            inactive,
        } => {
            let patch = EndpointPatch {
                name,
                url,
                source_domain: domain,
                priority,
                active: match (active, inactive) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };
            if patch.is_empty() {
                bail!("nothing to update");
            }
            let updated = registry.update(EndpointId(id), patch)?;
            println!("✔ updated #{}", updated.id);
            print_row(&updated);
        }

        EndpointsCmd::Delete { id } => {
            registry.delete(EndpointId(id))?;
            println!("✔ deleted #{id}");
        }

        EndpointsCmd::Test { id } => {
            let targets = match id {
                Some(id) => vec![registry.get(EndpointId(id))?],
                None => registry.list_all()?,
            };
            for endpoint in targets {
                let label = format!("{} ({})", endpoint.name, endpoint.url);
                let result = engine
                    .prober
                    .probe_detailed(&Endpoint::Persisted(endpoint))
                    .await;
                let latency = result
                    .latency
                    .map(|d| format!(" in {}ms", d.as_millis()))
                    .unwrap_or_default();
                if result.healthy {
                    println!("{} {label}{latency}", "✔".green());
                } else {
                    println!("{} {label}: {}", "✘".red(), result.detail);
                }
            }
        }

        EndpointsCmd::SetPriority { id, priority } => {
            let updated = registry.set_priority(EndpointId(id), priority)?;
            println!("✔ #{} priority is now {}", updated.id, updated.priority);
        }

        EndpointsCmd::Activate { id } => {
            let updated = registry.set_active(EndpointId(id), true)?;
            println!("✔ #{} activated", updated.id);
        }

        EndpointsCmd::Deactivate { id } => {
            let updated = registry.set_active(EndpointId(id), false)?;
            println!("✔ #{} deactivated", updated.id);
        }
    }

    Ok(())
}

fn print_row(endpoint: &PersistedEndpoint) {
    let state = if endpoint.active {
        "active".green().to_string()
    } else {
        "inactive".red().to_string()
    };
    println!(
        "{:>4}  {:<20} {:>5}  {:<8}  {:>6} ok  {}",
        endpoint.id.to_string(),
        endpoint.name,
        endpoint.priority,
        state,
        endpoint.success_count,
        endpoint.url.dimmed()
    );
}
