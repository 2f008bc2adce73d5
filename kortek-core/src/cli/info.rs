use crate::runtime::Engine;
use anyhow::Result;

pub fn run(engine: &Engine) -> Result<()> {
    match engine.orchestrator.current_endpoint_info() {
        Some(info) => {
            println!("✔ current endpoint {} ({})", info.name, info.url);
            println!("✔ priority {}", info.priority);
            println!("✔ {} successful responses", info.success_count);
            if info.is_default {
                println!("✔ using the built-in default endpoint");
            }
        }
        None => println!("no endpoint available"),
    }
    println!(
        "✔ source domain {}",
        engine.registry.current_source_domain()
    );
    Ok(())
}
