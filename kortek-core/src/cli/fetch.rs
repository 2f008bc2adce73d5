use crate::runtime::Engine;
use anyhow::{Context, Result, anyhow};
use clap::Args;
use serde_json::Value;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Logical path, e.g. `home` or `anime/one-piece`
    pub path: String,

    /// Query parameter as key=value; repeatable
    #[arg(long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Send a POST instead of a GET
    #[arg(long)]
    pub post: bool,

    /// JSON request body for POST
    #[arg(long, requires = "post")]
    pub body: Option<String>,
}

fn parse_key_val(s: &str) -> Result<(String, String)> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{s}'"))?;
    Ok((k.to_string(), v.to_string()))
}

pub async fn run(engine: &Engine, args: FetchArgs) -> Result<()> {
    let payload = if args.post {
        let body = args
            .body
            .as_deref()
            .map(serde_json::from_str::<Value>)
            .transpose()
            .context("--body is not valid JSON")?;
        engine.orchestrator.post(&args.path, body).await?
    } else {
        engine.orchestrator.get(&args.path, args.params).await?
    };

    super::print_json(&payload)
}
