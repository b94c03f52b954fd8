//! Atlas Pauser - pause or resume a MongoDB Atlas cluster from a trigger event.
//!
//! Reads a Pub/Sub style event (`{"data": "<base64 JSON>"}`) from a file or
//! stdin, or builds one from `--action/--project-name/--cluster`, and applies
//! it. On success the control plane's response body is printed to stdout.
//! On failure `<ErrorKind>: <message>` is printed and the process exits 1,
//! unless debug mode is on, in which case the error propagates out of `main`.
//! An event that cannot be read at all is not an event failure and always
//! propagates.

use std::io::Read;
use std::path::PathBuf;

use atlas_pauser_control::config::{debug_enabled, DEBUG_VAR};
use anyhow::Context;
use atlas_pauser_control::{ClusterPauser, Event, PauserConfig, Result, Transport};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pause or resume a MongoDB Atlas cluster.
#[derive(Parser, Debug)]
#[command(name = "atlas-pauser")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Event JSON file, `-` or absent for stdin.
    #[arg(long, conflicts_with = "action")]
    event: Option<PathBuf>,

    /// Invocation context (JSON), logged only.
    #[arg(long, default_value = "{}")]
    context: String,

    /// Build the event locally with this action instead of reading one.
    #[arg(long, requires_all = ["project_name", "cluster"])]
    action: Option<String>,

    /// Project name for a locally built event.
    #[arg(long, requires = "action")]
    project_name: Option<String>,

    /// Cluster name for a locally built event.
    #[arg(long, requires = "action")]
    cluster: Option<String>,

    /// Atlas admin API root.
    #[arg(long, env = "ATLAS_BASE_URL")]
    base_url: Option<String>,

    /// Transport: `http` or `cli`.
    #[arg(long, env = "ATLAS_PAUSER_TRANSPORT")]
    transport: Option<String>,

    /// Let failures propagate instead of printing them.
    #[arg(long, default_value = "false")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,atlas_pauser=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let debug = args.debug || debug_enabled(std::env::var(DEBUG_VAR).ok().as_deref());
    let event_json = read_event(&args)?;

    match run(&args, event_json.as_deref()).await {
        Ok(body) => {
            println!("{body}");
            Ok(())
        }
        Err(error) if debug => Err(error.into()),
        Err(error) => {
            println!("{}: {error}", error.kind());
            std::process::exit(1);
        }
    }
}

async fn run(args: &Args, event_json: Option<&str>) -> Result<String> {
    let event = match event_json {
        Some(json) => Event::from_json(json)?,
        None => Event::from_payload(&serde_json::json!({
            "action": args.action,
            "project_name": args.project_name,
            "cluster": args.cluster,
        })),
    };
    tracing::info!(event = ?event, context = %args.context, "Received event");

    let command = event.decode()?;

    let mut config = PauserConfig::from_env()?;
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(transport) = &args.transport {
        config = config.with_transport(transport.parse::<Transport>()?);
    }

    let pauser = ClusterPauser::new(config.build_client()?);
    let outcome = pauser.dispatch(&command).await?;

    Ok(outcome.body)
}

/// Read the raw event JSON, or `None` when the event is built from flags.
fn read_event(args: &Args) -> anyhow::Result<Option<String>> {
    if args.action.is_some() {
        return Ok(None);
    }

    let json = match &args.event {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read event from stdin")?;
            buffer
        }
    };

    Ok(Some(json))
}
