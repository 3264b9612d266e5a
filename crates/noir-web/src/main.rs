//! `noir-web`: serve the Neo-Tokyo Noir studio over HTTP and WebSocket.
//!
//! # Usage
//!
//! ```bash
//! OPENROUTER_KEY=sk-... cargo run -p noir-web
//! OPENROUTER_KEY=sk-... cargo run -p noir-web -- --model google/gemini-2.5-pro
//! OPENROUTER_KEY=sk-... cargo run -p noir-web -- --port 8080 --static-dir ./web/out
//! ```
//!
//! Then call the API with curl, or connect to `/ws` to watch batch progress:
//!
//! ```bash
//! curl -X POST localhost:3001/api/generate/glossary -d '{"theme":"undercity slang"}' \
//!      -H 'content-type: application/json'
//! ```

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use noir_studio::prelude::*;
use noir_web::{WebConfig, spawn_web};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// HTTP and WebSocket server for the studio.
#[derive(Parser)]
#[command(name = "noir-web", version)]
struct Args {
    /// TOML config file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the text model from the config.
    #[arg(long)]
    model: Option<String>,

    /// Port to listen on (127.0.0.1).
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Serve static front-end files from this directory.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), String> {
    let mut config =
        StudioConfig::load_or_default(args.config.as_deref()).map_err(|e| e.user_message())?;
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    let api_key = api_key_from_env().map_err(|e| e.user_message())?;
    let client = OpenRouterClient::from_config(api_key, &config).map_err(|e| e.user_message())?;
    let studio = Arc::new(Studio::new(CompletionClient::new(client)));

    let web_config = WebConfig {
        bind_addr: ([127, 0, 0, 1], args.port).into(),
        static_dir: args.static_dir,
        ..Default::default()
    };
    let (addr, _ws_tx) = spawn_web(studio, web_config)
        .await
        .map_err(|e| format!("binding port {}: {e}", args.port))?;
    info!("model {} / image model {}", config.model, config.image_model);
    println!("Studio: http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("waiting for Ctrl-C: {e}"))?;
    println!("Shutting down.");
    Ok(())
}
