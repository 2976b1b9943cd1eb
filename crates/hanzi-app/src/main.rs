use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hanzi_config::Config;
use tokio::signal;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod controller;
pub mod events;
pub mod io;
pub mod state;

use self::cli::Args;
use self::controller::AppController;
use self::events::annotate_once;
use self::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;

    let state = Arc::new(AppState::new(config).await);
    tracing::info!(
        "Translator: {} ({})",
        state.config.translator.provider,
        state.config.translator.model
    );

    let text = match (&args.file, args.inline_text()) {
        (Some(path), _) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        (None, inline) => inline,
    };

    if let Some(text) = text {
        return annotate_once(&state, &text, args.pretty, &mut std::io::stdout()).await;
    }

    if atty::is(atty::Stream::Stdin) {
        eprintln!("Enter Chinese text, one line per request (Ctrl+D to finish)");
    }

    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(args.pretty);

    let interrupted = tokio::select! {
        _ = signal::ctrl_c() => true,
        result = drain(&mut tasks) => {
            result?;
            false
        }
    };

    if interrupted {
        tracing::info!("Shutdown requested");
        controller.shutdown();
        tasks.shutdown().await;
    }

    Ok(())
}

/// Wait for every task, stopping at the first failure
async fn drain(tasks: &mut JoinSet<anyhow::Result<()>>) -> anyhow::Result<()> {
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(e) => return Err(anyhow::anyhow!("task panicked: {e}")),
        }
    }
    Ok(())
}

/// Logs go to stderr so stdout carries only JSON. `LOG_FORMAT=json` switches
/// to structured output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}
