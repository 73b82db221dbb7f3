use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{ClientEvent, DashboardClient};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

mod config;
mod console;

use config::load_settings;
use console::ConsoleView;

#[derive(Parser, Debug)]
#[command(about = "Operator dashboard for the plate-triggered gate controller")]
struct Args {
    /// Base URL of the gate status server.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = "dashboard.toml")]
    config: PathBuf,
    /// Undo the local toggle when the server cannot be told about it.
    #[arg(long)]
    reconcile_on_failure: bool,
    /// Ignore status responses that arrive after a newer one was shown.
    #[arg(long)]
    discard_stale_responses: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Toggle,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "t" | "toggle" => Some(Command::Toggle),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    settings.reconcile_on_failure |= args.reconcile_on_failure;
    settings.discard_stale_responses |= args.discard_stale_responses;

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let view = Arc::new(ConsoleView::new());
    let client = DashboardClient::new(&settings.server_url, view, settings.client_options())
        .with_context(|| format!("failed to start dashboard for {}", settings.server_url))?;
    client.render_initial();

    let event_log = spawn_event_log(client.subscribe_events());
    let polling = client.start_polling();
    info!(server_url = %settings.server_url, "dashboard: ready (t = toggle detection, q = quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line.context("failed to read operator input")? {
                    Some(line) => match parse_command(&line) {
                        Some(Command::Toggle) => {
                            let _ = client.toggle_detection();
                        }
                        Some(Command::Quit) => break,
                        None if line.trim().is_empty() => {}
                        None => warn!(input = line.trim(), "dashboard: unknown command"),
                    },
                    None => {
                        debug!("dashboard: stdin closed, waiting for ctrl-c");
                        stdin_open = false;
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for ctrl-c")?;
                break;
            }
        }
    }

    polling.stop().await;
    event_log.abort();
    info!("dashboard: shut down");
    Ok(())
}

fn spawn_event_log(mut events: broadcast::Receiver<ClientEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ClientEvent::ToggleAcknowledged {
                    running,
                    server_status,
                }) => info!(
                    running,
                    server_status = server_status.as_deref().unwrap_or_default(),
                    "dashboard: server accepted toggle"
                ),
                Ok(ClientEvent::ToggleReverted { running }) => {
                    info!(running, "dashboard: toggle reverted")
                }
                Ok(ClientEvent::Diagnostic(diagnostic)) => debug!(
                    source = ?diagnostic.source,
                    kind = ?diagnostic.kind,
                    message = %diagnostic.message,
                    "dashboard: diagnostic"
                ),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "dashboard: event log lagged")
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
