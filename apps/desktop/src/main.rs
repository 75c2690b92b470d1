use std::{
    io::{self, Write as _},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{HeroViewController, HeroesView, HttpClientOptions, HttpHeroClient};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod orchestration;
mod render;

use commands::{CommandParseError, ViewCommand, HELP};
use config::{load_settings, normalize_api_url};
use orchestration::{dispatch_view_command, Dispatch, UiEvent};

#[derive(Parser, Debug)]
#[command(name = "code-heroes", about = "Terminal view of the CodeHeroes roster")]
struct Args {
    /// Hero API base URL; wins over the config file and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Config file to read instead of ./heroes.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

async fn redraw(controller: &HeroViewController, notice: Option<&str>) -> Result<()> {
    let view = HeroesView::from_state(&controller.snapshot().await);
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "\n{}", render::render(&view))?;
    if let Some(notice) = notice {
        writeln!(stdout, "» {notice}")?;
    }
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not interleave with the rendered view.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_url = normalize_api_url(&api_url)?;
    }
    info!(api_url = %settings.api_url, timeout = ?settings.request_timeout(), "starting hero view");

    let client = HttpHeroClient::with_options(
        settings.api_url.clone(),
        HttpClientOptions {
            request_timeout: settings.request_timeout(),
        },
    )
    .context("failed to build HTTP client")?;
    let controller = HeroViewController::new(Arc::new(client));
    let (ui_tx, mut ui_rx) = mpsc::channel::<UiEvent>(64);

    // Initial load, same path as a user-triggered refresh.
    dispatch_view_command(&controller, ViewCommand::Refresh, &ui_tx).await;
    redraw(&controller, None).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    break;
                };
                let command = match line.trim_end_matches('\r').parse::<ViewCommand>() {
                    Ok(command) => command,
                    Err(CommandParseError::Empty) => {
                        redraw(&controller, None).await?;
                        continue;
                    }
                    Err(err) => {
                        redraw(&controller, Some(&err.to_string())).await?;
                        continue;
                    }
                };
                match dispatch_view_command(&controller, command, &ui_tx).await {
                    Dispatch::Quit => break,
                    Dispatch::Help => redraw(&controller, Some(HELP)).await?,
                    Dispatch::Rejected(reason) => redraw(&controller, Some(reason)).await?,
                    Dispatch::Applied | Dispatch::Started => redraw(&controller, None).await?,
                }
            }
            Some(UiEvent::OperationFinished { command }) = ui_rx.recv() => {
                tracing::debug!(command, "operation finished; redrawing");
                redraw(&controller, None).await?;
            }
        }
    }

    info!("bye");
    Ok(())
}
