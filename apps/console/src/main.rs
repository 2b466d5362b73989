mod commands;
mod render;

use std::{io::Write as _, path::Path, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    config::load_settings, filter::today, ClientError, DocumentUpload, RefreshCoordinator,
};
use commands::{ConsoleCommand, HELP};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Browse, refresh and track RFP opportunities from a terminal")]
struct Args {
    /// Backend base URL; overrides rfp_client.toml and APP__API_BASE.
    #[arg(long, env = "RFP_API_BASE")]
    api_base: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings()
        .with_api_base(args.api_base.as_deref())
        .context("invalid API base")?;
    let coordinator = RefreshCoordinator::from_settings(&settings)?;

    match coordinator.health().await {
        Ok(status) => info!(status = %status, "backend reachable"),
        Err(err) => warn!("health check failed: {}", err.user_message()),
    }
    let _ = coordinator.go_to_page(0).await;
    let _ = coordinator.reload_saved().await;
    coordinator.dismiss_error().await;
    print!("{}", render::list(&coordinator.snapshot().await, today()));
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{usage}");
                continue;
            }
        };
        if command == ConsoleCommand::Quit {
            break;
        }
        if let Err(err) = run_command(&coordinator, command, settings.poll_interval()).await {
            let recorded = coordinator.snapshot().await.error;
            let message = match (recorded, err.downcast_ref::<ClientError>()) {
                (Some(recorded), _) => recorded,
                (None, Some(client)) => client.user_message(),
                (None, None) => format!("{err:#}"),
            };
            println!("error: {message}");
            coordinator.dismiss_error().await;
        }
    }
    Ok(())
}

async fn run_command(
    coordinator: &RefreshCoordinator,
    command: ConsoleCommand,
    tick: Duration,
) -> Result<()> {
    match command {
        ConsoleCommand::List => {
            coordinator.reload_list().await?;
        }
        ConsoleCommand::Next => {
            if !coordinator.go_next().await? {
                println!("already on the last page");
            }
        }
        ConsoleCommand::Prev => {
            if !coordinator.go_prev().await? {
                println!("already on the first page");
            }
        }
        ConsoleCommand::Page { page } => {
            coordinator.go_to_page(page).await?;
        }
        ConsoleCommand::Filter { query } => coordinator.set_query(query).await,
        ConsoleCommand::ClearFilter => coordinator.set_query("").await,
        ConsoleCommand::Refresh => {
            refresh_with_progress(coordinator, tick).await?;
        }
        ConsoleCommand::Saved => {
            coordinator.reload_saved().await?;
            print!("{}", render::saved(&coordinator.snapshot().await));
            return Ok(());
        }
        ConsoleCommand::Save { rfp_id } => {
            coordinator.save(rfp_id).await?;
            println!("saved #{rfp_id}");
            return Ok(());
        }
        ConsoleCommand::Remove { rfp_id } => {
            coordinator.remove(rfp_id).await?;
            println!("removed #{rfp_id}");
            return Ok(());
        }
        ConsoleCommand::Open { rfp_id } => {
            let detail = coordinator.open_saved(rfp_id).await?;
            print!("{}", render::detail(&detail));
            return Ok(());
        }
        ConsoleCommand::Close => {
            coordinator.close_detail().await;
            return Ok(());
        }
        ConsoleCommand::Upload { path } => {
            let upload = read_upload(&path).await?;
            let detail = coordinator.upload_document(upload).await?;
            print!("{}", render::detail(&detail));
            return Ok(());
        }
        ConsoleCommand::Note { text } => {
            let detail = coordinator.add_note(&text).await?;
            print!("{}", render::detail(&detail));
            return Ok(());
        }
        ConsoleCommand::Document { name, out } => {
            let rfp_id = coordinator
                .snapshot()
                .await
                .saved
                .open_rfp_id()
                .ok_or(ClientError::NoDetailOpen)?;
            let bytes = coordinator.download_document(rfp_id, &name).await?;
            let out = out.unwrap_or_else(|| Path::new(&name).to_path_buf());
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("writing {}", out.display()))?;
            println!("wrote {} bytes to {}", bytes.len(), out.display());
            return Ok(());
        }
        ConsoleCommand::Seed => {
            let message = coordinator.seed_demo_data().await?;
            println!("{message}");
        }
        ConsoleCommand::Health => {
            let status = coordinator.health().await?;
            println!("backend status: {status}");
            return Ok(());
        }
        ConsoleCommand::Help => {
            println!("{HELP}");
            return Ok(());
        }
        ConsoleCommand::Quit => return Ok(()),
    }
    print!("{}", render::list(&coordinator.snapshot().await, today()));
    Ok(())
}

/// Drives a refresh while redrawing the progress bar on stderr.
async fn refresh_with_progress(coordinator: &RefreshCoordinator, tick: Duration) -> Result<()> {
    if !coordinator.can_refresh().await {
        return Err(ClientError::RefreshInProgress.into());
    }
    let state = coordinator.state();
    let refresh = coordinator.refresh();
    tokio::pin!(refresh);
    let mut ticker = tokio::time::interval(tick);

    let result = loop {
        tokio::select! {
            result = &mut refresh => break result,
            _ = ticker.tick() => {
                let progress = state.lock().await.progress.clone();
                if !progress.is_empty() {
                    eprint!("\r{}", render::progress_bar(&progress));
                }
            }
        }
    };
    eprintln!();

    let outcome = result?;
    if let Some(message) = outcome.message {
        println!("{message}");
    }
    for problem in &outcome.ingest_errors {
        println!("  warning: {problem}");
    }
    Ok(())
}

async fn read_upload(path: &Path) -> Result<DocumentUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("upload path has no file name")?
        .to_string();
    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());
    Ok(DocumentUpload {
        filename,
        mime_type,
        bytes,
    })
}
