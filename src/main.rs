//! roundtimer - Terminal client for a shared multi-segment interval timer
//!
//! This is the main entry point for the roundtimer CLI.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::watch;
use tracing::info;

use roundtimer::{
    api::{apply_edit, ApiClient, TimerCreationRequest},
    config::{Command, Config},
    model::{validate_segments, Segment},
    round::{format_duration, EditAction},
    tasks::{refresh_task, render_status, watch_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("roundtimer={}", config.log_level()))
        .init();

    let client = ApiClient::new(&config.api_url);

    match config.command {
        Command::Watch { id } => watch(client, id, config.refresh).await,
        Command::Status { id } => status(client, id).await,
        Command::Stop { id, password } => edit(client, id, password, EditAction::Stop).await,
        Command::Resume { id, password } => edit(client, id, password, EditAction::Resume).await,
        Command::Restart { id, password } => edit(client, id, password, EditAction::Restart).await,
        Command::Create {
            id,
            password,
            file,
            repeat,
        } => create(client, id, password, file, repeat).await,
    }
}

/// Follow a timer until it finishes or a shutdown signal arrives
async fn watch(client: ApiClient, id: String, refresh_seconds: u64) -> Result<()> {
    let timer = client.get_timer(&id).await?;
    info!(
        "Watching timer '{}': {} segments, {} per round",
        id,
        timer.segments.len(),
        format_duration(timer.total_round_time() as i64)
    );

    let (updates_tx, updates_rx) = watch::channel(timer);

    let refresh_client = client.clone();
    let refresh_id = id.clone();
    let refresh_handle = tokio::spawn(async move {
        refresh_task(refresh_client, refresh_id, refresh_seconds, updates_tx).await;
    });

    tokio::select! {
        _ = watch_task(updates_rx) => {}
        _ = shutdown_signal() => {
            println!();
            info!("Shutdown signal received");
        }
    }

    refresh_handle.abort();
    Ok(())
}

/// Print one evaluated status line
async fn status(client: ApiClient, id: String) -> Result<()> {
    let timer = client.get_timer(&id).await?;
    let now_ms = Utc::now().timestamp_millis();
    println!("{}", render_status(&timer, now_ms)?);
    Ok(())
}

/// Apply a stop/resume/restart action and print the resulting state
async fn edit(client: ApiClient, id: String, password: String, action: EditAction) -> Result<()> {
    let token = client.login(&id, &password).await?;
    let timer = client.get_timer(&id).await?;

    let now_ms = Utc::now().timestamp_millis();
    let segments = timer.segments.clone();
    let updated = apply_edit(&client, &token, &timer, action, &segments, now_ms).await?;

    println!(
        "{}",
        render_status(&updated, Utc::now().timestamp_millis())?
    );
    Ok(())
}

/// Create a timer from a JSON segment list, starting immediately
async fn create(
    client: ApiClient,
    id: String,
    password: String,
    file: PathBuf,
    repeat: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(&file)?;
    let segments: Vec<Segment> = serde_json::from_str(&raw)?;
    validate_segments(&segments)?;

    let request = TimerCreationRequest {
        id,
        password,
        start_at: Utc::now().timestamp_millis(),
        repeat,
        segments,
    };

    let created = client.create_timer(&request).await?;
    info!(
        "Created timer '{}' ({} per round)",
        created.timer.id,
        format_duration(created.timer.total_round_time() as i64)
    );
    println!("token: {}", created.token);
    Ok(())
}
