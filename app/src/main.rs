//! Inspect - command surface for inspection templates
//!
//! Reads one JSON request per line from stdin and writes one JSON response
//! per line to stdout. Logs go to stderr.

mod commands;
mod state;

use anyhow::Context;
use commands::{CommandError, Response};
use state::TemplateState;
use std::path::PathBuf;
use store::SettingsManager;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting inspect");

    let data_dir = std::env::var_os("INSPECT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut settings_manager = SettingsManager::new(data_dir);
    settings_manager
        .load()
        .await
        .context("failed to load settings")?;
    tracing::info!("Settings file: {:?}", settings_manager.settings_path());

    let state = TemplateState::new(settings_manager.get());

    serve(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &state,
    )
    .await?;

    tracing::info!("Input closed, shutting down");
    Ok(())
}

/// Answer every request line from `reader` with one response line on `writer`.
///
/// A line that is not valid UTF-8 gets an `invalidRequest` response; only
/// I/O failures on the streams themselves end the loop.
async fn serve<R, W>(mut reader: R, mut writer: W, state: &TemplateState) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("failed to read request")?;
        if read == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                commands::handle_line(line, state)
            }
            Err(e) => {
                tracing::warn!("Request is not valid UTF-8: {}", e);
                Response::from(Err(CommandError::invalid_request(format!(
                    "request is not valid UTF-8: {}",
                    e
                ))))
            }
        };

        let mut out = serde_json::to_string(&response).context("failed to encode response")?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
