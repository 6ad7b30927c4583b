use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "valentui.log";

/// Sends tracing output to a file, since the terminal belongs to the UI.
/// `RUST_LOG` wins over the level picked by `debug`.
pub fn init(debug: bool) -> anyhow::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(LOG_FILE)?;
    let default_level = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
    Ok(())
}
