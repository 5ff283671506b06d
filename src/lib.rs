pub mod analysis;
pub mod bridge;
pub mod classifier;
pub mod collection;
pub mod desk;
pub mod edit;
pub mod errors;
pub mod facets;
pub mod models;
pub mod settings;

pub use crate::desk::DocumentDesk;
pub use crate::errors::{AppError, AppResult};

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

pub const DATA_DIR_ENV: &str = "DOCDESK_DATA_DIR";

/// Runs the desk over stdin/stdout until stdin closes.
pub fn run() -> anyhow::Result<()> {
    let data_dir = std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("document-desk"));
    if let Err(error) = init_tracing(&data_dir) {
        eprintln!("failed to initialize tracing: {}", error);
    }

    let settings = settings::load_settings_from_env().context("loading desk settings")?;
    let desk = DocumentDesk::new(settings).context("building document desk")?;
    tracing::info!(categories = desk.categories().len(), "document desk ready");

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(async {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        bridge::serve(&desk, stdin, tokio::io::stdout()).await
    })?;

    tracing::info!("document desk stopped");
    Ok(())
}

fn init_tracing(app_data_dir: &Path) -> Result<(), String> {
    let log_dir = app_data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "desk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}
