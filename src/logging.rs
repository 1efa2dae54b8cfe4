use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

const DEFAULT_FILTER: &str = "superpixel_board=debug,info";

pub const LOG_DIR: &str = "logs";
pub const LOG_FILE: &str = "superpixel_board.log";

/// Keep the returned guard alive, the file layer stops flushing once it drops.
pub fn init_logs() -> Option<WorkerGuard> {
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to bridge log records: {}", e);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::LocalTime::rfc_3339())
        .with_target(false)
        .with_line_number(true);

    let (file_layer, guard) = match std::fs::create_dir_all(LOG_DIR) {
        Ok(()) => {
            let appender = tracing_appender::rolling::never(LOG_DIR, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("Failed to create log directory {}: {}", LOG_DIR, e);
            (None, None)
        }
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    debug!("Logging initialized");

    guard
}
