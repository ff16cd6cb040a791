// Logging module
// Console and optional rolling-file output through the tracing ecosystem.
//
// Verbosity comes from RUST_LOG when set, otherwise from the level passed in.

use std::path::Path;

use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Map the numeric console verbosity used on the command line to a filter
/// directive (0=error, 1=warn, 2=info, 3=debug, 4 and above=trace)
pub fn map_log_level(level: i32) -> &'static str {
    match level {
        i32::MIN..=0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

/// Initialize the logging system.
/// When `log_dir` is given, a daily rolling `<file_name>` in that directory
/// receives a copy of everything without ANSI colors.
pub fn initialize_logging(log_dir: Option<&str>, log_level: &str, file_name: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    if let Some(dir) = log_dir {
        let path = Path::new(dir);
        if !path.exists() {
            let _ = std::fs::create_dir_all(path);
        }

        let file_appender = rolling::daily(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // The guard flushes on drop; keep it for the life of the process
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_thread_ids(false),
            )
            .with(
                fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_thread_ids(false),
            )
            .init();
    }
}
