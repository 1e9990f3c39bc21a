use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a console layer and a daily rotating file layer (`logs/tkmap.log`).
///
/// `RUST_LOG` wins when set; otherwise everything logs at `info` and the
/// tkmap crates at `debug`.
pub fn setup_logging() {
    let file_appender = tracing_appender::rolling::daily("logs", "tkmap.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true);

    let default_filter = "info,tkmap=debug,tkmap_app=debug,tkmap_http=debug";

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    // the file writer stops flushing once the guard is dropped
    std::mem::forget(guard);
}
