//! Subscriber set-up: rolling file output plus coloured stdout in text mode

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;

fn rotation(name: &str) -> Rotation {
    match name {
        "minutely" => Rotation::MINUTELY,
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        _ => Rotation::NEVER,
    }
}

/// `RUST_LOG` wins; otherwise the configured level applies to our crate and
/// to tower-http request spans alike.
fn directives(config: &AppConfig) -> String {
    format!(
        "{lvl},autoplaza={lvl},tower_http={lvl}",
        lvl = config.log_level
    )
}

/// Install the global subscriber. Hold on to the returned guard until
/// shutdown, dropping it stops the background file writer.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let appender = RollingFileAppender::new(
        rotation(&config.rotation),
        &config.log_dir,
        &config.log_file,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(config)));

    let (json_file, text_file, stdout) = if config.use_json {
        let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
        (Some(layer), None, None)
    } else {
        let layer = fmt::layer()
            .with_target(false)
            .with_writer(writer)
            .with_ansi(false);
        let console = fmt::layer().with_target(false);
        (None, Some(layer), Some(console))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_file)
        .with(text_file)
        .with(stdout)
        .init();

    guard
}
