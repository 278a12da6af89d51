//! CLI logging initialization
//!
//! Per-stage level control built on `tracing-subscriber` target filters.

use std::io;

use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use synaptic_config::Stage;

use crate::config::LogConfig;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Colored multi-line output
    Pretty,
    /// Single-line output
    Compact,
    /// JSON output for tool integration
    Json,
}

/// Initialize the logging system with the given format and levels
pub fn init(log_config: &LogConfig, format: LogFormat) {
    let mut targets = Targets::new().with_default(log_config.global);
    for stage in [
        Stage::Lexer,
        Stage::Parser,
        Stage::Analysis,
        Stage::Tasking,
        Stage::Hub,
    ] {
        targets = targets.with_target(stage.target(), log_config.level_for(stage));
    }

    let stderr_layer = create_format_layer(format, io::stderr).with_filter(targets);
    tracing_subscriber::registry().with(stderr_layer).init();
}

/// Create formatter layer based on format
fn create_format_layer<W, F>(
    format: LogFormat,
    make_writer: F,
) -> impl Layer<tracing_subscriber::Registry>
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}
