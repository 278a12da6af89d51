//! Synaptic CLI - interactive statement processor
//!
//! Reads statements from stdin at an `E: ` prompt, runs each through the
//! hub pipeline, and renders finished descriptors to the terminal. All
//! configuration comes from synaptic.json; a missing file means defaults.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;

mod config;
mod input;
mod logging;
mod sink;

use synaptic_config::{SynapticConfig, TaskingConfig};
use synaptic_core::SynapticHub;

use crate::config::{parse_log_level, LogConfig};
use crate::input::StatementReader;
use crate::logging::LogFormat;
use crate::sink::TerminalSink;

/// synaptic.json structure
#[derive(Debug, Default, serde::Deserialize)]
struct ProjectJson {
    /// Worker pool sizing
    #[serde(default)]
    tasking: TaskingConfig,
    /// Log level: "silent", "error", "warn", "info", "debug", "trace"
    log_level: Option<String>,
}

#[derive(Parser)]
#[command(
    name = "synaptic",
    about = "Synaptic statement processor - interactive session",
    version = "0.1.0"
)]
struct Cli {
    /// Configuration file path (default: ./synaptic.json)
    #[arg(value_name = "CONFIG", default_value = "synaptic.json")]
    config: PathBuf,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

fn main() {
    let cli = Cli::parse();

    let project = match read_project_json(&cli.config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let mut log_config = LogConfig::default();
    if let Some(level) = project.log_level.as_deref().and_then(parse_log_level) {
        log_config.global = level;
    }
    logging::init(&log_config, cli.log_format);

    let config = SynapticConfig {
        tasking: project.tasking,
    };
    let hub = match SynapticHub::new(config, Arc::new(TerminalSink)) {
        Ok(hub) => hub,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = repl(&hub) {
        eprintln!("Error: {e}");
    }

    if let Err(e) = hub.shutdown() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Read and parse synaptic.json; a missing file yields defaults
fn read_project_json(path: &Path) -> Result<ProjectJson, String> {
    if !path.exists() {
        return Ok(ProjectJson::default());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("cannot parse '{}': {}", path.display(), e))
}

/// Prompt-read-process loop; returns on `exit` or end of input
fn repl(hub: &SynapticHub) -> io::Result<()> {
    let stdin = io::stdin();
    let mut reader = StatementReader::new(stdin.lock());

    loop {
        print!("E: ");
        io::stdout().flush()?;

        match reader.read_statement()? {
            None => break,
            Some(statement) if statement == "exit" => break,
            Some(statement) => {
                if let Err(e) = hub.process(Arc::from(statement.as_str())) {
                    eprintln!("Error: {e}");
                }
            }
        }
    }
    Ok(())
}
