//! CLI logging configuration
//!
//! Per-stage level overrides on top of one global level.

use tracing::Level;

use synaptic_config::Stage;

/// CLI log configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    pub lexer: Option<Level>,
    pub parser: Option<Level>,
    pub analysis: Option<Level>,
    pub tasking: Option<Level>,
    pub hub: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::INFO,
            lexer: None,
            parser: None,
            analysis: None,
            tasking: None,
            hub: None,
        }
    }
}

impl LogConfig {
    /// Get log level for a specific stage
    pub fn level_for(&self, stage: Stage) -> Level {
        let specific = match stage {
            Stage::Lexer => self.lexer,
            Stage::Parser => self.parser,
            Stage::Analysis => self.analysis,
            Stage::Tasking => self.tasking,
            Stage::Hub => self.hub,
        };
        specific.unwrap_or(self.global)
    }
}

/// Parse log level string
pub fn parse_log_level(s: &str) -> Option<Level> {
    match s.to_lowercase().as_str() {
        "silent" => Some(Level::ERROR),
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_level_overrides_global() {
        let config = LogConfig {
            parser: Some(Level::TRACE),
            ..LogConfig::default()
        };
        assert_eq!(config.level_for(Stage::Parser), Level::TRACE);
        assert_eq!(config.level_for(Stage::Lexer), Level::INFO);
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_log_level("silent"), Some(Level::ERROR));
        assert_eq!(parse_log_level("noisy"), None);
    }
}
