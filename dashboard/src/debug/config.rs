//! Logging configuration from environment variables

use std::path::PathBuf;

const DEFAULT_FILTER: &str = "dashboard=info,lib_evm=info,warn";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level filter (e.g., "dashboard=debug,info")
    pub log_level: String,
    /// Log directory (for rotation)
    pub log_dir: PathBuf,
    /// File name prefix of the rotated log
    pub file_prefix: String,
    /// Mirror log lines to stderr
    pub log_to_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_FILTER.to_string(),
            log_dir: PathBuf::from("logs"),
            file_prefix: "dashboard.log".to_string(),
            log_to_stderr: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_dir: std::env::var("DASHBOARD_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            file_prefix: defaults.file_prefix,
            log_to_stderr: std::env::var("DASHBOARD_LOG_STDERR")
                .map(|v| v == "1")
                .unwrap_or(false),
        }
    }

    /// Path of today's log file prefix (the appender adds the date suffix).
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(&self.file_prefix)
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.log_file(), PathBuf::from("logs/dashboard.log"));
        assert!(!config.is_debug_enabled());
        assert!(!config.log_to_stderr);
    }

    #[test]
    fn test_debug_detection() {
        let config = LogConfig {
            log_level: "dashboard=debug,warn".to_string(),
            ..LogConfig::default()
        };
        assert!(config.is_debug_enabled());
    }
}
