//! Dashboard configuration: built-in defaults, optionally overridden by a
//! `dashboard.toml` in the working directory.

use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_SOURCE: &str = "shitcoin_data.csv";
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_TITLE: &str = "OSHIT Transaction Dashboard";
pub const DEFAULT_INTRO: &str = "Welcome to the OSHIT Transaction Dashboard. This dashboard \
provides insights into the recent activity of the OSHIT coin, a cryptocurrency linked to the \
\"Give a SHIT\" initiative. It visualizes the most recent transactions of the coin: the flow of \
transactions, the most active addresses and the transaction values during this period.";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Transaction CSV read at startup.
    pub source: PathBuf,
    /// Length of every top-N list.
    pub top_n: usize,
    pub page_title: String,
    pub intro: String,
    /// Max tracing level: error, warn, info, debug or trace.
    pub log_level: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            top_n: DEFAULT_TOP_N,
            page_title: DEFAULT_TITLE.to_string(),
            intro: DEFAULT_INTRO.to_string(),
            log_level: "info".to_string(),
            window_width: 1400.0,
            window_height: 900.0,
        }
    }
}

impl DashboardConfig {
    /// Load `dashboard.toml` on top of the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("dashboard")
    }

    /// Load the named config file (extension optional) on top of the defaults.
    pub fn load_from(name: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Config::builder()
            .set_default("source", DEFAULT_SOURCE)?
            .set_default("top_n", defaults.top_n as u64)?
            .set_default("page_title", defaults.page_title)?
            .set_default("intro", defaults.intro)?
            .set_default("log_level", defaults.log_level)?
            .set_default("window_width", defaults.window_width as f64)?
            .set_default("window_height", defaults.window_height as f64)?
            .add_source(File::with_name(name).required(false))
            .build()?
            .try_deserialize()
    }

    /// Parsed `log_level`, falling back to INFO.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let config = DashboardConfig::load_from("/no/such/dashboard").unwrap();

        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.source, PathBuf::from("shitcoin_data.csv"));
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!(
            "txn_dashboard_{}_config.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "source = \"data/other.csv\"\ntop_n = 5\nlog_level = \"debug\"").unwrap();

        let config = DashboardConfig::load_from(path.to_str().unwrap()).unwrap();

        assert_eq!(config.source, PathBuf::from("data/other.csv"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
        assert_eq!(config.page_title, DEFAULT_TITLE);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = DashboardConfig {
            log_level: "chatty".to_string(),
            ..DashboardConfig::default()
        };

        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }
}
