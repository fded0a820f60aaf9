//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::settings::FileStore;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "stand-up-now")]
#[command(about = "A clock and working timer server with a persisted countdown duration")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File the settings are persisted to
    #[arg(long)]
    pub settings_file: Option<PathBuf>,

    /// Shell command run when a countdown expires (rings the terminal bell if unset)
    #[arg(long)]
    pub alert_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.settings_file.clone().unwrap_or_else(FileStore::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["stand-up-now"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert!(config.alert_command.is_none());
        assert!(config.settings_path().ends_with("stand-up-now/settings.json"));
    }

    #[test]
    fn overrides() {
        let config = Config::try_parse_from([
            "stand-up-now",
            "-p",
            "8080",
            "--settings-file",
            "/tmp/s.json",
            "--alert-command",
            "paplay alert.ogg",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.settings_path(), PathBuf::from("/tmp/s.json"));
        assert_eq!(config.alert_command.as_deref(), Some("paplay alert.ogg"));
        assert_eq!(config.log_level(), "debug");
    }
}
