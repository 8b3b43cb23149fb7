//! CLI argument definitions using clap

use crate::config::Settings;
use crate::models::ConnectionTarget;
use crate::utils::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// One-line usage printed when positional arguments are missing or extra
pub const USAGE: &str = "Usage: install-cert <host>[:port] [passphrase]";

#[derive(Parser, Debug)]
#[command(name = "install-cert")]
#[command(author = "Russ McKendrick")]
#[command(version)]
#[command(
    about = "Capture a server's TLS certificate chain and add a certificate to a trust store",
    long_about = None
)]
pub struct Cli {
    /// Server to connect to, as host or host:port
    #[arg(value_name = "HOST[:PORT]")]
    pub target: String,

    /// Trust store passphrase (default: changeit)
    #[arg(value_name = "PASSPHRASE")]
    pub passphrase: Option<String>,

    /// Settings file (default: config/default.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input trust store, skipping the fallback search
    #[arg(short, long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Where to write the updated trust store (default: jssecacerts)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Connect and handshake timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Parse the target using the configured default port
    pub fn connection_target(&self, settings: &Settings) -> Result<ConnectionTarget, ConfigError> {
        ConnectionTarget::parse(&self.target, settings.tls.default_port)
    }

    /// Apply command-line overrides on top of loaded settings
    pub fn apply_overrides(&self, settings: &mut Settings) -> Result<(), ConfigError> {
        if let Some(passphrase) = &self.passphrase {
            settings.store.passphrase = passphrase.clone();
        }
        if let Some(store) = &self.store {
            settings.store.path = Some(store.clone());
        }
        if let Some(output) = &self.output {
            settings.store.output = output.clone();
        }
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "timeout".to_string(),
                    message: "must be at least one second".to_string(),
                });
            }
            settings.tls.connect_timeout_secs = timeout;
            settings.tls.handshake_timeout_secs = timeout;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_only() {
        let cli = Cli::try_parse_from(["install-cert", "example.com"]).unwrap();
        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings).unwrap();
        assert_eq!(
            cli.connection_target(&settings).unwrap(),
            ConnectionTarget::new("example.com", 443)
        );
        assert_eq!(settings.store.passphrase, "changeit");
    }

    #[test]
    fn test_passphrase_and_overrides() {
        let cli = Cli::try_parse_from([
            "install-cert",
            "example.com:8443",
            "s3cret",
            "--output",
            "out.p12",
            "--timeout",
            "3",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings).unwrap();
        assert_eq!(settings.store.passphrase, "s3cret");
        assert_eq!(settings.store.output, PathBuf::from("out.p12"));
        assert_eq!(settings.tls.connect_timeout_secs, 3);
        assert_eq!(settings.tls.handshake_timeout_secs, 3);
        assert_eq!(cli.connection_target(&settings).unwrap().port, 8443);
    }

    #[test]
    fn test_missing_and_extra_arguments_fail_to_parse() {
        assert!(Cli::try_parse_from(["install-cert"]).is_err());
        assert!(Cli::try_parse_from(["install-cert", "a", "b", "c"]).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = Cli::try_parse_from(["install-cert", "example.com", "-t", "0"]).unwrap();
        assert!(cli.apply_overrides(&mut Settings::default()).is_err());
    }
}
