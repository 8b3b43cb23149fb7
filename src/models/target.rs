//! Connection target parsed from `<host>[:<port>]`

use crate::utils::ConfigError;
use std::fmt;

/// Host and port of the server whose certificate is being enrolled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
}

impl ConnectionTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse `host`, `host:port`, `[v6-literal]` or `[v6-literal]:port`
    pub fn parse(input: &str, default_port: u16) -> Result<Self, ConfigError> {
        let input = input.trim();
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: "host".to_string(),
            message: format!("{}: '{}'", message, input),
        };

        let (host, port) = if let Some(rest) = input.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| invalid("unterminated IPv6 literal"))?;
            match after {
                "" => (host, None),
                _ => match after.strip_prefix(':') {
                    Some(port) => (host, Some(port)),
                    None => return Err(invalid("unexpected text after IPv6 literal")),
                },
            }
        } else {
            match input.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (input, None),
            }
        };

        if host.is_empty() {
            return Err(invalid("missing host"));
        }

        let port = match port {
            Some(port) => port
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| invalid("invalid port"))?,
            None => default_port,
        };

        Ok(Self::new(host, port))
    }

    /// Trust store alias for the certificate at `index` (0-based) in this host's chain
    pub fn alias_for(&self, index: usize) -> String {
        format!("{}-{}", self.host, index + 1)
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
