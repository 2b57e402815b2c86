//! Server configuration: bind port from a CLI argument, the rest from the
//! environment, with documented defaults for the database path and admin
//! bootstrap password.

use std::fmt;

const DEFAULT_PORT: u16 = 50000;
const DEFAULT_DB_PATH: &str = "./proconq_chat.db";

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_host: &'static str,
    pub bind_port: u16,
    pub db_path: String,
    /// If set, `ADMIN` is pre-seeded with this password on first startup.
    /// If absent, `ADMIN` is never registerable or loginable (see DESIGN.md).
    pub admin_password: Option<String>,
}

/// Something was wrong with the process's arguments or environment.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    TooManyArguments,
    NotAnInteger(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyArguments => write!(f, "expected at most one argument (the port)"),
            Self::NotAnInteger(s) => write!(f, "{s:?} is not a valid port number"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Build from `std::env::args()` + environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::parse(&args)
    }

    /// Parse the positional-argument part; split out for testing without touching `std::env`.
    pub fn parse(args: &[String]) -> Result<Self, ConfigError> {
        let bind_port = match args {
            [] => DEFAULT_PORT,
            [port] => port.parse().map_err(|_| ConfigError::NotAnInteger(port.clone()))?,
            _ => return Err(ConfigError::TooManyArguments),
        };

        let db_path = std::env::var("PROCONQ_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        let admin_password = std::env::var("PROCONQ_ADMIN_PASSWORD").ok();

        Ok(Self { bind_host: "0.0.0.0", bind_port, db_path, admin_password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_uses_default_port() {
        let cfg = ServerConfig::parse(&[]).unwrap();
        assert_eq!(cfg.bind_port, DEFAULT_PORT);
    }

    #[test]
    fn one_valid_arg_sets_port() {
        let cfg = ServerConfig::parse(&["60000".to_string()]).unwrap();
        assert_eq!(cfg.bind_port, 60000);
    }

    #[test]
    fn non_integer_arg_is_an_error() {
        assert!(matches!(
            ServerConfig::parse(&["notaport".to_string()]),
            Err(ConfigError::NotAnInteger(_))
        ));
    }

    #[test]
    fn two_args_is_an_error() {
        assert_eq!(
            ServerConfig::parse(&["1".to_string(), "2".to_string()]),
            Err(ConfigError::TooManyArguments)
        );
    }
}
