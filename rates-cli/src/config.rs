//! Configuration loading from environment.

use std::env;

/// Application configuration.
pub struct Config {
    pub database_url: String,
    pub auto_migrate: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `database_url` comes from the command line and takes precedence over
    /// `DATABASE_URL`.
    pub fn from_env(database_url: Option<String>) -> anyhow::Result<Self> {
        let database_url = match database_url {
            Some(url) => url,
            None => env::var("DATABASE_URL").map_err(|_| {
                anyhow::anyhow!("DATABASE_URL environment variable or --database-url is required")
            })?,
        };

        let auto_migrate = match env::var("RATES_AUTO_MIGRATE") {
            Ok(value) => parse_flag(&value)?,
            Err(_) => true,
        };

        Ok(Self {
            database_url,
            auto_migrate,
        })
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("Invalid RATES_AUTO_MIGRATE value: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag(" On ").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(!parse_flag("false").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_cli_url_takes_precedence() {
        let config = Config::from_env(Some("sqlite::memory:".into())).unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
    }
}
