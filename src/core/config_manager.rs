// src/core/config_manager.rs
//! Configuration loading: optional config.yaml overlaid by environment variables

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/jobfinder.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
/// Upper bound on token lifetime: one year
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub database_url: String,
    pub jwt_secret: Option<String>,
    pub port: u16,
    pub token_ttl_hours: i64,
    pub enforce_application_deadline: bool,
    pub log_file: Option<PathBuf>,
}

/// One environment section of config.yaml. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileSection {
    pub database_url: Option<String>,
    pub port: Option<u16>,
    pub token_ttl_hours: Option<i64>,
    pub enforce_application_deadline: Option<bool>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: FileSection,
    #[serde(default)]
    production: FileSection,
}

pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration for the current environment
    pub fn load() -> Result<AppConfig> {
        let environment = Self::get_environment();

        let section = Self::load_file_section(Path::new("config.yaml"), &environment)?;
        Self::resolve(environment, section, |key| std::env::var(key).ok())
    }

    fn get_environment() -> String {
        std::env::var("JOBFINDER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_file_section(path: &Path, environment: &str) -> Result<FileSection> {
        if !path.exists() {
            return Ok(FileSection::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse_file_section(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn parse_file_section(content: &str, environment: &str) -> Result<FileSection> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    /// Environment variables win over the file section, which wins over defaults.
    fn resolve<F>(environment: String, section: FileSection, var: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = var("DATABASE_URL")
            .or(section.database_url)
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let port = match var("ROCKET_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?,
            None => section.port.unwrap_or(DEFAULT_PORT),
        };

        let token_ttl_hours = match var("TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| anyhow::anyhow!("TOKEN_TTL_HOURS must be a number of hours"))?,
            None => section.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS),
        };
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            anyhow::bail!(
                "TOKEN_TTL_HOURS must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS,
                token_ttl_hours
            );
        }

        let enforce_application_deadline = match var("ENFORCE_APPLICATION_DEADLINE") {
            Some(raw) => parse_flag(&raw)?,
            None => section.enforce_application_deadline.unwrap_or(false),
        };

        Ok(AppConfig {
            environment,
            database_url,
            jwt_secret: var("JWT_SECRET").filter(|s| !s.is_empty()),
            port,
            token_ttl_hours,
            enforce_application_deadline,
            log_file: var("LOG_FILE").map(PathBuf::from).or(section.log_file),
        })
    }
}

impl AppConfig {
    /// The JWT secret, required by anything that signs or verifies tokens
    pub fn require_jwt_secret(&self) -> Result<&str> {
        self.jwt_secret
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable not set"))
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("Invalid boolean flag: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let env = vars(&[]);
        let config =
            ConfigManager::resolve("local".into(), FileSection::default(), |k| env.get(k).cloned())
                .unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.token_ttl_hours, DEFAULT_TOKEN_TTL_HOURS);
        assert!(!config.enforce_application_deadline);
        assert!(config.jwt_secret.is_none());
        assert!(config.require_jwt_secret().is_err());
    }

    #[test]
    fn test_env_overrides_file_section() {
        let section = ConfigManager::parse_file_section(
            "local:\n  database_url: sqlite:local.db\n  port: 9000\nproduction:\n  port: 80\n",
            "local",
        )
        .unwrap();
        let env = vars(&[("ROCKET_PORT", "9100"), ("JWT_SECRET", "s3cret")]);

        let config =
            ConfigManager::resolve("local".into(), section, |k| env.get(k).cloned()).unwrap();

        assert_eq!(config.database_url, "sqlite:local.db");
        assert_eq!(config.port, 9100);
        assert_eq!(config.require_jwt_secret().unwrap(), "s3cret");
    }

    #[test]
    fn test_production_section_selected() {
        let section = ConfigManager::parse_file_section(
            "local:\n  port: 9000\nproduction:\n  port: 80\n  enforce_application_deadline: true\n",
            "production",
        )
        .unwrap();
        assert_eq!(section.port, Some(80));
        assert_eq!(section.enforce_application_deadline, Some(true));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let env = vars(&[("ROCKET_PORT", "not-a-port")]);
        let result =
            ConfigManager::resolve("local".into(), FileSection::default(), |k| env.get(k).cloned());
        assert!(result.is_err());
    }

    #[test]
    fn test_token_ttl_out_of_range_is_rejected() {
        for raw in ["0", "-5", "9223372036854775807"] {
            let env = vars(&[("TOKEN_TTL_HOURS", raw)]);
            let result = ConfigManager::resolve("local".into(), FileSection::default(), |k| {
                env.get(k).cloned()
            });
            assert!(result.is_err(), "TOKEN_TTL_HOURS={} accepted", raw);
        }

        let section = FileSection {
            token_ttl_hours: Some(MAX_TOKEN_TTL_HOURS + 1),
            ..FileSection::default()
        };
        let env = vars(&[]);
        assert!(ConfigManager::resolve("local".into(), section, |k| env.get(k).cloned()).is_err());

        let env = vars(&[("TOKEN_TTL_HOURS", "8760")]);
        let config =
            ConfigManager::resolve("local".into(), FileSection::default(), |k| env.get(k).cloned())
                .unwrap();
        assert_eq!(config.token_ttl_hours, MAX_TOKEN_TTL_HOURS);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
