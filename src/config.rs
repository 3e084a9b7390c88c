// ⚙️ Configuration - TOML file with compiled defaults
//
// Lookup order (first hit wins, no merging between files):
// 1. Explicit path (`--config`)
// 2. `FINCALC_CONFIG` environment variable
// 3. `./fincalc.toml`
// 4. `<config dir>/fincalc/fincalc.toml`
// 5. Compiled defaults

use crate::calculators::TaxRules;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_ENV: &str = "FINCALC_CONFIG";
pub const LOCAL_CONFIG: &str = "fincalc.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Record every calculation in the journal
    pub enabled: bool,
    pub database_path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TaxConfig {
    /// JSON rules replacing the built-in FY 2025-26 slabs
    pub rules_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub history: HistoryConfig,
    pub server: ServerConfig,
    pub tax: TaxConfig,
}

/// `<data dir>/fincalc/history.db`, or the working directory if there is no home
pub fn default_database_path() -> PathBuf {
    ProjectDirs::from("", "", "fincalc")
        .map(|dirs| dirs.data_dir().join("history.db"))
        .unwrap_or_else(|| PathBuf::from("fincalc-history.db"))
}

pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "fincalc").map(|dirs| dirs.config_dir().join(LOCAL_CONFIG))
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_from(explicit, from_env.as_deref())
    }

    /// Resolve with the environment value passed in, so callers and tests control it
    pub fn load_from(explicit: Option<&Path>, from_env: Option<&Path>) -> Result<Self> {
        // Named files must exist; discovered ones are optional
        if let Some(named) = explicit.or(from_env) {
            if !named.exists() {
                bail!("Config file not found: {}", named.display());
            }
            return Self::from_file(named);
        }

        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            return Self::from_file(&local);
        }

        if let Some(global) = global_config_path().filter(|p| p.exists()) {
            return Self::from_file(&global);
        }

        Ok(Self::default())
    }

    pub fn tax_rules(&self) -> Result<TaxRules> {
        match &self.tax.rules_path {
            Some(path) => TaxRules::from_file(path),
            None => Ok(TaxRules::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert!(config.history.enabled);
        assert!(config.history.database_path.ends_with("history.db"));
        assert_eq!(config.server.addr(), "127.0.0.1:3000");
        assert!(config.tax.rules_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fincalc.toml");
        fs::write(
            &path,
            r#"
[server]
port = 8080

[history]
enabled = false
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.history.enabled);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = AppConfig::load_from(Some(&missing), None).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_env_path_used_when_no_explicit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("env.toml");
        fs::write(&path, "[server]\nhost = \"0.0.0.0\"\n").unwrap();

        let config = AppConfig::load_from(None, Some(&path)).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_tax_rules_from_config() {
        let dir = TempDir::new().unwrap();
        let rules_path = dir.path().join("rules.json");
        let mut rules = TaxRules::fy_2025_26();
        rules.financial_year = "FY 2026-27".into();
        fs::write(&rules_path, serde_json::to_string(&rules).unwrap()).unwrap();

        let config = AppConfig {
            tax: TaxConfig {
                rules_path: Some(rules_path),
            },
            ..AppConfig::default()
        };

        assert_eq!(config.tax_rules().unwrap().financial_year, "FY 2026-27");
        assert_eq!(AppConfig::default().tax_rules().unwrap().financial_year, "FY 2025-26");
    }

    #[test]
    fn test_bad_toml_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[server\nport = ").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
