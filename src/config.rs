use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::dividends::DEFAULT_MONTHS_TO_CONSIDER;

/// Display/output formatting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Prefix for currency values (e.g. "R$"). `None` renders bare numbers.
    pub currency_symbol: Option<String>,

    /// Decimal places for currency values (half away from zero).
    pub currency_decimals: u32,

    /// Render thousands separators (`.`).
    pub currency_grouping: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: Some("R$".to_string()),
            currency_decimals: 2,
            currency_grouping: true,
        }
    }
}

/// Table names queried on the hosted backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
    pub portfolio_summary: String,
    pub dividends: String,
    pub profiles: String,
    pub portfolio_history: String,
    pub goals: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            portfolio_summary: "portfolio_summary".to_string(),
            dividends: "dividends".to_string(),
            profiles: "client_profiles".to_string(),
            portfolio_history: "portfolio_history".to_string(),
            goals: "financial_goals".to_string(),
        }
    }
}

fn default_api_key_env() -> String {
    "SUPABASE_ANON_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Hosted backend (PostgREST) configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`. Unset means offline.
    pub url: Option<String>,

    /// Environment variable holding the anon/service key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    pub tables: TablesConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            tables: TablesConfig::default(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<SecretString> {
        let value = std::env::var(&self.api_key_env).with_context(|| {
            format!(
                "Backend API key not found in environment variable {}",
                self.api_key_env
            )
        })?;
        Ok(SecretString::from(value))
    }
}

/// Dividend aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividendsConfig {
    /// Month buckets averaged by the monthly-average figure.
    pub months_to_consider: usize,

    /// Number of most recent payments listed on the overview.
    pub recent_limit: usize,
}

impl Default for DividendsConfig {
    fn default() -> Self {
        Self {
            months_to_consider: DEFAULT_MONTHS_TO_CONSIDER,
            recent_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenFinanceConfig {
    /// Query linked institutions while assembling dashboards.
    pub enabled: bool,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub dividends: DividendsConfig,
    pub display: DisplayConfig,
    pub open_finance: OpenFinanceConfig,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./raiox.toml` if it exists in current directory
/// 2. `<config dir>/raiox/raiox.toml`
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("raiox.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("raiox").join("raiox.toml");
    }

    local_config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_empty_config() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("raiox.toml");

        std::fs::File::create(&config_path)?;

        let config = Config::load(&config_path)?;
        assert_eq!(config, Config::default());
        assert_eq!(config.backend.url, None);
        assert_eq!(config.dividends.months_to_consider, 12);

        Ok(())
    }

    #[test]
    fn test_load_backend_config() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("raiox.toml");

        let mut file = std::fs::File::create(&config_path)?;
        writeln!(file, "[backend]")?;
        writeln!(file, "url = \"https://example.supabase.co\"")?;
        writeln!(file, "timeout_secs = 5")?;
        writeln!(file, "[backend.tables]")?;
        writeln!(file, "dividends = \"proventos\"")?;

        let config = Config::load(&config_path)?;
        assert_eq!(
            config.backend.url.as_deref(),
            Some("https://example.supabase.co")
        );
        assert_eq!(config.backend.timeout(), Duration::from_secs(5));
        assert_eq!(config.backend.api_key_env, "SUPABASE_ANON_KEY");
        assert_eq!(config.backend.tables.dividends, "proventos");
        assert_eq!(config.backend.tables.goals, "financial_goals");

        Ok(())
    }

    #[test]
    fn test_load_display_and_dividends() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("raiox.toml");

        let mut file = std::fs::File::create(&config_path)?;
        writeln!(file, "[display]")?;
        writeln!(file, "currency_decimals = 0")?;
        writeln!(file, "[dividends]")?;
        writeln!(file, "months_to_consider = 6")?;
        writeln!(file, "[open_finance]")?;
        writeln!(file, "enabled = true")?;

        let config = Config::load(&config_path)?;
        assert_eq!(config.display.currency_decimals, 0);
        assert_eq!(config.display.currency_symbol.as_deref(), Some("R$"));
        assert!(config.display.currency_grouping);
        assert_eq!(config.dividends.months_to_consider, 6);
        assert_eq!(config.dividends.recent_limit, 10);
        assert!(config.open_finance.enabled);

        Ok(())
    }

    #[test]
    fn test_load_invalid_config_reports_path() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("raiox.toml");
        std::fs::write(&config_path, "[display\n")?;

        let err = Config::load(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        Ok(())
    }

    #[test]
    fn test_config_load_or_default_missing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let config = Config::load_or_default(&dir.path().join("missing.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_api_key_missing_env_is_error() {
        let backend = BackendConfig {
            api_key_env: "RAIOX_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..Default::default()
        };
        assert!(backend.api_key().is_err());
    }
}
