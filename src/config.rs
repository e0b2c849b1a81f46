use std::path::Path;

use error_stack::{Report, ResultExt};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::indicator::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW, SmaWindows};
use crate::model::LookbackPeriod;

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

fn default_short_window() -> usize {
    DEFAULT_SHORT_WINDOW
}

fn default_long_window() -> usize {
    DEFAULT_LONG_WINDOW
}

fn default_period() -> String {
    LookbackPeriod::default().as_str().into()
}

fn default_currency() -> String {
    "$".into()
}

fn default_base_url() -> String {
    "https://query1.finance.yahoo.com".into()
}

fn default_user_agent() -> String {
    concat!("Mozilla/5.0 (compatible; sma-crossover/", env!("CARGO_PKG_VERSION"), ")").into()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_requests_per_second() -> u32 {
    2
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Accepted values: `"text"` | `"json"`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StrategyConfig {
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    #[serde(default = "default_long_window")]
    pub long_window: usize,
    /// Lookback period, e.g. `"6mo"`, `"1y"`, `"2y"`.
    #[serde(default = "default_period")]
    pub period: String,
    /// Prefix for prices in the report.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
            period: default_period(),
            currency: default_currency(),
        }
    }
}

impl StrategyConfig {
    /// Parsed lookback period.
    pub fn lookback(&self) -> Result<LookbackPeriod, Report<ConfigError>> {
        LookbackPeriod::from_str(&self.period).ok_or_else(|| {
            Report::new(ConfigError::Validation {
                field: format!("strategy.period: unknown period \"{}\"", self.period),
            })
        })
    }

    pub fn windows(&self) -> Result<SmaWindows, Report<ConfigError>> {
        SmaWindows::new(self.short_window, self.long_window).change_context(
            ConfigError::Validation {
                field: "strategy.short_window/long_window".into(),
            },
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// Load an `AppConfig` from a TOML file at `path`.
///
/// The result is not validated yet; CLI overrides are applied first and then
/// [`validate`] runs on the merged config.
pub fn load(path: &Path) -> Result<AppConfig, Report<ConfigError>> {
    let content = std::fs::read_to_string(path)
        .change_context(ConfigError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    toml::from_str(&content).change_context(ConfigError::Parse {
        reason: "invalid TOML syntax or schema mismatch".into(),
    })
}

const VALID_LOG_FORMATS: &[&str] = &["text", "json"];

pub fn validate(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    validate_general(config)?;
    validate_strategy(config)?;
    validate_provider(config)?;
    Ok(())
}

fn validate_general(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if !VALID_LOG_FORMATS.contains(&config.general.log_format.as_str()) {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "general.log_format \"{}\" is not valid",
                config.general.log_format
            ),
        }));
    }
    Ok(())
}

fn validate_strategy(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    let strategy = &config.strategy;
    strategy.lookback()?;
    strategy.windows()?;

    if strategy.short_window >= strategy.long_window {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "strategy.short_window ({}) must be less than strategy.long_window ({})",
                strategy.short_window, strategy.long_window
            ),
        }));
    }
    Ok(())
}

fn validate_provider(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    let provider = &config.provider;
    if provider.timeout_secs == 0 {
        return Err(Report::new(ConfigError::Validation {
            field: "provider.timeout_secs must be > 0".into(),
        }));
    }
    if provider.requests_per_second == 0 {
        return Err(Report::new(ConfigError::Validation {
            field: "provider.requests_per_second must be > 0".into(),
        }));
    }
    Ok(())
}
