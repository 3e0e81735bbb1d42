use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::chart::palette::ColorMode;
use crate::chart::viewport::{INITIAL_CHART_WIDTH, VIEWPORT_MARGIN};
use crate::model::indicator::{Indicator, IndicatorToggles};
use crate::model::timeframe::Timeframe;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const API_URL_ENV: &str = "STOCKSCOPE_API_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub chart: ChartConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_candles_path")]
    pub candles_path: String,
    #[serde(default = "default_prediction_path")]
    pub prediction_path: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub symbol: String,
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub timeframe: Timeframe,
    #[serde(default = "default_indicators")]
    pub indicators: Vec<String>,
    #[serde(default)]
    pub color_mode: ColorMode,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    #[serde(default)]
    pub compute_missing_indicators: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// `RUST_LOG` wins over the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        Self::resolve_filter(std::env::var("RUST_LOG").ok().as_deref(), &self.level)
    }

    /// Filter from an explicit directive, else the configured level, else
    /// `info` when neither parses.
    pub fn resolve_filter(directive: Option<&str>, level: &str) -> EnvFilter {
        directive
            .filter(|d| !d.trim().is_empty())
            .and_then(|d| EnvFilter::try_new(d).ok())
            .or_else(|| EnvFilter::try_new(level).ok())
            .unwrap_or_else(|| EnvFilter::new("info"))
    }
}

fn default_candles_path() -> String {
    "/api/stocks".to_string()
}

fn default_prediction_path() -> String {
    "/api/predict".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_indicators() -> Vec<String> {
    IndicatorToggles::default()
        .labels()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_viewport_width() -> u32 {
    INITIAL_CHART_WIDTH + VIEWPORT_MARGIN
}

fn default_output_dir() -> String {
    "out".to_string()
}

impl ChartConfig {
    /// Primary symbol first, then the extra symbols, uppercased and deduplicated.
    pub fn symbol_list(&self) -> Vec<String> {
        let mut out = Vec::new();
        for sym in std::iter::once(&self.symbol).chain(self.symbols.iter()) {
            let s = sym.trim().to_ascii_uppercase();
            if !s.is_empty() && !out.iter().any(|v| v == &s) {
                out.push(s);
            }
        }
        out
    }

    /// Initial toggle set. Unknown labels are a config error here, unlike the
    /// lenient runtime surface.
    pub fn toggles(&self) -> Result<IndicatorToggles> {
        self.indicators
            .iter()
            .map(|label| {
                label
                    .parse::<Indicator>()
                    .map_err(|e| anyhow!("chart.indicators: {}", e))
            })
            .collect()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api.base_url = url.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate without touching the environment.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url)
            .with_context(|| format!("api.base_url '{}' is not a valid URL", self.api.base_url))?;
        if self.chart.symbol_list().is_empty() {
            bail!("chart.symbol must not be empty");
        }
        if self.chart.viewport_width == 0 {
            bail!("chart.viewport_width must be > 0");
        }
        if self.ui.refresh_rate_ms == 0 {
            bail!("ui.refresh_rate_ms must be > 0");
        }
        self.chart.toggles()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_list_dedup_and_include_primary() {
        let cfg = ChartConfig {
            symbol: "nabil".to_string(),
            symbols: vec![
                "NICA".to_string(),
                "NABIL".to_string(),
                "  ".to_string(),
            ],
            timeframe: Timeframe::default(),
            indicators: default_indicators(),
            color_mode: ColorMode::Light,
            viewport_width: 1020,
            compute_missing_indicators: false,
            output_dir: "out".to_string(),
        };
        assert_eq!(
            cfg.symbol_list(),
            vec!["NABIL".to_string(), "NICA".to_string()]
        );
    }

    #[test]
    fn default_indicators_match_default_toggles() {
        assert_eq!(default_indicators(), vec!["EMA12", "EMA26"]);
    }
}
