use std::path::Path;

use stockscope::chart::palette::ColorMode;
use stockscope::config::{Config, LoggingConfig};
use stockscope::model::indicator::Indicator;
use stockscope::model::timeframe::Timeframe;

const FULL: &str = r#"
[api]
base_url = "http://localhost:8000"
candles_path = "/api/stocks"
prediction_path = "/api/predict"
request_timeout_ms = 2500

[chart]
symbol = "nabil"
symbols = ["NICA", "NTC", "nabil"]
timeframe = "1Y"
indicators = ["EMA12", "BB", "volume"]
color_mode = "dark"
viewport_width = 1320
compute_missing_indicators = true
output_dir = "snapshots"

[ui]
refresh_rate_ms = 50

[logging]
level = "debug"
"#;

#[test]
fn parse_full_toml() {
    let config = Config::from_toml_str(FULL).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert_eq!(config.api.request_timeout_ms, 2500);
    assert_eq!(config.chart.timeframe, Timeframe::OneYear);
    assert_eq!(config.chart.color_mode, ColorMode::Dark);
    assert_eq!(config.chart.viewport_width, 1320);
    assert!(config.chart.compute_missing_indicators);
    assert_eq!(config.chart.output_dir, "snapshots");
    assert_eq!(config.ui.refresh_rate_ms, 50);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.chart.symbol_list(), vec!["NABIL", "NICA", "NTC"]);

    let toggles = config.chart.toggles().unwrap();
    assert_eq!(toggles.labels(), vec!["EMA12", "BB", "VOLUME"]);
    assert!(!toggles.contains(Indicator::Rsi));
}

#[test]
fn minimal_toml_uses_defaults() {
    let config = Config::from_toml_str(
        r#"
[api]
base_url = "http://localhost:8000"

[chart]
symbol = "NEPSE"
"#,
    )
    .unwrap();
    assert_eq!(config.api.candles_path, "/api/stocks");
    assert_eq!(config.api.prediction_path, "/api/predict");
    assert_eq!(config.api.request_timeout_ms, 10_000);
    assert_eq!(config.chart.timeframe, Timeframe::FiveYears);
    assert_eq!(config.chart.color_mode, ColorMode::Light);
    assert_eq!(config.chart.viewport_width, 1020);
    assert!(!config.chart.compute_missing_indicators);
    assert_eq!(config.chart.toggles().unwrap().labels(), vec!["EMA12", "EMA26"]);
    assert_eq!(config.ui.refresh_rate_ms, 100);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.chart.symbol_list(), vec!["NEPSE"]);
}

#[test]
fn rejects_invalid_values() {
    let cases = [
        ("base_url = \"not a url\"", "symbol = \"NABIL\""),
        ("base_url = \"http://localhost\"", "symbol = \"NABIL\"\ntimeframe = \"2Y\""),
        ("base_url = \"http://localhost\"", "symbol = \"NABIL\"\ncolor_mode = \"sepia\""),
        ("base_url = \"http://localhost\"", "symbol = \"NABIL\"\nindicators = [\"MACD\"]"),
        ("base_url = \"http://localhost\"", "symbol = \"  \""),
        ("base_url = \"http://localhost\"", "symbol = \"NABIL\"\nviewport_width = 0"),
    ];
    for (api, chart) in cases {
        let toml = format!("[api]\n{}\n\n[chart]\n{}\n", api, chart);
        assert!(Config::from_toml_str(&toml).is_err(), "accepted:\n{}", toml);
    }
}

#[test]
fn unknown_indicator_error_names_the_key() {
    let err = Config::from_toml_str(
        "[api]\nbase_url = \"http://localhost\"\n\n[chart]\nsymbol = \"NABIL\"\nindicators = [\"SMA50\"]\n",
    )
    .unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("chart.indicators"));
    assert!(msg.contains("SMA50"));
}

#[test]
fn shipped_default_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
    let raw = std::fs::read_to_string(path).unwrap();
    let config = Config::from_toml_str(&raw).unwrap();
    assert_eq!(config.chart.symbol, "NEPSE");
    assert_eq!(config.chart.symbol_list().len(), 4);
}

#[test]
/// RUST_LOG wins; otherwise the configured level drives the subscriber.
fn log_filter_falls_back_to_configured_level() {
    let configured = LoggingConfig::resolve_filter(None, "debug");
    assert_eq!(configured.to_string(), "debug");

    let blank = LoggingConfig::resolve_filter(Some("  "), "debug");
    assert_eq!(blank.to_string(), "debug");

    let overridden = LoggingConfig::resolve_filter(Some("warn"), "debug");
    assert_eq!(overridden.to_string(), "warn");

    let config = Config::from_toml_str(FULL).unwrap();
    assert_eq!(
        LoggingConfig::resolve_filter(None, &config.logging.level).to_string(),
        "debug"
    );
}
