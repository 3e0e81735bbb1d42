use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

use crate::api::ApiClient;
use crate::chart::{self, palette::ColorMode};
use crate::config::Config;
use crate::export;
use crate::gauge::compute_gauge;
use crate::model::indicator::IndicatorToggles;
use crate::model::prediction::PredictionSummary;
use crate::model::timeframe::Timeframe;
use crate::normalize::NormalizedSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotArgs {
    pub symbol: Option<String>,
    pub timeframe: Option<Timeframe>,
    pub indicators: Option<Vec<String>>,
    pub mode: Option<ColorMode>,
    pub width: Option<u32>,
    pub out_dir: Option<PathBuf>,
    /// Read candles from a local JSON file instead of the API.
    pub records: Option<PathBuf>,
    /// Read the prediction summary from a local JSON file instead of the API.
    pub prediction: Option<PathBuf>,
    pub help: bool,
}

pub fn parse_args(args: &[String]) -> Result<SnapshotArgs> {
    let mut out = SnapshotArgs {
        symbol: None,
        timeframe: None,
        indicators: None,
        mode: None,
        width: None,
        out_dir: None,
        records: None,
        prediction: None,
        help: false,
    };
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        if matches!(flag.as_str(), "help" | "--help" | "-h") {
            out.help = true;
            continue;
        }
        let value = iter
            .next()
            .ok_or_else(|| anyhow!("`{}` requires a value", flag))?;
        match flag.as_str() {
            "--symbol" => out.symbol = Some(value.trim().to_ascii_uppercase()),
            "--timeframe" => out.timeframe = Some(value.parse()?),
            "--indicators" => {
                out.indicators = Some(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect(),
                )
            }
            "--mode" => out.mode = Some(value.parse()?),
            "--width" => {
                out.width = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid width `{}`", value))?,
                )
            }
            "--out" => out.out_dir = Some(PathBuf::from(value)),
            "--records" => out.records = Some(PathBuf::from(value)),
            "--prediction" => out.prediction = Some(PathBuf::from(value)),
            other => bail!(
                "unknown flag `{}`. expected one of: --symbol|--timeframe|--indicators|--mode|--width|--out|--records|--prediction",
                other
            ),
        }
    }
    Ok(out)
}

pub fn print_usage() {
    eprintln!("usage:");
    eprintln!("  cargo run --bin render-snapshot");
    eprintln!("  cargo run --bin render-snapshot -- --symbol NABIL --timeframe 1Y --indicators EMA12,BB,VOLUME");
    eprintln!("  cargo run --bin render-snapshot -- --records data.json --prediction predict.json --out out");
}

/// Candle records from a file holding either `{"records": [...]}` or a bare
/// array.
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let payload: Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    match payload {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("records") {
            Some(Value::Array(records)) => Ok(records),
            _ => bail!("{} has no records array", path.display()),
        },
        _ => bail!("{} is neither an array nor an object", path.display()),
    }
}

pub fn load_prediction(path: &Path) -> Result<PredictionSummary> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub async fn run(config: &Config, args: SnapshotArgs) -> Result<Vec<PathBuf>> {
    let symbol = args
        .symbol
        .clone()
        .unwrap_or_else(|| config.chart.symbol.trim().to_ascii_uppercase());
    let timeframe = args.timeframe.unwrap_or(config.chart.timeframe);
    let toggles = match &args.indicators {
        Some(labels) => IndicatorToggles::from_labels(labels),
        None => config.chart.toggles()?,
    };
    let mode = args.mode.unwrap_or(config.chart.color_mode);
    let width = args.width.unwrap_or(config.chart.viewport_width);
    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.chart.output_dir));

    let needs_client = args.records.is_none() || args.prediction.is_none();
    let client = if needs_client {
        Some(ApiClient::from_config(&config.api).context("failed to build HTTP client")?)
    } else {
        None
    };

    let mut series = match (&args.records, &client) {
        (Some(path), _) => NormalizedSeries::from_records(&load_records(path)?),
        (None, Some(client)) => client.fetch_candles(&symbol, timeframe).await,
        (None, None) => NormalizedSeries::default(),
    };
    if config.chart.compute_missing_indicators {
        series = series.with_computed_indicators();
    }

    let prediction = match (&args.prediction, &client) {
        (Some(path), _) => Some(load_prediction(path)?),
        (None, Some(client)) => match client.fetch_prediction(&symbol).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Prediction unavailable; skipping gauge");
                None
            }
        },
        (None, None) => None,
    };

    let rendered = chart::render_series(&series, &toggles, width, mode);
    let gauge = prediction.as_ref().map(|p| compute_gauge(p.confidence));
    tracing::info!(
        symbol = %symbol,
        timeframe = %timeframe,
        count = series.len(),
        empty = rendered.is_empty(),
        "Rendering snapshot"
    );
    Ok(export::write_snapshots(
        &out_dir,
        &rendered,
        gauge.as_ref(),
        mode,
    )?)
}

pub async fn run_cli(args: &[String]) -> Result<()> {
    let parsed = parse_args(args)?;
    if parsed.help {
        print_usage();
        return Ok(());
    }
    let config = Config::load()?;
    // stdout carries the written paths; logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(config.logging.env_filter())
        .with_writer(std::io::stderr)
        .try_init();
    for path in run(&config, parsed).await? {
        println!("{}", path.display());
    }
    Ok(())
}
