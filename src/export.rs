use std::path::{Path, PathBuf};

use crate::chart::palette::ColorMode;
use crate::chart::scene::RenderedChart;
use crate::chart::svg::render_svg;
use crate::error::AppError;
use crate::gauge::Gauge;

pub const CHART_FILE: &str = "chart.svg";
pub const GAUGE_FILE: &str = "gauge.svg";

/// Write `chart.svg` and, when a gauge is available, `gauge.svg` into `dir`.
/// Returns the paths written.
pub fn write_snapshots(
    dir: &Path,
    chart: &RenderedChart,
    gauge: Option<&Gauge>,
    mode: ColorMode,
) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let chart_path = dir.join(CHART_FILE);
    std::fs::write(&chart_path, render_svg(chart, None)?)?;
    written.push(chart_path);

    if let Some(gauge) = gauge {
        let gauge_path = dir.join(GAUGE_FILE);
        std::fs::write(&gauge_path, gauge.to_svg(mode))?;
        written.push(gauge_path);
    }

    tracing::info!(dir = %dir.display(), files = written.len(), "Snapshots written");
    Ok(written)
}
