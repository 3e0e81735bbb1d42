pub mod palette;
pub mod scale;
pub mod scene;
pub mod svg;
pub mod viewport;

use serde_json::Value;

use crate::error::AppError;
use crate::model::candle::Candle;
use crate::model::indicator::IndicatorToggles;
use crate::normalize::NormalizedSeries;

use palette::ColorMode;
use scene::{EmptyReason, RenderedChart};
use viewport::{responsive_width, ResizeSubscription, Viewport};

/// Render a series for a viewport width and colour mode. Pure: identical
/// inputs give identical scenes.
pub fn render(
    series: &[Candle],
    toggles: &IndicatorToggles,
    viewport_width: u32,
    mode: ColorMode,
) -> RenderedChart {
    scene::compose(series, toggles, responsive_width(viewport_width), mode)
}

/// Render a normalized series, telling "nothing delivered" apart from
/// "nothing had a usable date".
pub fn render_series(
    series: &NormalizedSeries,
    toggles: &IndicatorToggles,
    viewport_width: u32,
    mode: ColorMode,
) -> RenderedChart {
    if series.all_dropped() {
        return RenderedChart::Empty(EmptyReason::NoValidDates);
    }
    render(series, toggles, viewport_width, mode)
}

/// Render straight from raw source records.
pub fn render_records(
    records: &[Value],
    toggles: &IndicatorToggles,
    viewport_width: u32,
    mode: ColorMode,
) -> RenderedChart {
    render_series(
        &NormalizedSeries::from_records(records),
        toggles,
        viewport_width,
        mode,
    )
}

/// A chart attached to a viewport. Holds the only resize listener for this
/// instance; dropping the chart releases it.
#[derive(Debug)]
pub struct MountedChart {
    resize: ResizeSubscription,
    mode: ColorMode,
}

impl MountedChart {
    pub fn mount(viewport: &Viewport, mode: ColorMode) -> Self {
        Self {
            resize: viewport.subscribe(),
            mode,
        }
    }

    pub fn width(&self) -> u32 {
        self.resize.chart_width()
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    /// Pick up any pending resize, then render.
    pub fn render(&mut self, series: &NormalizedSeries, toggles: &IndicatorToggles) -> RenderedChart {
        if let Some(width) = self.resize.poll() {
            tracing::debug!(width, "Chart width recomputed");
        }
        render_series(series, toggles, self.resize.viewport_width(), self.mode)
    }

    pub fn render_svg(
        &mut self,
        series: &NormalizedSeries,
        toggles: &IndicatorToggles,
    ) -> Result<String, AppError> {
        svg::render_svg(&self.render(series, toggles), None)
    }
}
