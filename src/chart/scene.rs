use chrono::{DateTime, Utc};
use plotters::style::RGBColor;

use super::palette::{ColorMode, OverlayLine, Palette};
use super::scale::{BandScale, LinearScale};
use crate::layout::{self, Panel, PanelKind, PanelPlan};
use crate::model::candle::Candle;
use crate::model::indicator::{Indicator, IndicatorToggles};

pub const MARGIN_LEFT: u32 = 60;
pub const MARGIN_RIGHT: u32 = 60;
pub const Y_TICK_COUNT: usize = 5;
pub const MAX_X_TICKS: usize = 8;
pub const VOLUME_OPACITY: f64 = 0.6;
pub const RSI_FILL_OPACITY: f64 = 0.33;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoData,
    NoValidDates,
}

impl EmptyReason {
    pub fn message(self) -> &'static str {
        match self {
            EmptyReason::NoData => "No data available",
            EmptyReason::NoValidDates => "No valid dates available",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedChart {
    Empty(EmptyReason),
    Chart(Box<ChartScene>),
}

impl RenderedChart {
    pub fn scene(&self) -> Option<&ChartScene> {
        match self {
            RenderedChart::Chart(scene) => Some(scene),
            RenderedChart::Empty(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RenderedChart::Empty(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleGlyph {
    pub index: usize,
    pub x: f64,
    pub width: f64,
    pub body_top: f64,
    pub body_bottom: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub fill: RGBColor,
    pub wick: RGBColor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGlyph {
    pub index: usize,
    pub x: f64,
    pub width: f64,
    pub top: f64,
    pub bottom: f64,
}

/// A polyline broken at absent values; each segment is drawn on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct LineScene {
    pub line: OverlayLine,
    pub color: RGBColor,
    pub segments: Vec<Vec<(f64, f64)>>,
}

impl LineScene {
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesScene {
    Candles(Vec<CandleGlyph>),
    Line(LineScene),
    Band {
        upper: LineScene,
        mid: LineScene,
        lower: LineScene,
    },
    Bars {
        color: RGBColor,
        opacity: f64,
        bars: Vec<BarGlyph>,
    },
    Area {
        line: LineScene,
        fill_opacity: f64,
        baseline: f64,
    },
}

impl SeriesScene {
    /// Toggle that produced this series; `None` for the base candles.
    pub fn indicator(&self) -> Option<Indicator> {
        match self {
            SeriesScene::Candles(_) => None,
            SeriesScene::Line(line) => Some(line.line.indicator()),
            SeriesScene::Band { .. } => Some(Indicator::Bb),
            SeriesScene::Bars { .. } => Some(Indicator::Volume),
            SeriesScene::Area { .. } => Some(Indicator::Rsi),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelScene {
    pub kind: PanelKind,
    pub top: f64,
    pub height: f64,
    pub y: LinearScale,
    pub y_ticks: Vec<(f64, f64)>,
    pub series: Vec<SeriesScene>,
}

impl PanelScene {
    pub fn contains_y(&self, py: f64) -> bool {
        py >= self.top && py <= self.top + self.height
    }

    pub fn overlays(&self) -> impl Iterator<Item = &SeriesScene> {
        self.series.iter().filter(|s| s.indicator().is_some())
    }
}

/// What the crosshair reports for a pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub index: usize,
    pub date: DateTime<Utc>,
    pub panel: PanelKind,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

impl Readout {
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn value_label(&self) -> String {
        format!("{:.2}", self.value)
    }
}

/// Device-independent chart with every pixel position resolved. The SVG
/// writer and the pointer readout both read it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
    pub plan: PanelPlan,
    pub x: BandScale,
    pub dates: Vec<DateTime<Utc>>,
    pub x_ticks: Vec<(f64, String)>,
    pub panels: Vec<PanelScene>,
}

impl ChartScene {
    pub fn panel(&self, kind: PanelKind) -> Option<&PanelScene> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    /// Nearest candle and hovered value. Read-only; `None` off the plot.
    pub fn readout(&self, px: f64, py: f64) -> Option<Readout> {
        let (x0, x1) = self.x.range();
        if !(x0..=x1).contains(&px) {
            return None;
        }
        let panel = self.panels.iter().find(|p| p.contains_y(py))?;
        let index = self.x.nearest(px)?;
        Some(Readout {
            index,
            date: *self.dates.get(index)?,
            panel: panel.kind,
            value: panel.y.invert(py),
            x: self.x.center(index),
            y: py,
        })
    }
}

/// Lay out the chart for a series. Never panics; an empty series yields the
/// explicit empty state.
pub fn compose(
    series: &[Candle],
    toggles: &IndicatorToggles,
    width: u32,
    mode: ColorMode,
) -> RenderedChart {
    if series.is_empty() {
        return RenderedChart::Empty(EmptyReason::NoData);
    }

    let palette = Palette::for_mode(mode);
    let plan = layout::plan(toggles, series);
    let x = BandScale::new(
        series.len(),
        (
            MARGIN_LEFT as f64,
            width.saturating_sub(MARGIN_RIGHT).max(MARGIN_LEFT + 1) as f64,
        ),
    );

    let panels = plan
        .panels
        .iter()
        .map(|panel| compose_panel(panel, series, toggles, &x, &palette))
        .collect();

    RenderedChart::Chart(Box::new(ChartScene {
        width,
        height: plan.total_height,
        palette,
        x_ticks: x_ticks(series, &x),
        dates: series.iter().map(|c| c.timestamp).collect(),
        x,
        plan,
        panels,
    }))
}

fn compose_panel(
    panel: &Panel,
    series: &[Candle],
    toggles: &IndicatorToggles,
    x: &BandScale,
    palette: &Palette,
) -> PanelScene {
    let top = panel.top as f64;
    let bottom = (panel.top + panel.height) as f64;
    let domain = panel.y_domain.extent(series).unwrap_or((0.0, 1.0));
    let y = LinearScale::new(domain, (bottom, top));
    let y_ticks = y
        .ticks(Y_TICK_COUNT)
        .into_iter()
        .map(|v| (v, y.scale(v)))
        .collect();

    let mut out = Vec::new();
    match panel.kind {
        PanelKind::Main => {
            out.push(SeriesScene::Candles(candle_glyphs(series, x, &y, palette)));
            for indicator in toggles.iter() {
                if let Some(scene) = main_overlay(indicator, series, x, &y, palette) {
                    out.push(scene);
                }
            }
        }
        PanelKind::Volume => out.push(SeriesScene::Bars {
            color: palette.volume,
            opacity: VOLUME_OPACITY,
            bars: volume_bars(series, x, &y),
        }),
        PanelKind::Oscillator => {
            let line = line_scene(OverlayLine::Rsi, series, x, &y, palette);
            if line.point_count() > 0 {
                out.push(SeriesScene::Area {
                    line,
                    fill_opacity: RSI_FILL_OPACITY,
                    baseline: y.scale(y.domain().0),
                });
            }
        }
    }

    PanelScene {
        kind: panel.kind,
        top,
        height: panel.height as f64,
        y,
        y_ticks,
        series: out,
    }
}

/// One overlay per active toggle; a toggle with no plotted points adds
/// nothing.
fn main_overlay(
    indicator: Indicator,
    series: &[Candle],
    x: &BandScale,
    y: &LinearScale,
    palette: &Palette,
) -> Option<SeriesScene> {
    let line = |l| line_scene(l, series, x, y, palette);
    let scene = match indicator {
        Indicator::Ema12 => SeriesScene::Line(line(OverlayLine::Ema12)),
        Indicator::Ema26 => SeriesScene::Line(line(OverlayLine::Ema26)),
        Indicator::Bb => SeriesScene::Band {
            upper: line(OverlayLine::BbUpper),
            mid: line(OverlayLine::BbMid),
            lower: line(OverlayLine::BbLower),
        },
        Indicator::Rsi | Indicator::Volume => return None,
    };
    let points = match &scene {
        SeriesScene::Line(l) => l.point_count(),
        SeriesScene::Band { upper, mid, lower } => {
            upper.point_count() + mid.point_count() + lower.point_count()
        }
        _ => 0,
    };
    (points > 0).then_some(scene)
}

fn candle_glyphs(
    series: &[Candle],
    x: &BandScale,
    y: &LinearScale,
    palette: &Palette,
) -> Vec<CandleGlyph> {
    series
        .iter()
        .enumerate()
        .filter_map(|(index, candle)| {
            let (open, high, low, close) = candle.ohlc()?;
            let up = candle.is_up();
            let (y_open, y_close) = (y.scale(open), y.scale(close));
            Some(CandleGlyph {
                index,
                x: x.center(index),
                width: x.bandwidth(),
                body_top: y_open.min(y_close),
                body_bottom: y_open.max(y_close),
                wick_top: y.scale(high).min(y.scale(low)),
                wick_bottom: y.scale(high).max(y.scale(low)),
                fill: palette.candle(up),
                wick: palette.candle(up),
            })
        })
        .collect()
}

fn volume_bars(series: &[Candle], x: &BandScale, y: &LinearScale) -> Vec<BarGlyph> {
    let bottom = y.scale(0.0);
    series
        .iter()
        .enumerate()
        .filter_map(|(index, candle)| {
            let volume = candle.volume?;
            Some(BarGlyph {
                index,
                x: x.center(index),
                width: x.bandwidth(),
                top: y.scale(volume),
                bottom,
            })
        })
        .collect()
}

fn line_scene(
    line: OverlayLine,
    series: &[Candle],
    x: &BandScale,
    y: &LinearScale,
    palette: &Palette,
) -> LineScene {
    let field = line.field();
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for (index, candle) in series.iter().enumerate() {
        match candle.indicators.get(field) {
            Some(value) => current.push((x.center(index), y.scale(value))),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    LineScene {
        line,
        color: palette.overlay(line),
        segments,
    }
}

fn x_ticks(series: &[Candle], x: &BandScale) -> Vec<(f64, String)> {
    let n = series.len();
    let stride = n.div_ceil(MAX_X_TICKS).max(1);
    (0..n)
        .step_by(stride)
        .map(|i| (x.center(i), series[i].timestamp.format("%Y-%m-%d").to_string()))
        .collect()
}
