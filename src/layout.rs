use crate::model::candle::Candle;
use crate::model::indicator::{Indicator, IndicatorToggles};

pub const MAIN_HEIGHT: u32 = 450;
pub const MAIN_HEIGHT_WITH_OSCILLATOR: u32 = 380;
pub const VOLUME_HEIGHT: u32 = 80;
pub const OSCILLATOR_HEIGHT: u32 = 120;
/// Vertical space outside the panels (axes, top margin).
pub const FIXED_MARGIN: u32 = 50;
/// First panel starts below the canvas top margin.
pub const PANEL_TOP: u32 = 10;

pub const OSCILLATOR_DOMAIN: (f64, f64) = (0.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Main,
    Volume,
    Oscillator,
}

/// Which panel set applies; the only four legal configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelLayout {
    PriceOnly,
    WithVolume,
    WithOscillator,
    WithVolumeAndOscillator,
}

impl PanelLayout {
    pub fn resolve(toggles: &IndicatorToggles, series: &[Candle]) -> Self {
        let show_volume =
            toggles.contains(Indicator::Volume) && series.iter().any(|c| c.volume.is_some());
        let show_oscillator = toggles.contains(Indicator::Rsi)
            && series.iter().any(|c| c.indicators.rsi14.is_some());
        match (show_volume, show_oscillator) {
            (false, false) => PanelLayout::PriceOnly,
            (true, false) => PanelLayout::WithVolume,
            (false, true) => PanelLayout::WithOscillator,
            (true, true) => PanelLayout::WithVolumeAndOscillator,
        }
    }

    pub fn shows_volume(self) -> bool {
        matches!(self, PanelLayout::WithVolume | PanelLayout::WithVolumeAndOscillator)
    }

    pub fn shows_oscillator(self) -> bool {
        matches!(
            self,
            PanelLayout::WithOscillator | PanelLayout::WithVolumeAndOscillator
        )
    }

    pub fn main_height(self) -> u32 {
        if self.shows_oscillator() {
            MAIN_HEIGHT_WITH_OSCILLATOR
        } else {
            MAIN_HEIGHT
        }
    }

    pub fn volume_height(self) -> u32 {
        if self.shows_volume() {
            VOLUME_HEIGHT
        } else {
            0
        }
    }

    pub fn oscillator_height(self) -> u32 {
        if self.shows_oscillator() {
            OSCILLATOR_HEIGHT
        } else {
            0
        }
    }
}

/// How a panel derives its y-range from the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YDomain {
    /// min(low)..max(high), widened by the Bollinger bands when shown.
    Price { include_bands: bool },
    /// 0..max(volume).
    Volume,
    Fixed(f64, f64),
}

impl YDomain {
    /// Resolve the range over the series. `None` when no value contributes.
    pub fn extent(&self, series: &[Candle]) -> Option<(f64, f64)> {
        match *self {
            YDomain::Fixed(lo, hi) => Some((lo, hi)),
            YDomain::Volume => {
                let max = fold_max(series.iter().filter_map(|c| c.volume))?;
                Some((0.0, max))
            }
            YDomain::Price { include_bands } => {
                let lows = series.iter().filter_map(|c| c.low);
                let highs = series.iter().filter_map(|c| c.high);
                let (lo, hi) = if include_bands {
                    let band_lo = series.iter().filter_map(|c| c.indicators.bb_lower);
                    let band_hi = series.iter().filter_map(|c| c.indicators.bb_upper);
                    (fold_min(lows.chain(band_lo)), fold_max(highs.chain(band_hi)))
                } else {
                    (fold_min(lows), fold_max(highs))
                };
                Some((lo?, hi?))
            }
        }
    }
}

fn fold_min(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
}

fn fold_max(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub kind: PanelKind,
    /// Offset from the canvas top.
    pub top: u32,
    pub height: u32,
    pub y_domain: YDomain,
}

/// Panels stacked top to bottom in the fixed order main, volume, oscillator.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelPlan {
    pub layout: PanelLayout,
    pub panels: Vec<Panel>,
    pub total_height: u32,
}

impl PanelPlan {
    pub fn panel(&self, kind: PanelKind) -> Option<&Panel> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    pub fn show_volume(&self) -> bool {
        self.layout.shows_volume()
    }

    pub fn show_oscillator(&self) -> bool {
        self.layout.shows_oscillator()
    }

    pub fn main_height(&self) -> u32 {
        self.layout.main_height()
    }

    pub fn volume_height(&self) -> u32 {
        self.layout.volume_height()
    }

    pub fn oscillator_height(&self) -> u32 {
        self.layout.oscillator_height()
    }
}

/// Decide which panels exist and how tall they are. A panel exists only when
/// its toggle is on and the series carries data for it. Pure; call again on
/// every toggle or data change.
pub fn plan(toggles: &IndicatorToggles, series: &[Candle]) -> PanelPlan {
    let layout = PanelLayout::resolve(toggles, series);
    let mut panels = Vec::with_capacity(3);
    let mut top = PANEL_TOP;

    let mut push = |kind, height: u32, y_domain| {
        debug_assert!(height > 0, "panel {kind:?} planned with zero height");
        panels.push(Panel {
            kind,
            top,
            height,
            y_domain,
        });
        top += height;
    };

    push(
        PanelKind::Main,
        layout.main_height(),
        YDomain::Price {
            include_bands: toggles.contains(Indicator::Bb),
        },
    );
    if layout.shows_volume() {
        push(PanelKind::Volume, layout.volume_height(), YDomain::Volume);
    }
    if layout.shows_oscillator() {
        let (lo, hi) = OSCILLATOR_DOMAIN;
        push(
            PanelKind::Oscillator,
            layout.oscillator_height(),
            YDomain::Fixed(lo, hi),
        );
    }

    let total_height = layout.main_height()
        + layout.volume_height()
        + layout.oscillator_height()
        + FIXED_MARGIN;
    PanelPlan {
        layout,
        panels,
        total_height,
    }
}
