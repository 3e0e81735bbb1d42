use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use plotters::style::RGBColor;
use serde::Deserialize;

use crate::model::candle::IndicatorField;
use crate::model::indicator::Indicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl ColorMode {
    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Light => f.write_str("light"),
            ColorMode::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for ColorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ColorMode::Light),
            "dark" => Ok(ColorMode::Dark),
            other => bail!("invalid color mode '{}': expected light or dark", other),
        }
    }
}

/// One drawn indicator line. Bollinger contributes three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayLine {
    Ema12,
    Ema26,
    BbUpper,
    BbLower,
    BbMid,
    Rsi,
}

impl OverlayLine {
    pub const ALL: [OverlayLine; 6] = [
        OverlayLine::Ema12,
        OverlayLine::Ema26,
        OverlayLine::BbUpper,
        OverlayLine::BbLower,
        OverlayLine::BbMid,
        OverlayLine::Rsi,
    ];

    pub fn field(self) -> IndicatorField {
        match self {
            OverlayLine::Ema12 => IndicatorField::Ema12,
            OverlayLine::Ema26 => IndicatorField::Ema26,
            OverlayLine::BbUpper => IndicatorField::BbUpper,
            OverlayLine::BbLower => IndicatorField::BbLower,
            OverlayLine::BbMid => IndicatorField::BbMa20,
            OverlayLine::Rsi => IndicatorField::Rsi14,
        }
    }

    pub fn indicator(self) -> Indicator {
        match self {
            OverlayLine::Ema12 => Indicator::Ema12,
            OverlayLine::Ema26 => Indicator::Ema26,
            OverlayLine::BbUpper | OverlayLine::BbLower | OverlayLine::BbMid => Indicator::Bb,
            OverlayLine::Rsi => Indicator::Rsi,
        }
    }
}

/// Colours for one visual mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub mode: ColorMode,
    pub up: RGBColor,
    pub down: RGBColor,
    pub volume: RGBColor,
    pub background: RGBColor,
    pub grid: RGBColor,
    pub text: RGBColor,
    pub crosshair: RGBColor,
}

impl Palette {
    pub fn for_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => Self {
                mode,
                up: RGBColor(0x16, 0xa3, 0x4a),
                down: RGBColor(0xdc, 0x26, 0x26),
                volume: RGBColor(0xc7, 0xd2, 0xfe),
                background: RGBColor(0xff, 0xff, 0xff),
                grid: RGBColor(0xe5, 0xe7, 0xeb),
                text: RGBColor(0x37, 0x41, 0x51),
                crosshair: RGBColor(0x3b, 0x82, 0xf6),
            },
            ColorMode::Dark => Self {
                mode,
                up: RGBColor(0x22, 0xc5, 0x5e),
                down: RGBColor(0xef, 0x44, 0x44),
                volume: RGBColor(0x6b, 0x72, 0x80),
                background: RGBColor(0x1a, 0x1a, 0x2e),
                grid: RGBColor(0x2e, 0x2e, 0x3f),
                text: RGBColor(0xe5, 0xe7, 0xeb),
                crosshair: RGBColor(0xf9, 0x73, 0x16),
            },
        }
    }

    pub fn candle(&self, up: bool) -> RGBColor {
        if up {
            self.up
        } else {
            self.down
        }
    }

    /// Each line keeps its hue in both modes; dark mode uses the lighter
    /// shade of the same hue.
    pub fn overlay(&self, line: OverlayLine) -> RGBColor {
        let dark = self.mode == ColorMode::Dark;
        match (line, dark) {
            // green
            (OverlayLine::Ema12, false) => RGBColor(0x15, 0x80, 0x3d),
            (OverlayLine::Ema12, true) => RGBColor(0x4a, 0xde, 0x80),
            // blue
            (OverlayLine::Ema26, false) => RGBColor(0x25, 0x63, 0xeb),
            (OverlayLine::Ema26, true) => RGBColor(0x60, 0xa5, 0xfa),
            // orange
            (OverlayLine::BbUpper, false) => RGBColor(0xea, 0x58, 0x0c),
            (OverlayLine::BbUpper, true) => RGBColor(0xf9, 0x73, 0x16),
            // pink
            (OverlayLine::BbLower, false) => RGBColor(0xdb, 0x27, 0x77),
            (OverlayLine::BbLower, true) => RGBColor(0xec, 0x48, 0x99),
            // violet
            (OverlayLine::BbMid, false) => RGBColor(0x7c, 0x3a, 0xed),
            (OverlayLine::BbMid, true) => RGBColor(0xa7, 0x8b, 0xfa),
            // yellow
            (OverlayLine::Rsi, false) => RGBColor(0xca, 0x8a, 0x04),
            (OverlayLine::Rsi, true) => RGBColor(0xfb, 0xbf, 0x24),
        }
    }
}

pub fn hex(color: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}
