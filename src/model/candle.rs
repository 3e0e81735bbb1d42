use chrono::{DateTime, Utc};

/// Precomputed indicator columns carried alongside a candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorField {
    Ema12,
    Ema26,
    BbUpper,
    BbLower,
    BbMa20,
    Rsi14,
}

impl IndicatorField {
    pub const ALL: [IndicatorField; 6] = [
        IndicatorField::Ema12,
        IndicatorField::Ema26,
        IndicatorField::BbUpper,
        IndicatorField::BbLower,
        IndicatorField::BbMa20,
        IndicatorField::Rsi14,
    ];

    /// Column name used by the candle source.
    pub fn key(self) -> &'static str {
        match self {
            IndicatorField::Ema12 => "EMA12",
            IndicatorField::Ema26 => "EMA26",
            IndicatorField::BbUpper => "BB_UPPER",
            IndicatorField::BbLower => "BB_LOWER",
            IndicatorField::BbMa20 => "BB_MA20",
            IndicatorField::Rsi14 => "RSI14",
        }
    }
}

/// Sparse indicator values. `None` means "do not plot", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Indicators {
    pub ema12: Option<f64>,
    pub ema26: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_ma20: Option<f64>,
    pub rsi14: Option<f64>,
}

impl Indicators {
    pub fn get(&self, field: IndicatorField) -> Option<f64> {
        match field {
            IndicatorField::Ema12 => self.ema12,
            IndicatorField::Ema26 => self.ema26,
            IndicatorField::BbUpper => self.bb_upper,
            IndicatorField::BbLower => self.bb_lower,
            IndicatorField::BbMa20 => self.bb_ma20,
            IndicatorField::Rsi14 => self.rsi14,
        }
    }

    pub fn set(&mut self, field: IndicatorField, value: Option<f64>) {
        let slot = match field {
            IndicatorField::Ema12 => &mut self.ema12,
            IndicatorField::Ema26 => &mut self.ema26,
            IndicatorField::BbUpper => &mut self.bb_upper,
            IndicatorField::BbLower => &mut self.bb_lower,
            IndicatorField::BbMa20 => &mut self.bb_ma20,
            IndicatorField::Rsi14 => &mut self.rsi14,
        };
        *slot = value;
    }
}

/// One trading period. Price fields are optional because upstream coercion
/// may fail per field; `low <= open,close <= high` is not enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub indicators: Indicators,
}

impl Candle {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
            indicators: Indicators::default(),
        }
    }

    pub fn with_ohlc(mut self, open: f64, high: f64, low: f64, close: f64) -> Self {
        self.open = Some(open);
        self.high = Some(high);
        self.low = Some(low);
        self.close = Some(close);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_indicator(mut self, field: IndicatorField, value: f64) -> Self {
        self.indicators.set(field, Some(value));
        self
    }

    /// Up-coloured only when `close > open`; equal or missing prices are down.
    pub fn is_up(&self) -> bool {
        matches!((self.open, self.close), (Some(open), Some(close)) if close > open)
    }

    /// All four prices present, so a body and wick can be drawn.
    pub fn ohlc(&self) -> Option<(f64, f64, f64, f64)> {
        Some((self.open?, self.high?, self.low?, self.close?))
    }
}
