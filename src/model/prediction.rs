use std::fmt;

use serde::Deserialize;

/// Trend direction reported per horizon. Labels the source does not know
/// about are kept verbatim and rendered with the neutral icon and colour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TrendLabel {
    Uptrend,
    Downtrend,
    Sideways,
    Unrecognized(String),
}

impl Default for TrendLabel {
    fn default() -> Self {
        TrendLabel::Unrecognized(String::new())
    }
}

impl From<String> for TrendLabel {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Uptrend" => TrendLabel::Uptrend,
            "Downtrend" => TrendLabel::Downtrend,
            "Sideways" => TrendLabel::Sideways,
            _ => TrendLabel::Unrecognized(raw),
        }
    }
}

impl TrendLabel {
    pub fn icon(&self) -> &'static str {
        match self {
            TrendLabel::Uptrend => "📈",
            TrendLabel::Downtrend => "📉",
            TrendLabel::Sideways => "➡",
            // neutral
            TrendLabel::Unrecognized(_) => "📊",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            TrendLabel::Uptrend => "#4caf50",
            TrendLabel::Downtrend => "#f44336",
            TrendLabel::Sideways => "#ff9800",
            TrendLabel::Unrecognized(_) => "#757575",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendLabel::Uptrend => f.write_str("Uptrend"),
            TrendLabel::Downtrend => f.write_str("Downtrend"),
            TrendLabel::Sideways => f.write_str("Sideways"),
            TrendLabel::Unrecognized(raw) if raw.trim().is_empty() => f.write_str("N/A"),
            TrendLabel::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    VeryShort,
    Short,
    Mid,
    Long,
}

impl Horizon {
    pub const ALL: [Horizon; 4] = [Horizon::VeryShort, Horizon::Short, Horizon::Mid, Horizon::Long];

    pub fn label(self) -> &'static str {
        match self {
            Horizon::VeryShort => "Very Short",
            Horizon::Short => "Short Term",
            Horizon::Mid => "Mid Term",
            Horizon::Long => "Long Term",
        }
    }

    pub fn period(self) -> &'static str {
        match self {
            Horizon::VeryShort => "1-2 Days",
            Horizon::Short => "3-7 Days",
            Horizon::Mid => "1-2 Weeks",
            Horizon::Long => "1+ Month",
        }
    }
}

/// Per-horizon trend labels plus a single confidence score.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionSummary {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub very_short_term: TrendLabel,
    #[serde(default)]
    pub short_term: TrendLabel,
    #[serde(default)]
    pub mid_term: TrendLabel,
    #[serde(default)]
    pub long_term: TrendLabel,
    /// Raw score as delivered; may be null or out of range.
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl PredictionSummary {
    pub fn trend(&self, horizon: Horizon) -> &TrendLabel {
        match horizon {
            Horizon::VeryShort => &self.very_short_term,
            Horizon::Short => &self.short_term,
            Horizon::Mid => &self.mid_term,
            Horizon::Long => &self.long_term,
        }
    }
}
