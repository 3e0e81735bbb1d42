use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::Deserialize;

/// Time range requested from the candle source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "3Y")]
    ThreeYears,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "ALL")]
    All,
}

impl Timeframe {
    pub const ALL: [Timeframe; 8] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
        Timeframe::SixMonths,
        Timeframe::OneYear,
        Timeframe::ThreeYears,
        Timeframe::FiveYears,
        Timeframe::All,
    ];

    /// Query-string code understood by the candle source.
    pub fn code(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1D",
            Timeframe::OneWeek => "1W",
            Timeframe::OneMonth => "1M",
            Timeframe::SixMonths => "6M",
            Timeframe::OneYear => "1Y",
            Timeframe::ThreeYears => "3Y",
            Timeframe::FiveYears => "5Y",
            Timeframe::All => "ALL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1 Day",
            Timeframe::OneWeek => "1 Week",
            Timeframe::OneMonth => "1 Month",
            Timeframe::SixMonths => "6 Months",
            Timeframe::OneYear => "1 Year",
            Timeframe::ThreeYears => "3 Years",
            Timeframe::FiveYears => "5 Years",
            Timeframe::All => "All",
        }
    }

    /// Next range in display order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|tf| *tf == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::FiveYears
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_ascii_uppercase();
        match Self::ALL.into_iter().find(|tf| tf.code() == code) {
            Some(tf) => Ok(tf),
            None => bail!(
                "invalid timeframe '{}': expected one of 1D/1W/1M/6M/1Y/3Y/5Y/ALL",
                s
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_str() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.code().parse::<Timeframe>().unwrap(), tf);
        }
        assert_eq!("5y".parse::<Timeframe>().unwrap(), Timeframe::FiveYears);
    }

    #[test]
    fn rejects_unknown_codes() {
        assert!("2Y".parse::<Timeframe>().is_err());
        assert!("".parse::<Timeframe>().is_err());
    }

    #[test]
    fn next_wraps_to_first() {
        assert_eq!(Timeframe::All.next(), Timeframe::OneDay);
        assert_eq!(Timeframe::OneYear.next(), Timeframe::ThreeYears);
    }
}
