use std::ops::Deref;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::model::candle::{Candle, IndicatorField};

const DATE_KEYS: [&str; 2] = ["date", "timestamp"];
const NAIVE_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Coerce raw records into candles, preserving input order.
///
/// Never fails: records that are not objects or whose date cannot be parsed
/// are skipped, and an input with nothing usable yields an empty vector.
pub fn normalize(records: &[Value]) -> Vec<Candle> {
    let candles: Vec<Candle> = records.iter().filter_map(normalize_record).collect();
    let dropped = records.len() - candles.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = candles.len(), "Dropped records without a usable date");
    }
    candles
}

fn normalize_record(record: &Value) -> Option<Candle> {
    let obj = record.as_object()?;
    let timestamp = DATE_KEYS
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(parse_timestamp)?;

    let field = |key: &str| obj.get(key).and_then(coerce_number);
    let mut candle = Candle::new(timestamp);
    candle.open = field("open");
    candle.high = field("high");
    candle.low = field("low");
    candle.close = field("close");
    candle.volume = field("volume").filter(|v| *v >= 0.0);
    for ind in IndicatorField::ALL {
        candle.indicators.set(ind, field(ind.key()));
    }
    Some(candle)
}

/// Parse a date the way the chart understands it: ISO date, ISO datetime
/// (with or without offset), or epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => {
            let ms = n.as_f64().filter(|v| v.is_finite())?;
            DateTime::from_timestamp_millis(ms as i64)
        }
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Numeric cast: numbers pass through, numeric strings parse, everything else
/// (null, bool, empty or garbage strings, non-finite values) is absent.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Candles ordered ascending by timestamp. Read-only once built.
///
/// Sorting is stable and duplicates are kept, so upstream ordering among
/// equal timestamps survives. The raw record count is kept alongside, so an
/// empty series can tell "nothing delivered" from "nothing had a usable date".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSeries {
    candles: Vec<Candle>,
    source_len: usize,
}

impl NormalizedSeries {
    pub fn from_candles(mut candles: Vec<Candle>) -> Self {
        let sorted = candles.windows(2).all(|w| w[0].timestamp <= w[1].timestamp);
        if !sorted {
            tracing::debug!(count = candles.len(), "Candle input out of order; sorting");
            candles.sort_by_key(|c| c.timestamp);
        }
        let source_len = candles.len();
        Self {
            candles,
            source_len,
        }
    }

    pub fn from_records(records: &[Value]) -> Self {
        Self {
            source_len: records.len(),
            ..Self::from_candles(normalize(records))
        }
    }

    /// Number of raw records this series was built from, usable or not.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Records were delivered but none survived normalization.
    pub fn all_dropped(&self) -> bool {
        self.candles.is_empty() && self.source_len > 0
    }

    /// Fill absent indicator columns locally, in timestamp order.
    pub fn with_computed_indicators(mut self) -> Self {
        crate::indicator::enrich(&mut self.candles);
        self
    }
}

impl Deref for NormalizedSeries {
    type Target = [Candle];

    fn deref(&self) -> &[Candle] {
        &self.candles
    }
}
