pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod sma;

use crate::model::candle::{Candle, IndicatorField};

use bollinger::Bollinger;
use ema::Ema;
use rsi::Rsi;

pub const EMA_FAST_PERIOD: usize = 12;
pub const EMA_SLOW_PERIOD: usize = 26;
pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;

/// Compute EMA12/EMA26/RSI14/Bollinger(20, 2) from closes, in slice order.
/// Candles without a close are skipped and do not advance the windows.
pub fn enrich(candles: &mut [Candle]) {
    let mut ema_fast = Ema::new(EMA_FAST_PERIOD);
    let mut ema_slow = Ema::new(EMA_SLOW_PERIOD);
    let mut rsi = Rsi::new(RSI_PERIOD);
    let mut bollinger = Bollinger::new(BOLLINGER_PERIOD, BOLLINGER_STD_DEV);

    let mut filled = 0usize;
    for candle in candles.iter_mut() {
        let Some(close) = candle.close else {
            continue;
        };
        let band = bollinger.push(close);
        let computed = [
            (IndicatorField::Ema12, ema_fast.push(close)),
            (IndicatorField::Ema26, ema_slow.push(close)),
            (IndicatorField::Rsi14, rsi.push(close)),
            (IndicatorField::BbUpper, band.map(|b| b.upper)),
            (IndicatorField::BbLower, band.map(|b| b.lower)),
            (IndicatorField::BbMa20, band.map(|b| b.mid)),
        ];
        for (field, value) in computed {
            if candle.indicators.get(field).is_none() && value.is_some() {
                candle.indicators.set(field, value);
                filled += 1;
            }
        }
    }
    tracing::debug!(candles = candles.len(), filled, "Computed missing indicators");
}
