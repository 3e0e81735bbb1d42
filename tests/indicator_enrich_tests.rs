use chrono::{Duration, TimeZone, Utc};

use stockscope::indicator::bollinger::Bollinger;
use stockscope::indicator::rsi::Rsi;
use stockscope::indicator::{enrich, EMA_FAST_PERIOD, RSI_PERIOD};
use stockscope::model::candle::{Candle, IndicatorField};

fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Candle::new(start + Duration::days(i as i64)).with_ohlc(c, c + 1.0, c - 1.0, c))
        .collect()
}

#[test]
fn rsi_is_100_with_gains_only_and_50_when_flat() {
    let mut rising = Rsi::new(RSI_PERIOD);
    let mut last = None;
    for i in 0..=RSI_PERIOD {
        last = rising.push(100.0 + i as f64);
    }
    assert_eq!(last, Some(100.0));

    let mut flat = Rsi::new(3);
    let values: Vec<Option<f64>> = [10.0, 10.0, 10.0, 10.0].iter().map(|c| flat.push(*c)).collect();
    assert_eq!(values, vec![None, None, None, Some(50.0)]);
}

#[test]
fn rsi_uses_simple_means_of_gains_and_losses() {
    let mut rsi = Rsi::new(2);
    assert_eq!(rsi.push(10.0), None);
    assert_eq!(rsi.push(12.0), None);
    // gains mean 1.0, losses mean 0.5 -> RS 2
    let v = rsi.push(11.0).unwrap();
    assert!((v - (100.0 - 100.0 / 3.0)).abs() < 1e-9);
}

#[test]
fn bollinger_band_uses_two_sample_deviations() {
    let mut bb = Bollinger::new(3, 2.0);
    assert_eq!(bb.push(1.0), None);
    assert_eq!(bb.push(2.0), None);
    let band = bb.push(3.0).unwrap();
    assert!((band.mid - 2.0).abs() < 1e-12);
    assert!((band.upper - 4.0).abs() < 1e-12);
    assert!((band.lower - 0.0).abs() < 1e-12);
}

#[test]
fn enrich_fills_absent_fields_after_warm_up() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64).sin() * 5.0).collect();
    let mut candles = candles_from_closes(&closes);
    enrich(&mut candles);

    for c in &candles[..EMA_FAST_PERIOD - 1] {
        assert_eq!(c.indicators.get(IndicatorField::Ema12), None);
    }
    let seed: f64 = closes[..EMA_FAST_PERIOD].iter().sum::<f64>() / EMA_FAST_PERIOD as f64;
    let ema12 = candles[EMA_FAST_PERIOD - 1].indicators.get(IndicatorField::Ema12).unwrap();
    assert!((ema12 - seed).abs() < 1e-9);

    assert_eq!(candles[18].indicators.get(IndicatorField::BbMa20), None);
    assert!(candles[19].indicators.get(IndicatorField::BbMa20).is_some());
    assert!(candles[24].indicators.get(IndicatorField::Ema26).is_none());
    assert!(candles[25].indicators.get(IndicatorField::Ema26).is_some());
    assert!(candles[13].indicators.get(IndicatorField::Rsi14).is_none());
    let rsi = candles[14].indicators.get(IndicatorField::Rsi14).unwrap();
    assert!((0.0..=100.0).contains(&rsi));
}

#[test]
fn enrich_never_overwrites_delivered_values() {
    let closes: Vec<f64> = (0..30).map(|i| 50.0 + i as f64).collect();
    let mut candles = candles_from_closes(&closes);
    candles[29].indicators.set(IndicatorField::Ema12, Some(999.0));
    candles[29].indicators.set(IndicatorField::Rsi14, Some(12.5));
    enrich(&mut candles);

    assert_eq!(candles[29].indicators.get(IndicatorField::Ema12), Some(999.0));
    assert_eq!(candles[29].indicators.get(IndicatorField::Rsi14), Some(12.5));
    assert!(candles[29].indicators.get(IndicatorField::BbUpper).is_some());
}

#[test]
fn enrich_skips_candles_without_close() {
    let closes: Vec<f64> = (0..13).map(|i| 10.0 + i as f64).collect();
    let mut candles = candles_from_closes(&closes);
    let start = candles[0].timestamp;
    candles.insert(5, Candle::new(start + Duration::hours(12)));
    enrich(&mut candles);

    assert_eq!(candles[5].indicators.get(IndicatorField::Ema12), None);
    // the 12th close sits at index 12 once the gap is inserted
    assert!(candles[11].indicators.get(IndicatorField::Ema12).is_none());
    assert!(candles[12].indicators.get(IndicatorField::Ema12).is_some());
}
