use chrono::{Duration, TimeZone, Utc};

use stockscope::layout::{
    plan, PanelKind, PanelLayout, YDomain, FIXED_MARGIN, MAIN_HEIGHT, MAIN_HEIGHT_WITH_OSCILLATOR,
    OSCILLATOR_HEIGHT, PANEL_TOP, VOLUME_HEIGHT,
};
use stockscope::model::candle::{Candle, IndicatorField};
use stockscope::model::indicator::{Indicator, IndicatorToggles};

fn series(with_volume: bool, with_rsi: bool) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..5)
        .map(|i| {
            let close = 100.0 + i as f64;
            let mut c = Candle::new(start + Duration::days(i))
                .with_ohlc(close - 1.0, close + 2.0, close - 2.0, close);
            if with_volume {
                c = c.with_volume(1_000.0 * (i + 1) as f64);
            }
            if with_rsi && i > 1 {
                c = c.with_indicator(IndicatorField::Rsi14, 40.0 + i as f64);
            }
            c
        })
        .collect()
}

fn toggles(list: &[Indicator]) -> IndicatorToggles {
    list.iter().copied().collect()
}

#[test]
fn total_height_is_sum_of_documented_heights_for_every_configuration() {
    let all = toggles(&[Indicator::Volume, Indicator::Rsi]);
    let cases = [
        (series(false, false), MAIN_HEIGHT, 0, 0),
        (series(true, false), MAIN_HEIGHT, VOLUME_HEIGHT, 0),
        (series(false, true), MAIN_HEIGHT_WITH_OSCILLATOR, 0, OSCILLATOR_HEIGHT),
        (
            series(true, true),
            MAIN_HEIGHT_WITH_OSCILLATOR,
            VOLUME_HEIGHT,
            OSCILLATOR_HEIGHT,
        ),
    ];
    for (data, main, volume, osc) in cases {
        let p = plan(&all, &data);
        assert_eq!(p.main_height(), main);
        assert_eq!(p.volume_height(), volume);
        assert_eq!(p.oscillator_height(), osc);
        assert_eq!(p.total_height, main + volume + osc + FIXED_MARGIN);
        let stacked: u32 = p.panels.iter().map(|panel| panel.height).sum();
        assert_eq!(p.total_height, stacked + FIXED_MARGIN);
    }
}

#[test]
/// VOLUME toggled on over a series whose volume is null everywhere must not
/// reserve a panel.
fn volume_toggle_without_volume_data_reserves_nothing() {
    let p = plan(&toggles(&[Indicator::Volume]), &series(false, false));
    assert!(!p.show_volume());
    assert_eq!(p.volume_height(), 0);
    assert_eq!(p.layout, PanelLayout::PriceOnly);
    assert!(p.panel(PanelKind::Volume).is_none());
}

#[test]
fn data_without_toggle_reserves_nothing() {
    let p = plan(&IndicatorToggles::default(), &series(true, true));
    assert_eq!(p.layout, PanelLayout::PriceOnly);
    assert_eq!(p.total_height, MAIN_HEIGHT + FIXED_MARGIN);
}

#[test]
fn panels_stack_in_fixed_order() {
    let p = plan(
        &toggles(&[Indicator::Rsi, Indicator::Volume]),
        &series(true, true),
    );
    let kinds: Vec<PanelKind> = p.panels.iter().map(|panel| panel.kind).collect();
    assert_eq!(
        kinds,
        vec![PanelKind::Main, PanelKind::Volume, PanelKind::Oscillator]
    );
    assert_eq!(p.panels[0].top, PANEL_TOP);
    assert_eq!(p.panels[1].top, PANEL_TOP + MAIN_HEIGHT_WITH_OSCILLATOR);
    assert_eq!(
        p.panels[2].top,
        PANEL_TOP + MAIN_HEIGHT_WITH_OSCILLATOR + VOLUME_HEIGHT
    );
    assert_eq!(p.panels[2].y_domain, YDomain::Fixed(0.0, 100.0));
}

#[test]
fn plan_is_pure() {
    let t = toggles(&[Indicator::Bb, Indicator::Volume, Indicator::Rsi]);
    let data = series(true, true);
    assert_eq!(plan(&t, &data), plan(&t, &data));
}

#[test]
fn price_extent_includes_bands_only_when_bb_is_active() {
    let mut data = series(false, false);
    data[2].indicators.set(IndicatorField::BbUpper, Some(150.0));
    data[3].indicators.set(IndicatorField::BbLower, Some(50.0));

    let with_bb = plan(&toggles(&[Indicator::Bb]), &data);
    let main = with_bb.panel(PanelKind::Main).unwrap();
    assert_eq!(main.y_domain.extent(&data), Some((50.0, 150.0)));

    let without_bb = plan(&IndicatorToggles::none(), &data);
    let main = without_bb.panel(PanelKind::Main).unwrap();
    // lows are close - 2 for closes 100..=104; highs close + 2
    assert_eq!(main.y_domain.extent(&data), Some((98.0, 106.0)));
}

#[test]
fn volume_extent_starts_at_zero() {
    let data = series(true, false);
    assert_eq!(YDomain::Volume.extent(&data), Some((0.0, 5_000.0)));
    assert_eq!(YDomain::Volume.extent(&series(false, false)), None);
}
