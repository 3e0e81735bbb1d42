use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use stockscope::chart::palette::{hex, ColorMode, OverlayLine, Palette};
use stockscope::chart::scene::{EmptyReason, RenderedChart, SeriesScene};
use stockscope::chart::svg::render_svg;
use stockscope::chart::viewport::{responsive_width, Viewport};
use stockscope::chart::{render, render_records, render_series, MountedChart};
use stockscope::layout::PanelKind;
use stockscope::model::candle::{Candle, IndicatorField};
use stockscope::model::indicator::{Indicator, IndicatorToggles};
use stockscope::normalize::NormalizedSeries;

fn day(i: i64) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(i)
}

fn candles(n: i64) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let open = 100.0 + i as f64;
            let close = if i % 2 == 0 { open + 3.0 } else { open - 3.0 };
            Candle::new(day(i))
                .with_ohlc(open, open.max(close) + 1.0, open.min(close) - 1.0, close)
                .with_volume(500.0 + 10.0 * i as f64)
        })
        .collect()
}

fn toggles(list: &[Indicator]) -> IndicatorToggles {
    list.iter().copied().collect()
}

fn scene(chart: &RenderedChart) -> &stockscope::chart::scene::ChartScene {
    chart.scene().expect("chart should not be empty")
}

#[test]
fn empty_series_renders_no_data_state() {
    let chart = render(&[], &IndicatorToggles::default(), 1020, ColorMode::Light);
    assert_eq!(chart, RenderedChart::Empty(EmptyReason::NoData));

    let svg = render_svg(&chart, None).unwrap();
    assert!(svg.contains("No data available"));
}

#[test]
fn records_without_dates_render_no_valid_dates_state() {
    let toggles = IndicatorToggles::default();
    assert_eq!(
        render_records(&[], &toggles, 1020, ColorMode::Light),
        RenderedChart::Empty(EmptyReason::NoData)
    );
    let undated = vec![json!({"close": 1}), json!({"date": "nope", "close": 2})];
    let chart = render_records(&undated, &toggles, 1020, ColorMode::Dark);
    assert_eq!(chart, RenderedChart::Empty(EmptyReason::NoValidDates));
    assert!(render_svg(&chart, None)
        .unwrap()
        .contains("No valid dates available"));
}

#[test]
fn normalized_series_with_only_undated_records_reports_no_valid_dates() {
    let undated = vec![json!({"date": "not-a-date", "close": 1}), json!({"close": 2})];
    let series = NormalizedSeries::from_records(&undated);
    assert_eq!(
        render_series(&series, &IndicatorToggles::default(), 1020, ColorMode::Light),
        RenderedChart::Empty(EmptyReason::NoValidDates)
    );
    assert_eq!(
        render_series(&NormalizedSeries::default(), &IndicatorToggles::default(), 1020, ColorMode::Light),
        RenderedChart::Empty(EmptyReason::NoData)
    );

    let viewport = Viewport::default();
    let mut mounted = MountedChart::mount(&viewport, ColorMode::Dark);
    assert_eq!(
        mounted.render(&series, &IndicatorToggles::none()),
        RenderedChart::Empty(EmptyReason::NoValidDates)
    );
}

#[test]
/// EMA12 toggled on while absent on every candle: candles only, no line and
/// no zero-valued points.
fn absent_indicator_adds_no_overlay() {
    let records = vec![
        json!({"date": "2024-01-01", "open": 99, "high": 101, "low": 98, "close": 100}),
        json!({"date": "2024-01-02", "open": 100, "high": 106, "low": 99, "close": 105}),
    ];
    let chart = render_records(&records, &toggles(&[Indicator::Ema12]), 1020, ColorMode::Light);
    let main = scene(&chart).panel(PanelKind::Main).unwrap();
    assert_eq!(main.series.len(), 1);
    assert!(matches!(main.series[0], SeriesScene::Candles(ref g) if g.len() == 2));
    assert_eq!(main.overlays().count(), 0);
}

#[test]
fn overlay_lines_break_at_gaps() {
    let mut data = candles(5);
    for (i, c) in data.iter_mut().enumerate() {
        if i != 2 {
            c.indicators.set(IndicatorField::Ema12, Some(100.0 + i as f64));
        }
    }
    let chart = render(&data, &toggles(&[Indicator::Ema12]), 1020, ColorMode::Light);
    let main = scene(&chart).panel(PanelKind::Main).unwrap();
    let line = main
        .series
        .iter()
        .find_map(|s| match s {
            SeriesScene::Line(l) if l.line == OverlayLine::Ema12 => Some(l),
            _ => None,
        })
        .expect("EMA12 line");
    assert_eq!(line.segments.len(), 2);
    assert_eq!(line.point_count(), 4);
}

#[test]
fn each_active_toggle_adds_exactly_one_series() {
    let mut data = candles(4);
    for c in data.iter_mut() {
        let close = c.close.unwrap();
        c.indicators.set(IndicatorField::Ema12, Some(close));
        c.indicators.set(IndicatorField::Ema26, Some(close - 1.0));
        c.indicators.set(IndicatorField::BbUpper, Some(close + 10.0));
        c.indicators.set(IndicatorField::BbLower, Some(close - 10.0));
        c.indicators.set(IndicatorField::BbMa20, Some(close));
        c.indicators.set(IndicatorField::Rsi14, Some(55.0));
    }
    let all = toggles(&Indicator::ALL);
    let chart = render(&data, &all, 1020, ColorMode::Light);
    let s = scene(&chart);

    let main = s.panel(PanelKind::Main).unwrap();
    let overlay_kinds: Vec<Indicator> = main.overlays().filter_map(|o| o.indicator()).collect();
    assert_eq!(
        overlay_kinds,
        vec![Indicator::Ema12, Indicator::Ema26, Indicator::Bb]
    );
    let volume = s.panel(PanelKind::Volume).unwrap();
    assert_eq!(volume.series.len(), 1);
    let osc = s.panel(PanelKind::Oscillator).unwrap();
    assert_eq!(osc.series.len(), 1);
    assert!(matches!(osc.series[0], SeriesScene::Area { .. }));
}

#[test]
fn main_extent_includes_bollinger_bands_when_active() {
    let mut data = candles(3);
    data[1].indicators.set(IndicatorField::BbUpper, Some(300.0));
    data[1].indicators.set(IndicatorField::BbLower, Some(10.0));

    let with_bb = render(&data, &toggles(&[Indicator::Bb]), 1020, ColorMode::Light);
    let main = scene(&with_bb).panel(PanelKind::Main).unwrap();
    assert_eq!(main.y.domain(), (10.0, 300.0));

    let without = render(&data, &IndicatorToggles::none(), 1020, ColorMode::Light);
    let main = scene(&without).panel(PanelKind::Main).unwrap();
    let (lo, hi) = main.y.domain();
    assert!(lo > 10.0 && hi < 300.0);
}

#[test]
fn oscillator_domain_is_fixed() {
    let mut data = candles(3);
    for c in data.iter_mut() {
        c.indicators.set(IndicatorField::Rsi14, Some(42.0));
    }
    let chart = render(&data, &toggles(&[Indicator::Rsi]), 1020, ColorMode::Light);
    let osc = scene(&chart).panel(PanelKind::Oscillator).unwrap();
    assert_eq!(osc.y.domain(), (0.0, 100.0));
}

#[test]
fn volume_bars_share_the_candle_time_scale() {
    let data = candles(6);
    let chart = render(&data, &toggles(&[Indicator::Volume]), 1020, ColorMode::Light);
    let s = scene(&chart);
    let main = s.panel(PanelKind::Main).unwrap();
    let volume = s.panel(PanelKind::Volume).unwrap();
    let (SeriesScene::Candles(glyphs), SeriesScene::Bars { bars, .. }) =
        (&main.series[0], &volume.series[0])
    else {
        panic!("unexpected series kinds");
    };
    let candle_x: Vec<f64> = glyphs.iter().map(|g| g.x).collect();
    let bar_x: Vec<f64> = bars.iter().map(|b| b.x).collect();
    assert_eq!(candle_x, bar_x);
}

#[test]
fn candles_colour_up_only_when_close_exceeds_open() {
    let data = vec![
        Candle::new(day(0)).with_ohlc(10.0, 12.0, 9.0, 11.0),
        Candle::new(day(1)).with_ohlc(11.0, 12.0, 9.0, 10.0),
        Candle::new(day(2)).with_ohlc(10.0, 11.0, 9.0, 10.0),
    ];
    let chart = render(&data, &IndicatorToggles::none(), 1020, ColorMode::Dark);
    let s = scene(&chart);
    let palette = Palette::for_mode(ColorMode::Dark);
    let SeriesScene::Candles(glyphs) = &s.panel(PanelKind::Main).unwrap().series[0] else {
        panic!("expected candles");
    };
    let fills: Vec<_> = glyphs.iter().map(|g| g.fill).collect();
    assert_eq!(fills, vec![palette.up, palette.down, palette.down]);
    assert!(glyphs.iter().all(|g| g.fill == g.wick));
}

#[test]
fn overlay_colours_are_distinct_and_hue_stable_across_modes() {
    for mode in [ColorMode::Light, ColorMode::Dark] {
        let palette = Palette::for_mode(mode);
        let colors: Vec<String> = OverlayLine::ALL.iter().map(|l| hex(palette.overlay(*l))).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b, "{:?} overlay colours collide", mode);
            }
        }
    }
    let light = Palette::for_mode(ColorMode::Light);
    let dark = Palette::for_mode(ColorMode::Dark);
    assert_ne!(light.overlay(OverlayLine::Ema12), dark.overlay(OverlayLine::Ema12));
}

#[test]
fn responsive_width_clamps() {
    assert_eq!(responsive_width(0), 600);
    assert_eq!(responsive_width(500), 600);
    assert_eq!(responsive_width(1020), 900);
    assert_eq!(responsive_width(1520), 1400);
    assert_eq!(responsive_width(4000), 1400);

    let chart = render(&candles(2), &IndicatorToggles::default(), 4000, ColorMode::Light);
    assert_eq!(scene(&chart).width, 1400);
}

#[test]
fn readout_reports_nearest_candle_and_hovered_value() {
    let data = candles(3);
    let chart = render(&data, &IndicatorToggles::none(), 1020, ColorMode::Light);
    let s = scene(&chart);
    let main = s.panel(PanelKind::Main).unwrap();
    let px = s.x.center(1) + 2.0;
    let py = main.top + main.height / 2.0;

    let readout = s.readout(px, py).expect("pointer over the plot");
    assert_eq!(readout.index, 1);
    assert_eq!(readout.panel, PanelKind::Main);
    assert_eq!(readout.date_label(), "2024-01-02");
    assert!((readout.value - main.y.invert(py)).abs() < 1e-9);
    assert_eq!(readout.x, s.x.center(1));

    assert!(s.readout(1.0, py).is_none());
    assert!(s.readout(px, s.height as f64 + 50.0).is_none());
}

#[test]
fn svg_output_uses_scene_size_and_palette() {
    let data = candles(4);
    let chart = render(&data, &IndicatorToggles::none(), 1020, ColorMode::Light);
    let s = scene(&chart);
    let svg = render_svg(&chart, None).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains(&format!("width=\"{}\"", s.width)));
    assert!(svg.contains(&format!("height=\"{}\"", s.height)));
    let lower = svg.to_lowercase();
    assert!(lower.contains(&hex(s.palette.up)));
    assert!(lower.contains(&hex(s.palette.down)));
    assert!(svg.contains("2024-01-01"));
}

#[test]
fn svg_with_pointer_draws_readout_labels() {
    let data = candles(3);
    let chart = render(&data, &IndicatorToggles::none(), 1020, ColorMode::Light);
    let s = scene(&chart);
    let main = s.panel(PanelKind::Main).unwrap();
    let pointer = (s.x.center(2), main.top + 20.0);
    let readout = s.readout(pointer.0, pointer.1).unwrap();

    let with = render_svg(&chart, Some(pointer)).unwrap();
    let without = render_svg(&chart, None).unwrap();
    assert!(with.contains(&readout.value_label()));
    assert!(with.len() > without.len());
}

#[test]
fn render_is_pure() {
    let data = candles(8);
    let t = toggles(&[Indicator::Volume, Indicator::Ema12]);
    assert_eq!(
        render(&data, &t, 1100, ColorMode::Dark),
        render(&data, &t, 1100, ColorMode::Dark)
    );
}

#[test]
fn mounted_chart_follows_resizes_and_detaches_on_drop() {
    let viewport = Viewport::new(1020);
    assert_eq!(viewport.listener_count(), 0);

    let mut chart = MountedChart::mount(&viewport, ColorMode::Light);
    assert_eq!(viewport.listener_count(), 1);
    assert_eq!(chart.width(), 900);

    viewport.resize(1320);
    let rendered = chart.render(&NormalizedSeries::from_candles(candles(3)), &IndicatorToggles::default());
    assert_eq!(scene(&rendered).width, 1200);
    assert_eq!(chart.width(), 1200);

    for _ in 0..10 {
        let remount = MountedChart::mount(&viewport, ColorMode::Dark);
        drop(remount);
    }
    assert_eq!(viewport.listener_count(), 1);

    drop(chart);
    assert_eq!(viewport.listener_count(), 0);
}

#[test]
fn mounted_chart_mode_switch_changes_palette() {
    let viewport = Viewport::default();
    let mut chart = MountedChart::mount(&viewport, ColorMode::Light);
    chart.set_mode(ColorMode::Dark);
    let series = NormalizedSeries::from_candles(candles(2));
    let rendered = chart.render(&series, &IndicatorToggles::none());
    assert_eq!(scene(&rendered).palette, Palette::for_mode(ColorMode::Dark));
    assert!(chart.render_svg(&series, &IndicatorToggles::none()).is_ok());
}
