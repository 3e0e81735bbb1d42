use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::chart::scene::{ChartScene, LineScene, RenderedChart, SeriesScene};
use crate::model::indicator::IndicatorToggles;
use crate::model::timeframe::Timeframe;

use super::rgb;

/// Terminal rendition of a composed chart scene. Pixel positions are scaled
/// onto the cell grid, so panels keep their relative heights.
pub struct PriceChart<'a> {
    chart: &'a RenderedChart,
    symbol: &'a str,
    timeframe: Timeframe,
    toggles: Option<&'a IndicatorToggles>,
    loading: bool,
}

impl<'a> PriceChart<'a> {
    pub fn new(chart: &'a RenderedChart, symbol: &'a str, timeframe: Timeframe) -> Self {
        Self {
            chart,
            symbol,
            timeframe,
            toggles: None,
            loading: false,
        }
    }

    pub fn toggles(mut self, toggles: &'a IndicatorToggles) -> Self {
        self.toggles = Some(toggles);
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

struct CellMap {
    area: Rect,
    sx: f64,
    sy: f64,
}

impl CellMap {
    fn new(area: Rect, scene: &ChartScene) -> Self {
        Self {
            area,
            sx: area.width as f64 / scene.width.max(1) as f64,
            sy: area.height as f64 / scene.height.max(1) as f64,
        }
    }

    fn col(&self, x: f64) -> u16 {
        let c = (x * self.sx).floor().max(0.0) as u16;
        self.area.x + c.min(self.area.width.saturating_sub(1))
    }

    fn row(&self, y: f64) -> u16 {
        let r = (y * self.sy).floor().max(0.0) as u16;
        self.area.y + r.min(self.area.height.saturating_sub(1))
    }
}

impl Widget for PriceChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut title = format!(" Price ({} · {}) ", self.symbol, self.timeframe.label());
        if let Some(toggles) = self.toggles {
            if !toggles.is_empty() {
                title.push_str(&format!("[{}] ", toggles.labels().join(" ")));
            }
        }
        if self.loading {
            title.push_str("loading… ");
        }
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 || inner.width < 4 {
            return;
        }

        let scene = match self.chart {
            RenderedChart::Chart(scene) => scene,
            RenderedChart::Empty(reason) => {
                let msg = reason.message();
                let x = inner.x + inner.width.saturating_sub(msg.len() as u16) / 2;
                let y = inner.y + inner.height / 2;
                buf.set_stringn(
                    x,
                    y,
                    msg,
                    inner.width as usize,
                    Style::default().fg(Color::DarkGray),
                );
                return;
            }
        };

        let map = CellMap::new(inner, scene);
        let axis = Style::default().fg(rgb(scene.palette.text));

        for panel in &scene.panels {
            for series in &panel.series {
                draw_series(buf, &map, series);
            }
            // top and bottom tick labels only; the grid is too coarse for more
            let labels = [panel.y_ticks.last(), panel.y_ticks.first()];
            for (value, y) in labels.into_iter().flatten() {
                buf.set_stringn(
                    inner.x,
                    map.row(*y),
                    format!("{:.1}", value),
                    (map.col(scene.x.range().0) - inner.x) as usize,
                    axis,
                );
            }
        }

        if let (Some((first_x, first)), Some((last_x, last))) =
            (scene.x_ticks.first(), scene.x_ticks.last())
        {
            let row = inner.y + inner.height - 1;
            buf.set_string(map.col(*first_x), row, first, axis);
            let col = map
                .col(*last_x)
                .saturating_sub(last.len() as u16)
                .max(map.col(*first_x) + first.len() as u16 + 1);
            if col + (last.len() as u16) <= inner.x + inner.width {
                buf.set_string(col, row, last, axis);
            }
        }
    }
}

fn draw_series(buf: &mut Buffer, map: &CellMap, series: &SeriesScene) {
    match series {
        SeriesScene::Candles(glyphs) => {
            for g in glyphs {
                let col = map.col(g.x);
                let style = Style::default().fg(rgb(g.fill));
                for row in map.row(g.wick_top)..=map.row(g.wick_bottom) {
                    buf.set_string(col, row, "│", style);
                }
                for row in map.row(g.body_top)..=map.row(g.body_bottom) {
                    buf.set_string(col, row, "█", style);
                }
            }
        }
        SeriesScene::Line(line) => draw_line(buf, map, line),
        SeriesScene::Band { upper, mid, lower } => {
            draw_line(buf, map, upper);
            draw_line(buf, map, lower);
            draw_line(buf, map, mid);
        }
        SeriesScene::Bars { color, bars, .. } => {
            let style = Style::default().fg(rgb(*color)).add_modifier(Modifier::DIM);
            for b in bars {
                let col = map.col(b.x);
                for row in map.row(b.top)..=map.row(b.bottom) {
                    buf.set_string(col, row, "▆", style);
                }
            }
        }
        SeriesScene::Area { line, .. } => draw_line(buf, map, line),
    }
}

fn draw_line(buf: &mut Buffer, map: &CellMap, line: &LineScene) {
    let style = Style::default().fg(rgb(line.color));
    for (x, y) in line.segments.iter().flatten() {
        buf.set_string(map.col(*x), map.row(*y), "•", style);
    }
}
