use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::chart::palette::ColorMode;
use crate::gauge::{self, Gauge};
use crate::model::timeframe::Timeframe;
use crate::status::{StatusState, TechnicalStatusPanel};

use super::hex_color;

pub struct TrendCardsPanel<'a> {
    status: &'a TechnicalStatusPanel,
}

impl<'a> TrendCardsPanel<'a> {
    pub fn new(status: &'a TechnicalStatusPanel) -> Self {
        Self { status }
    }
}

impl Widget for TrendCardsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.status.state() {
            StatusState::Loading { .. } => " Trend Analysis (loading…) ",
            _ => " Trend Analysis ",
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let placeholder = match self.status.state() {
            StatusState::Idle => Some(("No prediction yet", Color::DarkGray)),
            StatusState::Loading { previous: None } => Some(("Loading prediction…", Color::DarkGray)),
            StatusState::Failed(_) => Some(("Prediction unavailable", Color::Red)),
            _ => None,
        };
        if let Some((msg, color)) = placeholder {
            let mut lines = vec![Line::from(Span::styled(msg, Style::default().fg(color)))];
            if let Some(err) = self.status.error() {
                lines.push(Line::from(Span::styled(
                    err.to_string(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            Paragraph::new(lines).render(inner, buf);
            return;
        }

        let cards = self.status.cards();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cards.len().max(1) as u32); cards.len()])
            .split(inner);

        for (card, col) in cards.iter().zip(columns.iter()) {
            let color = hex_color(card.color);
            let lines = vec![
                Line::from(Span::styled(
                    card.horizon.label(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    card.horizon.period(),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(vec![
                    Span::raw(format!("{} ", card.icon)),
                    Span::styled(
                        card.label.to_string(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                ]),
            ];
            Paragraph::new(lines).render(*col, buf);
        }
    }
}

/// Cell-grid rendition of the confidence gauge, sampled from the same
/// geometry as the SVG.
pub struct GaugePanel<'a> {
    gauge: Option<&'a Gauge>,
    mode: ColorMode,
}

impl<'a> GaugePanel<'a> {
    pub fn new(gauge: Option<&'a Gauge>, mode: ColorMode) -> Self {
        Self { gauge, mode }
    }
}

impl Widget for GaugePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Confidence ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(g) = self.gauge else {
            buf.set_stringn(
                inner.x,
                inner.y,
                "---",
                inner.width as usize,
                Style::default().fg(Color::DarkGray),
            );
            return;
        };
        if inner.width < 8 || inner.height < 4 {
            buf.set_string(inner.x, inner.y, gauge::score_label(g.score), Style::default());
            return;
        }

        let sx = inner.width as f64 / gauge::VIEW_WIDTH as f64;
        let sy = inner.height as f64 / gauge::VIEW_HEIGHT as f64;
        let cell = |(x, y): (f64, f64)| -> (u16, u16) {
            let c = ((x * sx).floor().max(0.0) as u16).min(inner.width - 1);
            let r = ((y * sy).floor().max(0.0) as u16).min(inner.height - 1);
            (inner.x + c, inner.y + r)
        };
        let text = match self.mode {
            ColorMode::Light => Color::Black,
            ColorMode::Dark => Color::White,
        };

        for arc in &g.bands {
            let style = Style::default().fg(hex_color(arc.band.color));
            let mut deg = arc.band.start_deg;
            while deg <= arc.band.end_deg {
                let (c, r) = cell(gauge::point_on_arc(deg, gauge::ARC_RADIUS));
                buf.set_string(c, r, "█", style);
                deg += 1.0;
            }
        }

        let steps = 24;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = gauge::CENTER.0 + (g.needle_tip.0 - gauge::CENTER.0) * t;
            let y = gauge::CENTER.1 + (g.needle_tip.1 - gauge::CENTER.1) * t;
            let (c, r) = cell((x, y));
            buf.set_string(c, r, "•", Style::default().fg(text));
        }
        let (c, r) = cell(gauge::CENTER);
        buf.set_string(c, r, "●", Style::default().fg(hex_color(gauge::HUB_INNER_COLOR)));

        let label = gauge::score_label(g.score);
        let (c, r) = cell((gauge::CENTER.0, gauge::CENTER.1 - 30.0));
        let c = c.saturating_sub(label.len() as u16 / 2).max(inner.x);
        buf.set_string(c, r, label, Style::default().fg(text).add_modifier(Modifier::BOLD));
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner_height = area.height.saturating_sub(2) as usize;

        let visible = if self.messages.len() > inner_height {
            &self.messages[self.messages.len() - inner_height..]
        } else {
            self.messages
        };

        let lines: Vec<Line> = visible
            .iter()
            .map(|msg| {
                let color = if msg.starts_with("[ERR]") {
                    Color::Red
                } else if msg.starts_with("[WARN]") {
                    Color::Yellow
                } else {
                    Color::Gray
                };
                Line::from(Span::styled(msg.as_str(), Style::default().fg(color)))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct StatusBar<'a> {
    pub symbol: &'a str,
    pub timeframe: Timeframe,
    pub mode: ColorMode,
    pub candle_count: usize,
    pub loading: bool,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let fetch_status = if self.loading {
            Span::styled("LOADING", Style::default().fg(Color::Yellow))
        } else {
            Span::styled("READY", Style::default().fg(Color::Green))
        };

        let line = Line::from(vec![
            Span::styled(
                " stockscope ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.symbol, Style::default().fg(Color::Cyan)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.timeframe.label(), Style::default().fg(Color::White)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            fetch_status,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("candles: {}", self.candle_count),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.mode.to_string(), Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" [Q]", Style::default().fg(Color::Yellow)),
            Span::styled("uit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[1-5]", Style::default().fg(Color::Yellow)),
            Span::styled(" EMA12/EMA26/BB/RSI/VOL  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[T]", Style::default().fg(Color::Yellow)),
            Span::styled("imeframe  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[M]", Style::default().fg(Color::Yellow)),
            Span::styled("ode  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[S]", Style::default().fg(Color::Yellow)),
            Span::styled("ymbol  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[E]", Style::default().fg(Color::Yellow)),
            Span::styled("xport", Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
