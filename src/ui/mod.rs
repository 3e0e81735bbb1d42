pub mod chart;
pub mod dashboard;

use std::str::FromStr;

use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Color;
use ratatui::Frame;

use crate::chart::palette::ColorMode;
use crate::chart::scene::RenderedChart;
use crate::chart::viewport::Viewport;
use crate::chart::MountedChart;
use crate::config::Config;
use crate::event::AppEvent;
use crate::input::UiCommand;
use crate::model::indicator::IndicatorToggles;
use crate::model::timeframe::Timeframe;
use crate::normalize::NormalizedSeries;
use crate::runtime::fetch::FetchRequest;
use crate::runtime::request_gate::RequestGate;
use crate::status::TechnicalStatusPanel;

use chart::PriceChart;
use dashboard::{GaugePanel, KeybindBar, LogPanel, StatusBar, TrendCardsPanel};

const MAX_LOG_MESSAGES: usize = 200;

/// Side effects requested by a key command; the event loop carries them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Quit,
    Fetch(FetchRequest),
    Export,
}

pub struct AppState {
    pub symbols: Vec<String>,
    symbol_index: usize,
    pub timeframe: Timeframe,
    pub toggles: IndicatorToggles,
    pub series: NormalizedSeries,
    pub candles_loading: bool,
    pub status: TechnicalStatusPanel,
    pub viewport: Viewport,
    pub log_messages: Vec<String>,
    candle_gate: RequestGate,
    chart: MountedChart,
    rendered: RenderedChart,
}

impl AppState {
    pub fn new(
        symbols: Vec<String>,
        timeframe: Timeframe,
        toggles: IndicatorToggles,
        mode: ColorMode,
        viewport_width: u32,
    ) -> Self {
        let viewport = Viewport::new(viewport_width);
        let mut chart = MountedChart::mount(&viewport, mode);
        let series = NormalizedSeries::default();
        let rendered = chart.render(&series, &toggles);
        Self {
            symbols,
            symbol_index: 0,
            timeframe,
            toggles,
            series,
            candles_loading: false,
            status: TechnicalStatusPanel::new(),
            viewport,
            log_messages: Vec::new(),
            candle_gate: RequestGate::new(),
            chart,
            rendered,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.chart.symbol_list(),
            config.chart.timeframe,
            config.chart.toggles()?,
            config.chart.color_mode,
            config.chart.viewport_width,
        ))
    }

    pub fn symbol(&self) -> &str {
        self.symbols
            .get(self.symbol_index)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn mode(&self) -> ColorMode {
        self.chart.mode()
    }

    pub fn chart_width(&self) -> u32 {
        self.chart.width()
    }

    pub fn rendered_chart(&self) -> &RenderedChart {
        &self.rendered
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    /// Start a candle fetch for the current symbol and timeframe. The series
    /// on screen stays until the response lands.
    pub fn request_candles(&mut self) -> FetchRequest {
        self.candles_loading = true;
        FetchRequest::Candles {
            token: self.candle_gate.begin(),
            symbol: self.symbol().to_string(),
            timeframe: self.timeframe,
        }
    }

    /// Start a prediction fetch, unless the symbol is unchanged.
    pub fn request_prediction(&mut self) -> Option<FetchRequest> {
        let symbol = self.symbol().to_string();
        self.status
            .begin(&symbol)
            .map(|token| FetchRequest::Prediction { token, symbol })
    }

    pub fn initial_requests(&mut self) -> Vec<FetchRequest> {
        let mut out = vec![self.request_candles()];
        out.extend(self.request_prediction());
        out
    }

    fn refresh_chart(&mut self) {
        self.rendered = self.chart.render(&self.series, &self.toggles);
    }

    /// Feed a terminal resize into the viewport; the mounted chart picks it
    /// up on the next render.
    pub fn resize(&mut self, viewport_width: u32) {
        self.viewport.resize(viewport_width);
        self.refresh_chart();
    }

    pub fn handle_command(&mut self, cmd: UiCommand) -> Vec<Effect> {
        match cmd {
            UiCommand::Quit => vec![Effect::Quit],
            UiCommand::Export => vec![Effect::Export],
            UiCommand::ToggleIndicator(indicator) => {
                let on = self.toggles.toggle(indicator);
                self.push_log(format!("{} {}", indicator, if on { "on" } else { "off" }));
                self.refresh_chart();
                Vec::new()
            }
            UiCommand::ToggleColorMode => {
                let mode = self.chart.mode().toggled();
                self.chart.set_mode(mode);
                self.refresh_chart();
                Vec::new()
            }
            UiCommand::CycleTimeframe => {
                self.timeframe = self.timeframe.next();
                vec![Effect::Fetch(self.request_candles())]
            }
            UiCommand::NextSymbol => {
                if self.symbols.len() < 2 {
                    return Vec::new();
                }
                self.symbol_index = (self.symbol_index + 1) % self.symbols.len();
                let mut out = vec![Effect::Fetch(self.request_candles())];
                out.extend(self.request_prediction().map(Effect::Fetch));
                out
            }
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::CandlesLoaded {
                token,
                symbol,
                timeframe,
                series,
            } => {
                if let Some(series) = self.candle_gate.accept(token, series) {
                    self.series = series;
                    self.candles_loading = false;
                    self.refresh_chart();
                    self.push_log(format!(
                        "Loaded {} ({}) {} candles",
                        symbol,
                        timeframe,
                        self.series.len()
                    ));
                }
            }
            AppEvent::PredictionResolved {
                token,
                symbol,
                result,
            } => {
                if self.status.resolve(token, result) {
                    if let Some(err) = self.status.error() {
                        let msg = format!("[ERR] Prediction for {} failed: {}", symbol, err);
                        self.push_log(msg);
                    }
                }
            }
            AppEvent::ExportWritten(paths) => {
                for path in paths {
                    self.push_log(format!("Exported {}", path.display()));
                }
            }
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
            AppEvent::Error(msg) => {
                self.push_log(format!("[ERR] {}", msg));
            }
        }
    }
}

pub(crate) fn rgb(color: plotters::style::RGBColor) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

pub(crate) fn hex_color(hex: &str) -> Color {
    Color::from_str(hex).unwrap_or(Color::Gray)
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // chart + gauge
            Constraint::Length(5), // trend cards
            Constraint::Length(5), // log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            symbol: state.symbol(),
            timeframe: state.timeframe,
            mode: state.mode(),
            candle_count: state.series.len(),
            loading: state.candles_loading || state.status.is_loading(),
        },
        outer[0],
    );

    let main_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(34)])
        .split(outer[1]);

    frame.render_widget(
        PriceChart::new(state.rendered_chart(), state.symbol(), state.timeframe)
            .toggles(&state.toggles)
            .loading(state.candles_loading),
        main_area[0],
    );

    let gauge = state.status.gauge();
    frame.render_widget(GaugePanel::new(gauge.as_ref(), state.mode()), main_area[1]);

    frame.render_widget(TrendCardsPanel::new(&state.status), outer[2]);
    frame.render_widget(LogPanel::new(&state.log_messages), outer[3]);
    frame.render_widget(KeybindBar, outer[4]);
}
