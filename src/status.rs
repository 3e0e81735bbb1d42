use std::sync::Arc;

use crate::error::AppError;
use crate::gauge::{compute_gauge, Gauge};
use crate::model::prediction::{Horizon, PredictionSummary, TrendLabel};
use crate::runtime::request_gate::{RequestGate, RequestToken};

#[derive(Debug, Clone, PartialEq)]
pub enum StatusState {
    Idle,
    /// A fetch is in flight; the previous summary stays on screen.
    Loading {
        previous: Option<PredictionSummary>,
    },
    Ready(PredictionSummary),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendCard {
    pub horizon: Horizon,
    pub label: TrendLabel,
    pub icon: &'static str,
    pub color: &'static str,
}

impl TrendCard {
    fn new(horizon: Horizon, label: &TrendLabel) -> Self {
        Self {
            horizon,
            icon: label.icon(),
            color: label.color(),
            label: label.clone(),
        }
    }
}

/// Trend cards plus the confidence gauge, driven by an
/// `idle -> loading -> {ready, failed}` state machine.
#[derive(Debug)]
pub struct TechnicalStatusPanel {
    symbol: Option<String>,
    state: StatusState,
    gate: Arc<RequestGate>,
}

impl Default for TechnicalStatusPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl TechnicalStatusPanel {
    pub fn new() -> Self {
        Self {
            symbol: None,
            state: StatusState::Idle,
            gate: Arc::new(RequestGate::new()),
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn state(&self) -> &StatusState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, StatusState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            StatusState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Start a load for `symbol`. Returns the token the fetch must carry, or
    /// `None` when the symbol has not changed (no refetch, no retry).
    pub fn begin(&mut self, symbol: &str) -> Option<RequestToken> {
        if self.symbol.as_deref() == Some(symbol) {
            return None;
        }
        let previous = self.summary().cloned();
        self.symbol = Some(symbol.to_string());
        self.state = StatusState::Loading { previous };
        let token = self.gate.begin();
        tracing::debug!(symbol, token = token.id(), "Prediction load started");
        Some(token)
    }

    /// Apply a fetch result. Results for superseded tokens are ignored;
    /// returns whether the panel changed.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        result: Result<PredictionSummary, AppError>,
    ) -> bool {
        let Some(result) = self.gate.accept(token, result) else {
            return false;
        };
        self.state = match result {
            Ok(summary) => StatusState::Ready(summary),
            Err(e) => {
                tracing::warn!(symbol = ?self.symbol, error = %e, "Prediction load failed");
                StatusState::Failed(e.to_string())
            }
        };
        true
    }

    /// Summary currently on display, including stale data while loading.
    pub fn summary(&self) -> Option<&PredictionSummary> {
        match &self.state {
            StatusState::Ready(summary) => Some(summary),
            StatusState::Loading { previous } => previous.as_ref(),
            StatusState::Idle | StatusState::Failed(_) => None,
        }
    }

    pub fn cards(&self) -> Vec<TrendCard> {
        let Some(summary) = self.summary() else {
            return Vec::new();
        };
        Horizon::ALL
            .iter()
            .map(|&h| TrendCard::new(h, summary.trend(h)))
            .collect()
    }

    pub fn gauge(&self) -> Option<Gauge> {
        self.summary().map(|s| compute_gauge(s.confidence))
    }
}
