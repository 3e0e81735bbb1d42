use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::event::AppEvent;
use crate::model::timeframe::Timeframe;

use super::request_gate::RequestToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Candles {
        token: RequestToken,
        symbol: String,
        timeframe: Timeframe,
    },
    Prediction {
        token: RequestToken,
        symbol: String,
    },
}

/// Run a fetch in the background and report back over the app channel. The
/// receiver decides whether the result is still wanted.
pub fn spawn(
    request: FetchRequest,
    client: &ApiClient,
    compute_missing_indicators: bool,
    tx: &mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    match request {
        FetchRequest::Candles {
            token,
            symbol,
            timeframe,
        } => spawn_candles(
            client.clone(),
            token,
            symbol,
            timeframe,
            compute_missing_indicators,
            tx.clone(),
        ),
        FetchRequest::Prediction { token, symbol } => {
            spawn_prediction(client.clone(), token, symbol, tx.clone())
        }
    }
}

pub fn spawn_candles(
    client: ApiClient,
    token: RequestToken,
    symbol: String,
    timeframe: Timeframe,
    compute_missing_indicators: bool,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut series = client.fetch_candles(&symbol, timeframe).await;
        if compute_missing_indicators {
            series = series.with_computed_indicators();
        }
        let event = AppEvent::CandlesLoaded {
            token,
            symbol,
            timeframe,
            series,
        };
        if tx.send(event).await.is_err() {
            tracing::debug!(token = token.id(), "App channel closed; dropping candles");
        }
    })
}

pub fn spawn_prediction(
    client: ApiClient,
    token: RequestToken,
    symbol: String,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = client.fetch_prediction(&symbol).await;
        let event = AppEvent::PredictionResolved {
            token,
            symbol,
            result,
        };
        if tx.send(event).await.is_err() {
            tracing::debug!(token = token.id(), "App channel closed; dropping prediction");
        }
    })
}
