use std::time::Duration;

use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::model::prediction::PredictionSummary;
use crate::model::timeframe::Timeframe;
use crate::normalize::NormalizedSeries;

/// HTTP client for the candle and prediction endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    candles_path: String,
    prediction_path: String,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        candles_path: &str,
        prediction_path: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            candles_path: candles_path.to_string(),
            prediction_path: prediction_path.to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, AppError> {
        Self::new(
            &config.base_url,
            &config.candles_path,
            &config.prediction_path,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Candles for `(symbol, timeframe)`. Never fails: transport errors,
    /// non-2xx responses and malformed bodies all yield an empty series.
    pub async fn fetch_candles(&self, symbol: &str, timeframe: Timeframe) -> NormalizedSeries {
        match self.fetch_records(symbol, timeframe).await {
            Ok(records) => {
                let series = NormalizedSeries::from_records(&records);
                tracing::info!(
                    symbol,
                    timeframe = %timeframe,
                    records = records.len(),
                    count = series.len(),
                    "Fetched candles"
                );
                series
            }
            Err(e) => {
                tracing::warn!(symbol, timeframe = %timeframe, error = %e, "Candle fetch failed; showing empty series");
                NormalizedSeries::default()
            }
        }
    }

    /// Raw `records` array from the candle endpoint.
    pub async fn fetch_records(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Value>, AppError> {
        let url = format!("{}{}", self.base_url, self.candles_path);
        let body = self
            .get_text(&url, &[("symbol", symbol), ("timeframe", timeframe.code())])
            .await?;
        let mut payload: Value = serde_json::from_str(&body)?;
        if let Some(message) = payload.get("message").and_then(Value::as_str) {
            tracing::debug!(symbol, message, "Candle source message");
        }
        match payload.get_mut("records").map(Value::take) {
            Some(Value::Array(records)) => Ok(records),
            _ => {
                tracing::warn!(symbol, "Candle payload has no records array");
                Ok(Vec::new())
            }
        }
    }

    pub async fn fetch_prediction(&self, symbol: &str) -> Result<PredictionSummary, AppError> {
        let url = format!("{}{}", self.base_url, self.prediction_path);
        let body = self.get_text(&url, &[("symbol", symbol)]).await?;
        let summary: PredictionSummary = serde_json::from_str(&body)?;
        tracing::info!(symbol, confidence = ?summary.confidence, "Fetched prediction");
        Ok(summary)
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, AppError> {
        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.text().await?)
    }
}
