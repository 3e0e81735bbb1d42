use std::path::PathBuf;

use crate::error::AppError;
use crate::model::prediction::PredictionSummary;
use crate::model::timeframe::Timeframe;
use crate::normalize::NormalizedSeries;
use crate::runtime::request_gate::RequestToken;

#[derive(Debug)]
pub enum AppEvent {
    CandlesLoaded {
        token: RequestToken,
        symbol: String,
        timeframe: Timeframe,
        series: NormalizedSeries,
    },
    PredictionResolved {
        token: RequestToken,
        symbol: String,
        result: Result<PredictionSummary, AppError>,
    },
    ExportWritten(Vec<PathBuf>),
    LogMessage(String),
    Error(String),
}
