pub mod candle;
pub mod indicator;
pub mod prediction;
pub mod timeframe;
