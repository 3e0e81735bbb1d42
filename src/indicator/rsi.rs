use super::sma::Sma;

/// Relative strength index from simple rolling means of gains and losses.
#[derive(Debug, Clone)]
pub struct Rsi {
    gains: Sma,
    losses: Sma,
    prev: Option<f64>,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "RSI period must be > 0");
        Self {
            gains: Sma::new(period),
            losses: Sma::new(period),
            prev: None,
        }
    }

    /// Push a close; yields a value in [0, 100] once `period` deltas exist.
    pub fn push(&mut self, close: f64) -> Option<f64> {
        let prev = self.prev.replace(close)?;
        let delta = close - prev;
        let gain = self.gains.push(delta.max(0.0));
        let loss = self.losses.push((-delta).max(0.0));
        let (gain, loss) = (gain?, loss?);
        Some(if loss == 0.0 {
            if gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        })
    }
}
