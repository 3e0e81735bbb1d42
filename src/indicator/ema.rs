use super::sma::Sma;

/// Exponential moving average seeded with the SMA of the first `period`
/// values, so warm-up candles report nothing instead of a biased guess.
#[derive(Debug, Clone)]
pub struct Ema {
    multiplier: f64,
    seed: Sma,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "EMA period must be > 0");
        Self {
            multiplier: 2.0 / (period as f64 + 1.0),
            seed: Sma::new(period),
            value: None,
        }
    }

    pub fn push(&mut self, price: f64) -> Option<f64> {
        self.value = match self.value {
            Some(prev) => Some(prev + (price - prev) * self.multiplier),
            None => self.seed.push(price),
        };
        self.value
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn is_ready(&self) -> bool {
        self.value.is_some()
    }

    pub fn period(&self) -> usize {
        self.seed.period()
    }
}
