use std::collections::VecDeque;

/// Rolling simple moving average over the last `period` values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self {
            period,
            window: VecDeque::with_capacity(period),
            sum: 0.0,
        }
    }

    /// Push a value; yields the mean once the window is full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.window.len() == self.period {
            if let Some(evicted) = self.window.pop_front() {
                self.sum -= evicted;
            }
        }
        self.window.push_back(value);
        self.sum += value;
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        self.is_ready().then(|| self.sum / self.period as f64)
    }

    /// Sample standard deviation (n - 1) of the full window.
    pub fn sample_std(&self) -> Option<f64> {
        if !self.is_ready() || self.period < 2 {
            return None;
        }
        let mean = self.sum / self.period as f64;
        let ss: f64 = self.window.iter().map(|v| (v - mean).powi(2)).sum();
        Some((ss / (self.period - 1) as f64).sqrt())
    }

    pub fn is_ready(&self) -> bool {
        self.window.len() == self.period
    }

    pub fn period(&self) -> usize {
        self.period
    }
}
