use super::sma::Sma;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub upper: f64,
    pub mid: f64,
    pub lower: f64,
}

/// Bollinger envelope: rolling mean ± `k` sample standard deviations.
#[derive(Debug, Clone)]
pub struct Bollinger {
    sma: Sma,
    k: f64,
}

impl Bollinger {
    pub fn new(period: usize, k: f64) -> Self {
        assert!(period > 1, "Bollinger period must be > 1");
        Self {
            sma: Sma::new(period),
            k,
        }
    }

    pub fn push(&mut self, close: f64) -> Option<Band> {
        let mid = self.sma.push(close)?;
        let spread = self.sma.sample_std()? * self.k;
        Some(Band {
            upper: mid + spread,
            mid,
            lower: mid - spread,
        })
    }
}
