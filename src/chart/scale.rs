/// Continuous domain → pixel mapping. Ranges may be inverted (SVG y grows
/// downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// A zero-width domain is widened so the scale never divides by zero.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (mut lo, mut hi) = domain;
        if hi < lo {
            std::mem::swap(&mut lo, &mut hi);
        }
        if hi - lo < f64::EPSILON {
            let pad = (lo.abs() * 0.01).max(1.0);
            lo -= pad;
            hi += pad;
        }
        Self {
            domain: (lo, hi),
            range,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (r1 - r0).abs() < f64::EPSILON {
            return d0;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }

    /// `count` evenly spaced values across the domain, ends included.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        match count {
            0 => Vec::new(),
            1 => vec![d0],
            n => (0..n)
                .map(|i| d0 + (d1 - d0) * i as f64 / (n - 1) as f64)
                .collect(),
        }
    }
}

/// Discrete slots laid out left to right, one per candle. Time gaps
/// (weekends, holidays) do not take space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    start: f64,
    end: f64,
    padding: f64,
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64)) -> Self {
        Self {
            count,
            start: range.0,
            end: range.1,
            padding: 0.2,
        }
    }

    pub fn step(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.end - self.start) / self.count as f64
    }

    /// Candle body width inside one slot.
    pub fn bandwidth(&self) -> f64 {
        (self.step() * (1.0 - self.padding)).max(1.0)
    }

    pub fn center(&self, index: usize) -> f64 {
        self.start + self.step() * (index as f64 + 0.5)
    }

    /// Slot nearest to a pixel, clamped to the series.
    pub fn nearest(&self, px: f64) -> Option<usize> {
        if self.count == 0 || self.step() <= 0.0 {
            return None;
        }
        let raw = ((px - self.start) / self.step()).floor();
        Some(raw.clamp(0.0, (self.count - 1) as f64) as usize)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.start, self.end)
    }
}
