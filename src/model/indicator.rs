use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// An indicator the user can switch on or off above the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum Indicator {
    #[serde(rename = "EMA12")]
    Ema12,
    #[serde(rename = "EMA26")]
    Ema26,
    #[serde(rename = "BB")]
    Bb,
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "VOLUME")]
    Volume,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::Ema12,
        Indicator::Ema26,
        Indicator::Bb,
        Indicator::Rsi,
        Indicator::Volume,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Indicator::Ema12 => "EMA12",
            Indicator::Ema26 => "EMA26",
            Indicator::Bb => "BB",
            Indicator::Rsi => "RSI",
            Indicator::Volume => "VOLUME",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_uppercase();
        Indicator::ALL
            .into_iter()
            .find(|ind| ind.label() == label)
            .ok_or_else(|| format!("unknown indicator '{}'", s))
    }
}

/// Currently selected indicators. Ordered, so iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorToggles(BTreeSet<Indicator>);

impl Default for IndicatorToggles {
    fn default() -> Self {
        Self::from_iter([Indicator::Ema12, Indicator::Ema26])
    }
}

impl IndicatorToggles {
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Build from the chart's `selectedTrends` string surface. Unknown labels
    /// are ignored.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut set = BTreeSet::new();
        for label in labels {
            match label.as_ref().parse::<Indicator>() {
                Ok(ind) => {
                    set.insert(ind);
                }
                Err(e) => tracing::debug!(error = %e, "Ignoring indicator toggle"),
            }
        }
        Self(set)
    }

    pub fn contains(&self, indicator: Indicator) -> bool {
        self.0.contains(&indicator)
    }

    /// Flip membership; returns whether the indicator is now active.
    pub fn toggle(&mut self, indicator: Indicator) -> bool {
        if !self.0.remove(&indicator) {
            self.0.insert(indicator);
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Indicator> + '_ {
        self.0.iter().copied()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.iter().map(Indicator::label).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Indicator> for IndicatorToggles {
    fn from_iter<I: IntoIterator<Item = Indicator>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
