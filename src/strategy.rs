pub mod crossover;

use std::fmt;

/// Direction of the short SMA relative to the long SMA on the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Uptrend,
    Downtrend,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uptrend => write!(f, "Uptrend"),
            Self::Downtrend => write!(f, "Downtrend"),
        }
    }
}

/// Recommendation produced by the crossover classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Golden Cross: short SMA moved from below to above the long SMA.
    Buy,
    /// Death Cross: short SMA moved from above to below the long SMA.
    Sell,
    /// No new crossover on the latest bar.
    Hold(Trend),
    /// No series, or one of the four SMA values needed is undefined.
    InsufficientData,
    /// Fewer than two bars, so there is no "yesterday" to compare against.
    InsufficientDataForCrossover,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY (Golden Cross Signal)"),
            Self::Sell => write!(f, "SELL (Death Cross Signal)"),
            Self::Hold(trend) => write!(f, "HOLD (No new crossover, current: {trend})"),
            Self::InsufficientData => write!(f, "INSUFFICIENT_DATA"),
            Self::InsufficientDataForCrossover => write!(f, "INSUFFICIENT_DATA_FOR_CROSSOVER"),
        }
    }
}
