use crate::indicator::AugmentedSeries;
use crate::strategy::{Signal, Trend};

/// Price and moving averages read off the last two bars of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverSnapshot {
    pub price: f64,
    pub short_window: usize,
    pub long_window: usize,
    pub today_short: f64,
    pub today_long: f64,
    pub prev_short: f64,
    pub prev_long: f64,
}

impl CrossoverSnapshot {
    /// Returns `None` when the series has fewer than two bars or any of the
    /// four SMA values is undefined.
    pub fn latest(series: &AugmentedSeries) -> Option<Self> {
        let (yesterday, today) = series.last_two()?;
        let windows = series.windows();
        Some(Self {
            price: today.bar.close,
            short_window: windows.short(),
            long_window: windows.long(),
            today_short: today.sma_short?,
            today_long: today.sma_long?,
            prev_short: yesterday.sma_short?,
            prev_long: yesterday.sma_long?,
        })
    }
}

/// Classify the latest bar of `series` as a crossover signal.
///
/// Never fails; missing or short input degrades to one of the two
/// insufficient-data signals.
pub fn classify(series: Option<&AugmentedSeries>) -> Signal {
    let Some(series) = series else {
        return Signal::InsufficientData;
    };

    if series.len() < 2 {
        return Signal::InsufficientDataForCrossover;
    }

    match CrossoverSnapshot::latest(series) {
        Some(snapshot) => classify_snapshot(&snapshot),
        None => Signal::InsufficientData,
    }
}

/// Compare short/long ordering between yesterday and today.
///
/// Equality on either day is neither above nor below, so it never signals a
/// cross, and equality today reports `Downtrend`.
fn classify_snapshot(s: &CrossoverSnapshot) -> Signal {
    if s.prev_short < s.prev_long && s.today_short > s.today_long {
        Signal::Buy
    } else if s.prev_short > s.prev_long && s.today_short < s.today_long {
        Signal::Sell
    } else if s.today_short > s.today_long {
        Signal::Hold(Trend::Uptrend)
    } else {
        Signal::Hold(Trend::Downtrend)
    }
}
