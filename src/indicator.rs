pub mod ma;

use error_stack::Report;

use crate::error::IndicatorError;
use crate::indicator::ma::Sma;
use crate::model::{PriceBar, PriceSeries};

pub const DEFAULT_SHORT_WINDOW: usize = 20;
pub const DEFAULT_LONG_WINDOW: usize = 50;

/// A technical analysis indicator that operates on a slice of bars.
///
/// Bars must be in ascending chronological order (oldest first).
pub trait Indicator: Send {
    /// Unique name of this indicator (e.g., "sma").
    fn name(&self) -> &str;

    /// Minimum number of bars required to produce at least one defined value.
    fn required_bars(&self) -> usize;

    /// Calculate one value per input bar; `None` where the lookback is not yet
    /// filled.
    fn series(&self, bars: &[PriceBar]) -> Vec<Option<f64>>;
}

/// Extract close prices from a slice of bars.
pub fn close_prices(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Short and long moving-average windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaWindows {
    short: Sma,
    long: Sma,
}

impl SmaWindows {
    pub fn new(short: usize, long: usize) -> Result<Self, Report<IndicatorError>> {
        Ok(Self {
            short: Sma::new(short)?,
            long: Sma::new(long)?,
        })
    }

    pub fn short(&self) -> usize {
        self.short.period()
    }

    pub fn long(&self) -> usize {
        self.long.period()
    }
}

impl Default for SmaWindows {
    fn default() -> Self {
        Self {
            short: Sma::new(DEFAULT_SHORT_WINDOW).expect("default short window is non-zero"),
            long: Sma::new(DEFAULT_LONG_WINDOW).expect("default long window is non-zero"),
        }
    }
}

/// View of one bar together with its derived moving averages.
#[derive(Debug, Clone, Copy)]
pub struct AugmentedBar<'a> {
    pub bar: &'a PriceBar,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
}

/// A price series with the short and long SMA attached to every bar.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedSeries {
    series: PriceSeries,
    windows: SmaWindows,
    sma_short: Vec<Option<f64>>,
    sma_long: Vec<Option<f64>>,
}

impl AugmentedSeries {
    pub fn windows(&self) -> SmaWindows {
        self.windows
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn get(&self, index: usize) -> Option<AugmentedBar<'_>> {
        let bar = self.series.bars().get(index)?;
        Some(AugmentedBar {
            bar,
            sma_short: self.sma_short[index],
            sma_long: self.sma_long[index],
        })
    }

    /// The second-to-last and last bars, when the series has at least two.
    pub fn last_two(&self) -> Option<(AugmentedBar<'_>, AugmentedBar<'_>)> {
        let n = self.len();
        if n < 2 {
            return None;
        }
        Some((self.get(n - 2)?, self.get(n - 1)?))
    }

    #[cfg(test)]
    pub(crate) fn from_columns(
        series: PriceSeries,
        sma_short: Vec<Option<f64>>,
        sma_long: Vec<Option<f64>>,
    ) -> Self {
        assert_eq!(series.len(), sma_short.len());
        assert_eq!(series.len(), sma_long.len());
        Self {
            series,
            windows: SmaWindows::default(),
            sma_short,
            sma_long,
        }
    }
}

/// Attach the short and long SMA of closing prices to every bar.
///
/// Never fails: a series shorter than a window simply leaves that column
/// undefined everywhere, and the caller decides what that means.
pub fn compute_sma(series: &PriceSeries, windows: SmaWindows) -> AugmentedSeries {
    let bars = series.bars();
    let sma_short = windows.short.series(bars);
    let sma_long = windows.long.series(bars);

    tracing::debug!(
        indicator = windows.short.name(),
        bars = bars.len(),
        short_window = windows.short(),
        long_window = windows.long(),
        short_required = windows.short.required_bars(),
        long_required = windows.long.required_bars(),
        "moving averages computed"
    );

    AugmentedSeries {
        series: series.clone(),
        windows,
        sma_short,
        sma_long,
    }
}
