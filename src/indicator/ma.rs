use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::{Indicator, close_prices};
use crate::model::PriceBar;

/// Simple Moving Average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Trailing mean of `prices`, one entry per price.
    ///
    /// Entry `i` is `None` until `period` prices exist at or before `i`.
    pub fn calculate_prices(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let warmup = prices.len().min(self.period - 1);
        let mut values = vec![None; warmup];
        values.extend(
            prices
                .windows(self.period)
                .map(|w| Some(w.iter().sum::<f64>() / self.period as f64)),
        );
        values
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        "sma"
    }

    fn required_bars(&self) -> usize {
        self.period
    }

    fn series(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        self.calculate_prices(&close_prices(bars))
    }
}
