use std::fmt;

use chrono::NaiveDate;

/// Lookback window for a historical price request.
///
/// String representations follow the usual financial-period notation
/// (e.g. `"6mo"`, `"2y"`) and match what the data source accepts as `range`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LookbackPeriod {
    Day1,
    Day5,
    Month1,
    Month3,
    Month6,
    Year1,
    #[default]
    Year2,
    Year5,
    Year10,
    YearToDate,
    Max,
}

impl LookbackPeriod {
    /// Parse a period string into a `LookbackPeriod`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1d" => Some(Self::Day1),
            "5d" => Some(Self::Day5),
            "1mo" => Some(Self::Month1),
            "3mo" => Some(Self::Month3),
            "6mo" => Some(Self::Month6),
            "1y" => Some(Self::Year1),
            "2y" => Some(Self::Year2),
            "5y" => Some(Self::Year5),
            "10y" => Some(Self::Year10),
            "ytd" => Some(Self::YearToDate),
            "max" => Some(Self::Max),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day1 => "1d",
            Self::Day5 => "5d",
            Self::Month1 => "1mo",
            Self::Month3 => "3mo",
            Self::Month6 => "6mo",
            Self::Year1 => "1y",
            Self::Year2 => "2y",
            Self::Year5 => "5y",
            Self::Year10 => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One trading day's OHLCV record.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily bars for one symbol, ascending by date with no duplicate dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from bars in any order.
    ///
    /// Bars are sorted by date. When two bars share a date the one that came
    /// later in the input wins, so a trailing intraday bar replaces the
    /// session bar it duplicates.
    pub fn from_bars(mut bars: Vec<PriceBar>) -> Self {
        // stable sort keeps input order among equal dates
        bars.sort_by_key(|b| b.date);

        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self { bars: deduped }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn lookback_period_parses_supported_strings() {
        let periods = [
            ("1d", LookbackPeriod::Day1),
            ("5d", LookbackPeriod::Day5),
            ("1mo", LookbackPeriod::Month1),
            ("3mo", LookbackPeriod::Month3),
            ("6mo", LookbackPeriod::Month6),
            ("1y", LookbackPeriod::Year1),
            ("2y", LookbackPeriod::Year2),
            ("5y", LookbackPeriod::Year5),
            ("10y", LookbackPeriod::Year10),
            ("ytd", LookbackPeriod::YearToDate),
            ("max", LookbackPeriod::Max),
        ];
        for (s, period) in periods {
            assert_eq!(LookbackPeriod::from_str(s), Some(period));
            assert_eq!(period.to_string(), s);
        }
    }

    #[test]
    fn lookback_period_rejects_unknown_strings() {
        assert_eq!(LookbackPeriod::from_str("2w"), None);
        assert_eq!(LookbackPeriod::from_str("2Y"), None);
        assert_eq!(LookbackPeriod::from_str(""), None);
    }

    #[test]
    fn lookback_period_defaults_to_two_years() {
        assert_eq!(LookbackPeriod::default(), LookbackPeriod::Year2);
    }

    #[test]
    fn from_bars_sorts_ascending() {
        let series = PriceSeries::from_bars(vec![
            bar("2024-01-03", 3.0),
            bar("2024-01-01", 1.0),
            bar("2024-01-02", 2.0),
        ]);
        let closes: Vec<f64> = series.bars().iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_bars_keeps_last_bar_for_duplicate_date() {
        let series = PriceSeries::from_bars(vec![
            bar("2024-01-01", 1.0),
            bar("2024-01-02", 2.0),
            bar("2024-01-02", 2.5),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[1].close, 2.5);
    }

    #[test]
    fn empty_series() {
        let series = PriceSeries::from_bars(Vec::new());
        assert!(series.is_empty());
        assert!(series.bars().is_empty());
    }
}
