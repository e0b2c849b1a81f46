use tracing::info;

use crate::indicator::{SmaWindows, compute_sma};
use crate::model::LookbackPeriod;
use crate::provider::{DataProvider, FetchFailure, fetch_series};
use crate::strategy::Signal;
use crate::strategy::crossover::{CrossoverSnapshot, classify};

/// Outcome of one fetch → transform → classify run.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub symbol: String,
    /// Set when the provider returned nothing usable.
    pub fetch_failure: Option<FetchFailure>,
    pub signal: Signal,
    /// Present only when all four SMA values on the last two bars are defined.
    pub snapshot: Option<CrossoverSnapshot>,
}

/// Trim and upper-case a user-entered ticker.
pub fn normalize_symbol(input: &str) -> String {
    input.trim().to_uppercase()
}

pub async fn analyze(
    provider: &dyn DataProvider,
    symbol: &str,
    period: LookbackPeriod,
    windows: SmaWindows,
) -> Analysis {
    let symbol = normalize_symbol(symbol);

    let series = match fetch_series(provider, &symbol, period).await {
        Ok(series) => series,
        Err(failure) => {
            return Analysis {
                symbol,
                fetch_failure: Some(failure),
                signal: classify(None),
                snapshot: None,
            };
        }
    };

    let augmented = compute_sma(&series, windows);
    let signal = classify(Some(&augmented));
    let snapshot = CrossoverSnapshot::latest(&augmented);

    info!(
        symbol = %symbol,
        bars = series.len(),
        signal = %signal,
        "crossover classified"
    );

    Analysis {
        symbol,
        fetch_failure: None,
        signal,
        snapshot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::StaticProvider;
    use crate::strategy::Trend;

    fn windows(short: usize, long: usize) -> SmaWindows {
        SmaWindows::new(short, long).unwrap()
    }

    #[test]
    fn normalize_symbol_upper_cases_and_trims() {
        assert_eq!(normalize_symbol("  aapl\n"), "AAPL");
        assert_eq!(normalize_symbol("brk-b"), "BRK-B");
    }

    #[tokio::test]
    async fn unknown_symbol_reports_no_data() {
        let provider = StaticProvider::failing();
        let analysis = analyze(&provider, "nope", LookbackPeriod::Year2, windows(2, 3)).await;

        assert_eq!(analysis.symbol, "NOPE");
        assert_eq!(analysis.fetch_failure, Some(FetchFailure::NoData));
        assert_eq!(analysis.signal, Signal::InsufficientData);
        assert!(analysis.snapshot.is_none());
    }

    #[tokio::test]
    async fn request_failure_carries_reason() {
        let provider = StaticProvider::unavailable();
        let analysis = analyze(&provider, "aapl", LookbackPeriod::Year2, windows(2, 3)).await;

        assert_eq!(
            analysis.fetch_failure,
            Some(FetchFailure::Error("request to static failed".into()))
        );
        assert_eq!(analysis.signal, Signal::InsufficientData);
        assert!(analysis.snapshot.is_none());
    }

    #[tokio::test]
    async fn short_history_is_insufficient_data() {
        let provider = StaticProvider::with_closes(vec![10.0; 30]);
        let analysis = analyze(&provider, "aapl", LookbackPeriod::Year2, SmaWindows::default()).await;

        assert!(analysis.fetch_failure.is_none());
        assert_eq!(analysis.signal, Signal::InsufficientData);
        assert!(analysis.snapshot.is_none());
    }

    #[tokio::test]
    async fn single_bar_is_insufficient_for_crossover() {
        let provider = StaticProvider::with_closes(vec![10.0]);
        let analysis = analyze(&provider, "aapl", LookbackPeriod::Day1, windows(1, 2)).await;

        assert_eq!(analysis.signal, Signal::InsufficientDataForCrossover);
    }

    #[tokio::test]
    async fn price_jump_produces_golden_cross() {
        // short(2) vs long(3) over closes: ... 10, 10, 10, 9, 12
        // yesterday: short 9.5 < long 9.667; today: short 10.5 > long 10.333
        let provider = StaticProvider::with_closes(vec![10.0, 10.0, 10.0, 9.0, 12.0]);
        let analysis = analyze(&provider, "msft", LookbackPeriod::Year2, windows(2, 3)).await;

        assert_eq!(analysis.signal, Signal::Buy);
        let snapshot = analysis.snapshot.unwrap();
        assert_eq!(snapshot.price, 12.0);
        assert_eq!(snapshot.today_short, 10.5);
        assert_eq!(snapshot.prev_short, 9.5);
    }

    #[tokio::test]
    async fn price_drop_produces_death_cross() {
        let provider = StaticProvider::with_closes(vec![10.0, 10.0, 10.0, 11.0, 8.0]);
        let analysis = analyze(&provider, "msft", LookbackPeriod::Year2, windows(2, 3)).await;

        assert_eq!(analysis.signal, Signal::Sell);
    }

    #[tokio::test]
    async fn steady_rise_holds_uptrend() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let provider = StaticProvider::with_closes(closes);
        let analysis = analyze(&provider, "msft", LookbackPeriod::Year2, windows(2, 4)).await;

        assert_eq!(analysis.signal, Signal::Hold(Trend::Uptrend));
    }

    #[tokio::test]
    async fn flat_prices_hold_downtrend() {
        let provider = StaticProvider::with_closes(vec![50.0; 60]);
        let analysis = analyze(&provider, "flat", LookbackPeriod::Year2, SmaWindows::default()).await;

        assert_eq!(analysis.signal, Signal::Hold(Trend::Downtrend));
    }
}
