pub mod terminal;

use crate::pipeline::Analysis;
use crate::provider::FetchFailure;

/// Sink for per-symbol analysis output.
pub trait Reporter: Send + Sync {
    /// Called with the normalized symbol before its data is fetched.
    fn begin(&self, symbol: &str);

    fn report(&self, analysis: &Analysis);
}

/// Banner announcing the symbol about to be analysed.
pub fn render_header(symbol: &str) -> String {
    format!("--- Analyzing {symbol} ---")
}

/// Render an analysis as the plain-text lines shown to the user.
///
/// Prices are printed with two decimals behind `currency`. A failed fetch
/// yields a single line and no recommendation.
pub fn render(analysis: &Analysis, currency: &str) -> Vec<String> {
    match &analysis.fetch_failure {
        Some(FetchFailure::NoData) => {
            return vec![format!("No data found for {}", analysis.symbol)];
        }
        Some(FetchFailure::Error(reason)) => {
            return vec![format!("Error fetching data: {reason}")];
        }
        None => {}
    }

    let mut lines = Vec::with_capacity(4);
    if let Some(s) = &analysis.snapshot {
        lines.push(format!("Current Price: {currency}{:.2}", s.price));
        lines.push(format!(
            "SMA {}: {currency}{:.2} (Prev: {currency}{:.2})",
            s.short_window, s.today_short, s.prev_short
        ));
        lines.push(format!(
            "SMA {}: {currency}{:.2} (Prev: {currency}{:.2})",
            s.long_window, s.today_long, s.prev_long
        ));
    }
    lines.push(format!(
        "Recommendation for {}: {}",
        analysis.symbol, analysis.signal
    ));
    lines
}
