use crate::pipeline::Analysis;
use crate::report::{Reporter, render, render_header};

/// Prints report lines to stdout. Logs go to stderr, so stdout stays clean.
pub struct TerminalReporter {
    currency: String,
}

impl TerminalReporter {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }
}

impl Reporter for TerminalReporter {
    fn begin(&self, symbol: &str) {
        println!("\n{}", render_header(symbol));
    }

    fn report(&self, analysis: &Analysis) {
        for line in render(analysis, &self.currency) {
            println!("{line}");
        }
        tracing::debug!(
            symbol = %analysis.symbol,
            signal = %analysis.signal,
            "report printed"
        );
    }
}
