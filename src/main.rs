mod config;
mod error;
mod indicator;
mod model;
mod pipeline;
mod provider;
mod report;
mod strategy;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use derive_more::{Display, Error};
use error_stack::{Report, ResultExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use indicator::SmaWindows;
use model::LookbackPeriod;
use pipeline::{analyze, normalize_symbol};
use provider::DataProvider;
use provider::yahoo::YahooProvider;
use report::Reporter;
use report::terminal::TerminalReporter;

const PROMPT: &str = "Enter ticker symbol (or 'q' to quit): ";
const QUIT: &str = "Q";

#[derive(Debug, Display, Error)]
pub enum AppError {
    #[display("configuration error")]
    Config,
    #[display("data provider error")]
    Provider,
    #[display("runtime error")]
    Runtime,
}

#[derive(Parser)]
#[command(
    name = "sma-crossover",
    about = "Moving-average crossover signal for ticker symbols"
)]
struct Cli {
    /// Ticker symbols to analyse once and exit; omit for interactive mode
    symbols: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lookback period, e.g. 6mo, 1y, 2y
    #[arg(short, long)]
    period: Option<String>,

    /// Short moving-average window in days
    #[arg(long)]
    short_window: Option<usize>,

    /// Long moving-average window in days
    #[arg(long)]
    long_window: Option<usize>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(period) = &self.period {
            config.strategy.period = period.clone();
        }
        if let Some(short) = self.short_window {
            config.strategy.short_window = short;
        }
        if let Some(long) = self.long_window {
            config.strategy.long_window = long;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(report) = run().await {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Report<AppError>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load(path).change_context(AppError::Config)?,
        None => AppConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config::validate(&config).change_context(AppError::Config)?;

    init_tracing(&config);

    let period = config.strategy.lookback().change_context(AppError::Config)?;
    let windows = config.strategy.windows().change_context(AppError::Config)?;
    let provider = YahooProvider::new(&config.provider).change_context(AppError::Provider)?;
    let reporter = TerminalReporter::new(config.strategy.currency.as_str());

    info!(
        period = %period,
        short_window = windows.short(),
        long_window = windows.long(),
        "sma-crossover ready"
    );

    if cli.symbols.is_empty() {
        let stdin = BufReader::new(tokio::io::stdin());
        interactive_loop(&provider, &reporter, period, windows, stdin, std::io::stdout()).await
    } else {
        for symbol in &cli.symbols {
            analyze_and_report(&provider, &reporter, symbol, period, windows).await;
        }
        Ok(())
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    match config.general.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Prompt on `output` for symbols read from `input` until the user quits or
/// the input ends.
async fn interactive_loop(
    provider: &dyn DataProvider,
    reporter: &dyn Reporter,
    period: LookbackPeriod,
    windows: SmaWindows,
    input: impl AsyncBufRead + Unpin,
    mut output: impl Write,
) -> Result<(), Report<AppError>> {
    let mut lines = input.lines();

    loop {
        write!(output, "\n{PROMPT}").change_context(AppError::Runtime)?;
        output.flush().change_context(AppError::Runtime)?;

        let Some(line) = lines.next_line().await.change_context(AppError::Runtime)? else {
            info!("input closed, exiting");
            break;
        };

        let symbol = normalize_symbol(&line);
        if symbol.is_empty() {
            continue;
        }
        if symbol == QUIT {
            break;
        }

        analyze_and_report(provider, reporter, &symbol, period, windows).await;
    }

    Ok(())
}

async fn analyze_and_report(
    provider: &dyn DataProvider,
    reporter: &dyn Reporter,
    symbol: &str,
    period: LookbackPeriod,
    windows: SmaWindows,
) {
    reporter.begin(&normalize_symbol(symbol));
    let analysis = analyze(provider, symbol, period, windows).await;
    reporter.report(&analysis);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::pipeline::Analysis;
    use crate::provider::testing::StaticProvider;
    use crate::report::render_header;
    use crate::strategy::Signal;

    #[test]
    fn cli_overrides_replace_config_values() {
        let cli = Cli::parse_from([
            "sma-crossover",
            "--period",
            "6mo",
            "--short-window",
            "10",
            "--long-window",
            "30",
            "aapl",
            "msft",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(cli.symbols, vec!["aapl", "msft"]);
        assert_eq!(config.strategy.period, "6mo");
        assert_eq!(config.strategy.short_window, 10);
        assert_eq!(config.strategy.long_window, 30);
        assert!(config::validate(&config).is_ok());
    }

    #[test]
    fn cli_without_overrides_keeps_defaults() {
        let cli = Cli::parse_from(["sma-crossover"]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert!(cli.symbols.is_empty());
        assert!(cli.config.is_none());
        assert_eq!(config.strategy.period, "2y");
        assert_eq!(config.strategy.short_window, 20);
        assert_eq!(config.strategy.long_window, 50);
    }

    #[test]
    fn invalid_cli_period_fails_validation() {
        let cli = Cli::parse_from(["sma-crossover", "-p", "forever"]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert!(config::validate(&config).is_err());
    }

    /// Records everything the driver hands to the reporter.
    #[derive(Default)]
    struct CapturingReporter {
        headers: Mutex<Vec<String>>,
        analyses: Mutex<Vec<Analysis>>,
    }

    impl Reporter for CapturingReporter {
        fn begin(&self, symbol: &str) {
            self.headers.lock().unwrap().push(render_header(symbol));
        }

        fn report(&self, analysis: &Analysis) {
            self.analyses.lock().unwrap().push(analysis.clone());
        }
    }

    async fn drive(input: &str, reporter: &CapturingReporter) -> String {
        let provider = StaticProvider::with_closes(vec![10.0, 10.0, 10.0, 9.0, 12.0]);
        let windows = SmaWindows::new(2, 3).unwrap();
        let mut output = Vec::new();

        interactive_loop(
            &provider,
            reporter,
            LookbackPeriod::Year2,
            windows,
            input.as_bytes(),
            &mut output,
        )
        .await
        .unwrap();

        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn interactive_skips_blank_lines_and_quits() {
        let reporter = CapturingReporter::default();
        let output = drive("aapl\n\nq\n", &reporter).await;

        let analyses = reporter.analyses.lock().unwrap();
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].symbol, "AAPL");
        assert_eq!(analyses[0].signal, Signal::Buy);
        assert_eq!(
            *reporter.headers.lock().unwrap(),
            vec!["--- Analyzing AAPL ---"]
        );
        assert_eq!(output.matches(PROMPT).count(), 3);
    }

    #[tokio::test]
    async fn interactive_stops_at_end_of_input() {
        let reporter = CapturingReporter::default();
        let output = drive("  msft \n", &reporter).await;

        let analyses = reporter.analyses.lock().unwrap();
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].symbol, "MSFT");
        assert_eq!(output.matches(PROMPT).count(), 2);
    }

    #[tokio::test]
    async fn interactive_quit_without_newline() {
        let reporter = CapturingReporter::default();
        drive("Q", &reporter).await;

        assert!(reporter.analyses.lock().unwrap().is_empty());
        assert!(reporter.headers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_shot_reports_header_then_analysis() {
        let provider = StaticProvider::unavailable();
        let reporter = CapturingReporter::default();

        analyze_and_report(
            &provider,
            &reporter,
            " tsla",
            LookbackPeriod::Year2,
            SmaWindows::default(),
        )
        .await;

        assert_eq!(
            *reporter.headers.lock().unwrap(),
            vec!["--- Analyzing TSLA ---"]
        );
        let analyses = reporter.analyses.lock().unwrap();
        assert_eq!(analyses[0].symbol, "TSLA");
        assert!(analyses[0].fetch_failure.is_some());
    }
}
