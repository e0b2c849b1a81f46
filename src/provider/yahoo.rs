use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use error_stack::{Report, ResultExt};
use futures::future::BoxFuture;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::model::{LookbackPeriod, PriceBar, PriceSeries};
use crate::provider::DataProvider;

const PROVIDER_NAME: &str = "yahoo";
const DAILY_INTERVAL: &str = "1d";

/// Daily bars from the Yahoo Finance chart endpoint.
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: Url,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl YahooProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, Report<ProviderError>> {
        let client_error = || ProviderError::Client {
            provider: PROVIDER_NAME.into(),
        };

        let base_url = Url::parse(&config.base_url)
            .change_context(client_error())
            .attach_with(|| format!("base_url: {}", config.base_url))?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .change_context(client_error())?;

        let per_second = NonZeroU32::new(config.requests_per_second).ok_or_else(|| {
            Report::new(client_error()).attach("requests_per_second must be > 0")
        })?;

        Ok(Self {
            client,
            base_url,
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
        })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, Report<ProviderError>> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Report::new(ProviderError::Client {
                    provider: PROVIDER_NAME.into(),
                })
                .attach("base_url cannot carry a path")
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch(
        &self,
        symbol: &str,
        period: LookbackPeriod,
    ) -> BoxFuture<'_, Result<PriceSeries, Report<ProviderError>>> {
        let symbol = symbol.to_owned();
        Box::pin(async move {
            self.rate_limiter.until_ready().await;

            let url = self.chart_url(&symbol)?;
            let params = [
                ("range", period.as_str()),
                ("interval", DAILY_INTERVAL),
                ("includePrePost", "false"),
            ];

            let response = self
                .client
                .get(url)
                .query(&params)
                .send()
                .await
                .change_context(ProviderError::Request {
                    provider: PROVIDER_NAME.into(),
                })?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(Report::new(ProviderError::NotFound {
                    provider: PROVIDER_NAME.into(),
                    symbol,
                }));
            }
            if !status.is_success() {
                return Err(Report::new(ProviderError::Request {
                    provider: PROVIDER_NAME.into(),
                })
                .attach(format!("HTTP status: {status}")));
            }

            let envelope: ChartEnvelope =
                response
                    .json()
                    .await
                    .change_context(ProviderError::ResponseParse {
                        provider: PROVIDER_NAME.into(),
                    })?;

            let bars = envelope.into_bars(&symbol)?;
            debug!(symbol = %symbol, period = %period, rows = bars.len(), "yahoo chart decoded");

            Ok(PriceSeries::from_bars(bars))
        })
    }
}

// ── Chart response types ─────────────────────────────────────────────────────

/// `{ "chart": { "result": [ ... ] | null, "error": { ... } | null } }`
#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    /// Absent when the range holds no sessions.
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds; session timestamps are shifted by
    /// it before taking the calendar date.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

/// Column-oriented OHLCV; any cell may be null on halted or partial sessions.
#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

impl ChartEnvelope {
    fn into_bars(self, symbol: &str) -> Result<Vec<PriceBar>, Report<ProviderError>> {
        if let Some(err) = self.chart.error {
            return Err(Report::new(ProviderError::NotFound {
                provider: PROVIDER_NAME.into(),
                symbol: symbol.to_owned(),
            })
            .attach(format!("{}: {}", err.code, err.description)));
        }

        let Some(result) = self.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(Vec::new());
        };

        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
        let offset = result.meta.gmtoffset;

        let bars = result
            .timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let close = price_cell(&quote.close, i)?;
                let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
                Some(PriceBar {
                    date,
                    open: price_cell(&quote.open, i).unwrap_or(close),
                    high: price_cell(&quote.high, i).unwrap_or(close),
                    low: price_cell(&quote.low, i).unwrap_or(close),
                    close,
                    volume: cell(&quote.volume, i).unwrap_or(0),
                })
            })
            .collect();

        Ok(bars)
    }
}

fn cell<T: Copy>(column: &[Option<T>], i: usize) -> Option<T> {
    column.get(i).copied().flatten()
}

/// A price cell, kept only when finite and positive.
fn price_cell(column: &[Option<f64>], i: usize) -> Option<f64> {
    cell(column, i).filter(|v| v.is_finite() && *v > 0.0)
}
