pub mod yahoo;

use error_stack::Report;
use futures::future::BoxFuture;
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::model::{LookbackPeriod, PriceSeries};

/// Source of historical daily bars.
///
/// Uses `BoxFuture` instead of `async fn` in trait to keep the trait
/// object-safe (`dyn DataProvider`).
pub trait DataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch daily bars for `symbol` covering `period`, oldest first.
    fn fetch(
        &self,
        symbol: &str,
        period: LookbackPeriod,
    ) -> BoxFuture<'_, Result<PriceSeries, Report<ProviderError>>>;
}

/// Why a fetch produced no usable series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Unknown symbol or an empty bar set.
    NoData,
    /// Transport, status or decoding failure, with the provider's message.
    Error(String),
}

/// Fetch bars and collapse every failure mode into a [`FetchFailure`].
///
/// Request errors, unknown symbols and empty results are logged here and never
/// reach the indicator or classifier.
pub async fn fetch_series(
    provider: &dyn DataProvider,
    symbol: &str,
    period: LookbackPeriod,
) -> Result<PriceSeries, FetchFailure> {
    info!(provider = provider.name(), symbol, period = %period, "fetching daily bars");

    match provider.fetch(symbol, period).await {
        Ok(series) if series.is_empty() => {
            warn!(provider = provider.name(), symbol, "no bars returned");
            Err(FetchFailure::NoData)
        }
        Ok(series) => {
            info!(
                provider = provider.name(),
                symbol,
                bars = series.len(),
                "daily bars fetched"
            );
            Ok(series)
        }
        Err(report) => {
            warn!(provider = provider.name(), symbol, error = ?report, "fetch failed");
            match report.current_context() {
                ProviderError::NotFound { .. } => Err(FetchFailure::NoData),
                other => Err(FetchFailure::Error(other.to_string())),
            }
        }
    }
}
