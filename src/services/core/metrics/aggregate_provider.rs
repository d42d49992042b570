// Calculated Aggregate Provider - the mandatory base layer of resolution.
//
// Implementations compute a seller's metric vector from real order and
// product records for a timeframe window. The D1-backed implementation
// lives in the infrastructure layer; tests substitute in-memory sources.

use crate::types::{MetricVector, Timeframe};
use crate::utils::ShopResult;

// Worker futures are not Send, so every async seam in this crate opts out
#[async_trait::async_trait(?Send)]
pub trait AggregateSource {
    /// Compute order/product aggregates for the seller within the
    /// timeframe's lookback window (today=1, last7Days=7, last30Days=30,
    /// total=365 days).
    ///
    /// Metrics the storage layer cannot derive cheaply (visitors,
    /// followers, customer count, rating, credit score) come back as
    /// documented defaults pending real instrumentation.
    ///
    /// Read-only; a storage error propagates and the resolution engine
    /// degrades that timeframe rather than failing the whole request.
    async fn compute_aggregate(
        &self,
        seller_id: &str,
        timeframe: Timeframe,
    ) -> ShopResult<MetricVector>;
}
