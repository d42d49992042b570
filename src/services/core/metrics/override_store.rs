// Override Store - admin-authored single-metric values.
//
// One row per (seller, metric, period). Overrides are the highest
// precedence layer in resolution and the user-facing write path for
// individual metrics, so range validation lives here.

use crate::types::{MetricKey, MetricOverride, Timeframe};
use crate::utils::{ShopError, ShopResult};

#[async_trait::async_trait(?Send)]
pub trait OverrideStore {
    /// All overrides for a seller, across every metric and period.
    /// Absent backing storage reads as an empty list, never an error.
    async fn get(&self, seller_id: &str) -> ShopResult<Vec<MetricOverride>>;

    /// Upsert on the (seller_id, metric_key, period) unique key. The row
    /// id is stable across updates; value, original_value and updated_at
    /// move. Values are range-validated before any write.
    async fn upsert(
        &self,
        seller_id: &str,
        metric_key: MetricKey,
        period: Timeframe,
        value: f64,
        original_value: f64,
    ) -> ShopResult<MetricOverride>;

    /// Remove the metric's overrides across ALL periods. Callers that
    /// track no period rely on this one-argument form.
    async fn delete(&self, seller_id: &str, metric_key: MetricKey) -> ShopResult<()>;

    /// Set the metric's override value to zero without deleting the rows.
    /// original_value is untouched. Distinct from delete: a cleared
    /// override still wins resolution, with value 0.
    async fn clear(&self, seller_id: &str, metric_key: MetricKey) -> ShopResult<()>;
}

/// Write-time range validation for override values.
///
/// shopRating must fall in [0, 5], creditScore in [300, 850], and every
/// count/currency metric must be non-negative.
pub fn validate_override_value(metric_key: MetricKey, value: f64) -> ShopResult<()> {
    if !value.is_finite() {
        return Err(ShopError::invalid_field(
            "value",
            format!("{} must be a finite number", metric_key),
        ));
    }

    match metric_key {
        MetricKey::ShopRating => {
            if !(0.0..=5.0).contains(&value) {
                return Err(ShopError::invalid_field(
                    "value",
                    format!("shopRating must be between 0 and 5, got {}", value),
                ));
            }
        }
        MetricKey::CreditScore => {
            if !(300.0..=850.0).contains(&value) {
                return Err(ShopError::invalid_field(
                    "value",
                    format!("creditScore must be between 300 and 850, got {}", value),
                ));
            }
        }
        _ => {
            if value < 0.0 {
                return Err(ShopError::invalid_field(
                    "value",
                    format!("{} must not be negative, got {}", metric_key, value),
                ));
            }
        }
    }

    Ok(())
}
