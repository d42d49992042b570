// Resolution Engine - merges the three metric layers into one view per
// timeframe.
//
// Precedence (total order, enforced for every caller):
//   override > synthetic snapshot > legacy blob > calculated > default
//
// The engine is a pure read-side merge: it never persists anything, and a
// failure in any optional layer degrades that layer to "absent" instead of
// failing the request. Only the mandatory calculated-aggregate layer
// produces a visible error marker, and only for the timeframe it failed on.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::types::{
    MetricOverride, MetricVector, ResolutionOutcome, ResolvedMetricsView, Timeframe,
};
use crate::utils::EngineConfig;
use crate::{log_debug, log_warn};

use super::aggregate_provider::AggregateSource;
use super::legacy_blob::LegacyBlobStore;
use super::override_store::OverrideStore;
use super::snapshot_store::SnapshotStore;

pub struct MetricsResolver {
    aggregates: Arc<dyn AggregateSource>,
    snapshots: Arc<dyn SnapshotStore>,
    overrides: Arc<dyn OverrideStore>,
    legacy: Arc<dyn LegacyBlobStore>,
    config: EngineConfig,
}

impl MetricsResolver {
    pub fn new(
        aggregates: Arc<dyn AggregateSource>,
        snapshots: Arc<dyn SnapshotStore>,
        overrides: Arc<dyn OverrideStore>,
        legacy: Arc<dyn LegacyBlobStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            aggregates,
            snapshots,
            overrides,
            legacy,
            config,
        }
    }

    /// Resolve the seller's metrics for each requested timeframe.
    ///
    /// Every requested timeframe gets a view. Timeframes whose aggregate
    /// computation failed resolve from defaults, are flagged `degraded`,
    /// and carry an error marker in the outcome; other timeframes are
    /// unaffected. Duplicate timeframes in the request are collapsed.
    pub async fn resolve(&self, seller_id: &str, timeframes: &[Timeframe]) -> ResolutionOutcome {
        let requested = dedupe(timeframes);
        let mut outcome = ResolutionOutcome::default();
        if requested.is_empty() {
            return outcome;
        }

        // One lookup per layer; per-timeframe slices are taken in memory.
        let snapshot_by_tf = self.fetch_snapshots(seller_id).await;
        let legacy_vector = if snapshot_by_tf.is_empty() {
            // Whole-seller fallback: consulted only when no modern
            // synthetic data exists for any timeframe.
            self.fetch_legacy_vector(seller_id).await
        } else {
            None
        };
        let overrides_by_period = self.fetch_overrides(seller_id).await;

        // Aggregates are independent per timeframe; bound the fan-out so a
        // many-timeframe admin view does not overwhelm storage.
        let aggregate_results: Vec<_> = stream::iter(requested.iter().copied())
            .map(|tf| {
                let aggregates = self.aggregates.clone();
                let seller = seller_id.to_string();
                async move { (tf, aggregates.compute_aggregate(&seller, tf).await) }
            })
            .buffer_unordered(self.config.resolve_concurrency.max(1))
            .collect()
            .await;

        for (timeframe, aggregate) in aggregate_results {
            let mut view = ResolvedMetricsView::new();

            // Step 1: mandatory base layer
            let mut base = match aggregate {
                Ok(vector) => vector,
                Err(e) => {
                    log_warn!(
                        "Aggregate layer failed, resolving timeframe from defaults",
                        serde_json::json!({
                            "seller_id": seller_id,
                            "timeframe": timeframe.as_str(),
                            "error": e.to_string(),
                        })
                    );
                    view.degraded = true;
                    outcome.errors.insert(timeframe, e.to_string());
                    MetricVector::new()
                }
            };

            // Step 2: synthetic snapshot replaces the keys it carries
            if let Some(snapshot_vector) = snapshot_by_tf.get(&timeframe) {
                base.merge_from(snapshot_vector);
                view.used_synthetic = true;
            } else if let Some(ref legacy) = legacy_vector {
                // Step 3: legacy blob replaces the base entirely
                base = legacy.clone();
                view.used_legacy_blob = true;
            }

            // Step 4: overrides win regardless of the layers above
            if let Some(overrides) = overrides_by_period.get(&timeframe) {
                for ov in overrides {
                    base.set(ov.metric_key, ov.value);
                    view.used_override_keys.insert(ov.metric_key);
                }
            }

            // Step 5: default-fill whatever no layer supplied
            base.fill_defaults();

            view.vector = base;
            outcome.views.insert(timeframe, view);
        }

        log_debug!(
            "Resolved seller metrics",
            serde_json::json!({
                "seller_id": seller_id,
                "timeframes": requested.len(),
                "degraded": outcome.errors.len(),
            })
        );

        outcome
    }

    async fn fetch_snapshots(&self, seller_id: &str) -> HashMap<Timeframe, MetricVector> {
        match self.snapshots.get_all(seller_id).await {
            Ok(snapshots) => snapshots
                .into_iter()
                .map(|s| (s.timeframe, s.vector))
                .collect(),
            Err(e) => {
                // Optional layer: degrade silently to absent
                log_warn!(
                    "Snapshot layer unavailable, continuing without it",
                    serde_json::json!({ "seller_id": seller_id, "error": e.to_string() })
                );
                HashMap::new()
            }
        }
    }

    async fn fetch_legacy_vector(&self, seller_id: &str) -> Option<MetricVector> {
        match self.legacy.read(seller_id).await {
            Ok((vector, _)) => vector,
            Err(e) => {
                log_warn!(
                    "Legacy blob layer unavailable, continuing without it",
                    serde_json::json!({ "seller_id": seller_id, "error": e.to_string() })
                );
                None
            }
        }
    }

    async fn fetch_overrides(&self, seller_id: &str) -> HashMap<Timeframe, Vec<MetricOverride>> {
        let overrides = match self.overrides.get(seller_id).await {
            Ok(rows) => rows,
            Err(e) => {
                log_warn!(
                    "Override layer unavailable, continuing without it",
                    serde_json::json!({ "seller_id": seller_id, "error": e.to_string() })
                );
                Vec::new()
            }
        };

        let mut by_period: HashMap<Timeframe, Vec<MetricOverride>> = HashMap::new();
        for ov in overrides {
            by_period.entry(ov.period).or_default().push(ov);
        }
        by_period
    }
}

fn dedupe(timeframes: &[Timeframe]) -> Vec<Timeframe> {
    let mut seen = Vec::with_capacity(timeframes.len());
    for tf in timeframes {
        if !seen.contains(tf) {
            seen.push(*tf);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_preserves_order() {
        let input = [
            Timeframe::Total,
            Timeframe::Today,
            Timeframe::Total,
            Timeframe::Today,
        ];
        assert_eq!(dedupe(&input), vec![Timeframe::Total, Timeframe::Today]);
    }
}
