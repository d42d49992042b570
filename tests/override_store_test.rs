// Override store semantics: idempotent upsert, range validation, and the
// delete/clear distinction.

mod common;

use common::InMemoryOverrideStore;
use shop_edge::services::core::metrics::OverrideStore;
use shop_edge::types::{MetricKey, Timeframe};
use shop_edge::utils::ErrorKind;

const SELLER: &str = "seller-1";

#[tokio::test]
async fn upsert_is_idempotent_on_the_unique_key() {
    let store = InMemoryOverrideStore::new();

    let first = store
        .upsert(SELLER, MetricKey::OrdersSold, Timeframe::Today, 10.0, 3.0)
        .await
        .unwrap();
    let second = store
        .upsert(SELLER, MetricKey::OrdersSold, Timeframe::Today, 25.0, 10.0)
        .await
        .unwrap();

    // Same row updated in place, not a new one
    assert_eq!(first.id, second.id);
    assert_eq!(second.value, 25.0);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(store.rows().len(), 1);
}

#[tokio::test]
async fn distinct_periods_are_distinct_rows() {
    let store = InMemoryOverrideStore::new();

    store
        .upsert(SELLER, MetricKey::OrdersSold, Timeframe::Today, 10.0, 0.0)
        .await
        .unwrap();
    store
        .upsert(SELLER, MetricKey::OrdersSold, Timeframe::Total, 300.0, 0.0)
        .await
        .unwrap();

    assert_eq!(store.rows().len(), 2);
}

#[tokio::test]
async fn shop_rating_range_is_enforced_on_write() {
    let store = InMemoryOverrideStore::new();

    let err = store
        .upsert(SELLER, MetricKey::ShopRating, Timeframe::Today, 5.1, 4.5)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ValidationError);
    assert!(store.rows().is_empty());

    store
        .upsert(SELLER, MetricKey::ShopRating, Timeframe::Today, 4.999, 4.5)
        .await
        .unwrap();
}

#[tokio::test]
async fn credit_score_range_is_enforced_on_write() {
    let store = InMemoryOverrideStore::new();

    assert!(store
        .upsert(SELLER, MetricKey::CreditScore, Timeframe::Today, 299.0, 750.0)
        .await
        .is_err());
    assert!(store
        .upsert(SELLER, MetricKey::CreditScore, Timeframe::Today, 851.0, 750.0)
        .await
        .is_err());
    assert!(store
        .upsert(SELLER, MetricKey::CreditScore, Timeframe::Today, 850.0, 750.0)
        .await
        .is_ok());
}

#[tokio::test]
async fn counts_reject_negative_values() {
    let store = InMemoryOverrideStore::new();
    assert!(store
        .upsert(SELLER, MetricKey::TotalSales, Timeframe::Today, -1.0, 0.0)
        .await
        .is_err());
}

#[tokio::test]
async fn clear_zeroes_values_but_keeps_rows() {
    let store = InMemoryOverrideStore::new();

    store
        .upsert(SELLER, MetricKey::OrdersSold, Timeframe::Today, 10.0, 3.0)
        .await
        .unwrap();
    store
        .upsert(SELLER, MetricKey::OrdersSold, Timeframe::Total, 300.0, 120.0)
        .await
        .unwrap();

    store.clear(SELLER, MetricKey::OrdersSold).await.unwrap();

    let rows = store.rows();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row.value, 0.0);
        // Audit context survives the clear
        assert!(row.original_value > 0.0);
    }
}

#[tokio::test]
async fn delete_removes_the_metric_across_all_periods() {
    let store = InMemoryOverrideStore::new();

    store
        .upsert(SELLER, MetricKey::OrdersSold, Timeframe::Today, 10.0, 0.0)
        .await
        .unwrap();
    store
        .upsert(SELLER, MetricKey::OrdersSold, Timeframe::Total, 300.0, 0.0)
        .await
        .unwrap();
    store
        .upsert(SELLER, MetricKey::TotalSales, Timeframe::Today, 99.0, 0.0)
        .await
        .unwrap();

    store.delete(SELLER, MetricKey::OrdersSold).await.unwrap();

    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].metric_key, MetricKey::TotalSales);
}

#[tokio::test]
async fn other_sellers_are_untouched_by_delete() {
    let store = InMemoryOverrideStore::new();

    store
        .upsert(SELLER, MetricKey::OrdersSold, Timeframe::Today, 10.0, 0.0)
        .await
        .unwrap();
    store
        .upsert("seller-2", MetricKey::OrdersSold, Timeframe::Today, 77.0, 0.0)
        .await
        .unwrap();

    store.delete(SELLER, MetricKey::OrdersSold).await.unwrap();

    let remaining = store.get("seller-2").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].value, 77.0);
}
