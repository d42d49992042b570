// src/types.rs

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::utils::{ShopError, ShopResult};

// ============= METRIC KEYS & TIMEFRAMES =============

/// Named seller statistic. Closed set per deployment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    OrdersSold,
    TotalSales,
    ProfitForecast,
    Visitors,
    ShopFollowers,
    ShopRating,
    CreditScore,
    TotalProducts,
    TotalCustomers,
}

impl MetricKey {
    pub const ALL: [MetricKey; 9] = [
        MetricKey::OrdersSold,
        MetricKey::TotalSales,
        MetricKey::ProfitForecast,
        MetricKey::Visitors,
        MetricKey::ShopFollowers,
        MetricKey::ShopRating,
        MetricKey::CreditScore,
        MetricKey::TotalProducts,
        MetricKey::TotalCustomers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::OrdersSold => "ordersSold",
            MetricKey::TotalSales => "totalSales",
            MetricKey::ProfitForecast => "profitForecast",
            MetricKey::Visitors => "visitors",
            MetricKey::ShopFollowers => "shopFollowers",
            MetricKey::ShopRating => "shopRating",
            MetricKey::CreditScore => "creditScore",
            MetricKey::TotalProducts => "totalProducts",
            MetricKey::TotalCustomers => "totalCustomers",
        }
    }

    pub fn parse(s: &str) -> ShopResult<MetricKey> {
        MetricKey::ALL
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| {
                ShopError::invalid_field("metricKey", format!("unknown metric key: {}", s))
            })
    }

    /// Documented default shown when no layer supplies the metric.
    /// Rating and credit score have non-zero neutral defaults; everything
    /// else is a count or currency amount and defaults to zero.
    pub fn default_value(&self) -> f64 {
        match self {
            MetricKey::ShopRating => 4.5,
            MetricKey::CreditScore => 750.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed reporting window for seller metrics.
///
/// `Total` uses a bounded lookback (365 days by default) rather than
/// all-time, to keep the aggregate queries cheap.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Timeframe {
    Today,
    Last7Days,
    Last30Days,
    Total,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::Today,
        Timeframe::Last7Days,
        Timeframe::Last30Days,
        Timeframe::Total,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Today => "today",
            Timeframe::Last7Days => "last7Days",
            Timeframe::Last30Days => "last30Days",
            Timeframe::Total => "total",
        }
    }

    pub fn parse(s: &str) -> ShopResult<Timeframe> {
        Timeframe::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| {
                ShopError::invalid_field("timeframe", format!("unknown timeframe: {}", s))
            })
    }

    /// Day-count lookback window used by the aggregate provider
    pub fn window_days(&self) -> u32 {
        match self {
            Timeframe::Today => 1,
            Timeframe::Last7Days => 7,
            Timeframe::Last30Days => 30,
            Timeframe::Total => 365,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============= METRIC VECTOR =============

/// A seller's stat bundle: metric key to numeric value.
///
/// May be partial (snapshots and legacy blobs often carry a subset of
/// keys); the resolution engine always emits it fully populated.
/// Serializes as a flat JSON object keyed by wire names; deserialization
/// is tolerant, dropping unknown keys and non-numeric values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricVector(BTreeMap<MetricKey, f64>);

impl MetricVector {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Fully populated vector of documented defaults
    pub fn defaults() -> Self {
        let mut v = Self::new();
        v.fill_defaults();
        v
    }

    pub fn get(&self, key: MetricKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    pub fn set(&mut self, key: MetricKey, value: f64) {
        self.0.insert(key, value);
    }

    pub fn contains(&self, key: MetricKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = MetricKey> + '_ {
        self.0.keys().copied()
    }

    /// Copy every key present in `other` over this vector
    pub fn merge_from(&mut self, other: &MetricVector) {
        for (key, value) in other.iter() {
            self.0.insert(key, value);
        }
    }

    /// Fill any still-absent key with its documented default
    pub fn fill_defaults(&mut self) {
        for key in MetricKey::ALL {
            self.0.entry(key).or_insert_with(|| key.default_value());
        }
    }

    /// Build a vector from a loose JSON object, keeping only known metric
    /// keys with numeric values. Non-objects yield an empty vector.
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let mut vector = Self::new();
        if let Some(map) = value.as_object() {
            for (raw_key, raw_value) in map {
                if let Ok(key) = MetricKey::parse(raw_key) {
                    if let Some(num) = raw_value.as_f64() {
                        vector.set(key, num);
                    }
                }
            }
        }
        vector
    }
}

impl FromIterator<(MetricKey, f64)> for MetricVector {
    fn from_iter<I: IntoIterator<Item = (MetricKey, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for MetricVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

impl<'de> Deserialize<'de> for MetricVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Err(D::Error::custom("metric vector must be a JSON object"));
        }
        Ok(MetricVector::from_json_value(&value))
    }
}

// ============= SNAPSHOTS & OVERRIDES =============

/// Admin-authored full metric vector for one (seller, timeframe).
/// Unique per (seller_id, timeframe); never written by seller actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticSnapshot {
    pub id: String,
    pub seller_id: String,
    pub timeframe: Timeframe,
    pub vector: MetricVector,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Admin-authored single-metric value, highest precedence in resolution.
/// Unique per (seller_id, metric_key, period). `original_value` is the
/// value observed when the override was written; audit/display only, never
/// part of resolution math.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricOverride {
    pub id: String,
    pub seller_id: String,
    pub metric_key: MetricKey,
    pub period: Timeframe,
    pub value: f64,
    pub original_value: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

// ============= LEGACY ANALYTICS BLOB =============

/// One append-only audit record inside the legacy blob
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAuditEntry {
    pub changed_fields: Vec<String>,
    pub actor: String,
    pub timestamp: i64,
}

/// Deprecated analytics structure embedded in the seller profile record.
///
/// Read-tolerant (unknown keys dropped, malformed entries skipped), strict
/// shape on write. New code writes through the override store instead; this
/// stays as a read fallback for sellers created before overrides existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAnalyticsBlob {
    pub version: u32,
    pub metrics: MetricVector,
    pub audit_trail: Vec<LegacyAuditEntry>,
}

impl Default for LegacyAnalyticsBlob {
    fn default() -> Self {
        Self {
            version: 1,
            metrics: MetricVector::new(),
            audit_trail: Vec::new(),
        }
    }
}

impl LegacyAnalyticsBlob {
    /// Tolerant parse of raw column content. Anything that is not a JSON
    /// object yields `None`; within an object, unknown metric keys and
    /// malformed audit entries are dropped rather than failing the read.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(raw).ok()?;
        let map = value.as_object()?;

        let version = map.get("version").and_then(|v| v.as_u64()).unwrap_or(1) as u32;
        let metrics = map
            .get("metrics")
            .map(MetricVector::from_json_value)
            .unwrap_or_default();
        let audit_trail = map
            .get("auditTrail")
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| serde_json::from_value(e.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            version,
            metrics,
            audit_trail,
        })
    }

    /// Merge a partial vector into the blob and append an audit entry
    pub fn apply(&mut self, partial: &MetricVector, entry: LegacyAuditEntry) {
        self.metrics.merge_from(partial);
        self.audit_trail.push(entry);
    }

    pub fn to_json(&self) -> ShopResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ShopError::serialization_error(format!("legacy blob: {}", e)))
    }
}

// ============= SELLER PROFILE =============

/// Seller profile record. Only the surface the metrics engine and the
/// legacy adapter need; full profile CRUD lives with the platform's user
/// management collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub id: String,
    pub shop_name: String,
    pub email: Option<String>,
    /// Raw legacy analytics column; parsed lazily by the blob adapter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_analytics: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

// ============= ORDERS =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> ShopResult<OrderStatus> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" => Ok(OrderStatus::Shipped),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ShopError::invalid_field(
                "status",
                format!("unknown order status: {}", other),
            )),
        }
    }
}

/// Order as exposed to listing and detail callers. Real and synthetic
/// orders share this shape; synthetic ones carry `is_synthetic = true` and
/// have the seller-only internal fields nulled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub seller_id: String,
    pub customer_name: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub item_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_note: Option<String>,
    pub is_synthetic: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Listing filter shared by the real and synthetic sides of the overlay
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Inclusive lower bound on created_at, milliseconds
    pub date_from: Option<i64>,
    /// Inclusive upper bound on created_at, milliseconds
    pub date_to: Option<i64>,
    /// Case-insensitive match against order id and customer name
    pub search: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if order.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if order.created_at > to {
                return false;
            }
        }
        if let Some(ref term) = self.search {
            let term = term.to_lowercase();
            if !order.customer_name.to_lowercase().contains(&term)
                && !order.id.to_lowercase().contains(&term)
            {
                return false;
            }
        }
        true
    }
}

/// One page of the merged real + synthetic order listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

// ============= RESOLUTION OUTPUT =============

/// Final merged metrics for one timeframe, with provenance flags so UIs
/// can show which numbers are administrator-set versus computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMetricsView {
    pub vector: MetricVector,
    pub used_synthetic: bool,
    pub used_override_keys: BTreeSet<MetricKey>,
    pub used_legacy_blob: bool,
    /// True when the calculated-aggregate layer failed and defaults were
    /// substituted for it
    pub degraded: bool,
}

impl ResolvedMetricsView {
    pub fn new() -> Self {
        Self {
            vector: MetricVector::new(),
            used_synthetic: false,
            used_override_keys: BTreeSet::new(),
            used_legacy_blob: false,
            degraded: false,
        }
    }
}

impl Default for ResolvedMetricsView {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial-result carrier for a multi-timeframe resolve call: every
/// requested timeframe gets a view, and timeframes whose mandatory
/// aggregate layer failed additionally get an error marker.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    pub views: HashMap<Timeframe, ResolvedMetricsView>,
    pub errors: HashMap<Timeframe, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_key_roundtrip() {
        for key in MetricKey::ALL {
            assert_eq!(MetricKey::parse(key.as_str()).unwrap(), key);
        }
        assert!(MetricKey::parse("bogus").is_err());
    }

    #[test]
    fn test_metric_defaults() {
        assert_eq!(MetricKey::ShopRating.default_value(), 4.5);
        assert_eq!(MetricKey::CreditScore.default_value(), 750.0);
        assert_eq!(MetricKey::OrdersSold.default_value(), 0.0);
        assert_eq!(MetricKey::TotalSales.default_value(), 0.0);
    }

    #[test]
    fn test_timeframe_windows() {
        assert_eq!(Timeframe::Today.window_days(), 1);
        assert_eq!(Timeframe::Last7Days.window_days(), 7);
        assert_eq!(Timeframe::Last30Days.window_days(), 30);
        assert_eq!(Timeframe::Total.window_days(), 365);
    }

    #[test]
    fn test_timeframe_parse() {
        assert_eq!(Timeframe::parse("last7Days").unwrap(), Timeframe::Last7Days);
        assert!(Timeframe::parse("lastWeek").is_err());
    }

    #[test]
    fn test_vector_defaults_fully_populated() {
        let v = MetricVector::defaults();
        assert_eq!(v.len(), MetricKey::ALL.len());
        assert_eq!(v.get(MetricKey::ShopRating), Some(4.5));
        assert_eq!(v.get(MetricKey::Visitors), Some(0.0));
    }

    #[test]
    fn test_vector_merge_overwrites_present_keys_only() {
        let mut base = MetricVector::defaults();
        let partial: MetricVector =
            [(MetricKey::OrdersSold, 12.0), (MetricKey::TotalSales, 340.5)]
                .into_iter()
                .collect();
        base.merge_from(&partial);
        assert_eq!(base.get(MetricKey::OrdersSold), Some(12.0));
        assert_eq!(base.get(MetricKey::TotalSales), Some(340.5));
        assert_eq!(base.get(MetricKey::ShopRating), Some(4.5));
    }

    #[test]
    fn test_vector_tolerant_deserialization() {
        let raw = r#"{"ordersSold": 7, "mystery": 1, "shopRating": "high", "totalSales": 99.5}"#;
        let v: MetricVector = serde_json::from_str(raw).unwrap();
        assert_eq!(v.get(MetricKey::OrdersSold), Some(7.0));
        assert_eq!(v.get(MetricKey::TotalSales), Some(99.5));
        // unknown key and non-numeric value are dropped
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_vector_serializes_wire_names() {
        let v: MetricVector = [(MetricKey::OrdersSold, 3.0)].into_iter().collect();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["ordersSold"], 3.0);
    }

    #[test]
    fn test_legacy_blob_tolerant_parse() {
        let raw = r#"{
            "version": 2,
            "metrics": {"ordersSold": 4, "junkKey": 9},
            "auditTrail": [
                {"changedFields": ["ordersSold"], "actor": "admin-1", "timestamp": 1700000000000},
                {"oops": true}
            ]
        }"#;
        let blob = LegacyAnalyticsBlob::parse(raw).unwrap();
        assert_eq!(blob.version, 2);
        assert_eq!(blob.metrics.get(MetricKey::OrdersSold), Some(4.0));
        assert_eq!(blob.metrics.len(), 1);
        assert_eq!(blob.audit_trail.len(), 1);
        assert_eq!(blob.audit_trail[0].actor, "admin-1");
    }

    #[test]
    fn test_legacy_blob_malformed_content() {
        assert!(LegacyAnalyticsBlob::parse("not json at all").is_none());
        assert!(LegacyAnalyticsBlob::parse("[1,2,3]").is_none());
        assert!(LegacyAnalyticsBlob::parse("42").is_none());
    }

    #[test]
    fn test_legacy_blob_apply_merges_and_appends() {
        let mut blob = LegacyAnalyticsBlob::default();
        blob.metrics.set(MetricKey::Visitors, 10.0);

        let partial: MetricVector = [(MetricKey::Visitors, 25.0)].into_iter().collect();
        blob.apply(
            &partial,
            LegacyAuditEntry {
                changed_fields: vec!["visitors".to_string()],
                actor: "admin-2".to_string(),
                timestamp: 1,
            },
        );

        assert_eq!(blob.metrics.get(MetricKey::Visitors), Some(25.0));
        assert_eq!(blob.audit_trail.len(), 1);
    }

    #[test]
    fn test_order_filter_matching() {
        let order = Order {
            id: "ord-1".to_string(),
            seller_id: "s1".to_string(),
            customer_name: "Alice Chen".to_string(),
            status: OrderStatus::Paid,
            total_amount: 42.0,
            item_count: 1,
            shipping_address: None,
            internal_note: None,
            is_synthetic: false,
            created_at: 1_000,
            updated_at: 1_000,
        };

        assert!(OrderFilter::default().matches(&order));
        assert!(OrderFilter {
            status: Some(OrderStatus::Paid),
            ..Default::default()
        }
        .matches(&order));
        assert!(!OrderFilter {
            status: Some(OrderStatus::Shipped),
            ..Default::default()
        }
        .matches(&order));
        assert!(OrderFilter {
            search: Some("alice".to_string()),
            ..Default::default()
        }
        .matches(&order));
        assert!(!OrderFilter {
            date_from: Some(2_000),
            ..Default::default()
        }
        .matches(&order));
    }
}
