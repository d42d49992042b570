// Shared in-memory test doubles for the storage seams.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use shop_edge::services::core::metrics::{
    validate_override_value, AggregateSource, LegacyBlobStore, OverrideStore, SnapshotStore,
};
use shop_edge::services::core::orders::{OrderStore, SyntheticOrderStore};
use shop_edge::types::{
    LegacyAuditEntry, MetricKey, MetricOverride, MetricVector, Order, OrderDetail, OrderFilter,
    OrderStatus, ResolutionOutcome, SyntheticSnapshot, Timeframe,
};
use shop_edge::utils::{current_timestamp_ms, ShopError, ShopResult};

// ============= AGGREGATES =============

#[derive(Default)]
pub struct MockAggregateSource {
    presets: Mutex<HashMap<Timeframe, MetricVector>>,
    failing: Mutex<HashSet<Timeframe>>,
}

impl MockAggregateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preset(&self, timeframe: Timeframe, vector: MetricVector) {
        self.presets.lock().unwrap().insert(timeframe, vector);
    }

    pub fn fail_for(&self, timeframe: Timeframe) {
        self.failing.lock().unwrap().insert(timeframe);
    }
}

#[async_trait::async_trait(?Send)]
impl AggregateSource for MockAggregateSource {
    async fn compute_aggregate(
        &self,
        _seller_id: &str,
        timeframe: Timeframe,
    ) -> ShopResult<MetricVector> {
        if self.failing.lock().unwrap().contains(&timeframe) {
            return Err(ShopError::database_error("aggregate query failed"));
        }
        Ok(self
            .presets
            .lock()
            .unwrap()
            .get(&timeframe)
            .cloned()
            .unwrap_or_default())
    }
}

// ============= SNAPSHOTS =============

#[derive(Default)]
pub struct MockSnapshotStore {
    rows: Mutex<Vec<SyntheticSnapshot>>,
    failing: Mutex<bool>,
}

impl MockSnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }

    fn check_failing(&self) -> ShopResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(ShopError::storage_unavailable("snapshot storage down"));
        }
        Ok(())
    }
}

#[async_trait::async_trait(?Send)]
impl SnapshotStore for MockSnapshotStore {
    async fn get(
        &self,
        seller_id: &str,
        timeframe: Timeframe,
    ) -> ShopResult<Option<SyntheticSnapshot>> {
        self.check_failing()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.seller_id == seller_id && s.timeframe == timeframe)
            .cloned())
    }

    async fn get_all(&self, seller_id: &str) -> ShopResult<Vec<SyntheticSnapshot>> {
        self.check_failing()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.seller_id == seller_id)
            .cloned()
            .collect())
    }

    async fn upsert(
        &self,
        seller_id: &str,
        timeframe: Timeframe,
        vector: MetricVector,
    ) -> ShopResult<SyntheticSnapshot> {
        self.check_failing()?;
        let now = current_timestamp_ms();
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows
            .iter_mut()
            .find(|s| s.seller_id == seller_id && s.timeframe == timeframe)
        {
            existing.vector = vector;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let snapshot = SyntheticSnapshot {
            id: format!("snap-{}-{}", seller_id, timeframe.as_str()),
            seller_id: seller_id.to_string(),
            timeframe,
            vector,
            created_at: now,
            updated_at: now,
        };
        rows.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn delete(&self, seller_id: &str, timeframe: Option<Timeframe>) -> ShopResult<()> {
        self.check_failing()?;
        self.rows
            .lock()
            .unwrap()
            .retain(|s| s.seller_id != seller_id || timeframe.is_some_and(|tf| s.timeframe != tf));
        Ok(())
    }
}

// ============= OVERRIDES =============

#[derive(Default)]
pub struct InMemoryOverrideStore {
    rows: Mutex<Vec<MetricOverride>>,
    next_id: Mutex<u64>,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<MetricOverride> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl OverrideStore for InMemoryOverrideStore {
    async fn get(&self, seller_id: &str) -> ShopResult<Vec<MetricOverride>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.seller_id == seller_id)
            .cloned()
            .collect())
    }

    async fn upsert(
        &self,
        seller_id: &str,
        metric_key: MetricKey,
        period: Timeframe,
        value: f64,
        original_value: f64,
    ) -> ShopResult<MetricOverride> {
        validate_override_value(metric_key, value)?;
        let now = current_timestamp_ms();
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows
            .iter_mut()
            .find(|o| o.seller_id == seller_id && o.metric_key == metric_key && o.period == period)
        {
            existing.value = value;
            existing.original_value = original_value;
            existing.updated_at = now + 1;
            return Ok(existing.clone());
        }
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let row = MetricOverride {
            id: format!("ov-{}", next_id),
            seller_id: seller_id.to_string(),
            metric_key,
            period,
            value,
            original_value,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, seller_id: &str, metric_key: MetricKey) -> ShopResult<()> {
        self.rows
            .lock()
            .unwrap()
            .retain(|o| o.seller_id != seller_id || o.metric_key != metric_key);
        Ok(())
    }

    async fn clear(&self, seller_id: &str, metric_key: MetricKey) -> ShopResult<()> {
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.seller_id == seller_id && row.metric_key == metric_key {
                row.value = 0.0;
                row.updated_at = current_timestamp_ms() + 1;
            }
        }
        Ok(())
    }
}

// ============= LEGACY BLOB =============

#[derive(Default)]
pub struct MockLegacyStore {
    vector: Mutex<Option<MetricVector>>,
    audit: Mutex<Vec<LegacyAuditEntry>>,
}

impl MockLegacyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, vector: MetricVector) {
        *self.vector.lock().unwrap() = Some(vector);
    }

    pub fn audit_trail(&self) -> Vec<LegacyAuditEntry> {
        self.audit.lock().unwrap().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl LegacyBlobStore for MockLegacyStore {
    async fn read(
        &self,
        _seller_id: &str,
    ) -> ShopResult<(Option<MetricVector>, Vec<LegacyAuditEntry>)> {
        Ok((
            self.vector.lock().unwrap().clone(),
            self.audit.lock().unwrap().clone(),
        ))
    }

    async fn write(
        &self,
        _seller_id: &str,
        partial: &MetricVector,
        entry: LegacyAuditEntry,
    ) -> ShopResult<()> {
        let mut vector = self.vector.lock().unwrap();
        let mut merged = vector.clone().unwrap_or_default();
        merged.merge_from(partial);
        *vector = Some(merged);
        self.audit.lock().unwrap().push(entry);
        Ok(())
    }
}

// ============= ORDERS =============

pub fn test_order(id: &str, seller_id: &str, created_at: i64, synthetic: bool) -> Order {
    Order {
        id: id.to_string(),
        seller_id: seller_id.to_string(),
        customer_name: format!("Customer {}", id),
        status: OrderStatus::Paid,
        total_amount: 25.0,
        item_count: 1,
        shipping_address: if synthetic {
            None
        } else {
            Some("1 Main St".to_string())
        },
        internal_note: if synthetic {
            None
        } else {
            Some("note".to_string())
        },
        is_synthetic: synthetic,
        created_at,
        updated_at: created_at,
    }
}

#[derive(Default)]
pub struct MockOrderStore {
    orders: Mutex<Vec<Order>>,
}

impl MockOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, orders: Vec<Order>) {
        *self.orders.lock().unwrap() = orders;
    }

    pub fn status_of(&self, order_id: &str) -> Option<OrderStatus> {
        self.orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == order_id)
            .map(|o| o.status)
    }

    fn filtered(&self, seller_id: &str, filter: &OrderFilter) -> Vec<Order> {
        let mut matching: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.seller_id == seller_id && filter.matches(o))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }
}

#[async_trait::async_trait(?Send)]
impl OrderStore for MockOrderStore {
    async fn count_orders(&self, seller_id: &str, filter: &OrderFilter) -> ShopResult<u64> {
        Ok(self.filtered(seller_id, filter).len() as u64)
    }

    async fn list_orders(
        &self,
        seller_id: &str,
        filter: &OrderFilter,
        limit: usize,
    ) -> ShopResult<Vec<Order>> {
        let mut orders = self.filtered(seller_id, filter);
        orders.truncate(limit);
        Ok(orders)
    }

    async fn get_order(&self, order_id: &str) -> ShopResult<Option<OrderDetail>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .map(|order| OrderDetail {
                order,
                items: Vec::new(),
            }))
    }

    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ShopResult<bool> {
        let mut orders = self.orders.lock().unwrap();
        match orders.iter_mut().find(|o| o.id == order_id) {
            Some(order) => {
                order.status = status;
                order.updated_at = current_timestamp_ms();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MockSyntheticOrderStore {
    orders: Mutex<Vec<Order>>,
    failing: Mutex<bool>,
}

impl MockSyntheticOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, orders: Vec<Order>) {
        *self.orders.lock().unwrap() = orders;
    }

    pub fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }

    fn check_failing(&self) -> ShopResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(ShopError::storage_unavailable("synthetic storage down"));
        }
        Ok(())
    }
}

#[async_trait::async_trait(?Send)]
impl SyntheticOrderStore for MockSyntheticOrderStore {
    async fn list_orders(
        &self,
        seller_id: &str,
        filter: &OrderFilter,
        limit: usize,
    ) -> ShopResult<Vec<Order>> {
        self.check_failing()?;
        let mut matching: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.seller_id == seller_id && filter.matches(o))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn get_order(&self, order_id: &str) -> ShopResult<Option<OrderDetail>> {
        self.check_failing()?;
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .map(|order| OrderDetail {
                order,
                items: Vec::new(),
            }))
    }
}

// ============= ASSERT HELPERS =============

pub fn resolved_value(outcome: &ResolutionOutcome, tf: Timeframe, key: MetricKey) -> f64 {
    outcome
        .views
        .get(&tf)
        .and_then(|view| view.vector.get(key))
        .unwrap_or(f64::NAN)
}
