use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use worker::wasm_bindgen::JsValue;
use worker::{D1Database, Env};

use crate::services::core::metrics::{
    validate_override_value, AggregateSource, LegacyBlobStore, OverrideStore, SnapshotStore,
};
use crate::services::core::orders::{OrderStore, SyntheticOrderStore};
use crate::types::{
    LegacyAnalyticsBlob, LegacyAuditEntry, MetricKey, MetricOverride, MetricVector, Order,
    OrderDetail, OrderFilter, OrderItem, OrderStatus, SellerProfile, SyntheticSnapshot, Timeframe,
};
use crate::utils::{
    current_timestamp_ms, generate_id, window_cutoff_ms, EngineConfig, ShopError, ShopResult,
};
use crate::log_info;

/// D1Service provides database operations using the Cloudflare D1 SQL
/// database: seller profiles, orders, products, synthetic data, metric
/// snapshots and metric overrides.
#[derive(Clone)]
pub struct D1Service {
    db: Arc<D1Database>,
    config: EngineConfig,
}

impl D1Service {
    pub fn new(env: &Env, config: EngineConfig) -> worker::Result<Self> {
        let db = env.d1("ShopEdgeDB")?;
        Ok(D1Service {
            db: Arc::new(db),
            config,
        })
    }

    pub fn from_db(db: Arc<D1Database>, config: EngineConfig) -> Self {
        D1Service { db, config }
    }

    // ============= SCHEMA =============

    /// Create every table this service relies on. Idempotent; run once per
    /// isolate at startup. Overrides get a dedicated statement so the
    /// upsert path can re-run just that migration if the table is missing.
    pub async fn ensure_schema(&self) -> ShopResult<()> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS sellers (
                id TEXT PRIMARY KEY,
                shop_name TEXT NOT NULL,
                email TEXT,
                legacy_analytics TEXT,
                created_at INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL DEFAULT 0
            )",
            "CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                seller_id TEXT NOT NULL,
                name TEXT NOT NULL,
                price REAL NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL DEFAULT 0
            )",
            "CREATE TABLE IF NOT EXISTS orders (
                id TEXT PRIMARY KEY,
                seller_id TEXT NOT NULL,
                customer_name TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'pending',
                total_amount REAL NOT NULL DEFAULT 0,
                item_count INTEGER NOT NULL DEFAULT 0,
                shipping_address TEXT,
                internal_note TEXT,
                created_at INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL DEFAULT 0
            )",
            "CREATE TABLE IF NOT EXISTS order_items (
                id TEXT PRIMARY KEY,
                order_id TEXT NOT NULL,
                product_name TEXT NOT NULL DEFAULT '',
                quantity INTEGER NOT NULL DEFAULT 1,
                unit_price REAL NOT NULL DEFAULT 0
            )",
            "CREATE TABLE IF NOT EXISTS synthetic_orders (
                id TEXT PRIMARY KEY,
                seller_id TEXT NOT NULL,
                customer_name TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'completed',
                total_amount REAL NOT NULL DEFAULT 0,
                item_count INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL DEFAULT 0
            )",
            "CREATE TABLE IF NOT EXISTS synthetic_order_items (
                id TEXT PRIMARY KEY,
                order_id TEXT NOT NULL,
                product_name TEXT NOT NULL DEFAULT '',
                quantity INTEGER NOT NULL DEFAULT 1,
                unit_price REAL NOT NULL DEFAULT 0
            )",
            "CREATE TABLE IF NOT EXISTS seller_metric_snapshots (
                id TEXT PRIMARY KEY,
                seller_id TEXT NOT NULL,
                timeframe TEXT NOT NULL,
                vector TEXT NOT NULL,
                created_at INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL DEFAULT 0,
                UNIQUE(seller_id, timeframe)
            )",
        ];

        for sql in statements {
            self.execute(sql, &[]).await?;
        }
        self.ensure_overrides_table().await?;

        log_info!("Database schema ensured");
        Ok(())
    }

    /// Overrides were added after the original tables; environments
    /// migrated at different times, so this one is callable on its own.
    pub async fn ensure_overrides_table(&self) -> ShopResult<()> {
        self.execute(
            "CREATE TABLE IF NOT EXISTS seller_metric_overrides (
                id TEXT PRIMARY KEY,
                seller_id TEXT NOT NULL,
                metric_key TEXT NOT NULL,
                period TEXT NOT NULL,
                value REAL NOT NULL DEFAULT 0,
                original_value REAL NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL DEFAULT 0,
                UNIQUE(seller_id, metric_key, period)
            )",
            &[],
        )
        .await
    }

    // ============= SELLER PROFILE OPERATIONS =============

    pub async fn get_seller_profile(&self, seller_id: &str) -> ShopResult<Option<SellerProfile>> {
        let row = self
            .query_first("SELECT * FROM sellers WHERE id = ?", &[seller_id.into()])
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_seller_profile(row)?)),
            None => Ok(None),
        }
    }

    /// NotFound-aware variant for handler paths
    pub async fn require_seller(&self, seller_id: &str) -> ShopResult<SellerProfile> {
        self.get_seller_profile(seller_id)
            .await?
            .ok_or_else(|| ShopError::not_found(format!("Seller not found: {}", seller_id)))
    }

    // ============= QUERY PLUMBING =============

    async fn execute(&self, sql: &str, binds: &[JsValue]) -> ShopResult<()> {
        self.db
            .prepare(sql)
            .bind(binds)
            .map_err(|e| ShopError::database_error(format!("Failed to bind parameters: {}", e)))?
            .run()
            .await
            .map_err(|e| ShopError::database_error(format!("Failed to execute query: {}", e)))?;
        Ok(())
    }

    async fn query_first(
        &self,
        sql: &str,
        binds: &[JsValue],
    ) -> ShopResult<Option<HashMap<String, Value>>> {
        self.db
            .prepare(sql)
            .bind(binds)
            .map_err(|e| ShopError::database_error(format!("Failed to bind parameters: {}", e)))?
            .first::<HashMap<String, Value>>(None)
            .await
            .map_err(|e| ShopError::database_error(format!("Failed to execute query: {}", e)))
    }

    async fn query_all(
        &self,
        sql: &str,
        binds: &[JsValue],
    ) -> ShopResult<Vec<HashMap<String, Value>>> {
        let result = self
            .db
            .prepare(sql)
            .bind(binds)
            .map_err(|e| ShopError::database_error(format!("Failed to bind parameters: {}", e)))?
            .all()
            .await
            .map_err(|e| ShopError::database_error(format!("Failed to execute query: {}", e)))?;

        result
            .results::<HashMap<String, Value>>()
            .map_err(|e| ShopError::database_error(format!("Failed to parse results: {}", e)))
    }
}

// ============= AGGREGATE PROVIDER =============

#[async_trait::async_trait(?Send)]
impl AggregateSource for D1Service {
    async fn compute_aggregate(
        &self,
        seller_id: &str,
        timeframe: Timeframe,
    ) -> ShopResult<MetricVector> {
        let days = match timeframe {
            Timeframe::Total => self.config.total_window_days,
            other => other.window_days(),
        };
        let cutoff = window_cutoff_ms(days);

        let order_row = self
            .query_first(
                "SELECT COUNT(*) AS order_count, COALESCE(SUM(total_amount), 0) AS sales
                 FROM orders WHERE seller_id = ? AND created_at >= ?",
                &[seller_id.into(), cutoff.into()],
            )
            .await?
            .unwrap_or_default();

        let product_row = self
            .query_first(
                "SELECT COUNT(*) AS product_count FROM products WHERE seller_id = ?",
                &[seller_id.into()],
            )
            .await?
            .unwrap_or_default();

        let orders_sold = get_f64(&order_row, "order_count").unwrap_or(0.0);
        let total_sales = get_f64(&order_row, "sales").unwrap_or(0.0);
        let total_products = get_f64(&product_row, "product_count").unwrap_or(0.0);

        let mut vector = MetricVector::new();
        vector.set(MetricKey::OrdersSold, orders_sold);
        vector.set(MetricKey::TotalSales, total_sales);
        vector.set(
            MetricKey::ProfitForecast,
            total_sales * self.config.profit_margin,
        );
        vector.set(MetricKey::TotalProducts, total_products);
        // Placeholder values pending real instrumentation; the storage
        // layer cannot derive these cheaply.
        vector.set(MetricKey::Visitors, MetricKey::Visitors.default_value());
        vector.set(
            MetricKey::ShopFollowers,
            MetricKey::ShopFollowers.default_value(),
        );
        vector.set(
            MetricKey::TotalCustomers,
            MetricKey::TotalCustomers.default_value(),
        );
        vector.set(MetricKey::ShopRating, MetricKey::ShopRating.default_value());
        vector.set(
            MetricKey::CreditScore,
            MetricKey::CreditScore.default_value(),
        );

        Ok(vector)
    }
}

// ============= SNAPSHOT STORE =============

#[async_trait::async_trait(?Send)]
impl SnapshotStore for D1Service {
    async fn get(
        &self,
        seller_id: &str,
        timeframe: Timeframe,
    ) -> ShopResult<Option<SyntheticSnapshot>> {
        let row = match self
            .query_first(
                "SELECT * FROM seller_metric_snapshots WHERE seller_id = ? AND timeframe = ?",
                &[seller_id.into(), timeframe.as_str().into()],
            )
            .await
        {
            Ok(row) => row,
            Err(e) if e.is_missing_table() => return Ok(None),
            Err(e) => return Err(e),
        };

        match row {
            Some(row) => Ok(Some(row_to_snapshot(row)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self, seller_id: &str) -> ShopResult<Vec<SyntheticSnapshot>> {
        let rows = match self
            .query_all(
                "SELECT * FROM seller_metric_snapshots WHERE seller_id = ?",
                &[seller_id.into()],
            )
            .await
        {
            Ok(rows) => rows,
            Err(e) if e.is_missing_table() => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        rows.into_iter().map(row_to_snapshot).collect()
    }

    async fn upsert(
        &self,
        seller_id: &str,
        timeframe: Timeframe,
        vector: MetricVector,
    ) -> ShopResult<SyntheticSnapshot> {
        let now = current_timestamp_ms();
        let vector_json = serde_json::to_string(&vector)
            .map_err(|e| ShopError::serialization_error(format!("snapshot vector: {}", e)))?;

        self.execute(
            "INSERT INTO seller_metric_snapshots (id, seller_id, timeframe, vector, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(seller_id, timeframe) DO UPDATE SET
                vector = excluded.vector,
                updated_at = excluded.updated_at",
            &[
                generate_id().into(),
                seller_id.into(),
                timeframe.as_str().into(),
                vector_json.into(),
                now.into(),
                now.into(),
            ],
        )
        .await?;

        SnapshotStore::get(self, seller_id, timeframe)
            .await?
            .ok_or_else(|| ShopError::database_error("Snapshot upsert did not persist"))
    }

    async fn delete(&self, seller_id: &str, timeframe: Option<Timeframe>) -> ShopResult<()> {
        let result = match timeframe {
            Some(tf) => {
                self.execute(
                    "DELETE FROM seller_metric_snapshots WHERE seller_id = ? AND timeframe = ?",
                    &[seller_id.into(), tf.as_str().into()],
                )
                .await
            }
            None => {
                self.execute(
                    "DELETE FROM seller_metric_snapshots WHERE seller_id = ?",
                    &[seller_id.into()],
                )
                .await
            }
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_missing_table() => Ok(()),
            Err(e) => Err(e),
        }
    }
}

// ============= OVERRIDE STORE =============

#[async_trait::async_trait(?Send)]
impl OverrideStore for D1Service {
    async fn get(&self, seller_id: &str) -> ShopResult<Vec<MetricOverride>> {
        let rows = match self
            .query_all(
                "SELECT * FROM seller_metric_overrides WHERE seller_id = ?",
                &[seller_id.into()],
            )
            .await
        {
            Ok(rows) => rows,
            // Storage absent reads the same as "no rows found"
            Err(e) if e.is_missing_table() => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        rows.into_iter().map(row_to_override).collect()
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
        let sql = "INSERT INTO seller_metric_overrides
                (id, seller_id, metric_key, period, value, original_value, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(seller_id, metric_key, period) DO UPDATE SET
                value = excluded.value,
                original_value = excluded.original_value,
                updated_at = excluded.updated_at";
        let binds: Vec<JsValue> = vec![
            generate_id().into(),
            seller_id.into(),
            metric_key.as_str().into(),
            period.as_str().into(),
            value.into(),
            original_value.into(),
            now.into(),
            now.into(),
        ];

        match self.execute(sql, &binds).await {
            Ok(()) => {}
            Err(e) if e.is_missing_table() => {
                // Environment migrated before overrides existed: provision
                // the table and retry the write once.
                self.ensure_overrides_table().await?;
                self.execute(sql, &binds).await?;
            }
            Err(e) => return Err(e),
        }

        let row = self
            .query_first(
                "SELECT * FROM seller_metric_overrides
                 WHERE seller_id = ? AND metric_key = ? AND period = ?",
                &[
                    seller_id.into(),
                    metric_key.as_str().into(),
                    period.as_str().into(),
                ],
            )
            .await?
            .ok_or_else(|| ShopError::database_error("Override upsert did not persist"))?;

        row_to_override(row)
    }

    async fn delete(&self, seller_id: &str, metric_key: MetricKey) -> ShopResult<()> {
        let result = self
            .execute(
                "DELETE FROM seller_metric_overrides WHERE seller_id = ? AND metric_key = ?",
                &[seller_id.into(), metric_key.as_str().into()],
            )
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_missing_table() => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn clear(&self, seller_id: &str, metric_key: MetricKey) -> ShopResult<()> {
        let result = self
            .execute(
                "UPDATE seller_metric_overrides SET value = 0, updated_at = ?
                 WHERE seller_id = ? AND metric_key = ?",
                &[
                    current_timestamp_ms().into(),
                    seller_id.into(),
                    metric_key.as_str().into(),
                ],
            )
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_missing_table() => Ok(()),
            Err(e) => Err(e),
        }
    }
}

// ============= LEGACY BLOB ADAPTER =============

#[async_trait::async_trait(?Send)]
impl LegacyBlobStore for D1Service {
    async fn read(
        &self,
        seller_id: &str,
    ) -> ShopResult<(Option<MetricVector>, Vec<LegacyAuditEntry>)> {
        let row = self
            .query_first(
                "SELECT legacy_analytics FROM sellers WHERE id = ?",
                &[seller_id.into()],
            )
            .await?;

        let raw = row
            .and_then(|r| r.get("legacy_analytics").cloned())
            .and_then(|v| v.as_str().map(|s| s.to_string()));

        let blob = match raw.as_deref().and_then(LegacyAnalyticsBlob::parse) {
            Some(blob) => blob,
            None => return Ok((None, Vec::new())),
        };

        let vector = if blob.metrics.is_empty() {
            None
        } else {
            Some(blob.metrics)
        };
        Ok((vector, blob.audit_trail))
    }

    async fn write(
        &self,
        seller_id: &str,
        partial: &MetricVector,
        entry: LegacyAuditEntry,
    ) -> ShopResult<()> {
        let profile = self.require_seller(seller_id).await?;

        let mut blob = profile
            .legacy_analytics
            .as_deref()
            .and_then(LegacyAnalyticsBlob::parse)
            .unwrap_or_default();
        blob.apply(partial, entry);

        self.execute(
            "UPDATE sellers SET legacy_analytics = ?, updated_at = ? WHERE id = ?",
            &[
                blob.to_json()?.into(),
                current_timestamp_ms().into(),
                seller_id.into(),
            ],
        )
        .await
    }
}

// ============= ORDER STORES =============

#[async_trait::async_trait(?Send)]
impl OrderStore for D1Service {
    async fn count_orders(&self, seller_id: &str, filter: &OrderFilter) -> ShopResult<u64> {
        let (clause, binds) = build_order_filter(seller_id, filter);
        let sql = format!("SELECT COUNT(*) AS total FROM orders WHERE {}", clause);
        let row = self.query_first(&sql, &binds).await?.unwrap_or_default();
        Ok(get_f64(&row, "total").unwrap_or(0.0) as u64)
    }

    async fn list_orders(
        &self,
        seller_id: &str,
        filter: &OrderFilter,
        limit: usize,
    ) -> ShopResult<Vec<Order>> {
        let (clause, mut binds) = build_order_filter(seller_id, filter);
        binds.push((limit as i64).into());
        let sql = format!(
            "SELECT * FROM orders WHERE {} ORDER BY created_at DESC LIMIT ?",
            clause
        );

        let rows = self.query_all(&sql, &binds).await?;
        rows.into_iter().map(|r| row_to_order(r, false)).collect()
    }

    async fn get_order(&self, order_id: &str) -> ShopResult<Option<OrderDetail>> {
        let row = self
            .query_first("SELECT * FROM orders WHERE id = ?", &[order_id.into()])
            .await?;

        let order = match row {
            Some(row) => row_to_order(row, false)?,
            None => return Ok(None),
        };

        let item_rows = self
            .query_all(
                "SELECT * FROM order_items WHERE order_id = ?",
                &[order_id.into()],
            )
            .await?;
        let items = item_rows
            .into_iter()
            .map(row_to_order_item)
            .collect::<ShopResult<Vec<_>>>()?;

        Ok(Some(OrderDetail { order, items }))
    }

    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ShopResult<bool> {
        let exists = self
            .query_first("SELECT id FROM orders WHERE id = ?", &[order_id.into()])
            .await?
            .is_some();
        if !exists {
            return Ok(false);
        }

        self.execute(
            "UPDATE orders SET status = ?, updated_at = ? WHERE id = ?",
            &[
                status.as_str().into(),
                current_timestamp_ms().into(),
                order_id.into(),
            ],
        )
        .await?;
        Ok(true)
    }
}

#[async_trait::async_trait(?Send)]
impl SyntheticOrderStore for D1Service {
    async fn list_orders(
        &self,
        seller_id: &str,
        filter: &OrderFilter,
        limit: usize,
    ) -> ShopResult<Vec<Order>> {
        let (clause, mut binds) = build_order_filter(seller_id, filter);
        binds.push((limit as i64).into());
        let sql = format!(
            "SELECT * FROM synthetic_orders WHERE {} ORDER BY created_at DESC LIMIT ?",
            clause
        );

        let rows = match self.query_all(&sql, &binds).await {
            Ok(rows) => rows,
            Err(e) if e.is_missing_table() => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        rows.into_iter().map(|r| row_to_order(r, true)).collect()
    }

    async fn get_order(&self, order_id: &str) -> ShopResult<Option<OrderDetail>> {
        let row = match self
            .query_first(
                "SELECT * FROM synthetic_orders WHERE id = ?",
                &[order_id.into()],
            )
            .await
        {
            Ok(row) => row,
            Err(e) if e.is_missing_table() => return Ok(None),
            Err(e) => return Err(e),
        };

        let order = match row {
            Some(row) => row_to_order(row, true)?,
            None => return Ok(None),
        };

        let item_rows = self
            .query_all(
                "SELECT * FROM synthetic_order_items WHERE order_id = ?",
                &[order_id.into()],
            )
            .await?;
        let items = item_rows
            .into_iter()
            .map(row_to_order_item)
            .collect::<ShopResult<Vec<_>>>()?;

        Ok(Some(OrderDetail { order, items }))
    }
}

/// WHERE clause + binds shared by the real and synthetic order tables
fn build_order_filter(seller_id: &str, filter: &OrderFilter) -> (String, Vec<JsValue>) {
    let mut clauses = vec!["seller_id = ?".to_string()];
    let mut binds: Vec<JsValue> = vec![seller_id.into()];

    if let Some(status) = filter.status {
        clauses.push("status = ?".to_string());
        binds.push(status.as_str().into());
    }
    if let Some(from) = filter.date_from {
        clauses.push("created_at >= ?".to_string());
        binds.push(from.into());
    }
    if let Some(to) = filter.date_to {
        clauses.push("created_at <= ?".to_string());
        binds.push(to.into());
    }
    if let Some(ref term) = filter.search {
        clauses.push("(LOWER(customer_name) LIKE ? OR LOWER(id) LIKE ?)".to_string());
        let pattern = format!("%{}%", term.to_lowercase());
        binds.push(pattern.clone().into());
        binds.push(pattern.into());
    }

    (clauses.join(" AND "), binds)
}

// ============= ROW MAPPING =============

fn get_str(row: &HashMap<String, Value>, key: &str) -> Option<String> {
    row.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// D1 may hand numeric columns back as numbers or strings depending on
/// how the row was written; accept both.
fn get_f64(row: &HashMap<String, Value>, key: &str) -> Option<f64> {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

fn get_i64(row: &HashMap<String, Value>, key: &str) -> Option<i64> {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

fn row_to_seller_profile(row: HashMap<String, Value>) -> ShopResult<SellerProfile> {
    let id = get_str(&row, "id").ok_or_else(|| ShopError::parse_error("Missing seller id"))?;

    Ok(SellerProfile {
        id,
        shop_name: get_str(&row, "shop_name").unwrap_or_default(),
        email: get_str(&row, "email").filter(|s| !s.is_empty()),
        legacy_analytics: get_str(&row, "legacy_analytics").filter(|s| !s.is_empty()),
        created_at: get_i64(&row, "created_at").unwrap_or(0),
        updated_at: get_i64(&row, "updated_at").unwrap_or(0),
    })
}

fn row_to_snapshot(row: HashMap<String, Value>) -> ShopResult<SyntheticSnapshot> {
    let id = get_str(&row, "id").ok_or_else(|| ShopError::parse_error("Missing snapshot id"))?;
    let seller_id = get_str(&row, "seller_id")
        .ok_or_else(|| ShopError::parse_error("Missing snapshot seller_id"))?;
    let timeframe = get_str(&row, "timeframe")
        .ok_or_else(|| ShopError::parse_error("Missing snapshot timeframe"))
        .and_then(|s| Timeframe::parse(&s))?;

    let vector = get_str(&row, "vector")
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default();

    Ok(SyntheticSnapshot {
        id,
        seller_id,
        timeframe,
        vector,
        created_at: get_i64(&row, "created_at").unwrap_or(0),
        updated_at: get_i64(&row, "updated_at").unwrap_or(0),
    })
}

fn row_to_override(row: HashMap<String, Value>) -> ShopResult<MetricOverride> {
    let id = get_str(&row, "id").ok_or_else(|| ShopError::parse_error("Missing override id"))?;
    let seller_id = get_str(&row, "seller_id")
        .ok_or_else(|| ShopError::parse_error("Missing override seller_id"))?;
    let metric_key = get_str(&row, "metric_key")
        .ok_or_else(|| ShopError::parse_error("Missing override metric_key"))
        .and_then(|s| MetricKey::parse(&s))?;
    let period = get_str(&row, "period")
        .ok_or_else(|| ShopError::parse_error("Missing override period"))
        .and_then(|s| Timeframe::parse(&s))?;

    Ok(MetricOverride {
        id,
        seller_id,
        metric_key,
        period,
        value: get_f64(&row, "value").unwrap_or(0.0),
        original_value: get_f64(&row, "original_value").unwrap_or(0.0),
        created_at: get_i64(&row, "created_at").unwrap_or(0),
        updated_at: get_i64(&row, "updated_at").unwrap_or(0),
    })
}

fn row_to_order(row: HashMap<String, Value>, synthetic: bool) -> ShopResult<Order> {
    let id = get_str(&row, "id").ok_or_else(|| ShopError::parse_error("Missing order id"))?;
    let seller_id = get_str(&row, "seller_id")
        .ok_or_else(|| ShopError::parse_error("Missing order seller_id"))?;
    let status = get_str(&row, "status")
        .ok_or_else(|| ShopError::parse_error("Missing order status"))
        .and_then(|s| OrderStatus::parse(&s))?;

    Ok(Order {
        id,
        seller_id,
        customer_name: get_str(&row, "customer_name").unwrap_or_default(),
        status,
        total_amount: get_f64(&row, "total_amount").unwrap_or(0.0),
        item_count: get_i64(&row, "item_count").unwrap_or(0) as u32,
        // Synthetic orders carry no seller-internal fields
        shipping_address: if synthetic {
            None
        } else {
            get_str(&row, "shipping_address").filter(|s| !s.is_empty())
        },
        internal_note: if synthetic {
            None
        } else {
            get_str(&row, "internal_note").filter(|s| !s.is_empty())
        },
        is_synthetic: synthetic,
        created_at: get_i64(&row, "created_at").unwrap_or(0),
        updated_at: get_i64(&row, "updated_at").unwrap_or(0),
    })
}

fn row_to_order_item(row: HashMap<String, Value>) -> ShopResult<OrderItem> {
    let id = get_str(&row, "id").ok_or_else(|| ShopError::parse_error("Missing item id"))?;
    let order_id =
        get_str(&row, "order_id").ok_or_else(|| ShopError::parse_error("Missing item order_id"))?;

    Ok(OrderItem {
        id,
        order_id,
        product_name: get_str(&row, "product_name").unwrap_or_default(),
        quantity: get_i64(&row, "quantity").unwrap_or(1) as u32,
        unit_price: get_f64(&row, "unit_price").unwrap_or(0.0),
    })
}
