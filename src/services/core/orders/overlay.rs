// Synthetic Order Overlay - blends admin-injected display orders into a
// seller's real order list.
//
// Synthetic orders live in their own tables so they never touch the real
// order table's invariants (stock deduction, payment state machine). They
// are read-only display artifacts: listing and detail see them, mutation
// endpoints reject them.

use std::sync::Arc;

use crate::log_warn;
use crate::types::{Order, OrderDetail, OrderFilter, OrderPage, OrderStatus};
use crate::utils::{EngineConfig, ShopError, ShopResult};

const MAX_PAGE_SIZE: u32 = 100;

#[async_trait::async_trait(?Send)]
pub trait OrderStore {
    /// Number of real orders matching the filter
    async fn count_orders(&self, seller_id: &str, filter: &OrderFilter) -> ShopResult<u64>;

    /// Most recent real orders matching the filter, newest first,
    /// storage-level LIMIT applied
    async fn list_orders(
        &self,
        seller_id: &str,
        filter: &OrderFilter,
        limit: usize,
    ) -> ShopResult<Vec<Order>>;

    async fn get_order(&self, order_id: &str) -> ShopResult<Option<OrderDetail>>;

    /// Returns false when no real order has this id
    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ShopResult<bool>;
}

#[async_trait::async_trait(?Send)]
pub trait SyntheticOrderStore {
    /// Synthetic orders matching the filter, newest first, capped by
    /// `limit`. Implementations return them already mapped to the shared
    /// order shape with `is_synthetic = true` and seller-only fields
    /// nulled.
    async fn list_orders(
        &self,
        seller_id: &str,
        filter: &OrderFilter,
        limit: usize,
    ) -> ShopResult<Vec<Order>>;

    async fn get_order(&self, order_id: &str) -> ShopResult<Option<OrderDetail>>;
}

pub struct OrderOverlayService {
    real: Arc<dyn OrderStore>,
    synthetic: Arc<dyn SyntheticOrderStore>,
    config: EngineConfig,
}

impl OrderOverlayService {
    pub fn new(
        real: Arc<dyn OrderStore>,
        synthetic: Arc<dyn SyntheticOrderStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            real,
            synthetic,
            config,
        }
    }

    /// Merged, paginated order listing.
    ///
    /// The real side uses storage-level pagination: fetching the top
    /// `page * page_size` rows is enough to slice any requested page after
    /// the merge. The synthetic side is fetched whole (volume is assumed
    /// small) but capped to bound memory. Totals count both sets.
    pub async fn list_orders(
        &self,
        seller_id: &str,
        filter: &OrderFilter,
        page: u32,
        page_size: u32,
    ) -> ShopResult<OrderPage> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let real_fetch = (page as usize) * (page_size as usize);

        let real_total = self.real.count_orders(seller_id, filter).await?;
        let real_orders = self.real.list_orders(seller_id, filter, real_fetch).await?;

        // Synthetic storage that is absent or failing must not take the
        // real listing down with it.
        let synthetic_orders = match self
            .synthetic
            .list_orders(seller_id, filter, self.config.max_synthetic_fetch)
            .await
        {
            Ok(orders) => orders,
            Err(e) => {
                log_warn!(
                    "Synthetic order layer unavailable, listing real orders only",
                    serde_json::json!({ "seller_id": seller_id, "error": e.to_string() })
                );
                Vec::new()
            }
        };

        let total = real_total + synthetic_orders.len() as u64;
        let orders = merge_and_slice(real_orders, synthetic_orders, page, page_size);

        Ok(OrderPage {
            orders,
            total,
            page,
            page_size,
            total_pages: total_pages(total, page_size),
        })
    }

    /// Detail lookup: real storage first, synthetic on miss
    pub async fn get_order(&self, order_id: &str) -> ShopResult<OrderDetail> {
        if let Some(detail) = self.real.get_order(order_id).await? {
            return Ok(detail);
        }
        if let Some(detail) = self.synthetic.get_order(order_id).await? {
            return Ok(detail);
        }
        Err(ShopError::not_found(format!("Order not found: {}", order_id)))
    }

    /// Status updates apply to real orders only
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> ShopResult<()> {
        if self.real.update_order_status(order_id, status).await? {
            return Ok(());
        }
        // Distinguish "synthetic" from "missing" for a usable error
        if self.synthetic.get_order(order_id).await?.is_some() {
            return Err(ShopError::validation_error(
                "Synthetic orders are read-only display records and cannot be modified",
            ));
        }
        Err(ShopError::not_found(format!("Order not found: {}", order_id)))
    }

    pub async fn cancel(&self, order_id: &str) -> ShopResult<()> {
        self.update_status(order_id, OrderStatus::Cancelled).await
    }
}

/// Concatenate both sets, sort newest first (real wins creation-time
/// ties), and slice out the requested page.
fn merge_and_slice(
    real: Vec<Order>,
    synthetic: Vec<Order>,
    page: u32,
    page_size: u32,
) -> Vec<Order> {
    let mut combined = real;
    combined.extend(synthetic);
    combined.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then(a.is_synthetic.cmp(&b.is_synthetic))
    });

    let start = ((page - 1) as usize) * (page_size as usize);
    if start >= combined.len() {
        return Vec::new();
    }
    let end = (start + page_size as usize).min(combined.len());
    combined[start..end].to_vec()
}

fn total_pages(total: u64, page_size: u32) -> u32 {
    ((total + page_size as u64 - 1) / page_size as u64) as u32
}
