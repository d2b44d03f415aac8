//! # In-Memory Store
//!
//! A `StoreGateway` over in-process maps. Serves two purposes:
//!
//! 1. The mocking surface for engine and reporting tests (no database file,
//!    no pool, fully deterministic ordering).
//! 2. A fault hook: [`MemoryStore::fail_next_stock_write`] makes the next
//!    stock write fail once, which is how the partial-failure paths of the
//!    two-call sequences get exercised.
//!
//! Scoping matches the real store: every read filters on `ctx.user_id` and
//! inserts stamp the context's user onto the row.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use stockbook_core::{Product, Sale};

use crate::error::{StoreError, StoreResult};
use crate::gateway::{ProductOrder, SaleFilter, SaleOrder, StoreGateway, UserContext};

/// In-memory gateway implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<HashMap<String, Product>>,
    sales: RwLock<HashMap<String, Sale>>,
    fail_next_stock_write: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Arms the fault hook: the next `update_product_stock` call returns
    /// `StoreError::Unavailable` instead of writing, then the hook disarms.
    pub fn fail_next_stock_write(&self) {
        self.fail_next_stock_write.store(true, Ordering::SeqCst);
    }

    /// Reads a product without scoping. Test assertions only.
    pub async fn raw_product(&self, id: &str) -> Option<Product> {
        self.products.read().await.get(id).cloned()
    }

    /// Number of sale rows held, regardless of owner. Test assertions only.
    pub async fn sale_count(&self) -> usize {
        self.sales.read().await.len()
    }
}

#[async_trait]
impl StoreGateway for MemoryStore {
    async fn list_products(
        &self,
        ctx: &UserContext,
        order: ProductOrder,
    ) -> StoreResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut rows: Vec<Product> = products
            .values()
            .filter(|p| p.user_id == ctx.user_id)
            .cloned()
            .collect();

        match order {
            ProductOrder::Name => rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id))),
            ProductOrder::Newest => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)))
            }
        }

        Ok(rows)
    }

    async fn get_product(&self, ctx: &UserContext, id: &str) -> StoreResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products
            .get(id)
            .filter(|p| p.user_id == ctx.user_id)
            .cloned())
    }

    async fn insert_product(&self, ctx: &UserContext, product: &Product) -> StoreResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");
        let mut row = product.clone();
        row.user_id = ctx.user_id.clone();
        self.products.write().await.insert(row.id.clone(), row);
        Ok(())
    }

    async fn update_product(&self, ctx: &UserContext, product: &Product) -> StoreResult<()> {
        let mut products = self.products.write().await;
        match products.get_mut(&product.id) {
            Some(existing) if existing.user_id == ctx.user_id => {
                let mut row = product.clone();
                row.user_id = ctx.user_id.clone();
                *existing = row;
                Ok(())
            }
            _ => Err(StoreError::not_found("Product", &product.id)),
        }
    }

    async fn update_product_stock(
        &self,
        ctx: &UserContext,
        id: &str,
        stock_quantity: i64,
    ) -> StoreResult<()> {
        if self.fail_next_stock_write.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "injected stock write failure".to_string(),
            ));
        }

        debug!(id = %id, stock = %stock_quantity, "Updating stock");
        let mut products = self.products.write().await;
        match products.get_mut(id) {
            Some(existing) if existing.user_id == ctx.user_id => {
                existing.stock_quantity = stock_quantity;
                existing.updated_at = chrono::Utc::now();
                Ok(())
            }
            _ => Err(StoreError::not_found("Product", id)),
        }
    }

    async fn delete_product(&self, ctx: &UserContext, id: &str) -> StoreResult<()> {
        let mut products = self.products.write().await;
        match products.get(id) {
            Some(existing) if existing.user_id == ctx.user_id => {
                products.remove(id);
                Ok(())
            }
            _ => Err(StoreError::not_found("Product", id)),
        }
    }

    async fn list_sales(
        &self,
        ctx: &UserContext,
        filter: &SaleFilter,
        order: SaleOrder,
    ) -> StoreResult<Vec<Sale>> {
        let sales = self.sales.read().await;
        let mut rows: Vec<Sale> = sales
            .values()
            .filter(|s| s.user_id == ctx.user_id)
            .filter(|s| match &filter.product_id {
                Some(product_id) => &s.product_id == product_id,
                None => true,
            })
            .cloned()
            .collect();

        match order {
            SaleOrder::DateDesc => rows.sort_by(|a, b| {
                b.sale_date
                    .cmp(&a.sale_date)
                    .then(b.created_at.cmp(&a.created_at))
                    .then(a.id.cmp(&b.id))
            }),
            SaleOrder::DateAsc => rows.sort_by(|a, b| {
                a.sale_date
                    .cmp(&b.sale_date)
                    .then(a.created_at.cmp(&b.created_at))
                    .then(a.id.cmp(&b.id))
            }),
        }

        Ok(rows)
    }

    async fn get_sale(&self, ctx: &UserContext, id: &str) -> StoreResult<Option<Sale>> {
        let sales = self.sales.read().await;
        Ok(sales.get(id).filter(|s| s.user_id == ctx.user_id).cloned())
    }

    async fn insert_sale(&self, ctx: &UserContext, sale: &Sale) -> StoreResult<()> {
        debug!(id = %sale.id, product_id = %sale.product_id, "Inserting sale");
        let mut row = sale.clone();
        row.user_id = ctx.user_id.clone();
        self.sales.write().await.insert(row.id.clone(), row);
        Ok(())
    }

    async fn update_sale(&self, ctx: &UserContext, sale: &Sale) -> StoreResult<()> {
        let mut sales = self.sales.write().await;
        match sales.get_mut(&sale.id) {
            Some(existing) if existing.user_id == ctx.user_id => {
                let mut row = sale.clone();
                row.user_id = ctx.user_id.clone();
                *existing = row;
                Ok(())
            }
            _ => Err(StoreError::not_found("Sale", &sale.id)),
        }
    }

    async fn delete_sale(&self, ctx: &UserContext, id: &str) -> StoreResult<()> {
        let mut sales = self.sales.write().await;
        match sales.get(id) {
            Some(existing) if existing.user_id == ctx.user_id => {
                sales.remove(id);
                Ok(())
            }
            _ => Err(StoreError::not_found("Sale", id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn product(id: &str, user: &str, name: &str) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            user_id: user.to_string(),
            name: name.to_string(),
            category: "Coffee".to_string(),
            price_cents: 10_000,
            cost_cents: 6_000,
            stock_quantity: 10,
            reorder_level: 5,
            created_at: now,
            updated_at: now,
        }
    }

    fn sale(id: &str, user: &str, product_id: &str, date: NaiveDate) -> Sale {
        let now = Utc::now();
        Sale {
            id: id.to_string(),
            user_id: user.to_string(),
            product_id: product_id.to_string(),
            product_name: "Espresso Beans".to_string(),
            unit_cost_cents: 6_000,
            quantity: 1,
            total_cents: 10_000,
            profit_cents: 4_000,
            sale_date: date,
            created_at: now,
            updated_at: now,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[tokio::test]
    async fn test_rows_are_scoped_to_the_caller() {
        let store = MemoryStore::new();
        let alice = UserContext::new("alice");
        let bob = UserContext::new("bob");

        store
            .insert_product(&alice, &product("p-1", "alice", "Beans"))
            .await
            .unwrap();

        assert!(store.get_product(&alice, "p-1").await.unwrap().is_some());
        assert!(store.get_product(&bob, "p-1").await.unwrap().is_none());
        assert!(store.list_products(&bob, ProductOrder::Name).await.unwrap().is_empty());

        // Cross-user writes report NotFound and leave the row alone.
        let err = store.update_product_stock(&bob, "p-1", 0).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(store.raw_product("p-1").await.unwrap().stock_quantity, 10);
    }

    #[tokio::test]
    async fn test_insert_stamps_context_user() {
        let store = MemoryStore::new();
        let alice = UserContext::new("alice");

        // Row claims another owner; the store overrides it with the context.
        store
            .insert_product(&alice, &product("p-1", "mallory", "Beans"))
            .await
            .unwrap();
        assert_eq!(store.raw_product("p-1").await.unwrap().user_id, "alice");
    }

    #[tokio::test]
    async fn test_product_order_by_name() {
        let store = MemoryStore::new();
        let ctx = UserContext::new("alice");
        store.insert_product(&ctx, &product("p-2", "alice", "Tea")).await.unwrap();
        store.insert_product(&ctx, &product("p-1", "alice", "Beans")).await.unwrap();

        let rows = store.list_products(&ctx, ProductOrder::Name).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Beans", "Tea"]);
    }

    #[tokio::test]
    async fn test_sale_filter_and_order() {
        let store = MemoryStore::new();
        let ctx = UserContext::new("alice");
        store.insert_sale(&ctx, &sale("s-1", "alice", "p-1", d(2024, 6, 1))).await.unwrap();
        store.insert_sale(&ctx, &sale("s-2", "alice", "p-2", d(2024, 6, 3))).await.unwrap();
        store.insert_sale(&ctx, &sale("s-3", "alice", "p-1", d(2024, 6, 2))).await.unwrap();

        let rows = store
            .list_sales(&ctx, &SaleFilter::all(), SaleOrder::DateDesc)
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s-2", "s-3", "s-1"]);

        let rows = store
            .list_sales(&ctx, &SaleFilter::for_product("p-1"), SaleOrder::DateAsc)
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s-1", "s-3"]);
    }

    #[tokio::test]
    async fn test_fault_hook_fires_once() {
        let store = MemoryStore::new();
        let ctx = UserContext::new("alice");
        store.insert_product(&ctx, &product("p-1", "alice", "Beans")).await.unwrap();

        store.fail_next_stock_write();
        let err = store.update_product_stock(&ctx, "p-1", 7).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        // Disarmed after one failure.
        store.update_product_stock(&ctx, "p-1", 7).await.unwrap();
        assert_eq!(store.raw_product("p-1").await.unwrap().stock_quantity, 7);
    }

    #[tokio::test]
    async fn test_delete_missing_sale_reports_not_found() {
        let store = MemoryStore::new();
        let ctx = UserContext::new("alice");
        let err = store.delete_sale(&ctx, "nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
