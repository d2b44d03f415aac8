//! # Product Catalog
//!
//! Validated CRUD over the product collection. The one rule that is more
//! than validation: a product with recorded sales cannot be deleted, because
//! sales carry a soft `product_id` reference the store never enforces.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use stockbook_core::{validation, Product};
use stockbook_store::{ProductOrder, SaleFilter, SaleOrder, StoreGateway, UserContext};

use crate::error::{LedgerError, LedgerResult};

// =============================================================================
// Requests
// =============================================================================

/// Input for [`Catalog::create_product`].
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub stock_quantity: i64,
    pub reorder_level: i64,
}

/// Input for [`Catalog::update_product`]. Carries the full target state;
/// the update is last-write-wins.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UpdateProduct {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub stock_quantity: i64,
    pub reorder_level: i64,
}

fn validate(name: &str, category: &str, price: i64, cost: i64, stock: i64, reorder: i64) -> LedgerResult<()> {
    validation::validate_product_name(name)?;
    validation::validate_category(category)?;
    validation::validate_amount_cents("price", price)?;
    validation::validate_amount_cents("cost", cost)?;
    validation::validate_stock_quantity(stock)?;
    validation::validate_reorder_level(reorder)?;
    Ok(())
}

// =============================================================================
// Catalog
// =============================================================================

pub struct Catalog<G> {
    gateway: Arc<G>,
}

impl<G> Catalog<G>
where
    G: StoreGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Catalog { gateway }
    }

    /// Products owned by the caller, alphabetical.
    pub async fn list_products(&self, ctx: &UserContext) -> LedgerResult<Vec<Product>> {
        Ok(self.gateway.list_products(ctx, ProductOrder::Name).await?)
    }

    /// A single product, or `ProductNotFound`.
    pub async fn get_product(&self, ctx: &UserContext, id: &str) -> LedgerResult<Product> {
        self.gateway
            .get_product(ctx, id)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(id.to_string()))
    }

    pub async fn create_product(
        &self,
        ctx: &UserContext,
        request: NewProduct,
    ) -> LedgerResult<Product> {
        validate(
            &request.name,
            &request.category,
            request.price_cents,
            request.cost_cents,
            request.stock_quantity,
            request.reorder_level,
        )?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            user_id: ctx.user_id.clone(),
            name: request.name,
            category: request.category,
            price_cents: request.price_cents,
            cost_cents: request.cost_cents,
            stock_quantity: request.stock_quantity,
            reorder_level: request.reorder_level,
            created_at: now,
            updated_at: now,
        };

        self.gateway.insert_product(ctx, &product).await?;
        info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Rewrites a product. Price and cost edits never touch recorded sales;
    /// those carry their own snapshot.
    pub async fn update_product(
        &self,
        ctx: &UserContext,
        id: &str,
        request: UpdateProduct,
    ) -> LedgerResult<Product> {
        validate(
            &request.name,
            &request.category,
            request.price_cents,
            request.cost_cents,
            request.stock_quantity,
            request.reorder_level,
        )?;

        let existing = self.get_product(ctx, id).await?;
        let product = Product {
            id: existing.id,
            user_id: existing.user_id,
            name: request.name,
            category: request.category,
            price_cents: request.price_cents,
            cost_cents: request.cost_cents,
            stock_quantity: request.stock_quantity,
            reorder_level: request.reorder_level,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.gateway.update_product(ctx, &product).await?;
        info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Deletes a product, refusing while sales still reference it.
    pub async fn delete_product(&self, ctx: &UserContext, id: &str) -> LedgerResult<()> {
        // Surface NotFound before the referencing-sales check.
        let product = self.get_product(ctx, id).await?;

        let referencing = self
            .gateway
            .list_sales(ctx, &SaleFilter::for_product(id), SaleOrder::DateAsc)
            .await?;
        if !referencing.is_empty() {
            return Err(LedgerError::ProductHasSales {
                count: referencing.len(),
            });
        }

        self.gateway.delete_product(ctx, id).await?;
        info!(product_id = %id, name = %product.name, "Product deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{RecordSale, SalesLedger};
    use chrono::NaiveDate;
    use stockbook_store::MemoryStore;

    fn ctx() -> UserContext {
        UserContext::new("alice")
    }

    fn new_beans() -> NewProduct {
        NewProduct {
            name: "Espresso Beans".to_string(),
            category: "Coffee".to_string(),
            price_cents: 10_000,
            cost_cents: 6_000,
            stock_quantity: 10,
            reorder_level: 5,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::new(store);

        let created = catalog.create_product(&ctx(), new_beans()).await.unwrap();
        assert_eq!(created.user_id, "alice");

        let fetched = catalog.get_product(&ctx(), &created.id).await.unwrap();
        assert_eq!(fetched.name, "Espresso Beans");
        assert_eq!(fetched.price_cents, 10_000);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::new(store);

        let mut request = new_beans();
        request.name = "   ".to_string();
        let err = catalog.create_product(&ctx(), request).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_extreme_price() {
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::new(store);

        // A price this size would overflow sale totals at max quantity.
        let mut request = new_beans();
        request.price_cents = i64::MAX / 2;
        let err = catalog.create_product(&ctx(), request).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_preserves_identity() {
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::new(store);
        let created = catalog.create_product(&ctx(), new_beans()).await.unwrap();

        let updated = catalog
            .update_product(
                &ctx(),
                &created.id,
                UpdateProduct {
                    name: "Dark Roast Beans".to_string(),
                    category: "Coffee".to_string(),
                    price_cents: 12_000,
                    cost_cents: 6_000,
                    stock_quantity: 10,
                    reorder_level: 5,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Dark Roast Beans");
    }

    #[tokio::test]
    async fn test_delete_refused_while_sales_reference_it() {
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::new(store.clone());
        let ledger = SalesLedger::new(store);
        let created = catalog.create_product(&ctx(), new_beans()).await.unwrap();

        ledger
            .record_sale(
                &ctx(),
                RecordSale {
                    product_id: created.id.clone(),
                    quantity: 2,
                    sale_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                },
            )
            .await
            .unwrap();

        let err = catalog.delete_product(&ctx(), &created.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::ProductHasSales { count: 1 }));

        // Delete the sale, then the product goes.
        let sales = ledger.list_sales(&ctx()).await.unwrap();
        ledger.delete_sale(&ctx(), &sales[0].id).await.unwrap();
        catalog.delete_product(&ctx(), &created.id).await.unwrap();

        let err = catalog.get_product(&ctx(), &created.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::ProductNotFound(_)));
    }
}
