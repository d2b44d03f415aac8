//! Account data purge.
//!
//! Deletion walks the gateway row by row; there is no bulk delete and no
//! transaction, so a crash mid-purge leaves a partially deleted account.
//! Re-running the request finishes the job, every step is idempotent at
//! the account level.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use stockbook_store::{
    ProductOrder, SaleFilter, SaleOrder, StoreGateway, StoreResult, UserContext,
};

/// What a purge removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPurge {
    pub sales_deleted: usize,
    pub products_deleted: usize,
}

/// Deletes everything an account owns. Object-safe so the handler can be
/// tested against a stub.
#[async_trait]
pub trait AccountDeleter: Send + Sync {
    async fn delete_account(&self, user_id: &str) -> StoreResult<AccountPurge>;
}

/// Gateway-backed deleter used in production.
pub struct StoreDeleter<G> {
    gateway: Arc<G>,
}

impl<G> StoreDeleter<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        StoreDeleter { gateway }
    }
}

#[async_trait]
impl<G> AccountDeleter for StoreDeleter<G>
where
    G: StoreGateway,
{
    async fn delete_account(&self, user_id: &str) -> StoreResult<AccountPurge> {
        let ctx = UserContext::new(user_id);

        // Sales first so products are unreferenced when they go.
        let sales = self
            .gateway
            .list_sales(&ctx, &SaleFilter::all(), SaleOrder::DateAsc)
            .await?;
        for sale in &sales {
            self.gateway.delete_sale(&ctx, &sale.id).await?;
        }

        let products = self.gateway.list_products(&ctx, ProductOrder::Name).await?;
        for product in &products {
            self.gateway.delete_product(&ctx, &product.id).await?;
        }

        let purge = AccountPurge {
            sales_deleted: sales.len(),
            products_deleted: products.len(),
        };
        info!(user_id = %user_id, sales = %purge.sales_deleted,
              products = %purge.products_deleted, "Account data purged");
        Ok(purge)
    }
}
