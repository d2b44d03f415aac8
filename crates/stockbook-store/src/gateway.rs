//! # Store Gateway
//!
//! The trait every store implementation fulfils, plus the request types it
//! consumes.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StoreGateway                                     │
//! │                                                                         │
//! │  products:  list / get / insert / update / update_stock / delete       │
//! │  sales:     list / get / insert / update / delete                      │
//! │                                                                         │
//! │  Every call carries a UserContext and is scoped to ctx.user_id:        │
//! │  reads never return another user's rows, writes never touch them.      │
//! │                                                                         │
//! │  Calls are independent: there is NO multi-row transaction. The only    │
//! │  ordering guarantee callers get is the order they await the calls in.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is explicit by design: passing `UserContext` into each call
//! keeps the consistency engine testable without a live session, instead of
//! reading ambient global state.

use async_trait::async_trait;

use stockbook_core::{Product, Sale};

use crate::error::StoreResult;

// =============================================================================
// User Context
// =============================================================================

/// The authenticated identity a gateway call runs under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        UserContext {
            user_id: user_id.into(),
        }
    }
}

// =============================================================================
// Query Modifiers
// =============================================================================

/// Ordering for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductOrder {
    /// Alphabetical by name (the inventory table default).
    #[default]
    Name,
    /// Most recently created first.
    Newest,
}

/// Ordering for sale listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaleOrder {
    /// Most recent sale date first (the sales table default).
    #[default]
    DateDesc,
    /// Oldest sale date first.
    DateAsc,
}

/// Row filter for sale listings.
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    /// Only sales referencing this product.
    pub product_id: Option<String>,
}

impl SaleFilter {
    /// Filter matching every sale owned by the caller.
    pub fn all() -> Self {
        SaleFilter::default()
    }

    /// Filter matching sales that reference the given product.
    pub fn for_product(product_id: impl Into<String>) -> Self {
        SaleFilter {
            product_id: Some(product_id.into()),
        }
    }
}

// =============================================================================
// Gateway Trait
// =============================================================================

/// CRUD access to the `products` and `sales` collections.
///
/// Implementations must scope every read and write to `ctx.user_id`. On
/// insert the stored row's `user_id` is taken from the context, whatever the
/// passed row says. Update and delete of a row outside the caller's scope
/// report `NotFound` rather than touching it.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    // --- products ---

    async fn list_products(
        &self,
        ctx: &UserContext,
        order: ProductOrder,
    ) -> StoreResult<Vec<Product>>;

    async fn get_product(&self, ctx: &UserContext, id: &str) -> StoreResult<Option<Product>>;

    async fn insert_product(&self, ctx: &UserContext, product: &Product) -> StoreResult<()>;

    /// Full-row update (last write wins; there is no version check).
    async fn update_product(&self, ctx: &UserContext, product: &Product) -> StoreResult<()>;

    /// Single-field stock write. This is the second call of the engine's
    /// two-call sequences; it must not touch any other column.
    async fn update_product_stock(
        &self,
        ctx: &UserContext,
        id: &str,
        stock_quantity: i64,
    ) -> StoreResult<()>;

    async fn delete_product(&self, ctx: &UserContext, id: &str) -> StoreResult<()>;

    // --- sales ---

    async fn list_sales(
        &self,
        ctx: &UserContext,
        filter: &SaleFilter,
        order: SaleOrder,
    ) -> StoreResult<Vec<Sale>>;

    async fn get_sale(&self, ctx: &UserContext, id: &str) -> StoreResult<Option<Sale>>;

    async fn insert_sale(&self, ctx: &UserContext, sale: &Sale) -> StoreResult<()>;

    /// Full-row update (last write wins).
    async fn update_sale(&self, ctx: &UserContext, sale: &Sale) -> StoreResult<()>;

    async fn delete_sale(&self, ctx: &UserContext, id: &str) -> StoreResult<()>;
}
