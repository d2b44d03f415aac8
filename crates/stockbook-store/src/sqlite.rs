//! # SQLite Store
//!
//! `StoreGateway` backed by SQLite through sqlx.
//!
//! ## Configuration
//! - WAL journal mode: readers don't block writers
//! - NORMAL synchronous: safe from corruption, fast enough for a dashboard
//! - Foreign keys enabled (SQLite default is off); note the schema itself
//!   declares none, the sales.product_id reference stays soft
//! - Embedded migrations from `migrations/sqlite/`, applied on connect
//!
//! Queries are runtime-checked, not compile-time macros: the schema is small
//! and this keeps the crate buildable without a prepared database.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use stockbook_core::{Product, Sale};

use crate::error::{StoreError, StoreResult};
use crate::gateway::{ProductOrder, SaleFilter, SaleOrder, StoreGateway, UserContext};

/// Embedded migrations from the `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

// =============================================================================
// Configuration
// =============================================================================

/// SQLite store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = SqliteConfig::new("./stockbook.db").max_connections(5);
/// let store = SqliteStore::connect(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of pooled connections.
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    pub min_connections: u32,

    /// Connection acquire timeout.
    pub connect_timeout: Duration,

    /// Whether to run migrations on connect.
    pub run_migrations: bool,
}

impl SqliteConfig {
    /// Configuration for a file-backed store at `path` (created if missing).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// In-memory database for tests. A single connection, because each
    /// in-memory connection is its own database.
    pub fn in_memory() -> Self {
        SqliteConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

// =============================================================================
// Store
// =============================================================================

/// SQLite-backed gateway implementation.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the database, configures the pool and applies migrations.
    pub async fn connect(config: SqliteConfig) -> StoreResult<Self> {
        info!(path = %config.database_path.display(), "Opening SQLite store");

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
        } else {
            let url = format!("sqlite://{}?mode=rwc", config.database_path.display());
            SqliteConnectOptions::from_str(&url)
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
                .create_if_missing(true)
        }
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        let store = SqliteStore { pool };

        if config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        info!("Running store migrations");
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// The underlying pool, for diagnostics.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

const PRODUCT_COLUMNS: &str = "id, user_id, name, category, price_cents, cost_cents, \
     stock_quantity, reorder_level, created_at, updated_at";

const SALE_COLUMNS: &str = "id, user_id, product_id, product_name, unit_cost_cents, \
     quantity, total_cents, profit_cents, sale_date, created_at, updated_at";

#[async_trait]
impl StoreGateway for SqliteStore {
    async fn list_products(
        &self,
        ctx: &UserContext,
        order: ProductOrder,
    ) -> StoreResult<Vec<Product>> {
        let order_clause = match order {
            ProductOrder::Name => "name, id",
            ProductOrder::Newest => "created_at DESC, id",
        };
        let sql = format!(
            "SELECT {} FROM products WHERE user_id = ?1 ORDER BY {}",
            PRODUCT_COLUMNS, order_clause
        );

        let rows = sqlx::query_as::<_, Product>(&sql)
            .bind(&ctx.user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn get_product(&self, ctx: &UserContext, id: &str) -> StoreResult<Option<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE id = ?1 AND user_id = ?2",
            PRODUCT_COLUMNS
        );

        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&ctx.user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn insert_product(&self, ctx: &UserContext, product: &Product) -> StoreResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products (id, user_id, name, category, price_cents, cost_cents, \
             stock_quantity, reorder_level, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&product.id)
        .bind(&ctx.user_id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.stock_quantity)
        .bind(product.reorder_level)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_product(&self, ctx: &UserContext, product: &Product) -> StoreResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            "UPDATE products SET name = ?3, category = ?4, price_cents = ?5, cost_cents = ?6, \
             stock_quantity = ?7, reorder_level = ?8, updated_at = ?9 \
             WHERE id = ?1 AND user_id = ?2",
        )
        .bind(&product.id)
        .bind(&ctx.user_id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.stock_quantity)
        .bind(product.reorder_level)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", &product.id));
        }

        Ok(())
    }

    async fn update_product_stock(
        &self,
        ctx: &UserContext,
        id: &str,
        stock_quantity: i64,
    ) -> StoreResult<()> {
        debug!(id = %id, stock = %stock_quantity, "Updating stock");

        let result = sqlx::query(
            "UPDATE products SET stock_quantity = ?3, updated_at = ?4 \
             WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id)
        .bind(&ctx.user_id)
        .bind(stock_quantity)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }

        Ok(())
    }

    async fn delete_product(&self, ctx: &UserContext, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(&ctx.user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }

        Ok(())
    }

    async fn list_sales(
        &self,
        ctx: &UserContext,
        filter: &SaleFilter,
        order: SaleOrder,
    ) -> StoreResult<Vec<Sale>> {
        let order_clause = match order {
            SaleOrder::DateDesc => "sale_date DESC, created_at DESC, id",
            SaleOrder::DateAsc => "sale_date, created_at, id",
        };

        let rows = match &filter.product_id {
            Some(product_id) => {
                let sql = format!(
                    "SELECT {} FROM sales WHERE user_id = ?1 AND product_id = ?2 ORDER BY {}",
                    SALE_COLUMNS, order_clause
                );
                sqlx::query_as::<_, Sale>(&sql)
                    .bind(&ctx.user_id)
                    .bind(product_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM sales WHERE user_id = ?1 ORDER BY {}",
                    SALE_COLUMNS, order_clause
                );
                sqlx::query_as::<_, Sale>(&sql)
                    .bind(&ctx.user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    async fn get_sale(&self, ctx: &UserContext, id: &str) -> StoreResult<Option<Sale>> {
        let sql = format!(
            "SELECT {} FROM sales WHERE id = ?1 AND user_id = ?2",
            SALE_COLUMNS
        );

        let row = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .bind(&ctx.user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn insert_sale(&self, ctx: &UserContext, sale: &Sale) -> StoreResult<()> {
        debug!(id = %sale.id, product_id = %sale.product_id, "Inserting sale");

        sqlx::query(
            "INSERT INTO sales (id, user_id, product_id, product_name, unit_cost_cents, \
             quantity, total_cents, profit_cents, sale_date, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&sale.id)
        .bind(&ctx.user_id)
        .bind(&sale.product_id)
        .bind(&sale.product_name)
        .bind(sale.unit_cost_cents)
        .bind(sale.quantity)
        .bind(sale.total_cents)
        .bind(sale.profit_cents)
        .bind(sale.sale_date)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_sale(&self, ctx: &UserContext, sale: &Sale) -> StoreResult<()> {
        debug!(id = %sale.id, "Updating sale");

        let result = sqlx::query(
            "UPDATE sales SET product_id = ?3, product_name = ?4, unit_cost_cents = ?5, \
             quantity = ?6, total_cents = ?7, profit_cents = ?8, sale_date = ?9, \
             updated_at = ?10 \
             WHERE id = ?1 AND user_id = ?2",
        )
        .bind(&sale.id)
        .bind(&ctx.user_id)
        .bind(&sale.product_id)
        .bind(&sale.product_name)
        .bind(sale.unit_cost_cents)
        .bind(sale.quantity)
        .bind(sale.total_cents)
        .bind(sale.profit_cents)
        .bind(sale.sale_date)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Sale", &sale.id));
        }

        Ok(())
    }

    async fn delete_sale(&self, ctx: &UserContext, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(&ctx.user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Sale", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    async fn store() -> SqliteStore {
        SqliteStore::connect(SqliteConfig::in_memory()).await.unwrap()
    }

    fn product(id: &str, name: &str) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            user_id: "alice".to_string(),
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

    fn sale(id: &str, product_id: &str, date: NaiveDate) -> Sale {
        let now = Utc::now();
        Sale {
            id: id.to_string(),
            user_id: "alice".to_string(),
            product_id: product_id.to_string(),
            product_name: "Espresso Beans".to_string(),
            unit_cost_cents: 6_000,
            quantity: 3,
            total_cents: 30_000,
            profit_cents: 12_000,
            sale_date: date,
            created_at: now,
            updated_at: now,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[tokio::test]
    async fn test_product_roundtrip() {
        let store = store().await;
        let ctx = UserContext::new("alice");

        store.insert_product(&ctx, &product("p-1", "Beans")).await.unwrap();

        let fetched = store.get_product(&ctx, "p-1").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Beans");
        assert_eq!(fetched.stock_quantity, 10);
        assert_eq!(fetched.price_cents, 10_000);
    }

    #[tokio::test]
    async fn test_rows_are_scoped_to_the_caller() {
        let store = store().await;
        let alice = UserContext::new("alice");
        let bob = UserContext::new("bob");

        store.insert_product(&alice, &product("p-1", "Beans")).await.unwrap();

        assert!(store.get_product(&bob, "p-1").await.unwrap().is_none());
        let err = store.update_product_stock(&bob, "p-1", 0).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        // Alice still sees her stock untouched.
        let fetched = store.get_product(&alice, "p-1").await.unwrap().unwrap();
        assert_eq!(fetched.stock_quantity, 10);
    }

    #[tokio::test]
    async fn test_stock_update_touches_only_stock() {
        let store = store().await;
        let ctx = UserContext::new("alice");
        store.insert_product(&ctx, &product("p-1", "Beans")).await.unwrap();

        store.update_product_stock(&ctx, "p-1", 7).await.unwrap();

        let fetched = store.get_product(&ctx, "p-1").await.unwrap().unwrap();
        assert_eq!(fetched.stock_quantity, 7);
        assert_eq!(fetched.name, "Beans");
        assert_eq!(fetched.price_cents, 10_000);
    }

    #[tokio::test]
    async fn test_sale_roundtrip_and_filter() {
        let store = store().await;
        let ctx = UserContext::new("alice");

        store.insert_sale(&ctx, &sale("s-1", "p-1", d(2024, 6, 1))).await.unwrap();
        store.insert_sale(&ctx, &sale("s-2", "p-2", d(2024, 6, 3))).await.unwrap();
        store.insert_sale(&ctx, &sale("s-3", "p-1", d(2024, 6, 2))).await.unwrap();

        let all = store
            .list_sales(&ctx, &SaleFilter::all(), SaleOrder::DateDesc)
            .await
            .unwrap();
        let ids: Vec<&str> = all.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s-2", "s-3", "s-1"]);

        let filtered = store
            .list_sales(&ctx, &SaleFilter::for_product("p-1"), SaleOrder::DateAsc)
            .await
            .unwrap();
        let ids: Vec<&str> = filtered.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s-1", "s-3"]);

        let fetched = store.get_sale(&ctx, "s-1").await.unwrap().unwrap();
        assert_eq!(fetched.sale_date, d(2024, 6, 1));
        assert_eq!(fetched.total_cents, 30_000);
    }

    #[tokio::test]
    async fn test_update_missing_rows_report_not_found() {
        let store = store().await;
        let ctx = UserContext::new("alice");

        let err = store.update_product(&ctx, &product("ghost", "x")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let err = store.delete_sale(&ctx, "ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
