use crate::domain::product::Product;
use crate::domain::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Shared handles: the detached settlement task and the request path hold the
/// same adapters concurrently.
pub type TransactionStoreRef = Arc<dyn TransactionStore>;
pub type ProductCatalogRef = Arc<dyn ProductCatalog>;
pub type ActivityLogRef = Arc<dyn ActivityLog>;

/// Persistence for the transaction aggregate (header + line items).
///
/// `create` must be atomic: either the header and all of its items become
/// visible to subsequent `load` calls, or none do.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists a new aggregate, assigning identities, and returns the
    /// transaction id.
    async fn create(&self, tx: Transaction) -> Result<u64>;
    async fn load(&self, id: u64) -> Result<Option<Transaction>>;
    async fn load_all(&self) -> Result<Vec<Transaction>>;
    async fn load_by_user(&self, user_id: u64) -> Result<Vec<Transaction>>;
    /// Overwrites the stored aggregate. Fails with `NotFound` for unknown
    /// ids; a deleted transaction is not resurrected.
    async fn update(&self, tx: &Transaction) -> Result<()>;
    /// Removes the aggregate, items included. Absent ids are a no-op; the
    /// service layer reports `NotFound` before calling this.
    async fn delete(&self, id: u64) -> Result<()>;
}

/// Read-only catalog lookup used to price line items.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn get(&self, product_id: u64) -> Result<Option<Product>>;
}

/// Best-effort audit trail. Callers log and swallow failures.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn record(&self, user_id: u64, action: &str, details: &str) -> Result<()>;
}
