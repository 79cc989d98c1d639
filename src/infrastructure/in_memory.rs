use crate::domain::activity::ActivityLogEntry;
use crate::domain::ports::{ActivityLog, ProductCatalog, TransactionStore};
use crate::domain::product::Product;
use crate::domain::transaction::Transaction;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory transaction store.
///
/// The whole aggregate lives as one value under its id behind the lock, so
/// the header and its items are visible together or not at all.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<u64, Transaction>>>,
    next_tx_id: Arc<AtomicU64>,
    next_item_id: Arc<AtomicU64>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn create(&self, mut tx: Transaction) -> Result<u64> {
        let id = self.next_tx_id.fetch_add(1, Ordering::Relaxed) + 1;
        tx.id = id;
        for item in &mut tx.items {
            item.id = self.next_item_id.fetch_add(1, Ordering::Relaxed) + 1;
            item.transaction_id = id;
        }

        let mut transactions = self.transactions.write().await;
        transactions.insert(id, tx);
        Ok(id)
    }

    async fn load(&self, id: u64) -> Result<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(&id).cloned())
    }

    async fn load_all(&self) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut all: Vec<Transaction> = transactions.values().cloned().collect();
        all.sort_by_key(|tx| tx.id);
        Ok(all)
    }

    async fn load_by_user(&self, user_id: u64) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut owned: Vec<Transaction> = transactions
            .values()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|tx| tx.id);
        Ok(owned)
    }

    async fn update(&self, tx: &Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        if !transactions.contains_key(&tx.id) {
            return Err(OrderError::NotFound(tx.id));
        }
        let mut updated = tx.clone();
        updated.updated_at = Utc::now();
        transactions.insert(updated.id, updated);
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.remove(&id);
        Ok(())
    }
}

/// A thread-safe in-memory product catalog.
#[derive(Default, Clone)]
pub struct InMemoryProductCatalog {
    products: Arc<RwLock<HashMap<u64, Product>>>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product. Replacing simulates a live price edit;
    /// already-priced line items are unaffected.
    pub async fn insert(&self, product: Product) {
        let mut products = self.products.write().await;
        products.insert(product.id, product);
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn get(&self, product_id: u64) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&product_id).cloned())
    }
}

/// A thread-safe in-memory activity log. Append-only.
#[derive(Default, Clone)]
pub struct InMemoryActivityLog {
    entries: Arc<RwLock<Vec<ActivityLogEntry>>>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<ActivityLogEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn record(&self, user_id: u64, action: &str, details: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.push(ActivityLogEntry {
            user_id,
            action: action.to_string(),
            details: details.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }
}
