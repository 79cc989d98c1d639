#![allow(dead_code)]

use async_trait::async_trait;
use orderflow::application::service::TransactionService;
use orderflow::domain::ports::TransactionStore;
use orderflow::domain::product::Product;
use orderflow::domain::transaction::{OrderItem, OrderRequest, Transaction};
use orderflow::error::{OrderError, Result};
use orderflow::infrastructure::in_memory::{
    InMemoryActivityLog, InMemoryProductCatalog, InMemoryTransactionStore,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

pub const SETTLE_DELAY: Duration = Duration::from_millis(25);
/// Comfortably past `SETTLE_DELAY`; tests sleep this long before asserting on
/// settlement outcomes.
pub const SETTLE_WAIT: Duration = Duration::from_millis(300);

pub struct Harness {
    pub service: TransactionService,
    pub store: Arc<InMemoryTransactionStore>,
    pub catalog: Arc<InMemoryProductCatalog>,
    pub activity_log: Arc<InMemoryActivityLog>,
}

pub fn product(id: u64, name: &str, price: Decimal) -> Product {
    Product {
        id,
        name: name.to_string(),
        price,
        stock: 50,
        category: Some("Data".to_string()),
    }
}

/// Service wired to in-memory adapters, with products 1 (100.00) and
/// 2 (25.50) preloaded.
pub async fn harness() -> Harness {
    let store = Arc::new(InMemoryTransactionStore::new());
    let catalog = Arc::new(InMemoryProductCatalog::new());
    let activity_log = Arc::new(InMemoryActivityLog::new());

    catalog.insert(product(1, "Data 1GB", dec!(100.00))).await;
    catalog.insert(product(2, "Voucher 25K", dec!(25.50))).await;

    let service = TransactionService::new(
        store.clone(),
        catalog.clone(),
        activity_log.clone(),
    )
    .with_settle_delay(SETTLE_DELAY);

    Harness {
        service,
        store,
        catalog,
        activity_log,
    }
}

pub fn order(user_id: u64, destination: &str, items: &[(u64, u32)]) -> OrderRequest {
    OrderRequest {
        user_id,
        destination_number: destination.to_string(),
        items: items
            .iter()
            .map(|&(product_id, quantity)| OrderItem {
                product_id,
                quantity,
            })
            .collect(),
    }
}

/// Store decorator whose `update` always fails; models a backend outage at
/// settlement time.
#[derive(Clone)]
pub struct FailingUpdateStore {
    pub inner: InMemoryTransactionStore,
}

#[async_trait]
impl TransactionStore for FailingUpdateStore {
    async fn create(&self, tx: Transaction) -> Result<u64> {
        self.inner.create(tx).await
    }

    async fn load(&self, id: u64) -> Result<Option<Transaction>> {
        self.inner.load(id).await
    }

    async fn load_all(&self) -> Result<Vec<Transaction>> {
        self.inner.load_all().await
    }

    async fn load_by_user(&self, user_id: u64) -> Result<Vec<Transaction>> {
        self.inner.load_by_user(user_id).await
    }

    async fn update(&self, _tx: &Transaction) -> Result<()> {
        Err(OrderError::Storage(Box::new(std::io::Error::other(
            "injected update failure",
        ))))
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.inner.delete(id).await
    }
}
