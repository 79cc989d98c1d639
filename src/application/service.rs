use crate::application::settlement;
use crate::domain::ports::{ActivityLogRef, ProductCatalogRef, TransactionStoreRef};
use crate::domain::transaction::{
    LineItem, OrderRequest, Quantity, Transaction, TransactionStatus,
};
use crate::error::{OrderError, Result};
use chrono::Utc;
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// Stand-in for the time an external supplier takes to settle an order.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// The transaction core.
///
/// Holds its collaborators explicitly; there are no ambient globals. All
/// mutable state lives behind the store port, so the service itself is cheap
/// to share.
pub struct TransactionService {
    store: TransactionStoreRef,
    catalog: ProductCatalogRef,
    activity_log: ActivityLogRef,
    settle_delay: Duration,
}

impl TransactionService {
    pub fn new(
        store: TransactionStoreRef,
        catalog: ProductCatalogRef,
        activity_log: ActivityLogRef,
    ) -> Self {
        Self {
            store,
            catalog,
            activity_log,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Overrides the settlement delay. Tests inject milliseconds here.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Prices and persists a new order in `pending` state, then schedules its
    /// settlement.
    ///
    /// Validation happens before any write: a bad destination number or item
    /// list, or an unresolvable product, leaves nothing persisted. The unit
    /// price of every item is frozen here; settlement never re-reads the
    /// catalog. The returned transaction is re-read from the store with its
    /// associations attached, and is still `pending` — the caller never
    /// observes settlement synchronously.
    pub async fn create(&self, request: OrderRequest) -> Result<Transaction> {
        info!("creating transaction for user {}", request.user_id);

        let len = request.destination_number.len();
        if !(11..=12).contains(&len) {
            warn!("invalid destination number ({len} bytes)");
            return Err(OrderError::InvalidInput(
                "destination number must be 11 or 12 characters".to_string(),
            ));
        }

        let mut items = Vec::with_capacity(request.items.len());
        let mut total_price = Decimal::ZERO;
        for item in &request.items {
            let quantity = Quantity::new(item.quantity)?;
            let product = self
                .catalog
                .get(item.product_id)
                .await?
                .ok_or(OrderError::ProductNotFound(item.product_id))?;

            total_price += product.price * Decimal::from(quantity.get());
            items.push(LineItem {
                id: 0,
                transaction_id: 0,
                product_id: item.product_id,
                quantity,
                unit_price: product.price,
                product: None,
            });
        }

        let now = Utc::now();
        let transaction = Transaction {
            id: 0,
            user_id: request.user_id,
            destination_number: request.destination_number,
            total_price,
            status: TransactionStatus::Pending,
            serial_number: None,
            created_at: now,
            updated_at: now,
            items,
        };

        let id = self.store.create(transaction).await?;
        let created = self.get_by_id(id).await?;

        // Detached task: no cancellation, no retry. A panic inside it is
        // contained by the task boundary. If the process dies before the
        // delay elapses, the transaction stays pending.
        let store = Arc::clone(&self.store);
        let activity_log = Arc::clone(&self.activity_log);
        let pending = created.clone();
        let delay = self.settle_delay;
        tokio::spawn(async move {
            settlement::settle(store, activity_log, pending, delay).await;
        });

        Ok(created)
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Transaction> {
        let mut transaction = self
            .store
            .load(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;
        self.attach_products(&mut transaction).await?;
        Ok(transaction)
    }

    pub async fn list_all(&self) -> Result<Vec<Transaction>> {
        let mut transactions = self.store.load_all().await?;
        for transaction in &mut transactions {
            self.attach_products(transaction).await?;
        }
        Ok(transactions)
    }

    pub async fn list_by_user(&self, user_id: u64) -> Result<Vec<Transaction>> {
        let mut transactions = self.store.load_by_user(user_id).await?;
        for transaction in &mut transactions {
            self.attach_products(transaction).await?;
        }
        Ok(transactions)
    }

    /// Administrative status override.
    ///
    /// Trusted path: it bypasses the price-consistency check and overwrites
    /// any prior status, terminal ones included. Races with an in-flight
    /// settlement are last-write-wins; there is no conflict detection.
    pub async fn set_status(&self, id: u64, status: &str) -> Result<()> {
        let status: TransactionStatus = status.parse()?;

        let mut transaction = self
            .store
            .load(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;
        transaction.status = status;
        self.store.update(&transaction).await?;

        info!("transaction {id} status set to {status}");
        Ok(())
    }

    /// Removes a transaction and, with it, its line items.
    pub async fn delete(&self, id: u64) -> Result<()> {
        if self.store.load(id).await?.is_none() {
            warn!("transaction {id} not found for deletion");
            return Err(OrderError::NotFound(id));
        }
        self.store.delete(id).await?;

        info!("transaction {id} deleted");
        Ok(())
    }

    /// Re-attaches the read-only product association to every line item.
    /// Items keep their frozen `unit_price` regardless of what the catalog
    /// returns here.
    async fn attach_products(&self, transaction: &mut Transaction) -> Result<()> {
        for item in &mut transaction.items {
            item.product = self.catalog.get(item.product_id).await?;
        }
        Ok(())
    }
}
