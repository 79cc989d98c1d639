use crate::domain::activity::ActivityLogEntry;
use crate::domain::ports::{ActivityLog, TransactionStore};
use crate::domain::transaction::Transaction;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Column Family for transaction aggregates (header + items as one value).
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family for activity log entries.
pub const CF_ACTIVITY: &str = "activity_log";

/// A persistent store backed by RocksDB.
///
/// Serves as both the transaction store and the activity log, using separate
/// column families. Each aggregate is serialized as a single serde_json
/// value under its big-endian id, so a write is atomic for the header and
/// its items together. Id counters are re-seeded from the highest stored
/// keys on open.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
    next_tx_id: Arc<AtomicU64>,
    next_item_id: Arc<AtomicU64>,
    next_log_id: Arc<AtomicU64>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_transactions = ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default());
        let cf_activity = ColumnFamilyDescriptor::new(CF_ACTIVITY, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_transactions, cf_activity])?;

        let tx_cf = db
            .cf_handle(CF_TRANSACTIONS)
            .ok_or_else(|| missing_cf(CF_TRANSACTIONS))?;
        let log_cf = db
            .cf_handle(CF_ACTIVITY)
            .ok_or_else(|| missing_cf(CF_ACTIVITY))?;

        let last_tx_id = last_key(&db, tx_cf)?;
        let last_log_id = last_key(&db, log_cf)?;
        let last_item_id = max_item_id(&db, tx_cf)?;

        Ok(Self {
            db: Arc::new(db),
            next_tx_id: Arc::new(AtomicU64::new(last_tx_id)),
            next_item_id: Arc::new(AtomicU64::new(last_item_id)),
            next_log_id: Arc::new(AtomicU64::new(last_log_id)),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| missing_cf(name))
    }

    fn put_transaction(&self, tx: &Transaction) -> Result<()> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        let value = serde_json::to_vec(tx)?;
        self.db.put_cf(cf, tx.id.to_be_bytes(), value)?;
        Ok(())
    }
}

fn missing_cf(name: &str) -> OrderError {
    OrderError::Storage(Box::new(std::io::Error::other(format!(
        "column family {name} not found"
    ))))
}

/// Highest key in a column family, or 0 when empty. Keys are big-endian
/// `u64`, so byte order matches numeric order.
fn last_key(db: &DB, cf: &ColumnFamily) -> Result<u64> {
    match db.iterator_cf(cf, IteratorMode::End).next() {
        Some(item) => {
            let (key, _) = item?;
            let bytes: [u8; 8] = key
                .as_ref()
                .try_into()
                .map_err(|_| OrderError::Storage(Box::new(std::io::Error::other(
                    "malformed storage key",
                ))))?;
            Ok(u64::from_be_bytes(bytes))
        }
        None => Ok(0),
    }
}

fn max_item_id(db: &DB, cf: &ColumnFamily) -> Result<u64> {
    let mut max = 0;
    for item in db.iterator_cf(cf, IteratorMode::Start) {
        let (_, value) = item?;
        let tx: Transaction = serde_json::from_slice(&value)?;
        for line in &tx.items {
            max = max.max(line.id);
        }
    }
    Ok(max)
}

#[async_trait]
impl TransactionStore for RocksDbStore {
    async fn create(&self, mut tx: Transaction) -> Result<u64> {
        let id = self.next_tx_id.fetch_add(1, Ordering::Relaxed) + 1;
        tx.id = id;
        for item in &mut tx.items {
            item.id = self.next_item_id.fetch_add(1, Ordering::Relaxed) + 1;
            item.transaction_id = id;
        }

        self.put_transaction(&tx)?;
        Ok(id)
    }

    async fn load(&self, id: u64) -> Result<Option<Transaction>> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn load_all(&self) -> Result<Vec<Transaction>> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        let mut all = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item?;
            all.push(serde_json::from_slice(&value)?);
        }
        Ok(all)
    }

    async fn load_by_user(&self, user_id: u64) -> Result<Vec<Transaction>> {
        let all = self.load_all().await?;
        Ok(all
            .into_iter()
            .filter(|tx: &Transaction| tx.user_id == user_id)
            .collect())
    }

    async fn update(&self, tx: &Transaction) -> Result<()> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        if self.db.get_pinned_cf(cf, tx.id.to_be_bytes())?.is_none() {
            return Err(OrderError::NotFound(tx.id));
        }

        let mut updated = tx.clone();
        updated.updated_at = Utc::now();
        self.put_transaction(&updated)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        self.db.delete_cf(cf, id.to_be_bytes())?;
        Ok(())
    }
}

#[async_trait]
impl ActivityLog for RocksDbStore {
    async fn record(&self, user_id: u64, action: &str, details: &str) -> Result<()> {
        let cf = self.cf(CF_ACTIVITY)?;
        let id = self.next_log_id.fetch_add(1, Ordering::Relaxed) + 1;
        let entry = ActivityLogEntry {
            user_id,
            action: action.to_string(),
            details: details.to_string(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_vec(&entry)?;
        self.db.put_cf(cf, id.to_be_bytes(), value)?;
        Ok(())
    }
}
