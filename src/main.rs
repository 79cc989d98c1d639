use clap::Parser;
use miette::{IntoDiagnostic, Result};
use orderflow::application::service::TransactionService;
use orderflow::domain::ports::{ActivityLogRef, ProductCatalogRef, TransactionStoreRef};
use orderflow::infrastructure::in_memory::{
    InMemoryActivityLog, InMemoryProductCatalog, InMemoryTransactionStore,
};
#[cfg(feature = "storage-rocksdb")]
use orderflow::infrastructure::rocksdb::RocksDbStore;
use orderflow::interfaces::csv::catalog_reader::CatalogReader;
use orderflow::interfaces::csv::report_writer::ReportWriter;
use orderflow::interfaces::json::order_reader::OrderReader;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Product catalog CSV file (id,name,price,stock,category)
    catalog: PathBuf,

    /// Order requests file, one JSON object per line
    orders: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Settlement delay in milliseconds
    #[arg(long, default_value_t = 2000)]
    settle_delay_ms: u64,
}

fn build_stores(db_path: Option<PathBuf>) -> Result<(TransactionStoreRef, ActivityLogRef)> {
    if let Some(path) = db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            let store = RocksDbStore::open(path).into_diagnostic()?;
            return Ok((Arc::new(store.clone()), Arc::new(store)));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        {
            let _ = path;
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
        }
    }
    Ok((
        Arc::new(InMemoryTransactionStore::new()),
        Arc::new(InMemoryActivityLog::new()),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let catalog = InMemoryProductCatalog::new();
    let file = File::open(&cli.catalog).into_diagnostic()?;
    for product in CatalogReader::new(file).products() {
        catalog.insert(product.into_diagnostic()?).await;
    }
    let catalog: ProductCatalogRef = Arc::new(catalog);

    let (store, activity_log) = build_stores(cli.db_path)?;
    let delay = Duration::from_millis(cli.settle_delay_ms);
    let service =
        TransactionService::new(store, catalog, activity_log).with_settle_delay(delay);

    let file = File::open(&cli.orders).into_diagnostic()?;
    let mut created = 0usize;
    for request in OrderReader::new(file).requests() {
        match request {
            Ok(request) => match service.create(request).await {
                Ok(_) => created += 1,
                Err(e) => eprintln!("Error creating transaction: {}", e),
            },
            Err(e) => eprintln!("Error reading order request: {}", e),
        }
    }

    if created > 0 {
        // Settlement tasks are detached and cannot be awaited; give them time
        // to run before reporting.
        tokio::time::sleep(delay + Duration::from_millis(500)).await;
    }

    let transactions = service.list_all().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_report(&transactions).into_diagnostic()?;

    Ok(())
}
