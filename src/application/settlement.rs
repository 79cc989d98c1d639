use crate::domain::ports::{ActivityLogRef, TransactionStoreRef};
use crate::domain::transaction::{Transaction, TransactionStatus};
use log::{error, info, warn};
use rand::Rng;
use std::time::Duration;

const SERIAL_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SERIAL_LEN: usize = 8;

/// Resolves a pending transaction after the supplier settlement delay.
///
/// Runs detached from the request that created the transaction. The frozen
/// line-item prices are summed and compared against the stored total: a match
/// settles the transaction as `success` with a fresh serial number, a
/// mismatch settles it as `failed` with none. A failure to persist the
/// outcome is logged and swallowed — the stored transaction then stays
/// `pending` for good. The audit entry is emitted either way.
///
/// The status write is unconditional; if an administrative override ran in
/// the meantime, the later write wins.
pub async fn settle(
    store: TransactionStoreRef,
    activity_log: ActivityLogRef,
    mut transaction: Transaction,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;

    // This mismatch arm is unreachable from the creation path, which computes
    // the total from the same frozen prices. It guards a mutation path that
    // does not exist yet.
    if transaction.calculated_total() == transaction.total_price {
        let serial = generate_serial_number(&mut rand::thread_rng());
        info!(
            "transaction {} settled: success, serial {serial}",
            transaction.id
        );
        transaction.status = TransactionStatus::Success;
        transaction.serial_number = Some(serial);
    } else {
        warn!(
            "transaction {} settled: failed, total price mismatch",
            transaction.id
        );
        transaction.status = TransactionStatus::Failed;
    }

    if let Err(e) = store.update(&transaction).await {
        error!(
            "failed to persist settlement of transaction {}: {e}",
            transaction.id
        );
    }

    let details = format!(
        "Transaction ID: {}, Status: {}, Serial Number: {}",
        transaction.id,
        transaction.status,
        transaction.serial_number.as_deref().unwrap_or("")
    );
    if let Err(e) = activity_log
        .record(transaction.user_id, "Callback Received", &details)
        .await
    {
        error!(
            "failed to record callback activity for transaction {}: {e}",
            transaction.id
        );
    }
}

/// Supplier confirmation code: `SN-` plus eight characters from `[A-Z0-9]`.
/// Not a secret; collisions are acceptably rare.
pub fn generate_serial_number(rng: &mut impl Rng) -> String {
    let mut serial = String::with_capacity(SERIAL_LEN + 3);
    serial.push_str("SN-");
    for _ in 0..SERIAL_LEN {
        let idx = rng.gen_range(0..SERIAL_CHARSET.len());
        serial.push(SERIAL_CHARSET[idx] as char);
    }
    serial
}
