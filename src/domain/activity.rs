use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only audit record. The engine writes these and never reads them
/// back.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ActivityLogEntry {
    pub user_id: u64,
    pub action: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}
