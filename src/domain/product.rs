use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product as seen by the pricing path.
///
/// The engine only reads products; catalog maintenance lives elsewhere.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
}
