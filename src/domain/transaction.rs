use crate::domain::product::Product;
use crate::error::OrderError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a transaction.
///
/// Transactions are created `pending`. Settlement moves them to `success` or
/// `failed`; `process` is only ever set through the administrative override.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Process,
    Success,
    Failed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Process => "process",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

impl FromStr for TransactionStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "process" => Ok(TransactionStatus::Process),
            "success" => Ok(TransactionStatus::Success),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(OrderError::InvalidStatus(other.to_string())),
        }
    }
}

/// A positive item count.
///
/// Wraps `u32` so that a zero quantity is unrepresentable past the input
/// boundary.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(try_from = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Result<Self, OrderError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(OrderError::InvalidInput(
                "quantity must be positive".to_string(),
            ))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = OrderError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One priced line of a transaction.
///
/// `unit_price` is a snapshot taken when the order was priced. It is never
/// refreshed from the catalog, even if the live price changes before
/// settlement.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LineItem {
    pub id: u64,
    pub transaction_id: u64,
    pub product_id: u64,
    pub quantity: Quantity,
    pub unit_price: Decimal,
    /// Read-only catalog association, attached on loads.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub product: Option<Product>,
}

impl LineItem {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity.get())
    }
}

/// A customer order aggregate (header + line items) tracked through the
/// pending→terminal lifecycle.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: u64,
    pub user_id: u64,
    pub destination_number: String,
    pub total_price: Decimal,
    pub status: TransactionStatus,
    /// Supplier confirmation code, set only when settlement succeeds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub serial_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
}

impl Transaction {
    /// Sum of the frozen per-item subtotals.
    pub fn calculated_total(&self) -> Decimal {
        self.items.iter().map(LineItem::subtotal).sum()
    }
}

/// An order as submitted by a client.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderRequest {
    pub user_id: u64,
    pub destination_number: String,
    pub items: Vec<OrderItem>,
}

/// Quantities stay raw here; the service validates them so that a malformed
/// item is reported as invalid input rather than a decode error.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderItem {
    pub product_id: u64,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "process", "success", "failed"] {
            let status: TransactionStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        let result = "bogus".parse::<TransactionStatus>();
        assert!(matches!(result, Err(OrderError::InvalidStatus(_))));
    }

    #[test]
    fn test_quantity_validation() {
        assert!(Quantity::new(1).is_ok());
        assert!(matches!(
            Quantity::new(0),
            Err(OrderError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_calculated_total_sums_frozen_prices() {
        let item = |product_id, qty, price| LineItem {
            id: 0,
            transaction_id: 0,
            product_id,
            quantity: Quantity::new(qty).unwrap(),
            unit_price: price,
            product: None,
        };
        let tx = Transaction {
            id: 1,
            user_id: 1,
            destination_number: "08123456789".to_string(),
            total_price: dec!(276.50),
            status: TransactionStatus::Pending,
            serial_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            items: vec![item(1, 2, dec!(100.00)), item(2, 3, dec!(25.50))],
        };
        assert_eq!(tx.calculated_total(), dec!(276.50));
    }

    #[test]
    fn test_order_request_deserialization() {
        let json = r#"{"user_id":1,"destination_number":"08123456789","items":[{"product_id":1,"quantity":2}]}"#;
        let request: OrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].quantity, 2);
    }
}
