//! Transfer data models and API request/response types.
//!
//! A transfer moves a positive amount between two accounts of the same
//! user and currency. Transfers are immutable once recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::account::AccountResponse;

/// Represents a transfer record from the database.
///
/// Maps to the `transfers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Transfer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: BigDecimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to transfer money between accounts.
///
/// # JSON Example
///
/// ```json
/// {
///   "from_account_id": "550e8400-e29b-41d4-a716-446655440000",
///   "to_account_id": "660e8400-e29b-41d4-a716-446655440001",
///   "amount": "30.00",
///   "description": "Savings top-up"
/// }
/// ```
///
/// Both accounts are updated in the same database transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Account to transfer from (will decrease)
    pub from_account_id: Uuid,

    /// Account to transfer to (will increase)
    pub to_account_id: Uuid,

    pub amount: BigDecimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferResponse {
    pub id: Uuid,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: BigDecimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Transfer> for TransferResponse {
    fn from(transfer: Transfer) -> Self {
        Self {
            id: transfer.id,
            from_account_id: transfer.from_account_id,
            to_account_id: transfer.to_account_id,
            amount: transfer.amount,
            description: transfer.description,
            created_at: transfer.created_at,
        }
    }
}

/// Everything a client needs to refresh after a transfer: the new record
/// and both accounts with their updated balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub transfer: TransferResponse,
    pub from_account: AccountResponse,
    pub to_account: AccountResponse,
}

/// One row of the transfer history, joined with both account names.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct TransferHistoryEntry {
    pub id: Uuid,
    pub from_account_id: Uuid,
    pub from_account_name: String,
    pub to_account_id: Uuid,
    pub to_account_name: String,
    pub amount: BigDecimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `{ "transfers": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferHistory {
    pub transfers: Vec<TransferHistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn amount_travels_as_decimal_string() {
        let request: TransferRequest = serde_json::from_str(
            r#"{
                "from_account_id": "550e8400-e29b-41d4-a716-446655440000",
                "to_account_id": "660e8400-e29b-41d4-a716-446655440001",
                "amount": "30.00",
                "description": "Savings top-up"
            }"#,
        )
        .unwrap();
        assert_eq!(request.amount, BigDecimal::from_str("30.00").unwrap());

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["amount"], "30.00");
    }
}
