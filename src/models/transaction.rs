//! Transaction (income/expense entry) data models and API request/response types.
//!
//! Transactions classify money coming in or going out. They are plain
//! records and do not move account balances.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::{ValidationError, to_cents};

/// Direction of a transaction. Maps to the `transaction_kind` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Represents a row of the `transactions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub kind: TransactionKind,

    /// Always positive; the sign comes from `kind`
    pub amount: BigDecimal,

    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating or replacing a transaction.
///
/// # JSON Example
///
/// ```json
/// {
///   "description": "Groceries",
///   "amount": "42.10",
///   "type": "expense",
///   "date": "2025-12-20",
///   "category_id": "770e8400-e29b-41d4-a716-446655440002"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub description: String,

    pub amount: BigDecimal,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Defaults to today on the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
}

impl TransactionRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError("Description is required".to_string()));
        }
        if to_cents(&self.amount) <= BigDecimal::from(0) {
            return Err(ValidationError(
                "Amount must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Filters accepted by `GET /transactions`.
///
/// All fields are optional; `from`/`to` are inclusive dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl TransactionQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 500;

    /// Page size clamped to `1..=MAX_LIMIT`.
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: BigDecimal,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            account_id: transaction.account_id,
            category_id: transaction.category_id,
            kind: transaction.kind,
            amount: transaction.amount,
            description: transaction.description,
            date: transaction.date,
            created_at: transaction.created_at,
        }
    }
}

/// `{ "transaction": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    pub transaction: TransactionResponse,
}

/// `{ "transactions": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<TransactionResponse>,
}
