//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: Database entity representing a balance-holding account
//! - `AccountType` / `Currency`: Postgres enums shared with the wire format
//! - `CreateAccountRequest` / `UpdateAccountRequest`: Request bodies
//! - `AccountResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::ValidationError;

/// Kind of account. Maps to the `account_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Cash,
    Bank,
    CreditCard,
    Savings,
    Investment,
}

impl AccountType {
    /// Whether a transfer may take this account below zero.
    pub fn allows_negative_balance(self) -> bool {
        matches!(self, AccountType::CreditCard)
    }
}

/// ISO 4217 currency of an account. Maps to the `currency_code` Postgres enum.
///
/// Balances are never converted between currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "currency_code", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Usd,
    Gbp,
}

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `accounts` table. Each account belongs to exactly one user
/// (via `user_id`); every query filters on it.
///
/// Balances are `NUMERIC(14,2)`. They may go negative only for account types
/// that allow it, and only through transfers or direct edits.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,

    /// Owner of this account
    pub user_id: Uuid,

    pub name: String,

    pub account_type: AccountType,

    /// Current signed balance
    pub balance: BigDecimal,

    pub currency: Currency,

    /// Display color, e.g. `#10B981`
    pub color: String,

    /// Display icon name, e.g. `wallet`
    pub icon: String,

    pub created_at: DateTime<Utc>,

    /// Timestamp of last balance or field update
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Everyday",
///   "type": "bank",
///   "initial_balance": "100.00",
///   "currency": "EUR",
///   "color": "#10B981",
///   "icon": "wallet"
/// }
/// ```
///
/// Only `name` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,

    #[serde(rename = "type", default = "default_account_type")]
    pub account_type: AccountType,

    #[serde(default = "BigDecimal::default")]
    pub initial_balance: BigDecimal,

    #[serde(default = "default_currency")]
    pub currency: Currency,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_icon")]
    pub icon: String,
}

impl CreateAccountRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError("Account name is required".to_string()));
        }
        Ok(())
    }
}

fn default_account_type() -> AccountType {
    AccountType::Cash
}

fn default_currency() -> Currency {
    Currency::Eur
}

fn default_color() -> String {
    "#10B981".to_string()
}

fn default_icon() -> String {
    "wallet".to_string()
}

/// Request body for updating an account. Absent fields are left unchanged.
///
/// Setting `balance` is a direct edit and bypasses the transfer rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<BigDecimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl UpdateAccountRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if matches!(self.name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(ValidationError("Account name cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Response body for account endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "Everyday",
///   "type": "bank",
///   "balance": "70.00",
///   "currency": "EUR",
///   "color": "#10B981",
///   "icon": "wallet",
///   "created_at": "2025-12-20T10:00:00Z",
///   "updated_at": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub balance: BigDecimal,
    pub currency: Currency,
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Drops the internal `user_id` before the account leaves the server.
impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            account_type: account.account_type,
            balance: account.balance,
            currency: account.currency,
            color: account.color,
            icon: account.icon,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// `{ "account": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountEnvelope {
    pub account: AccountResponse,
}

/// `{ "accounts": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountList {
    pub accounts: Vec<AccountResponse>,
}
