//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, query string)
//! 2. Runs queries scoped to the authenticated user, or calls a service
//! 3. Returns a JSON envelope or an `AppError`

/// Account management endpoints
pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod health;
/// Dashboard aggregates
pub mod reports;
pub mod transactions;
/// Balance transfers between accounts
pub mod transfers;

use crate::{db::DbPool, error::AppError};
use uuid::Uuid;

/// Fails with `AccountNotFound` unless `account_id` belongs to `user_id`.
pub(crate) async fn ensure_account_owned(
    pool: &DbPool,
    user_id: Uuid,
    account_id: Uuid,
) -> Result<(), AppError> {
    let owned: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1 AND user_id = $2)")
            .bind(account_id)
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    if owned {
        Ok(())
    } else {
        Err(AppError::AccountNotFound)
    }
}

/// Fails with `NotFound("Category")` unless `category_id` belongs to `user_id`.
pub(crate) async fn ensure_category_owned(
    pool: &DbPool,
    user_id: Uuid,
    category_id: Uuid,
) -> Result<(), AppError> {
    let owned: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1 AND user_id = $2)",
    )
    .bind(category_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    if owned {
        Ok(())
    } else {
        Err(AppError::NotFound("Category"))
    }
}
