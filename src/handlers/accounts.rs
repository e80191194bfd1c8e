//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - GET /api/accounts - List accounts for the authenticated user
//! - POST /api/accounts - Create new account
//! - PUT /api/accounts/{id} - Update fields or balance
//! - DELETE /api/accounts/{id} - Delete account (cascades to its transfers and transactions)

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        account::{
            Account, AccountEnvelope, AccountList, CreateAccountRequest, UpdateAccountRequest,
        },
        to_cents,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// Create a new account.
///
/// # Endpoint
///
/// `POST /api/accounts`
///
/// # Response
///
/// - **201 Created**: `{ "account": { ... } }`
/// - **400**: Missing name
/// - **401**: Missing or invalid bearer token
pub async fn create_account(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountEnvelope>), AppError> {
    request.validate()?;

    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (user_id, name, account_type, balance, currency, color, icon)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(auth.user_id)
    .bind(request.name.trim())
    .bind(request.account_type)
    .bind(to_cents(&request.initial_balance))
    .bind(request.currency)
    .bind(&request.color)
    .bind(&request.icon)
    .fetch_one(&pool)
    .await?;

    tracing::info!(account_id = %account.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(AccountEnvelope {
            account: account.into(),
        }),
    ))
}

/// List all accounts for the authenticated user, newest first.
///
/// # Endpoint
///
/// `GET /api/accounts`
pub async fn list_accounts(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<AccountList>, AppError> {
    let accounts = sqlx::query_as::<_, Account>(
        "SELECT * FROM accounts WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(AccountList {
        accounts: accounts.into_iter().map(Into::into).collect(),
    }))
}

/// Update an account. Fields absent from the body keep their value.
///
/// A `balance` here is a direct edit and is not subject to the transfer rules.
///
/// # Security
///
/// The update filters by BOTH `id` AND `user_id`, so another user's account
/// answers 404 rather than revealing that it exists.
pub async fn update_account(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(account_id): Path<Uuid>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<AccountEnvelope>, AppError> {
    request.validate()?;

    let account = sqlx::query_as::<_, Account>(
        r#"
        UPDATE accounts
        SET name = COALESCE($1, name),
            account_type = COALESCE($2, account_type),
            balance = COALESCE($3, balance),
            currency = COALESCE($4, currency),
            color = COALESCE($5, color),
            icon = COALESCE($6, icon),
            updated_at = NOW()
        WHERE id = $7 AND user_id = $8
        RETURNING *
        "#,
    )
    .bind(request.name.as_deref().map(str::trim))
    .bind(request.account_type)
    .bind(request.balance.as_ref().map(to_cents))
    .bind(request.currency)
    .bind(request.color)
    .bind(request.icon)
    .bind(account_id)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::AccountNotFound)?;

    Ok(Json(AccountEnvelope {
        account: account.into(),
    }))
}

/// Delete an account.
///
/// Transfers and transactions referencing it are removed by the
/// `ON DELETE CASCADE` foreign keys.
///
/// # Response
///
/// - **204 No Content** on success
/// - **404** if the account does not exist for this user
pub async fn delete_account(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(account_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1 AND user_id = $2")
        .bind(account_id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::AccountNotFound);
    }

    tracing::info!(%account_id, "Account deleted");

    Ok(StatusCode::NO_CONTENT)
}
