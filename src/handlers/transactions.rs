//! Transaction HTTP handlers.
//!
//! - GET /api/transactions - List with optional `from`, `to`, `category`, `limit`, `offset`
//! - POST /api/transactions - Record income or expense
//! - GET /api/transactions/{id} - Get transaction details
//! - PUT /api/transactions/{id} - Replace a transaction
//! - DELETE /api/transactions/{id} - Delete a transaction

use crate::{
    db::DbPool,
    error::AppError,
    handlers::{ensure_account_owned, ensure_category_owned},
    middleware::auth::AuthContext,
    models::{
        to_cents,
        transaction::{
            Transaction, TransactionEnvelope, TransactionList, TransactionQuery,
            TransactionRequest,
        },
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

/// List transactions, newest first.
///
/// Unset filters match everything; `limit` defaults to 50 and is capped at 500.
pub async fn list_transactions(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<TransactionList>, AppError> {
    let transactions = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT * FROM transactions
        WHERE user_id = $1
          AND ($2::date IS NULL OR date >= $2)
          AND ($3::date IS NULL OR date <= $3)
          AND ($4::uuid IS NULL OR category_id = $4)
        ORDER BY date DESC, created_at DESC
        LIMIT $5 OFFSET $6
        "#,
    )
    .bind(auth.user_id)
    .bind(query.from)
    .bind(query.to)
    .bind(query.category)
    .bind(query.limit())
    .bind(query.offset())
    .fetch_all(&pool)
    .await?;

    Ok(Json(TransactionList {
        transactions: transactions.into_iter().map(Into::into).collect(),
    }))
}

/// Record a transaction. Account balances are not affected.
///
/// # Request Body
///
/// ```json
/// {
///   "description": "Salary",
///   "amount": "2500.00",
///   "type": "income",
///   "date": "2025-12-01"
/// }
/// ```
pub async fn create_transaction(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<TransactionEnvelope>), AppError> {
    request.validate()?;
    ensure_references(&pool, auth.user_id, &request).await?;

    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (user_id, account_id, category_id, kind, amount, description, date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(auth.user_id)
    .bind(request.account_id)
    .bind(request.category_id)
    .bind(request.kind)
    .bind(to_cents(&request.amount))
    .bind(request.description.trim())
    .bind(request.date.unwrap_or_else(|| Utc::now().date_naive()))
    .fetch_one(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionEnvelope {
            transaction: transaction.into(),
        }),
    ))
}

/// Get a transaction by ID.
///
/// Returns 404 if it does not exist or belongs to another user.
pub async fn get_transaction(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionEnvelope>, AppError> {
    let transaction = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE id = $1 AND user_id = $2",
    )
    .bind(transaction_id)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Transaction"))?;

    Ok(Json(TransactionEnvelope {
        transaction: transaction.into(),
    }))
}

/// Replace a transaction's fields.
pub async fn update_transaction(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(transaction_id): Path<Uuid>,
    Json(request): Json<TransactionRequest>,
) -> Result<Json<TransactionEnvelope>, AppError> {
    request.validate()?;
    ensure_references(&pool, auth.user_id, &request).await?;

    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        UPDATE transactions
        SET account_id = $1,
            category_id = $2,
            kind = $3,
            amount = $4,
            description = $5,
            date = COALESCE($6, date)
        WHERE id = $7 AND user_id = $8
        RETURNING *
        "#,
    )
    .bind(request.account_id)
    .bind(request.category_id)
    .bind(request.kind)
    .bind(to_cents(&request.amount))
    .bind(request.description.trim())
    .bind(request.date)
    .bind(transaction_id)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Transaction"))?;

    Ok(Json(TransactionEnvelope {
        transaction: transaction.into(),
    }))
}

pub async fn delete_transaction(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
        .bind(transaction_id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Transaction"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Referenced account and category must belong to the same user.
async fn ensure_references(
    pool: &DbPool,
    user_id: Uuid,
    request: &TransactionRequest,
) -> Result<(), AppError> {
    if let Some(account_id) = request.account_id {
        ensure_account_owned(pool, user_id, account_id).await?;
    }
    if let Some(category_id) = request.category_id {
        ensure_category_owned(pool, user_id, category_id).await?;
    }
    Ok(())
}
