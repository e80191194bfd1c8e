//! Transfer HTTP handlers.
//!
//! - POST /api/accounts/transfers - Move balance between two accounts
//! - GET /api/accounts/transfers/history - List past transfers

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::transfer::{TransferHistory, TransferOutcome, TransferRequest},
    services::transfer_service,
};
use axum::{Extension, Json, extract::State, http::StatusCode};

/// Transfer money between two of the user's accounts.
///
/// # Request Body
///
/// ```json
/// {
///   "from_account_id": "550e8400-...",
///   "to_account_id": "660e8400-...",
///   "amount": "30.00",
///   "description": "Savings"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "transfer": { "id": "...", "amount": "30.00", ... },
///   "from_account": { "id": "550e8400-...", "balance": "70.00", ... },
///   "to_account": { "id": "660e8400-...", "balance": "80.00", ... }
/// }
/// ```
///
/// # Atomicity
///
/// Both accounts are updated in a single database transaction.
/// Either both succeed or neither does.
pub async fn create_transfer(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferOutcome>), AppError> {
    let outcome = transfer_service::execute(&pool, auth.user_id, request).await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// List past transfers, newest first.
pub async fn transfer_history(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<TransferHistory>, AppError> {
    let transfers = transfer_service::history(&pool, auth.user_id).await?;

    Ok(Json(TransferHistory { transfers }))
}
