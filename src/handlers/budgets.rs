//! Budget HTTP handlers.
//!
//! - GET /api/budgets
//! - POST /api/budgets
//! - PUT /api/budgets/{id}
//! - DELETE /api/budgets/{id}

use crate::{
    db::DbPool,
    error::AppError,
    handlers::ensure_category_owned,
    middleware::auth::AuthContext,
    models::{
        budget::{Budget, BudgetEnvelope, BudgetList, BudgetRequest},
        to_cents,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

pub async fn list_budgets(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<BudgetList>, AppError> {
    let budgets = sqlx::query_as::<_, Budget>(
        "SELECT * FROM budgets WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(BudgetList {
        budgets: budgets.into_iter().map(Into::into).collect(),
    }))
}

/// Create a budget for one of the user's categories.
pub async fn create_budget(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<BudgetRequest>,
) -> Result<(StatusCode, Json<BudgetEnvelope>), AppError> {
    let category_id = request.validate()?;
    ensure_category_owned(&pool, auth.user_id, category_id).await?;

    let budget = sqlx::query_as::<_, Budget>(
        r#"
        INSERT INTO budgets (user_id, category_id, limit_amount, period)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(auth.user_id)
    .bind(category_id)
    .bind(to_cents(&request.limit_amount))
    .bind(request.period)
    .fetch_one(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(BudgetEnvelope {
            budget: budget.into(),
        }),
    ))
}

pub async fn update_budget(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(budget_id): Path<Uuid>,
    Json(request): Json<BudgetRequest>,
) -> Result<Json<BudgetEnvelope>, AppError> {
    let category_id = request.validate()?;
    ensure_category_owned(&pool, auth.user_id, category_id).await?;

    let budget = sqlx::query_as::<_, Budget>(
        r#"
        UPDATE budgets
        SET category_id = $1, limit_amount = $2, period = $3
        WHERE id = $4 AND user_id = $5
        RETURNING *
        "#,
    )
    .bind(category_id)
    .bind(to_cents(&request.limit_amount))
    .bind(request.period)
    .bind(budget_id)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Budget"))?;

    Ok(Json(BudgetEnvelope {
        budget: budget.into(),
    }))
}

pub async fn delete_budget(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(budget_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM budgets WHERE id = $1 AND user_id = $2")
        .bind(budget_id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Budget"));
    }

    Ok(StatusCode::NO_CONTENT)
}
