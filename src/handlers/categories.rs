//! Category HTTP handlers.
//!
//! - GET /api/categories
//! - POST /api/categories
//! - PUT /api/categories/{id}
//! - DELETE /api/categories/{id}

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::category::{Category, CategoryEnvelope, CategoryList, CategoryRequest},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

pub async fn list_categories(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<CategoryList>, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE user_id = $1 ORDER BY name",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(CategoryList {
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}

/// Create a category.
///
/// ```json
/// { "name": "Groceries", "color": "#F59E0B", "description": "Food and household" }
/// ```
pub async fn create_category(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryEnvelope>), AppError> {
    request.validate()?;

    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (user_id, name, color, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(auth.user_id)
    .bind(request.name.trim())
    .bind(&request.color)
    .bind(&request.description)
    .fetch_one(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryEnvelope {
            category: category.into(),
        }),
    ))
}

pub async fn update_category(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(category_id): Path<Uuid>,
    Json(request): Json<CategoryRequest>,
) -> Result<Json<CategoryEnvelope>, AppError> {
    request.validate()?;

    let category = sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET name = $1, color = $2, description = $3
        WHERE id = $4 AND user_id = $5
        RETURNING *
        "#,
    )
    .bind(request.name.trim())
    .bind(&request.color)
    .bind(&request.description)
    .bind(category_id)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Category"))?;

    Ok(Json(CategoryEnvelope {
        category: category.into(),
    }))
}

/// Delete a category. Its budgets go with it; transactions keep their row
/// with the category cleared.
pub async fn delete_category(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(category_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
        .bind(category_id)
        .bind(auth.user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Category"));
    }

    Ok(StatusCode::NO_CONTENT)
}
