//! Report HTTP handlers for the dashboard home screen.

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::report::{DashboardStatsEnvelope, YearlyTrend},
    services::report_service,
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;

/// `GET /api/reports/dashboard-stats`
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "stats": {
///     "total_balance": [{ "currency": "EUR", "total": "150.00" }],
///     "account_count": 2,
///     "current_month": { "income": "2500.00", "expense": "640.10", "balance": "1859.90" }
///   }
/// }
/// ```
pub async fn dashboard_stats(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<DashboardStatsEnvelope>, AppError> {
    let stats =
        report_service::dashboard_stats(&pool, auth.user_id, Utc::now().date_naive()).await?;

    Ok(Json(DashboardStatsEnvelope { stats }))
}

/// `GET /api/reports/yearly-trend`
pub async fn yearly_trend(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<YearlyTrend>, AppError> {
    let yearly_trend = report_service::yearly_trend(&pool, auth.user_id).await?;

    Ok(Json(YearlyTrend { yearly_trend }))
}
