//! Aggregates behind the dashboard home screen.

use crate::{
    db::DbPool,
    error::AppError,
    models::report::{CurrencyTotal, DashboardStats, MonthSummary, YearlyTotals},
};
use chrono::{Datelike, NaiveDate};
use sqlx::types::BigDecimal;
use uuid::Uuid;

/// First day of `today`'s month and first day of the following month.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    let end = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    }
    .unwrap_or(start);
    (start, end)
}

/// Balances per currency, account count and the current month's cash flow.
pub async fn dashboard_stats(
    pool: &DbPool,
    user_id: Uuid,
    today: NaiveDate,
) -> Result<DashboardStats, AppError> {
    let total_balance = sqlx::query_as::<_, CurrencyTotal>(
        r#"
        SELECT currency, COALESCE(SUM(balance), 0) AS total
        FROM accounts
        WHERE user_id = $1
        GROUP BY currency
        ORDER BY currency
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let account_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let (start, end) = month_bounds(today);
    let (income, expense): (BigDecimal, BigDecimal) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(amount) FILTER (WHERE kind = 'income'), 0),
               COALESCE(SUM(amount) FILTER (WHERE kind = 'expense'), 0)
        FROM transactions
        WHERE user_id = $1 AND date >= $2 AND date < $3
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        total_balance,
        account_count,
        current_month: MonthSummary::new(income, expense),
    })
}

/// Income and expense totals per calendar year, oldest first.
pub async fn yearly_trend(pool: &DbPool, user_id: Uuid) -> Result<Vec<YearlyTotals>, AppError> {
    let rows = sqlx::query_as::<_, YearlyTotals>(
        r#"
        SELECT EXTRACT(YEAR FROM date)::INT4 AS year,
               COALESCE(SUM(amount) FILTER (WHERE kind = 'income'), 0) AS total_income,
               COALESCE(SUM(amount) FILTER (WHERE kind = 'expense'), 0) AS total_expense
        FROM transactions
        WHERE user_id = $1
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
