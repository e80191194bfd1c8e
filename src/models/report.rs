//! Aggregate report shapes for the dashboard home screen.

use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;

use super::account::Currency;

/// Sum of balances for one currency. Totals are never converted.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct CurrencyTotal {
    pub currency: Currency,
    pub total: BigDecimal,
}

/// Income and expense over the current calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub income: BigDecimal,
    pub expense: BigDecimal,

    /// `income - expense`
    pub balance: BigDecimal,
}

impl MonthSummary {
    pub fn new(income: BigDecimal, expense: BigDecimal) -> Self {
        let balance = &income - &expense;
        Self {
            income,
            expense,
            balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_balance: Vec<CurrencyTotal>,
    pub account_count: i64,
    pub current_month: MonthSummary,
}

/// `{ "stats": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStatsEnvelope {
    pub stats: DashboardStats,
}

/// Income and expense totals for one calendar year.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct YearlyTotals {
    pub year: i32,
    pub total_income: BigDecimal,
    pub total_expense: BigDecimal,
}

/// `{ "yearlyTrend": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyTrend {
    #[serde(rename = "yearlyTrend")]
    pub yearly_trend: Vec<YearlyTotals>,
}
