//! Budget data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::{ValidationError, to_cents};

/// Span a budget limit applies to. Maps to the `budget_period` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "budget_period", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

/// A spending limit for one category over a period.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub limit_amount: BigDecimal,
    pub period: BudgetPeriod,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating or replacing a budget.
///
/// ```json
/// { "category_id": "770e8400-...", "limit_amount": "300.00", "period": "monthly" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRequest {
    pub category_id: Option<Uuid>,

    pub limit_amount: BigDecimal,

    #[serde(default)]
    pub period: BudgetPeriod,
}

impl BudgetRequest {
    /// Returns the category the budget is scoped to.
    pub fn validate(&self) -> Result<Uuid, ValidationError> {
        let category_id = self
            .category_id
            .ok_or_else(|| ValidationError("Category is required".to_string()))?;
        if to_cents(&self.limit_amount) <= BigDecimal::from(0) {
            return Err(ValidationError(
                "Limit must be greater than zero".to_string(),
            ));
        }
        Ok(category_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub limit_amount: BigDecimal,
    pub period: BudgetPeriod,
    pub created_at: DateTime<Utc>,
}

impl From<Budget> for BudgetResponse {
    fn from(budget: Budget) -> Self {
        Self {
            id: budget.id,
            category_id: budget.category_id,
            limit_amount: budget.limit_amount,
            period: budget.period,
            created_at: budget.created_at,
        }
    }
}

/// `{ "budget": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetEnvelope {
    pub budget: BudgetResponse,
}

/// `{ "budgets": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetList {
    pub budgets: Vec<BudgetResponse>,
}
