//! Category data models.
//!
//! A category is a user-defined label with a display color, used to
//! classify transactions and to scope budgets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating or replacing a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError("Category name is required".to_string()));
        }
        Ok(())
    }
}

fn default_color() -> String {
    "#10B981".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            color: category.color,
            description: category.description,
            created_at: category.created_at,
        }
    }
}

/// `{ "category": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEnvelope {
    pub category: CategoryResponse,
}

/// `{ "categories": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<CategoryResponse>,
}
