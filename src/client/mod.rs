//! Dashboard-side access to the finance API.
//!
//! - [`ApiClient`]: one typed method per REST endpoint
//! - [`DashboardState`] / [`Dashboard`]: the owned state a UI renders from,
//!   updated from authoritative server responses

pub mod api;
pub mod error;
pub mod state;

pub use api::ApiClient;
pub use error::{ClientError, ErrorKind};
pub use state::{Dashboard, DashboardState};

use serde::Deserialize;

/// Client configuration.
///
/// # Environment Variables
///
/// - `DASHBOARD_API_URL` (optional): base URL of the API, defaults to
///   `http://localhost:4000/api`
/// - `DASHBOARD_TOKEN` (optional): bearer token; without it requests carry
///   no `Authorization` header
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub token: Option<String>,
}

fn default_api_url() -> String {
    "http://localhost:4000/api".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
        }
    }
}

impl ClientConfig {
    /// Load `DASHBOARD_*` variables, after an optional `.env` file.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::prefixed("DASHBOARD_").from_env::<ClientConfig>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_variables() {
        let vars = vec![
            (
                "DASHBOARD_API_URL".to_string(),
                "https://finance.example.com/api".to_string(),
            ),
            ("DASHBOARD_TOKEN".to_string(), "t0ken".to_string()),
        ];
        let config: ClientConfig = envy::prefixed("DASHBOARD_").from_iter(vars).unwrap();

        assert_eq!(config.api_url, "https://finance.example.com/api");
        assert_eq!(config.token.as_deref(), Some("t0ken"));
    }

    #[test]
    fn defaults_without_variables() {
        let config: ClientConfig = envy::prefixed("DASHBOARD_")
            .from_iter(Vec::<(String, String)>::new())
            .unwrap();

        assert_eq!(config.api_url, "http://localhost:4000/api");
        assert!(config.token.is_none());
    }
}
