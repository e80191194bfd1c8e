//! Personal-finance dashboard: REST API server and typed client.
//!
//! The server side manages accounts, transactions, categories, budgets and
//! balance transfers for authenticated users. The client side (`client`)
//! talks to that API and keeps an owned dashboard state.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries, migrations)
//! - **Authentication**: Bearer token looked up by SHA-256 hash
//! - **Format**: JSON requests/responses wrapped in named envelopes

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::DbPool;

/// Build the HTTP router.
///
/// Everything under `/api` requires a bearer token; `/health` does not.
pub fn router(pool: DbPool) -> Router {
    let api = Router::new()
        // Accounts
        .route(
            "/accounts",
            get(handlers::accounts::list_accounts).post(handlers::accounts::create_account),
        )
        .route(
            "/accounts/{id}",
            put(handlers::accounts::update_account).delete(handlers::accounts::delete_account),
        )
        // Transfers
        .route(
            "/accounts/transfers",
            post(handlers::transfers::create_transfer),
        )
        .route(
            "/accounts/transfers/history",
            get(handlers::transfers::transfer_history),
        )
        // Transactions
        .route(
            "/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(handlers::transactions::get_transaction)
                .put(handlers::transactions::update_transaction)
                .delete(handlers::transactions::delete_transaction),
        )
        // Categories
        .route(
            "/categories",
            get(handlers::categories::list_categories)
                .post(handlers::categories::create_category),
        )
        .route(
            "/categories/{id}",
            put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        // Budgets
        .route(
            "/budgets",
            get(handlers::budgets::list_budgets).post(handlers::budgets::create_budget),
        )
        .route(
            "/budgets/{id}",
            put(handlers::budgets::update_budget).delete(handlers::budgets::delete_budget),
        )
        // Reports
        .route(
            "/reports/dashboard-stats",
            get(handlers::reports::dashboard_stats),
        )
        .route("/reports/yearly-trend", get(handlers::reports::yearly_trend))
        .route_layer(axum_middleware::from_fn_with_state(
            pool.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // The dashboard is served from a different origin
                .layer(CorsLayer::permissive()),
        )
        .with_state(pool)
}
