//! Owned dashboard state and the commands that update it.
//!
//! Writes follow one pattern: issue the command, await the server's
//! authoritative result, then replace only the affected entities.
//! [`Dashboard::refresh`] refetches everything and is always a safe fallback.

use uuid::Uuid;

use super::{ApiClient, ClientError};
use crate::models::{
    account::{AccountResponse, CreateAccountRequest, UpdateAccountRequest},
    budget::{BudgetRequest, BudgetResponse},
    category::{CategoryRequest, CategoryResponse},
    report::{DashboardStats, YearlyTotals},
    transaction::{TransactionQuery, TransactionRequest, TransactionResponse},
    transfer::{TransferHistoryEntry, TransferOutcome, TransferRequest},
};

/// Everything the dashboard views render from.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub accounts: Vec<AccountResponse>,
    pub transfers: Vec<TransferHistoryEntry>,
    pub transactions: Vec<TransactionResponse>,
    pub categories: Vec<CategoryResponse>,
    pub budgets: Vec<BudgetResponse>,
    pub stats: Option<DashboardStats>,
    pub yearly_trend: Vec<YearlyTotals>,

    /// A command is in flight; views disable the triggering control.
    pub busy: bool,

    /// Message from the last failed command, cleared when the next one starts.
    pub error: Option<String>,
}

/// Replace the item with the same id, or put a new one first.
fn upsert<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> Uuid) {
    let key = id(&item);
    match items.iter_mut().find(|existing| id(existing) == key) {
        Some(existing) => *existing = item,
        None => items.insert(0, item),
    }
}

impl DashboardState {
    pub fn account(&self, id: Uuid) -> Option<&AccountResponse> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Mark a command as started.
    pub fn begin(&mut self) {
        self.busy = true;
        self.error = None;
    }

    /// Mark a command as finished, recording the user-facing message on failure.
    pub fn finish<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        self.busy = false;
        if let Err(ref e) = result {
            if e.is_unexpected() {
                tracing::warn!("Dashboard command failed: {}", e);
            } else {
                tracing::debug!("Dashboard command rejected: {}", e);
            }
            self.error = Some(e.user_message());
        }
        result
    }

    pub fn upsert_account(&mut self, account: AccountResponse) {
        upsert(&mut self.accounts, account, |a| a.id);
    }

    /// Drop an account and everything the server cascades with it.
    pub fn remove_account(&mut self, id: Uuid) {
        self.accounts.retain(|a| a.id != id);
        self.transfers
            .retain(|t| t.from_account_id != id && t.to_account_id != id);
        self.transactions.retain(|t| t.account_id != Some(id));
    }

    /// Apply the result of a transfer: both accounts take their new
    /// balances and the transfer heads the history.
    pub fn apply_transfer(&mut self, outcome: TransferOutcome) {
        let TransferOutcome {
            transfer,
            from_account,
            to_account,
        } = outcome;

        self.transfers.insert(
            0,
            TransferHistoryEntry {
                id: transfer.id,
                from_account_id: transfer.from_account_id,
                from_account_name: from_account.name.clone(),
                to_account_id: transfer.to_account_id,
                to_account_name: to_account.name.clone(),
                amount: transfer.amount,
                description: transfer.description,
                created_at: transfer.created_at,
            },
        );
        self.upsert_account(from_account);
        self.upsert_account(to_account);
    }

    pub fn upsert_transaction(&mut self, transaction: TransactionResponse) {
        upsert(&mut self.transactions, transaction, |t| t.id);
    }

    pub fn remove_transaction(&mut self, id: Uuid) {
        self.transactions.retain(|t| t.id != id);
    }

    pub fn upsert_category(&mut self, category: CategoryResponse) {
        upsert(&mut self.categories, category, |c| c.id);
    }

    /// Drop a category; its budgets go with it and transactions lose the reference.
    pub fn remove_category(&mut self, id: Uuid) {
        self.categories.retain(|c| c.id != id);
        self.budgets.retain(|b| b.category_id != id);
        for transaction in &mut self.transactions {
            if transaction.category_id == Some(id) {
                transaction.category_id = None;
            }
        }
    }

    pub fn upsert_budget(&mut self, budget: BudgetResponse) {
        upsert(&mut self.budgets, budget, |b| b.id);
    }

    pub fn remove_budget(&mut self, id: Uuid) {
        self.budgets.retain(|b| b.id != id);
    }
}

/// A client bound to the state it keeps current.
///
/// Commands take `&mut self`, so at most one mutation runs at a time.
#[derive(Debug)]
pub struct Dashboard {
    client: ApiClient,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(client: ApiClient) -> Self {
        Self::with_state(client, DashboardState::default())
    }

    pub fn with_state(client: ApiClient, state: DashboardState) -> Self {
        Self { client, state }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Refetch accounts, transfers, transactions, categories and budgets.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.state.begin();
        let result = async {
            let accounts = self.client.list_accounts().await?;
            let transfers = self.client.transfer_history().await?;
            let transactions = self
                .client
                .list_transactions(&TransactionQuery::default())
                .await?;
            let categories = self.client.list_categories().await?;
            let budgets = self.client.list_budgets().await?;
            Ok::<_, ClientError>((accounts, transfers, transactions, categories, budgets))
        }
        .await;

        let (accounts, transfers, transactions, categories, budgets) = self.state.finish(result)?;
        self.state.accounts = accounts;
        self.state.transfers = transfers;
        self.state.transactions = transactions;
        self.state.categories = categories;
        self.state.budgets = budgets;
        Ok(())
    }

    /// Fetch the home screen aggregates.
    pub async fn load_reports(&mut self) -> Result<(), ClientError> {
        self.state.begin();
        let result = async {
            let stats = self.client.dashboard_stats().await?;
            let trend = self.client.yearly_trend().await?;
            Ok::<_, ClientError>((stats, trend))
        }
        .await;

        let (stats, trend) = self.state.finish(result)?;
        self.state.stats = Some(stats);
        self.state.yearly_trend = trend;
        Ok(())
    }

    pub async fn load_transactions(&mut self, query: &TransactionQuery) -> Result<(), ClientError> {
        self.state.begin();
        let result = self.client.list_transactions(query).await;
        self.state.transactions = self.state.finish(result)?;
        Ok(())
    }

    // Accounts

    pub async fn create_account(
        &mut self,
        request: &CreateAccountRequest,
    ) -> Result<AccountResponse, ClientError> {
        self.state.begin();
        let result = self.client.create_account(request).await;
        let account = self.state.finish(result)?;
        self.state.upsert_account(account.clone());
        Ok(account)
    }

    pub async fn update_account(
        &mut self,
        id: Uuid,
        request: &UpdateAccountRequest,
    ) -> Result<AccountResponse, ClientError> {
        self.state.begin();
        let result = self.client.update_account(id, request).await;
        let account = self.state.finish(result)?;
        self.state.upsert_account(account.clone());
        Ok(account)
    }

    pub async fn delete_account(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.state.begin();
        let result = self.client.delete_account(id).await;
        self.state.finish(result)?;
        self.state.remove_account(id);
        Ok(())
    }

    /// Execute a transfer and apply the returned balances; no refetch.
    pub async fn transfer(
        &mut self,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, ClientError> {
        self.state.begin();
        let result = self.client.create_transfer(request).await;
        let outcome = self.state.finish(result)?;
        self.state.apply_transfer(outcome.clone());
        Ok(outcome)
    }

    // Transactions

    pub async fn create_transaction(
        &mut self,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, ClientError> {
        self.state.begin();
        let result = self.client.create_transaction(request).await;
        let transaction = self.state.finish(result)?;
        self.state.upsert_transaction(transaction.clone());
        Ok(transaction)
    }

    pub async fn update_transaction(
        &mut self,
        id: Uuid,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, ClientError> {
        self.state.begin();
        let result = self.client.update_transaction(id, request).await;
        let transaction = self.state.finish(result)?;
        self.state.upsert_transaction(transaction.clone());
        Ok(transaction)
    }

    pub async fn delete_transaction(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.state.begin();
        let result = self.client.delete_transaction(id).await;
        self.state.finish(result)?;
        self.state.remove_transaction(id);
        Ok(())
    }

    // Categories

    pub async fn create_category(
        &mut self,
        request: &CategoryRequest,
    ) -> Result<CategoryResponse, ClientError> {
        self.state.begin();
        let result = self.client.create_category(request).await;
        let category = self.state.finish(result)?;
        self.state.upsert_category(category.clone());
        Ok(category)
    }

    pub async fn update_category(
        &mut self,
        id: Uuid,
        request: &CategoryRequest,
    ) -> Result<CategoryResponse, ClientError> {
        self.state.begin();
        let result = self.client.update_category(id, request).await;
        let category = self.state.finish(result)?;
        self.state.upsert_category(category.clone());
        Ok(category)
    }

    pub async fn delete_category(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.state.begin();
        let result = self.client.delete_category(id).await;
        self.state.finish(result)?;
        self.state.remove_category(id);
        Ok(())
    }

    // Budgets

    pub async fn create_budget(
        &mut self,
        request: &BudgetRequest,
    ) -> Result<BudgetResponse, ClientError> {
        self.state.begin();
        let result = self.client.create_budget(request).await;
        let budget = self.state.finish(result)?;
        self.state.upsert_budget(budget.clone());
        Ok(budget)
    }

    pub async fn update_budget(
        &mut self,
        id: Uuid,
        request: &BudgetRequest,
    ) -> Result<BudgetResponse, ClientError> {
        self.state.begin();
        let result = self.client.update_budget(id, request).await;
        let budget = self.state.finish(result)?;
        self.state.upsert_budget(budget.clone());
        Ok(budget)
    }

    pub async fn delete_budget(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.state.begin();
        let result = self.client.delete_budget(id).await;
        self.state.finish(result)?;
        self.state.remove_budget(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientConfig, ErrorKind};
    use crate::models::account::{AccountType, Currency};
    use axum::{Json, Router, http::StatusCode, routing::post};
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};
    use sqlx::types::BigDecimal;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn account(name: &str, balance: &str, currency: Currency) -> AccountResponse {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        AccountResponse {
            id: Uuid::new_v4(),
            name: name.to_string(),
            account_type: AccountType::Bank,
            balance: dec(balance),
            currency,
            color: "#10B981".to_string(),
            icon: "wallet".to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    fn with_balance(account: &AccountResponse, balance: &str) -> Value {
        let mut updated = account.clone();
        updated.balance = dec(balance);
        serde_json::to_value(updated).unwrap()
    }

    async fn spawn(app: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        ApiClient::new(ClientConfig {
            api_url: format!("http://{addr}/api"),
            token: Some("token".to_string()),
        })
        .unwrap()
    }

    fn seeded(accounts: Vec<AccountResponse>) -> DashboardState {
        DashboardState {
            accounts,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn successful_transfer_replaces_only_affected_accounts() {
        let a = account("A", "100.00", Currency::Eur);
        let b = account("B", "50.00", Currency::Eur);
        let c = account("C", "5.00", Currency::Eur);

        let body = json!({
            "transfer": {
                "id": Uuid::new_v4(),
                "from_account_id": a.id,
                "to_account_id": b.id,
                "amount": "30.00",
                "description": null,
                "created_at": "2025-06-01T12:00:00Z"
            },
            "from_account": with_balance(&a, "70.00"),
            "to_account": with_balance(&b, "80.00"),
        });
        let app = Router::new().route(
            "/api/accounts/transfers",
            post(move || {
                let body = body.clone();
                async move { (StatusCode::CREATED, Json(body)) }
            }),
        );
        let client = spawn(app).await;
        let mut dashboard =
            Dashboard::with_state(client, seeded(vec![a.clone(), b.clone(), c.clone()]));

        let request = TransferRequest {
            from_account_id: a.id,
            to_account_id: b.id,
            amount: dec("30.00"),
            description: None,
        };
        let outcome = dashboard.transfer(&request).await.unwrap();

        let state = dashboard.state();
        assert_eq!(outcome.transfer.amount, dec("30.00"));
        assert_eq!(state.account(a.id).unwrap().balance, dec("70.00"));
        assert_eq!(state.account(b.id).unwrap().balance, dec("80.00"));
        assert_eq!(state.account(c.id).unwrap(), &c);
        assert_eq!(state.accounts.len(), 3);

        assert_eq!(state.transfers.len(), 1);
        assert_eq!(state.transfers[0].from_account_name, "A");
        assert_eq!(state.transfers[0].to_account_name, "B");
        assert!(!state.busy);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn rejected_transfer_keeps_balances_and_reports_cause() {
        let a = account("A", "10.00", Currency::Eur);
        let b = account("B", "50.00", Currency::Eur);

        let app = Router::new().route(
            "/api/accounts/transfers",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "error": { "code": "insufficient_funds", "message": "Insufficient funds" }
                    })),
                )
            }),
        );
        let client = spawn(app).await;
        let mut dashboard = Dashboard::with_state(client, seeded(vec![a.clone(), b.clone()]));

        let request = TransferRequest {
            from_account_id: a.id,
            to_account_id: b.id,
            amount: dec("50.00"),
            description: None,
        };

        for _ in 0..2 {
            let err = dashboard.transfer(&request).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        }

        let state = dashboard.state();
        assert_eq!(state.account(a.id).unwrap().balance, dec("10.00"));
        assert_eq!(state.account(b.id).unwrap().balance, dec("50.00"));
        assert!(state.transfers.is_empty());
        assert_eq!(state.error.as_deref(), Some("Insufficient funds"));
        assert!(!state.busy);
    }

    #[tokio::test]
    async fn server_failure_surfaces_retry_message() {
        let a = account("A", "100.00", Currency::Eur);
        let b = account("B", "0.00", Currency::Eur);

        let app = Router::new().route(
            "/api/accounts/transfers",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let client = spawn(app).await;
        let mut dashboard = Dashboard::with_state(client, seeded(vec![a.clone(), b.clone()]));

        let request = TransferRequest {
            from_account_id: a.id,
            to_account_id: b.id,
            amount: dec("1.00"),
            description: None,
        };
        dashboard.transfer(&request).await.unwrap_err();

        let state = dashboard.state();
        assert_eq!(
            state.error.as_deref(),
            Some(crate::client::error::RETRY_MESSAGE)
        );
        assert_eq!(state.account(a.id).unwrap().balance, dec("100.00"));
    }

    #[test]
    fn removing_account_mirrors_cascade() {
        let a = account("A", "1", Currency::Eur);
        let b = account("B", "1", Currency::Eur);
        let mut state = seeded(vec![a.clone(), b.clone()]);
        state.transfers.push(TransferHistoryEntry {
            id: Uuid::new_v4(),
            from_account_id: a.id,
            from_account_name: "A".into(),
            to_account_id: b.id,
            to_account_name: "B".into(),
            amount: dec("1"),
            description: None,
            created_at: Utc::now(),
        });

        state.remove_account(a.id);

        assert!(state.account(a.id).is_none());
        assert!(state.account(b.id).is_some());
        assert!(state.transfers.is_empty());
    }

    #[test]
    fn upsert_prepends_new_and_replaces_existing() {
        let a = account("A", "1", Currency::Eur);
        let b = account("B", "1", Currency::Usd);
        let mut state = seeded(vec![a.clone()]);

        state.upsert_account(b.clone());
        assert_eq!(state.accounts[0].id, b.id);

        let mut renamed = a.clone();
        renamed.name = "Renamed".into();
        state.upsert_account(renamed);
        assert_eq!(state.accounts.len(), 2);
        assert_eq!(state.account(a.id).unwrap().name, "Renamed");
    }

    #[test]
    fn finish_clears_busy_and_keeps_error() {
        let mut state = DashboardState::default();
        state.begin();
        assert!(state.busy);

        let result: Result<(), ClientError> = Err(ClientError::Rejected {
            kind: ErrorKind::InvalidAmount,
            message: "Amount must be greater than zero".into(),
        });
        assert!(state.finish(result).is_err());
        assert!(!state.busy);
        assert_eq!(
            state.error.as_deref(),
            Some("Amount must be greater than zero")
        );

        state.begin();
        assert!(state.error.is_none());
    }
}
