//! Typed REST client for the finance API.
//!
//! Every request carries `Authorization: Bearer <token>` when a token is
//! configured and no `Authorization` header otherwise. There is no retry;
//! timeouts are reqwest's defaults.

use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;
use uuid::Uuid;

use super::{ClientConfig, ClientError};
use crate::{
    models::{
        account::{
            AccountEnvelope, AccountList, AccountResponse, CreateAccountRequest,
            UpdateAccountRequest,
        },
        budget::{BudgetEnvelope, BudgetList, BudgetRequest, BudgetResponse},
        category::{CategoryEnvelope, CategoryList, CategoryRequest, CategoryResponse},
        report::{DashboardStats, DashboardStatsEnvelope, YearlyTotals, YearlyTrend},
        transaction::{
            TransactionEnvelope, TransactionList, TransactionQuery, TransactionRequest,
            TransactionResponse,
        },
        transfer::{TransferHistory, TransferHistoryEntry, TransferOutcome, TransferRequest},
    },
    services::transfer_service,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    /// Always ends with `/` so relative joins keep the path prefix
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut api_url = config.api_url;
        if !api_url.ends_with('/') {
            api_url.push('/');
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base: Url::parse(&api_url)?,
            token: config.token.filter(|t| !t.is_empty()),
        })
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base.join(path)?;
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(ClientError::from_response(status, &body));
        }
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(builder: RequestBuilder) -> Result<(), ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(ClientError::from_response(status, &body));
        }
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        Self::send(self.request(Method::GET, path)?).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        Self::send(self.request(Method::POST, path)?.json(body)).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        Self::send(self.request(Method::PUT, path)?.json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        Self::send_empty(self.request(Method::DELETE, path)?).await
    }

    // Accounts

    pub async fn list_accounts(&self) -> Result<Vec<AccountResponse>, ClientError> {
        let list: AccountList = self.get("accounts").await?;
        Ok(list.accounts)
    }

    pub async fn create_account(
        &self,
        request: &CreateAccountRequest,
    ) -> Result<AccountResponse, ClientError> {
        request.validate()?;
        let envelope: AccountEnvelope = self.post("accounts", request).await?;
        Ok(envelope.account)
    }

    pub async fn update_account(
        &self,
        id: Uuid,
        request: &UpdateAccountRequest,
    ) -> Result<AccountResponse, ClientError> {
        request.validate()?;
        let envelope: AccountEnvelope = self.put(&format!("accounts/{id}"), request).await?;
        Ok(envelope.account)
    }

    pub async fn delete_account(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("accounts/{id}")).await
    }

    // Transfers

    /// Execute a transfer.
    ///
    /// Same-account and non-positive-amount requests are refused locally with
    /// the same error the server would return, without a network call. The
    /// amount is sent rounded to cents.
    pub async fn create_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, ClientError> {
        let amount = transfer_service::validate_request(
            request.from_account_id,
            request.to_account_id,
            &request.amount,
        )?;
        let request = TransferRequest {
            amount,
            ..request.clone()
        };
        self.post("accounts/transfers", &request).await
    }

    pub async fn transfer_history(&self) -> Result<Vec<TransferHistoryEntry>, ClientError> {
        let history: TransferHistory = self.get("accounts/transfers/history").await?;
        Ok(history.transfers)
    }

    // Transactions

    pub async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionResponse>, ClientError> {
        let builder = self.request(Method::GET, "transactions")?.query(query);
        let list: TransactionList = Self::send(builder).await?;
        Ok(list.transactions)
    }

    pub async fn get_transaction(&self, id: Uuid) -> Result<TransactionResponse, ClientError> {
        let envelope: TransactionEnvelope = self.get(&format!("transactions/{id}")).await?;
        Ok(envelope.transaction)
    }

    pub async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, ClientError> {
        request.validate()?;
        let envelope: TransactionEnvelope = self.post("transactions", request).await?;
        Ok(envelope.transaction)
    }

    pub async fn update_transaction(
        &self,
        id: Uuid,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, ClientError> {
        request.validate()?;
        let envelope: TransactionEnvelope =
            self.put(&format!("transactions/{id}"), request).await?;
        Ok(envelope.transaction)
    }

    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("transactions/{id}")).await
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<CategoryResponse>, ClientError> {
        let list: CategoryList = self.get("categories").await?;
        Ok(list.categories)
    }

    pub async fn create_category(
        &self,
        request: &CategoryRequest,
    ) -> Result<CategoryResponse, ClientError> {
        request.validate()?;
        let envelope: CategoryEnvelope = self.post("categories", request).await?;
        Ok(envelope.category)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        request: &CategoryRequest,
    ) -> Result<CategoryResponse, ClientError> {
        request.validate()?;
        let envelope: CategoryEnvelope = self.put(&format!("categories/{id}"), request).await?;
        Ok(envelope.category)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("categories/{id}")).await
    }

    // Budgets

    pub async fn list_budgets(&self) -> Result<Vec<BudgetResponse>, ClientError> {
        let list: BudgetList = self.get("budgets").await?;
        Ok(list.budgets)
    }

    pub async fn create_budget(&self, request: &BudgetRequest) -> Result<BudgetResponse, ClientError> {
        request.validate()?;
        let envelope: BudgetEnvelope = self.post("budgets", request).await?;
        Ok(envelope.budget)
    }

    pub async fn update_budget(
        &self,
        id: Uuid,
        request: &BudgetRequest,
    ) -> Result<BudgetResponse, ClientError> {
        request.validate()?;
        let envelope: BudgetEnvelope = self.put(&format!("budgets/{id}"), request).await?;
        Ok(envelope.budget)
    }

    pub async fn delete_budget(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("budgets/{id}")).await
    }

    // Reports

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        let envelope: DashboardStatsEnvelope = self.get("reports/dashboard-stats").await?;
        Ok(envelope.stats)
    }

    pub async fn yearly_trend(&self) -> Result<Vec<YearlyTotals>, ClientError> {
        let trend: YearlyTrend = self.get("reports/yearly-trend").await?;
        Ok(trend.yearly_trend)
    }
}
