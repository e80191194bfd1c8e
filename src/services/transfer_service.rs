//! Transfer service - moves balance between two accounts of one user.
//!
//! This service handles:
//! - Request validation (same account, non-positive amount)
//! - Ownership, currency and funds checks against locked rows
//! - Atomic balance updates plus the transfer record
//!
//! # Atomicity Guarantees
//!
//! Both balance updates and the transfer insert run inside one PostgreSQL
//! transaction. Both account rows are locked `FOR UPDATE` in ascending id
//! order, so concurrent transfers touching the same account serialize and
//! cannot deadlock on lock order. Any error before `commit` rolls everything
//! back.

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::Account,
        to_cents,
        transfer::{Transfer, TransferHistoryEntry, TransferOutcome, TransferRequest},
    },
};
use sqlx::types::BigDecimal;
use uuid::Uuid;

/// New balances for both sides of an accepted transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub from_balance: BigDecimal,
    pub to_balance: BigDecimal,
}

/// Checks that need no storage access, in order:
/// same account first, then amount.
///
/// Returns the amount rounded to cents. Anything that rounds to zero is an
/// `InvalidAmount`, and the rounded value is the only one used afterwards.
pub fn validate_request(
    from_account_id: Uuid,
    to_account_id: Uuid,
    amount: &BigDecimal,
) -> Result<BigDecimal, AppError> {
    if from_account_id == to_account_id {
        return Err(AppError::InvalidTransfer);
    }
    let amount = to_cents(amount);
    if amount <= BigDecimal::from(0) {
        return Err(AppError::InvalidAmount);
    }
    Ok(amount)
}

/// Pick the source and destination out of the rows loaded for the user.
///
/// A missing row means the account does not exist or belongs to someone else.
pub fn locate(
    rows: Vec<Account>,
    from_account_id: Uuid,
    to_account_id: Uuid,
) -> Result<(Account, Account), AppError> {
    let mut from = None;
    let mut to = None;
    for account in rows {
        if account.id == from_account_id {
            from = Some(account);
        } else if account.id == to_account_id {
            to = Some(account);
        }
    }
    match (from, to) {
        (Some(from), Some(to)) => Ok((from, to)),
        _ => Err(AppError::AccountNotFound),
    }
}

/// Apply the currency and funds rules and compute both new balances.
///
/// Only account types that allow a negative balance may be overdrawn.
pub fn settle(from: &Account, to: &Account, amount: &BigDecimal) -> Result<Settlement, AppError> {
    if from.currency != to.currency {
        return Err(AppError::CurrencyMismatch);
    }
    if from.balance < *amount && !from.account_type.allows_negative_balance() {
        return Err(AppError::InsufficientFunds);
    }
    Ok(Settlement {
        from_balance: &from.balance - amount,
        to_balance: &to.balance + amount,
    })
}

/// Execute a transfer for `user_id`.
///
/// # Process
///
/// 1. Validate the request (no storage access)
/// 2. Start database transaction
/// 3. Lock both accounts owned by the user
/// 4. Check currency and funds
/// 5. Write both balances and record the transfer
/// 6. Commit (or rollback on error)
///
/// # Returns
///
/// The transfer plus both updated accounts, so callers can refresh without
/// a second fetch.
///
/// # Errors
///
/// - `InvalidTransfer`: source and destination are the same
/// - `InvalidAmount`: amount is zero or negative once rounded to cents
/// - `AccountNotFound`: an account is missing or not owned by the user
/// - `CurrencyMismatch`: the accounts hold different currencies
/// - `InsufficientFunds`: source cannot cover the amount
/// - `Database`: storage failure; nothing was applied
pub async fn execute(
    pool: &DbPool,
    user_id: Uuid,
    request: TransferRequest,
) -> Result<TransferOutcome, AppError> {
    let TransferRequest {
        from_account_id,
        to_account_id,
        amount,
        description,
    } = request;

    let amount = validate_request(from_account_id, to_account_id, &amount)?;

    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let mut tx = pool.begin().await?;

    // Lock both rows in a fixed order
    let rows = sqlx::query_as::<_, Account>(
        r#"
        SELECT * FROM accounts
        WHERE id = ANY($1) AND user_id = $2
        ORDER BY id
        FOR UPDATE
        "#,
    )
    .bind(vec![from_account_id, to_account_id])
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    let checked = locate(rows, from_account_id, to_account_id).and_then(|(from, to)| {
        let settlement = settle(&from, &to, &amount)?;
        Ok((from, to, settlement))
    });

    let (from, to, settlement) = match checked {
        Ok(checked) => checked,
        Err(e) => {
            tx.rollback().await?;
            tracing::warn!(
                %from_account_id,
                %to_account_id,
                %amount,
                "Transfer rejected: {}",
                e
            );
            return Err(e);
        }
    };

    let from_account = sqlx::query_as::<_, Account>(
        "UPDATE accounts SET balance = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(&settlement.from_balance)
    .bind(from.id)
    .fetch_one(&mut *tx)
    .await?;

    let to_account = sqlx::query_as::<_, Account>(
        "UPDATE accounts SET balance = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(&settlement.to_balance)
    .bind(to.id)
    .fetch_one(&mut *tx)
    .await?;

    let transfer = sqlx::query_as::<_, Transfer>(
        r#"
        INSERT INTO transfers (user_id, from_account_id, to_account_id, amount, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(from.id)
    .bind(to.id)
    .bind(&amount)
    .bind(description)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        transfer_id = %transfer.id,
        %from_account_id,
        %to_account_id,
        %amount,
        "Transfer completed"
    );

    Ok(TransferOutcome {
        transfer: transfer.into(),
        from_account: from_account.into(),
        to_account: to_account.into(),
    })
}

/// List past transfers for `user_id`, newest first, with both account names.
pub async fn history(pool: &DbPool, user_id: Uuid) -> Result<Vec<TransferHistoryEntry>, AppError> {
    let entries = sqlx::query_as::<_, TransferHistoryEntry>(
        r#"
        SELECT t.id,
               t.from_account_id,
               fa.name AS from_account_name,
               t.to_account_id,
               ta.name AS to_account_name,
               t.amount,
               t.description,
               t.created_at
        FROM transfers t
        JOIN accounts fa ON fa.id = t.from_account_id
        JOIN accounts ta ON ta.id = t.to_account_id
        WHERE t.user_id = $1
        ORDER BY t.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::{AccountType, Currency};
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn account(balance: &str, currency: Currency, account_type: AccountType) -> Account {
        Account {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: "test account".to_string(),
            account_type,
            balance: dec(balance),
            currency,
            color: "#10B981".to_string(),
            icon: "wallet".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn transfer_moves_amount_between_accounts() {
        let a = account("100.00", Currency::Eur, AccountType::Bank);
        let b = account("50.00", Currency::Eur, AccountType::Bank);

        validate_request(a.id, b.id, &dec("30.00")).unwrap();
        let settlement = settle(&a, &b, &dec("30.00")).unwrap();

        assert_eq!(settlement.from_balance, dec("70.00"));
        assert_eq!(settlement.to_balance, dec("80.00"));
    }

    #[test]
    fn balance_deltas_sum_to_zero() {
        let a = account("12.34", Currency::Gbp, AccountType::Savings);
        let b = account("-3.21", Currency::Gbp, AccountType::CreditCard);
        let amount = dec("7.05");

        let settlement = settle(&a, &b, &amount).unwrap();
        let from_delta = &settlement.from_balance - &a.balance;
        let to_delta = &settlement.to_balance - &b.balance;

        assert_eq!(from_delta, -amount.clone());
        assert_eq!(to_delta, amount);
        assert_eq!(from_delta + to_delta, BigDecimal::from(0));
    }

    #[test]
    fn same_account_is_invalid_transfer() {
        let id = Uuid::new_v4();
        let err = validate_request(id, id, &dec("10")).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransfer));
    }

    #[test]
    fn same_account_is_checked_before_amount() {
        let id = Uuid::new_v4();
        let err = validate_request(id, id, &dec("-1")).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransfer));
    }

    #[test]
    fn non_positive_amounts_are_invalid() {
        for amount in ["0", "0.00", "-5.00"] {
            let err = validate_request(Uuid::new_v4(), Uuid::new_v4(), &dec(amount)).unwrap_err();
            assert!(matches!(err, AppError::InvalidAmount), "amount {amount}");
        }
    }

    #[test]
    fn repeated_invalid_request_yields_same_error() {
        let (from, to) = (Uuid::new_v4(), Uuid::new_v4());
        for _ in 0..3 {
            let err = validate_request(from, to, &dec("0")).unwrap_err();
            assert_eq!(err.code(), "invalid_amount");
        }
    }

    #[test]
    fn sub_cent_amounts_are_invalid() {
        for amount in ["0.001", "0.005", "0.0049"] {
            let err = validate_request(Uuid::new_v4(), Uuid::new_v4(), &dec(amount)).unwrap_err();
            assert!(matches!(err, AppError::InvalidAmount), "amount {amount}");
        }
    }

    #[test]
    fn fractional_cents_settle_without_creating_money() {
        let a = account("10.00", Currency::Eur, AccountType::Bank);
        let b = account("50.00", Currency::Eur, AccountType::Bank);

        let amount = validate_request(a.id, b.id, &dec("1.005")).unwrap();
        assert_eq!(amount, dec("1.00"));

        let settlement = settle(&a, &b, &amount).unwrap();
        assert_eq!(settlement.from_balance, dec("9.00"));
        assert_eq!(settlement.to_balance, dec("51.00"));
        assert_eq!(
            (&settlement.from_balance - &a.balance) + (&settlement.to_balance - &b.balance),
            BigDecimal::from(0)
        );
    }

    #[test]
    fn json_float_amount_can_empty_an_account() {
        let a = account("0.10", Currency::Usd, AccountType::Cash);
        let b = account("0.00", Currency::Usd, AccountType::Cash);
        let request: TransferRequest = serde_json::from_value(serde_json::json!({
            "from_account_id": a.id,
            "to_account_id": b.id,
            "amount": 0.1
        }))
        .unwrap();

        let amount = validate_request(a.id, b.id, &request.amount).unwrap();
        let settlement = settle(&a, &b, &amount).unwrap();

        assert_eq!(settlement.from_balance, BigDecimal::from(0));
        assert_eq!(settlement.to_balance, dec("0.10"));
    }

    #[test]
    fn insufficient_funds_leaves_balances_alone() {
        let a = account("10.00", Currency::Eur, AccountType::Bank);
        let b = account("50.00", Currency::Eur, AccountType::Bank);

        let err = settle(&a, &b, &dec("50.00")).unwrap_err();

        assert!(matches!(err, AppError::InsufficientFunds));
        assert_eq!(a.balance, dec("10.00"));
        assert_eq!(b.balance, dec("50.00"));
    }

    #[test]
    fn exact_balance_can_be_transferred() {
        let a = account("10.00", Currency::Eur, AccountType::Cash);
        let b = account("0", Currency::Eur, AccountType::Cash);

        let settlement = settle(&a, &b, &dec("10.00")).unwrap();
        assert_eq!(settlement.from_balance, BigDecimal::from(0));
    }

    #[test]
    fn credit_cards_may_go_negative() {
        let card = account("10.00", Currency::Eur, AccountType::CreditCard);
        let bank = account("0.00", Currency::Eur, AccountType::Bank);

        let settlement = settle(&card, &bank, &dec("50.00")).unwrap();
        assert_eq!(settlement.from_balance, dec("-40.00"));
        assert_eq!(settlement.to_balance, dec("50.00"));
    }

    #[test]
    fn currency_mismatch_is_rejected() {
        let a = account("100.00", Currency::Eur, AccountType::Bank);
        let c = account("100.00", Currency::Usd, AccountType::Bank);

        let err = settle(&a, &c, &dec("1.00")).unwrap_err();
        assert!(matches!(err, AppError::CurrencyMismatch));
    }

    #[test]
    fn currency_is_checked_before_funds() {
        let a = account("1.00", Currency::Eur, AccountType::Bank);
        let c = account("0.00", Currency::Usd, AccountType::Bank);

        let err = settle(&a, &c, &dec("500.00")).unwrap_err();
        assert!(matches!(err, AppError::CurrencyMismatch));
    }

    #[test]
    fn locate_finds_both_sides_in_any_order() {
        let a = account("1", Currency::Eur, AccountType::Bank);
        let b = account("2", Currency::Eur, AccountType::Bank);
        let (a_id, b_id) = (a.id, b.id);

        let (from, to) = locate(vec![b, a], a_id, b_id).unwrap();
        assert_eq!(from.id, a_id);
        assert_eq!(to.id, b_id);
    }

    #[test]
    fn locate_reports_missing_or_foreign_accounts() {
        let a = account("1", Currency::Eur, AccountType::Bank);
        let a_id = a.id;

        let err = locate(vec![a], a_id, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::AccountNotFound));

        let err = locate(vec![], Uuid::new_v4(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::AccountNotFound));
    }

    mod stored {
        use super::*;
        use crate::db::testing;

        fn request(from: Uuid, to: Uuid, amount: &str) -> TransferRequest {
            TransferRequest {
                from_account_id: from,
                to_account_id: to,
                amount: dec(amount),
                description: None,
            }
        }

        #[tokio::test]
        async fn transfer_updates_stored_balances() {
            let Some(pool) = testing::pool().await else { return };
            let user = testing::user(&pool).await;
            let a = testing::account(&pool, user, "100.00", Currency::Eur, AccountType::Bank).await;
            let b = testing::account(&pool, user, "50.00", Currency::Eur, AccountType::Bank).await;

            let outcome = execute(&pool, user, request(a.id, b.id, "30.00")).await.unwrap();

            assert_eq!(outcome.from_account.balance, dec("70.00"));
            assert_eq!(outcome.to_account.balance, dec("80.00"));
            assert_eq!(testing::balance(&pool, a.id).await, dec("70.00"));
            assert_eq!(testing::balance(&pool, b.id).await, dec("80.00"));

            let history = history(&pool, user).await.unwrap();
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].id, outcome.transfer.id);
            assert_eq!(history[0].amount, dec("30.00"));
            assert_eq!(history[0].from_account_name, a.name);
        }

        #[tokio::test]
        async fn insufficient_funds_changes_nothing() {
            let Some(pool) = testing::pool().await else { return };
            let user = testing::user(&pool).await;
            let a = testing::account(&pool, user, "10.00", Currency::Eur, AccountType::Bank).await;
            let b = testing::account(&pool, user, "50.00", Currency::Eur, AccountType::Bank).await;

            let err = execute(&pool, user, request(a.id, b.id, "50.00")).await.unwrap_err();

            assert!(matches!(err, AppError::InsufficientFunds));
            assert_eq!(testing::balance(&pool, a.id).await, dec("10.00"));
            assert_eq!(testing::balance(&pool, b.id).await, dec("50.00"));
            assert_eq!(testing::transfer_count(&pool, user).await, 0);
        }

        #[tokio::test]
        async fn another_users_account_is_not_found() {
            let Some(pool) = testing::pool().await else { return };
            let owner = testing::user(&pool).await;
            let stranger = testing::user(&pool).await;
            let mine = testing::account(&pool, owner, "100.00", Currency::Eur, AccountType::Bank).await;
            let theirs =
                testing::account(&pool, stranger, "0.00", Currency::Eur, AccountType::Bank).await;

            let err = execute(&pool, owner, request(mine.id, theirs.id, "5.00"))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::AccountNotFound));

            let err = execute(&pool, stranger, request(mine.id, theirs.id, "5.00"))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::AccountNotFound));

            assert_eq!(testing::balance(&pool, mine.id).await, dec("100.00"));
            assert_eq!(testing::balance(&pool, theirs.id).await, dec("0.00"));
        }

        #[tokio::test]
        async fn failed_insert_rolls_back_both_balances() {
            let Some(pool) = testing::pool().await else { return };
            let user = testing::user(&pool).await;
            let a = testing::account(&pool, user, "100.00", Currency::Usd, AccountType::Bank).await;
            let b = testing::account(&pool, user, "50.00", Currency::Usd, AccountType::Bank).await;

            // Postgres rejects NUL in text, so the insert fails after both balance writes
            let mut req = request(a.id, b.id, "30.00");
            req.description = Some("bad\0description".to_string());
            let err = execute(&pool, user, req).await.unwrap_err();

            assert!(matches!(err, AppError::Database(_)));
            assert_eq!(testing::balance(&pool, a.id).await, dec("100.00"));
            assert_eq!(testing::balance(&pool, b.id).await, dec("50.00"));
            assert_eq!(testing::transfer_count(&pool, user).await, 0);
        }

        #[tokio::test]
        async fn stored_amounts_are_whole_cents() {
            let Some(pool) = testing::pool().await else { return };
            let user = testing::user(&pool).await;
            let a = testing::account(&pool, user, "10.00", Currency::Gbp, AccountType::Bank).await;
            let b = testing::account(&pool, user, "50.00", Currency::Gbp, AccountType::Bank).await;

            for amount in ["0.005", "0.001"] {
                let err = execute(&pool, user, request(a.id, b.id, amount)).await.unwrap_err();
                assert!(matches!(err, AppError::InvalidAmount), "amount {amount}");
            }

            let outcome = execute(&pool, user, request(a.id, b.id, "1.005")).await.unwrap();
            assert_eq!(outcome.transfer.amount, dec("1.00"));

            let from_delta = testing::balance(&pool, a.id).await - dec("10.00");
            let to_delta = testing::balance(&pool, b.id).await - dec("50.00");
            assert_eq!(from_delta, dec("-1.00"));
            assert_eq!(from_delta + to_delta, BigDecimal::from(0));
        }
    }
}
