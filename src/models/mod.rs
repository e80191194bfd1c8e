//! Data models shared by the server handlers and the dashboard client.
//!
//! Database entities derive `sqlx::FromRow`; the `*Response`, `*Request`
//! and envelope types are the JSON wire format.

/// Bank, cash, card, savings and investment accounts
pub mod account;
/// Bearer token authentication model
pub mod api_token;
pub mod budget;
pub mod category;
/// Dashboard aggregates
pub mod report;
pub mod transaction;
/// Balance transfers between accounts
pub mod transfer;

use bigdecimal::RoundingMode;
use sqlx::types::BigDecimal;

use crate::error::AppError;

/// Round a money amount to cents, half to even.
///
/// Amounts are stored as `NUMERIC(14,2)`. Every amount is rounded here before
/// it is checked or written, so the stored value is exactly the one validated.
pub fn to_cents(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfEven)
}

/// A required field is missing or malformed.
///
/// Raised by the `validate()` methods on request types, which both the
/// client (before sending) and the server (on receipt) call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidRequest(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn cents_round_half_to_even() {
        assert_eq!(to_cents(&dec("0.005")), dec("0.00"));
        assert_eq!(to_cents(&dec("0.015")), dec("0.02"));
        assert_eq!(to_cents(&dec("1.005")), dec("1.00"));
        assert_eq!(to_cents(&dec("0.001")), dec("0.00"));
        assert_eq!(to_cents(&dec("30")), dec("30.00"));
    }

    #[test]
    fn json_float_amounts_become_exact_cents() {
        let parsed: BigDecimal = serde_json::from_str("0.1").unwrap();
        assert_eq!(to_cents(&parsed), dec("0.10"));
    }
}
