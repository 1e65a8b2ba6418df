//! Error types and HTTP error response handling.
//!
//! This module defines the ledger's domain errors and the application error
//! that converts them into HTTP responses with status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Errors produced by the ledger core.
///
/// The messages are part of the public contract: clients and tests compare
/// them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// An account with this identifier already exists. The store is unchanged.
    #[error("Account id {0} already exists!")]
    DuplicateAccountId(String),

    #[error("transfer is not possible with same account")]
    SameAccountTransfer,

    #[error("accountFrom doesn't represent valid account")]
    UnknownSourceAccount,

    #[error("accountTo doesn't represent valid account")]
    UnknownDestinationAccount,

    #[error("Amount to transfer should be more than 0")]
    NonPositiveAmount,

    /// The source balance is lower than the transferred amount.
    ///
    /// Checked at the moment of debit, inside the transfer critical section.
    #[error("Amount transferred shouldn't be more than balance")]
    InsufficientFunds,

    /// A resulting balance would not fit in an exact decimal.
    ///
    /// Checked alongside `InsufficientFunds`; neither account is changed.
    #[error("Resulting balance can't be represented exactly")]
    BalanceOverflow,
}

impl LedgerError {
    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::DuplicateAccountId(_) => "duplicate_account_id",
            LedgerError::SameAccountTransfer => "same_account_transfer",
            LedgerError::UnknownSourceAccount => "unknown_source_account",
            LedgerError::UnknownDestinationAccount => "unknown_destination_account",
            LedgerError::NonPositiveAmount => "non_positive_amount",
            LedgerError::InsufficientFunds => "insufficient_funds",
            LedgerError::BalanceOverflow => "balance_overflow",
        }
    }
}

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Ledger Errors**: Any rejection produced by the core (`LedgerError`)
/// - **Resource Errors**: Requested account not found
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected by the ledger core.
    ///
    /// Returns HTTP 400 Bad Request with the core message.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Requested account does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Account {0} not found")]
    AccountNotFound(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `Ledger` → 400 Bad Request
/// - `AccountNotFound` → 404 Not Found
/// - `InvalidRequest` → 400 Bad Request
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Ledger(ref err) => (StatusCode::BAD_REQUEST, err.code(), err.to_string()),
            AppError::AccountNotFound(_) => {
                (StatusCode::NOT_FOUND, "account_not_found", self.to_string())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_errors_keep_contract_messages() {
        assert_eq!(
            LedgerError::DuplicateAccountId("Id-1".to_string()).to_string(),
            "Account id Id-1 already exists!"
        );
        assert_eq!(
            LedgerError::SameAccountTransfer.to_string(),
            "transfer is not possible with same account"
        );
        assert_eq!(
            LedgerError::UnknownSourceAccount.to_string(),
            "accountFrom doesn't represent valid account"
        );
        assert_eq!(
            LedgerError::UnknownDestinationAccount.to_string(),
            "accountTo doesn't represent valid account"
        );
        assert_eq!(
            LedgerError::NonPositiveAmount.to_string(),
            "Amount to transfer should be more than 0"
        );
        assert_eq!(LedgerError::BalanceOverflow.code(), "balance_overflow");
    }

    #[test]
    fn status_codes() {
        let ledger = AppError::from(LedgerError::InsufficientFunds).into_response();
        assert_eq!(ledger.status(), StatusCode::BAD_REQUEST);

        let missing = AppError::AccountNotFound("ghost".to_string()).into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let invalid = AppError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}
