//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: In-memory balance cell owned by the account store
//! - `CreateAccountRequest`: Request body for creating accounts
//! - `AccountResponse`: Response body returned to clients

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A single ledger account.
///
/// # Balance Storage
///
/// Balances are exact decimals (`rust_decimal::Decimal`), never floats, so
/// `100.0 - 5` is exactly `95.0`.
///
/// # Concurrency
///
/// `debit` and `credit` take `&mut self` and perform no locking of their own.
/// Accounts live inside the [`AccountStore`](crate::services::account_store::AccountStore),
/// and the only way to reach them mutably is through the store lock held by
/// [`AccountsService`](crate::services::accounts_service::AccountsService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: String,
    balance: Decimal,
}

impl Account {
    /// Create an account with a zero balance.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_balance(id, Decimal::ZERO)
    }

    /// Create an account with an opening balance.
    pub fn with_balance(id: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id: id.into(),
            balance,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Take `amount` out of the account.
    ///
    /// # Errors
    ///
    /// - `InsufficientFunds`: the balance is lower than `amount`
    /// - `BalanceOverflow`: the new balance can't be held exactly
    ///
    /// The account is left untouched on error.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if self.balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }
        self.balance = exact(self.balance.checked_sub(amount), self.balance, amount)?;
        Ok(())
    }

    /// Add `amount` to the account.
    ///
    /// There is no business ceiling; only a result that `Decimal` cannot hold
    /// exactly is rejected with `BalanceOverflow`, leaving the account untouched.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.balance = exact(self.balance.checked_add(amount), self.balance, amount)?;
        Ok(())
    }
}

/// Accept `result` only if no digits were lost computing it from `a` and `b`.
///
/// `Decimal` keeps the larger operand scale on exact addition and subtraction
/// and only lowers it when it has to round.
fn exact(result: Option<Decimal>, a: Decimal, b: Decimal) -> Result<Decimal, LedgerError> {
    result
        .filter(|r| r.scale() >= a.scale().max(b.scale()))
        .ok_or(LedgerError::BalanceOverflow)
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "accountId": "Id-123",
///   "balance": 1000
/// }
/// ```
///
/// # Validation
///
/// Both fields are required; see [`CreateAccountRequest::validate`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub account_id: String,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
}

impl CreateAccountRequest {
    /// Check the input shape before the request reaches the core.
    ///
    /// Returns the reason as a human-readable message.
    pub fn validate(&self) -> Result<(), String> {
        if self.account_id.is_empty() {
            return Err("accountId must not be empty".to_string());
        }
        if self.balance < Decimal::ZERO {
            return Err("Initial balance must be positive.".to_string());
        }
        Ok(())
    }
}

impl From<CreateAccountRequest> for Account {
    fn from(request: CreateAccountRequest) -> Self {
        Account::with_balance(request.account_id, request.balance)
    }
}

/// Response body for account endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "accountId": "Id-123",
///   "balance": 123.45
/// }
/// ```
///
/// The balance is written as a JSON number with every digit preserved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account_id: String,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.id,
            balance: account.balance,
        }
    }
}
