//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /v1/accounts - Create new account
//! - GET /v1/accounts - List all accounts
//! - GET /v1/accounts/{id} - Get account by ID
//! - POST /v1/accounts/transfer - Move money between two accounts

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::{
    SharedService,
    error::AppError,
    models::{
        account::{Account, AccountResponse, CreateAccountRequest},
        transfer::TransferRequest,
    },
};

/// Create a new account.
///
/// # Request Body
///
/// ```json
/// {
///   "accountId": "Id-123",
///   "balance": 1000
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created account
/// - **Error (400)**: Missing/empty id, missing/negative balance, malformed body,
///   or an account with the same id already exists
pub async fn create_account(
    State(service): State<SharedService>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    // Map axum's 415/422 rejections onto 400
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    request.validate().map_err(AppError::InvalidRequest)?;

    let account = Account::from(request);
    service.create_account(account.clone())?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Get a specific account by ID.
///
/// # Response
///
/// - **Success (200 OK)**: `{"accountId": "...", "balance": 123.45}`
/// - **Error (404)**: Account not found
pub async fn get_account(
    State(service): State<SharedService>,
    Path(account_id): Path<String>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = service
        .get_account(&account_id)
        .ok_or(AppError::AccountNotFound(account_id))?;

    Ok(Json(account.into()))
}

/// List all accounts, ordered by id.
pub async fn list_accounts(State(service): State<SharedService>) -> Json<Vec<AccountResponse>> {
    let responses = service
        .list_accounts()
        .into_iter()
        .map(Into::into)
        .collect();

    Json(responses)
}

/// Transfer money between accounts.
///
/// # Endpoint
///
/// `POST /v1/accounts/transfer?accountFrom=acc-1&accountTo=acc-2&amount=5`
///
/// # Response
///
/// - **Success (202 Accepted)**: The transfer committed
/// - **Error (400)**: Missing or malformed parameters, or any transfer rejection
///   (same account, unknown account, non-positive amount, insufficient funds)
pub async fn transfer(
    State(service): State<SharedService>,
    params: Result<Query<TransferRequest>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let Query(request) = params.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    service.transfer(&request.account_from, &request.account_to, request.amount)?;

    Ok(StatusCode::ACCEPTED)
}
