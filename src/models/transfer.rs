//! Transfer request model.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Query parameters of `POST /v1/accounts/transfer`.
///
/// # Example
///
/// ```text
/// POST /v1/accounts/transfer?accountFrom=acc-1&accountTo=acc-2&amount=5
/// ```
///
/// Only presence and decimal syntax are checked while extracting; sign and
/// account checks are done by the transfer itself so the error precedence
/// stays the same regardless of the transport.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub account_from: String,
    pub account_to: String,
    pub amount: Decimal,
}
