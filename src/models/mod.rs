//! Data models shared by the core and the HTTP layer.

/// Ledger account model
pub mod account;
/// Transfer request model
pub mod transfer;
/// Notification webhook payload
pub mod webhook;
