//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They own the account state, enforce the transfer rules and notify
//! account holders.

pub mod account_store;
pub mod accounts_service;
pub mod notification_service;
