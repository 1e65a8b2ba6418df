//! In-memory ledger service.
//!
//! Holds account balances and performs atomic, validated transfers between
//! two accounts, notifying both parties once a transfer has committed.
//!
//! # Architecture
//!
//! - **Core**: [`models::account::Account`], [`services::account_store::AccountStore`]
//!   and [`services::accounts_service::AccountsService`]
//! - **Notifications**: [`services::notification_service::Notifier`] implementations
//! - **Web Framework**: Axum handlers in [`handlers`], wired in [`routes::router`]

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use error::{AppError, LedgerError};
pub use models::account::Account;
pub use services::accounts_service::AccountsService;

/// Accounts service shared by all HTTP handlers.
pub type SharedService = Arc<AccountsService>;
