//! Keyed in-memory container of accounts.
//!
//! The store owns every [`Account`]. It does no locking itself: it is only
//! reachable through the mutex held by
//! [`AccountsService`](super::accounts_service::AccountsService), which makes
//! `create` atomic with respect to concurrent creates of the same identifier.

use std::collections::HashMap;

use crate::{error::LedgerError, models::account::Account};

#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: HashMap<String, Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new account.
    ///
    /// Fails with [`LedgerError::DuplicateAccountId`] when the identifier is
    /// already taken; the existing account is kept as it was.
    pub fn create(&mut self, account: Account) -> Result<(), LedgerError> {
        if self.accounts.contains_key(account.id()) {
            return Err(LedgerError::DuplicateAccountId(account.id().to_string()));
        }
        self.accounts.insert(account.id().to_string(), account);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// Borrow two distinct accounts mutably at the same time.
    ///
    /// Each slot is `None` when that identifier is unknown.
    ///
    /// # Panics
    ///
    /// Panics if `first == second`.
    pub fn get_pair_mut(&mut self, first: &str, second: &str) -> [Option<&mut Account>; 2] {
        self.accounts.get_disjoint_mut([first, second])
    }

    /// Copies of all accounts, ordered by identifier.
    pub fn snapshot(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.id().cmp(b.id()));
        accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Drop every account. Only meant for resetting state between tests.
    pub fn clear(&mut self) {
        self.accounts.clear();
    }
}
