//! Accounts service - core business logic for account transfers.
//!
//! This service handles:
//! - Account creation with unique identifiers
//! - Transfer validation in a fixed precedence
//! - Atomic debit/credit of two accounts
//! - Post-commit notification of both parties
//!
//! # Atomicity Guarantees
//!
//! The store lives behind one process-wide mutex owned by the service.
//! Resolving both accounts, validating, debiting and crediting all happen
//! while that guard is held, so no other transfer can observe or touch a
//! half-applied pair. Unrelated pairs are serialized too.
//!
//! Notifications are sent after the guard is dropped, from snapshots taken
//! inside the critical section, so a slow notifier never holds the lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;

use crate::{
    error::LedgerError,
    models::account::Account,
    services::{account_store::AccountStore, notification_service::Notifier},
};

pub struct AccountsService {
    store: Mutex<AccountStore>,
    notifier: Arc<dyn Notifier>,
}

impl AccountsService {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store: Mutex::new(AccountStore::new()),
            notifier,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// - `DuplicateAccountId`: an account with the same id exists; nothing changes
    pub fn create_account(&self, account: Account) -> Result<(), LedgerError> {
        let id = account.id().to_string();
        let balance = account.balance();
        self.lock_store().create(account)?;
        tracing::info!(account_id = %id, %balance, "Account created");
        Ok(())
    }

    /// Snapshot of an account, or `None` when the id is unknown.
    pub fn get_account(&self, account_id: &str) -> Option<Account> {
        self.lock_store().get(account_id).cloned()
    }

    /// Snapshot of all accounts, ordered by id.
    pub fn list_accounts(&self) -> Vec<Account> {
        self.lock_store().snapshot()
    }

    pub fn account_count(&self) -> usize {
        self.lock_store().len()
    }

    /// Remove every account. Used to isolate tests from each other.
    pub fn clear_accounts(&self) {
        self.lock_store().clear();
    }

    /// Move `amount` from `account_from` to `account_to`.
    ///
    /// # Process
    ///
    /// 1. Reject a transfer to the same account
    /// 2. Lock the store and resolve both accounts
    /// 3. Reject a non-positive amount
    /// 4. Compute the debited source and credited destination, then write both
    /// 5. Release the lock and notify both parties
    ///
    /// # Errors
    ///
    /// Checked in this order, stopping at the first failure:
    /// - `SameAccountTransfer`
    /// - `UnknownSourceAccount`
    /// - `UnknownDestinationAccount`
    /// - `NonPositiveAmount`
    /// - `InsufficientFunds`
    /// - `BalanceOverflow`: a new balance would not be exact
    ///
    /// On any error both balances are exactly what they were before the call.
    pub fn transfer(
        &self,
        account_from: &str,
        account_to: &str,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let (debited, credited) = self
            .commit_transfer(account_from, account_to, amount)
            .inspect_err(|err| {
                tracing::warn!(
                    from = account_from,
                    to = account_to,
                    %amount,
                    "Transfer rejected: {}",
                    err
                );
            })?;

        tracing::info!(from = account_from, to = account_to, %amount, "Transfer committed");

        self.notifier.notify_about_transfer(
            &debited,
            &format!(
                "Your account has been debited with amount {} and has been transferred to {}",
                amount,
                credited.id()
            ),
        );
        self.notifier.notify_about_transfer(
            &credited,
            &format!(
                "Your account has been credited with amount {} from {}",
                amount,
                debited.id()
            ),
        );

        Ok(())
    }

    /// Validate and apply the debit/credit pair under the store lock.
    ///
    /// Returns snapshots of the source and destination after the commit.
    fn commit_transfer(
        &self,
        account_from: &str,
        account_to: &str,
        amount: Decimal,
    ) -> Result<(Account, Account), LedgerError> {
        if account_from == account_to {
            return Err(LedgerError::SameAccountTransfer);
        }

        let mut store = self.lock_store();
        let [source, destination] = store.get_pair_mut(account_from, account_to);
        let source = source.ok_or(LedgerError::UnknownSourceAccount)?;
        let destination = destination.ok_or(LedgerError::UnknownDestinationAccount)?;

        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }

        // Work on copies so that either both balances change or neither does.
        let mut debited = source.clone();
        debited.debit(amount)?;
        let mut credited = destination.clone();
        credited.credit(amount)?;

        *source = debited.clone();
        *destination = credited.clone();

        Ok((debited, credited))
    }

    /// Acquire the store lock.
    ///
    /// A poisoned lock is recovered: both new balances are computed before
    /// either account is written, so a panic cannot leave a half-applied
    /// transfer behind.
    fn lock_store(&self) -> MutexGuard<'_, AccountStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::services::notification_service::RecordingNotifier;

    fn service_with_two_accounts() -> (AccountsService, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = AccountsService::new(notifier.clone());
        service
            .create_account(Account::with_balance("acc-1", dec!(100)))
            .unwrap();
        service
            .create_account(Account::with_balance("acc-2", dec!(100)))
            .unwrap();
        (service, notifier)
    }

    fn balances(service: &AccountsService) -> (Decimal, Decimal) {
        (
            service.get_account("acc-1").unwrap().balance(),
            service.get_account("acc-2").unwrap().balance(),
        )
    }

    #[test]
    fn add_account() {
        let service = AccountsService::new(Arc::new(RecordingNotifier::default()));
        let account = Account::with_balance("Id-123", dec!(1000));
        service.create_account(account.clone()).unwrap();

        assert_eq!(service.get_account("Id-123"), Some(account));
        assert_eq!(service.get_account("Id-999"), None);
    }

    #[test]
    fn add_account_fails_on_duplicate_id() {
        let service = AccountsService::new(Arc::new(RecordingNotifier::default()));
        service
            .create_account(Account::with_balance("Id-123", dec!(10)))
            .unwrap();

        let err = service
            .create_account(Account::with_balance("Id-123", dec!(99)))
            .unwrap_err();

        assert_eq!(err.to_string(), "Account id Id-123 already exists!");
        assert_eq!(service.account_count(), 1);
        assert_eq!(service.get_account("Id-123").unwrap().balance(), dec!(10));
    }

    #[test]
    fn transfer_moves_money_and_notifies_both_parties() {
        let (service, notifier) = service_with_two_accounts();

        service.transfer("acc-1", "acc-2", dec!(5)).unwrap();

        assert_eq!(balances(&service), (dec!(95), dec!(105)));
        assert_eq!(
            notifier.notifications(),
            vec![
                (
                    Account::with_balance("acc-1", dec!(95)),
                    "Your account has been debited with amount 5 and has been transferred to acc-2"
                        .to_string()
                ),
                (
                    Account::with_balance("acc-2", dec!(105)),
                    "Your account has been credited with amount 5 from acc-1".to_string()
                ),
            ]
        );
    }

    #[test]
    fn transfer_conserves_total_with_fractions() {
        let (service, _) = service_with_two_accounts();

        service.transfer("acc-1", "acc-2", dec!(0.01)).unwrap();
        service.transfer("acc-2", "acc-1", dec!(33.33)).unwrap();

        let (from, to) = balances(&service);
        assert_eq!(from, dec!(133.32));
        assert_eq!(to, dec!(66.68));
        assert_eq!(from + to, dec!(200));
    }

    #[test]
    fn transfer_of_whole_balance_is_allowed() {
        let (service, _) = service_with_two_accounts();
        service.transfer("acc-1", "acc-2", dec!(100)).unwrap();
        assert_eq!(balances(&service), (dec!(0), dec!(200)));
    }

    #[test]
    fn insufficient_funds_leaves_balances_untouched() {
        let (service, notifier) = service_with_two_accounts();

        let err = service.transfer("acc-1", "acc-2", dec!(105)).unwrap_err();

        assert_eq!(err, LedgerError::InsufficientFunds);
        assert_eq!(
            err.to_string(),
            "Amount transferred shouldn't be more than balance"
        );
        assert_eq!(balances(&service), (dec!(100), dec!(100)));
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn credit_overflow_leaves_both_accounts_untouched() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = AccountsService::new(notifier.clone());
        service
            .create_account(Account::with_balance("acc-1", dec!(100)))
            .unwrap();
        service
            .create_account(Account::with_balance("acc-2", Decimal::MAX))
            .unwrap();

        let err = service.transfer("acc-1", "acc-2", dec!(5)).unwrap_err();

        assert_eq!(err, LedgerError::BalanceOverflow);
        assert_eq!(service.get_account("acc-1").unwrap().balance(), dec!(100));
        assert_eq!(
            service.get_account("acc-2").unwrap().balance(),
            Decimal::MAX
        );
        assert!(notifier.notifications().is_empty());

        // The lock is still healthy and other transfers go through.
        service.transfer("acc-2", "acc-1", dec!(5)).unwrap();
        assert_eq!(service.get_account("acc-1").unwrap().balance(), dec!(105));
    }

    #[test]
    fn credit_that_would_round_is_rejected() {
        let big = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
        let service = AccountsService::new(Arc::new(RecordingNotifier::default()));
        service
            .create_account(Account::with_balance("acc-1", dec!(100)))
            .unwrap();
        service
            .create_account(Account::with_balance("acc-2", big))
            .unwrap();

        assert_eq!(
            service.transfer("acc-1", "acc-2", dec!(0.01)).unwrap_err(),
            LedgerError::BalanceOverflow
        );
        assert_eq!(service.get_account("acc-1").unwrap().balance(), dec!(100));
        assert_eq!(service.get_account("acc-2").unwrap().balance(), big);
    }

    #[test]
    fn insufficient_funds_wins_over_overflow() {
        let service = AccountsService::new(Arc::new(RecordingNotifier::default()));
        service
            .create_account(Account::with_balance("acc-1", dec!(1)))
            .unwrap();
        service
            .create_account(Account::with_balance("acc-2", Decimal::MAX))
            .unwrap();

        assert_eq!(
            service.transfer("acc-1", "acc-2", dec!(5)).unwrap_err(),
            LedgerError::InsufficientFunds
        );
    }

    #[test]
    fn same_account_is_rejected_whatever_the_amount() {
        let (service, _) = service_with_two_accounts();

        for amount in [dec!(5), dec!(-5), dec!(0)] {
            let err = service.transfer("acc-1", "acc-1", amount).unwrap_err();
            assert_eq!(err, LedgerError::SameAccountTransfer);
        }
        // Checked before any lookup.
        assert_eq!(
            service.transfer("ghost", "ghost", dec!(5)).unwrap_err(),
            LedgerError::SameAccountTransfer
        );
        assert_eq!(balances(&service), (dec!(100), dec!(100)));
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let (service, _) = service_with_two_accounts();

        for amount in [dec!(-5), dec!(0), dec!(0.00)] {
            let err = service.transfer("acc-1", "acc-2", amount).unwrap_err();
            assert_eq!(err, LedgerError::NonPositiveAmount);
        }
        assert_eq!(balances(&service), (dec!(100), dec!(100)));
    }

    #[test]
    fn unknown_accounts_are_rejected_in_order() {
        let (service, _) = service_with_two_accounts();

        assert_eq!(
            service.transfer("ghost", "acc-2", dec!(5)).unwrap_err(),
            LedgerError::UnknownSourceAccount
        );
        assert_eq!(
            service.transfer("acc-1", "ghost", dec!(5)).unwrap_err(),
            LedgerError::UnknownDestinationAccount
        );
        // Unknown source wins over unknown destination and a bad amount.
        assert_eq!(
            service.transfer("ghost", "phantom", dec!(-1)).unwrap_err(),
            LedgerError::UnknownSourceAccount
        );
        // Unknown destination wins over a bad amount.
        assert_eq!(
            service.transfer("acc-1", "ghost", dec!(-1)).unwrap_err(),
            LedgerError::UnknownDestinationAccount
        );
        // Non-positive amount wins over insufficient funds.
        assert_eq!(
            service.transfer("acc-1", "acc-2", dec!(-1000)).unwrap_err(),
            LedgerError::NonPositiveAmount
        );
        assert_eq!(service.account_count(), 2);
    }

    #[test]
    fn clear_accounts_resets_the_store() {
        let (service, _) = service_with_two_accounts();
        service.clear_accounts();
        assert_eq!(service.account_count(), 0);
        assert!(service.list_accounts().is_empty());
    }

    #[test]
    fn concurrent_transfers_from_one_account_lose_no_updates() {
        const TRANSFERS: usize = 64;

        let notifier = Arc::new(RecordingNotifier::default());
        let service = AccountsService::new(notifier.clone());
        service
            .create_account(Account::with_balance("source", dec!(1000)))
            .unwrap();
        for i in 0..TRANSFERS {
            service
                .create_account(Account::new(format!("dest-{i}")))
                .unwrap();
        }

        thread::scope(|scope| {
            for i in 0..TRANSFERS {
                let service = &service;
                scope.spawn(move || {
                    service
                        .transfer("source", &format!("dest-{i}"), dec!(1.5))
                        .unwrap();
                });
            }
        });

        assert_eq!(
            service.get_account("source").unwrap().balance(),
            dec!(1000) - dec!(1.5) * Decimal::from(TRANSFERS)
        );
        for i in 0..TRANSFERS {
            assert_eq!(
                service.get_account(&format!("dest-{i}")).unwrap().balance(),
                dec!(1.5)
            );
        }
        assert_eq!(notifier.notifications().len(), TRANSFERS * 2);
    }

    #[test]
    fn opposite_direction_transfers_conserve_total() {
        let (service, _) = service_with_two_accounts();

        thread::scope(|scope| {
            for i in 0..200 {
                let service = &service;
                scope.spawn(move || {
                    // Some of these may fail for lack of funds; that is fine.
                    let (from, to) = if i % 2 == 0 {
                        ("acc-1", "acc-2")
                    } else {
                        ("acc-2", "acc-1")
                    };
                    let _ = service.transfer(from, to, dec!(7));
                });
            }
        });

        let (from, to) = balances(&service);
        assert_eq!(from + to, dec!(200));
        assert!(from >= Decimal::ZERO);
        assert!(to >= Decimal::ZERO);
    }

    #[test]
    fn overdrawing_concurrently_never_goes_negative() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = AccountsService::new(notifier);
        service
            .create_account(Account::with_balance("source", dec!(10)))
            .unwrap();
        service.create_account(Account::new("sink")).unwrap();

        let outcomes: Vec<Result<(), LedgerError>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..20)
                .map(|_| {
                    let service = &service;
                    scope.spawn(move || service.transfer("source", "sink", dec!(1)))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let committed = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(committed, 10);
        assert!(
            outcomes
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|err| *err == LedgerError::InsufficientFunds)
        );
        assert_eq!(service.get_account("source").unwrap().balance(), dec!(0));
        assert_eq!(service.get_account("sink").unwrap().balance(), dec!(10));
    }

    #[test]
    fn concurrent_creates_of_same_id_admit_exactly_one() {
        let service = AccountsService::new(Arc::new(RecordingNotifier::default()));

        let outcomes: Vec<Result<(), LedgerError>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|i| {
                    let service = &service;
                    scope.spawn(move || {
                        service.create_account(Account::with_balance("Id-1", Decimal::from(i)))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(service.account_count(), 1);
    }
}
