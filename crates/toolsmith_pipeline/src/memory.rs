//! In-process ledger and store, for the CLI and tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use toolsmith_error::{CreditError, CreditErrorKind, StoreError};
use toolsmith_interface::{CreditLedger, KeyValueStore};
use tracing::debug;

/// Credit balances held in memory.
///
/// Accounts are opened on first use with the starting balance, if one is
/// configured; otherwise unknown accounts are rejected.
#[derive(Debug, Default)]
pub struct InMemoryCreditLedger {
    balances: Mutex<HashMap<String, u32>>,
    starting_balance: Option<u32>,
}

impl InMemoryCreditLedger {
    /// Ledger that only knows explicitly opened accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger that opens unknown accounts with `balance`.
    pub fn with_starting_balance(balance: u32) -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            starting_balance: Some(balance),
        }
    }

    /// Opens or overwrites an account.
    pub fn open(&self, account: &str, balance: u32) {
        self.balances.lock().insert(account.to_string(), balance);
    }

    fn with_account<T>(
        &self,
        account: &str,
        f: impl FnOnce(&mut u32) -> Result<T, CreditError>,
    ) -> Result<T, CreditError> {
        let mut balances = self.balances.lock();
        if !balances.contains_key(account) {
            let Some(start) = self.starting_balance else {
                return Err(CreditError::new(CreditErrorKind::UnknownAccount(
                    account.to_string(),
                )));
            };
            debug!(account, start, "Opening account");
            balances.insert(account.to_string(), start);
        }
        match balances.get_mut(account) {
            Some(balance) => f(balance),
            None => Err(CreditError::new(CreditErrorKind::UnknownAccount(
                account.to_string(),
            ))),
        }
    }
}

#[async_trait]
impl CreditLedger for InMemoryCreditLedger {
    async fn balance(&self, account: &str) -> Result<u32, CreditError> {
        self.with_account(account, |balance| Ok(*balance))
    }

    async fn reserve(&self, account: &str, amount: u32) -> Result<u32, CreditError> {
        self.with_account(account, |balance| {
            if *balance < amount {
                return Err(CreditError::new(CreditErrorKind::InsufficientCredits {
                    required: amount,
                    available: *balance,
                }));
            }
            *balance -= amount;
            Ok(*balance)
        })
    }

    async fn refund(&self, account: &str, amount: u32) -> Result<u32, CreditError> {
        self.with_account(account, |balance| {
            *balance = balance.saturating_add(amount);
            Ok(*balance)
        })
    }
}

/// String map behind a mutex.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all entries.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock();
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .lock()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn remove(&self, keys: &[String]) -> Result<usize, StoreError> {
        let mut entries = self.entries.lock();
        Ok(keys.iter().filter(|k| entries.remove(*k).is_some()).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reserve_and_refund() {
        let ledger = InMemoryCreditLedger::new();
        ledger.open("acct", 3);
        assert_eq!(ledger.reserve("acct", 2).await.unwrap(), 1);
        let err = ledger.reserve("acct", 2).await.unwrap_err();
        assert_eq!(
            err.kind(),
            &CreditErrorKind::InsufficientCredits {
                required: 2,
                available: 1
            }
        );
        assert_eq!(ledger.refund("acct", 2).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let ledger = InMemoryCreditLedger::new();
        assert!(matches!(
            ledger.balance("ghost").await.unwrap_err().kind(),
            CreditErrorKind::UnknownAccount(_)
        ));
        let open = InMemoryCreditLedger::with_starting_balance(10);
        assert_eq!(open.balance("ghost").await.unwrap(), 10);
    }
}
