//! Credit ledger trait.

use async_trait::async_trait;
use toolsmith_error::CreditError;

/// Account balance store.
///
/// `reserve` must be atomic: the check and the decrement happen as one
/// operation so concurrent submissions cannot overspend.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Current balance.
    async fn balance(&self, account: &str) -> Result<u32, CreditError>;

    /// Decrements the balance by `amount` if it is at least `amount`.
    /// Returns the new balance.
    async fn reserve(&self, account: &str, amount: u32) -> Result<u32, CreditError>;

    /// Returns previously reserved credits. Returns the new balance.
    async fn refund(&self, account: &str, amount: u32) -> Result<u32, CreditError>;
}
