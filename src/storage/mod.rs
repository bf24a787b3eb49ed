mod counter_storage;
mod errors;
mod ledger_storage;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::ExpenseStatus;
use crate::types::{Consecutive, ExpenseId, UserId};

pub use counter_storage::FileCounterStore;
#[cfg(test)]
pub use counter_storage::InMemoryCounterStore;
pub use errors::{CounterError, GatewayError};
pub use ledger_storage::LedgerStorage;

/// Daily file sequence. A date that has no stored count starts at `01`.
pub trait ConsecutiveCounterStore: Send + Sync + 'static {
    /// Consecutive to stamp on the next file generated on `date`.
    fn read(&self, date: NaiveDate) -> Result<Consecutive, CounterError>;
    /// Advances the count for `date` and returns the new value.
    fn increment(&self, date: NaiveDate) -> Result<Consecutive, CounterError>;
}

/// Backend operations a disbursement needs. Both return the value they replaced
/// so that a failed batch can put it back.
#[async_trait]
pub trait CardLimitGateway: Send + Sync + 'static {
    async fn update_card_limit(&self, user_id: UserId, new_limit: Decimal) -> Result<Decimal, GatewayError>;
    async fn set_expense_status(&self, expense_id: ExpenseId, status: ExpenseStatus) -> Result<ExpenseStatus, GatewayError>;
}
