use crate::models::{CardAdjustmentRecord, ExpenseStatus};
use crate::storage::{CardLimitGateway, GatewayError};
use crate::types::{ExpenseId, UserId};
use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// In-process stand-in for the expense backend: card limits per user and
/// status per expense.
pub struct LedgerStorage {
    card_limits: Arc<DashMap<UserId, Decimal>>,
    expenses: Arc<DashMap<ExpenseId, ExpenseStatus>>
}

impl LedgerStorage {
    pub fn new() -> Self {
        Self {
            card_limits: Arc::new(DashMap::new()),
            expenses: Arc::new(DashMap::new())
        }
    }

    /// Registers the cards and approved expenses referenced by a batch.
    pub fn seed(records: &[CardAdjustmentRecord]) -> Self {
        let storage = Self::new();

        for record in records {
            storage.card_limits.entry(record.user_id).or_insert(record.current_limit);
            storage.expenses.insert(record.expense_id, ExpenseStatus::Approved);
        }

        storage
    }

    pub fn card_limit(&self, user_id: UserId) -> Option<Decimal> {
        self.card_limits.get(&user_id).map(|limit| *limit)
    }

    pub fn expense_status(&self, expense_id: ExpenseId) -> Option<ExpenseStatus> {
        self.expenses.get(&expense_id).map(|status| *status)
    }
}

#[async_trait]
impl CardLimitGateway for LedgerStorage {
    async fn update_card_limit(&self, user_id: UserId, new_limit: Decimal) -> Result<Decimal, GatewayError> {
        let mut limit = self.card_limits.get_mut(&user_id)
            .ok_or(GatewayError::UserNotFound { user_id })?;

        debug!("Card limit for user [{user_id}] {} -> {new_limit}", *limit);

        Ok(std::mem::replace(&mut *limit, new_limit))
    }

    async fn set_expense_status(&self, expense_id: ExpenseId, status: ExpenseStatus) -> Result<ExpenseStatus, GatewayError> {
        let mut current = self.expenses.get_mut(&expense_id)
            .ok_or(GatewayError::ExpenseNotFound { expense_id })?;

        if *current == ExpenseStatus::Dispersed && status == ExpenseStatus::Dispersed {
            return Err(GatewayError::Rejected(format!("expense [{expense_id}] was already dispersed")));
        }

        debug!("Expense [{expense_id}] {} -> {status}", *current);

        Ok(std::mem::replace(&mut *current, status))
    }
}
