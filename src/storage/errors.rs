use crate::types::{ExpenseId, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("Counter error: all 99 consecutives for [{date}] have been used")]
    Exhausted {
        date: String
    },
    #[error("Counter error: stored state is corrupt: {0}")]
    Corrupt(String),
    #[error("Counter error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Counter error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Counter error: blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError)
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("No card is registered for user [{user_id}]")]
    UserNotFound {
        user_id: UserId
    },
    #[error("Expense [{expense_id}] was not found")]
    ExpenseNotFound {
        expense_id: ExpenseId
    },
    #[error("Backend rejected the request: {0}")]
    Rejected(String)
}
