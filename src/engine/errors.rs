use crate::models::RecordError;
use crate::storage::{CounterError, GatewayError};
use crate::types::{ExpenseId, FieldError};
use std::fmt;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// A backend call that did not go through, and the expense it belonged to.
#[derive(Debug)]
pub struct UpdateFailure {
    pub expense_id: ExpenseId,
    pub error: GatewayError
}

impl Display for UpdateFailure {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "expense [{}]: {}", self.expense_id, self.error)
    }
}

pub(crate) fn describe_failures(failures: &[UpdateFailure]) -> String {
    failures.iter()
        .map(UpdateFailure::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Batch has no records to disburse")]
    EmptyBatch,
    #[error("Reassignment dialog is not open")]
    DialogClosed,
    #[error("{0}")]
    Field(#[from] FieldError),
    #[error("{0}")]
    Record(#[from] RecordError),
    #[error("{0}")]
    Counter(#[from] CounterError),
    #[error(
        "{} of {total} record updates failed ({}), {} applied changes could not be reverted{}",
        .failures.len(),
        describe_failures(.failures),
        .compensation_failures.len(),
        unreverted(.compensation_failures)
    )]
    BatchUpdate {
        total: usize,
        failures: Vec<UpdateFailure>,
        compensation_failures: Vec<UpdateFailure>
    },
    #[error("Unable to write reassignment file: {0}")]
    Io(#[from] std::io::Error)
}

fn unreverted(failures: &[UpdateFailure]) -> String {
    if failures.is_empty() {
        String::new()
    } else {
        format!(" ({})", describe_failures(failures))
    }
}
