use crate::models::CardAdjustmentRecord;
use crate::types::{DateFormatError, ExpenseId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Sign is required for expense [{expense_id}] on card [{card_number}]")]
    SignRequired {
        expense_id: ExpenseId,
        card_number: String
    },
    #[error("Amount must be greater than zero for expense [{expense_id}] on card [{card_number}]")]
    AmountNotPositive {
        expense_id: ExpenseId,
        card_number: String
    },
    #[error("Amount has more than two decimal places for expense [{expense_id}] on card [{card_number}]")]
    AmountTooPrecise {
        expense_id: ExpenseId,
        card_number: String
    },
    #[error("New card limit overflows for expense [{expense_id}] on card [{card_number}]")]
    LimitOverflow {
        expense_id: ExpenseId,
        card_number: String
    },
    #[error("Invalid {field} for expense [{expense_id}] on card [{card_number}]: {source}")]
    InvalidDate {
        expense_id: ExpenseId,
        card_number: String,
        field: &'static str,
        source: DateFormatError
    }
}

impl RecordError {
    pub fn sign_required(record: &CardAdjustmentRecord) -> Self {
        Self::SignRequired {
            expense_id: record.expense_id,
            card_number: record.card_number.clone()
        }
    }

    pub fn amount_not_positive(record: &CardAdjustmentRecord) -> Self {
        Self::AmountNotPositive {
            expense_id: record.expense_id,
            card_number: record.card_number.clone()
        }
    }

    pub fn amount_too_precise(record: &CardAdjustmentRecord) -> Self {
        Self::AmountTooPrecise {
            expense_id: record.expense_id,
            card_number: record.card_number.clone()
        }
    }

    pub fn limit_overflow(record: &CardAdjustmentRecord) -> Self {
        Self::LimitOverflow {
            expense_id: record.expense_id,
            card_number: record.card_number.clone()
        }
    }

    pub fn invalid_date(record: &CardAdjustmentRecord, field: &'static str, source: DateFormatError) -> Self {
        Self::InvalidDate {
            expense_id: record.expense_id,
            card_number: record.card_number.clone(),
            field,
            source
        }
    }
}
