use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::errors::RecordError;
use crate::models::Sign;
use crate::types::{ExpenseId, UserId};

/// The bank file carries amounts in cents.
const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Represents a single approved expense awaiting disbursement onto a card.
///
/// `sign` and `amount` are captured per record by the operator and may be
/// missing until the batch passes validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CardAdjustmentRecord {
    /// Card number as stored by the backend, possibly containing spaces.
    pub card_number: String,
    pub description: String,
    #[serde(default)]
    pub sign: Option<Sign>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Limit currently assigned to the card.
    pub current_limit: Decimal,
    /// Card holder.
    pub user_id: UserId,
    /// Expense being disbursed.
    pub expense_id: ExpenseId,
    /// Bank status-change code, `0` means unchanged.
    #[serde(default)]
    pub status_change: Option<String>
}

/// A record that passed the submit preconditions, with its target card limit.
#[derive(Debug, Clone)]
pub struct ValidatedAdjustment<'a> {
    pub record: &'a CardAdjustmentRecord,
    pub sign: Sign,
    pub amount: Decimal,
    pub new_limit: Decimal
}

impl CardAdjustmentRecord {
    /// Checks that the record carries a sign and a strictly positive amount in
    /// whole cents, and computes the limit the card will have after the adjustment.
    pub fn validate(&self) -> Result<ValidatedAdjustment<'_>, RecordError> {
        let Some(sign) = self.sign else {
            return Err(RecordError::sign_required(self))
        };

        let Some(amount) = self.amount else {
            return Err(RecordError::amount_not_positive(self))
        };

        if amount <= Decimal::ZERO {
            return Err(RecordError::amount_not_positive(self))
        }

        if amount.normalize().scale() > AMOUNT_DECIMAL_PLACES {
            return Err(RecordError::amount_too_precise(self))
        }

        let new_limit = match sign {
            Sign::Plus => self.current_limit.checked_add(amount),
            Sign::Minus => self.current_limit.checked_sub(amount)
        }.ok_or_else(|| RecordError::limit_overflow(self))?;

        Ok(ValidatedAdjustment {
            record: self,
            sign,
            amount,
            new_limit
        })
    }
}
