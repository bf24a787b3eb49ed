use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{CardAdjustmentRecord, RecordError, Sign};
use crate::types::dates::format_compact_date;

const DESCRIPTION_MAX_CHARS: usize = 40;
const UNCHANGED_STATUS: &str = "0";

/// What to do when a record carries a date the bank layout cannot express.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum DatePolicy {
    /// Leave the field empty and keep going.
    #[default]
    Degrade,
    /// Reject the record, and with it the whole batch.
    Reject
}

/// One data line of the reassignment file, already in bank layout.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReassignmentRow {
    pub card_number: String,
    pub description: String,
    pub sign: Sign,
    pub amount: Decimal,
    pub start_date: String,
    pub end_date: String,
    pub status_change: String
}

impl ReassignmentRow {
    pub fn prepare(record: &CardAdjustmentRecord, sign: Sign, amount: Decimal, policy: DatePolicy) -> Result<Self, RecordError> {
        Ok(Self {
            card_number: record.card_number.chars().filter(|c| c.is_ascii_digit()).collect(),
            description: record.description.chars().take(DESCRIPTION_MAX_CHARS).collect(),
            sign,
            amount,
            start_date: date_field(record, "start date", record.start_date.as_deref(), policy)?,
            end_date: date_field(record, "end date", record.end_date.as_deref(), policy)?,
            status_change: match record.status_change.as_deref().map(str::trim) {
                Some(UNCHANGED_STATUS) | None => String::new(),
                Some(code) => code.to_string()
            }
        })
    }
}

fn date_field(record: &CardAdjustmentRecord, field: &'static str, value: Option<&str>, policy: DatePolicy) -> Result<String, RecordError> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(String::new())
    };

    match format_compact_date(value) {
        Ok(formatted) => Ok(formatted),
        Err(error) if policy == DatePolicy::Degrade => {
            warn!("Expense [{}]: {field} left empty, {error}", record.expense_id);
            Ok(String::new())
        }
        Err(error) => Err(RecordError::invalid_date(record, field, error))
    }
}
