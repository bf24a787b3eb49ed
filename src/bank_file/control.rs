use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::bank_file::ReassignmentRow;
use crate::types::dates::compact;
use crate::types::{ClientNumber, GroupNumber};

/// Footer of the reassignment file, used by the bank to reconcile the batch.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ControlRow {
    /// Client number padded to 10 digits.
    pub client_number: String,
    /// Group number padded to 9 digits.
    pub group_number: String,
    /// Send date as `YYYYMMDD`.
    pub send_date: String,
    pub total_amount: Decimal,
    pub record_count: usize
}

impl ControlRow {
    pub fn build(rows: &[ReassignmentRow], client_number: &ClientNumber, group_number: &GroupNumber, send_date: NaiveDate) -> Self {
        Self {
            client_number: client_number.padded(),
            group_number: group_number.padded(),
            send_date: compact(send_date),
            total_amount: rows.iter().map(|row| row.amount).sum(),
            record_count: rows.len()
        }
    }
}
