use chrono::NaiveDate;

use crate::types::{Consecutive, GroupNumber};

/// `R{MMDD}{CC}{GGGGGGGGG}.CSV`
pub fn build_file_name(date: NaiveDate, group_number: &GroupNumber, consecutive: Consecutive) -> String {
    format!("R{}{}{}.CSV", date.format("%m%d"), consecutive, group_number.padded())
}
