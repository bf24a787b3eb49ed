mod errors;
mod record;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

pub use errors::RecordError;
pub use record::{CardAdjustmentRecord, ValidatedAdjustment};

/// Direction of a card limit adjustment.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
pub enum Sign {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus
}

impl Sign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sign::Plus => "+",
            Sign::Minus => "-"
        }
    }
}

impl Display for Sign {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Approved,
    Dispersed
}

impl Display for ExpenseStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExpenseStatus::Approved => "approved",
            ExpenseStatus::Dispersed => "dispersed"
        };

        formatter.write_str(label)
    }
}
