use crate::types::errors::FieldError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const CLIENT_NUMBER_WIDTH: usize = 10;
const GROUP_NUMBER_WIDTH: usize = 9;

/// Bank-assigned client number, rendered zero-padded to 10 digits.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClientNumber(String);

/// Bank-assigned card group number, rendered zero-padded to 9 digits.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GroupNumber(String);

impl ClientNumber {
    pub fn padded(&self) -> String {
        format!("{:0>width$}", self.0, width = CLIENT_NUMBER_WIDTH)
    }
}

impl GroupNumber {
    pub fn padded(&self) -> String {
        format!("{:0>width$}", self.0, width = GROUP_NUMBER_WIDTH)
    }
}

impl FromStr for ClientNumber {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_digits("client number", value, CLIENT_NUMBER_WIDTH).map(ClientNumber)
    }
}

impl FromStr for GroupNumber {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_digits("group number", value, GROUP_NUMBER_WIDTH).map(GroupNumber)
    }
}

fn parse_digits(field: &'static str, value: &str, max: usize) -> Result<String, FieldError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(FieldError::Empty { field });
    }

    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::NotNumeric { field, value: value.to_string() });
    }

    if value.len() > max {
        return Err(FieldError::TooLong { field, max, value: value.to_string() });
    }

    Ok(value.to_string())
}

/// Per-day file sequence number, always within `01..=99`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Consecutive(u8);

impl Consecutive {
    pub const FIRST: Consecutive = Consecutive(1);
    pub const LAST: Consecutive = Consecutive(99);

    pub fn new(value: u8) -> Result<Self, FieldError> {
        if (Self::FIRST.0..=Self::LAST.0).contains(&value) {
            Ok(Consecutive(value))
        } else {
            Err(FieldError::ConsecutiveOutOfRange(value.to_string()))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The following consecutive, or `None` once `99` has been reached.
    pub fn next(self) -> Option<Consecutive> {
        Consecutive::new(self.0 + 1).ok()
    }
}

impl Display for Consecutive {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:02}", self.0)
    }
}

impl FromStr for Consecutive {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed: u8 = value.trim().parse()
            .map_err(|_| FieldError::ConsecutiveOutOfRange(value.to_string()))?;

        Consecutive::new(parsed)
    }
}
