use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Field error: {field} is required")]
    Empty {
        field: &'static str
    },
    #[error("Field error: {field} must only contain digits, got '{value}'")]
    NotNumeric {
        field: &'static str,
        value: String
    },
    #[error("Field error: {field} must be at most {max} digits, got '{value}'")]
    TooLong {
        field: &'static str,
        max: usize,
        value: String
    },
    #[error("Field error: consecutive must be between 01 and 99, got '{0}'")]
    ConsecutiveOutOfRange(String)
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Date format error: '{value}' is not a recognized calendar date")]
pub struct DateFormatError {
    pub value: String
}
