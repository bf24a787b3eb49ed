pub mod dates;
mod errors;
mod identifiers;

pub use errors::{DateFormatError, FieldError};
pub use identifiers::{ClientNumber, Consecutive, GroupNumber};

pub type UserId = u32;
pub type ExpenseId = u32;
