//! Card reassignment import file, in the layout mandated by the card issuer.

mod control;
mod csv_writer;
mod file_name;
mod row;

pub use control::ControlRow;
pub use csv_writer::generate_csv;
pub use file_name::build_file_name;
pub use row::{DatePolicy, ReassignmentRow};
