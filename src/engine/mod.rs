mod dialog;
mod errors;
mod reassignment_engine;

pub use dialog::ReassignmentDialog;
pub use reassignment_engine::ReassignmentEngine;
