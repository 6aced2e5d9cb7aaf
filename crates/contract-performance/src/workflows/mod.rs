pub mod contracts;
pub mod performance;
