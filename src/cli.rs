pub mod analyze;
pub mod args;
