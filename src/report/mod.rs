//! Reporting
//!
//! Console tables and the CSV results file.

pub mod console;
pub mod csv;

pub use console::{print_results, print_statistics};
pub use csv::write_results;
