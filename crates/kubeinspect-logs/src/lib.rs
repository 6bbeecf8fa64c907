//! Log processing for kubeinspect
//!
//! This crate turns fetched log text into structured lines and filters them.

mod filter;
mod parser;

pub use filter::LogFilter;
pub use parser::LogParser;

// Re-export types used in our public API
pub use kubeinspect_types::{LogLevel, LogLine};
