//! Output formatters for help pages, dispatch reports and errors

pub mod human;
pub mod json;

pub use human::HumanFormatter;
pub use json::JsonFormatter;
