pub mod command;
pub mod notify;
pub mod report;
