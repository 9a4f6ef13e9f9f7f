pub mod catalog;
pub mod projection;
pub mod report;
