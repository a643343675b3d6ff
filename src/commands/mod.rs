//! Command implementations for kabureport

pub mod dispatch;
pub mod index;
pub mod list;
pub mod run;
