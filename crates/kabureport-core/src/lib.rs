//! Kabureport Core Library
//!
//! Incremental aggregation-and-merge pipeline for turning an exported
//! archive of threaded conversation logs into per-topic, append-only
//! HTML reports plus a consolidated index page.

pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod format;
pub mod index;
pub mod logging;
pub mod pipeline;
pub mod segment;
pub mod summary;
