//! PROPLINE — consensus fair pricing for player props
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod sports;
pub mod strategy;
pub mod providers;
pub mod engine;
pub mod export;
pub mod api;
