// src/lib.rs
// Library interface for crt-query
pub mod cli;
pub mod config;
pub mod crtsh;
pub mod dedupe;
pub mod filter;
pub mod output;
pub mod progress;
pub mod query;
pub mod types;
