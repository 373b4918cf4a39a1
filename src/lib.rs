// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod decompose;
pub mod error;
pub mod file;
pub mod filter;
pub mod log;
pub mod progress;
pub mod record;
pub mod report;
pub mod runner;
pub mod scrape;
pub mod specs;
pub mod store;

pub use error::{Error, Result};
