// src/config/mod.rs
pub mod consts;
pub mod facility;
pub mod options;

pub use facility::Facility;
pub use options::{FetchOptions, ReportMeta, RunOptions};
