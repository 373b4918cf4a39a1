// src/specs/mod.rs
//! # Dashboard parsers
//!
//! Each module here knows how to read one kind of CDash response and turn it into
//! [`RawBuild`](crate::record::RawBuild)s:
//!
//! - `page` – server-rendered HTML (`index.php`): `tabb` build tables and HPC-tagged
//!   fragments.
//! - `api` – the JSON API (`api/v1/index.php`).
//!
//! They are pure: no networking, no filtering, no decomposition. They return every
//! build they can find, and `scrape` decides what to keep. Capture a response to a
//! file and the parser can be tested offline.
pub mod api;
pub mod page;
