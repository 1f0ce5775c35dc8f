//! Types shared by the user console client crates: wire records, display
//! normalization, list view rendering and runtime settings.

pub mod config;
pub mod domain;
pub mod error;
pub mod protocol;
pub mod view;
