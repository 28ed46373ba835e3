//! Library crate for userdash.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, reducer and event loop (`app`)
//! - Command line configuration (`config`)
//! - Remote user directory model and REST client (`directory`)
//! - Error types (`error`)
//! - File logging setup (`logging`)
//! - In-memory search helpers (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `userdash` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use error::{DirectoryError, OperationError, Result};
