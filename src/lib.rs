//! Daggers - containerized CI helpers
//!
//! Runs pre-commit and svu inside throwaway containers so a repository gets
//! the same results on a laptop and in CI. Tools are configured with
//! functional options and cache their state in volumes keyed by a digest
//! of the files that determine it.

pub mod cache;
pub mod cli;
pub mod config;
pub mod customizers;
pub mod error;
pub mod options;
pub mod orchestration;
pub mod tools;
pub mod ui;

pub use error::{DaggersError, DaggersResult};
