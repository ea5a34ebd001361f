//! Containerized CI tools
//!
//! Each tool resolves its configuration from options, builds a
//! [`ContainerSpec`](crate::orchestration::ContainerSpec) and runs it through
//! a [`Runtime`](crate::orchestration::Runtime).

pub mod precommit;
pub mod svu;

/// Mount path of the caller's working directory inside tool containers
pub const SRC_DIR: &str = "/src";
