//! # Blackhole Common
//!
//! Shared vocabulary of the workspace: the data model of a partition, the error
//! taxonomy, the explicit run configuration, and the traits every outside
//! collaborator (Kubernetes API, DNS, remote shell, progress display) is
//! reached through.
//!
//! Nothing in here performs IO. Concrete implementations of the collaborator
//! traits live in `blackhole-core`, test doubles live next to the tests.

pub mod cluster;
pub mod cluster_api;
pub mod config;
pub mod error;
pub mod network;
pub mod progress;
pub mod remote;
pub mod resolver;

pub use error::{BlackholeError, Result};
