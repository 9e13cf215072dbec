//! # Blackhole Core
//!
//! Simulates a network partition between clusters by installing kernel
//! blackhole routes on every node of the target clusters.
//!
//! ## Layout
//! * **[`discovery`]**: every address of the blocked cluster.
//! * **[`inspector`]**: node names of a target cluster.
//! * **[`routes`]**: the remote `ip route` protocol run on each node.
//! * **[`orchestrator`]**: concurrent inspect / block / unblock / status phases.
//! * **[`status`]**: per-node and per-target classification of route tables.
//! * **[`adapters`]**: production collaborators (Kubernetes API, `oc debug`, DNS).
//!
//! High-level code depends on the collaborator traits of `blackhole-common`
//! only; the adapters are wired in by the binary.

pub mod adapters;
pub mod discovery;
pub mod inspector;
pub mod orchestrator;
pub mod routes;
pub mod status;

pub use orchestrator::Orchestrator;
