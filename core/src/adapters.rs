//! Production implementations of the collaborator traits.
//!
//! * [`kubernetes`]: nodes, routes and server URLs through the Kubernetes API.
//! * [`debug_node`]: node scripts through `oc debug node/<name>`.
//! * [`dns`]: hostname lookups through the system resolver.

pub mod debug_node;
pub mod dns;
pub mod kubernetes;

pub use debug_node::DebugNodeExecutor;
pub use dns::SystemResolver;
pub use kubernetes::{KubeClusterApi, KubeConnector};
