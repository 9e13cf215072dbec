//! # Cluster Model
//!
//! The state one invocation derives from live queries. Nothing here outlives
//! the command that built it.
//!
//! * [`blocked`]: the cluster being made unreachable and its addresses.
//! * [`target`]: the clusters whose nodes receive the blackhole routes.
//! * [`node`]: the collaborator views of nodes and ingress routes.
//! * [`status`]: per-node and per-target blackhole status.

pub mod blocked;
pub mod node;
pub mod status;
pub mod target;

pub use blocked::BlockedCluster;
pub use node::{NodeAddress, NodeInfo, NodeRef, RouteInfo};
pub use status::{BlackholeStatus, ClusterStatus, NodeOperationResult, StatusReport};
pub use target::{Inventory, TargetCluster};
