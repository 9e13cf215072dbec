//! Wire formats spoken with cluster nodes.
//!
//! The only protocol so far is the `ip route` script dialect used to install,
//! remove and list blackhole routes, see [`iproute`].

pub mod iproute;
