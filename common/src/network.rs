//! Address vocabulary shared by discovery, the route protocol and status checks.

pub mod address;

pub use address::AddressSet;
