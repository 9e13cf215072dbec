//! End-to-end partition scenarios against in-memory clusters.
//!
//! The fakes answer the same scripts the real nodes get, so the whole
//! protocol is exercised: discovery, route scripts and route table parsing.

mod fakes;
mod partition;
