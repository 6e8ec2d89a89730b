//! helmsman - latency-aware failover monitor for proxy controller APIs
//!
//! This library provides the decision core for watching the per-node delay of
//! a proxy group, verifying endpoint reachability through the active node,
//! and switching the group to a faster, verified node when the current one
//! degrades.

pub mod cli;
pub mod config;
pub mod controller;
pub mod engine;
pub mod monitor;
pub mod probe;
