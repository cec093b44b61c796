//! taskmon-core: state engine for the taskmon terminal dashboard.
//!
//! Everything here is simulation. "Threads" are in-memory records whose
//! progress is advanced by tokio timers; the crate owns the registry, the
//! bounded event timeline, and the aggregate counters, and mirrors every
//! mutation onto a broadcast channel for renderers to consume.

pub mod api;
pub mod config;
pub mod error;
pub mod monitor;
