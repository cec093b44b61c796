//! # Visual state controller
//!
//! Owns the registry of simulated "thread" records, advances their progress
//! with tokio timers, and mirrors every mutation into a bounded timeline and
//! a broadcast event channel.
//!
//! The per-task lifecycle is `running -> completed -> (removed)`; removal is
//! an implicit deletion, not an observable state. Every pending timer is held
//! as an abortable handle so `reset_all` can positively cancel it instead of
//! relying on missing-record guards alone.

pub mod controller;
pub mod timeline;
pub mod types;

pub use controller::TaskMonitor;
pub use timeline::{Timeline, TimelineEntry};
pub use types::{MonitorStats, StateEvent, TaskId, TaskRecord, TaskSpec, TaskStatus};
