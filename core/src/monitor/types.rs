use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

use super::timeline::TimelineEntry;

/// Identifier of a simulated thread. Allocated from a counter starting at 1;
/// never reused within a session.
pub type TaskId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
    Completed,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
        }
    }
}

/// A simulated unit of work. Progress is synthetic: the elapsed fraction of
/// the planned duration, clamped to 100.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: TaskId,
    pub name: String,
    pub status: TaskStatus,
    pub progress: f64,
    pub started_at: Instant,
    pub duration: Duration,
}

/// Request to start one thread; `duration: None` means a randomized one.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: String,
    pub duration: Option<Duration>,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: None,
        }
    }

    pub fn with_duration(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration: Some(duration),
        }
    }
}

/// Aggregate snapshot served by the facade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    pub active_threads: usize,
    pub completed_tasks: usize,
    pub total_threads: usize,
}

/// State mutations mirrored onto the broadcast channel. Renderers and the
/// log subscriber consume these; the controller never waits on receivers.
#[derive(Debug, Clone, Serialize)]
pub enum StateEvent {
    TaskStarted {
        id: TaskId,
        name: String,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
    TaskProgress {
        id: TaskId,
        progress: f64,
    },
    TaskCompleted {
        id: TaskId,
        name: String,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    },
    TaskRemoved {
        id: TaskId,
        timestamp: DateTime<Utc>,
    },
    TimelineAppended {
        entry: TimelineEntry,
    },
    Cleared {
        timestamp: DateTime<Utc>,
    },
}
