//! Facade over the visual state controller.
//!
//! The only programmatic integration surface: start tasks, start a staggered
//! batch, append timeline events, and read the aggregate snapshot. Holds no
//! state of its own.

use std::time::Duration;

use rand::Rng;

use crate::monitor::{MonitorStats, TaskId, TaskMonitor, TaskSpec, TaskStatus};

/// Names of the scripted demo batch.
pub const DEMO_BATCH: [&str; 5] = [
    "Read File: config.json",
    "Parse XML: slide38.xml",
    "Execute Bash: git status",
    "Grep Search: cocktail timeline",
    "Web Fetch: marathon news",
];

#[derive(Clone)]
pub struct TaskMonitorApi {
    monitor: TaskMonitor,
}

impl TaskMonitorApi {
    pub fn new(monitor: TaskMonitor) -> Self {
        Self { monitor }
    }

    pub fn monitor(&self) -> &TaskMonitor {
        &self.monitor
    }

    pub async fn start_task(&self, name: impl Into<String>, duration: Option<Duration>) -> TaskId {
        self.monitor.start(name, duration).await
    }

    pub async fn start_parallel_tasks(&self, specs: Vec<TaskSpec>) {
        self.monitor.spawn_batch(specs).await;
    }

    pub async fn log_event(&self, message: impl Into<String>, status: TaskStatus) {
        self.monitor.log_event(message, status).await;
    }

    pub async fn stats(&self) -> MonitorStats {
        self.monitor.stats().await
    }

    /// The scripted parallel batch with randomized per-thread durations.
    pub fn demo_batch(&self) -> Vec<TaskSpec> {
        let cfg = self.monitor.config();
        let mut rng = rand::thread_rng();
        DEMO_BATCH
            .iter()
            .map(|name| {
                let ms = if cfg.batch_max_duration_ms > cfg.batch_min_duration_ms {
                    rng.gen_range(cfg.batch_min_duration_ms..cfg.batch_max_duration_ms)
                } else {
                    cfg.batch_min_duration_ms
                };
                TaskSpec::with_duration(*name, Duration::from_millis(ms))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisualConfig;
    use pretty_assertions::assert_eq;

    #[tokio::test(start_paused = true)]
    async fn demo_batch_covers_all_names() {
        let api = TaskMonitorApi::new(TaskMonitor::new(VisualConfig::default()));
        let specs = api.demo_batch();
        assert_eq!(specs.len(), DEMO_BATCH.len());
        for (spec, name) in specs.iter().zip(DEMO_BATCH) {
            assert_eq!(spec.name, name);
            let d = spec.duration.unwrap();
            assert!(d >= Duration::from_millis(1000));
            assert!(d < Duration::from_millis(5000));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn log_event_reaches_the_timeline() {
        let api = TaskMonitorApi::new(TaskMonitor::new(VisualConfig::default()));
        api.log_event("System initialized", TaskStatus::Completed)
            .await;

        let timeline = api.monitor().timeline_snapshot().await;
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].description, "System initialized");
    }
}
