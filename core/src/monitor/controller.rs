use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use super::timeline::{Timeline, TimelineEntry};
use super::types::{MonitorStats, StateEvent, TaskId, TaskRecord, TaskSpec, TaskStatus};
use crate::config::VisualConfig;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// The visual state controller.
///
/// Cheap to clone; all clones share one registry, timeline, and counter set.
/// Mutations are fire-and-forget: nothing here returns an error because the
/// simulation has nothing that can fail (operations on absent ids no-op).
#[derive(Clone)]
pub struct TaskMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    cfg: VisualConfig,
    tasks: RwLock<HashMap<TaskId, TaskRecord>>,
    timeline: RwLock<Timeline>,
    timers: Mutex<TimerTable>,
    next_id: AtomicU64,
    completed: AtomicUsize,
    started_at: Instant,
    event_tx: broadcast::Sender<StateEvent>,
}

/// Pending timer handles, kept so reset/removal can abort them explicitly
/// rather than leaving callbacks to fire against a cleared registry.
#[derive(Default)]
struct TimerTable {
    per_task: HashMap<TaskId, JoinHandle<()>>,
    batches: Vec<JoinHandle<()>>,
}

impl TimerTable {
    fn drain(&mut self) -> Vec<JoinHandle<()>> {
        let mut handles: Vec<_> = self.per_task.drain().map(|(_, h)| h).collect();
        handles.append(&mut self.batches);
        handles
    }
}

enum Tick {
    Running,
    Done,
    Gone,
}

impl TaskMonitor {
    pub fn new(cfg: VisualConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let timeline_cap = cfg.timeline_cap;

        Self {
            inner: Arc::new(MonitorInner {
                cfg,
                tasks: RwLock::new(HashMap::new()),
                timeline: RwLock::new(Timeline::new(timeline_cap)),
                timers: Mutex::new(TimerTable::default()),
                next_id: AtomicU64::new(1),
                completed: AtomicUsize::new(0),
                started_at: Instant::now(),
                event_tx,
            }),
        }
    }

    pub fn config(&self) -> &VisualConfig {
        &self.inner.cfg
    }

    /// Subscribe to state mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Start one simulated thread. Always succeeds; returns the new id.
    pub async fn start(&self, name: impl Into<String>, duration: Option<Duration>) -> TaskId {
        let name = name.into();
        let duration = duration.unwrap_or_else(|| self.random_duration());
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);

        let record = TaskRecord {
            id,
            name: name.clone(),
            status: TaskStatus::Running,
            progress: 0.0,
            started_at: Instant::now(),
            duration,
        };
        self.inner.tasks.write().await.insert(id, record);

        self.log_event(
            format!("Thread {id} initialized: {name}"),
            TaskStatus::Running,
        )
        .await;
        self.emit(StateEvent::TaskStarted {
            id,
            name,
            duration_ms: duration.as_millis() as u64,
            timestamp: Utc::now(),
        });
        tracing::debug!("thread {} started, planned {}ms", id, duration.as_millis());

        let monitor = self.clone();
        let handle = tokio::spawn(async move { monitor.run_ticker(id).await });
        self.inner.timers.lock().await.per_task.insert(id, handle);

        id
    }

    /// Start several threads with staggered offsets so the bars desync.
    pub async fn spawn_batch(&self, specs: Vec<TaskSpec>) {
        if specs.is_empty() {
            return;
        }
        self.log_event(
            format!("Spawned {} parallel threads", specs.len()),
            TaskStatus::Running,
        )
        .await;

        let monitor = self.clone();
        let stagger = self.inner.cfg.stagger();
        let handle = tokio::spawn(async move {
            for (i, spec) in specs.into_iter().enumerate() {
                if i > 0 {
                    time::sleep(stagger).await;
                }
                monitor.start(spec.name, spec.duration).await;
            }
        });

        let mut timers = self.inner.timers.lock().await;
        timers.batches.retain(|h| !h.is_finished());
        timers.batches.push(handle);
    }

    /// Delete a thread record after the fade-out delay. No-op if the id is
    /// absent, so races between completion-linger and a manual clear are
    /// benign.
    pub async fn remove(&self, id: TaskId) {
        if !self.inner.tasks.read().await.contains_key(&id) {
            return;
        }
        time::sleep(self.inner.cfg.remove_fade()).await;
        if self.inner.tasks.write().await.remove(&id).is_some() {
            self.emit(StateEvent::TaskRemoved {
                id,
                timestamp: Utc::now(),
            });
            tracing::debug!("thread {} removed from display", id);
        }
    }

    /// Clear everything back to initial state: abort every pending timer,
    /// wipe the registry and timeline, reset the counters, then log a single
    /// purge entry.
    pub async fn reset_all(&self) {
        let handles = self.inner.timers.lock().await.drain();
        for handle in handles {
            handle.abort();
        }

        self.inner.tasks.write().await.clear();
        self.inner.timeline.write().await.clear();
        self.inner.completed.store(0, Ordering::SeqCst);
        self.inner.next_id.store(1, Ordering::SeqCst);

        self.emit(StateEvent::Cleared {
            timestamp: Utc::now(),
        });
        self.log_event("System logs purged", TaskStatus::Completed)
            .await;
        tracing::info!("monitor state purged");
    }

    /// Append a timeline entry directly.
    pub async fn log_event(&self, description: impl Into<String>, status: TaskStatus) {
        let entry = TimelineEntry::now(description, status);
        self.inner.timeline.write().await.push(entry.clone());
        self.emit(StateEvent::TimelineAppended { entry });
    }

    /// Aggregate counts: running threads, completed accumulator, registry size.
    pub async fn stats(&self) -> MonitorStats {
        let tasks = self.inner.tasks.read().await;
        let active_threads = tasks
            .values()
            .filter(|t| t.status == TaskStatus::Running)
            .count();
        MonitorStats {
            active_threads,
            completed_tasks: self.inner.completed.load(Ordering::SeqCst),
            total_threads: tasks.len(),
        }
    }

    /// Registry snapshot, newest thread first.
    pub async fn snapshot(&self) -> Vec<TaskRecord> {
        let tasks = self.inner.tasks.read().await;
        let mut records: Vec<_> = tasks.values().cloned().collect();
        records.sort_by(|a, b| b.id.cmp(&a.id));
        records
    }

    pub async fn timeline_snapshot(&self) -> Vec<TimelineEntry> {
        self.inner.timeline.read().await.to_vec()
    }

    pub fn uptime(&self) -> Duration {
        self.inner.started_at.elapsed()
    }

    fn emit(&self, event: StateEvent) {
        let _ = self.inner.event_tx.send(event);
    }

    fn random_duration(&self) -> Duration {
        let min = self.inner.cfg.min_duration_ms;
        let max = self.inner.cfg.max_duration_ms;
        let ms = if max > min {
            rand::thread_rng().gen_range(min..max)
        } else {
            min
        };
        Duration::from_millis(ms)
    }

    /// One thread's whole lifecycle: tick progress until the planned duration
    /// elapses, mark completed, linger on screen, then remove. The spawned
    /// chain is held in the timer table so a reset aborts it wholesale.
    async fn run_ticker(self, id: TaskId) {
        let mut ticker = time::interval(self.inner.cfg.tick_interval());
        loop {
            ticker.tick().await;
            match self.advance(id).await {
                Tick::Running => {}
                Tick::Done => break,
                Tick::Gone => {
                    self.forget_timer(id).await;
                    return;
                }
            }
        }

        self.complete(id).await;
        time::sleep(self.inner.cfg.linger()).await;
        self.remove(id).await;
        self.forget_timer(id).await;
    }

    async fn advance(&self, id: TaskId) -> Tick {
        let mut tasks = self.inner.tasks.write().await;
        let Some(record) = tasks.get_mut(&id) else {
            return Tick::Gone;
        };

        let elapsed = record.started_at.elapsed();
        if elapsed >= record.duration {
            return Tick::Done;
        }

        let fraction = elapsed.as_secs_f64() / record.duration.as_secs_f64();
        let progress = (fraction * 100.0).min(100.0);
        // Progress never moves backwards.
        if progress > record.progress {
            record.progress = progress;
        }
        let progress = record.progress;
        drop(tasks);

        self.emit(StateEvent::TaskProgress { id, progress });
        Tick::Running
    }

    async fn complete(&self, id: TaskId) {
        let (name, elapsed) = {
            let mut tasks = self.inner.tasks.write().await;
            let Some(record) = tasks.get_mut(&id) else {
                return;
            };
            record.status = TaskStatus::Completed;
            record.progress = 100.0;
            (record.name.clone(), record.started_at.elapsed())
        };

        self.inner.completed.fetch_add(1, Ordering::SeqCst);
        self.log_event(
            format!(
                "Thread {id} completed: {name} [{:.2}s]",
                elapsed.as_secs_f64()
            ),
            TaskStatus::Completed,
        )
        .await;
        self.emit(StateEvent::TaskCompleted {
            id,
            name,
            elapsed_ms: elapsed.as_millis() as u64,
            timestamp: Utc::now(),
        });
        tracing::debug!("thread {} completed in {}ms", id, elapsed.as_millis());
    }

    async fn forget_timer(&self, id: TaskId) {
        self.inner.timers.lock().await.per_task.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn monitor() -> TaskMonitor {
        TaskMonitor::new(VisualConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn start_allocates_sequential_ids() {
        let monitor = monitor();
        let a = monitor
            .start("first", Some(Duration::from_millis(500)))
            .await;
        let b = monitor
            .start("second", Some(Duration::from_millis(500)))
            .await;
        assert_eq!(a, 1);
        assert_eq!(b, 2);

        let stats = monitor.stats().await;
        assert_eq!(stats.active_threads, 2);
        assert_eq!(stats.total_threads, 2);
        assert_eq!(stats.completed_tasks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn progress_is_monotonic_and_hits_exactly_100() {
        let monitor = monitor();
        let id = monitor.start("work", Some(Duration::from_millis(400))).await;

        let mut last = 0.0;
        for _ in 0..6 {
            time::sleep(Duration::from_millis(60)).await;
            if let Some(record) = monitor.snapshot().await.into_iter().find(|r| r.id == id) {
                assert!(record.progress >= last);
                last = record.progress;
            }
        }

        time::sleep(Duration::from_millis(200)).await;
        let record = monitor
            .snapshot()
            .await
            .into_iter()
            .find(|r| r.id == id)
            .unwrap();
        assert_eq!(record.status, TaskStatus::Completed);
        assert_eq!(record.progress, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_not_earlier_than_duration() {
        let monitor = monitor();
        let id = monitor.start("slow", Some(Duration::from_millis(500))).await;

        time::sleep(Duration::from_millis(430)).await;
        let record = monitor
            .snapshot()
            .await
            .into_iter()
            .find(|r| r.id == id)
            .unwrap();
        assert_eq!(record.status, TaskStatus::Running);
        assert!(record.progress < 100.0);

        // One tick past the planned duration it must be done.
        time::sleep(Duration::from_millis(130)).await;
        let record = monitor
            .snapshot()
            .await
            .into_iter()
            .find(|r| r.id == id)
            .unwrap();
        assert_eq!(record.status, TaskStatus::Completed);
        assert_eq!(monitor.stats().await.completed_tasks, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_thread_lingers_then_disappears() {
        let monitor = monitor();
        monitor.start("gone", Some(Duration::from_millis(200))).await;

        // Past completion but inside the 2000ms linger.
        time::sleep(Duration::from_millis(700)).await;
        assert_eq!(monitor.stats().await.total_threads, 1);
        assert_eq!(monitor.stats().await.active_threads, 0);

        // Past linger plus fade the record is deleted.
        time::sleep(Duration::from_millis(2100)).await;
        let stats = monitor.stats().await;
        assert_eq!(stats.total_threads, 0);
        assert_eq!(stats.completed_tasks, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_of_absent_id_is_noop() {
        let monitor = monitor();
        monitor.remove(999).await;
        assert_eq!(monitor.stats().await, MonitorStats::default());
    }

    #[tokio::test(start_paused = true)]
    async fn batch_staggers_distinct_ids() {
        let monitor = monitor();
        let specs: Vec<_> = (0..5)
            .map(|i| TaskSpec::with_duration(format!("job {i}"), Duration::from_secs(3)))
            .collect();
        monitor.spawn_batch(specs).await;

        // Only the first thread starts immediately.
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(monitor.stats().await.total_threads, 1);

        // All five are live after the staggered offsets pass.
        time::sleep(Duration::from_millis(450)).await;
        let records = monitor.snapshot().await;
        assert_eq!(records.len(), 5);
        let mut ids: Vec<_> = records.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_pending_timers() {
        let monitor = monitor();
        let mut events = monitor.subscribe();
        monitor
            .start("doomed", Some(Duration::from_millis(300)))
            .await;

        time::sleep(Duration::from_millis(100)).await;
        monitor.reset_all().await;

        let stats = monitor.stats().await;
        assert_eq!(stats, MonitorStats::default());

        // Long after the doomed thread would have finished, no completion
        // event may surface: the ticker was aborted, not just orphaned.
        time::sleep(Duration::from_secs(10)).await;
        while let Ok(event) = events.try_recv() {
            assert!(!matches!(event, StateEvent::TaskCompleted { .. }));
        }
        assert_eq!(monitor.stats().await.completed_tasks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restarts_the_id_counter() {
        let monitor = monitor();
        monitor.start("one", Some(Duration::from_secs(5))).await;
        monitor.start("two", Some(Duration::from_secs(5))).await;
        monitor.reset_all().await;

        let id = monitor.start("fresh", Some(Duration::from_secs(5))).await;
        assert_eq!(id, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_leaves_a_single_purge_entry() {
        let monitor = monitor();
        monitor.start("noise", Some(Duration::from_secs(5))).await;
        monitor.reset_all().await;

        let timeline = monitor.timeline_snapshot().await;
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].description, "System logs purged");
        assert_eq!(timeline[0].status, TaskStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn random_durations_stay_in_bounds() {
        let monitor = monitor();
        for _ in 0..20 {
            let d = monitor.random_duration();
            assert!(d >= Duration::from_millis(2000));
            assert!(d < Duration::from_millis(7000));
        }
    }
}
