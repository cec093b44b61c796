use std::collections::VecDeque;

use serde::Serialize;

use super::types::TaskStatus;

/// One human-readable status event, labelled with wall-clock "HH:MM:SS".
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub label: String,
    pub description: String,
    pub status: TaskStatus,
}

impl TimelineEntry {
    pub fn now(description: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            label: chrono::Local::now().format("%H:%M:%S").to_string(),
            description: description.into(),
            status,
        }
    }
}

/// Bounded event log, newest first. Past the cap the oldest entry is evicted.
#[derive(Debug)]
pub struct Timeline {
    entries: VecDeque<TimelineEntry>,
    cap: usize,
}

impl Timeline {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap.min(64)),
            cap,
        }
    }

    pub fn push(&mut self, entry: TimelineEntry) {
        self.entries.push_front(entry);
        while self.entries.len() > self.cap {
            self.entries.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<TimelineEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(desc: &str) -> TimelineEntry {
        TimelineEntry::now(desc, TaskStatus::Running)
    }

    #[test]
    fn newest_entry_is_first() {
        let mut timeline = Timeline::new(50);
        timeline.push(entry("first"));
        timeline.push(entry("second"));

        let descriptions: Vec<_> = timeline.iter().map(|e| e.description.clone()).collect();
        assert_eq!(descriptions, vec!["second", "first"]);
    }

    #[test]
    fn cap_evicts_oldest_first() {
        let mut timeline = Timeline::new(50);
        for i in 0..60 {
            timeline.push(entry(&format!("event {i}")));
        }

        assert_eq!(timeline.len(), 50);
        // Newest survives at the front, the ten oldest are gone.
        assert_eq!(timeline.iter().next().unwrap().description, "event 59");
        assert_eq!(timeline.iter().last().unwrap().description, "event 10");
    }

    #[test]
    fn clear_empties_the_log() {
        let mut timeline = Timeline::new(50);
        timeline.push(entry("something"));
        timeline.clear();
        assert!(timeline.is_empty());
    }
}
