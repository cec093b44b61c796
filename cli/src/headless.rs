//! Headless demo renderer: drives the scripted batch and mirrors registry
//! snapshots onto indicatif progress bars, then exits once everything drains.

use std::collections::HashMap;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use taskmon_core::api::{TaskMonitorApi, DEMO_BATCH};
use taskmon_core::error::CliError;
use taskmon_core::monitor::{TaskId, TaskStatus};

use crate::commands::cli::DemoArgs;

const POLL_INTERVAL_MS: u64 = 50;

pub async fn run_demo(api: &TaskMonitorApi, args: &DemoArgs) -> Result<(), CliError> {
    let progress = MultiProgress::new();
    let style = ProgressStyle::with_template("{prefix:>11} [{bar:40.green}] {pos:>3}% {msg}")
        .map_err(|e| CliError::Command(e.to_string()))?
        .progress_chars("=> ");

    for batch in 0..args.batches.max(1) {
        tracing::info!("demo batch {} of {}", batch + 1, args.batches.max(1));
        api.start_parallel_tasks(api.demo_batch()).await;
        drain_batch(api, &progress, &style).await;
    }

    let stats = api.stats().await;
    tracing::info!("demo complete, {} tasks finished", stats.completed_tasks);
    Ok(())
}

/// Poll snapshots until every thread of the batch has appeared and the
/// registry is empty again (completed, lingered, removed).
async fn drain_batch(api: &TaskMonitorApi, progress: &MultiProgress, style: &ProgressStyle) {
    let mut bars: HashMap<TaskId, ProgressBar> = HashMap::new();
    let mut seen = 0usize;

    loop {
        tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;

        for record in api.monitor().snapshot().await {
            let bar = bars.entry(record.id).or_insert_with(|| {
                seen += 1;
                let bar = progress.add(ProgressBar::new(100));
                bar.set_style(style.clone());
                bar.set_prefix(format!("THREAD_{:03}", record.id));
                bar.set_message(record.name.clone());
                bar
            });
            bar.set_position(record.progress as u64);
            if record.status == TaskStatus::Completed && !bar.is_finished() {
                bar.finish();
            }
        }

        if seen >= DEMO_BATCH.len() && api.stats().await.total_threads == 0 {
            break;
        }
    }

    for bar in bars.values() {
        bar.finish_and_clear();
    }
    let _ = progress.clear();
}
