use clap::Parser;
mod commands;
mod headless;
mod tui;

use std::path::Path;
use std::time::Duration;

use commands::cli::{Args, Commands, RunArgs};
use taskmon_core::api::TaskMonitorApi;
use taskmon_core::error::{CliError, MonitorError};
use taskmon_core::monitor::{StateEvent, TaskMonitor, TaskStatus};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = Args::parse();
    let cfg = match args.config.as_deref() {
        Some(path) => taskmon_core::config::load_from(Path::new(path)),
        None => taskmon_core::config::load_default(),
    }
    .map_err(|e| CliError::Config(e.to_string()))?;
    init_tracing(&cfg.logging).map_err(CliError::Command)?;

    let monitor = TaskMonitor::new(cfg.visual.clone());
    let api = TaskMonitorApi::new(monitor.clone());
    spawn_event_logger(&monitor);

    match args.command {
        Some(Commands::Demo(demo_args)) => {
            headless::run_demo(&api, &demo_args).await?;
            Ok(0)
        }
        Some(Commands::Run(run_args)) => run_dashboard(api, &cfg, run_args).await,
        None => run_dashboard(api, &cfg, RunArgs::default()).await,
    }
}

async fn run_dashboard(
    api: TaskMonitorApi,
    cfg: &taskmon_core::config::AppConfig,
    run_args: RunArgs,
) -> Result<i32, CliError> {
    let session_id = uuid::Uuid::new_v4().to_string();

    // Boot sequence from the original demo: a couple of seed timeline
    // entries shortly after startup.
    {
        let api = api.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            api.log_event("System initialized", TaskStatus::Completed)
                .await;
            api.log_event("Cryo Archive access granted", TaskStatus::Completed)
                .await;
        });
    }

    if let Some(name) = run_args.task {
        api.start_task(name, run_args.duration_ms.map(Duration::from_millis))
            .await;
    }
    if run_args.parallel {
        let batch = api.demo_batch();
        api.start_parallel_tasks(batch).await;
    }

    let mut tui_cfg = cfg.tui.clone();
    if run_args.no_splash {
        tui_cfg.show_splash = false;
    }

    tui::run_dashboard(api, tui_cfg, session_id).await?;
    Ok(0)
}

fn spawn_event_logger(monitor: &TaskMonitor) {
    let mut event_rx = monitor.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            match event {
                StateEvent::TaskStarted {
                    id,
                    name,
                    duration_ms,
                    ..
                } => {
                    tracing::debug!("thread {} started: {} ({}ms)", id, name, duration_ms);
                }
                StateEvent::TaskCompleted {
                    id, elapsed_ms, ..
                } => {
                    tracing::info!("thread {} completed ({}ms)", id, elapsed_ms);
                }
                StateEvent::TaskRemoved { id, .. } => {
                    tracing::debug!("thread {} removed", id);
                }
                StateEvent::Cleared { .. } => {
                    tracing::info!("monitor cleared");
                }
                // Per-tick progress is too chatty for the log.
                StateEvent::TaskProgress { .. } | StateEvent::TimelineAppended { .. } => {}
            }
        }
    });
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 11: config error
    // 20: terminal / IO error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Monitor(me) => match me {
            MonitorError::Config(_) => 11,
            MonitorError::Terminal(_) => 20,
        },
        CliError::Io(_) => 20,
        CliError::Command(_) => 20,
        CliError::Anyhow(_) => 50,
    }
}

fn init_tracing(logging: &taskmon_core::config::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("taskmon"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("taskmon.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    // Console logging defaults off: stderr writes would tear the dashboard.
    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
