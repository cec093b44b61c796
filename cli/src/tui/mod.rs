mod app;
mod events;
mod terminal;
mod ui;

use std::io;
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use taskmon_core::api::TaskMonitorApi;
use taskmon_core::config::TuiConfig;
use taskmon_core::error::{CliError, MonitorError};

use app::{DashboardAction, DashboardApp};
use events::InputReader;
use terminal::{check_tui_support, restore_terminal, setup_terminal};

/// What the `a` key starts, matching the original single-task control.
const SINGLE_TASK_NAME: &str = "Single Task Execution";
const SINGLE_TASK_DURATION: Duration = Duration::from_millis(3000);

pub async fn run_dashboard(
    api: TaskMonitorApi,
    cfg: TuiConfig,
    session_id: String,
) -> Result<(), CliError> {
    check_tui_support().map_err(MonitorError::Terminal)?;
    let mut terminal = setup_terminal().map_err(MonitorError::Terminal)?;
    let mut app = DashboardApp::new(cfg, session_id);
    let result = run_loop(&mut terminal, &mut app, &api).await;
    restore_terminal(&mut terminal);
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut DashboardApp,
    api: &TaskMonitorApi,
) -> Result<(), CliError> {
    tracing::debug!("dashboard event loop starting");
    let (input_reader, mut input_rx) = InputReader::start();
    let mut tick =
        tokio::time::interval(Duration::from_millis(app.config.update_interval_ms.max(16)));

    let mut exit_requested = false;
    loop {
        tokio::select! {
            Some(key) = input_rx.recv() => {
                match app.handle_key(key) {
                    DashboardAction::Quit => exit_requested = true,
                    DashboardAction::StartTask => {
                        api.start_task(SINGLE_TASK_NAME, Some(SINGLE_TASK_DURATION)).await;
                    }
                    DashboardAction::SpawnBatch => {
                        let batch = api.demo_batch();
                        api.start_parallel_tasks(batch).await;
                    }
                    DashboardAction::Reset => {
                        api.monitor().reset_all().await;
                    }
                    DashboardAction::None => {}
                }
            }
            _ = tick.tick() => {}
        }

        refresh(app, api).await;
        app.maybe_hide_splash();
        terminal.draw(|f| ui::draw(f, app))?;

        if exit_requested {
            break;
        }
    }

    input_reader.stop();
    Ok(())
}

async fn refresh(app: &mut DashboardApp, api: &TaskMonitorApi) {
    app.stats = api.stats().await;
    app.tasks = api.monitor().snapshot().await;
    app.timeline = api.monitor().timeline_snapshot().await;
    app.uptime = api.monitor().uptime();
}
