use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use taskmon_core::config::TuiConfig;
use taskmon_core::monitor::{MonitorStats, TaskRecord, TimelineEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Threads,
    Timeline,
}

/// What the dashboard loop should do in response to a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    None,
    Quit,
    StartTask,
    SpawnBatch,
    Reset,
}

/// View state of the dashboard. Passive: the loop feeds it fresh snapshots
/// each tick and it only tracks presentation concerns (panel, scroll, splash).
pub struct DashboardApp {
    pub config: TuiConfig,
    pub session_id: String,
    pub stats: MonitorStats,
    pub tasks: Vec<TaskRecord>,
    pub timeline: Vec<TimelineEntry>,
    pub uptime: Duration,
    pub active_panel: PanelKind,
    pub scroll_offsets: [usize; 2],
    pub show_splash: bool,
    pub splash_start: Instant,
}

impl DashboardApp {
    pub fn new(config: TuiConfig, session_id: String) -> Self {
        let show_splash = config.show_splash;
        Self {
            config,
            session_id,
            stats: MonitorStats::default(),
            tasks: Vec::new(),
            timeline: Vec::new(),
            uptime: Duration::ZERO,
            active_panel: PanelKind::Threads,
            scroll_offsets: [0; 2],
            show_splash,
            splash_start: Instant::now(),
        }
    }

    pub fn maybe_hide_splash(&mut self) {
        if !self.show_splash {
            return;
        }
        let elapsed = self.splash_start.elapsed().as_millis() as u64;
        if elapsed >= self.config.splash_duration_ms {
            self.show_splash = false;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DashboardAction {
        use crossterm::event::KeyCode;
        use crossterm::event::KeyModifiers;

        match key.code {
            KeyCode::Char('q') => return DashboardAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return DashboardAction::Quit;
            }
            KeyCode::Char('a') => return DashboardAction::StartTask,
            KeyCode::Char('p') => return DashboardAction::SpawnBatch,
            KeyCode::Char('c') => return DashboardAction::Reset,
            KeyCode::Tab => self.next_panel(),
            KeyCode::Char('1') => self.active_panel = PanelKind::Threads,
            KeyCode::Char('2') => self.active_panel = PanelKind::Timeline,
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::Char('g') => self.scroll_offsets[self.panel_index()] = 0,
            KeyCode::Char('G') => self.scroll_offsets[self.panel_index()] = usize::MAX / 2,
            _ => {}
        }
        DashboardAction::None
    }

    pub fn panel_index(&self) -> usize {
        match self.active_panel {
            PanelKind::Threads => 0,
            PanelKind::Timeline => 1,
        }
    }

    fn next_panel(&mut self) {
        self.active_panel = match self.active_panel {
            PanelKind::Threads => PanelKind::Timeline,
            PanelKind::Timeline => PanelKind::Threads,
        };
    }

    fn scroll_up(&mut self, amount: usize) {
        let idx = self.panel_index();
        self.scroll_offsets[idx] = self.scroll_offsets[idx].saturating_sub(amount);
    }

    fn scroll_down(&mut self, amount: usize) {
        let idx = self.panel_index();
        self.scroll_offsets[idx] = self.scroll_offsets[idx].saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn app() -> DashboardApp {
        let config = TuiConfig {
            show_splash: false,
            ..TuiConfig::default()
        };
        DashboardApp::new(config, "test-session".to_string())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert_eq!(app.handle_key(press(KeyCode::Char('q'))), DashboardAction::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            DashboardAction::Quit
        );
    }

    #[test]
    fn control_keys_map_to_actions() {
        let mut app = app();
        assert_eq!(
            app.handle_key(press(KeyCode::Char('a'))),
            DashboardAction::StartTask
        );
        assert_eq!(
            app.handle_key(press(KeyCode::Char('p'))),
            DashboardAction::SpawnBatch
        );
        assert_eq!(
            app.handle_key(press(KeyCode::Char('c'))),
            DashboardAction::Reset
        );
    }

    #[test]
    fn tab_cycles_panels_and_scroll_clamps_at_zero() {
        let mut app = app();
        assert_eq!(app.active_panel, PanelKind::Threads);
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.active_panel, PanelKind::Timeline);

        app.handle_key(press(KeyCode::Char('k')));
        assert_eq!(app.scroll_offsets[1], 0);
        app.handle_key(press(KeyCode::Char('j')));
        assert_eq!(app.scroll_offsets[1], 1);
    }
}
