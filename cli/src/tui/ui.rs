use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;
use taskmon_core::monitor::{TaskRecord, TaskStatus, TimelineEntry};

use super::app::{DashboardApp, PanelKind};

const THREAD_ROW_HEIGHT: u16 = 3;

pub fn draw(f: &mut Frame<'_>, app: &DashboardApp) {
    let size = f.area();
    if app.show_splash {
        draw_splash(f, size);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    draw_header(f, chunks[0], app);
    draw_main(f, chunks[1], app);
    draw_footer(f, chunks[2]);
}

fn draw_header(f: &mut Frame<'_>, area: Rect, app: &DashboardApp) {
    let session = if app.session_id.len() > 8 {
        &app.session_id[..8]
    } else {
        &app.session_id
    };
    let line = Line::from(vec![
        Span::styled("Taskmon", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  Session: "),
        Span::styled(session.to_string(), Style::default().fg(Color::Gray)),
        Span::raw("  Active: "),
        Span::styled(
            app.stats.active_threads.to_string(),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  Done: "),
        Span::styled(
            app.stats.completed_tasks.to_string(),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  Uptime: "),
        Span::styled(
            format_uptime(app.uptime.as_secs()),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn draw_main(f: &mut Frame<'_>, area: Rect, app: &DashboardApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_threads(f, chunks[0], app);
    draw_timeline(f, chunks[1], app);
}

fn draw_threads(f: &mut Frame<'_>, area: Rect, app: &DashboardApp) {
    let active = app.active_panel == PanelKind::Threads;
    let block = panel_block("Threads [1]", active);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.tasks.is_empty() {
        let idle = Paragraph::new(Line::from(Span::styled(
            "no threads running",
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center);
        f.render_widget(idle, inner);
        return;
    }

    // Newest first, skipping past the scroll offset one row at a time.
    let visible = (inner.height / THREAD_ROW_HEIGHT) as usize;
    let offset = app.scroll_offsets[0].min(app.tasks.len().saturating_sub(visible.max(1)));
    let mut y = inner.y;
    for record in app.tasks.iter().skip(offset) {
        if y + THREAD_ROW_HEIGHT > inner.y + inner.height {
            break;
        }
        let rect = Rect::new(inner.x, y, inner.width, THREAD_ROW_HEIGHT);
        draw_thread_gauge(f, rect, record);
        y += THREAD_ROW_HEIGHT;
    }
}

fn draw_thread_gauge(f: &mut Frame<'_>, area: Rect, record: &TaskRecord) {
    let status_style = match record.status {
        TaskStatus::Running => Style::default().fg(Color::Green),
        TaskStatus::Completed => Style::default().fg(Color::Cyan),
    };
    let title = Line::from(vec![
        Span::styled(
            format!("THREAD_{:03} ", record.id),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(record.name.clone(), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(record.status.label(), status_style),
    ]);

    let gauge_style = match record.status {
        TaskStatus::Running => Style::default().fg(Color::Green),
        // Completed bars dim while they linger on screen.
        TaskStatus::Completed => Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM),
    };
    let ratio = (record.progress / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(gauge_style)
        .ratio(ratio)
        .label(format!("{:.0}%", record.progress));
    f.render_widget(gauge, area);
}

fn draw_timeline(f: &mut Frame<'_>, area: Rect, app: &DashboardApp) {
    let active = app.active_panel == PanelKind::Timeline;
    let block = panel_block("Event Timeline [2]", active);
    let lines: Vec<Line> = app.timeline.iter().map(timeline_line).collect();
    let offset = timeline_scroll(lines.len(), area.height, app);
    let widget = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    f.render_widget(widget, area);
}

fn timeline_line(entry: &TimelineEntry) -> Line<'_> {
    let status_color = match entry.status {
        TaskStatus::Running => Color::Green,
        TaskStatus::Completed => Color::Cyan,
    };
    Line::from(vec![
        Span::styled(
            format!("[{}] ", entry.label),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(entry.description.clone(), Style::default().fg(status_color)),
    ])
}

fn timeline_scroll(lines_len: usize, height: u16, app: &DashboardApp) -> u16 {
    if height == 0 {
        return 0;
    }
    let max_offset = lines_len.saturating_sub(height.saturating_sub(2) as usize);
    app.scroll_offsets[1].min(max_offset) as u16
}

fn draw_footer(f: &mut Frame<'_>, area: Rect) {
    let hint = "q:quit  a:add task  p:parallel batch  c:clear  Tab:panel  j/k:scroll";
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::styled(hint, Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}

fn panel_block(title: &str, active: bool) -> Block<'_> {
    let mut block = Block::default().borders(Borders::ALL).title(title);
    if active {
        block = block.border_style(Style::default().fg(Color::Cyan));
    }
    block
}

fn draw_splash(f: &mut Frame<'_>, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    f.render_widget(block, area);

    let banner = vec![
        " _            _                         ",
        "| |_ __ _ ___| | ___ __ ___   ___  _ __ ",
        "| __/ _` / __| |/ / '_ ` _ \\ / _ \\| '_ \\",
        "| || (_| \\__ \\   <| | | | | | (_) | | | |",
        " \\__\\__,_|___/_|\\_\\_| |_| |_|\\___/|_| |_|",
        "     parallel thread execution monitor",
        "",
        "Initializing dashboard...",
    ];
    let lines: Vec<Line> = banner.into_iter().map(Line::from).collect();
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

pub fn format_uptime(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn uptime_formats_as_hms() {
        assert_eq!(format_uptime(0), "00:00:00");
        assert_eq!(format_uptime(61), "00:01:01");
        assert_eq!(format_uptime(3723), "01:02:03");
    }
}
