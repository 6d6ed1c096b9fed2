//! Drawing the selector screen

use ledger_core::{RowStatus, SelectorState};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Gauge, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use super::App;

const MAX_GAUGES: usize = 6;
const LOG_HEIGHT: u16 = 10;

pub(crate) fn draw(frame: &mut Frame, app: &mut App) {
    let active = app.state().active_rows().count().min(MAX_GAUGES);
    let gauge_height = if active == 0 { 0 } else { active as u16 + 2 };

    let [help, list, gauges, log, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(gauge_height),
        Constraint::Length(LOG_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(help_line(), help);
    draw_table(frame, list, app);
    if active > 0 {
        draw_gauges(frame, gauges, app.state());
    }
    draw_log(frame, log, app.state());
    frame.render_widget(status_line(app), status);
}

fn help_line() -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled("space", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" toggle  "),
        Span::styled("a", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" enable all  "),
        Span::styled("c", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" clear all  "),
        Span::styled("/", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" filter  "),
        Span::styled("r", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" restore selected  "),
        Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" quit"),
    ]))
}

fn draw_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let state = &app.state;
    let visible = state.visible_rows();
    let total = state.rows().len();
    let ticked = state.rows().iter().filter(|r| r.included).count();

    let rows: Vec<Row> = visible
        .iter()
        .map(|&i| {
            let row = &state.rows()[i];
            let record = &row.entry.record;
            let check = if row.included { "[x]" } else { "[ ]" };
            let restored = if row.present { "Yes" } else { "No" };
            let style = if row.present {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(check),
                Cell::from((i + 1).to_string()),
                Cell::from(record.repo_name.clone()),
                Cell::from(restored),
                Cell::from(record.local_path.clone()),
                Cell::from(record.remote_url.clone()),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["Select", "Index", "Repo Name", "Restored", "Local Folder", "Remote URL"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let title = format!(
        " Repositories ({} shown, {} of {} selected) ",
        visible.len(),
        ticked,
        total
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Percentage(22),
            Constraint::Length(9),
            Constraint::Percentage(30),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .block(Block::bordered().title(title))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(table, area, &mut app.table);
}

fn draw_gauges(frame: &mut Frame, area: Rect, state: &SelectorState) {
    let block = Block::bordered().title(" Progress ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active: Vec<_> = state.active_rows().take(MAX_GAUGES).collect();
    let lines = Layout::vertical(vec![Constraint::Length(1); active.len()]).split(inner);

    for ((_, row), line) in active.iter().zip(lines.iter()) {
        let color = match row.status {
            RowStatus::Failed => Color::Red,
            RowStatus::Cloned | RowStatus::Skipped => Color::Green,
            _ => Color::Cyan,
        };
        let label = format!("{:>3}%  {}", row.progress, row.entry.record.local_path);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .percent(u16::from(row.progress.min(100)))
            .label(label);
        frame.render_widget(gauge, *line);
    }
}

fn draw_log(frame: &mut Frame, area: Rect, state: &SelectorState) {
    let height = area.height.saturating_sub(2) as usize;
    let log = state.log();
    let start = log.len().saturating_sub(height);
    let lines: Vec<Line> = log.iter().skip(start).map(|l| Line::from(l.as_str())).collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::bordered().title(" Output "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn status_line(app: &App) -> Paragraph<'static> {
    let state = app.state();

    let text = if app.is_filtering() {
        format!("Filter: {}_  (Enter to keep, Esc to clear)", state.filter())
    } else if app.confirm_quit() {
        "A restore is still running. Press q again to quit.".to_string()
    } else if let Some(notice) = state.notice() {
        notice.to_string()
    } else if state.is_running() {
        "Restoring...".to_string()
    } else if !state.filter().is_empty() {
        format!("Filter: {}", state.filter())
    } else {
        String::new()
    };

    Paragraph::new(text).style(Style::default().fg(Color::Yellow))
}
