use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Tabs},
    Frame,
};

use super::app::{App, InputMode, View};
use crate::models::{Category, Priority};

fn category_style(category: Category) -> Style {
    let (r, g, b) = category.color();
    Style::default().fg(Color::Rgb(r, g, b))
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    let titles: Vec<Line> = View::ALL
        .iter()
        .map(|v| {
            let label = match v {
                View::InProgress => format!("{} ({})", v.title(), app.counts[0]),
                View::Upcoming => format!("{} ({})", v.title(), app.counts[1]),
                View::Done => format!("{} ({})", v.title(), app.counts[2]),
                _ => v.title().to_string(),
            };
            Line::from(label)
        })
        .collect();
    let selected = View::ALL.iter().position(|v| *v == app.view).unwrap_or(0);
    let block_title = if app.search_query.is_empty() {
        "Tusk".to_string()
    } else {
        format!("Tusk - filter: {}", app.search_query)
    };
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title(block_title))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    match app.view {
        View::InProgress | View::Upcoming | View::Done => render_tasks(f, app, chunks[1]),
        View::Stats => render_stats(f, app, chunks[1]),
        View::Templates => render_templates(f, app, chunks[1]),
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view {
            View::Templates => "q: Quit | Tab: Next View | Enter: Create Tasks for Today | /: Filter",
            _ => "q: Quit | Tab: Next View | a: Quick Add | Space: Done | d: Del | /: Filter",
        },
        InputMode::Adding | InputMode::Searching => "Enter: Confirm | Esc: Cancel",
    };
    let help_line = match &app.message {
        Some(msg) => format!("{}  ·  {}", msg, help_text),
        None => help_text.to_string(),
    };
    let help = Paragraph::new(help_line)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    // Render Input Box if needed
    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);
        let title = match app.input_mode {
            InputMode::Adding => "Quick Add (e.g. 'urgent call client tomorrow 3pm for 2 hours')",
            _ => "Filter by title or category",
        };
        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(input, area);
    }
}

fn render_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|r| {
            let t = &r.task;
            let state = if t.is_completed() {
                t.completed_at.clone().unwrap_or_else(|| "Done".into())
            } else if r.overdue {
                "OVERDUE".to_string()
            } else {
                String::new()
            };
            let style = if r.overdue {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{} {}", t.priority.icon(), t.priority)),
                Cell::from(t.title.clone()),
                Cell::from(t.category.to_string()).style(category_style(t.category)),
                Cell::from(t.scheduled_date.clone()),
                Cell::from(format!("{}-{}", t.start_time, t.end_time)),
                Cell::from(state),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Priority", "Task", "Category", "Date", "Window", "State"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(app.view.title()))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_stats(f: &mut Frame, app: &App, area: Rect) {
    let Some(stats) = &app.stats else {
        let empty = Paragraph::new("No data to show yet. Add some tasks first.")
            .block(Block::default().borders(Borders::ALL).title("Analytics"));
        f.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Completion"))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio((stats.completion_rate / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.1}% ({}/{})", stats.completion_rate, stats.completed, stats.total));
    f.render_widget(gauge, chunks[0]);

    let mut lines = vec![
        Line::from(format!("Average duration of completed tasks: {:.1}h", stats.avg_duration_hours)),
        Line::from(""),
        Line::from("By priority"),
    ];
    for p in Priority::ALL {
        lines.push(Line::from(format!("  {} {:<8} {}", p.icon(), p, stats.priority_count(p))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("By category"));
    for c in Category::ALL {
        let n = stats.category_count(c);
        if n > 0 {
            lines.push(Line::styled(format!("  {:<10} {}", c, n), category_style(c)));
        }
    }
    let body = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Analytics"));
    f.render_widget(body, chunks[1]);
}

fn render_templates(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .templates
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.name.clone()),
                Cell::from(t.tasks.join(", ")),
                Cell::from(t.category.to_string()).style(category_style(t.category)),
                Cell::from(format!("{:.1}", t.duration_hours)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(18),
        Constraint::Min(30),
        Constraint::Length(10),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Name", "Tasks", "Category", "Hours"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Templates"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.template_state);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let pad = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(pad),
            Constraint::Length(height),
            Constraint::Length(pad),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
