use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use time_humanize::HumanTime;

use crate::recorder::SessionSummary;

/// Pure presenter for a single history row
pub fn present_row(summary: &SessionSummary) -> Row<'static> {
    let seconds_ago = (Utc::now() - summary.date).num_seconds();
    let when = HumanTime::from(-seconds_ago).to_string();

    Row::new(vec![
        Cell::from(when),
        Cell::from(summary.score.to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(summary.items_completed.to_string()),
        Cell::from(format!("{:.1}%", summary.accuracy_percent)),
        Cell::from(format!("{:.1}", summary.rate)),
        Cell::from(summary.longest_streak.to_string()),
        Cell::from(format!("{}s", summary.duration_seconds)),
    ])
}

/// Render the recent-rounds screen, newest first
pub fn render_history(f: &mut Frame, area: Rect, title: &str, sessions: &[SessionSummary]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    if sessions.is_empty() {
        let no_data = Paragraph::new("No rounds played yet. Finish a round to see it here.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[0]);
    } else {
        let header = Row::new(vec![
            Cell::from("When"),
            Cell::from("Score"),
            Cell::from("Items"),
            Cell::from("Accuracy"),
            Cell::from("Rate"),
            Cell::from("Best Streak"),
            Cell::from("Length"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let rows = sessions.iter().map(present_row).collect::<Vec<Row>>();

        let widths = [
            Constraint::Min(16),    // When
            Constraint::Length(6),  // Score
            Constraint::Length(6),  // Items
            Constraint::Length(9),  // Accuracy
            Constraint::Length(6),  // Rate
            Constraint::Length(12), // Best Streak
            Constraint::Length(7),  // Length
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string()),
            )
            .column_spacing(2);

        f.render_widget(table, chunks[0]);
    }

    let instructions = Paragraph::new("(h) back / (esc)ape").alignment(Alignment::Center);
    f.render_widget(instructions, chunks[1]);
}
