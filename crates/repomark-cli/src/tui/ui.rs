//! Rendering for the interactive session.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use repomark_core::Phase;

use crate::tui::app::App;

const ACCENT: Color = Color::Rgb(0, 95, 135);
const BAR_BG: Color = Color::Rgb(40, 40, 50);

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(3), // Search input
            Constraint::Min(5),    // Results
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, app, chunks[0]);
    draw_search_bar(frame, app, chunks[1]);
    draw_results(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let toggle = if app.controller.bookmarked_only() {
        "[x]"
    } else {
        "[ ]"
    };
    let right = format!("Ctrl+B Show Bookmarked Only {toggle} ");
    let line = pad_between(" GitHub Bookmarker", &right, area.width);
    let style = if app.controller.bookmarked_only() {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::White).bg(BAR_BG)
    };
    frame.render_widget(Paragraph::new(line).style(style), area);
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Search ");

    let query = app.controller.query();
    let paragraph = if query.is_empty() {
        Paragraph::new("Search GitHub repositories...")
            .block(block)
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(query)
            .block(block)
            .style(Style::default().fg(Color::White))
    };
    frame.render_widget(paragraph, area);

    // Cursor sits after the last typed character, clipped to the box.
    let cursor_cols = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
    let cursor_x = area
        .x
        .saturating_add(1)
        .saturating_add(cursor_cols)
        .min(area.right().saturating_sub(2));
    frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
}

fn draw_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = if app.controller.bookmarked_only() {
        " Bookmarked "
    } else {
        " Results "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);

    // Page step for PageUp/PageDown: inner height minus the header row.
    app.page_rows = usize::from(area.height.saturating_sub(3));

    if let Some(message) = app.controller.error() {
        let paragraph = Paragraph::new(message.to_string())
            .block(block)
            .style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = app.controller.visible();
    if visible.is_empty() {
        let text = if app.controller.is_loading() {
            match app.controller.phase() {
                Phase::LoadingBookmarks => "Loading bookmarks...",
                _ => "Searching...",
            }
        } else {
            "No results"
        };
        let paragraph = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new([" ", "Repository", "Stars", "Language", "Description"].map(|name| {
        Cell::from(name).style(
            Style::default()
                .fg(Color::White)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        )
    }))
    .height(1);

    let rows: Vec<Row> = visible
        .iter()
        .map(|repo| {
            let marker = if app.controller.is_bookmarked(repo.id) {
                "★"
            } else {
                " "
            };
            let description = repo
                .description
                .as_deref()
                .unwrap_or("No description available.");
            let language = repo.language.as_deref().unwrap_or("—");
            Row::new([
                Cell::from(marker).style(Style::default().fg(Color::Yellow)),
                Cell::from(repo.full_name.as_str()),
                Cell::from(short_number(repo.stargazers_count))
                    .style(Style::default().fg(Color::Yellow)),
                Cell::from(language).style(Style::default().fg(Color::Cyan)),
                Cell::from(description).style(Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Percentage(30),
        Constraint::Length(7),
        Constraint::Length(12),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(ACCENT).add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left = match app.controller.phase() {
        Phase::Idle => "Type to search GitHub repositories".to_string(),
        Phase::NoBookmarks => "No bookmarks yet".to_string(),
        Phase::Searching => "Searching...".to_string(),
        Phase::LoadingBookmarks => "Loading bookmarks...".to_string(),
        Phase::Ready => format!("Results: {}", app.controller.repos().len()),
        Phase::Failed(_) => "Search failed".to_string(),
    };
    let right = " Enter:Bookmark  Ctrl+O:Open  Esc:Clear/Quit ";
    let line = pad_between(&format!(" {left}"), right, area.width);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(Color::White).bg(ACCENT)),
        area,
    );
}

/// Build a status line: left-aligned text, padding, right-aligned text.
fn pad_between(left: &str, right: &str, width: u16) -> String {
    let width = usize::from(width);
    let left_len = left.chars().count();
    let right_len = right.chars().count();
    if left_len + right_len < width {
        let padding = width - left_len - right_len;
        format!("{left}{:padding$}{right}", "")
    } else {
        // Not enough space, keep the left text and let the terminal clip.
        format!("{left:<width$}")
    }
}

/// Compact star-count formatting: 950, 1.2k, 34.5k, 1.8M.
fn short_number(n: u32) -> String {
    if n < 1_000 {
        n.to_string()
    } else if n < 1_000_000 {
        scaled(n, 1_000.0, "k")
    } else {
        scaled(n, 1_000_000.0, "M")
    }
}

fn scaled(n: u32, divisor: f64, suffix: &str) -> String {
    let mut text = format!("{:.1}", f64::from(n) / divisor);
    if let Some(stripped) = text.strip_suffix(".0") {
        let keep = stripped.len();
        text.truncate(keep);
    }
    text.push_str(suffix);
    text
}
