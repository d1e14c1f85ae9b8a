use std::time::Instant;

use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use overheat::engine::Phase;
use overheat::feed::MessageKind;
use overheat::wave::WordState;

use crate::{App, Screen};

const SERVERS_PER_ROW: usize = 4;

pub fn draw(app: &App, f: &mut Frame, now: Instant) {
    match &app.screen {
        Screen::Game => draw_game(app, f, now),
        Screen::GameOver {
            outcome,
            position,
            top,
        } => draw_game_over(f, outcome.victory, outcome.score, *position, top),
    }
}

fn draw_game(app: &App, f: &mut Frame, now: Instant) {
    let engine = &app.engine;
    let area = f.area();

    let server_rows = engine.wave().len().div_ceil(SERVERS_PER_ROW).max(1);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),                       // status bar
            Constraint::Length(4 * server_rows as u16),  // server bank
            Constraint::Min(4),                          // operator feed
            Constraint::Length(3),                       // text entry
        ])
        .split(area);

    draw_status_bar(app, f, chunks[0], now);
    draw_server_bank(app, f, chunks[1]);
    draw_feed(app, f, chunks[2]);
    draw_text_entry(app, f, chunks[3]);

    match engine.phase() {
        Phase::Countdown => draw_countdown(app, f, now),
        Phase::Victory => draw_post_game_modal(f, true),
        Phase::Failure => draw_post_game_modal(f, false),
        _ => {}
    }
}

fn draw_status_bar(app: &App, f: &mut Frame, area: Rect, now: Instant) {
    let engine = &app.engine;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Length(18),
            Constraint::Min(20),
        ])
        .split(area);

    let score = Paragraph::new(Span::styled(
        format!("SCORE {:>8}", engine.score()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(score, cols[0]);

    let stage = Paragraph::new(format!(
        "STAGE {}/{}",
        engine.level().max(1),
        engine.total_stages().max(1)
    ))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(stage, cols[1]);

    let ratio = engine.heat_ratio(now);
    let heat_color = if ratio < 0.5 {
        Color::Green
    } else if ratio < 0.8 {
        Color::Yellow
    } else {
        Color::Red
    };
    let heat = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("HEAT"))
        .gauge_style(Style::default().fg(heat_color))
        .ratio(ratio)
        .label(format!("{}%", (ratio * 100.0).floor() as u32));
    f.render_widget(heat, cols[2]);
}

fn server_card<'a>(id: &str, code: &'a str, state: WordState, typed: Option<&'a str>) -> Paragraph<'a> {
    let (meter, pct, style) = match state {
        WordState::Inactive => (
            "\u{25cf}\u{25cf}\u{25cf}\u{25cf}\u{25cf}\u{25cf}",
            "67%",
            Style::default().fg(Color::DarkGray),
        ),
        WordState::Active => (
            "\u{25cf}\u{25cf}\u{25cf}\u{25cf}\u{25cf}\u{25cf}\u{25cf}\u{25cf}\u{25cf}",
            "100%",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        WordState::Cleared => (
            "\u{25cf}\u{25cf}\u{25cf}",
            "33%",
            Style::default().fg(Color::Green),
        ),
    };

    let code_line = match typed {
        Some(prefix) => {
            let rest = &code[prefix.len()..];
            Line::from(vec![
                Span::styled(
                    prefix.to_string(),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                ),
                Span::styled(rest, Style::default().add_modifier(Modifier::BOLD)),
            ])
        }
        None => Line::from(Span::styled(code, style)),
    };

    let border_style = if typed.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        style
    };

    Paragraph::new(vec![code_line, Line::from(format!("{} {}", meter, pct))])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!("SRV {}", id)),
        )
        .wrap(Wrap { trim: true })
}

fn draw_server_bank(app: &App, f: &mut Frame, area: Rect) {
    let engine = &app.engine;
    let entries: Vec<(&String, &WordState)> = engine.wave().iter().collect();
    if entries.is_empty() {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(4);
            entries.len().div_ceil(SERVERS_PER_ROW)
        ])
        .split(area);

    let grouped = entries.iter().copied().chunks(SERVERS_PER_ROW);
    for (row_idx, chunk) in grouped.into_iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, SERVERS_PER_ROW as u32);
                SERVERS_PER_ROW
            ])
            .split(rows[row_idx]);

        for (col_idx, (code, state)) in chunk.enumerate() {
            let id = format!("{:02}", row_idx * SERVERS_PER_ROW + col_idx + 1);
            let typed = match engine.focused() {
                Some(focused) if focused == code.as_str() => Some(engine.text_entry()),
                _ => None,
            };
            f.render_widget(server_card(&id, code, *state, typed), cols[col_idx]);
        }
    }
}

fn feed_style(kind: MessageKind) -> Style {
    match kind {
        MessageKind::Banner => Style::default().add_modifier(Modifier::BOLD),
        MessageKind::Info => Style::default().fg(Color::DarkGray),
        MessageKind::Command => Style::default().add_modifier(Modifier::BOLD),
        MessageKind::Success => Style::default().fg(Color::Green),
        MessageKind::Error => Style::default().fg(Color::Red),
        MessageKind::Warning => Style::default().fg(Color::Yellow),
    }
}

fn draw_feed(app: &App, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let total = app.engine.feed().len();
    let lines: Vec<Line> = app
        .engine
        .feed()
        .lines()
        .skip(total.saturating_sub(visible))
        .map(|line| Line::from(Span::styled(line.text.clone(), feed_style(line.kind))))
        .collect();

    let feed = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("OPERATOR LOG"))
        .wrap(Wrap { trim: false });
    f.render_widget(feed, area);
}

fn draw_text_entry(app: &App, f: &mut Frame, area: Rect) {
    let entry = app.engine.text_entry();
    let title = if entry.is_empty() {
        "REBOOT CODE".to_string()
    } else {
        format!("REBOOT CODE ({})", entry.width())
    };
    let widget = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            entry.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(widget, area);
}

fn draw_countdown(app: &App, f: &mut Frame, now: Instant) {
    let secs = app
        .engine
        .countdown_remaining(now)
        .map(|d| d.as_secs() + 1)
        .unwrap_or(0);

    let area = centered_rect(30, 5, f.area());
    f.render_widget(Clear, area);
    let widget = Paragraph::new(vec![
        Line::from(Span::styled(
            "INCOMING WAVE",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("T-minus {}", secs),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

fn draw_post_game_modal(f: &mut Frame, victory: bool) {
    let (title, body, color) = if victory {
        (
            "VICTORY",
            "All servers rebooted before meltdown.\n\nPress Enter to continue.",
            Color::Green,
        )
    } else {
        (
            "MELTDOWN",
            "The servers overheated.\n\nPress Enter to continue.",
            Color::Red,
        )
    };

    let area = centered_rect(44, 7, f.area());
    f.render_widget(Clear, area);
    let widget = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Span::styled(
                    title,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
        );
    f.render_widget(widget, area);
}

fn draw_game_over(
    f: &mut Frame,
    victory: bool,
    score: i64,
    position: Option<u32>,
    top: &[overheat::scoreboard::ScoreRow],
) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(2),
        ])
        .split(area);

    let headline = if victory { "YOU SAVED THE SERVERS" } else { "MELTDOWN" };
    let rank_line = match position {
        Some(p) => format!("final score {}   leaderboard position #{}", score, p),
        None => format!("final score {}", score),
    };
    let summary = Paragraph::new(vec![
        Line::from(Span::styled(
            headline,
            Style::default()
                .fg(if victory { Color::Green } else { Color::Red })
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(rank_line),
    ])
    .alignment(Alignment::Center);
    f.render_widget(summary, chunks[0]);

    let rows: Vec<Row> = top
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(format!("{:>2}", i + 1)),
                Cell::from(row.name.clone()),
                Cell::from(format!("{:>8}", row.score)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        &[
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["#", "name", "score"]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(Block::default().borders(Borders::ALL).title("TOP SCORES"));
    f.render_widget(table, chunks[1]);

    let hints = Paragraph::new("(r)estart  (q)uit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC));
    f.render_widget(hints, chunks[2]);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
