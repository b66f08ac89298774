use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::leaderboard::LeaderboardEntry;
use crate::renderer::FrameContext;
use crate::session::{EndReason, FrameSnapshot};

/// Leaderboard rows shown on the game-over popup.
const LEADERBOARD_ROWS: usize = 5;

/// Draws the start screen as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, context: &FrameContext<'_>) {
    let popup = centered_popup(area, 70, 50);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("POWERUP SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let body = vec![
        Line::from(format!(
            "Level: {} (score ×{:.2})",
            context.level.name, context.level.score_multiplier
        )),
        Line::from(format!("High score: {}", context.high_score())),
        Line::from(""),
        Line::from("Cyan +1 life │ Magenta 2x points"),
        Line::from(""),
        Line::from("[Enter] Start"),
        Line::from("[Q]/[Esc] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Arrows/WASD to move, [Space]/[P] to pause"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        footer_row,
    );
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[Space]/[P] Resume"),
        Line::from("[Q]/[Esc] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over screen with the save notice and top scores.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &FrameSnapshot,
    context: &FrameContext<'_>,
) {
    let popup = centered_popup(area, 80, 80);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(format!(
            "Score: {} → {}",
            snapshot.score,
            context.level.multiplied_score(snapshot.score)
        )),
        Line::from(end_reason_text(snapshot.end_reason)),
        Line::from(context.save_notice.unwrap_or("Saving score...")),
        Line::from(""),
    ];
    lines.extend(leaderboard_lines(context.leaderboard));
    lines.push(Line::from(""));
    lines.push(Line::from("[Enter] Play Again"));
    lines.push(Line::from("[Q]/[Esc] Quit"));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn end_reason_text(reason: Option<EndReason>) -> &'static str {
    match reason {
        Some(EndReason::WallCollision) => "Cause: hit wall",
        Some(EndReason::SelfCollision) => "Cause: hit yourself",
        Some(EndReason::BoardFull) => "Cause: board full",
        None => "",
    }
}

fn leaderboard_lines(entries: &[LeaderboardEntry]) -> Vec<Line<'static>> {
    if entries.is_empty() {
        return vec![Line::from("No scores yet")];
    }

    entries
        .iter()
        .take(LEADERBOARD_ROWS)
        .enumerate()
        .map(|(rank, entry)| {
            let line = Line::from(format!(
                "{}. {} {} ({})",
                rank + 1,
                entry.player,
                entry.score,
                entry.level
            ));
            if rank == 0 {
                line.style(Style::default().fg(Color::Yellow))
            } else {
                line
            }
        })
        .collect()
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
