use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::renderer::FrameContext;
use crate::session::FrameSnapshot;

const HUD_MARGIN_X: u16 = 1;
const SEPARATOR: &str = " │ ";

/// Renders the two-line HUD and returns the remaining area above it.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &FrameSnapshot,
    context: &FrameContext<'_>,
) -> Rect {
    let [play_area, score_area, status_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let score_area = inset_horizontal(score_area, HUD_MARGIN_X);
    let status_area = inset_horizontal(status_area, HUD_MARGIN_X);

    frame.render_widget(
        Paragraph::new(score_line(
            snapshot,
            context.high_score(),
            usize::from(score_area.width),
        ))
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::DarkGray)),
        score_area,
    );

    frame.render_widget(
        Paragraph::new(status_line(snapshot, context))
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        status_area,
    );

    play_area
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let total_margin = margin.saturating_mul(2);
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(total_margin),
        height: area.height,
    }
}

fn score_line(snapshot: &FrameSnapshot, high_score: u32, available_width: usize) -> Line<'static> {
    let labels = if score_line_width(snapshot, high_score, false) > available_width {
        ["S", "L", "H"]
    } else {
        ["Score", "Lives", "Hi"]
    };
    let value = Style::default().fg(Color::White);
    let score_style = if snapshot.double_points_ticks_remaining > 0 {
        value.fg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else {
        value
    };

    Line::from(vec![
        Span::raw(format!("{}: ", labels[0])),
        Span::styled(snapshot.score.to_string(), score_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}: ", labels[1])),
        Span::styled(snapshot.lives.to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}: ", labels[2])),
        Span::styled(high_score.to_string(), Style::default().fg(Color::Gray)),
    ])
}

fn score_line_width(snapshot: &FrameSnapshot, high_score: u32, compact: bool) -> usize {
    let text = if compact {
        format!(
            "S: {}{SEPARATOR}L: {}{SEPARATOR}H: {high_score}",
            snapshot.score, snapshot.lives
        )
    } else {
        format!(
            "Score: {}{SEPARATOR}Lives: {}{SEPARATOR}Hi: {high_score}",
            snapshot.score, snapshot.lives
        )
    };
    text.width()
}

fn status_line<'a>(snapshot: &FrameSnapshot, context: &FrameContext<'a>) -> Line<'a> {
    let mut spans = vec![
        Span::raw(context.player),
        Span::raw(SEPARATOR),
        Span::raw(format!(
            "{} {}x{}",
            context.level.name, context.level.cells_wide, context.level.cells_high
        )),
        Span::raw(SEPARATOR),
        Span::raw(format!("×{:.2}", context.level.score_multiplier)),
    ];

    if snapshot.double_points_ticks_remaining > 0 {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled(
            format!("2x {}", snapshot.double_points_ticks_remaining),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
    }

    Line::from(spans)
}
