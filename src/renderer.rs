use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Block;

use crate::config::LevelConfig;
use crate::fruit::FruitKind;
use crate::grid::GridWorld;
use crate::leaderboard::LeaderboardEntry;
use crate::session::{FrameSnapshot, Phase};
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Upper half-block glyph: foreground paints the top cell, background the bottom one.
pub const GLYPH_HALF_UPPER: &str = "▀";

const BOARD_BG: Color = Color::Black;
const SNAKE_HEAD: Color = Color::LightGreen;
const SNAKE_BODY: Color = Color::Green;
const BORDER_FG: Color = Color::DarkGray;

/// Values shown around the board that do not live in the session.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub level: &'a LevelConfig,
    pub player: &'a str,
    /// Best entries first.
    pub leaderboard: &'a [LeaderboardEntry],
    /// Outcome of the last score save, once known.
    pub save_notice: Option<&'a str>,
}

impl FrameContext<'_> {
    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.leaderboard.first().map_or(0, |entry| entry.score)
    }
}

/// Renders the full game frame from a snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &FrameSnapshot, context: &FrameContext<'_>) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot, context);
    let grid = context.level.grid();

    let block = Block::bordered().border_style(Style::new().fg(BORDER_FG));
    let board_area = centered_board(play_area, grid);
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    render_board(frame, inner, snapshot, grid);

    match snapshot.phase {
        Phase::NotStarted => render_start_menu(frame, play_area, context),
        Phase::Paused => render_pause_menu(frame, play_area),
        Phase::GameOver => render_game_over_menu(frame, play_area, snapshot, context),
        Phase::Playing => {}
    }
}

/// Two board rows share one terminal row, so the board is `width` x `ceil(height / 2)`.
fn centered_board(area: Rect, grid: GridWorld) -> Rect {
    let width = grid.width().saturating_add(2);
    let height = grid.height().div_ceil(2).saturating_add(2);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    board
}

fn render_board(frame: &mut Frame<'_>, inner: Rect, snapshot: &FrameSnapshot, grid: GridWorld) {
    let colors = cell_colors(snapshot, grid);
    let width = usize::from(grid.width());
    let buffer = frame.buffer_mut();

    for (row, pair) in colors.chunks(width * 2).enumerate() {
        let (top, bottom) = pair.split_at(width.min(pair.len()));
        let Ok(row) = u16::try_from(row) else {
            break;
        };
        let y = inner.y.saturating_add(row);
        if y >= inner.bottom() {
            break;
        }

        for (column, top_color) in top.iter().enumerate() {
            let Ok(column) = u16::try_from(column) else {
                break;
            };
            let x = inner.x.saturating_add(column);
            if x >= inner.right() {
                break;
            }
            let bottom_color = bottom.get(usize::from(column)).copied().unwrap_or(BOARD_BG);
            buffer.set_string(
                x,
                y,
                GLYPH_HALF_UPPER,
                Style::new().fg(*top_color).bg(bottom_color),
            );
        }
    }
}

/// Row-major colour of every board cell.
fn cell_colors(snapshot: &FrameSnapshot, grid: GridWorld) -> Vec<Color> {
    let width = usize::from(grid.width());
    let mut colors = vec![BOARD_BG; grid.total_cells()];
    let mut paint = |x: i32, y: i32, color: Color| {
        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
            if x < width {
                if let Some(slot) = colors.get_mut(y * width + x) {
                    *slot = color;
                }
            }
        }
    };

    if let Some(fruit) = snapshot.fruit {
        paint(fruit.position.x, fruit.position.y, fruit_color(fruit.kind));
    }
    for (index, cell) in snapshot.snake.iter().enumerate().rev() {
        let color = if index == 0 { SNAKE_HEAD } else { SNAKE_BODY };
        paint(cell.x, cell.y, color);
    }

    colors
}

fn fruit_color(kind: FruitKind) -> Color {
    match kind {
        FruitKind::Normal => Color::Red,
        FruitKind::ExtraLife => Color::Cyan,
        FruitKind::DoublePoints => Color::Magenta,
    }
}
