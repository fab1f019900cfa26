use crate::engine::{Direction, EndReason, GamePhase, Pos, SnakeEngine};
use crate::input::ControlButton;
use ratatui::{
    layout::{Flex, Position},
    prelude::*,
    widgets::*,
};

const HEAD_STYLE: Style = Style::new().bg(Color::Green);
const BODY_STYLE: Style = Style::new().bg(Color::LightGreen);
const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);
const GRID_STYLE: Style = Style::new().fg(Color::DarkGray);
const FOOD_SYMBOL: &str = "●";
const GRID_SYMBOL: &str = "·";
const BUTTON_WIDTH: u16 = 9;
const HINT: &str = "Arrow Keys / WASD to play | Space to pause | Drag to steer | q to quit";

fn head_symbol(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "▴",
        Direction::Down => "▾",
        Direction::Left => "◂",
        Direction::Right => "▸",
    }
}

/// Terminal columns per grid cell. Cells are drawn two columns wide so they
/// look square, falling back to one column on narrow terminals.
pub fn cell_width(area_width: u16, grid_size: u16) -> u16 {
    if area_width >= grid_size.saturating_mul(2) {
        2
    } else {
        1
    }
}

fn paint(buf: &mut Buffer, area: Rect, pos: Pos, cell_width: u16, symbol: &str, style: Style) {
    let y = area.y + pos.y;
    for i in 0..cell_width {
        let x = area.x + pos.x * cell_width + i;
        if x >= area.right() || y >= area.bottom() {
            continue;
        }
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_symbol(if i == 0 { symbol } else { " " })
                .set_style(style);
        }
    }
}

impl Widget for &SnakeEngine {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let grid = self.grid_size();
        let cw = cell_width(area.width, grid);

        for y in 0..grid {
            for x in 0..grid {
                paint(buf, area, Pos::new(x, y), cw, GRID_SYMBOL, GRID_STYLE);
            }
        }

        if let Some(food) = self.food() {
            paint(buf, area, food, cw, FOOD_SYMBOL, FOOD_STYLE);
        }

        // Tail to head so the head wins if segments ever overlap
        for (index, &pos) in self.snake().iter().enumerate().rev() {
            if index == 0 {
                paint(buf, area, pos, cw, head_symbol(self.direction()), HEAD_STYLE);
            } else {
                paint(buf, area, pos, cw, " ", BODY_STYLE);
            }
        }
    }
}

/// Where the on-screen buttons were last drawn.
#[derive(Debug, Default)]
pub struct ControlPadLayout {
    buttons: Vec<(ControlButton, Rect)>,
}

impl ControlPadLayout {
    pub fn hit(&self, column: u16, row: u16) -> Option<ControlButton> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(Position::new(column, row)))
            .map(|(button, _)| *button)
    }

    #[cfg(test)]
    pub fn rect(&self, button: ControlButton) -> Option<Rect> {
        self.buttons
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, rect)| *rect)
    }
}

fn end_reason_text(reason: Option<EndReason>) -> &'static str {
    match reason {
        Some(EndReason::WallCollision) => "Hit the wall",
        Some(EndReason::SelfCollision) => "Bit your own tail",
        Some(EndReason::BoardFull) => "Board cleared, you win!",
        None => "",
    }
}

fn status_line(engine: &SnakeEngine) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("Score: {}", engine.score()),
        Style::new().fg(Color::Green).bold(),
    )];
    match engine.phase() {
        GamePhase::Running => {}
        GamePhase::Paused => {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("PAUSED", Style::new().fg(Color::Gray)));
        }
        GamePhase::Over => {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("GAME OVER", Style::new().fg(Color::Red).bold()));
        }
    }
    Line::from(spans)
}

/// Centers a `width` x `height` box in `area`, shrinking it if it does not fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Draws the whole game screen and returns the button hit areas.
pub fn render_game(frame: &mut Frame, engine: &SnakeEngine) -> ControlPadLayout {
    let [status_area, board_area, pad_area, hint_area] = Layout::vertical([
        Constraint::Length(3), // Score + phase
        Constraint::Min(0),    // Board
        Constraint::Length(3), // Control pad
        Constraint::Length(1), // Controls hint
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(status_line(engine))
            .alignment(Alignment::Left)
            .block(Block::default().title(" snake ").borders(Borders::ALL)),
        status_area,
    );

    // Board, with the frame sized to the grid rather than the window
    let grid = engine.grid_size();
    let cw = cell_width(board_area.width.saturating_sub(2), grid);
    let board_rect = centered(board_area, grid * cw + 2, grid + 2);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::Green));
    let inner_area = block.inner(board_rect);
    frame.render_widget(block, board_rect);
    frame.render_widget(engine, inner_area);

    if engine.phase() == GamePhase::Over {
        let [message_area] = Layout::vertical([Constraint::Length(4)])
            .flex(Flex::Center)
            .areas(inner_area);
        frame.render_widget(
            Paragraph::new(format!(
                "GAME OVER\n{}\nFinal Score: {}\nPress ENTER to play again",
                end_reason_text(engine.end_reason()),
                engine.score()
            ))
            .alignment(Alignment::Center)
            .style(Style::new().fg(Color::White).bold()),
            message_area,
        );
    }

    let slots: [Rect; 5] = Layout::horizontal([Constraint::Length(BUTTON_WIDTH); 5])
        .flex(Flex::Center)
        .spacing(1)
        .areas(pad_area);
    let mut layout = ControlPadLayout::default();
    for (button, rect) in ControlButton::ALL.into_iter().zip(slots) {
        let style = if button.is_enabled(engine.phase()) {
            Style::new().fg(Color::Green)
        } else {
            Style::new().fg(Color::DarkGray)
        };
        frame.render_widget(
            Paragraph::new(button.label())
                .alignment(Alignment::Center)
                .style(style)
                .block(Block::default().borders(Borders::ALL).border_style(style)),
            rect,
        );
        layout.buttons.push((button, rect));
    }

    frame.render_widget(
        Paragraph::new(HINT)
            .alignment(Alignment::Center)
            .style(GRID_STYLE),
        hint_area,
    );

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use ratatui::backend::TestBackend;

    fn small_config() -> GameConfig {
        GameConfig {
            grid_size: 6,
            ..GameConfig::default()
        }
    }

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_cell_width() {
        assert_eq!(cell_width(40, 20), 2);
        assert_eq!(cell_width(60, 20), 2);
        assert_eq!(cell_width(39, 20), 1);
        assert_eq!(cell_width(10, 20), 1);
    }

    #[test]
    fn test_widget_draws_snake_and_food() {
        let engine = SnakeEngine::with_snake(
            small_config(),
            &[Pos::new(2, 1), Pos::new(1, 1)],
            Direction::Right,
            Pos::new(4, 3),
        );
        let area = Rect::new(0, 0, 12, 6);
        let mut buf = Buffer::empty(area);
        (&engine).render(area, &mut buf);

        // Two columns per cell at this width
        assert_eq!(buf[(4, 1)].bg, Color::Green);
        assert_eq!(buf[(4, 1)].symbol(), "▸");
        assert_eq!(buf[(5, 1)].bg, Color::Green);
        assert_eq!(buf[(2, 1)].bg, Color::LightGreen);
        assert_eq!(buf[(8, 3)].symbol(), FOOD_SYMBOL);
        assert_eq!(buf[(8, 3)].fg, Color::LightRed);
        assert_eq!(buf[(0, 0)].symbol(), GRID_SYMBOL);
        assert_eq!(buf[(1, 0)].symbol(), " ");
    }

    #[test]
    fn test_widget_narrow_area() {
        let engine = SnakeEngine::with_snake(
            small_config(),
            &[Pos::new(2, 1)],
            Direction::Right,
            Pos::new(5, 5),
        );
        let area = Rect::new(0, 0, 8, 6);
        let mut buf = Buffer::empty(area);
        (&engine).render(area, &mut buf);

        assert_eq!(buf[(2, 1)].bg, Color::Green);
        assert_eq!(buf[(5, 5)].symbol(), FOOD_SYMBOL);
        // Columns past the grid are untouched
        assert_eq!(buf[(6, 0)].symbol(), " ");
    }

    #[test]
    fn test_widget_clips_to_area() {
        let engine = SnakeEngine::with_snake(
            small_config(),
            &[Pos::new(1, 1)],
            Direction::Right,
            Pos::new(5, 5),
        );
        let buf_area = Rect::new(0, 0, 10, 10);
        let mut buf = Buffer::empty(buf_area);
        (&engine).render(Rect::new(0, 0, 4, 3), &mut buf);

        assert_eq!(buf[(1, 1)].bg, Color::Green);
        assert_eq!(buf[(5, 5)].symbol(), " ", "Food outside the area is not drawn");
        assert_eq!(buf[(4, 0)].symbol(), " ");
    }

    #[test]
    fn test_screen_shows_score_and_buttons() {
        let engine = SnakeEngine::seeded(GameConfig::default(), 1);
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut layout = ControlPadLayout::default();
        terminal
            .draw(|frame| layout = render_game(frame, &engine))
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Score: 0"));
        assert!(text.contains("Pause"));
        assert!(text.contains("Space to pause"));
        assert!(!text.contains("GAME OVER"));

        for button in ControlButton::ALL {
            let rect = layout.rect(button).unwrap();
            assert_eq!(rect.width, BUTTON_WIDTH);
            assert_eq!(layout.hit(rect.x + 1, rect.y + 1), Some(button));
        }
        assert_eq!(layout.hit(0, 0), None);
    }

    #[test]
    fn test_screen_game_over() {
        let mut engine = SnakeEngine::with_snake(
            GameConfig::default(),
            &[Pos::new(19, 3)],
            Direction::Right,
            Pos::new(0, 0),
        );
        engine.tick();

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal
            .draw(|frame| {
                render_game(frame, &engine);
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Hit the wall"));
        assert!(text.contains("Press ENTER to play again"));
    }

    #[test]
    fn test_screen_paused() {
        let mut engine = SnakeEngine::seeded(GameConfig::default(), 1);
        engine.toggle_pause();

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal
            .draw(|frame| {
                render_game(frame, &engine);
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("PAUSED"));
    }
}
