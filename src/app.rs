use crate::engine::{GamePhase, SnakeEngine, StepResult};
use crate::input::{decode_key, Point, SwipeTracker};
use crate::render::{self, ControlPadLayout};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::info;
use ratatui::Frame;

// Rough pixel size of a terminal cell, so swipe distances mean the same thing
// they do on a touch screen.
const CELL_PIXEL_WIDTH: f32 = 8.0;
const CELL_PIXEL_HEIGHT: f32 = 16.0;

fn cell_to_point(column: u16, row: u16) -> Point {
    Point::new(
        column as f32 * CELL_PIXEL_WIDTH,
        row as f32 * CELL_PIXEL_HEIGHT,
    )
}

/// The engine plus everything the terminal front end needs around it.
pub struct App {
    engine: SnakeEngine,
    swipe: SwipeTracker,
    control_pad: ControlPadLayout,
    should_quit: bool,
}

impl App {
    pub fn new(engine: SnakeEngine) -> Self {
        let swipe = SwipeTracker::new(engine.config().min_swipe_distance);
        App {
            engine,
            swipe,
            control_pad: ControlPadLayout::default(),
            should_quit: false,
        }
    }

    pub fn engine(&self) -> &SnakeEngine {
        &self.engine
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn render(&mut self, frame: &mut Frame) {
        self.control_pad = render::render_game(frame, &self.engine);
    }

    pub fn tick(&mut self) -> StepResult {
        self.engine.tick()
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => self.quit(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Enter if self.engine.phase() == GamePhase::Over => self.reset(),
            _ => {
                if let Some(intent) = decode_key(key) {
                    intent.apply(&mut self.engine);
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(button) = self.control_pad.hit(mouse.column, mouse.row) {
                    self.swipe.cancel();
                    button.press(self.engine.phase(), &mut self.engine);
                } else {
                    self.swipe.begin(cell_to_point(mouse.column, mouse.row));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(intent) = self.swipe.end(cell_to_point(mouse.column, mouse.row)) {
                    intent.apply(&mut self.engine);
                }
            }
            _ => {}
        }
    }

    fn reset(&mut self) {
        info!("Reset with score {}", self.engine.score());
        self.swipe.cancel();
        self.engine.reset();
    }

    fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::engine::{Direction, Pos};
    use crate::input::ControlButton;
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        App::new(SnakeEngine::seeded(GameConfig::default(), 1))
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn drag(app: &mut App, from: (u16, u16), to: (u16, u16)) {
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), from.0, from.1));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), to.0, to.1));
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), to.0, to.1));
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    fn click(app: &mut App, button: ControlButton) {
        let rect = app.control_pad.rect(button).unwrap();
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), rect.x + 1, rect.y + 1));
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), rect.x + 1, rect.y + 1));
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')] {
            let mut app = app();
            app.handle_event(press(code));
            assert!(app.should_quit());
        }

        let mut app = app();
        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.should_quit());
    }

    #[test]
    fn test_keys_steer_and_pause() {
        let mut app = app();
        app.handle_event(press(KeyCode::Char('W')));
        assert_eq!(app.engine().pending_direction(), Some(Direction::Up));

        app.handle_event(press(KeyCode::Char(' ')));
        assert_eq!(app.engine().phase(), GamePhase::Paused);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = app();
        let mut release = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        app.handle_event(Event::Key(release));
        assert_eq!(app.engine().phase(), GamePhase::Running);
    }

    #[test]
    fn test_enter_plays_again_only_when_over() {
        let mut app = app();
        app.tick();
        app.handle_event(press(KeyCode::Enter));
        assert_eq!(app.engine().head(), Pos::new(11, 10), "Enter does nothing mid-game");

        while app.engine().phase() != GamePhase::Over {
            app.tick();
        }
        app.handle_event(press(KeyCode::Enter));
        assert_eq!(app.engine().phase(), GamePhase::Running);
        assert_eq!(app.engine().head(), Pos::new(10, 10));
    }

    #[test]
    fn test_r_resets_any_time() {
        let mut app = app();
        app.tick();
        app.handle_event(press(KeyCode::Char('r')));
        assert_eq!(app.engine().head(), Pos::new(10, 10));
        assert_eq!(app.engine().phase(), GamePhase::Running);
    }

    #[test]
    fn test_drag_steers() {
        let mut app = app();
        // Five rows down is 80 pixels
        drag(&mut app, (10, 5), (10, 10));
        assert_eq!(app.engine().pending_direction(), Some(Direction::Down));
    }

    #[test]
    fn test_click_on_board_is_a_tap() {
        let mut app = app();
        drag(&mut app, (10, 5), (10, 5));
        assert_eq!(app.engine().phase(), GamePhase::Paused);
        assert_eq!(app.engine().pending_direction(), None);
    }

    #[test]
    fn test_release_without_press_does_nothing() {
        let mut app = app();
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 3, 3));
        assert_eq!(app.engine().phase(), GamePhase::Running);
    }

    #[test]
    fn test_on_screen_buttons() {
        let mut app = app();
        draw(&mut app);

        click(&mut app, ControlButton::Up);
        assert_eq!(app.engine().pending_direction(), Some(Direction::Up));
        assert_eq!(app.engine().phase(), GamePhase::Running, "Button release is not a tap");

        click(&mut app, ControlButton::Pause);
        assert_eq!(app.engine().phase(), GamePhase::Paused);

        // Direction buttons are disabled while paused
        click(&mut app, ControlButton::Down);
        assert_eq!(app.engine().pending_direction(), Some(Direction::Up));

        click(&mut app, ControlButton::Pause);
        assert_eq!(app.engine().phase(), GamePhase::Running);
    }
}
