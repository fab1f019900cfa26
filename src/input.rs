//! Turns key presses, swipes and on-screen buttons into game intents.

use crate::engine::{Direction, GamePhase, SnakeEngine};
use crossterm::event::{KeyCode, KeyEvent};

/// The two things input is allowed to ask of the game.
pub trait Controls {
    fn submit_direction(&mut self, direction: Direction);
    fn toggle_pause(&mut self);
}

impl Controls for SnakeEngine {
    fn submit_direction(&mut self, direction: Direction) {
        SnakeEngine::submit_direction(self, direction);
    }

    fn toggle_pause(&mut self) {
        SnakeEngine::toggle_pause(self);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Turn(Direction),
    TogglePause,
}

impl Intent {
    pub fn apply(self, controls: &mut impl Controls) {
        match self {
            Intent::Turn(direction) => controls.submit_direction(direction),
            Intent::TogglePause => controls.toggle_pause(),
        }
    }
}

/// Arrow keys and WASD steer, space pauses. Letters match in either case.
pub fn decode_key(key: KeyEvent) -> Option<Intent> {
    match key.code {
        KeyCode::Up => Some(Intent::Turn(Direction::Up)),
        KeyCode::Down => Some(Intent::Turn(Direction::Down)),
        KeyCode::Left => Some(Intent::Turn(Direction::Left)),
        KeyCode::Right => Some(Intent::Turn(Direction::Right)),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(Intent::Turn(Direction::Up)),
            's' => Some(Intent::Turn(Direction::Down)),
            'a' => Some(Intent::Turn(Direction::Left)),
            'd' => Some(Intent::Turn(Direction::Right)),
            ' ' => Some(Intent::TogglePause),
            _ => None,
        },
        _ => None,
    }
}

/// A point in device-independent pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// Resolves a touch start/end pair into at most one intent.
#[derive(Debug)]
pub struct SwipeTracker {
    min_distance: f32,
    start: Option<Point>,
}

impl SwipeTracker {
    pub fn new(min_distance: f32) -> Self {
        SwipeTracker {
            min_distance,
            start: None,
        }
    }

    pub fn begin(&mut self, at: Point) {
        self.start = Some(at);
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    /// Short movements on both axes are taps and toggle pause. Otherwise the
    /// dominant axis picks the direction; equal magnitudes count as vertical.
    pub fn end(&mut self, at: Point) -> Option<Intent> {
        let start = self.start.take()?;
        let dx = at.x - start.x;
        let dy = at.y - start.y;

        if dx.abs() < self.min_distance && dy.abs() < self.min_distance {
            return Some(Intent::TogglePause);
        }

        let direction = if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Some(Intent::Turn(direction))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlButton {
    Left,
    Up,
    Down,
    Right,
    Pause,
}

impl ControlButton {
    /// In on-screen order.
    pub const ALL: [ControlButton; 5] = [
        ControlButton::Left,
        ControlButton::Up,
        ControlButton::Down,
        ControlButton::Right,
        ControlButton::Pause,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ControlButton::Left => "◀",
            ControlButton::Up => "▲",
            ControlButton::Down => "▼",
            ControlButton::Right => "▶",
            ControlButton::Pause => "Pause",
        }
    }

    pub fn intent(self) -> Intent {
        match self {
            ControlButton::Left => Intent::Turn(Direction::Left),
            ControlButton::Up => Intent::Turn(Direction::Up),
            ControlButton::Down => Intent::Turn(Direction::Down),
            ControlButton::Right => Intent::Turn(Direction::Right),
            ControlButton::Pause => Intent::TogglePause,
        }
    }

    /// Nothing works once the game is over; while paused only the pause
    /// button does.
    pub fn is_enabled(self, phase: GamePhase) -> bool {
        match phase {
            GamePhase::Running => true,
            GamePhase::Paused => self == ControlButton::Pause,
            GamePhase::Over => false,
        }
    }

    pub fn press(self, phase: GamePhase, controls: &mut impl Controls) {
        if self.is_enabled(phase) {
            self.intent().apply(controls);
        }
    }
}
