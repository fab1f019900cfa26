//! The Snake simulation: board, snake, food and the rules that advance them
//! one tick at a time. Nothing in here knows about terminals or input devices.

use crate::config::GameConfig;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn axis(&self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: u16,
    pub y: u16,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PosDelta {
    x: i32,
    y: i32,
}

impl From<Direction> for PosDelta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => PosDelta { x: 0, y: -1 },
            Direction::Down => PosDelta { x: 0, y: 1 },
            Direction::Right => PosDelta { x: 1, y: 0 },
            Direction::Left => PosDelta { x: -1, y: 0 },
        }
    }
}

impl Pos {
    pub const fn new(x: u16, y: u16) -> Self {
        Pos { x, y }
    }

    /// Steps by `delta`, or returns `None` if that leaves a square board of
    /// side `grid_size`.
    fn checked_add(&self, delta: PosDelta, grid_size: u16) -> Option<Pos> {
        let bounds = 0..grid_size as i32;
        let x = self.x as i32 + delta.x;
        let y = self.y as i32 + delta.y;
        if bounds.contains(&x) && bounds.contains(&y) {
            Some(Pos {
                x: x as u16,
                y: y as u16,
            })
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    Paused,
    Over,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, so there is nowhere left to put food.
    BoardFull,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    Idle,        // Not running, nothing moved
    Ongoing,     // Normal movement
    Nommed(u32), // Ate food, with score increment
    Over(EndReason),
}

pub struct SnakeEngine {
    config: GameConfig,
    /// Head first.
    snake: VecDeque<Pos>,
    direction: Direction,
    pending_direction: Option<Direction>,
    food: Option<Pos>,
    score: u32,
    phase: GamePhase,
    end_reason: Option<EndReason>,
    rng: StdRng,
}

impl SnakeEngine {
    /// `config` is expected to have passed [`GameConfig::validate`].
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let mut engine = SnakeEngine {
            config,
            snake: VecDeque::new(),
            direction: Direction::Right,
            pending_direction: None,
            food: None,
            score: 0,
            phase: GamePhase::Running,
            end_reason: None,
            rng,
        };
        engine.reset();
        engine
    }

    pub fn start_pos(&self) -> Pos {
        let mid = self.config.grid_size / 2;
        Pos::new(mid, mid)
    }

    fn initial_food(&self) -> Pos {
        let three_quarters = self.config.grid_size * 3 / 4;
        Pos::new(three_quarters, three_quarters)
    }

    /// Queues a turn for the next tick. Turns along the current axis of
    /// travel are dropped, which rules out reversing into the neck.
    pub fn submit_direction(&mut self, direction: Direction) {
        if self.phase == GamePhase::Over {
            return;
        }
        if direction.axis() == self.direction.axis() {
            debug!(
                "Ignoring turn {:?} while heading {:?}",
                direction, self.direction
            );
            return;
        }
        self.pending_direction = Some(direction);
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::Over => return,
        };
        info!("Game {:?}", self.phase);
    }

    pub fn reset(&mut self) {
        self.snake.clear();
        self.snake.push_back(self.start_pos());
        self.direction = Direction::Right;
        self.pending_direction = None;
        self.food = Some(self.initial_food());
        self.score = 0;
        self.phase = GamePhase::Running;
        self.end_reason = None;
    }

    /// Advances the game by one step. Does nothing unless running.
    pub fn tick(&mut self) -> StepResult {
        if self.phase != GamePhase::Running {
            return StepResult::Idle;
        }

        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }

        let new_head = match self
            .head()
            .checked_add(self.direction.into(), self.config.grid_size)
        {
            Some(pos) => pos,
            None => return self.finish(EndReason::WallCollision),
        };

        if self.snake.contains(&new_head) {
            return self.finish(EndReason::SelfCollision);
        }

        self.snake.push_front(new_head);

        if self.food != Some(new_head) {
            self.snake.pop_back();
            return StepResult::Ongoing;
        }

        self.score += self.config.score_increment;
        self.food = self.spawn_food();
        if self.food.is_none() {
            return self.finish(EndReason::BoardFull);
        }
        StepResult::Nommed(self.config.score_increment)
    }

    fn finish(&mut self, reason: EndReason) -> StepResult {
        self.phase = GamePhase::Over;
        self.end_reason = Some(reason);
        info!(
            "Game over ({:?}) with score {} and length {}",
            reason,
            self.score,
            self.snake.len()
        );
        StepResult::Over(reason)
    }

    /// Picks a uniformly random free cell by rejection sampling.
    fn spawn_food(&mut self) -> Option<Pos> {
        if self.snake.len() >= self.config.cell_count() {
            warn!("Board is full, no room left for food");
            return None;
        }

        let size = self.config.grid_size;
        loop {
            let pos = Pos {
                x: self.rng.gen_range(0..size),
                y: self.rng.gen_range(0..size),
            };
            if !self.snake.contains(&pos) {
                debug!("Placed food at {:?}", pos);
                return Some(pos);
            }
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid_size(&self) -> u16 {
        self.config.grid_size
    }

    pub fn head(&self) -> Pos {
        self.snake[0]
    }

    /// Segments, head first.
    pub fn snake(&self) -> &VecDeque<Pos> {
        &self.snake
    }

    pub fn food(&self) -> Option<Pos> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[cfg(test)]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Builds a mid-game position. Segments are head first.
    #[cfg(test)]
    pub(crate) fn with_snake(
        config: GameConfig,
        segments: &[Pos],
        direction: Direction,
        food: Pos,
    ) -> Self {
        let mut engine = Self::seeded(config, 42);
        engine.snake = segments.iter().copied().collect();
        engine.direction = direction;
        engine.food = Some(food);
        engine
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Pos) {
        self.food = Some(food);
    }
}
