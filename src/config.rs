use clap::Parser;
use simplelog::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GRID_SIZE: u16 = 20;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(150);
pub const DEFAULT_SCORE_INCREMENT: u32 = 10;
/// Measured in device-independent pixels.
pub const DEFAULT_MIN_SWIPE_DISTANCE: f32 = 30.0;

const MIN_GRID_SIZE: u16 = 4;
const MAX_GRID_SIZE: u16 = 100;
const MIN_TICK_MS: u64 = 20;
const MAX_TICK_MS: u64 = 5000;

/// Rules of a game session. Fixed for the lifetime of an engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    pub grid_size: u16,
    pub tick_interval: Duration,
    pub score_increment: u32,
    pub min_swipe_distance: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_size: DEFAULT_GRID_SIZE,
            tick_interval: DEFAULT_TICK_INTERVAL,
            score_increment: DEFAULT_SCORE_INCREMENT,
            min_swipe_distance: DEFAULT_MIN_SWIPE_DISTANCE,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(format!(
                "Grid size must be between {} and {}",
                MIN_GRID_SIZE, MAX_GRID_SIZE
            ));
        }
        let tick_ms = self.tick_interval.as_millis() as u64;
        if !(MIN_TICK_MS..=MAX_TICK_MS).contains(&tick_ms) {
            return Err(format!(
                "Tick interval must be between {}ms and {}ms",
                MIN_TICK_MS, MAX_TICK_MS
            ));
        }
        if self.score_increment == 0 {
            return Err("Score increment must be at least 1".to_string());
        }
        if !self.min_swipe_distance.is_finite() || self.min_swipe_distance < 0.0 {
            return Err("Minimum swipe distance must be a non-negative number".to_string());
        }
        Ok(())
    }

    /// Total number of cells on the board.
    pub fn cell_count(&self) -> usize {
        self.grid_size as usize * self.grid_size as usize
    }
}

#[derive(Debug, Parser)]
#[command(name = "folio-snake", about = "Terminal Snake from the portfolio page")]
pub struct Args {
    /// Side length of the square board, in cells
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    pub grid_size: u16,

    /// Milliseconds between simulation ticks
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL.as_millis() as u64)]
    pub tick_ms: u64,

    /// Points awarded per food eaten
    #[arg(long, default_value_t = DEFAULT_SCORE_INCREMENT)]
    pub score_increment: u32,

    /// Shortest drag (in pixels) that counts as a swipe instead of a tap
    #[arg(long, default_value_t = DEFAULT_MIN_SWIPE_DISTANCE)]
    pub min_swipe: f32,

    /// Seed for food placement; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "folio-snake.log")]
    pub log_file: PathBuf,

    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn game_config(&self) -> Result<GameConfig, String> {
        let config = GameConfig {
            grid_size: self.grid_size,
            tick_interval: Duration::from_millis(self.tick_ms),
            score_increment: self.score_increment,
            min_swipe_distance: self.min_swipe,
        };
        config.validate()?;
        Ok(config)
    }
}
