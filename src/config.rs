use std::fmt;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 20;
pub const DEFAULT_TICK_RATE: u32 = 5;

/// Game options. Parsed from the command line by the binary.
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[command(name = "blockfall")]
#[command(about = "Falling-block puzzle game in the terminal")]
pub struct Config {
    /// Playable columns.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Playable rows.
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// Gravity ticks per second.
    #[arg(long, default_value_t = DEFAULT_TICK_RATE)]
    pub tick_rate: u32,

    /// Seed for piece selection. Entropy-seeded when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate: DEFAULT_TICK_RATE,
            seed: None,
        }
    }
}

/// Rejected game construction parameters.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConfigError {
    ZeroWidth,
    ZeroHeight,
    ZeroTickRate,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfigError::ZeroWidth => "board width must be at least 1",
            ConfigError::ZeroHeight => "board height must be at least 1",
            ConfigError::ZeroTickRate => "tick rate must be at least 1 per second",
        };
        write!(f, "{s}")
    }
}

impl std::error::Error for ConfigError {}
