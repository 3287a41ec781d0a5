//! Falling-block puzzle engine.
//!
//! The library holds the game core only: board, shapes, collision, the
//! tick/lock/spawn cycle and line clearing. Rendering and input capture live in
//! the binary.

pub mod board;
pub mod config;
pub mod game;
pub mod shape;
pub mod ticker;

pub use board::{Board, Cell, Position};
pub use config::{Config, ConfigError};
pub use game::{new_game, Command, Game, GameEvent, GameState, PieceProvider, Tetromino};
pub use shape::{rotate, Shape, TetrominoType};
pub use ticker::Ticker;
