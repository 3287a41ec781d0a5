use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{Board, Cell, Position};
use crate::config::{Config, ConfigError};
use crate::shape::{Shape, TetrominoType};

// ============================================================================
// Scoring
// ============================================================================

/// Flat bonus for any line-clear event.
pub const LINE_CLEAR_BONUS: u32 = 250;
/// Added per row removed in the same event.
pub const SCORE_PER_LINE: u32 = 100;

/// Points for removing `lines` rows at once: 1 line is 350, 2 lines 450.
pub fn score_for_lines(lines: u32) -> u32 {
    if lines == 0 {
        0
    } else {
        LINE_CLEAR_BONUS + SCORE_PER_LINE * lines
    }
}

// ============================================================================
// Types
// ============================================================================

/// The falling piece. `position` is the top-left corner of its 4x4 box.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Tetromino {
    pub tetromino_type: TetrominoType,
    pub shape: Shape,
    pub position: Position,
    /// Orientation 0..=3, advanced on every accepted rotation.
    pub rotation: usize,
}

impl Tetromino {
    /// A base-orientation piece at the spawn anchor `(width / 2, 0)`.
    pub fn spawn(tetromino_type: TetrominoType, board_width: usize) -> Self {
        Self::new_at(tetromino_type, (board_width / 2) as i32, 0)
    }

    pub fn new_at(tetromino_type: TetrominoType, x: i32, y: i32) -> Self {
        Self {
            tetromino_type,
            shape: tetromino_type.base_shape(),
            position: Position::new(x, y),
            rotation: 0,
        }
    }

    /// Board coordinates of the occupied cells.
    pub fn blocks(&self) -> Vec<Position> {
        self.shape
            .cells()
            .map(|(row, col)| self.position.offset(col as i32, row as i32))
            .collect()
    }

    fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            rotation: (self.rotation + 1) % 4,
            ..self.clone()
        }
    }

    fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..self.clone()
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Falling,
    Over,
}

/// Discrete player input, already mapped from raw key codes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    PieceSpawned(TetrominoType),
    LinesCleared(u32),
    GameOver,
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> TetrominoType;
}

/// Independent uniform draw per spawn.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> TetrominoType {
        TetrominoType::random(&mut self.rng)
    }
}

/// Cycles through a fixed list of kinds.
pub struct SequencePieceProvider {
    pieces: Vec<TetrominoType>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<TetrominoType>) -> Self {
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> TetrominoType {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    board: Board,
    current_piece: Tetromino,
    score: u32,
    lines_cleared: u32,
    state: GameState,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

/// Starts a game on a `width` x `height` board with random pieces.
pub fn new_game(width: usize, height: usize) -> Result<Game, ConfigError> {
    Game::new(&Config::new(width, height))
}

// ============================================================================
// Game Logic
// ============================================================================

impl Game {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let provider = match config.seed {
            Some(seed) => RandomPieceProvider::seeded(seed),
            None => RandomPieceProvider::from_entropy(),
        };
        Self::with_provider(config, Box::new(provider))
    }

    pub fn with_provider(
        config: &Config,
        mut provider: Box<dyn PieceProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.width, config.height)?;
        let first = Tetromino::spawn(provider.next_piece(), board.width());
        Ok(Self::with_board(board, first, provider))
    }

    /// Starts from an arbitrary board and piece. If the piece does not fit,
    /// the game begins already over.
    pub fn with_board(board: Board, piece: Tetromino, provider: Box<dyn PieceProvider>) -> Self {
        let mut game = Self {
            board,
            current_piece: piece,
            score: 0,
            lines_cleared: 0,
            state: GameState::Falling,
            piece_provider: provider,
            events: Vec::new(),
        };
        game.events
            .push(GameEvent::PieceSpawned(game.current_piece.tetromino_type));
        if !game.is_valid_position(&game.current_piece) {
            game.end();
        }
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece(&self) -> &Tetromino {
        &self.current_piece
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::Over
    }

    pub fn is_valid_position(&self, piece: &Tetromino) -> bool {
        self.board.fits(&piece.shape, piece.position)
    }

    /// Replaces the current piece when the candidate fits.
    fn try_place(&mut self, candidate: Tetromino) -> bool {
        if self.is_valid_position(&candidate) {
            self.current_piece = candidate;
            true
        } else {
            false
        }
    }

    fn lock_piece(&mut self) {
        let piece = &self.current_piece;
        self.board
            .lock(&piece.shape, piece.position, piece.tetromino_type);
        self.events.push(GameEvent::PieceLocked);
    }

    /// Removes complete rows and scores them. Returns the number removed.
    pub fn clear_lines(&mut self) -> u32 {
        let cleared = self.board.clear_lines() as u32;
        if cleared > 0 {
            self.score += score_for_lines(cleared);
            self.lines_cleared += cleared;
            self.events.push(GameEvent::LinesCleared(cleared));
        }
        cleared
    }

    fn spawn_next_piece(&mut self) {
        let next_type = self.piece_provider.next_piece();
        self.current_piece = Tetromino::spawn(next_type, self.board.width());
        self.events.push(GameEvent::PieceSpawned(next_type));

        if !self.is_valid_position(&self.current_piece) {
            self.end();
        }
    }

    fn end(&mut self) {
        self.state = GameState::Over;
        self.events.push(GameEvent::GameOver);
    }

    fn lock_and_spawn(&mut self) {
        self.lock_piece();
        self.clear_lines();
        self.spawn_next_piece();
    }

    /// One gravity step: fall a row, or lock, clear and respawn.
    pub fn tick(&mut self) {
        if self.is_over() {
            return;
        }

        let fallen = self.current_piece.moved(0, 1);
        if !self.try_place(fallen) {
            self.lock_and_spawn();
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Applies a player command. Returns whether it took effect.
    pub fn command(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_piece(-1, 0),
            Command::MoveRight => self.move_piece(1, 0),
            Command::SoftDrop => self.soft_drop(),
            Command::Rotate => self.rotate_piece(),
            Command::HardDrop => self.hard_drop(),
        }
    }

    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        if self.is_over() {
            return false;
        }
        let moved = self.current_piece.moved(dx, dy);
        if self.try_place(moved) {
            self.events.push(GameEvent::PieceMoved);
            true
        } else {
            false
        }
    }

    /// Clockwise rotation in place. No kick offsets are tried.
    pub fn rotate_piece(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        let rotated = self.current_piece.rotated();
        if self.try_place(rotated) {
            self.events.push(GameEvent::PieceRotated);
            true
        } else {
            false
        }
    }

    /// One row down. Never locks; a blocked piece waits for the next tick.
    pub fn soft_drop(&mut self) -> bool {
        self.move_piece(0, 1)
    }

    /// Drops the piece as far as it fits, then locks it straight away.
    pub fn hard_drop(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        while self.try_place(self.current_piece.moved(0, 1)) {}
        self.lock_and_spawn();
        true
    }

    /// Board with the current piece overlaid, for rendering.
    pub fn render_grid(&self) -> Vec<Vec<Cell>> {
        let mut visual_grid: Vec<Vec<Cell>> = self.board.rows().map(<[Cell]>::to_vec).collect();

        for block in self.current_piece.blocks() {
            let (Ok(x), Ok(y)) = (usize::try_from(block.x), usize::try_from(block.y)) else {
                continue;
            };
            if let Some(cell) = visual_grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                if *cell == Cell::Empty {
                    *cell = Cell::Locked(self.current_piece.tetromino_type);
                }
            }
        }

        visual_grid
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub fn empty_board(width: usize, height: usize) -> Board {
        Board::new(width, height).expect("test board dimensions are positive")
    }

    pub fn fill_row(board: &mut Board, y: usize) {
        for x in 1..=board.width() {
            board.set(x, y, Cell::Locked(TetrominoType::T));
        }
    }

    /// Fills row `y` except for the board column `gap_x`.
    pub fn fill_row_with_gap(board: &mut Board, y: usize, gap_x: usize) {
        for x in 1..=board.width() {
            if x != gap_x {
                board.set(x, y, Cell::Locked(TetrominoType::T));
            }
        }
    }

    pub fn sequence(pieces: &[TetrominoType]) -> Box<dyn PieceProvider> {
        Box::new(SequencePieceProvider::new(pieces.to_vec()))
    }
}
