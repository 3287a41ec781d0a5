use rand::Rng;

// ============================================================================
// Shapes
// ============================================================================

/// Side length of the square bounding box every piece lives in.
pub const SHAPE_SIZE: usize = 4;

/// A 4x4 occupancy pattern, indexed `[row][col]`.
///
/// Shapes are plain values: rotating produces a new pattern and never touches
/// the original.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Shape {
    cells: [[bool; SHAPE_SIZE]; SHAPE_SIZE],
}

impl Shape {
    pub const fn new(cells: [[bool; SHAPE_SIZE]; SHAPE_SIZE]) -> Self {
        Self { cells }
    }

    /// Builds a pattern from four text rows where `X` marks an occupied cell.
    const fn from_rows(rows: [&[u8; SHAPE_SIZE]; SHAPE_SIZE]) -> Self {
        let mut cells = [[false; SHAPE_SIZE]; SHAPE_SIZE];
        let mut row = 0;
        while row < SHAPE_SIZE {
            let mut col = 0;
            while col < SHAPE_SIZE {
                cells[row][col] = rows[row][col] == b'X';
                col += 1;
            }
            row += 1;
        }
        Self { cells }
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    /// Occupied cells as `(row, col)` pairs, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SHAPE_SIZE).flat_map(move |row| {
            (0..SHAPE_SIZE)
                .filter(move |&col| self.cells[row][col])
                .map(move |col| (row, col))
        })
    }

    /// 90 degree clockwise rotation: transpose, then reverse every row.
    pub fn rotated(&self) -> Self {
        let mut transposed = [[false; SHAPE_SIZE]; SHAPE_SIZE];
        for (row, line) in self.cells.iter().enumerate() {
            for (col, &occupied) in line.iter().enumerate() {
                transposed[col][row] = occupied;
            }
        }
        for line in transposed.iter_mut() {
            line.reverse();
        }
        Self { cells: transposed }
    }
}

/// Free-standing form of [`Shape::rotated`].
pub fn rotate(shape: &Shape) -> Shape {
    shape.rotated()
}

// ============================================================================
// Catalog
// ============================================================================

const I_SHAPE: Shape = Shape::from_rows([b"  X ", b"  X ", b"  X ", b"  X "]);
const O_SHAPE: Shape = Shape::from_rows([b"    ", b" XX ", b" XX ", b"    "]);
const T_SHAPE: Shape = Shape::from_rows([b"  X ", b" XX ", b"  X ", b"    "]);
const S_SHAPE: Shape = Shape::from_rows([b"  X ", b" XX ", b" X  ", b"    "]);
const Z_SHAPE: Shape = Shape::from_rows([b" X  ", b" XX ", b"  X ", b"    "]);
const J_SHAPE: Shape = Shape::from_rows([b"  X ", b"  X ", b" XX ", b"    "]);
const L_SHAPE: Shape = Shape::from_rows([b"  X ", b"  X ", b"  XX", b"    "]);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TetrominoType {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::O,
        TetrominoType::T,
        TetrominoType::S,
        TetrominoType::Z,
        TetrominoType::J,
        TetrominoType::L,
    ];

    /// The unrotated pattern a freshly spawned piece of this kind starts with.
    pub fn base_shape(self) -> Shape {
        match self {
            TetrominoType::I => I_SHAPE,
            TetrominoType::O => O_SHAPE,
            TetrominoType::T => T_SHAPE,
            TetrominoType::S => S_SHAPE,
            TetrominoType::Z => Z_SHAPE,
            TetrominoType::J => J_SHAPE,
            TetrominoType::L => L_SHAPE,
        }
    }

    /// Uniform draw over the seven kinds.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}
