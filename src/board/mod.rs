use std::{
    fmt::{self, Write},
    ops::{Index, IndexMut},
};

use crate::rules::is_fibonacci;

/// `(row, col)`, with `(0, 0)` in the top left corner.
pub type Coord = (usize, usize);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Tile(u32),
}

impl Cell {
    pub fn value(self) -> Option<u32> {
        match self {
            Cell::Empty => None,
            Cell::Tile(v) => Some(v),
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<u32> for Cell {
    /// `0` is read as an empty cell.
    fn from(value: u32) -> Self {
        match value {
            0 => Cell::Empty,
            v => Cell::Tile(v),
        }
    }
}

/// Square grid of cells stored in row-major order.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    dimension: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            cells: vec![Cell::Empty; dimension * dimension],
        }
    }

    /// Builds a board from rows of raw values, `0` being an empty cell.
    pub fn from_rows<const N: usize>(rows: [[u32; N]; N]) -> Self {
        debug_assert!(
            rows.as_flattened().iter().all(|&v| v == 0 || is_fibonacci(v)),
            "{rows:?} holds a value outside the sequence"
        );

        Self {
            dimension: N,
            cells: rows.as_flattened().iter().map(|&v| Cell::from(v)).collect(),
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.cells
            .chunks(self.dimension)
            .map(|row| row.iter().map(|c| c.value().unwrap_or(0)).collect())
            .collect()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn get(&self, (row, col): Coord) -> Option<Cell> {
        (row < self.dimension && col < self.dimension).then(|| self.cells[self.offset((row, col))])
    }

    pub fn set_all(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &c)| ((i / self.dimension, i % self.dimension), c))
    }

    /// Coordinates of the empty cells, in row-major order.
    pub fn empty_spots(&self) -> Vec<Coord> {
        self.iter()
            .filter_map(|(coord, cell)| cell.is_empty().then_some(coord))
            .collect()
    }

    pub fn num_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    pub fn highest(&self) -> Option<u32> {
        self.cells.iter().filter_map(|c| c.value()).max()
    }

    fn offset(&self, (row, col): Coord) -> usize {
        debug_assert!(row < self.dimension && col < self.dimension);
        row * self.dimension + col
    }
}

impl Index<Coord> for Board {
    type Output = Cell;

    fn index(&self, coord: Coord) -> &Self::Output {
        &self.cells[self.offset(coord)]
    }
}

impl IndexMut<Coord> for Board {
    fn index_mut(&mut self, coord: Coord) -> &mut Self::Output {
        let offset = self.offset(coord);
        &mut self.cells[offset]
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows = self.cells.chunks(self.dimension);
        let write_row = |f: &mut fmt::Formatter<'_>, row: &[Cell]| {
            row.iter().try_for_each(|c| match c {
                Cell::Empty => write!(f, "{:>4}", '.'),
                Cell::Tile(v) => write!(f, "{v:>4}"),
            })
        };

        if let Some(row) = rows.next() {
            write_row(f, row)?
        }

        for row in rows {
            f.write_char('\n')?;
            write_row(f, row)?
        }

        Ok(())
    }
}

pub mod test_utils {
    use itertools::Itertools as _;
    use rand::seq::{IndexedRandom as _, SliceRandom as _};

    use crate::rules::FIBONACCI;

    /// Random board with `filled` tiles drawn from the first `max_term` terms of the sequence.
    pub fn generate_random_board<const N: usize>(filled: usize, max_term: usize) -> [[u32; N]; N] {
        let terms = &FIBONACCI[..max_term.clamp(1, FIBONACCI.len())];
        let rng = &mut rand::rng();

        let mut nums = (0..filled.min(N * N))
            .map(|_| *terms.choose(rng).unwrap())
            .collect_vec();

        nums.resize(N * N, 0);

        // Shuffle the values randomly
        nums.shuffle(rng);
        let mut nums = nums.into_iter();

        use std::array as arr;
        arr::from_fn(|_| arr::from_fn(|_| nums.next().unwrap_or(0)))
    }
}
