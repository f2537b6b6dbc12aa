use crate::Position;
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;

/// Content of a single minefield cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Mine,
    /// Number of mines among the in-bounds Moore neighbors.
    Clear(u8),
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Clear(0)
    }
}

/// Immutable mine layout of one game, indexed `[y, x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Minefield {
    cells: Array2<Cell>,
    mines_count: usize,
}

impl Minefield {
    /// Places `mines_count` mines uniformly at random by shuffling every cell
    /// index and taking the first `mines_count` of them.
    ///
    /// The caller guarantees `width > 0`, `height > 0` and
    /// `0 < mines_count < width * height`.
    pub fn generate<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        mines_count: usize,
        rng: &mut R,
    ) -> Self {
        let mut indices: Vec<usize> = (0..width * height).collect();
        indices.shuffle(rng);

        let mines = indices[..mines_count].iter().map(|&index| {
            Position::new((index % width) as i32, (index / width) as i32)
        });
        Self::from_mines(width, height, mines)
    }

    /// Builds a minefield with mines at exactly the given positions.
    /// Out-of-bounds and repeated positions are ignored.
    pub fn from_mines(
        width: usize,
        height: usize,
        mines: impl IntoIterator<Item = Position>,
    ) -> Self {
        let mut field = Minefield {
            cells: Array2::default((height, width)),
            mines_count: 0,
        };

        for pos in mines {
            if !field.contains(pos) || field.is_mine(pos) {
                continue;
            }
            field.cells[index(pos)] = Cell::Mine;
            field.mines_count += 1;

            for neighbor in pos.neighbors() {
                if !field.contains(neighbor) {
                    continue;
                }
                if let Cell::Clear(count) = &mut field.cells[index(neighbor)] {
                    *count += 1;
                }
            }
        }

        field
    }

    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn mines_count(&self) -> usize {
        self.mines_count
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width()
            && (pos.y as usize) < self.height()
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.contains(pos) {
            Some(self.cells[index(pos)])
        } else {
            None
        }
    }

    pub fn is_mine(&self, pos: Position) -> bool {
        self.get(pos) == Some(Cell::Mine)
    }

    /// In-bounds Moore neighbors of `pos`.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors().filter(move |p| self.contains(*p))
    }

    pub(crate) fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// Every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((y, x), cell)| (Position::new(x as i32, y as i32), *cell))
    }
}

/// Array index for an in-bounds position.
pub(crate) fn index(pos: Position) -> [usize; 2] {
    [pos.y as usize, pos.x as usize]
}
