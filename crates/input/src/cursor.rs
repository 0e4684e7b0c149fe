//! Keyboard cursor over a square board.

use crate::types::GridSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Highlighted tile, as a row-major board index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    side: usize,
}

impl Cursor {
    pub fn new(grid: GridSize) -> Self {
        Self {
            index: 0,
            side: grid.side() as usize,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn row(&self) -> usize {
        self.index / self.side
    }

    pub fn col(&self) -> usize {
        self.index % self.side
    }

    /// Move one tile, wrapping around the edge of the board.
    pub fn step(&mut self, direction: Direction) {
        let (row, col) = (self.row(), self.col());
        let last = self.side - 1;
        let (row, col) = match direction {
            Direction::Up => (if row == 0 { last } else { row - 1 }, col),
            Direction::Down => (if row == last { 0 } else { row + 1 }, col),
            Direction::Left => (row, if col == 0 { last } else { col - 1 }),
            Direction::Right => (row, if col == last { 0 } else { col + 1 }),
        };
        self.index = row * self.side + col;
    }

    /// Re-home the cursor for a new board size.
    pub fn reset(&mut self, grid: GridSize) {
        *self = Self::new(grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves_within_row_and_column() {
        let mut cursor = Cursor::new(GridSize::Four);
        cursor.step(Direction::Right);
        cursor.step(Direction::Down);
        assert_eq!((cursor.row(), cursor.col()), (1, 1));
        assert_eq!(cursor.index(), 5);
    }

    #[test]
    fn test_step_wraps_edges() {
        let mut cursor = Cursor::new(GridSize::Four);
        cursor.step(Direction::Left);
        assert_eq!(cursor.index(), 3);
        cursor.step(Direction::Up);
        assert_eq!(cursor.index(), 15);
        cursor.step(Direction::Right);
        assert_eq!(cursor.index(), 12);
        cursor.step(Direction::Down);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_reset_for_larger_grid() {
        let mut cursor = Cursor::new(GridSize::Four);
        cursor.step(Direction::Down);
        cursor.reset(GridSize::Six);
        assert_eq!(cursor.index(), 0);
        cursor.step(Direction::Up);
        assert_eq!(cursor.index(), 30);
    }
}
