//! Grid model: the 9×9 board, cell assignments, and the rule checks the
//! search engine consults during expansion.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the grid (and the number of candidate digits).
pub const GRID_SIZE: usize = 9;
/// Side length of one 3×3 box.
pub const BOX_SIZE: usize = 3;

/// A single cell assignment: `value` placed at (`row`, `col`).
///
/// An ordered sequence of assignments is the delta that separates a search
/// vertex from the start grid; replaying it reconstructs the vertex's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub row: u8,
    pub col: u8,
    pub value: u8,
}

impl Assignment {
    pub fn new(row: usize, col: usize, value: u8) -> Self {
        Self {
            row: row as u8,
            col: col as u8,
            value,
        }
    }
}

/// Error produced when parsing a grid from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseGridError {
    /// Input does not have 81 cells (or a row is not 9 digits long).
    WrongLength { expected: usize, found: usize },
    /// A character that is not a digit or `.` was found.
    InvalidCharacter { character: char, position: usize },
}

impl fmt::Display for ParseGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { expected, found } => {
                write!(f, "expected {} cells, found {}", expected, found)
            }
            Self::InvalidCharacter {
                character,
                position,
            } => {
                write!(f, "invalid character {:?} at position {}", character, position)
            }
        }
    }
}

impl std::error::Error for ParseGridError {}

/// A 9×9 Sudoku grid. `0` denotes an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[u8; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// Create a grid from raw rows.
    pub fn from_rows(cells: [[u8; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    /// Parse a grid from nine row strings of nine digits each (the CLI input
    /// format, `0` = empty).
    pub fn parse(rows: &[&str]) -> Result<Self, ParseGridError> {
        if rows.len() != GRID_SIZE {
            return Err(ParseGridError::WrongLength {
                expected: GRID_SIZE,
                found: rows.len(),
            });
        }

        let mut cells = [[0u8; GRID_SIZE]; GRID_SIZE];
        for (r, row) in rows.iter().enumerate() {
            let digits: Vec<char> = row.chars().collect();
            if digits.len() != GRID_SIZE {
                return Err(ParseGridError::WrongLength {
                    expected: GRID_SIZE,
                    found: digits.len(),
                });
            }
            for (c, ch) in digits.into_iter().enumerate() {
                match ch.to_digit(10) {
                    Some(d) => cells[r][c] = d as u8,
                    None => {
                        return Err(ParseGridError::InvalidCharacter {
                            character: ch,
                            position: r * GRID_SIZE + c,
                        })
                    }
                }
            }
        }

        Ok(Self { cells })
    }

    /// Parse a grid from a single 81-character line, digits or `.` for empty.
    pub fn from_string(s: &str) -> Result<Self, ParseGridError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != GRID_SIZE * GRID_SIZE {
            return Err(ParseGridError::WrongLength {
                expected: GRID_SIZE * GRID_SIZE,
                found: chars.len(),
            });
        }

        let mut cells = [[0u8; GRID_SIZE]; GRID_SIZE];
        for (i, ch) in chars.into_iter().enumerate() {
            let value = match ch {
                '.' => 0,
                _ => match ch.to_digit(10) {
                    Some(d) => d as u8,
                    None => {
                        return Err(ParseGridError::InvalidCharacter {
                            character: ch,
                            position: i,
                        })
                    }
                },
            };
            cells[i / GRID_SIZE][i % GRID_SIZE] = value;
        }

        Ok(Self { cells })
    }

    /// Value at (`row`, `col`); `0` = empty.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    /// Set the value at (`row`, `col`).
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row][col] = value;
    }

    fn in_row(&self, row: usize, value: u8) -> bool {
        self.cells[row].iter().any(|&v| v == value)
    }

    fn in_col(&self, col: usize, value: u8) -> bool {
        self.cells.iter().any(|row| row[col] == value)
    }

    fn in_box(&self, row: usize, col: usize, value: u8) -> bool {
        let corner_row = row - row % BOX_SIZE;
        let corner_col = col - col % BOX_SIZE;
        for r in corner_row..corner_row + BOX_SIZE {
            for c in corner_col..corner_col + BOX_SIZE {
                if self.cells[r][c] == value {
                    return true;
                }
            }
        }
        false
    }

    /// Check whether placing `value` at (`row`, `col`) keeps the row, column
    /// and box free of duplicates.
    pub fn is_valid_assignment(&self, row: usize, col: usize, value: u8) -> bool {
        !self.in_row(row, value) && !self.in_col(col, value) && !self.in_box(row, col, value)
    }

    /// First empty cell in row-major order, or `None` when the grid is full.
    pub fn first_empty_cell(&self) -> Option<(usize, usize)> {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if self.cells[row][col] == 0 {
                    return Some((row, col));
                }
            }
        }
        None
    }

    /// Replay a delta sequence onto this grid, in order.
    pub fn apply(&mut self, deltas: &[Assignment]) {
        for delta in deltas {
            self.cells[delta.row as usize][delta.col as usize] = delta.value;
        }
    }

    /// True when no empty cell remains. Completeness only; does not
    /// re-validate the placements.
    pub fn is_solved(&self) -> bool {
        self.first_empty_cell().is_none()
    }

    /// True when no row, column or box holds a duplicate non-zero digit.
    pub fn is_structurally_valid(&self) -> bool {
        for row in 0..GRID_SIZE {
            let mut seen = [false; GRID_SIZE + 1];
            for col in 0..GRID_SIZE {
                let v = self.cells[row][col] as usize;
                if v != 0 {
                    if seen[v] {
                        return false;
                    }
                    seen[v] = true;
                }
            }
        }

        for col in 0..GRID_SIZE {
            let mut seen = [false; GRID_SIZE + 1];
            for row in 0..GRID_SIZE {
                let v = self.cells[row][col] as usize;
                if v != 0 {
                    if seen[v] {
                        return false;
                    }
                    seen[v] = true;
                }
            }
        }

        for corner_row in (0..GRID_SIZE).step_by(BOX_SIZE) {
            for corner_col in (0..GRID_SIZE).step_by(BOX_SIZE) {
                let mut seen = [false; GRID_SIZE + 1];
                for r in corner_row..corner_row + BOX_SIZE {
                    for c in corner_col..corner_col + BOX_SIZE {
                        let v = self.cells[r][c] as usize;
                        if v != 0 {
                            if seen[v] {
                                return false;
                            }
                            seen[v] = true;
                        }
                    }
                }
            }
        }

        true
    }

    /// Number of empty cells (the greedy best-first heuristic).
    pub fn empty_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&v| v == 0)
            .count()
    }

    /// Number of digits that could be placed at (`row`, `col`) without
    /// breaking row/column/box exclusivity.
    pub fn candidate_count(&self, row: usize, col: usize) -> usize {
        (1..=GRID_SIZE as u8)
            .filter(|&v| self.is_valid_assignment(row, col, v))
            .count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..GRID_SIZE {
            if row % BOX_SIZE == 0 && row != 0 {
                writeln!(f, "------+-------+------")?;
            }
            for col in 0..GRID_SIZE {
                if col % BOX_SIZE == 0 && col != 0 {
                    write!(f, "| ")?;
                }
                if col == GRID_SIZE - 1 {
                    write!(f, "{}", self.cells[row][col])?;
                } else {
                    write!(f, "{} ", self.cells[row][col])?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_parse_rows() {
        let grid = Grid::parse(&[
            "530070000",
            "600195000",
            "098000060",
            "800060003",
            "400803001",
            "700020006",
            "060000280",
            "000419005",
            "000080079",
        ])
        .unwrap();
        assert_eq!(grid.get(0, 0), 5);
        assert_eq!(grid.get(8, 8), 9);
        assert_eq!(grid, Grid::from_string(PUZZLE).unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            Grid::parse(&["123"]),
            Err(ParseGridError::WrongLength { .. })
        ));
        assert!(matches!(
            Grid::from_string(&"x".repeat(81)),
            Err(ParseGridError::InvalidCharacter { position: 0, .. })
        ));
    }

    #[test]
    fn test_valid_assignment() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        // (0, 2) sees 5 and 3 in its row, 6 and 9 in its column, 6/9/8 in its box.
        assert!(grid.is_valid_assignment(0, 2, 1));
        assert!(!grid.is_valid_assignment(0, 2, 5)); // row duplicate
        assert!(!grid.is_valid_assignment(0, 2, 6)); // column duplicate
        assert!(!grid.is_valid_assignment(0, 2, 9)); // box duplicate
    }

    #[test]
    fn test_first_empty_cell_is_row_major() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        assert_eq!(grid.first_empty_cell(), Some((0, 2)));

        let mut full = grid;
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if full.get(row, col) == 0 {
                    full.set(row, col, 1);
                }
            }
        }
        assert_eq!(full.first_empty_cell(), None);
        assert!(full.is_solved());
    }

    #[test]
    fn test_apply_replays_in_order() {
        let mut grid = Grid::from_string(PUZZLE).unwrap();
        grid.apply(&[
            Assignment::new(0, 2, 4),
            Assignment::new(0, 2, 1),
            Assignment::new(0, 3, 2),
        ]);
        // Later assignments win.
        assert_eq!(grid.get(0, 2), 1);
        assert_eq!(grid.get(0, 3), 2);
    }

    #[test]
    fn test_structural_validity() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        assert!(grid.is_structurally_valid());

        let mut row_dup = grid;
        row_dup.set(0, 8, 5); // 5 already in row 0
        assert!(!row_dup.is_structurally_valid());

        let mut col_dup = grid;
        col_dup.set(8, 0, 5); // 5 already in column 0
        assert!(!col_dup.is_structurally_valid());

        let mut box_dup = grid;
        box_dup.set(1, 1, 5); // 5 already in the top-left box
        assert!(!box_dup.is_structurally_valid());
    }

    #[test]
    fn test_counts() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        assert_eq!(grid.empty_count(), 51);
        assert!(grid.candidate_count(0, 2) >= 1);
    }

    #[test]
    fn test_display_has_box_separators() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let text = grid.to_string();
        assert!(text.contains("------+-------+------"));
        assert!(text.starts_with("5 3 0 | 0 7 0 | 0 0 0"));
    }

    #[test]
    fn test_serde_round_trip() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(grid, back);
    }
}
