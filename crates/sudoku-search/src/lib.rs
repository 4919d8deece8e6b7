//! Sudoku solving as state-space search.
//!
//! The crate is layered bottom-up:
//!
//! - [`collections`]: a left-leaning red-black [`TreeMap`] and a
//!   comparator-driven binary [`PriorityQueue`].
//! - [`graph`]: a generic vertex/edge container over those maps, with
//!   stable handles and cascading vertex removal.
//! - [`grid`]: the 9×9 board, rule checks, and delta assignments.
//! - [`solver`]: five search strategies (BFS, IDDFS, UCS, A*, greedy
//!   best-first) expanding the puzzle lazily, one frontier generation
//!   in memory at a time.
//!
//! ```
//! use sudoku_search::{Algorithm, Grid, Solver};
//!
//! let grid = Grid::parse(&[
//!     "812753649",
//!     "943682175",
//!     "675491283",
//!     "154237896",
//!     "369845721",
//!     "287169534",
//!     "521974368",
//!     "438526917",
//!     "796318402", // one blank at row 8, column 7
//! ])?;
//!
//! let mut solver = Solver::new(grid, Algorithm::AStar);
//! let report = solver.solve()?;
//! assert!(report.solved);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod collections;
pub mod graph;
pub mod grid;
pub mod solver;

pub use collections::{PriorityQueue, TreeMap};
pub use graph::{Graph, GraphError, Orientation};
pub use grid::{Assignment, Grid, ParseGridError};
pub use solver::{Algorithm, SolveError, SolveReport, Solver, SolverConfig, UnknownAlgorithm};
