//! State-space search solver.
//!
//! The solver owns the immutable start grid and one directed graph used as a
//! lazily expanded search tree. Vertices carry only the delta sequence from
//! the root; a vertex's grid is reconstructed on demand by replaying its
//! deltas onto a copy of the start grid. Fully expanded vertices are evicted
//! from the graph, bounding memory to roughly one frontier generation of an
//! exponential search space.

use crate::collections::PriorityQueue;
use crate::graph::{EdgeId, Graph, GraphError, VertexId, VertexLabel};
use crate::grid::{Assignment, Grid, GRID_SIZE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Largest synthetic edge cost drawn for uniform-cost search.
const MAX_SYNTHETIC_EDGE_COST: u32 = GRID_SIZE as u32 + 1;

/// Search strategy. The letters are the CLI selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Breadth-first search (FIFO frontier).
    Bfs,
    /// Iterative-deepening depth-first search (LIFO frontier, depth cap).
    Iddfs,
    /// Uniform-cost search (min-priority frontier on path cost).
    Ucs,
    /// A* (min-priority frontier on path cost + heuristic).
    AStar,
    /// Greedy best-first search (min-priority frontier on heuristic alone).
    Gbfs,
}

impl Algorithm {
    /// CLI selector letter.
    pub fn letter(&self) -> char {
        match self {
            Algorithm::Bfs => 'B',
            Algorithm::Iddfs => 'I',
            Algorithm::Ucs => 'U',
            Algorithm::AStar => 'A',
            Algorithm::Gbfs => 'G',
        }
    }
}

impl TryFrom<char> for Algorithm {
    type Error = UnknownAlgorithm;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        match letter.to_ascii_uppercase() {
            'B' => Ok(Algorithm::Bfs),
            'I' => Ok(Algorithm::Iddfs),
            'U' => Ok(Algorithm::Ucs),
            'A' => Ok(Algorithm::AStar),
            'G' => Ok(Algorithm::Gbfs),
            _ => Err(UnknownAlgorithm(letter)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Bfs => write!(f, "BFS"),
            Algorithm::Iddfs => write!(f, "IDDFS"),
            Algorithm::Ucs => write!(f, "UCS"),
            Algorithm::AStar => write!(f, "A*"),
            Algorithm::Gbfs => write!(f, "GREEDY"),
        }
    }
}

/// Letter that does not name an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub char);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown algorithm {:?}, expected one of B I U A G", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

/// Configuration for one solver instance.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub algorithm: Algorithm,
    /// Depth cap for iterative deepening; `None` = one cell per grid cell.
    pub max_depth: Option<usize>,
    /// Seed for the synthetic edge-cost stream; `None` = OS entropy.
    pub seed: Option<u64>,
}

impl SolverConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            max_depth: None,
            seed: None,
        }
    }
}

/// Failure to even start a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// The start grid already violates row/column/box exclusivity.
    InvalidGrid,
    /// Internal graph bookkeeping failure.
    Graph(GraphError),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrid => write!(f, "start grid is not structurally valid"),
            Self::Graph(err) => write!(f, "search graph error: {}", err),
        }
    }
}

impl std::error::Error for SolveError {}

impl From<GraphError> for SolveError {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}

/// Outcome of one search run. Exhaustion (`solved = false`) is a normal
/// negative result, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    pub algorithm: Algorithm,
    pub solved: bool,
    pub solution: Option<Grid>,
    pub expanded_states: u64,
    pub elapsed: Duration,
}

/// Sudoku solver driving one of five search strategies over a lazily
/// expanded search graph.
pub struct Solver {
    start: Grid,
    config: SolverConfig,
    graph: Graph<Vec<Assignment>>,
    expanded_states: u64,
    rng: StdRng,
    solution: Option<Grid>,
}

impl Solver {
    /// Create a solver for `start` with default configuration.
    pub fn new(start: Grid, algorithm: Algorithm) -> Self {
        Self::with_config(start, SolverConfig::new(algorithm))
    }

    /// Create a solver with custom configuration.
    pub fn with_config(start: Grid, config: SolverConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            start,
            config,
            graph: Graph::directed(),
            expanded_states: 0,
            rng,
            solution: None,
        }
    }

    pub fn start_grid(&self) -> &Grid {
        &self.start
    }

    /// Run the configured search to completion.
    ///
    /// A structurally invalid start grid is rejected before any search. An
    /// already-solved grid short-circuits with zero expanded states.
    pub fn solve(&mut self) -> Result<SolveReport, SolveError> {
        if !self.start.is_structurally_valid() {
            return Err(SolveError::InvalidGrid);
        }

        self.expanded_states = 0;
        self.solution = None;

        let started = Instant::now();

        let solved = if self.start.is_solved() {
            self.solution = Some(self.start);
            true
        } else {
            match self.config.algorithm {
                Algorithm::Bfs => self.bfs()?,
                Algorithm::Iddfs => self.iddfs()?,
                Algorithm::Ucs => self.ucs()?,
                Algorithm::AStar => self.a_star()?,
                Algorithm::Gbfs => self.greedy_bfs()?,
            }
        };

        Ok(SolveReport {
            algorithm: self.config.algorithm,
            solved,
            solution: self.solution.take(),
            expanded_states: self.expanded_states,
            elapsed: started.elapsed(),
        })
    }

    // ==================== Shared machinery ====================

    /// Rebuild the search tree down to a fresh root with an empty delta.
    fn create_initial_state(&mut self) -> VertexId {
        self.graph.clear();
        self.graph.add_vertex(Vec::new())
    }

    /// Reconstruct the grid a delta sequence describes.
    fn reconstruct(&self, delta: &[Assignment]) -> Grid {
        let mut grid = self.start;
        grid.apply(delta);
        grid
    }

    fn vertex_grid(&self, id: VertexId) -> Result<Grid, GraphError> {
        Ok(self.reconstruct(self.graph.vertex(id)?.data()))
    }

    /// Generate every valid child of `parent`: one vertex per legal digit
    /// for the first empty cell, connected by a directed edge. Marks the
    /// parent `Processing` afterwards.
    fn expand_node(&mut self, parent: VertexId, synthetic_costs: bool) -> Result<(), GraphError> {
        let delta = self.graph.vertex(parent)?.data().clone();
        let grid = self.reconstruct(&delta);

        if let Some((row, col)) = grid.first_empty_cell() {
            for value in 1..=GRID_SIZE as u8 {
                if grid.is_valid_assignment(row, col, value) {
                    let mut child_delta = delta.clone();
                    child_delta.push(Assignment::new(row, col, value));

                    let child = self.graph.add_vertex(child_delta);
                    let cost = if synthetic_costs {
                        self.rng.gen_range(1..=MAX_SYNTHETIC_EDGE_COST)
                    } else {
                        0
                    };
                    self.graph.add_edge(parent, child, cost)?;

                    self.expanded_states += 1;
                }
            }
        }

        self.graph.vertex_mut(parent)?.set_label(VertexLabel::Processing);
        Ok(())
    }

    /// Owned copy of a vertex's adjacency list, so the graph can be mutated
    /// while walking it.
    fn adjacency_snapshot(&self, id: VertexId) -> Result<Vec<(EdgeId, VertexId)>, GraphError> {
        Ok(self
            .graph
            .vertex(id)?
            .adjacency()
            .iter()
            .map(|(edge, neighbor)| (*edge, *neighbor))
            .collect())
    }

    /// True when the vertex's grid is complete; captures the solution grid
    /// immediately, before any eviction can touch the vertex.
    fn check_solution(&mut self, id: VertexId) -> Result<bool, GraphError> {
        let grid = self.vertex_grid(id)?;
        if grid.is_solved() {
            self.solution = Some(grid);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Dijkstra-style edge relaxation shared by UCS and A*: improve `v`'s
    /// cost through `edge` if the path over `u` is strictly cheaper. The
    /// parent's heuristic contribution is subtracted to recover pure path
    /// cost before the child's own heuristic is added back.
    fn relax(&mut self, u: VertexId, v: VertexId, edge: EdgeId) -> Result<bool, GraphError> {
        let (u_cost, u_heuristic) = {
            let u = self.graph.vertex(u)?;
            (u.current_cost(), u.heuristic_cost())
        };
        let edge_cost = self.graph.edge(edge)?.cost();

        let vertex = self.graph.vertex_mut(v)?;
        let tentative = (u_cost - u_heuristic)
            .saturating_add(edge_cost)
            .saturating_add(vertex.heuristic_cost());

        if tentative < vertex.current_cost() {
            vertex.set_current_cost(tentative);
            vertex.set_predecessor(Some(edge));
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// A* heuristic: number of digits still legal for the last-assigned
    /// cell; `GRID_SIZE` for the root.
    fn a_star_heuristic(&self, id: VertexId) -> Result<u32, GraphError> {
        let delta = self.graph.vertex(id)?.data();
        match delta.last() {
            None => Ok(GRID_SIZE as u32),
            Some(last) => {
                let grid = self.reconstruct(delta);
                Ok(grid.candidate_count(last.row as usize, last.col as usize) as u32)
            }
        }
    }

    /// Greedy best-first heuristic: empty cells remaining.
    fn greedy_heuristic(&self, id: VertexId) -> Result<u32, GraphError> {
        Ok(self.vertex_grid(id)?.empty_count() as u32)
    }

    // ==================== Search strategies ====================

    /// Breadth-first search over a FIFO frontier.
    fn bfs(&mut self) -> Result<bool, GraphError> {
        let root = self.create_initial_state();

        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(u) = queue.pop_front() {
            self.expand_node(u, false)?;

            for (_, v) in self.adjacency_snapshot(u)? {
                if self.check_solution(v)? {
                    return Ok(true);
                }
                if self.graph.vertex(v)?.label() == VertexLabel::Unvisited {
                    queue.push_back(v);
                }
            }

            // Fully expanded: evict to keep the graph one generation deep.
            self.graph.remove_vertex(u);
        }

        Ok(false)
    }

    /// Iterative-deepening DFS: depth-limited LIFO searches with an
    /// increasing cap, rebuilding the graph for every iteration.
    fn iddfs(&mut self) -> Result<bool, GraphError> {
        let max_depth = self.config.max_depth.unwrap_or(GRID_SIZE * GRID_SIZE);

        for depth in 1..=max_depth as u32 {
            let root = self.create_initial_state();
            {
                let root = self.graph.vertex_mut(root)?;
                root.set_current_cost(0);
                root.set_label(VertexLabel::Depth(0));
            }

            let mut stack = vec![root];

            while let Some(u) = stack.pop() {
                // Depth-limited: beyond the cap the vertex is neither
                // expanded nor evicted; the next iteration rebuilds anyway.
                let parent_depth = self.graph.vertex(u)?.current_cost();
                if parent_depth > depth {
                    continue;
                }

                self.expand_node(u, false)?;

                for (_, v) in self.adjacency_snapshot(u)? {
                    if self.check_solution(v)? {
                        return Ok(true);
                    }
                    if self.graph.vertex(v)?.label() == VertexLabel::Unvisited {
                        let child = self.graph.vertex_mut(v)?;
                        child.set_current_cost(parent_depth + 1);
                        child.set_label(VertexLabel::Depth(parent_depth + 1));
                        stack.push(v);
                    }
                }

                self.graph.remove_vertex(u);
            }
        }

        Ok(false)
    }

    /// Uniform-cost search: Dijkstra-style relaxation over synthetic random
    /// edge costs, min-priority frontier on accumulated path cost.
    fn ucs(&mut self) -> Result<bool, GraphError> {
        let root = self.create_initial_state();
        self.graph.vertex_mut(root)?.set_current_cost(0);

        let mut frontier = min_frontier();
        frontier.push((0, root));

        while let Some((_, u)) = frontier.pop() {
            self.graph.vertex_mut(u)?.set_label(VertexLabel::Visited);
            self.expand_node(u, true)?;

            for (edge, v) in self.adjacency_snapshot(u)? {
                if self.check_solution(v)? {
                    return Ok(true);
                }
                if self.graph.vertex(v)?.label() == VertexLabel::Unvisited
                    && self.relax(u, v, edge)?
                {
                    frontier.push((self.graph.vertex(v)?.current_cost(), v));
                }
            }

            self.graph.remove_vertex(u);
        }

        Ok(false)
    }

    /// A*: relaxation like UCS, but the priority is path cost plus the
    /// per-child heuristic.
    fn a_star(&mut self) -> Result<bool, GraphError> {
        let root = self.create_initial_state();
        let root_heuristic = self.a_star_heuristic(root)?;
        {
            let root = self.graph.vertex_mut(root)?;
            root.set_current_cost(root_heuristic);
            root.set_heuristic_cost(root_heuristic);
        }

        let mut frontier = min_frontier();
        frontier.push((root_heuristic, root));

        while let Some((_, u)) = frontier.pop() {
            self.graph.vertex_mut(u)?.set_label(VertexLabel::Visited);
            self.expand_node(u, false)?;

            for (edge, v) in self.adjacency_snapshot(u)? {
                if self.check_solution(v)? {
                    return Ok(true);
                }
                if self.graph.vertex(v)?.label() == VertexLabel::Unvisited {
                    let heuristic = self.a_star_heuristic(v)?;
                    self.graph.vertex_mut(v)?.set_heuristic_cost(heuristic);
                    if self.relax(u, v, edge)? {
                        frontier.push((self.graph.vertex(v)?.current_cost(), v));
                    }
                }
            }

            self.graph.remove_vertex(u);
        }

        Ok(false)
    }

    /// Greedy best-first search: frontier ordered purely by the empty-cell
    /// heuristic, no cost accumulation.
    fn greedy_bfs(&mut self) -> Result<bool, GraphError> {
        let root = self.create_initial_state();
        let root_heuristic = self.greedy_heuristic(root)?;
        self.graph
            .vertex_mut(root)?
            .set_heuristic_cost(root_heuristic);

        let mut frontier = min_frontier();
        frontier.push((root_heuristic, root));

        while let Some((_, u)) = frontier.pop() {
            self.graph.vertex_mut(u)?.set_label(VertexLabel::Visited);
            self.expand_node(u, false)?;

            for (_, v) in self.adjacency_snapshot(u)? {
                if self.check_solution(v)? {
                    return Ok(true);
                }
                if self.graph.vertex(v)?.label() == VertexLabel::Unvisited {
                    let heuristic = self.greedy_heuristic(v)?;
                    self.graph.vertex_mut(v)?.set_heuristic_cost(heuristic);
                    frontier.push((heuristic, v));
                }
            }

            self.graph.remove_vertex(u);
        }

        Ok(false)
    }
}

/// Min-priority frontier over `(key, vertex)` snapshots. The strict tuple
/// order breaks key ties on the lower vertex handle, making every run
/// deterministic.
fn min_frontier() -> PriorityQueue<(u32, VertexId), fn(&(u32, VertexId), &(u32, VertexId)) -> bool>
{
    PriorityQueue::with_predicate(|a, b| a < b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVED: &str =
        "812753649943682175675491283154237896369845721287169534521974368438526917796318452";

    fn solved_grid() -> Grid {
        Grid::from_string(SOLVED).unwrap()
    }

    /// The solved grid with a handful of cells blanked again.
    fn blanked(cells: &[(usize, usize)]) -> Grid {
        let mut grid = solved_grid();
        for &(row, col) in cells {
            grid.set(row, col, 0);
        }
        grid
    }

    #[test]
    fn test_algorithm_letters_round_trip() {
        for algorithm in [
            Algorithm::Bfs,
            Algorithm::Iddfs,
            Algorithm::Ucs,
            Algorithm::AStar,
            Algorithm::Gbfs,
        ] {
            assert_eq!(Algorithm::try_from(algorithm.letter()), Ok(algorithm));
        }
        assert_eq!(Algorithm::try_from('u'), Ok(Algorithm::Ucs));
        assert_eq!(Algorithm::try_from('X'), Err(UnknownAlgorithm('X')));
        assert_eq!(Algorithm::AStar.to_string(), "A*");
        assert_eq!(Algorithm::Gbfs.to_string(), "GREEDY");
    }

    #[test]
    fn test_invalid_grid_is_rejected_before_search() {
        let mut grid = solved_grid();
        grid.set(0, 1, 8); // duplicates the 8 at (0, 0)
        let mut solver = Solver::new(grid, Algorithm::Bfs);
        assert_eq!(solver.solve().unwrap_err(), SolveError::InvalidGrid);
    }

    #[test]
    fn test_already_solved_short_circuits() {
        for algorithm in [Algorithm::Bfs, Algorithm::AStar] {
            let mut solver = Solver::new(solved_grid(), algorithm);
            let report = solver.solve().unwrap();
            assert!(report.solved);
            assert_eq!(report.expanded_states, 0);
            assert_eq!(report.solution, Some(solved_grid()));
        }
    }

    #[test]
    fn test_each_algorithm_solves_a_forced_line() {
        // Three blanks late in the grid: every expansion is forced.
        let start = blanked(&[(8, 2), (8, 5), (8, 8)]);
        for algorithm in [
            Algorithm::Bfs,
            Algorithm::Iddfs,
            Algorithm::Ucs,
            Algorithm::AStar,
            Algorithm::Gbfs,
        ] {
            let mut config = SolverConfig::new(algorithm);
            config.seed = Some(7);
            let mut solver = Solver::with_config(start, config);
            let report = solver.solve().unwrap();
            assert!(report.solved, "{} failed", algorithm);
            assert_eq!(report.solution, Some(solved_grid()), "{} wrong grid", algorithm);
            assert!(report.expanded_states > 0);
        }
    }

    #[test]
    fn test_exhaustion_is_a_negative_report_not_an_error() {
        // A cap of 1 still expands depth-1 vertices, reaching two cells
        // deep; three blanks stay out of range.
        let start = blanked(&[(8, 6), (8, 7), (8, 8)]);
        let mut config = SolverConfig::new(Algorithm::Iddfs);
        config.max_depth = Some(1);
        let mut solver = Solver::with_config(start, config);
        let report = solver.solve().unwrap();
        assert!(!report.solved);
        assert_eq!(report.solution, None);
        assert!(report.expanded_states > 0);
    }

    #[test]
    fn test_fixed_seed_makes_ucs_deterministic() {
        let start = blanked(&[(7, 0), (7, 4), (8, 1), (8, 6)]);
        let run = |seed: u64| {
            let mut config = SolverConfig::new(Algorithm::Ucs);
            config.seed = Some(seed);
            let mut solver = Solver::with_config(start, config);
            solver.solve().unwrap()
        };

        let first = run(42);
        let second = run(42);
        assert!(first.solved && second.solved);
        assert_eq!(first.expanded_states, second.expanded_states);
        assert_eq!(first.solution, second.solution);
    }

    #[test]
    fn test_report_serde_round_trip() {
        let mut solver = Solver::new(solved_grid(), Algorithm::Gbfs);
        let report = solver.solve().unwrap();
        let json = serde_json::to_string(&report).unwrap();
        let back: SolveReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.algorithm, Algorithm::Gbfs);
        assert_eq!(back.solved, report.solved);
        assert_eq!(back.expanded_states, report.expanded_states);
        assert_eq!(back.solution, report.solution);
    }

    #[test]
    fn test_graph_is_evicted_down_to_the_frontier() {
        // After a solved run the graph must not retain the whole tree: every
        // expanded vertex was removed on the way.
        let start = blanked(&[(6, 0), (6, 4), (7, 2), (8, 5)]);
        let mut solver = Solver::new(start, Algorithm::Bfs);
        let report = solver.solve().unwrap();
        assert!(report.solved);
        assert!(
            (solver.graph.vertex_count() as u64) < report.expanded_states + 1,
            "expanded vertices must be evicted"
        );
    }
}
