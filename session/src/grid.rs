//! Square maze grid and the randomized backtracker that carves it.

use maze_runner_core::{Cell, CellCoord, Direction, GridSize, MazeView, START_CELL};
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;
use tracing::debug;

/// Order in which neighbouring cells are reported by [`Grid::find_neighbours`].
const NEIGHBOUR_ORDER: [Direction; 4] = [
    Direction::West,
    Direction::North,
    Direction::East,
    Direction::South,
];

/// Errors reported by grid operations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The grid already carries a generated maze; call [`Grid::clear`] first.
    #[error("maze generation already ran on this grid")]
    AlreadyGenerated,
}

/// Square matrix of cells that owns maze generation and neighbour queries.
///
/// Cells are stored row-major. After [`Grid::generate_path`] the cells
/// joined by open walls form a spanning tree: every cell is reachable from
/// every other cell along exactly one path.
#[derive(Clone, Debug)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
    generated: bool,
}

impl Grid {
    /// Creates a grid of unvisited cells with every wall standing.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: fresh_cells(size),
            generated: false,
        }
    }

    /// Creates a grid and immediately carves a maze into it.
    #[must_use]
    pub fn generated<R>(size: GridSize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut grid = Self::new(size);
        grid.generated = true;
        grid.carve_maze(rng);
        grid
    }

    /// Edge length of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Whether a maze has been carved into the grid.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.generated
    }

    /// Returns the cell stored at `coord`, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.size
            .index_of(coord)
            .and_then(|index| self.cells.get(index))
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Read-only view consumed by presenters.
    #[must_use]
    pub fn view(&self) -> MazeView<'_> {
        MazeView::new(&self.cells, self.size)
    }

    /// Reports whether the wall on `direction` of the cell at `coord` is open.
    ///
    /// Cells outside the grid report every side as closed.
    #[must_use]
    pub fn is_open(&self, coord: CellCoord, direction: Direction) -> bool {
        self.cell(coord)
            .is_some_and(|cell| cell.walls().is_open(direction))
    }

    /// Enumerates every open wall pair exactly once as `(cell, direction)`,
    /// where `direction` is either east or south of `cell`.
    pub fn open_passages(&self) -> impl Iterator<Item = (CellCoord, Direction)> + '_ {
        self.cells.iter().flat_map(move |cell| {
            [Direction::East, Direction::South]
                .into_iter()
                .filter(move |direction| {
                    cell.walls().is_open(*direction)
                        && cell.coord().neighbour(*direction, self.size).is_some()
                })
                .map(move |direction| (cell.coord(), direction))
        })
    }

    /// Returns the in-bounds, axis-adjacent cells of `coord` that maze
    /// generation has not reached yet, ordered west, north, east, south.
    #[must_use]
    pub fn find_neighbours(&self, coord: CellCoord) -> Vec<CellCoord> {
        NEIGHBOUR_ORDER
            .into_iter()
            .filter_map(|direction| coord.neighbour(direction, self.size))
            .filter(|neighbour| self.cell(*neighbour).is_some_and(|cell| !cell.is_visited()))
            .collect()
    }

    /// Carves a perfect maze using a randomized depth-first search.
    ///
    /// Generation starts at `(0, 0)` and may run once per grid; a second call
    /// without an intervening [`Grid::clear`] is rejected.
    pub fn generate_path<R>(&mut self, rng: &mut R) -> Result<(), GridError>
    where
        R: Rng + ?Sized,
    {
        if self.generated {
            return Err(GridError::AlreadyGenerated);
        }
        self.generated = true;
        self.carve_maze(rng);
        Ok(())
    }

    /// Discards every cell and rebuilds a fresh, ungenerated grid of `size`.
    pub fn clear(&mut self, size: GridSize) {
        self.size = size;
        self.cells = fresh_cells(size);
        self.generated = false;
    }

    fn carve_maze<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let mut stack = Vec::with_capacity(self.size.cell_count());
        self.mark_visited(START_CELL);
        stack.push(START_CELL);

        let mut passages = 0_usize;
        while let Some(&current) = stack.last() {
            let neighbours = self.find_neighbours(current);
            let Some(&next) = neighbours.choose(rng) else {
                let _ = stack.pop();
                continue;
            };

            self.carve_between(current, next);
            self.mark_visited(next);
            stack.push(next);
            passages += 1;
        }

        debug!(size = self.size.get(), passages, "maze generated");
    }

    /// Removes the wall pair separating two adjacent cells.
    pub(crate) fn carve_between(&mut self, current: CellCoord, neighbour: CellCoord) {
        let Some(direction) = current.direction_to(neighbour) else {
            return;
        };

        if let Some(cell) = self.cell_mut(current) {
            cell.destroy_wall(direction);
        }
        if let Some(cell) = self.cell_mut(neighbour) {
            cell.destroy_wall(direction.opposite());
        }
    }

    /// Removes a single wall without touching the neighbouring cell.
    #[cfg(test)]
    pub(crate) fn open_side(&mut self, coord: CellCoord, direction: Direction) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.destroy_wall(direction);
        }
    }

    fn mark_visited(&mut self, coord: CellCoord) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.mark_visited();
        }
    }

    fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.size
            .index_of(coord)
            .and_then(|index| self.cells.get_mut(index))
    }
}

fn fresh_cells(size: GridSize) -> Vec<Cell> {
    (0..size.cell_count())
        .map(|index| Cell::new(size.coord_at(index)))
        .collect()
}
