use std::time::Duration;

use maze_runner_core::{CellCoord, GridSize};
use maze_runner_rendering::{DrawPlan, MazeLayout};
use maze_runner_session::Grid;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const STAGGER: Duration = Duration::from_millis(30);

fn generated(edge: u32, seed: u64) -> Grid {
    let size = GridSize::new(edge).expect("valid grid size");
    Grid::generated(size, &mut ChaCha8Rng::seed_from_u64(seed))
}

#[test]
fn plan_covers_every_cell_column_by_column() {
    let grid = generated(4, 5);
    let layout = MazeLayout::new(400.0, grid.size()).expect("positive width");
    let plan = DrawPlan::new(grid.view(), layout, STAGGER);
    assert_eq!(plan.len(), 16);

    let cells: Vec<CellCoord> = plan.map(|instruction| instruction.cell).collect();
    assert_eq!(cells.len(), 16);
    assert_eq!(
        &cells[..5],
        &[
            CellCoord::new(0, 0),
            CellCoord::new(0, 1),
            CellCoord::new(0, 2),
            CellCoord::new(0, 3),
            CellCoord::new(1, 0),
        ]
    );
}

#[test]
fn delays_grow_with_each_column() {
    let grid = generated(5, 11);
    let layout = MazeLayout::new(500.0, grid.size()).expect("positive width");
    let plan = DrawPlan::new(grid.view(), layout, STAGGER);
    assert_eq!(plan.total_delay(), Duration::from_millis(120));

    for instruction in plan {
        assert_eq!(
            instruction.delay,
            STAGGER * instruction.cell.x(),
            "cell {:?}",
            instruction.cell
        );
    }
}

#[test]
fn segments_match_closed_walls() {
    let grid = generated(6, 2);
    let layout = MazeLayout::new(600.0, grid.size()).expect("positive width");

    let strokes: usize = DrawPlan::new(grid.view(), layout, STAGGER)
        .map(|instruction| instruction.segments.len())
        .sum();
    let closed: usize = grid
        .cells()
        .iter()
        .map(|cell| 4 - cell.walls().open_count())
        .sum();

    assert_eq!(strokes, closed);
}

#[test]
fn restarted_plan_replays_the_same_instructions() {
    let grid = generated(3, 9);
    let layout = MazeLayout::new(90.0, grid.size()).expect("positive width");
    let mut plan = DrawPlan::new(grid.view(), layout, STAGGER);

    let first: Vec<_> = plan.by_ref().collect();
    assert!(plan.next().is_none(), "plan is finite");

    plan.restart();
    let second: Vec<_> = plan.collect();
    assert_eq!(first, second);
}
