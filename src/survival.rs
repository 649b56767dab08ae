use crate::coord::Coord;
use crate::grid::Grid;

/// An opaque sink a survival criterion may draw debug output into. It has
/// no methods of its own — it exists so `draw` can be wired up without this
/// crate depending on a renderer.
pub trait RenderSink {}

/// A spatial predicate deciding which organisms survive a generation.
pub trait SurvivalCriterion {
    fn survives(&self, loc: Coord, grid: &Grid) -> bool;

    /// Optional debug visualization hook; a no-op by default.
    fn draw(&self, _sink: &mut dyn RenderSink) {}
}

/// Survives within Manhattan distance `distance` (strict) of any grid corner.
#[derive(Debug, Clone, Copy)]
pub struct CornerSurvival {
    pub distance: usize,
}

impl SurvivalCriterion for CornerSurvival {
    fn survives(&self, loc: Coord, grid: &Grid) -> bool {
        let corners = [
            Coord::new(0, 0),
            Coord::new(grid.width() - 1, 0),
            Coord::new(0, grid.height() - 1),
            Coord::new(grid.width() - 1, grid.height() - 1),
        ];
        corners.iter().any(|c| manhattan(loc, *c) < self.distance)
    }
}

/// Which edge of the grid a [`SideSurvival`] criterion measures against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Survives within `distance` cells of one chosen grid edge.
#[derive(Debug, Clone, Copy)]
pub struct SideSurvival {
    pub side: Side,
    pub distance: usize,
}

impl SurvivalCriterion for SideSurvival {
    fn survives(&self, loc: Coord, grid: &Grid) -> bool {
        match self.side {
            Side::Left => loc.x <= self.distance,
            Side::Right => loc.x >= grid.width() - self.distance,
            Side::Top => loc.y <= self.distance,
            Side::Bottom => loc.y >= grid.height() - self.distance,
        }
    }
}

fn manhattan(a: Coord, b: Coord) -> usize {
    let dx = (a.x as i64 - b.x as i64).unsigned_abs() as usize;
    let dy = (a.y as i64 - b.y as i64).unsigned_abs() as usize;
    dx + dy
}
