use fxhash::{FxHashMap, FxHashSet};
use rand::Rng;

use crate::coord::Coord;
use crate::node::CardinalDirection;

/// An axis-aligned obstacle rectangle, inclusive of its bounds.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl Obstacle {
    pub fn new(left: usize, right: usize, top: usize, bottom: usize) -> Self {
        Obstacle { left, right, top, bottom }
    }

    fn contains(&self, coord: Coord) -> bool {
        coord.x >= self.left && coord.x <= self.right && coord.y >= self.top && coord.y <= self.bottom
    }
}

/// The grid holds the single source of truth for where every organism
/// stands; `Organism::loc` is a read-only mirror kept in lockstep via
/// [`Grid::update_loc`]. Obstacle cells are permanently blocked and never
/// reported as available, regardless of occupancy.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    obstacles: Vec<Obstacle>,
    blocked: FxHashSet<Coord>,
    positions: Vec<Coord>,
    occupied: FxHashMap<Coord, usize>,
}

impl Grid {
    /// Density counts are normalized against a fixed constant rather than
    /// grid area — kept as-is; see design notes.
    pub const DENSITY_NORMALIZER: f32 = 100.0;

    pub fn new(width: usize, height: usize, obstacles: Vec<Obstacle>) -> Self {
        let mut blocked = FxHashSet::default();
        for y in 0..height {
            for x in 0..width {
                let c = Coord::new(x, y);
                if obstacles.iter().any(|o| o.contains(c)) {
                    blocked.insert(c);
                }
            }
        }

        Grid {
            width,
            height,
            obstacles,
            blocked,
            positions: Vec::new(),
            occupied: FxHashMap::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_blocked(&self, coord: Coord) -> bool {
        self.blocked.contains(&coord)
    }

    pub fn loc_is_available(&self, coord: Coord) -> bool {
        coord.in_bounds(self.width, self.height) && !self.is_blocked(coord) && !self.occupied.contains_key(&coord)
    }

    pub fn location_of(&self, organism_idx: usize) -> Coord {
        self.positions[organism_idx]
    }

    /// Rejection-samples `count` distinct, unblocked cells and assigns one
    /// per organism index. Loops until it finds a free cell for each slot.
    pub fn init_generation(&mut self, count: usize, rng: &mut impl Rng) {
        self.positions.clear();
        self.occupied.clear();

        for idx in 0..count {
            loop {
                let coord = Coord::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
                if self.loc_is_available(coord) {
                    self.positions.push(coord);
                    self.occupied.insert(coord, idx);
                    break;
                }
            }
        }
    }

    pub fn update_loc(&mut self, organism_idx: usize, new_loc: Coord) {
        let old_loc = self.positions[organism_idx];
        self.occupied.remove(&old_loc);
        self.occupied.insert(new_loc, organism_idx);
        self.positions[organism_idx] = new_loc;
    }

    /// Population density within Manhattan `distance` of `origin`, any
    /// direction, normalized against [`Grid::DENSITY_NORMALIZER`] rather
    /// than the swept area. `origin` itself counts if it holds an organism.
    pub fn density_within_distance(&self, origin: Coord, distance: i64) -> f32 {
        let count = self.positions.iter().filter(|&&p| manhattan(origin, p) <= distance).count();
        count as f32 / Self::DENSITY_NORMALIZER
    }

    /// Population density in a forward-facing half-diamond ahead of
    /// `origin` along `dir` — the half of the Manhattan ball of radius
    /// `distance`, centered `distance` cells out in `dir`, that lies
    /// between `origin` and that far point.
    ///
    /// The Y-axis sign convention here is intentionally asymmetric with the
    /// X-axis one — see design notes: `NegY`'s far point is offset by
    /// `+distance`, `PosY`'s by `-distance`, the opposite pairing you'd get
    /// from mirroring the X-axis case.
    pub fn density_in_directed_cone(&self, origin: Coord, distance: i64, dir: CardinalDirection) -> f32 {
        let count = self.positions.iter().filter(|&&p| self.in_forward_cone(origin, p, distance, dir)).count();
        count as f32 / Self::DENSITY_NORMALIZER
    }

    fn in_forward_cone(&self, origin: Coord, p: Coord, distance: i64, dir: CardinalDirection) -> bool {
        let ox = origin.x as i64;
        let oy = origin.y as i64;
        let px = p.x as i64;
        let py = p.y as i64;

        match dir {
            CardinalDirection::NegX => {
                let far_x = ox - distance;
                px >= far_x && (far_x - px).abs() + (oy - py).abs() <= distance
            }
            CardinalDirection::PosX => {
                let far_x = ox + distance;
                px <= far_x && (far_x - px).abs() + (oy - py).abs() <= distance
            }
            CardinalDirection::NegY => {
                let far_y = oy + distance;
                py <= far_y && (ox - px).abs() + (far_y - py).abs() <= distance
            }
            CardinalDirection::PosY => {
                let far_y = oy - distance;
                py >= far_y && (ox - px).abs() + (far_y - py).abs() <= distance
            }
        }
    }

    fn blocked_at(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.blocked.contains(&Coord::new(x as usize, y as usize))
    }

    fn occupied_at(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.occupied.contains_key(&Coord::new(x as usize, y as usize))
    }

    /// Walks outward from `origin` in `dir`, one cell at a time, up to
    /// `max_distance` steps, looking for an obstacle cell. No bounds check
    /// is applied to the walk itself — a walk that crosses the grid edge
    /// simply never finds a match there, matching the original's reliance
    /// on an unbounded blocked-cell lookup rather than an explicit edge
    /// test.
    pub fn boundary_distance(&self, origin: Coord, max_distance: i64, dir: CardinalDirection) -> f32 {
        self.walk_for_condition(origin, max_distance, dir, Self::blocked_at)
    }

    /// As [`Grid::boundary_distance`], but for the nearest occupied cell.
    pub fn occupied_distance(&self, origin: Coord, max_distance: i64, dir: CardinalDirection) -> f32 {
        self.walk_for_condition(origin, max_distance, dir, Self::occupied_at)
    }

    /// Preserves the original off-by-one: the first matching cell at true
    /// distance 1 is reported as `0 / max_distance`, since the step index
    /// starts at 0 rather than 1.
    fn walk_for_condition(
        &self,
        origin: Coord,
        max_distance: i64,
        dir: CardinalDirection,
        condition: impl Fn(&Self, i64, i64) -> bool,
    ) -> f32 {
        let unit = dir.unit();
        let mut x = origin.x as i64;
        let mut y = origin.y as i64;
        for i in 0..max_distance {
            x += unit.dx;
            y += unit.dy;
            if condition(self, x, y) {
                return i as f32 / max_distance as f32;
            }
        }
        1.0
    }
}

fn manhattan(a: Coord, b: Coord) -> i64 {
    let dx = (a.x as i64 - b.x as i64).abs();
    let dy = (a.y as i64 - b.y as i64).abs();
    dx + dy
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn obstacle_blocks_cells_permanently() {
        let grid = Grid::new(10, 10, vec![Obstacle::new(2, 4, 2, 4)]);
        assert!(!grid.loc_is_available(Coord::new(3, 3)));
        assert!(grid.loc_is_available(Coord::new(0, 0)));
    }

    #[test]
    fn init_generation_places_distinct_cells() {
        let mut grid = Grid::new(20, 20, vec![]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        grid.init_generation(50, &mut rng);
        let mut seen = FxHashSet::default();
        for i in 0..50 {
            let loc = grid.location_of(i);
            assert!(seen.insert(loc), "duplicate location assigned");
        }
    }

    #[test]
    fn update_loc_moves_occupancy_atomically() {
        let mut grid = Grid::new(10, 10, vec![]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        grid.init_generation(1, &mut rng);
        let old = grid.location_of(0);
        let new = Coord::new((old.x + 1) % 10, old.y);
        assert!(grid.loc_is_available(new) || new == old);
        grid.update_loc(0, new);
        assert_eq!(grid.location_of(0), new);
        assert!(!grid.occupied.contains_key(&old) || old == new);
    }

    #[test]
    fn boundary_distance_ignores_grid_edge_absent_an_obstacle() {
        // walking off the grid with no obstacle in the way never trips the
        // condition, so the walk reports the max (1.0), not the edge.
        let grid = Grid::new(10, 10, vec![]);
        let d = grid.boundary_distance(Coord::new(0, 0), 5, CardinalDirection::NegX);
        assert_eq!(d, 1.0);
    }

    #[test]
    fn boundary_distance_finds_adjacent_obstacle_at_zero() {
        let grid = Grid::new(10, 10, vec![Obstacle::new(5, 5, 0, 9)]);
        let d = grid.boundary_distance(Coord::new(4, 0), 5, CardinalDirection::PosX);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn density_within_distance_counts_manhattan_neighbors() {
        let mut grid = Grid::new(20, 20, vec![]);
        grid.positions = vec![Coord::new(5, 5), Coord::new(7, 5), Coord::new(5, 10)];
        // (7,5) is Manhattan distance 2 away, (5,10) is 5 away.
        let d = grid.density_within_distance(Coord::new(5, 5), 2);
        assert_eq!(d, 2.0 / Grid::DENSITY_NORMALIZER);
    }
}
