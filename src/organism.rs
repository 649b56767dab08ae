use rand::seq::SliceRandom;
use rand::Rng;

use crate::brain::Brain;
use crate::config::Config;
use crate::coord::Coord;
use crate::gene::Genome;
use crate::grid::Grid;
use crate::node::{ActionKind, CardinalDirection, SenseKind};
use crate::similarity::SimilarityFingerprint;

/// A living agent: a compiled [`Brain`], its source [`Genome`], and the
/// mutable state a step updates (location, facing, age).
#[derive(Debug, Clone)]
pub struct Organism {
    brain: Brain,
    genome: Genome,
    pub loc: Coord,
    pub last_move: CardinalDirection,
    pub age: u64,
    pub fingerprint: SimilarityFingerprint,
}

impl Organism {
    pub fn new(genome: Genome, num_inner: u32, initial_dir: CardinalDirection) -> Self {
        let brain = Brain::build(&genome, num_inner);
        Organism {
            brain,
            genome,
            loc: Coord::new(0, 0),
            last_move: initial_dir,
            age: 0,
            fingerprint: SimilarityFingerprint::default(),
        }
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    /// Runs one simulation step: age, sense, think, then move (or not).
    /// `idx` is this organism's position index in the owning `Grid`.
    pub fn perform_step(&mut self, idx: usize, grid: &mut Grid, config: &Config, rng: &mut impl Rng) {
        self.age += 1;

        let loc = self.loc;
        let last_move = self.last_move;
        let age = self.age;
        let actions = self.brain.evaluate(
            |kind| Self::sense_value(kind, loc, last_move, age, grid, config),
            rng,
        );

        self.execute_actions(idx, grid, &actions, rng);
    }

    fn sense_value(kind: SenseKind, loc: Coord, last_move: CardinalDirection, age: u64, grid: &Grid, config: &Config) -> f32 {
        use CardinalDirection::*;
        use SenseKind::*;

        match kind {
            XLoc => loc.x as f32 / grid.width() as f32,
            YLoc => loc.y as f32 / grid.height() as f32,
            DistanceFromNearestEdge => {
                let nx = (loc.x as f32).min((grid.width() - loc.x) as f32) / (grid.width() as f32 / 2.0);
                let ny = (loc.y as f32).min((grid.height() - loc.y) as f32) / (grid.height() as f32 / 2.0);
                nx.min(ny)
            }
            DistanceFromNearestXEdge => {
                (loc.x as f32).min((grid.width() - loc.x) as f32) / (grid.width() as f32 / 2.0)
            }
            DistanceFromNearestYEdge => {
                (loc.y as f32).min((grid.height() - loc.y) as f32) / (grid.height() as f32 / 2.0)
            }
            DistanceFromForwardEdge => match last_move {
                NegX => loc.x as f32,
                PosX => (grid.width() - loc.x) as f32,
                NegY => loc.y as f32,
                PosY => (grid.height() - loc.y) as f32,
            },
            DistanceFromLrEdge => match last_move {
                NegX | PosX => (loc.y as f32).min((grid.height() - loc.y) as f32) / (grid.height() as f32 / 2.0),
                NegY | PosY => (loc.x as f32).min((grid.width() - loc.x) as f32) / (grid.width() as f32 / 2.0),
            },
            DistanceFromForwardBoundary => grid.boundary_distance(loc, config.sense_distance, last_move),
            DistanceFromLrBoundary => {
                let l = grid.boundary_distance(loc, config.sense_distance, last_move.left());
                let r = grid.boundary_distance(loc, config.sense_distance, last_move.right());
                l.min(r)
            }
            DistanceFromNearestXBoundary => {
                let a = grid.boundary_distance(loc, config.sense_distance, CardinalDirection::NegX);
                let b = grid.boundary_distance(loc, config.sense_distance, CardinalDirection::PosX);
                a.min(b)
            }
            DistanceFromNearestYBoundary => {
                let a = grid.boundary_distance(loc, config.sense_distance, CardinalDirection::NegY);
                let b = grid.boundary_distance(loc, config.sense_distance, CardinalDirection::PosY);
                a.min(b)
            }
            PopulationClose => grid.density_within_distance(loc, config.sense_distance),
            PopulationForward => grid.density_in_directed_cone(loc, config.sense_distance, last_move),
            DistanceFromForwardOrganism => grid.occupied_distance(loc, config.sense_distance, last_move),
            DistanceFromLrOrganism => {
                let l = grid.occupied_distance(loc, config.sense_distance, last_move.left());
                let r = grid.occupied_distance(loc, config.sense_distance, last_move.right());
                l.min(r)
            }
            Age => age as f32 / config.steps as f32,
        }
    }

    fn execute_actions(&mut self, idx: usize, grid: &mut Grid, actions: &[crate::brain::Action], rng: &mut impl Rng) {
        let moves: Vec<CardinalDirection> = actions.iter().map(|a| self.expand_move(a.kind, rng)).collect();
        if moves.is_empty() {
            return;
        }

        let mut delta = crate::coord::Delta::zero();
        let mut new_last_move = self.last_move;
        for dir in &moves {
            delta = delta + dir.unit();
            new_last_move = *dir;
        }

        if let Some(target) = delta.apply(self.loc, grid.width(), grid.height()) {
            if grid.loc_is_available(target) {
                grid.update_loc(idx, target);
                self.loc = target;
                self.last_move = new_last_move;
            }
        }
    }

    /// Expands a compound action into the single cardinal direction it
    /// resolves to this step. Every [`ActionKind`] is a movement action in
    /// this catalog, so none are filtered out.
    fn expand_move(&self, action: ActionKind, rng: &mut impl Rng) -> CardinalDirection {
        match action {
            ActionKind::MovePosX => CardinalDirection::PosX,
            ActionKind::MoveNegX => CardinalDirection::NegX,
            ActionKind::MovePosY => CardinalDirection::PosY,
            ActionKind::MoveNegY => CardinalDirection::NegY,
            ActionKind::MoveForward => self.last_move,
            ActionKind::MoveLeft => self.last_move.left(),
            ActionKind::MoveRight => self.last_move.right(),
            ActionKind::MoveRandom => *CardinalDirection::ALL.choose(rng).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn empty_genome_never_moves() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let genome = Genome::gen_random(0, &mut rng);
        let mut organism = Organism::new(genome, 4, CardinalDirection::PosX);
        let mut grid = Grid::new(20, 20, vec![]);
        grid.init_generation(1, &mut rng);
        organism.loc = grid.location_of(0);
        let before = organism.loc;

        let config = Config::default();
        organism.perform_step(0, &mut grid, &config, &mut rng);

        assert_eq!(organism.loc, before);
        assert_eq!(organism.age, 1);
    }

    #[test]
    fn obstacle_blocks_attempted_move() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut grid = Grid::new(10, 10, vec![crate::grid::Obstacle::new(5, 5, 0, 9)]);
        grid.init_generation(1, &mut rng);
        let genome = Genome::gen_random(0, &mut rng);
        let mut organism = Organism::new(genome, 4, CardinalDirection::PosX);
        organism.loc = Coord::new(4, 3);
        grid.update_loc(0, organism.loc);

        let actions = [crate::brain::Action { kind: ActionKind::MovePosX, strength: 1.0 }];
        organism.execute_actions(0, &mut grid, &actions, &mut rng);

        assert_eq!(organism.loc, Coord::new(4, 3));
    }
}
