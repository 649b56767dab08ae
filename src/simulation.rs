use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::Config;
use crate::coord::Coord;
use crate::error::EvoResult;
use crate::gene::Genome;
use crate::grid::{Grid, Obstacle};
use crate::mating::{self, MatingStrategyKind};
use crate::node::CardinalDirection;
use crate::organism::Organism;
use crate::output::OutputHook;
use crate::similarity::{calc_generation_similarity, SimilarityFingerprint};
use crate::survival::SurvivalCriterion;

/// A survivor's genome plus the state a mating strategy needs, captured at
/// the moment survival was judged (before the next generation's grid reset
/// overwrites positions).
struct SurvivorRecord {
    genome: Genome,
    loc: Coord,
    fingerprint: SimilarityFingerprint,
}

/// Orchestrates the full generation loop: populate, step, select survivors,
/// breed, repeat.
pub struct Simulation {
    config: Config,
    grid: Grid,
    survival: Box<dyn SurvivalCriterion>,
    mating_strategy: MatingStrategyKind,
    output: Box<dyn OutputHook>,
    rng: StdRng,
    organisms: Vec<Organism>,
}

impl Simulation {
    pub fn new(
        config: Config,
        survival: Box<dyn SurvivalCriterion>,
        output: Box<dyn OutputHook>,
        seed: u64,
    ) -> EvoResult<Self> {
        config.validate()?;
        let mating_strategy = MatingStrategyKind::try_from(config.mating_strategy)?;
        let obstacles = config
            .obstacles
            .iter()
            .map(|&(left, right, top, bottom)| Obstacle::new(left, right, top, bottom))
            .collect();
        let grid = Grid::new(config.grid_width, config.grid_height, obstacles);

        Ok(Simulation {
            config,
            grid,
            survival,
            mating_strategy,
            output,
            rng: StdRng::seed_from_u64(seed),
            organisms: Vec::new(),
        })
    }

    pub fn organisms(&self) -> &[Organism] {
        &self.organisms
    }

    pub fn run(&mut self) -> EvoResult<()> {
        let mut survivors: Vec<SurvivorRecord> = Vec::new();

        for generation in 0..self.config.generations {
            self.create_generation(generation, &survivors)?;

            info!(generation, population = self.organisms.len(), "generation started");
            self.output.generation_started(&self.organisms, generation);

            for _ in 0..self.config.steps {
                {
                    let Self { organisms, grid, config, rng, .. } = self;
                    for idx in 0..organisms.len() {
                        organisms[idx].perform_step(idx, grid, config, rng);
                    }
                }
                self.output.step_complete();
            }

            survivors = self
                .organisms
                .iter()
                .filter(|o| self.survival.survives(o.loc, &self.grid))
                .map(|o| SurvivorRecord {
                    genome: o.genome().clone(),
                    loc: o.loc,
                    fingerprint: o.fingerprint.clone(),
                })
                .collect();

            info!(generation, survivors = survivors.len(), "generation complete");
            self.output.generation_complete(survivors.len());
        }

        self.output.simulation_complete();
        Ok(())
    }

    fn create_generation(&mut self, generation: usize, survivors: &[SurvivorRecord]) -> EvoResult<()> {
        let genomes: Vec<Genome> = if generation == 0 || survivors.is_empty() {
            if generation != 0 {
                warn!(generation, "no survivors from previous generation; reseeding randomly");
            }
            (0..self.config.organisms)
                .map(|_| Genome::gen_random(self.config.genes, &mut self.rng))
                .collect()
        } else {
            let survivor_genomes: Vec<Genome> = survivors.iter().map(|s| s.genome.clone()).collect();
            let positions: Vec<Coord> = survivors.iter().map(|s| s.loc).collect();
            let fingerprints: Vec<SimilarityFingerprint> = survivors.iter().map(|s| s.fingerprint.clone()).collect();

            mating::next_generation(
                &survivor_genomes,
                &positions,
                &fingerprints,
                self.config.organisms,
                self.mating_strategy,
                self.config.mutate_chance,
                self.config.num_internal_nodes,
                &mut self.rng,
            )?
        };

        let fingerprints = calc_generation_similarity(
            &genomes,
            self.config.num_internal_nodes,
            self.config.similarity_factors,
            &mut self.rng,
        );

        let initial_dirs: Vec<CardinalDirection> = (0..genomes.len())
            .map(|_| *CardinalDirection::ALL.choose(&mut self.rng).unwrap())
            .collect();

        self.organisms = genomes
            .into_iter()
            .zip(initial_dirs)
            .zip(fingerprints)
            .map(|((genome, dir), fingerprint)| {
                let mut organism = Organism::new(genome, self.config.num_internal_nodes, dir);
                organism.fingerprint = fingerprint;
                organism
            })
            .collect();

        self.grid.init_generation(self.organisms.len(), &mut self.rng);
        for (idx, organism) in self.organisms.iter_mut().enumerate() {
            organism.loc = self.grid.location_of(idx);
        }

        Ok(())
    }
}
