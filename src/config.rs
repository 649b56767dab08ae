use serde::Deserialize;

use crate::error::{EvoError, EvoResult};

/// Simulation parameters, deserialized from an optional TOML file and then
/// overridden by CLI flags. Defaults mirror the original implementation's
/// `configValues` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generations: usize,
    pub steps: usize,
    pub organisms: usize,
    pub genes: usize,
    pub mutate_chance: f64,
    pub num_internal_nodes: u32,
    pub grid_width: usize,
    pub grid_height: usize,
    pub obstacles: Vec<(usize, usize, usize, usize)>,
    pub sense_distance: i64,
    /// 0 = random pairing, 1 = similarity-pair, 2 = location-pair.
    pub mating_strategy: u8,
    pub similarity_factors: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            generations: 2,
            steps: 150,
            organisms: 100,
            genes: 10,
            mutate_chance: 0.05,
            num_internal_nodes: 4,
            grid_width: 140,
            grid_height: 140,
            obstacles: vec![(120, 130, 20, 120)],
            sense_distance: 5,
            mating_strategy: 0,
            similarity_factors: 3,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> EvoResult<Self> {
        toml::from_str(text).map_err(|e| EvoError::Configuration(e.to_string()))
    }

    pub fn validate(&self) -> EvoResult<()> {
        if self.genes == 0 {
            return Err(EvoError::Configuration("genes must be at least 1".into()));
        }
        if self.organisms == 0 {
            return Err(EvoError::Configuration("organisms must be at least 1".into()));
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(EvoError::Configuration("grid dimensions must be nonzero".into()));
        }
        if !(0.0..=1.0).contains(&self.mutate_chance) {
            return Err(EvoError::Configuration("mutate_chance must be in [0, 1]".into()));
        }
        if self.mating_strategy > 2 {
            return Err(EvoError::Configuration(format!(
                "unknown mating strategy {}",
                self.mating_strategy
            )));
        }
        for &(left, right, top, bottom) in &self.obstacles {
            if right >= self.grid_width || bottom >= self.grid_height || left > right || top > bottom {
                return Err(EvoError::Configuration(format!(
                    "obstacle ({left}, {right}, {top}, {bottom}) out of grid bounds"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_table() {
        let c = Config::default();
        assert_eq!(c.generations, 2);
        assert_eq!(c.steps, 150);
        assert_eq!(c.organisms, 100);
        assert_eq!(c.genes, 10);
        assert_eq!(c.grid_width, 140);
        assert_eq!(c.grid_height, 140);
    }

    #[test]
    fn validate_rejects_out_of_range_mutate_chance() {
        let mut c = Config::default();
        c.mutate_chance = 1.5;
        assert!(c.validate().is_err());
    }

    #[test]
    fn validate_rejects_obstacle_outside_grid() {
        let mut c = Config::default();
        c.obstacles = vec![(0, 200, 0, 10)];
        assert!(c.validate().is_err());
    }

    #[test]
    fn from_toml_str_parses_partial_overrides() {
        let c = Config::from_toml_str("generations = 5\nsteps = 10\n").unwrap();
        assert_eq!(c.generations, 5);
        assert_eq!(c.steps, 10);
        assert_eq!(c.organisms, 100);
    }
}
