use rand::Rng;

use crate::coord::Coord;
use crate::error::{EvoError, EvoResult};
use crate::gene::Genome;
use crate::similarity::SimilarityFingerprint;

/// Which heuristic pairs survivors before breeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatingStrategyKind {
    /// No pairing: every child picks two independent random parents.
    Random,
    /// Greedy pairing minimizing fingerprint distance.
    Similarity,
    /// Greedy pairing minimizing grid distance at time of survival.
    Location,
}

impl TryFrom<u8> for MatingStrategyKind {
    type Error = EvoError;

    fn try_from(v: u8) -> EvoResult<Self> {
        match v {
            0 => Ok(MatingStrategyKind::Random),
            1 => Ok(MatingStrategyKind::Similarity),
            2 => Ok(MatingStrategyKind::Location),
            other => Err(EvoError::Configuration(format!("unknown mating strategy {other}"))),
        }
    }
}

/// Greedily pairs indices `0..n`, each survivor claiming its lowest-heuristic
/// unpaired partner, processed in index order. Leaves one survivor unpaired
/// if `n` is odd.
pub fn pair_by_heuristic(n: usize, heuristic: impl Fn(usize, usize) -> f64) -> Vec<(usize, usize)> {
    let mut paired = vec![false; n];
    let mut pairs = Vec::new();
    let target_pairs = n / 2;

    for s in 0..n {
        if pairs.len() >= target_pairs {
            break;
        }
        if paired[s] {
            continue;
        }

        let mut best: Option<(usize, f64)> = None;
        for o in 0..n {
            if o == s || paired[o] {
                continue;
            }
            let h = heuristic(s, o);
            best = match best {
                None => Some((o, h)),
                Some((_, bh)) if h < bh => Some((o, h)),
                existing => existing,
            };
        }

        if let Some((o, _)) = best {
            paired[s] = true;
            paired[o] = true;
            pairs.push((s, o));
        }
    }

    pairs
}

/// Breeds `pop_size` children from `survivors`, per `strategy`.
///
/// `positions` and `fingerprints` must be indexed the same as `survivors`
/// (one entry per survivor, taken at the moment it was judged to survive).
pub fn next_generation(
    survivors: &[Genome],
    positions: &[Coord],
    fingerprints: &[SimilarityFingerprint],
    pop_size: usize,
    strategy: MatingStrategyKind,
    mutate_chance: f64,
    num_inner: u32,
    rng: &mut impl Rng,
) -> EvoResult<Vec<Genome>> {
    if survivors.is_empty() {
        return Err(EvoError::NoSurvivors);
    }
    let _ = num_inner;

    let pairs = match strategy {
        MatingStrategyKind::Random => Vec::new(),
        MatingStrategyKind::Similarity => {
            pair_by_heuristic(survivors.len(), |a, b| fingerprints[a].weighted_difference(&fingerprints[b]) as f64)
        }
        MatingStrategyKind::Location => {
            pair_by_heuristic(survivors.len(), |a, b| positions[a].weighted_difference(&positions[b]) as f64)
        }
    };

    let mut children = Vec::with_capacity(pop_size);
    for i in 0..pop_size {
        let (a, b) = match strategy {
            MatingStrategyKind::Random => (rng.gen_range(0..survivors.len()), rng.gen_range(0..survivors.len())),
            _ => {
                if pairs.is_empty() {
                    (rng.gen_range(0..survivors.len()), rng.gen_range(0..survivors.len()))
                } else {
                    pairs[i % pairs.len()]
                }
            }
        };
        children.push(Genome::gen_from_parents(&survivors[a], &survivors[b], mutate_chance, rng)?);
    }

    Ok(children)
}
