use rand::Rng;

use crate::gene::{Gene, Genome};

/// Scores how alike two genes are, in `[0, 1]`: kind/id agreement on the
/// input side (up to 0.45), the same on the output side (up to 0.45), and
/// weight agreement (up to 0.10).
pub fn gene_similarity(g1: &Gene, g2: &Gene, num_inner: u32) -> f32 {
    let mut score = 0.0f32;

    let in1 = g1.input_node_kind(num_inner);
    let in2 = g2.input_node_kind(num_inner);
    if in1.kind_tag() == in2.kind_tag() {
        score += 0.15;
        let diff = (in1.numeric_id() - in2.numeric_id()).abs();
        if diff == 0 {
            score += 0.30;
        } else if diff == 1 {
            score += 0.10;
        }
    }

    let out1 = g1.output_node_kind(num_inner);
    let out2 = g2.output_node_kind(num_inner);
    if out1.kind_tag() == out2.kind_tag() {
        score += 0.15;
        let diff = (out1.numeric_id() - out2.numeric_id()).abs();
        if diff == 0 {
            score += 0.30;
        } else if diff == 1 {
            score += 0.10;
        }
    }

    let w1 = g1.weight();
    let w2 = g2.weight();
    if (w1 > 0.0) == (w2 > 0.0) {
        score += 0.05;
    }
    score += (1.0 - (w1 - w2).abs() / 8.0) * 0.05;

    score
}

/// Greedy best-match similarity between two genomes: each gene of `a` claims
/// its best remaining match in `b`, highest total wins. Identical genomes
/// short-circuit to `1.0`.
pub fn genome_similarity(a: &Genome, b: &Genome, num_inner: u32) -> f32 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() {
        return 1.0;
    }

    let mut available: Vec<&Gene> = b.genes().iter().collect();
    let mut total = 0.0f32;

    for gene in a.genes() {
        if available.is_empty() {
            break;
        }
        let (best_idx, best_score) = available
            .iter()
            .enumerate()
            .map(|(i, g)| (i, gene_similarity(gene, g, num_inner)))
            .fold((0usize, -1.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });
        total += best_score;
        available.remove(best_idx);
    }

    total / a.len() as f32
}

/// An N-factor genetic fingerprint: per-round normalized similarity to a
/// shifting benchmark genome, used as a cheap proxy for pairwise similarity
/// without an O(n^2) comparison every mating round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityFingerprint(Vec<i64>);

impl SimilarityFingerprint {
    pub fn factors(&self) -> &[i64] {
        &self.0
    }

    pub fn total(&self) -> i64 {
        self.0.iter().sum()
    }

    pub fn weighted_difference(&self, other: &SimilarityFingerprint) -> i64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| (a - b).pow(2)).sum()
    }
}

/// Computes an `N`-factor fingerprint for every genome in `genomes`.
///
/// Each round: pick a benchmark genome (initially random, thereafter the
/// genome with the lowest cumulative fingerprint so far), compare every
/// genome against it, and normalize so the least-similar genome this round
/// scores 0 and the benchmark itself scores 100.
pub fn calc_generation_similarity(
    genomes: &[Genome],
    num_inner: u32,
    num_factors: usize,
    rng: &mut impl Rng,
) -> Vec<SimilarityFingerprint> {
    let n = genomes.len();
    let mut fingerprints = vec![SimilarityFingerprint::default(); n];
    if n == 0 {
        return fingerprints;
    }

    let mut benchmark = rng.gen_range(0..n);
    for _ in 0..num_factors {
        let raw: Vec<f32> = genomes
            .iter()
            .map(|g| genome_similarity(&genomes[benchmark], g, num_inner))
            .collect();
        let min_sim = raw.iter().cloned().fold(f32::INFINITY, f32::min);
        let denom = 1.0 - min_sim;

        for (i, &r) in raw.iter().enumerate() {
            let factor = if denom <= 0.0 {
                0
            } else {
                ((r - min_sim) / denom * 100.0).floor() as i64
            };
            fingerprints[i].0.push(factor);
        }

        benchmark = (0..n).min_by_key(|&i| fingerprints[i].total()).unwrap();
    }

    fingerprints
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn genome_similarity_is_one_for_identical_genomes() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let g = Genome::gen_random(8, &mut rng);
        assert_eq!(genome_similarity(&g, &g, 4), 1.0);
    }

    #[test]
    fn gene_similarity_maxes_out_for_identical_genes() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let g = Gene::gen_random(&mut rng);
        assert!((gene_similarity(&g, &g, 4) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn calc_generation_similarity_produces_one_fingerprint_per_genome() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let genomes: Vec<Genome> = (0..6).map(|_| Genome::gen_random(5, &mut rng)).collect();
        let fps = calc_generation_similarity(&genomes, 4, 3, &mut rng);
        assert_eq!(fps.len(), 6);
        for fp in &fps {
            assert_eq!(fp.factors().len(), 3);
        }
    }

    #[test]
    fn empty_population_yields_no_fingerprints() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let fps = calc_generation_similarity(&[], 4, 3, &mut rng);
        assert!(fps.is_empty());
    }
}
