use rand::Rng;
use strum::IntoEnumIterator;

use crate::error::{EvoError, EvoResult};
use crate::node::{ActionKind, NodeKind, SenseKind};

/// A single 24-bit instruction word: one edge in the brain graph.
///
/// Bit layout (MSB-first, bit 0 = most significant of the 24-bit word):
///
/// | bits  | field              |
/// |-------|--------------------|
/// | 0     | input kind (0=sense, 1=inner) |
/// | 1-6   | input id (raw, 6 bits) |
/// | 7     | unused |
/// | 8     | output kind (0=inner, 1=action) |
/// | 9-14  | output id (raw, 6 bits) |
/// | 15    | unused |
/// | 16-23 | weight (raw, 8 bits) |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gene(u32);

impl Gene {
    pub const BITS: u32 = 24;
    const MASK: u32 = (1 << Self::BITS) - 1;

    pub fn from_raw(word: u32) -> Self {
        Gene(word & Self::MASK)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    fn field(&self, start: u32, len: u32) -> u32 {
        let shift = Self::BITS - start - len;
        (self.0 >> shift) & ((1 << len) - 1)
    }

    fn set_bit(&mut self, start: u32, value: bool) {
        let shift = Self::BITS - start - 1;
        if value {
            self.0 |= 1 << shift;
        } else {
            self.0 &= !(1 << shift);
        }
    }

    pub fn input_is_inner(&self) -> bool {
        self.field(0, 1) != 0
    }

    pub fn raw_input_id(&self) -> u32 {
        self.field(1, 6)
    }

    pub fn output_is_action(&self) -> bool {
        self.field(8, 1) != 0
    }

    pub fn raw_output_id(&self) -> u32 {
        self.field(9, 6)
    }

    pub fn raw_weight(&self) -> u32 {
        self.field(16, 8)
    }

    /// Decoded weight in `[-4, 4)`.
    pub fn weight(&self) -> f32 {
        self.raw_weight() as f32 / 32.0 - 4.0
    }

    /// Resolves the input side against the live catalog sizes.
    pub fn input_node_kind(&self, num_inner: u32) -> NodeKind {
        if self.input_is_inner() && num_inner > 0 {
            NodeKind::Inner(self.raw_input_id() % num_inner)
        } else {
            let senses: Vec<SenseKind> = SenseKind::iter().collect();
            NodeKind::Sense(senses[self.raw_input_id() as usize % senses.len()])
        }
    }

    /// Resolves the output side against the live catalog sizes.
    pub fn output_node_kind(&self, num_inner: u32) -> NodeKind {
        if self.output_is_action() || num_inner == 0 {
            let actions: Vec<ActionKind> = ActionKind::iter().collect();
            NodeKind::Action(actions[self.raw_output_id() as usize % actions.len()])
        } else {
            NodeKind::Inner(self.raw_output_id() % num_inner)
        }
    }

    pub fn gen_random(rng: &mut impl Rng) -> Self {
        Gene::from_raw(rng.gen_range(0..=Self::MASK))
    }

    /// Two-point splice: pick a random base parent, copy a random
    /// contiguous bit-range from the other parent into it.
    fn gen_from_parents(parent_a: &Gene, parent_b: &Gene, rng: &mut impl Rng) -> Self {
        let (base, donor) = if rng.gen_bool(0.5) {
            (parent_a, parent_b)
        } else {
            (parent_b, parent_a)
        };

        let mut i = rng.gen_range(0..=Self::BITS);
        let mut j = rng.gen_range(0..=Self::BITS);
        if i > j {
            std::mem::swap(&mut i, &mut j);
        }

        let mut child = *base;
        for bit in i..j {
            let shift = Self::BITS - bit - 1;
            let donor_bit = (donor.0 >> shift) & 1 != 0;
            child.set_bit(bit, donor_bit);
        }
        child
    }

    fn mutate(&mut self, rng: &mut impl Rng) {
        let bit_pos = rng.gen_range(0..Self::BITS);
        let current = self.field(bit_pos, 1) != 0;
        self.set_bit(bit_pos, !current);
    }
}

/// An ordered sequence of genes. Order matters only insofar as it is
/// preserved through mating — genes are otherwise independent edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome(Vec<Gene>);

impl Genome {
    pub fn genes(&self) -> &[Gene] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn gen_random(num_genes: usize, rng: &mut impl Rng) -> Self {
        Genome((0..num_genes).map(|_| Gene::gen_random(rng)).collect())
    }

    pub fn gen_from_parents(
        a: &Genome,
        b: &Genome,
        mutate_chance: f64,
        rng: &mut impl Rng,
    ) -> EvoResult<Self> {
        if a.len() != b.len() {
            return Err(EvoError::GenomeLengthMismatch { a: a.len(), b: b.len() });
        }

        let genes = a
            .0
            .iter()
            .zip(b.0.iter())
            .map(|(ga, gb)| {
                let mut child = Gene::gen_from_parents(ga, gb, rng);
                if rng.gen_bool(mutate_chance) {
                    child.mutate(rng);
                }
                child
            })
            .collect();

        Ok(Genome(genes))
    }

    #[cfg(test)]
    pub(crate) fn from_genes_for_test(genes: Vec<Gene>) -> Self {
        Genome(genes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn field_extraction_covers_all_24_bits_disjointly() {
        // all-ones word: every field must read back as its max value.
        let g = Gene::from_raw(Gene::MASK);
        assert!(g.input_is_inner());
        assert_eq!(g.raw_input_id(), 0b111111);
        assert!(g.output_is_action());
        assert_eq!(g.raw_output_id(), 0b111111);
        assert_eq!(g.raw_weight(), 0xFF);
    }

    #[test]
    fn weight_decodes_into_expected_range() {
        let min = Gene::from_raw(0);
        assert_eq!(min.weight(), -4.0);

        // weight occupies the low 8 bits of the 24-bit word (bits 16-23 MSB-first)
        let max = Gene::from_raw(0xFF);
        assert_eq!(max.raw_weight(), 0xFF);
        assert!((max.weight() - 3.96875).abs() < 1e-6);
    }

    #[test]
    fn mutate_flips_exactly_one_bit() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let original = Gene::gen_random(&mut rng);
        let mut mutated = original;
        mutated.mutate(&mut rng);
        let diff = original.raw() ^ mutated.raw();
        assert_eq!(diff.count_ones(), 1);
    }

    #[test]
    fn gen_from_parents_rejects_length_mismatch() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let a = Genome::gen_random(5, &mut rng);
        let b = Genome::gen_random(6, &mut rng);
        let result = Genome::gen_from_parents(&a, &b, 0.05, &mut rng);
        assert!(matches!(result, Err(EvoError::GenomeLengthMismatch { a: 5, b: 6 })));
    }

    #[test]
    fn gen_from_parents_preserves_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let a = Genome::gen_random(10, &mut rng);
        let b = Genome::gen_random(10, &mut rng);
        let child = Genome::gen_from_parents(&a, &b, 0.05, &mut rng).unwrap();
        assert_eq!(child.len(), 10);
    }

    #[test]
    fn input_node_kind_resolves_against_catalog_size() {
        let g = Gene::from_raw(0); // input kind = sense, raw id 0
        assert_eq!(g.input_node_kind(4), NodeKind::Sense(SenseKind::XLoc));
    }
}
