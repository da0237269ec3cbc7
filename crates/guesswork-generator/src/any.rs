//! The wildcard generator: samples a fresh concrete type, then a value of it.

use guesswork_core::{PrimitiveKind, TypeDescriptor, Value, DEFAULT_ANY_DEPTH};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::factory::build_generator;
use crate::traits::Generator;

/// Arity window for wildcard-sampled tuples.
const TUPLE_ARITY: std::ops::RangeInclusive<usize> = 1..=10;
/// Alternative-count window for wildcard-sampled unions.
const UNION_ARITY: std::ops::RangeInclusive<usize> = 2..=10;

/// Generator for arbitrary values.
///
/// Each call first samples a fresh concrete [`TypeDescriptor`], recursively
/// and uniformly choosing among all supported variant kinds with a depth
/// budget that strictly decreases at every step; once the budget reaches
/// zero only primitives may be chosen, so sampling always terminates while
/// still producing arbitrarily varied shapes across calls. The sampled
/// descriptor then drives a one-off generator for the actual value.
///
/// Descriptor sampling and value generation are separable:
/// [`AnyGenerator::sample_descriptor`] exposes a sampled type (for display
/// via `describe`) without generating any value.
pub struct AnyGenerator {
    max_depth: u32,
}

impl AnyGenerator {
    /// Creates a wildcard generator with the default depth.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_ANY_DEPTH,
        }
    }

    /// Creates a wildcard generator with an explicit depth bound.
    pub fn with_depth(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// The depth bound for sampled descriptors.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Sample a concrete descriptor bounded by this generator's depth.
    pub fn sample_descriptor(&self, rng: &mut ChaCha8Rng) -> TypeDescriptor {
        Self::sample_with_depth(rng, self.max_depth)
    }

    /// Sample a concrete descriptor with nesting depth at most `depth`.
    ///
    /// The result never contains a wildcard, so a generator built from it
    /// needs no further budget.
    pub fn sample_with_depth(rng: &mut ChaCha8Rng, depth: u32) -> TypeDescriptor {
        if depth == 0 {
            return TypeDescriptor::Primitive(sample_primitive(rng));
        }

        // 8 primitive kinds, 3 container kinds, tuple, optional, union.
        match rng.gen_range(0..14) {
            0..=7 => TypeDescriptor::Primitive(sample_primitive(rng)),
            8 => TypeDescriptor::sequence(Self::sample_with_depth(rng, depth - 1)),
            9 => TypeDescriptor::set(Self::sample_with_depth(rng, depth - 1)),
            10 => TypeDescriptor::mapping(
                Self::sample_with_depth(rng, depth - 1),
                Self::sample_with_depth(rng, depth - 1),
            ),
            11 => {
                let arity = rng.gen_range(TUPLE_ARITY);
                TypeDescriptor::tuple(
                    (0..arity)
                        .map(|_| Self::sample_with_depth(rng, depth - 1))
                        .collect(),
                )
            }
            12 => TypeDescriptor::optional(Self::sample_with_depth(rng, depth - 1)),
            _ => {
                let count = rng.gen_range(UNION_ARITY);
                TypeDescriptor::union(
                    (0..count)
                        .map(|_| Self::sample_with_depth(rng, depth - 1))
                        .collect(),
                )
            }
        }
    }
}

impl Default for AnyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_primitive(rng: &mut ChaCha8Rng) -> PrimitiveKind {
    *PrimitiveKind::ALL
        .choose(rng)
        .expect("primitive kind list is non-empty")
}

impl Generator for AnyGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, budget: u32) -> Value {
        let depth = self.max_depth.min(budget);
        let descriptor = Self::sample_with_depth(rng, depth);
        let generator =
            build_generator(&descriptor).expect("wildcard-sampled descriptor is well-formed");
        generator.generate(rng, depth)
    }

    fn describe(&self) -> String {
        "Any".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(2024)
    }

    #[test]
    fn test_sampled_descriptor_never_exceeds_depth() {
        let mut rng = rng();
        for depth in 0..=5 {
            for _ in 0..200 {
                let descriptor = AnyGenerator::sample_with_depth(&mut rng, depth);
                assert!(
                    descriptor.depth() <= depth,
                    "descriptor {} has depth {} > {}",
                    descriptor.describe(),
                    descriptor.depth(),
                    depth
                );
            }
        }
    }

    #[test]
    fn test_depth_zero_is_always_primitive() {
        let mut rng = rng();
        for _ in 0..100 {
            let descriptor = AnyGenerator::sample_with_depth(&mut rng, 0);
            assert!(matches!(descriptor, TypeDescriptor::Primitive(_)));
        }
    }

    #[test]
    fn test_sampled_descriptor_is_well_formed() {
        let mut rng = rng();
        for _ in 0..300 {
            let descriptor = AnyGenerator::sample_with_depth(&mut rng, 4);
            descriptor.validate().expect("sampled descriptor validates");
        }
    }

    #[test]
    fn test_generation_terminates_and_varies() {
        let generator = AnyGenerator::new();
        let mut rng = rng();
        let mut kinds = std::collections::BTreeSet::new();
        for _ in 0..500 {
            let value = generator.generate(&mut rng, DEFAULT_ANY_DEPTH);
            kinds.insert(value.kind_name());
        }
        // A wildcard that always lands on the same shape is no wildcard.
        assert!(kinds.len() >= 5, "only saw kinds {:?}", kinds);
    }

    #[test]
    fn test_sampling_is_separable_from_generation() {
        let generator = AnyGenerator::with_depth(3);
        let mut rng = rng();
        let descriptor = generator.sample_descriptor(&mut rng);
        // The sampled type is displayable on its own.
        assert!(!descriptor.describe().is_empty());
        assert!(descriptor.depth() <= 3);
    }
}
