//! Generators for containers: sequences, sets, mappings, and fixed tuples.

use guesswork_core::{
    ConfigurationError, Value, DEFAULT_CONTAINER_MAX_LEN, DEFAULT_CONTAINER_MIN_LEN,
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::traits::{BoxedGenerator, Generator};

fn check_len_bounds(min_len: usize, max_len: usize) -> Result<(), ConfigurationError> {
    if min_len > max_len {
        return Err(ConfigurationError::LengthBounds {
            min: min_len,
            max: max_len,
        });
    }
    Ok(())
}

/// Generator for ordered sequences: uniform length in `[min, max]`, elements
/// generated independently from the element generator.
pub struct SequenceGenerator {
    element: BoxedGenerator,
    min_len: usize,
    max_len: usize,
}

impl SequenceGenerator {
    /// Creates a generator with the default length bounds.
    pub fn new(element: BoxedGenerator) -> Self {
        Self {
            element,
            min_len: DEFAULT_CONTAINER_MIN_LEN,
            max_len: DEFAULT_CONTAINER_MAX_LEN,
        }
    }

    /// Creates a generator with explicit inclusive length bounds.
    pub fn bounded(
        element: BoxedGenerator,
        min_len: usize,
        max_len: usize,
    ) -> Result<Self, ConfigurationError> {
        check_len_bounds(min_len, max_len)?;
        Ok(Self {
            element,
            min_len,
            max_len,
        })
    }
}

impl Generator for SequenceGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, budget: u32) -> Value {
        let length = rng.gen_range(self.min_len..=self.max_len);
        let child_budget = budget.saturating_sub(1);
        Value::List(
            (0..length)
                .map(|_| self.element.generate(rng, child_budget))
                .collect(),
        )
    }

    fn describe(&self) -> String {
        format!("list[{}]", self.element.describe())
    }
}

/// Generator for sets: like a sequence, but the result is deduplicated, so
/// the final size may be below the sampled length.
pub struct SetGenerator {
    element: BoxedGenerator,
    min_len: usize,
    max_len: usize,
}

impl SetGenerator {
    /// Creates a generator with the default length bounds.
    pub fn new(element: BoxedGenerator) -> Self {
        Self {
            element,
            min_len: DEFAULT_CONTAINER_MIN_LEN,
            max_len: DEFAULT_CONTAINER_MAX_LEN,
        }
    }

    /// Creates a generator with explicit inclusive length bounds.
    pub fn bounded(
        element: BoxedGenerator,
        min_len: usize,
        max_len: usize,
    ) -> Result<Self, ConfigurationError> {
        check_len_bounds(min_len, max_len)?;
        Ok(Self {
            element,
            min_len,
            max_len,
        })
    }
}

impl Generator for SetGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, budget: u32) -> Value {
        let length = rng.gen_range(self.min_len..=self.max_len);
        let child_budget = budget.saturating_sub(1);
        Value::set(
            (0..length)
                .map(|_| self.element.generate(rng, child_budget))
                .collect(),
        )
    }

    fn describe(&self) -> String {
        format!("set[{}]", self.element.describe())
    }
}

/// Generator for mappings: a key and a value generated independently per
/// entry; later duplicate keys overwrite earlier ones, which is expected.
pub struct MappingGenerator {
    key: BoxedGenerator,
    value: BoxedGenerator,
    min_len: usize,
    max_len: usize,
}

impl MappingGenerator {
    /// Creates a generator with the default length bounds.
    pub fn new(key: BoxedGenerator, value: BoxedGenerator) -> Self {
        Self {
            key,
            value,
            min_len: DEFAULT_CONTAINER_MIN_LEN,
            max_len: DEFAULT_CONTAINER_MAX_LEN,
        }
    }

    /// Creates a generator with explicit inclusive length bounds.
    pub fn bounded(
        key: BoxedGenerator,
        value: BoxedGenerator,
        min_len: usize,
        max_len: usize,
    ) -> Result<Self, ConfigurationError> {
        check_len_bounds(min_len, max_len)?;
        Ok(Self {
            key,
            value,
            min_len,
            max_len,
        })
    }
}

impl Generator for MappingGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, budget: u32) -> Value {
        let length = rng.gen_range(self.min_len..=self.max_len);
        let child_budget = budget.saturating_sub(1);
        Value::map(
            (0..length)
                .map(|_| {
                    (
                        self.key.generate(rng, child_budget),
                        self.value.generate(rng, child_budget),
                    )
                })
                .collect(),
        )
    }

    fn describe(&self) -> String {
        format!("dict[{}, {}]", self.key.describe(), self.value.describe())
    }
}

/// Generator for fixed-arity tuples: one value per positional sub-generator,
/// in order.
pub struct TupleGenerator {
    elements: Vec<BoxedGenerator>,
}

impl TupleGenerator {
    /// Creates a generator from positional element generators.
    pub fn new(elements: Vec<BoxedGenerator>) -> Self {
        Self { elements }
    }
}

impl Generator for TupleGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, budget: u32) -> Value {
        let child_budget = budget.saturating_sub(1);
        Value::Tuple(
            self.elements
                .iter()
                .map(|element| element.generate(rng, child_budget))
                .collect(),
        )
    }

    fn describe(&self) -> String {
        if self.elements.is_empty() {
            return "tuple[()]".to_string();
        }
        let rendered: Vec<String> = self.elements.iter().map(|e| e.describe()).collect();
        format!("tuple[{}]", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{BoolGenerator, IntGenerator};
    use crate::text::StringGenerator;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(99)
    }

    #[test]
    fn test_sequence_length_always_within_bounds() {
        let generator =
            SequenceGenerator::bounded(Box::new(IntGenerator::new()), 3, 9).unwrap();
        let mut rng = rng();
        for _ in 0..500 {
            let value = generator.generate(&mut rng, 5);
            assert!((3..=9).contains(&value.len().unwrap()));
        }
    }

    #[test]
    fn test_set_may_shrink_below_sampled_length() {
        // Two possible elements, length bounds force collisions.
        let generator = SetGenerator::bounded(Box::new(BoolGenerator::new()), 4, 4).unwrap();
        let mut rng = rng();
        for _ in 0..50 {
            let value = generator.generate(&mut rng, 5);
            assert!(value.len().unwrap() <= 2);
        }
    }

    #[test]
    fn test_mapping_size_bounded_by_sampled_length() {
        let generator = MappingGenerator::bounded(
            Box::new(BoolGenerator::new()),
            Box::new(IntGenerator::new()),
            0,
            6,
        )
        .unwrap();
        let mut rng = rng();
        for _ in 0..200 {
            let value = generator.generate(&mut rng, 5);
            // Only two possible keys, so overwriting caps the size at 2.
            assert!(value.len().unwrap() <= 2);
        }
    }

    #[test]
    fn test_tuple_arity_is_exact() {
        let generator = TupleGenerator::new(vec![
            Box::new(IntGenerator::new()),
            Box::new(StringGenerator::new()),
            Box::new(BoolGenerator::new()),
        ]);
        let mut rng = rng();
        let value = generator.generate(&mut rng, 5);
        match value {
            Value::Tuple(elements) => {
                assert_eq!(elements.len(), 3);
                assert!(matches!(elements[0], Value::Int(_)));
                assert!(matches!(elements[1], Value::Str(_)));
                assert!(matches!(elements[2], Value::Bool(_)));
            }
            other => panic!("expected tuple, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_inverted_length_bounds() {
        assert!(SequenceGenerator::bounded(Box::new(IntGenerator::new()), 4, 2).is_err());
        assert!(SetGenerator::bounded(Box::new(IntGenerator::new()), 8, 1).is_err());
        assert!(MappingGenerator::bounded(
            Box::new(IntGenerator::new()),
            Box::new(IntGenerator::new()),
            3,
            0,
        )
        .is_err());
    }

    #[test]
    fn test_describe_composes() {
        let generator = MappingGenerator::new(
            Box::new(StringGenerator::new()),
            Box::new(SequenceGenerator::new(Box::new(IntGenerator::new()))),
        );
        assert_eq!(generator.describe(), "dict[str, list[int]]");
    }
}
