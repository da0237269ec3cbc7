//! Generators that combine or select among other generators.

use std::collections::BTreeSet;

use guesswork_core::{ConfigurationError, Value};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::traits::{BoxedGenerator, Generator};

/// Default chance an optional generator produces the none value.
pub const DEFAULT_NULL_CHANCE: f64 = 0.5;

/// Generator for optional values: none with probability `null_chance`,
/// otherwise delegates to the wrapped generator.
pub struct OptionalGenerator {
    inner: BoxedGenerator,
    null_chance: f64,
}

impl OptionalGenerator {
    /// Creates a generator with the default null chance.
    pub fn new(inner: BoxedGenerator) -> Self {
        Self {
            inner,
            null_chance: DEFAULT_NULL_CHANCE,
        }
    }

    /// Sets the chance of producing none.
    pub fn with_null_chance(mut self, chance: f64) -> Result<Self, ConfigurationError> {
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigurationError::Chance(chance));
        }
        self.null_chance = chance;
        Ok(self)
    }
}

impl Generator for OptionalGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, budget: u32) -> Value {
        if rng.gen_bool(self.null_chance) {
            Value::None
        } else {
            self.inner.generate(rng, budget.saturating_sub(1))
        }
    }

    fn describe(&self) -> String {
        format!("Optional[{}]", self.inner.describe())
    }
}

/// Generator for unions: picks one alternative, uniformly by default or by
/// configured weights, and delegates to it.
pub struct UnionGenerator {
    alternatives: Vec<BoxedGenerator>,
    weights: Option<Vec<f64>>,
}

impl UnionGenerator {
    /// Creates a uniform union over the alternatives.
    pub fn new(alternatives: Vec<BoxedGenerator>) -> Result<Self, ConfigurationError> {
        if alternatives.is_empty() {
            return Err(ConfigurationError::EmptyUnion);
        }
        Ok(Self {
            alternatives,
            weights: None,
        })
    }

    /// Sets per-alternative selection weights.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Result<Self, ConfigurationError> {
        if weights.len() != self.alternatives.len() {
            return Err(ConfigurationError::weights(format!(
                "{} weights for {} alternatives",
                weights.len(),
                self.alternatives.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigurationError::weights(
                "weights must be finite and non-negative",
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigurationError::weights("weights must not all be zero"));
        }
        self.weights = Some(weights);
        Ok(self)
    }

    fn select(&self, rng: &mut ChaCha8Rng) -> usize {
        match &self.weights {
            None => rng.gen_range(0..self.alternatives.len()),
            Some(weights) => {
                let total: f64 = weights.iter().sum();
                let mut roll = rng.gen::<f64>() * total;
                for (i, weight) in weights.iter().enumerate() {
                    roll -= weight;
                    if roll <= 0.0 {
                        return i;
                    }
                }
                weights.len() - 1
            }
        }
    }
}

impl Generator for UnionGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, budget: u32) -> Value {
        let index = self.select(rng);
        self.alternatives[index].generate(rng, budget.saturating_sub(1))
    }

    fn describe(&self) -> String {
        let rendered: BTreeSet<String> =
            self.alternatives.iter().map(|a| a.describe()).collect();
        format!(
            "Union[{}]",
            rendered.into_iter().collect::<Vec<_>>().join(", ")
        )
    }
}

/// Generator that picks uniformly from a fixed set of literal values.
///
/// Has no descriptor counterpart; it exists for explicit parameter
/// overrides, where a caller knows the exact values worth trying.
pub struct ChoiceGenerator {
    choices: Vec<Value>,
}

impl ChoiceGenerator {
    /// Creates a generator over the given values.
    pub fn new(choices: Vec<Value>) -> Result<Self, ConfigurationError> {
        if choices.is_empty() {
            return Err(ConfigurationError::EmptyChoices);
        }
        Ok(Self { choices })
    }
}

impl Generator for ChoiceGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, _budget: u32) -> Value {
        self.choices
            .choose(rng)
            .expect("choice set is non-empty")
            .clone()
    }

    fn describe(&self) -> String {
        let rendered: BTreeSet<String> =
            self.choices.iter().map(|c| c.to_string()).collect();
        format!(
            "Literal[{}]",
            rendered.into_iter().collect::<Vec<_>>().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{IntGenerator, NoneGenerator};
    use crate::text::StringGenerator;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(1234)
    }

    #[test]
    fn test_optional_null_chance_extremes() {
        let mut rng = rng();
        let always = OptionalGenerator::new(Box::new(IntGenerator::new()))
            .with_null_chance(1.0)
            .unwrap();
        let never = OptionalGenerator::new(Box::new(IntGenerator::new()))
            .with_null_chance(0.0)
            .unwrap();
        for _ in 0..100 {
            assert_eq!(always.generate(&mut rng, 5), Value::None);
            assert!(matches!(never.generate(&mut rng, 5), Value::Int(_)));
        }
    }

    #[test]
    fn test_optional_rejects_bad_chance() {
        assert!(OptionalGenerator::new(Box::new(NoneGenerator::new()))
            .with_null_chance(1.5)
            .is_err());
    }

    #[test]
    fn test_union_two_alternatives_roughly_uniform() {
        let union = UnionGenerator::new(vec![
            Box::new(IntGenerator::new()),
            Box::new(StringGenerator::new()),
        ])
        .unwrap();
        let mut rng = rng();
        let mut ints = 0u32;
        for _ in 0..10_000 {
            if matches!(union.generate(&mut rng, 5), Value::Int(_)) {
                ints += 1;
            }
        }
        assert!((4500..=5500).contains(&ints), "ints = {}", ints);
    }

    #[test]
    fn test_union_weights_bias_selection() {
        let union = UnionGenerator::new(vec![
            Box::new(IntGenerator::new()),
            Box::new(StringGenerator::new()),
        ])
        .unwrap()
        .with_weights(vec![9.0, 1.0])
        .unwrap();
        let mut rng = rng();
        let mut ints = 0u32;
        for _ in 0..10_000 {
            if matches!(union.generate(&mut rng, 5), Value::Int(_)) {
                ints += 1;
            }
        }
        assert!(ints > 8500, "ints = {}", ints);
    }

    #[test]
    fn test_union_configuration_errors() {
        assert!(UnionGenerator::new(vec![]).is_err());
        let union = UnionGenerator::new(vec![Box::new(IntGenerator::new())]).unwrap();
        assert!(union.with_weights(vec![1.0, 2.0]).is_err());
        let union = UnionGenerator::new(vec![Box::new(IntGenerator::new())]).unwrap();
        assert!(union.with_weights(vec![0.0]).is_err());
    }

    #[test]
    fn test_union_describe_is_sorted() {
        let union = UnionGenerator::new(vec![
            Box::new(StringGenerator::new()),
            Box::new(IntGenerator::new()),
        ])
        .unwrap();
        assert_eq!(union.describe(), "Union[int, str]");
    }

    #[test]
    fn test_choice_generator_picks_only_configured_values() {
        let choices = vec![Value::Int(0), Value::Bool(true), Value::Str("wow".into())];
        let generator = ChoiceGenerator::new(choices.clone()).unwrap();
        let mut rng = rng();
        for _ in 0..100 {
            assert!(choices.contains(&generator.generate(&mut rng, 5)));
        }
        assert!(ChoiceGenerator::new(vec![]).is_err());
    }
}
