//! Generators for scalar values: booleans, numbers, ranges, and none.

use guesswork_core::{ConfigurationError, Value};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::traits::Generator;

/// Default numeric interval, `[-2^16, 2^16)`.
pub const DEFAULT_NUMERIC_START: i64 = -(1 << 16);
pub const DEFAULT_NUMERIC_STOP: i64 = 1 << 16;

/// Generator for boolean values.
#[derive(Debug, Clone, Default)]
pub struct BoolGenerator;

impl BoolGenerator {
    /// Creates a new boolean generator.
    pub fn new() -> Self {
        Self
    }
}

impl Generator for BoolGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, _budget: u32) -> Value {
        Value::Bool(rng.gen_bool(0.5))
    }

    fn describe(&self) -> String {
        "bool".to_string()
    }
}

/// Generator for integers, uniform over `start..stop` honoring a step.
#[derive(Debug, Clone)]
pub struct IntGenerator {
    start: i64,
    stop: i64,
    step: i64,
}

impl IntGenerator {
    /// Creates a generator over the default interval with step 1.
    pub fn new() -> Self {
        Self {
            start: DEFAULT_NUMERIC_START,
            stop: DEFAULT_NUMERIC_STOP,
            step: 1,
        }
    }

    /// Creates a generator over `[start, stop)` with step 1.
    pub fn bounded(start: i64, stop: i64) -> Result<Self, ConfigurationError> {
        if start >= stop {
            return Err(ConfigurationError::numeric_bounds(format!(
                "start {} is not below stop {}",
                start, stop
            )));
        }
        Ok(Self { start, stop, step: 1 })
    }

    /// Sets the distance between adjacent candidate values.
    pub fn with_step(mut self, step: i64) -> Result<Self, ConfigurationError> {
        if step < 1 {
            return Err(ConfigurationError::numeric_bounds(format!(
                "step {} must be positive",
                step
            )));
        }
        self.step = step;
        Ok(self)
    }
}

impl Default for IntGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for IntGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, _budget: u32) -> Value {
        let candidates = (self.stop - self.start + self.step - 1) / self.step;
        Value::Int(self.start + self.step * rng.gen_range(0..candidates))
    }

    fn describe(&self) -> String {
        "int".to_string()
    }
}

/// Special float values produced with a small configurable chance.
const FLOAT_SPECIAL_CASES: [f64; 3] = [f64::INFINITY, f64::NEG_INFINITY, f64::NAN];

/// Default chance of producing one of the float special cases.
pub const DEFAULT_SPECIAL_CASES_CHANCE: f64 = 1.0 / 256.0;

/// Generator for floats, continuous over `[start, stop)` unless a step is
/// supplied, with a small chance of inf/-inf/NaN.
#[derive(Debug, Clone)]
pub struct FloatGenerator {
    start: f64,
    stop: f64,
    step: Option<f64>,
    special_cases_chance: f64,
}

impl FloatGenerator {
    /// Creates a generator over the default interval.
    pub fn new() -> Self {
        Self {
            start: DEFAULT_NUMERIC_START as f64,
            stop: DEFAULT_NUMERIC_STOP as f64,
            step: None,
            special_cases_chance: DEFAULT_SPECIAL_CASES_CHANCE,
        }
    }

    /// Creates a generator over `[start, stop)`.
    pub fn bounded(start: f64, stop: f64) -> Result<Self, ConfigurationError> {
        if !(start < stop) {
            return Err(ConfigurationError::numeric_bounds(format!(
                "start {} is not below stop {}",
                start, stop
            )));
        }
        Ok(Self {
            start,
            stop,
            step: None,
            special_cases_chance: DEFAULT_SPECIAL_CASES_CHANCE,
        })
    }

    /// Quantizes generation to multiples of `step`.
    pub fn with_step(mut self, step: f64) -> Result<Self, ConfigurationError> {
        if !(step > 0.0) {
            return Err(ConfigurationError::numeric_bounds(format!(
                "step {} must be positive",
                step
            )));
        }
        if (self.start / step).trunc() >= (self.stop / step).trunc() {
            return Err(ConfigurationError::numeric_bounds(format!(
                "step {} leaves no candidates in [{}, {})",
                step, self.start, self.stop
            )));
        }
        self.step = Some(step);
        Ok(self)
    }

    /// Sets the chance of producing inf/-inf/NaN.
    pub fn with_special_cases_chance(mut self, chance: f64) -> Result<Self, ConfigurationError> {
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigurationError::Chance(chance));
        }
        self.special_cases_chance = chance;
        Ok(self)
    }
}

impl Default for FloatGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for FloatGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, _budget: u32) -> Value {
        if rng.gen::<f64>() < self.special_cases_chance {
            return Value::Float(*FLOAT_SPECIAL_CASES.choose(rng).unwrap_or(&f64::NAN));
        }
        match self.step {
            None => Value::Float(rng.gen_range(self.start..self.stop)),
            Some(step) => {
                let lo = (self.start / step).trunc() as i64;
                let hi = (self.stop / step).trunc() as i64;
                Value::Float(rng.gen_range(lo..hi) as f64 * step)
            }
        }
    }

    fn describe(&self) -> String {
        "float".to_string()
    }
}

/// Generator for complex numbers, an independent float per part.
#[derive(Debug, Clone, Default)]
pub struct ComplexGenerator {
    real: FloatGenerator,
    imaginary: FloatGenerator,
}

impl ComplexGenerator {
    /// Creates a generator with default bounds for both parts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator with explicit part generators.
    pub fn with_parts(real: FloatGenerator, imaginary: FloatGenerator) -> Self {
        Self { real, imaginary }
    }
}

impl Generator for ComplexGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, budget: u32) -> Value {
        let re = match self.real.generate(rng, budget) {
            Value::Float(v) => v,
            _ => unreachable!("float generator produced a non-float"),
        };
        let im = match self.imaginary.generate(rng, budget) {
            Value::Float(v) => v,
            _ => unreachable!("float generator produced a non-float"),
        };
        Value::Complex { re, im }
    }

    fn describe(&self) -> String {
        "complex".to_string()
    }
}

/// Generator for arithmetic ranges with a non-zero step.
#[derive(Debug, Clone)]
pub struct RangeGenerator {
    minimum: i64,
    maximum: i64,
    min_step: i64,
    max_step: i64,
}

impl RangeGenerator {
    /// Creates a generator with the default endpoint and step windows.
    pub fn new() -> Self {
        Self {
            minimum: -(1 << 8),
            maximum: 1 << 8,
            min_step: -(1 << 4),
            max_step: 1 << 4,
        }
    }

    /// Sets the inclusive endpoint window.
    pub fn with_endpoints(mut self, minimum: i64, maximum: i64) -> Result<Self, ConfigurationError> {
        if minimum >= maximum {
            return Err(ConfigurationError::numeric_bounds(format!(
                "range minimum {} is not below maximum {}",
                minimum, maximum
            )));
        }
        self.minimum = minimum;
        self.maximum = maximum;
        Ok(self)
    }

    /// Sets the inclusive step window.
    ///
    /// The window must straddle zero so a valid step always exists whatever
    /// the sampled endpoints are.
    pub fn with_steps(mut self, min_step: i64, max_step: i64) -> Result<Self, ConfigurationError> {
        if min_step > 0 || max_step < 1 {
            return Err(ConfigurationError::numeric_bounds(format!(
                "step window [{}, {}] must straddle zero",
                min_step, max_step
            )));
        }
        self.min_step = min_step;
        self.max_step = max_step;
        Ok(self)
    }
}

impl Default for RangeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RangeGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, _budget: u32) -> Value {
        let start = rng.gen_range(self.minimum..self.maximum);
        let stop = rng.gen_range(start + 1..=self.maximum);
        let span = stop - start;
        let lower = self.min_step.max(-span);
        let upper = self.max_step.min(span);
        let mut step = rng.gen_range(lower..upper);
        if step >= 0 {
            step += 1;
        }
        let (start, stop) = if step < 0 { (stop, start) } else { (start, stop) };
        Value::Range { start, stop, step }
    }

    fn describe(&self) -> String {
        "range".to_string()
    }
}

/// Generator for the none value.
#[derive(Debug, Clone, Default)]
pub struct NoneGenerator;

impl NoneGenerator {
    /// Creates a new none generator.
    pub fn new() -> Self {
        Self
    }
}

impl Generator for NoneGenerator {
    fn generate(&self, _rng: &mut ChaCha8Rng, _budget: u32) -> Value {
        Value::None
    }

    fn describe(&self) -> String {
        "None".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_int_respects_bounds_and_step() {
        let generator = IntGenerator::bounded(0, 100).unwrap().with_step(7).unwrap();
        let mut rng = rng();
        for _ in 0..1000 {
            match generator.generate(&mut rng, 0) {
                Value::Int(v) => {
                    assert!((0..100).contains(&v));
                    assert_eq!(v % 7, 0);
                }
                other => panic!("expected int, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_int_rejects_inverted_bounds() {
        assert!(IntGenerator::bounded(5, 5).is_err());
        assert!(IntGenerator::bounded(5, 4).is_err());
        assert!(IntGenerator::bounded(0, 10).unwrap().with_step(0).is_err());
    }

    #[test]
    fn test_float_without_specials_stays_in_bounds() {
        let generator = FloatGenerator::bounded(-4.0, 4.0)
            .unwrap()
            .with_special_cases_chance(0.0)
            .unwrap();
        let mut rng = rng();
        for _ in 0..1000 {
            match generator.generate(&mut rng, 0) {
                Value::Float(v) => assert!((-4.0..4.0).contains(&v)),
                other => panic!("expected float, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_float_step_quantizes() {
        let generator = FloatGenerator::bounded(0.0, 10.0)
            .unwrap()
            .with_step(0.5)
            .unwrap()
            .with_special_cases_chance(0.0)
            .unwrap();
        let mut rng = rng();
        for _ in 0..200 {
            match generator.generate(&mut rng, 0) {
                Value::Float(v) => assert_eq!(v % 0.5, 0.0),
                other => panic!("expected float, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_float_rejects_empty_step_interval() {
        assert!(FloatGenerator::bounded(0.1, 0.4).unwrap().with_step(0.5).is_err());
    }

    #[test]
    fn test_range_is_well_formed() {
        let generator = RangeGenerator::new();
        let mut rng = rng();
        for _ in 0..1000 {
            match generator.generate(&mut rng, 0) {
                Value::Range { start, stop, step } => {
                    assert_ne!(step, 0);
                    if step > 0 {
                        assert!(start < stop);
                    } else {
                        assert!(start > stop);
                    }
                }
                other => panic!("expected range, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_range_rejects_one_sided_step_window() {
        assert!(RangeGenerator::new().with_steps(2, 8).is_err());
        assert!(RangeGenerator::new().with_steps(-8, 0).is_err());
    }

    #[test]
    fn test_none_generator() {
        let mut rng = rng();
        assert_eq!(NoneGenerator::new().generate(&mut rng, 0), Value::None);
    }
}
