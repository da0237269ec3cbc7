//! The generator factory: descriptors in, generator trees out.

use std::collections::HashMap;

use tracing::trace;

use guesswork_core::{
    ConfigurationError, Parameter, PrimitiveKind, ResolutionError, TypeDescriptor, Value,
};
use rand_chacha::ChaCha8Rng;

use crate::any::AnyGenerator;
use crate::combinator::{OptionalGenerator, UnionGenerator};
use crate::container::{MappingGenerator, SequenceGenerator, SetGenerator, TupleGenerator};
use crate::error::FactoryError;
use crate::resolve::resolve_annotation;
use crate::scalar::{
    BoolGenerator, ComplexGenerator, FloatGenerator, IntGenerator, NoneGenerator, RangeGenerator,
};
use crate::text::{BytesGenerator, StringGenerator};
use crate::traits::{BoxedGenerator, Generator, DEFAULT_RECURSION_BUDGET};

/// Build a generator tree from a descriptor.
///
/// Fails fast on malformed bounds or empty unions anywhere in the
/// descriptor; a generator that constructs successfully never fails at
/// generation time.
pub fn build_generator(descriptor: &TypeDescriptor) -> Result<BoxedGenerator, ConfigurationError> {
    Ok(match descriptor {
        TypeDescriptor::Primitive(kind) => match kind {
            PrimitiveKind::Bool => Box::new(BoolGenerator::new()) as BoxedGenerator,
            PrimitiveKind::Int => Box::new(IntGenerator::new()),
            PrimitiveKind::Float => Box::new(FloatGenerator::new()),
            PrimitiveKind::Complex => Box::new(ComplexGenerator::new()),
            PrimitiveKind::Str => Box::new(StringGenerator::new()),
            PrimitiveKind::Bytes => Box::new(BytesGenerator::new()),
            PrimitiveKind::None => Box::new(NoneGenerator::new()),
            PrimitiveKind::Range => Box::new(RangeGenerator::new()),
        },
        TypeDescriptor::Sequence { element, min_len, max_len } => Box::new(
            SequenceGenerator::bounded(build_generator(element)?, *min_len, *max_len)?,
        ),
        TypeDescriptor::Set { element, min_len, max_len } => Box::new(SetGenerator::bounded(
            build_generator(element)?,
            *min_len,
            *max_len,
        )?),
        TypeDescriptor::Mapping { key, value, min_len, max_len } => {
            Box::new(MappingGenerator::bounded(
                build_generator(key)?,
                build_generator(value)?,
                *min_len,
                *max_len,
            )?)
        }
        TypeDescriptor::Tuple(elements) => Box::new(TupleGenerator::new(
            elements
                .iter()
                .map(build_generator)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        TypeDescriptor::Optional(inner) => Box::new(OptionalGenerator::new(build_generator(inner)?)),
        TypeDescriptor::Union(alternatives) => Box::new(UnionGenerator::new(
            alternatives
                .iter()
                .map(build_generator)
                .collect::<Result<Vec<_>, _>>()?,
        )?),
        TypeDescriptor::Any { max_depth } => Box::new(AnyGenerator::with_depth(*max_depth)),
    })
}

/// An ordered `parameter name -> generator` mapping for one target.
///
/// Order matches the target's declared parameter order; `sample` produces
/// one argument tuple in that order.
pub struct ParameterGenerators {
    entries: Vec<(String, BoxedGenerator)>,
}

impl ParameterGenerators {
    /// Creates an empty mapping, for explicit construction.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends a named generator.
    pub fn with(mut self, name: impl Into<String>, generator: BoxedGenerator) -> Self {
        self.entries.push((name.into(), generator));
        self
    }

    /// Creates a mapping from prepared entries.
    pub fn from_entries(entries: Vec<(String, BoxedGenerator)>) -> Self {
        Self { entries }
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the target takes no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The generator bound to a parameter name.
    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, g)| g.as_ref())
    }

    /// Iterate parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Generator)> {
        self.entries.iter().map(|(n, g)| (n.as_str(), g.as_ref()))
    }

    /// Sample one argument tuple, one value per parameter in order.
    pub fn sample(&self, rng: &mut ChaCha8Rng) -> Vec<Value> {
        self.entries
            .iter()
            .map(|(_, generator)| generator.generate(rng, DEFAULT_RECURSION_BUDGET))
            .collect()
    }
}

impl Default for ParameterGenerators {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves annotations to descriptors and descriptors to generators.
///
/// Resolution is cached per distinct annotation string; descriptors are
/// immutable, so cached entries are shared freely.
#[derive(Default)]
pub struct GeneratorFactory {
    cache: HashMap<String, TypeDescriptor>,
}

impl GeneratorFactory {
    /// Creates a factory with an empty resolution cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an annotation into a descriptor, caching the result.
    pub fn resolve(&mut self, annotation: &str) -> Result<TypeDescriptor, ResolutionError> {
        if let Some(descriptor) = self.cache.get(annotation) {
            return Ok(descriptor.clone());
        }
        let descriptor = resolve_annotation(annotation)?;
        trace!(
            annotation,
            descriptor = %descriptor.describe(),
            "resolved annotation"
        );
        self.cache.insert(annotation.to_string(), descriptor.clone());
        Ok(descriptor)
    }

    /// Build a generator for a descriptor.
    pub fn generator_for(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Result<BoxedGenerator, ConfigurationError> {
        build_generator(descriptor)
    }

    /// Build one generator per declared parameter, in order.
    ///
    /// Any resolution or construction failure surfaces here, before the
    /// first value is ever generated.
    pub fn generators_for(
        &mut self,
        parameters: &[Parameter],
    ) -> Result<ParameterGenerators, FactoryError> {
        let mut entries = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let descriptor = self.resolve(&parameter.annotation)?;
            let generator = build_generator(&descriptor)?;
            entries.push((parameter.name.clone(), generator));
        }
        Ok(ParameterGenerators::from_entries(entries))
    }
}
