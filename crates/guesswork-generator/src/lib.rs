//! Guesswork Generator - Type-directed value synthesizers.
//!
//! This crate turns [`TypeDescriptor`]s into trees of [`Generator`]s and
//! samples values from them. Generators are pure functions of a seeded
//! random source and a recursion budget, constructed once per parameter and
//! reused for every attempt.
//!
//! # Core Concepts
//!
//! - [`Generator`]: the value-synthesizing trait
//! - [`GeneratorFactory`]: annotation -> descriptor -> generator resolution,
//!   with per-annotation caching
//! - [`ParameterGenerators`]: the ordered per-parameter generator mapping a
//!   guesser samples argument tuples from
//! - [`AnyGenerator`]: the wildcard, sampling a fresh concrete type shape
//!   per call under a strict depth budget
//!
//! # Generator Implementations
//!
//! Scalars ([`BoolGenerator`], [`IntGenerator`], [`FloatGenerator`],
//! [`ComplexGenerator`], [`RangeGenerator`], [`NoneGenerator`]), text
//! ([`StringGenerator`], [`BytesGenerator`]), containers
//! ([`SequenceGenerator`], [`SetGenerator`], [`MappingGenerator`],
//! [`TupleGenerator`]), and combinators ([`OptionalGenerator`],
//! [`UnionGenerator`], [`ChoiceGenerator`]).

mod any;
mod combinator;
mod container;
mod error;
mod factory;
mod resolve;
mod scalar;
mod text;
mod traits;

// Re-export core types for convenience
pub use guesswork_core::{TypeDescriptor, Value};

pub use any::AnyGenerator;
pub use combinator::{ChoiceGenerator, OptionalGenerator, UnionGenerator, DEFAULT_NULL_CHANCE};
pub use container::{MappingGenerator, SequenceGenerator, SetGenerator, TupleGenerator};
pub use error::FactoryError;
pub use factory::{build_generator, GeneratorFactory, ParameterGenerators};
pub use resolve::resolve_annotation;
pub use scalar::{
    BoolGenerator, ComplexGenerator, FloatGenerator, IntGenerator, NoneGenerator, RangeGenerator,
    DEFAULT_NUMERIC_START, DEFAULT_NUMERIC_STOP, DEFAULT_SPECIAL_CASES_CHANCE,
};
pub use text::{BytesGenerator, StringGenerator, DEFAULT_TEXT_MAX_LEN, DEFAULT_TEXT_MIN_LEN, PRINTABLE};
pub use traits::{BoxedGenerator, Generator, DEFAULT_RECURSION_BUDGET};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::any::AnyGenerator;
    pub use crate::combinator::{ChoiceGenerator, OptionalGenerator, UnionGenerator};
    pub use crate::container::{MappingGenerator, SequenceGenerator, SetGenerator, TupleGenerator};
    pub use crate::error::FactoryError;
    pub use crate::factory::{build_generator, GeneratorFactory, ParameterGenerators};
    pub use crate::resolve::resolve_annotation;
    pub use crate::scalar::{
        BoolGenerator, ComplexGenerator, FloatGenerator, IntGenerator, NoneGenerator,
        RangeGenerator,
    };
    pub use crate::text::{BytesGenerator, StringGenerator};
    pub use crate::traits::{BoxedGenerator, Generator, DEFAULT_RECURSION_BUDGET};
    pub use guesswork_core::{TypeDescriptor, Value};
}
