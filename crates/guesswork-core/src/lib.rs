//! Guesswork Core - Core types for the guesswork exploration engine.
//!
//! This crate provides the fundamental types that flow through the
//! guesswork workspace:
//!
//! - [`value`]: the closed [`Value`] enum every generator produces and every
//!   target returns
//! - [`descriptor`]: the [`TypeDescriptor`] grammar describing value shapes
//! - [`exception`]: exception tags, target exceptions, and invocation
//!   [`Outcome`]s
//! - [`signature`]: declared target parameters
//! - [`error`]: resolution and configuration errors
//!
//! # Overview
//!
//! Guesswork explores the behavior of an instrumented callable by
//! synthesizing typed random arguments and observing the coverage units,
//! return values, and exceptions each invocation produces. This crate holds
//! only pure data; the generator, tracer, and guesser crates build the
//! behavior on top of it.

pub mod descriptor;
pub mod error;
pub mod exception;
pub mod signature;
pub mod value;

// Re-export commonly used types at the crate root for convenience
pub use descriptor::{
    PrimitiveKind, TypeDescriptor, DEFAULT_ANY_DEPTH, DEFAULT_CONTAINER_MAX_LEN,
    DEFAULT_CONTAINER_MIN_LEN,
};
pub use error::{ConfigurationError, ResolutionError};
pub use exception::{ExceptionKind, Outcome, SourceLocation, TargetException};
pub use signature::Parameter;
pub use value::Value;
