//! Target exceptions and invocation outcomes.
//!
//! Exception identity is a stable string tag rather than a live class
//! hierarchy, so suppression sets reduce to set-membership checks and the
//! core stays agnostic of any host language's exception model.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

/// Stable identifier for a class of target exception.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExceptionKind(String);

impl ExceptionKind {
    /// Creates a kind from a stable identifier.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Division or modulo by zero.
    pub fn division_by_zero() -> Self {
        Self::new("DivisionByZero")
    }

    /// Index outside a container's bounds.
    pub fn index_error() -> Self {
        Self::new("IndexError")
    }

    /// A value of the right type but an unusable content.
    pub fn value_error() -> Self {
        Self::new("ValueError")
    }

    /// An argument of an unexpected kind.
    pub fn type_error() -> Self {
        Self::new("TypeError")
    }

    /// Arithmetic overflow.
    pub fn overflow_error() -> Self {
        Self::new("OverflowError")
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExceptionKind {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// A source position inside an instrumented target, for exception reports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub function: String,
    pub line: u32,
}

impl SourceLocation {
    /// Creates a new source location.
    pub fn new(function: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.function, self.line)
    }
}

/// An exception raised by the target during one invocation.
///
/// Never a bug in this system: the tracer observes it, the guesser records
/// it, and nothing in between suppresses or rethrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetException {
    pub kind: ExceptionKind,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl TargetException {
    /// Creates a new exception with no location.
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    /// Attach the source location the exception originated from.
    pub fn with_location(mut self, function: impl Into<String>, line: u32) -> Self {
        self.location = Some(SourceLocation::new(function, line));
        self
    }
}

impl fmt::Display for TargetException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(ref location) = self.location {
            write!(f, " (at {})", location)?;
        }
        Ok(())
    }
}

/// The result of invoking a target once: a value or a raised exception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// The target returned normally.
    Return(Value),
    /// The target raised.
    Raise(TargetException),
}

impl Outcome {
    /// Whether the invocation returned normally.
    pub fn is_return(&self) -> bool {
        matches!(self, Outcome::Return(_))
    }

    /// Whether the invocation raised.
    pub fn is_raise(&self) -> bool {
        matches!(self, Outcome::Raise(_))
    }

    /// The returned value, if any.
    pub fn return_value(&self) -> Option<&Value> {
        match self {
            Outcome::Return(value) => Some(value),
            Outcome::Raise(_) => None,
        }
    }

    /// The raised exception, if any.
    pub fn exception(&self) -> Option<&TargetException> {
        match self {
            Outcome::Return(_) => None,
            Outcome::Raise(exception) => Some(exception),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Return(value) => write!(f, "returned {}", value),
            Outcome::Raise(exception) => write!(f, "raised {}", exception),
        }
    }
}
