//! Guesswork Guesser - The coverage-guided guessing loop.
//!
//! A [`Guesser`] binds an instrumented target to per-parameter generators
//! and repeats generate-invoke-observe cycles until a [`StopCondition`] is
//! met, accumulating coverage, return values, and exceptions in a
//! [`GuesserState`].
//!
//! # Core Concepts
//!
//! - [`Guesser`]: the orchestrator; construction fails fast on resolution
//!   or configuration problems, before any attempt runs
//! - [`GuesserOptions`] / [`GuessOptions`]: construction-time and per-run
//!   configuration
//! - [`StopCondition`]: pure predicates over loop state, composable with
//!   `Any`/`All`
//! - [`GuesserState`]: attempts, coverage map and percentage, exceptions by
//!   kind, return values by value, and the per-attempt record feeding
//!   [`GuesserState::best_cover`]
//!
//! The loop is single-threaded, synchronous, and cooperative: one target
//! invocation at a time, stop conditions (including timeout and
//! cancellation) checked between attempts.

mod error;
mod guesser;
mod state;
mod stop;

// Re-export the types collaborators need alongside the guesser
pub use guesswork_core::{ExceptionKind, Outcome, Parameter, TargetException, Value};
pub use guesswork_tracer::{
    CoverageLayout, CoverageMap, CoverageMode, CoverageUnit, FnTarget, FunctionLayout,
    InstrumentedTarget, Probe, UniverseFallback,
};

pub use error::GuesserError;
pub use guesser::{GuessOptions, GuessStatus, Guesser, GuesserOptions, ProgressUpdate};
pub use state::{ArgTuple, AttemptRecord, BestCover, GuesserState};
pub use stop::{CancelToken, LoopSnapshot, StopCondition, StopReason};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::GuesserError;
    pub use crate::guesser::{GuessOptions, GuessStatus, Guesser, GuesserOptions, ProgressUpdate};
    pub use crate::state::{ArgTuple, AttemptRecord, BestCover, GuesserState};
    pub use crate::stop::{CancelToken, LoopSnapshot, StopCondition, StopReason};
    pub use guesswork_core::{ExceptionKind, Outcome, Parameter, TargetException, Value};
    pub use guesswork_tracer::{
        CoverageLayout, CoverageMode, FnTarget, FunctionLayout, InstrumentedTarget,
        UniverseFallback,
    };
}
