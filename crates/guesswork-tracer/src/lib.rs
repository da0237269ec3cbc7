//! Guesswork Tracer - Coverage instrumentation for one invocation at a time.
//!
//! This crate provides the instrumentation seam between the guess loop and
//! a target callable:
//!
//! - [`CoverageUnit`] / [`CoverageMap`]: branch-outcome-granular coverage
//!   identity and accumulation
//! - [`CoverageLayout`]: the statically declared universe of reachable
//!   units, computed once per target
//! - [`Probe`]: the per-invocation hit recorder a target's body reports
//!   through
//! - [`InstrumentedTarget`] / [`FnTarget`]: the target interface and its
//!   closure-backed implementation
//! - [`CoverageTracer`]: runs one invocation and reports `(outcome, hits)`
//!   without suppressing or altering the target's result
//!
//! Two granularities are supported ([`CoverageMode`]): line units, and
//! instruction units where each branch outcome at a line is its own unit.
//! Instruction-mode full coverage is strictly harder to reach; that
//! difference is the point, not an artifact.

mod layout;
mod probe;
mod target;
mod tracer;
mod unit;

pub use layout::{CoverageLayout, FunctionLayout};
pub use probe::Probe;
pub use target::{FnTarget, InstrumentedTarget};
pub use tracer::{CoverageTracer, TraceRun, UniverseFallback};
pub use unit::{CoverageMap, CoverageMode, CoverageUnit};
