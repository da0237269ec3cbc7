//! The guesser: repeated generate-invoke-observe until a stop condition.

use std::collections::BTreeSet;
use std::fmt;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use guesswork_core::{ConfigurationError, ExceptionKind, Outcome};
use guesswork_generator::{GeneratorFactory, ParameterGenerators};
use guesswork_tracer::{CoverageMode, CoverageTracer, InstrumentedTarget, UniverseFallback};

use crate::error::GuesserError;
use crate::state::GuesserState;
use crate::stop::{LoopSnapshot, StopCondition, StopReason};

/// Construction-time guesser configuration.
#[derive(Debug, Clone)]
pub struct GuesserOptions {
    /// Coverage granularity to trace and measure against.
    pub coverage_mode: CoverageMode,
    /// What to do when instruction granularity is requested but not
    /// declared by the target.
    pub universe_fallback: UniverseFallback,
    /// Exception kinds treated as normal, non-stopping observations.
    pub suppress_exceptions: BTreeSet<ExceptionKind>,
    /// Whether a non-suppressed exception stops the run immediately; when
    /// false it is recorded and the loop continues.
    pub stop_on_exception: bool,
    /// Seed for the run's random source; random when absent.
    pub seed: Option<u64>,
}

impl Default for GuesserOptions {
    fn default() -> Self {
        Self {
            coverage_mode: CoverageMode::Line,
            universe_fallback: UniverseFallback::Fail,
            suppress_exceptions: BTreeSet::new(),
            stop_on_exception: true,
            seed: None,
        }
    }
}

impl GuesserOptions {
    /// Creates options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the coverage granularity.
    pub fn with_coverage_mode(mut self, mode: CoverageMode) -> Self {
        self.coverage_mode = mode;
        self
    }

    /// Sets the missing-instrumentation policy.
    pub fn with_universe_fallback(mut self, fallback: UniverseFallback) -> Self {
        self.universe_fallback = fallback;
        self
    }

    /// Adds an exception kind to the suppression set.
    pub fn with_suppressed_exception(mut self, kind: ExceptionKind) -> Self {
        self.suppress_exceptions.insert(kind);
        self
    }

    /// Sets whether non-suppressed exceptions stop the run.
    pub fn with_stop_on_exception(mut self, stop: bool) -> Self {
        self.stop_on_exception = stop;
        self
    }

    /// Seeds the random source for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Per-run options for one `guess` call.
///
/// The stop conditions are OR'd with each other and with the call limit and
/// timeout. A call with none of the three configured would never halt and
/// is rejected before the first attempt.
pub struct GuessOptions {
    stop_conditions: Vec<StopCondition>,
    call_limit: Option<u64>,
    timeout: Option<Duration>,
    progress: Option<Box<dyn FnMut(ProgressUpdate) + Send>>,
}

impl GuessOptions {
    /// Creates empty run options.
    pub fn new() -> Self {
        Self {
            stop_conditions: Vec::new(),
            call_limit: None,
            timeout: None,
            progress: None,
        }
    }

    /// Adds a stop condition (OR'd with the others).
    pub fn with_stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_conditions.push(condition);
        self
    }

    /// Caps the number of attempts.
    pub fn with_call_limit(mut self, limit: u64) -> Self {
        self.call_limit = Some(limit);
        self
    }

    /// Caps the wall-clock duration, checked between attempts.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Registers a sink receiving an update after every attempt.
    pub fn with_progress<F>(mut self, sink: F) -> Self
    where
        F: FnMut(ProgressUpdate) + Send + 'static,
    {
        self.progress = Some(Box::new(sink));
        self
    }
}

impl Default for GuessOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GuessOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuessOptions")
            .field("stop_conditions", &self.stop_conditions)
            .field("call_limit", &self.call_limit)
            .field("timeout", &self.timeout)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// One progress notification, emitted after an attempt completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub attempts: u64,
    pub coverage_percent: f64,
    pub newly_covered: usize,
}

/// Lifecycle of a guesser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessStatus {
    /// No run has started yet.
    Idle,
    /// A run is in flight.
    Running,
    /// The last run halted for this reason.
    Stopped(StopReason),
}

/// Orchestrates repeated invocation of one instrumented target.
///
/// Construction resolves the target's signature into generators and
/// computes the coverage universe; both failures surface here, before any
/// attempt. The loop itself is single-threaded and synchronous: one
/// invocation at a time, state mutated only between invocations.
pub struct Guesser<T: InstrumentedTarget> {
    tracer: CoverageTracer<T>,
    generators: ParameterGenerators,
    options: GuesserOptions,
    rng: ChaCha8Rng,
    state: GuesserState,
    status: GuessStatus,
    last_exception: Option<ExceptionKind>,
}

impl<T: InstrumentedTarget> Guesser<T> {
    /// Creates a guesser, deriving generators from the target's signature.
    pub fn new(target: T, options: GuesserOptions) -> Result<Self, GuesserError> {
        let mut factory = GeneratorFactory::new();
        let generators = factory.generators_for(target.parameters())?;
        Self::with_parameter_generators(target, generators, options)
    }

    /// Creates a guesser with explicit per-parameter generators, bypassing
    /// annotation resolution.
    pub fn with_parameter_generators(
        target: T,
        generators: ParameterGenerators,
        options: GuesserOptions,
    ) -> Result<Self, GuesserError> {
        let tracer = CoverageTracer::new(target, options.coverage_mode, options.universe_fallback)?;
        let rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let state = GuesserState::new(tracer.universe().clone());
        Ok(Self {
            tracer,
            generators,
            options,
            rng,
            state,
            status: GuessStatus::Idle,
            last_exception: None,
        })
    }

    /// The accumulated state, readable at any point between runs.
    pub fn state(&self) -> &GuesserState {
        &self.state
    }

    /// The guesser's lifecycle status.
    pub fn status(&self) -> &GuessStatus {
        &self.status
    }

    /// The active coverage mode, after any configured degradation.
    pub fn coverage_mode(&self) -> CoverageMode {
        self.tracer.mode()
    }

    /// The generators bound to the target's parameters.
    pub fn generators(&self) -> &ParameterGenerators {
        &self.generators
    }

    /// Guess arguments and invoke the target until a stop condition is met.
    ///
    /// Stop conditions (including the implicit exception stop when
    /// configured) are evaluated between attempts; a stop triggered by an
    /// exception leaves that exception in `state().exceptions()` rather
    /// than re-raising it. State accumulates across consecutive `guess`
    /// calls on the same guesser.
    pub fn guess(&mut self, options: GuessOptions) -> Result<&GuesserState, GuesserError> {
        let GuessOptions {
            mut stop_conditions,
            call_limit,
            timeout,
            mut progress,
        } = options;

        if stop_conditions.is_empty() && call_limit.is_none() && timeout.is_none() {
            return Err(ConfigurationError::UnboundedGuess.into());
        }
        if let Some(limit) = call_limit {
            stop_conditions.push(StopCondition::CallLimit(limit));
        }
        if let Some(deadline) = timeout {
            stop_conditions.push(StopCondition::Timeout(deadline));
        }
        if self.options.stop_on_exception {
            stop_conditions.push(StopCondition::any_exception());
        }
        let condition = StopCondition::Any(stop_conditions);

        self.status = GuessStatus::Running;
        self.last_exception = None;
        let start = Instant::now();
        debug!(
            callable = self.tracer.target().name(),
            mode = %self.tracer.mode(),
            universe = self.state.universe().len(),
            "starting guess run"
        );

        let reason = loop {
            let snapshot = LoopSnapshot {
                coverage_percent: self.state.coverage_percent(),
                attempts: self.state.attempts_number(),
                elapsed: start.elapsed(),
                last_exception: self.last_exception.as_ref(),
            };
            if let Some(reason) = condition.evaluate(&snapshot) {
                break reason;
            }

            let args = self.generators.sample(&mut self.rng);
            let run = self.tracer.trace(&args);

            match run.outcome {
                Outcome::Return(value) => {
                    self.state.record_return(value, args.clone());
                }
                Outcome::Raise(exception) => {
                    let suppressed = self.options.suppress_exceptions.contains(&exception.kind);
                    debug!(
                        kind = %exception.kind,
                        suppressed,
                        attempt = self.state.attempts_number(),
                        "target raised"
                    );
                    self.state.record_exception(exception.kind.clone(), args.clone());
                    if !suppressed {
                        self.last_exception = Some(exception.kind);
                    }
                }
            }

            let newly_covered = self.state.record_attempt(args, run.hits);
            if let Some(sink) = progress.as_mut() {
                sink(ProgressUpdate {
                    attempts: self.state.attempts_number(),
                    coverage_percent: self.state.coverage_percent(),
                    newly_covered,
                });
            }
        };

        info!(
            callable = self.tracer.target().name(),
            reason = %reason,
            attempts = self.state.attempts_number(),
            coverage_percent = format!("{:.1}", self.state.coverage_percent()),
            elapsed = ?start.elapsed(),
            "guess run stopped"
        );
        self.status = GuessStatus::Stopped(reason);
        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guesswork_core::{TargetException, Value};
    use guesswork_tracer::{CoverageLayout, FnTarget, FunctionLayout};

    fn constant_target() -> FnTarget {
        FnTarget::new("answer", |_args, probe| {
            probe.mark("answer", 1, 0);
            Outcome::Return(Value::Int(42))
        })
        .with_parameter("a", "int")
        .with_layout(
            CoverageLayout::new().with_function(FunctionLayout::new("answer").with_site(1, 0)),
        )
    }

    #[test]
    fn test_unbounded_guess_is_rejected_before_any_attempt() {
        let mut guesser =
            Guesser::new(constant_target(), GuesserOptions::new().with_seed(1)).unwrap();
        let result = guesser.guess(GuessOptions::new());
        assert!(matches!(
            result,
            Err(GuesserError::Configuration(ConfigurationError::UnboundedGuess))
        ));
        assert_eq!(guesser.state().attempts_number(), 0);
        assert_eq!(*guesser.status(), GuessStatus::Idle);
    }

    #[test]
    fn test_call_limit_is_never_exceeded() {
        let mut guesser =
            Guesser::new(constant_target(), GuesserOptions::new().with_seed(1)).unwrap();
        guesser.guess(GuessOptions::new().with_call_limit(25)).unwrap();
        let state = guesser.state();
        assert_eq!(state.attempts_number(), 25);
        assert_eq!(*guesser.status(), GuessStatus::Stopped(StopReason::CallLimitReached));
    }

    #[test]
    fn test_full_coverage_stops_first() {
        let mut guesser =
            Guesser::new(constant_target(), GuesserOptions::new().with_seed(1)).unwrap();
        guesser
            .guess(
                GuessOptions::new()
                    .with_stop_condition(StopCondition::FullCoverage)
                    .with_call_limit(1000),
            )
            .unwrap();
        let state = guesser.state();
        assert_eq!(state.attempts_number(), 1);
        assert_eq!(state.coverage_percent(), 100.0);
        assert_eq!(*guesser.status(), GuessStatus::Stopped(StopReason::FullCoverage));
    }

    #[test]
    fn test_return_values_accumulate_argument_tuples() {
        let mut guesser =
            Guesser::new(constant_target(), GuesserOptions::new().with_seed(7)).unwrap();
        guesser.guess(GuessOptions::new().with_call_limit(10)).unwrap();
        let state = guesser.state();
        assert_eq!(state.return_values().len(), 1);
        assert_eq!(state.return_values()[&Value::Int(42)].len(), 10);
    }

    fn raising_target() -> FnTarget {
        FnTarget::new("boom", |args, probe| {
            probe.mark("boom", 1, 0);
            match &args[0] {
                Value::Int(a) if *a % 2 == 0 => Outcome::Raise(
                    TargetException::new(ExceptionKind::value_error(), "even").with_location("boom", 1),
                ),
                _ => Outcome::Return(Value::None),
            }
        })
        .with_parameter("a", "int")
        .with_layout(CoverageLayout::new().with_function(FunctionLayout::new("boom").with_site(1, 0)))
    }

    #[test]
    fn test_exception_stops_and_is_retrievable_not_reraised() {
        let mut guesser =
            Guesser::new(raising_target(), GuesserOptions::new().with_seed(3)).unwrap();
        guesser.guess(GuessOptions::new().with_call_limit(1000)).unwrap();
        let state = guesser.state();
        assert!(state.exceptions().contains_key(&ExceptionKind::value_error()));
        assert_eq!(
            *guesser.status(),
            GuessStatus::Stopped(StopReason::ExceptionRaised(ExceptionKind::value_error()))
        );
        // The run stopped right after the raising attempt.
        let tuples = &state.exceptions()[&ExceptionKind::value_error()];
        assert_eq!(tuples.len(), 1);
        assert_eq!(tuples[0], state.records().last().unwrap().arguments);
    }

    #[test]
    fn test_suppressed_exceptions_do_not_stop() {
        let options = GuesserOptions::new()
            .with_seed(3)
            .with_suppressed_exception(ExceptionKind::value_error());
        let mut guesser = Guesser::new(raising_target(), options).unwrap();
        guesser.guess(GuessOptions::new().with_call_limit(50)).unwrap();
        let state = guesser.state();
        assert_eq!(*guesser.status(), GuessStatus::Stopped(StopReason::CallLimitReached));
        assert_eq!(state.attempts_number(), 50);
        // Suppressed observations are still recorded.
        assert!(!state.exceptions()[&ExceptionKind::value_error()].is_empty());
    }

    #[test]
    fn test_record_only_mode_keeps_looping_on_exceptions() {
        let options = GuesserOptions::new().with_seed(3).with_stop_on_exception(false);
        let mut guesser = Guesser::new(raising_target(), options).unwrap();
        guesser.guess(GuessOptions::new().with_call_limit(50)).unwrap();
        let state = guesser.state();
        assert_eq!(*guesser.status(), GuessStatus::Stopped(StopReason::CallLimitReached));
        assert_eq!(state.attempts_number(), 50);
        assert!(!state.exceptions()[&ExceptionKind::value_error()].is_empty());
    }

    #[test]
    fn test_progress_sink_sees_every_attempt() {
        use std::sync::{Arc, Mutex};

        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink_updates = Arc::clone(&updates);
        let mut guesser =
            Guesser::new(constant_target(), GuesserOptions::new().with_seed(1)).unwrap();
        guesser
            .guess(
                GuessOptions::new()
                    .with_call_limit(5)
                    .with_progress(move |update| sink_updates.lock().unwrap().push(update)),
            )
            .unwrap();

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 5);
        assert_eq!(updates[0].attempts, 1);
        assert_eq!(updates[0].newly_covered, 1);
        assert_eq!(updates[4].attempts, 5);
        assert_eq!(updates[4].coverage_percent, 100.0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = |seed: u64| {
            let mut guesser =
                Guesser::new(raising_target(), GuesserOptions::new().with_seed(seed)).unwrap();
            guesser.guess(GuessOptions::new().with_call_limit(100)).unwrap();
            (
                guesser.state().attempts_number(),
                guesser.state().records().last().unwrap().arguments.clone(),
            )
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_cancellation_between_attempts() {
        use crate::stop::CancelToken;

        let token = CancelToken::new();
        token.cancel();
        let mut guesser =
            Guesser::new(constant_target(), GuesserOptions::new().with_seed(1)).unwrap();
        guesser
            .guess(
                GuessOptions::new()
                    .with_stop_condition(StopCondition::Cancelled(token))
                    .with_call_limit(100),
            )
            .unwrap();
        let state = guesser.state();
        assert_eq!(state.attempts_number(), 0);
        assert_eq!(*guesser.status(), GuessStatus::Stopped(StopReason::ExternalCancel));
    }
}
