//! The coverage tracer: one instrumented invocation at a time.

use tracing::{trace, warn};

use guesswork_core::{ConfigurationError, Outcome, Value};

use crate::probe::Probe;
use crate::target::InstrumentedTarget;
use crate::unit::{CoverageMap, CoverageMode};

/// What to do when instruction-granularity tracing is requested but the
/// target's layout lacks instruction sites for some function.
///
/// The choice is explicit configuration: failing loudly catches incomplete
/// instrumentation early, degrading keeps exploration going at the coarser
/// granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UniverseFallback {
    /// Fail tracer construction.
    #[default]
    Fail,
    /// Degrade the whole tracer to line granularity.
    LineMode,
}

/// The observation from one traced invocation.
#[derive(Debug, Clone)]
pub struct TraceRun {
    /// The value returned or exception raised, untouched.
    pub outcome: Outcome,
    /// The units this one call exercised; accumulation across attempts is
    /// the caller's responsibility.
    pub hits: CoverageMap,
}

/// Instruments one target, producing per-invocation coverage deltas.
pub struct CoverageTracer<T: InstrumentedTarget> {
    target: T,
    mode: CoverageMode,
    universe: CoverageMap,
}

impl<T: InstrumentedTarget> CoverageTracer<T> {
    /// Creates a tracer, computing the static unit universe once.
    pub fn new(
        target: T,
        mode: CoverageMode,
        fallback: UniverseFallback,
    ) -> Result<Self, ConfigurationError> {
        let layout = target.layout();
        let (mode, universe) = match layout.units(mode) {
            Ok(units) => (mode, units),
            Err(ConfigurationError::MissingInstrumentation(function))
                if mode == CoverageMode::Instruction && fallback == UniverseFallback::LineMode =>
            {
                warn!(
                    callable = target.name(),
                    function,
                    "missing instruction sites, degrading to line granularity"
                );
                (CoverageMode::Line, layout.units(CoverageMode::Line)?)
            }
            Err(error) => return Err(error),
        };
        Ok(Self {
            target,
            mode,
            universe,
        })
    }

    /// The active granularity, after any configured degradation.
    pub fn mode(&self) -> CoverageMode {
        self.mode
    }

    /// The static unit universe for the active mode.
    pub fn universe(&self) -> &CoverageMap {
        &self.universe
    }

    /// The target under instrumentation.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Run the target once with the given arguments.
    ///
    /// The outcome passes through unaltered: exceptions are observed, never
    /// suppressed. Panics if the target reports a hit outside its declared
    /// layout, which is a bug in the target's instrumentation, not a
    /// recoverable condition.
    pub fn trace(&self, args: &[Value]) -> TraceRun {
        let mut probe = Probe::new(self.mode);
        let outcome = self.target.invoke(args, &mut probe);
        let hits = probe.into_hits();

        assert!(
            hits.is_subset(&self.universe),
            "target {:?} reported hits outside its declared layout: {}",
            self.target.name(),
            self.universe.missing_from(&hits),
        );

        trace!(
            callable = self.target.name(),
            hits = hits.len(),
            outcome = %outcome,
            "traced invocation"
        );
        TraceRun { outcome, hits }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CoverageLayout, FunctionLayout};
    use crate::target::FnTarget;
    use crate::unit::CoverageUnit;
    use guesswork_core::{ExceptionKind, TargetException};

    fn branchy_target() -> FnTarget {
        FnTarget::new("h", |args, probe| {
            probe.mark("h", 4, 0);
            let a = match &args[0] {
                Value::Int(a) => *a,
                _ => 0,
            };
            if probe.branch("h", 4, 1, 2, a == 666) {
                Outcome::Return(Value::from("a"))
            } else {
                Outcome::Return(Value::from("b"))
            }
        })
        .with_parameter("a", "int")
        .with_layout(
            CoverageLayout::new().with_function(FunctionLayout::new("h").with_sites(4, [0, 1, 2])),
        )
    }

    #[test]
    fn test_line_mode_single_call_covers_everything() {
        let tracer =
            CoverageTracer::new(branchy_target(), CoverageMode::Line, UniverseFallback::Fail)
                .unwrap();
        let run = tracer.trace(&[Value::Int(0)]);
        assert_eq!(run.outcome, Outcome::Return(Value::from("b")));
        assert_eq!(run.hits.percent_of(tracer.universe()), 100.0);
    }

    #[test]
    fn test_instruction_mode_distinguishes_outcomes() {
        let tracer = CoverageTracer::new(
            branchy_target(),
            CoverageMode::Instruction,
            UniverseFallback::Fail,
        )
        .unwrap();

        let miss = tracer.trace(&[Value::Int(0)]);
        assert!(miss.hits.contains(&CoverageUnit::site("h", 4, 2)));
        assert!(!miss.hits.contains(&CoverageUnit::site("h", 4, 1)));
        assert!(miss.hits.percent_of(tracer.universe()) < 100.0);

        let hit = tracer.trace(&[Value::Int(666)]);
        assert_eq!(hit.outcome, Outcome::Return(Value::from("a")));
        assert!(hit.hits.contains(&CoverageUnit::site("h", 4, 1)));
    }

    #[test]
    fn test_exceptions_pass_through_untouched() {
        let target = FnTarget::new("boom", |_args, probe| {
            probe.mark("boom", 1, 0);
            Outcome::Raise(
                TargetException::new(ExceptionKind::value_error(), "nope").with_location("boom", 1),
            )
        })
        .with_layout(CoverageLayout::new().with_function(FunctionLayout::new("boom").with_site(1, 0)));

        let tracer =
            CoverageTracer::new(target, CoverageMode::Instruction, UniverseFallback::Fail).unwrap();
        let run = tracer.trace(&[]);
        let exception = run.outcome.exception().expect("outcome is an exception");
        assert_eq!(exception.kind, ExceptionKind::value_error());
        assert_eq!(run.hits.len(), 1);
    }

    #[test]
    fn test_missing_sites_fail_or_degrade_per_configuration() {
        let line_only = || {
            FnTarget::new("f", |_args, probe| {
                probe.mark("f", 1, 0);
                Outcome::Return(Value::None)
            })
            .with_layout(CoverageLayout::new().with_function(FunctionLayout::new("f").with_line(1)))
        };

        assert!(matches!(
            CoverageTracer::new(line_only(), CoverageMode::Instruction, UniverseFallback::Fail),
            Err(ConfigurationError::MissingInstrumentation(_))
        ));

        let degraded = CoverageTracer::new(
            line_only(),
            CoverageMode::Instruction,
            UniverseFallback::LineMode,
        )
        .unwrap();
        assert_eq!(degraded.mode(), CoverageMode::Line);
        let run = degraded.trace(&[]);
        assert_eq!(run.hits.percent_of(degraded.universe()), 100.0);
    }

    #[test]
    #[should_panic(expected = "outside its declared layout")]
    fn test_hit_outside_layout_is_fatal() {
        let target = FnTarget::new("g", |_args, probe| {
            probe.mark("g", 99, 0);
            Outcome::Return(Value::None)
        })
        .with_layout(CoverageLayout::new().with_function(FunctionLayout::new("g").with_site(1, 0)));

        let tracer =
            CoverageTracer::new(target, CoverageMode::Instruction, UniverseFallback::Fail).unwrap();
        tracer.trace(&[]);
    }
}
