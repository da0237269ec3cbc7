//! The instrumented-target interface.
//!
//! Execution tracing is modeled as an explicit instrumentation seam rather
//! than a runtime hook: a target declares its signature and coverage layout
//! up front and reports hits through the [`Probe`] it is invoked with. This
//! keeps the tracer and the guess loop independent of how any particular
//! host language implements instrumentation.

use guesswork_core::{Outcome, Parameter, Value};

use crate::layout::CoverageLayout;
use crate::probe::Probe;

/// A callable under exploration.
pub trait InstrumentedTarget: Send + Sync {
    /// Name of the target, for logs and reports.
    fn name(&self) -> &str;

    /// Declared parameters, in call order.
    fn parameters(&self) -> &[Parameter];

    /// The static coverage layout of the target's body.
    ///
    /// Computed once per target by the tracer; the universe of reachable
    /// units is declared here, not discovered at run time.
    fn layout(&self) -> CoverageLayout;

    /// Invoke the target once, reporting coverage through `probe`.
    ///
    /// An exception raised by the target is returned as
    /// [`Outcome::Raise`], never panics through this seam.
    fn invoke(&self, args: &[Value], probe: &mut Probe) -> Outcome;
}

type TargetBody = dyn Fn(&[Value], &mut Probe) -> Outcome + Send + Sync;

/// An [`InstrumentedTarget`] built from a closure.
///
/// # Example
///
/// ```rust,ignore
/// let target = FnTarget::new("h", |args, probe| {
///     probe.mark("h", 4, 0);
///     let a = match &args[0] { Value::Int(a) => *a, _ => unreachable!() };
///     if probe.branch("h", 4, 1, 2, a == 666) {
///         Outcome::Return(Value::from("a"))
///     } else {
///         Outcome::Return(Value::from("b"))
///     }
/// })
/// .with_parameter("a", "int")
/// .with_layout(
///     CoverageLayout::new().with_function(FunctionLayout::new("h").with_sites(4, [0, 1, 2])),
/// );
/// ```
pub struct FnTarget {
    name: String,
    parameters: Vec<Parameter>,
    layout: CoverageLayout,
    body: Box<TargetBody>,
}

impl FnTarget {
    /// Creates a target from a name and a body closure.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value], &mut Probe) -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            layout: CoverageLayout::new(),
            body: Box::new(body),
        }
    }

    /// Declares one parameter; call in parameter order.
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        annotation: impl Into<String>,
    ) -> Self {
        self.parameters.push(Parameter::new(name, annotation));
        self
    }

    /// Sets the target's coverage layout.
    pub fn with_layout(mut self, layout: CoverageLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl InstrumentedTarget for FnTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn layout(&self) -> CoverageLayout {
        self.layout.clone()
    }

    fn invoke(&self, args: &[Value], probe: &mut Probe) -> Outcome {
        (self.body)(args, probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FunctionLayout;
    use crate::unit::CoverageMode;

    #[test]
    fn test_fn_target_declares_and_invokes() {
        let target = FnTarget::new("double", |args, probe| {
            probe.mark("double", 1, 0);
            match &args[0] {
                Value::Int(a) => Outcome::Return(Value::Int(a * 2)),
                _ => Outcome::Return(Value::None),
            }
        })
        .with_parameter("a", "int")
        .with_layout(
            CoverageLayout::new().with_function(FunctionLayout::new("double").with_site(1, 0)),
        );

        assert_eq!(target.name(), "double");
        assert_eq!(target.parameters().len(), 1);

        let mut probe = Probe::new(CoverageMode::Line);
        let outcome = target.invoke(&[Value::Int(21)], &mut probe);
        assert_eq!(outcome, Outcome::Return(Value::Int(42)));
        assert_eq!(probe.into_hits().len(), 1);
    }
}
