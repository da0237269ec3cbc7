//! Stop conditions: pure predicates over the guess loop's state.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use guesswork_core::ExceptionKind;

/// Why a guess run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every unit of the active mode's static universe was hit.
    FullCoverage,
    /// A non-suppressed exception of this kind was observed.
    ExceptionRaised(ExceptionKind),
    /// The configured wall-clock deadline elapsed.
    Timeout,
    /// The configured attempt ceiling was reached.
    CallLimitReached,
    /// An external cancellation token fired.
    ExternalCancel,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::FullCoverage => write!(f, "full coverage"),
            StopReason::ExceptionRaised(kind) => write!(f, "exception raised: {}", kind),
            StopReason::Timeout => write!(f, "timeout"),
            StopReason::CallLimitReached => write!(f, "call limit reached"),
            StopReason::ExternalCancel => write!(f, "external cancel"),
        }
    }
}

/// A shareable flag for cancelling a run from outside the loop.
///
/// Cancellation is cooperative: it is checked between attempts, never by
/// interrupting an in-flight call.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// The read-only view of loop state that stop conditions see.
#[derive(Debug, Clone)]
pub struct LoopSnapshot<'a> {
    /// Coverage percentage against the active mode's static universe.
    pub coverage_percent: f64,
    /// Attempts completed so far.
    pub attempts: u64,
    /// Wall-clock time since the run started.
    pub elapsed: Duration,
    /// The last non-suppressed exception kind observed, if any.
    pub last_exception: Option<&'a ExceptionKind>,
}

/// A composable predicate deciding when the guess loop halts.
///
/// Conditions are pure over a [`LoopSnapshot`] and evaluated between
/// attempts. A list of conditions passed to `guess` is OR'd; `All` and
/// `Any` nest for other combinations.
#[derive(Debug, Clone)]
pub enum StopCondition {
    /// Stop when the coverage percentage reaches 100.
    FullCoverage,
    /// Stop after this many attempts.
    CallLimit(u64),
    /// Stop once this much wall-clock time has elapsed.
    Timeout(Duration),
    /// Stop on the first non-suppressed exception of the given kind, or of
    /// any kind when `None`.
    ExceptionRaised(Option<ExceptionKind>),
    /// Stop when the token is cancelled.
    Cancelled(CancelToken),
    /// Stop when any child condition is satisfied.
    Any(Vec<StopCondition>),
    /// Stop only when every child condition is satisfied.
    All(Vec<StopCondition>),
}

impl StopCondition {
    /// Stop on any non-suppressed exception.
    pub fn any_exception() -> Self {
        StopCondition::ExceptionRaised(None)
    }

    /// Stop on a non-suppressed exception of one specific kind.
    pub fn exception(kind: ExceptionKind) -> Self {
        StopCondition::ExceptionRaised(Some(kind))
    }

    /// Evaluate against a snapshot; `Some` carries the stop reason.
    pub fn evaluate(&self, snapshot: &LoopSnapshot<'_>) -> Option<StopReason> {
        match self {
            StopCondition::FullCoverage => {
                (snapshot.coverage_percent >= 100.0).then_some(StopReason::FullCoverage)
            }
            StopCondition::CallLimit(limit) => {
                (snapshot.attempts >= *limit).then_some(StopReason::CallLimitReached)
            }
            StopCondition::Timeout(deadline) => {
                (snapshot.elapsed >= *deadline).then_some(StopReason::Timeout)
            }
            StopCondition::ExceptionRaised(wanted) => match (wanted, snapshot.last_exception) {
                (None, Some(kind)) => Some(StopReason::ExceptionRaised(kind.clone())),
                (Some(wanted), Some(kind)) if wanted == kind => {
                    Some(StopReason::ExceptionRaised(kind.clone()))
                }
                _ => None,
            },
            StopCondition::Cancelled(token) => {
                token.is_cancelled().then_some(StopReason::ExternalCancel)
            }
            StopCondition::Any(children) => {
                children.iter().find_map(|child| child.evaluate(snapshot))
            }
            StopCondition::All(children) => {
                let mut reasons = children.iter().map(|child| child.evaluate(snapshot));
                let first = reasons.next()??;
                for reason in reasons {
                    reason?;
                }
                Some(first)
            }
        }
    }
}
