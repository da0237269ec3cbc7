//! Accumulated guesser state: attempts, coverage, exceptions, returns.

use std::collections::BTreeMap;

use guesswork_core::{ExceptionKind, Value};
use guesswork_tracer::CoverageMap;

/// One sampled argument tuple, in parameter order.
pub type ArgTuple = Vec<Value>;

/// One completed attempt: the arguments used and the units they exercised.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub arguments: ArgTuple,
    pub hits: CoverageMap,
}

/// The minimal covering subset of recorded attempts.
#[derive(Debug, Clone)]
pub struct BestCover {
    /// Argument tuples of the chosen attempts, in selection order.
    pub cases: Vec<ArgTuple>,
    /// Units of the universe no recorded attempt reached.
    pub missed: CoverageMap,
}

/// State owned by one guesser: created at construction, mutated only by the
/// guess loop, read-only to collaborators once a run stops.
#[derive(Debug)]
pub struct GuesserState {
    universe: CoverageMap,
    coverage: CoverageMap,
    attempts: u64,
    exceptions: BTreeMap<ExceptionKind, Vec<ArgTuple>>,
    return_values: BTreeMap<Value, Vec<ArgTuple>>,
    records: Vec<AttemptRecord>,
}

impl GuesserState {
    pub(crate) fn new(universe: CoverageMap) -> Self {
        Self {
            universe,
            coverage: CoverageMap::new(),
            attempts: 0,
            exceptions: BTreeMap::new(),
            return_values: BTreeMap::new(),
            records: Vec::new(),
        }
    }

    /// Attempts completed so far.
    pub fn attempts_number(&self) -> u64 {
        self.attempts
    }

    /// The static unit universe percentages are measured against.
    pub fn universe(&self) -> &CoverageMap {
        &self.universe
    }

    /// Units hit so far; monotonically non-decreasing across attempts.
    pub fn coverage(&self) -> &CoverageMap {
        &self.coverage
    }

    /// Coverage percentage against the universe.
    pub fn coverage_percent(&self) -> f64 {
        self.coverage.percent_of(&self.universe)
    }

    /// Units of the universe not yet hit.
    pub fn missed(&self) -> CoverageMap {
        self.coverage.missing_from(&self.universe)
    }

    /// Argument tuples per exception kind, in observation order.
    pub fn exceptions(&self) -> &BTreeMap<ExceptionKind, Vec<ArgTuple>> {
        &self.exceptions
    }

    /// Argument tuples per observed return value, in observation order.
    pub fn return_values(&self) -> &BTreeMap<Value, Vec<ArgTuple>> {
        &self.return_values
    }

    /// Every completed attempt, in order.
    pub fn records(&self) -> &[AttemptRecord] {
        &self.records
    }

    pub(crate) fn record_return(&mut self, value: Value, arguments: ArgTuple) {
        self.return_values.entry(value).or_default().push(arguments);
    }

    pub(crate) fn record_exception(&mut self, kind: ExceptionKind, arguments: ArgTuple) {
        self.exceptions.entry(kind).or_default().push(arguments);
    }

    /// Merge one attempt's hits and remember the attempt. Returns how many
    /// units were newly covered.
    pub(crate) fn record_attempt(&mut self, arguments: ArgTuple, hits: CoverageMap) -> usize {
        let before = self.coverage.len();
        self.coverage.merge(&hits);
        let newly_covered = self.coverage.len() - before;
        self.records.push(AttemptRecord { arguments, hits });
        self.attempts += 1;
        newly_covered
    }

    /// Greedy minimal subset of recorded attempts reaching maximal
    /// coverage, plus whatever the whole session never reached.
    ///
    /// Repeatedly picks the attempt covering the most still-missing units
    /// until no attempt adds anything.
    pub fn best_cover(&self) -> BestCover {
        let mut missed = self.universe.clone();
        let mut cases = Vec::new();
        let mut available: Vec<&AttemptRecord> = self.records.iter().collect();

        while !missed.is_empty() && !available.is_empty() {
            let (index, gain) = available
                .iter()
                .enumerate()
                .map(|(i, record)| (i, record.hits.intersection_len(&missed)))
                .max_by_key(|&(_, gain)| gain)
                .expect("available attempt list is non-empty");
            if gain == 0 {
                break;
            }
            let record = available.swap_remove(index);
            missed.subtract(&record.hits);
            cases.push(record.arguments.clone());
        }

        BestCover { cases, missed }
    }
}
