//! The per-invocation hit recorder handed to instrumented targets.

use crate::unit::{CoverageMap, CoverageMode, CoverageUnit};

/// Records the coverage units one invocation exercises.
///
/// The tracer creates a fresh probe per call and hands it to the target's
/// body; the body marks each decision point it passes through. The active
/// mode decides the granularity recorded: in line mode a mark collapses to
/// its line, in instruction mode the site index is kept, so distinct branch
/// outcomes on one line stay distinguishable.
#[derive(Debug)]
pub struct Probe {
    mode: CoverageMode,
    hits: CoverageMap,
}

impl Probe {
    pub(crate) fn new(mode: CoverageMode) -> Self {
        Self {
            mode,
            hits: CoverageMap::new(),
        }
    }

    /// The active coverage mode.
    pub fn mode(&self) -> CoverageMode {
        self.mode
    }

    /// Mark one site as hit.
    pub fn mark(&mut self, function: &str, line: u32, site: u32) {
        let unit = match self.mode {
            CoverageMode::Line => CoverageUnit::line(function, line),
            CoverageMode::Instruction => CoverageUnit::site(function, line, site),
        };
        self.hits.insert(unit);
    }

    /// Mark one of two sites depending on a branch condition.
    ///
    /// Returns the condition so the call can sit directly inside an `if`.
    pub fn branch(
        &mut self,
        function: &str,
        line: u32,
        taken: u32,
        not_taken: u32,
        condition: bool,
    ) -> bool {
        self.mark(function, line, if condition { taken } else { not_taken });
        condition
    }

    pub(crate) fn into_hits(self) -> CoverageMap {
        self.hits
    }
}
