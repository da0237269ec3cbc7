//! Coverage units and accumulated coverage maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Coverage granularity.
///
/// Line mode treats each source position as one unit. Instruction mode
/// treats each operation site as its own unit, so a conditional expression
/// on a single line contributes one distinguishable unit per possible
/// outcome; full coverage in instruction mode is strictly harder to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverageMode {
    Line,
    Instruction,
}

impl fmt::Display for CoverageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageMode::Line => write!(f, "line"),
            CoverageMode::Instruction => write!(f, "instruction"),
        }
    }
}

/// One decision point in a target's body.
///
/// `site: None` identifies a line-granularity unit; `site: Some(offset)`
/// identifies one instruction-granularity site within that line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CoverageUnit {
    pub function: String,
    pub line: u32,
    pub site: Option<u32>,
}

impl CoverageUnit {
    /// A line-granularity unit.
    pub fn line(function: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            line,
            site: None,
        }
    }

    /// An instruction-granularity unit.
    pub fn site(function: impl Into<String>, line: u32, site: u32) -> Self {
        Self {
            function: function.into(),
            line,
            site: Some(site),
        }
    }
}

impl fmt::Display for CoverageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.site {
            None => write!(f, "{}:{}", self.function, self.line),
            Some(site) => write!(f, "{}:{}+{}", self.function, self.line, site),
        }
    }
}

/// A set of coverage units.
///
/// Used both for the static universe of a target and for the units hit so
/// far; within one guesser session the hit map only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageMap {
    units: BTreeSet<CoverageUnit>,
}

impl CoverageMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of units in the map.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the map holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Whether the map contains a unit.
    pub fn contains(&self, unit: &CoverageUnit) -> bool {
        self.units.contains(unit)
    }

    /// Insert one unit; returns whether it was new.
    pub fn insert(&mut self, unit: CoverageUnit) -> bool {
        self.units.insert(unit)
    }

    /// Merge another map into this one.
    pub fn merge(&mut self, other: &CoverageMap) {
        self.units.extend(other.units.iter().cloned());
    }

    /// Remove every unit present in `other`.
    pub fn subtract(&mut self, other: &CoverageMap) {
        self.units.retain(|unit| !other.contains(unit));
    }

    /// Number of units shared with `other`.
    pub fn intersection_len(&self, other: &CoverageMap) -> usize {
        self.units.iter().filter(|unit| other.contains(unit)).count()
    }

    /// Whether every unit of this map appears in `other`.
    pub fn is_subset(&self, other: &CoverageMap) -> bool {
        self.units.iter().all(|unit| other.contains(unit))
    }

    /// The units of `universe` this map has not hit.
    pub fn missing_from(&self, universe: &CoverageMap) -> CoverageMap {
        let mut missing = universe.clone();
        missing.subtract(self);
        missing
    }

    /// Coverage percentage against a static universe.
    ///
    /// An empty universe counts as fully covered: there is nothing to miss.
    pub fn percent_of(&self, universe: &CoverageMap) -> f64 {
        if universe.is_empty() {
            return 100.0;
        }
        let missed = self.missing_from(universe).len();
        100.0 - (missed as f64 / universe.len() as f64) * 100.0
    }

    /// Iterate units in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &CoverageUnit> {
        self.units.iter()
    }
}

impl FromIterator<CoverageUnit> for CoverageMap {
    fn from_iter<I: IntoIterator<Item = CoverageUnit>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for CoverageMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, unit) in self.units.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", unit)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_display() {
        assert_eq!(CoverageUnit::line("h", 4).to_string(), "h:4");
        assert_eq!(CoverageUnit::site("h", 4, 2).to_string(), "h:4+2");
    }

    #[test]
    fn test_merge_and_missing() {
        let universe: CoverageMap = (0..4).map(|i| CoverageUnit::line("f", i)).collect();
        let mut hit = CoverageMap::new();
        hit.insert(CoverageUnit::line("f", 0));

        let mut delta = CoverageMap::new();
        delta.insert(CoverageUnit::line("f", 2));
        hit.merge(&delta);

        let missing = hit.missing_from(&universe);
        assert_eq!(missing.len(), 2);
        assert!(missing.contains(&CoverageUnit::line("f", 1)));
        assert!(missing.contains(&CoverageUnit::line("f", 3)));
    }

    #[test]
    fn test_percent() {
        let universe: CoverageMap = (0..4).map(|i| CoverageUnit::line("f", i)).collect();
        let hit: CoverageMap = (0..3).map(|i| CoverageUnit::line("f", i)).collect();
        assert_eq!(hit.percent_of(&universe), 75.0);

        let all: CoverageMap = (0..4).map(|i| CoverageUnit::line("f", i)).collect();
        assert_eq!(all.percent_of(&universe), 100.0);

        // Units outside the universe do not raise the percentage.
        let mut stray = all.clone();
        stray.insert(CoverageUnit::line("g", 1));
        assert_eq!(stray.percent_of(&universe), 100.0);

        assert_eq!(CoverageMap::new().percent_of(&CoverageMap::new()), 100.0);
    }

    #[test]
    fn test_intersection_len() {
        let a: CoverageMap = (0..5).map(|i| CoverageUnit::line("f", i)).collect();
        let b: CoverageMap = (3..8).map(|i| CoverageUnit::line("f", i)).collect();
        assert_eq!(a.intersection_len(&b), 2);
    }
}
