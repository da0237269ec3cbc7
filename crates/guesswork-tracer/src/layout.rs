//! Static coverage layouts: the universe of units a target can reach.
//!
//! A target declares its reachable lines and instruction sites once; the
//! tracer derives the mode-specific unit universe from that declaration and
//! caches it. Percentages are only meaningful against this universe.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use guesswork_core::ConfigurationError;

use crate::unit::{CoverageMap, CoverageMode, CoverageUnit};

/// Declared coverage shape of one function.
///
/// `with_site` declares an instruction site and implies its line;
/// `with_line` declares a line with no instruction detail. A function with
/// lines but no sites supports line-granularity tracing only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionLayout {
    name: String,
    lines: BTreeSet<u32>,
    sites: BTreeSet<(u32, u32)>,
}

impl FunctionLayout {
    /// Creates an empty layout for a function.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: BTreeSet::new(),
            sites: BTreeSet::new(),
        }
    }

    /// The function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a reachable line.
    pub fn with_line(mut self, line: u32) -> Self {
        self.lines.insert(line);
        self
    }

    /// Declare an instruction site, implying its line.
    pub fn with_site(mut self, line: u32, site: u32) -> Self {
        self.lines.insert(line);
        self.sites.insert((line, site));
        self
    }

    /// Declare several instruction sites on one line.
    pub fn with_sites(mut self, line: u32, sites: impl IntoIterator<Item = u32>) -> Self {
        self.lines.insert(line);
        for site in sites {
            self.sites.insert((line, site));
        }
        self
    }

    /// Whether this function declares any instruction sites.
    pub fn has_sites(&self) -> bool {
        !self.sites.is_empty()
    }

    /// Whether this function declares anything at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The declared coverage shape of a whole target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageLayout {
    functions: Vec<FunctionLayout>,
}

impl CoverageLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function's layout.
    pub fn with_function(mut self, function: FunctionLayout) -> Self {
        self.functions.push(function);
        self
    }

    /// The declared functions.
    pub fn functions(&self) -> &[FunctionLayout] {
        &self.functions
    }

    /// Derive the unit universe for a coverage mode.
    ///
    /// In instruction mode, a function that declares lines but no sites
    /// cannot be traced at that granularity; the caller decides whether to
    /// fail or degrade (see the tracer's `UniverseFallback`).
    pub fn units(&self, mode: CoverageMode) -> Result<CoverageMap, ConfigurationError> {
        let mut units = CoverageMap::new();
        for function in &self.functions {
            match mode {
                CoverageMode::Line => {
                    for &line in &function.lines {
                        units.insert(CoverageUnit::line(&function.name, line));
                    }
                }
                CoverageMode::Instruction => {
                    if !function.has_sites() && !function.is_empty() {
                        return Err(ConfigurationError::MissingInstrumentation(
                            function.name.clone(),
                        ));
                    }
                    for &(line, site) in &function.sites {
                        units.insert(CoverageUnit::site(&function.name, line, site));
                    }
                }
            }
        }
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sites_imply_lines() {
        let layout = CoverageLayout::new()
            .with_function(FunctionLayout::new("h").with_sites(4, [0, 1, 2]));

        let lines = layout.units(CoverageMode::Line).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines.contains(&CoverageUnit::line("h", 4)));

        let sites = layout.units(CoverageMode::Instruction).unwrap();
        assert_eq!(sites.len(), 3);
        assert!(sites.contains(&CoverageUnit::site("h", 4, 2)));
    }

    #[test]
    fn test_instruction_universe_needs_sites() {
        let layout = CoverageLayout::new()
            .with_function(FunctionLayout::new("f").with_line(1).with_line(2));

        assert!(layout.units(CoverageMode::Line).is_ok());
        assert!(matches!(
            layout.units(CoverageMode::Instruction),
            Err(ConfigurationError::MissingInstrumentation(name)) if name == "f"
        ));
    }

    #[test]
    fn test_empty_layout_yields_empty_universe() {
        let layout = CoverageLayout::new();
        assert!(layout.units(CoverageMode::Instruction).unwrap().is_empty());
        assert!(layout.units(CoverageMode::Line).unwrap().is_empty());
    }
}
