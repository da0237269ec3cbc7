//! Declared parameters of a target callable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One declared parameter: a name plus a textual type annotation.
///
/// The annotation uses the grammar the generator factory resolves
/// (`"int"`, `"list[int]"`, `"Optional[str]"`, `"int | None"`, ...). An
/// empty annotation means the parameter is unannotated and resolves to the
/// wildcard type. The language-specific reflection collaborator is
/// responsible for rendering its native annotations into this form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub annotation: String,
}

impl Parameter {
    /// Creates a new parameter declaration.
    pub fn new(name: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: annotation.into(),
        }
    }

    /// Creates an unannotated parameter.
    pub fn unannotated(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    /// Whether this parameter carries no annotation.
    pub fn is_unannotated(&self) -> bool {
        self.annotation.trim().is_empty()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unannotated() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.annotation)
        }
    }
}
