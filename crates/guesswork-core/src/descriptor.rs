//! Abstract type descriptors.
//!
//! A [`TypeDescriptor`] is a closed, composable description of a value's
//! shape: pure data with no behavior. The generator crate turns descriptors
//! into value synthesizers; this module only defines the grammar, canonical
//! rendering, and structural validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ConfigurationError;

/// Default recursion depth for wildcard (`Any`) descriptors.
pub const DEFAULT_ANY_DEPTH: u32 = 5;

/// Default length bounds for container descriptors, inclusive.
pub const DEFAULT_CONTAINER_MIN_LEN: usize = 0;
pub const DEFAULT_CONTAINER_MAX_LEN: usize = 16;

/// The leaf kinds a descriptor can bottom out at.
///
/// Every primitive is depth-safe: it may be chosen when a recursion budget
/// reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Bool,
    Int,
    Float,
    Complex,
    Str,
    Bytes,
    None,
    Range,
}

impl PrimitiveKind {
    /// All primitive kinds, in canonical order.
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Int,
        PrimitiveKind::Float,
        PrimitiveKind::Complex,
        PrimitiveKind::Str,
        PrimitiveKind::Bytes,
        PrimitiveKind::None,
        PrimitiveKind::Range,
    ];

    /// Canonical display name.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Complex => "complex",
            PrimitiveKind::Str => "str",
            PrimitiveKind::Bytes => "bytes",
            PrimitiveKind::None => "None",
            PrimitiveKind::Range => "range",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A closed, immutable description of a value's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeDescriptor {
    /// A leaf kind.
    Primitive(PrimitiveKind),
    /// An ordered sequence with inclusive length bounds.
    Sequence {
        element: Box<TypeDescriptor>,
        min_len: usize,
        max_len: usize,
    },
    /// An unordered, deduplicated collection with inclusive length bounds.
    Set {
        element: Box<TypeDescriptor>,
        min_len: usize,
        max_len: usize,
    },
    /// A key/value mapping with inclusive length bounds.
    ///
    /// The sampled length is an upper bound on the mapping's size: duplicate
    /// keys overwrite, which is expected and not an error.
    Mapping {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
        min_len: usize,
        max_len: usize,
    },
    /// A fixed-arity tuple, one descriptor per position.
    Tuple(Vec<TypeDescriptor>),
    /// Either the inner shape or the none value.
    Optional(Box<TypeDescriptor>),
    /// Exactly one of the alternatives.
    Union(Vec<TypeDescriptor>),
    /// An unresolved wildcard: a concrete descriptor is sampled at
    /// generation time, with nesting bounded by `max_depth`.
    Any { max_depth: u32 },
}

impl TypeDescriptor {
    /// A sequence with the default length bounds.
    pub fn sequence(element: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence {
            element: Box::new(element),
            min_len: DEFAULT_CONTAINER_MIN_LEN,
            max_len: DEFAULT_CONTAINER_MAX_LEN,
        }
    }

    /// A set with the default length bounds.
    pub fn set(element: TypeDescriptor) -> Self {
        TypeDescriptor::Set {
            element: Box::new(element),
            min_len: DEFAULT_CONTAINER_MIN_LEN,
            max_len: DEFAULT_CONTAINER_MAX_LEN,
        }
    }

    /// A mapping with the default length bounds.
    pub fn mapping(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Mapping {
            key: Box::new(key),
            value: Box::new(value),
            min_len: DEFAULT_CONTAINER_MIN_LEN,
            max_len: DEFAULT_CONTAINER_MAX_LEN,
        }
    }

    /// A fixed-arity tuple.
    pub fn tuple(elements: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Tuple(elements)
    }

    /// An optional wrapper around `inner`.
    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Optional(Box::new(inner))
    }

    /// A union of the given alternatives.
    pub fn union(alternatives: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Union(alternatives)
    }

    /// A wildcard with the default recursion depth.
    pub fn any() -> Self {
        TypeDescriptor::Any {
            max_depth: DEFAULT_ANY_DEPTH,
        }
    }

    /// A wildcard with an explicit recursion depth.
    pub fn any_with_depth(max_depth: u32) -> Self {
        TypeDescriptor::Any { max_depth }
    }

    /// Canonical, deterministic textual rendering.
    ///
    /// Union alternatives render sorted and deduplicated, so two resolutions
    /// of the same specification always render identically.
    pub fn describe(&self) -> String {
        match self {
            TypeDescriptor::Primitive(kind) => kind.name().to_string(),
            TypeDescriptor::Sequence { element, .. } => format!("list[{}]", element.describe()),
            TypeDescriptor::Set { element, .. } => format!("set[{}]", element.describe()),
            TypeDescriptor::Mapping { key, value, .. } => {
                format!("dict[{}, {}]", key.describe(), value.describe())
            }
            TypeDescriptor::Tuple(elements) => {
                if elements.is_empty() {
                    return "tuple[()]".to_string();
                }
                let rendered: Vec<String> = elements.iter().map(|e| e.describe()).collect();
                format!("tuple[{}]", rendered.join(", "))
            }
            TypeDescriptor::Optional(inner) => format!("Optional[{}]", inner.describe()),
            TypeDescriptor::Union(alternatives) => {
                let rendered: BTreeSet<String> =
                    alternatives.iter().map(|a| a.describe()).collect();
                format!(
                    "Union[{}]",
                    rendered.into_iter().collect::<Vec<_>>().join(", ")
                )
            }
            TypeDescriptor::Any { .. } => "Any".to_string(),
        }
    }

    /// Structural nesting depth: primitives and wildcards are 0, every
    /// container/wrapper level adds one.
    pub fn depth(&self) -> u32 {
        match self {
            TypeDescriptor::Primitive(_) | TypeDescriptor::Any { .. } => 0,
            TypeDescriptor::Sequence { element, .. } | TypeDescriptor::Set { element, .. } => {
                1 + element.depth()
            }
            TypeDescriptor::Mapping { key, value, .. } => 1 + key.depth().max(value.depth()),
            TypeDescriptor::Tuple(elements) => {
                1 + elements.iter().map(|e| e.depth()).max().unwrap_or(0)
            }
            TypeDescriptor::Optional(inner) => 1 + inner.depth(),
            TypeDescriptor::Union(alternatives) => {
                1 + alternatives.iter().map(|a| a.depth()).max().unwrap_or(0)
            }
        }
    }

    /// Check well-formedness of this descriptor and all of its children.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            TypeDescriptor::Primitive(_) | TypeDescriptor::Any { .. } => Ok(()),
            TypeDescriptor::Sequence { element, min_len, max_len }
            | TypeDescriptor::Set { element, min_len, max_len } => {
                check_len_bounds(*min_len, *max_len)?;
                element.validate()
            }
            TypeDescriptor::Mapping { key, value, min_len, max_len } => {
                check_len_bounds(*min_len, *max_len)?;
                key.validate()?;
                value.validate()
            }
            TypeDescriptor::Tuple(elements) => {
                for element in elements {
                    element.validate()?;
                }
                Ok(())
            }
            TypeDescriptor::Optional(inner) => inner.validate(),
            TypeDescriptor::Union(alternatives) => {
                if alternatives.is_empty() {
                    return Err(ConfigurationError::EmptyUnion);
                }
                for alternative in alternatives {
                    alternative.validate()?;
                }
                Ok(())
            }
        }
    }
}

fn check_len_bounds(min_len: usize, max_len: usize) -> Result<(), ConfigurationError> {
    if min_len > max_len {
        return Err(ConfigurationError::LengthBounds {
            min: min_len,
            max: max_len,
        });
    }
    Ok(())
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_containers() {
        let d = TypeDescriptor::mapping(
            TypeDescriptor::Primitive(PrimitiveKind::Str),
            TypeDescriptor::sequence(TypeDescriptor::Primitive(PrimitiveKind::Int)),
        );
        assert_eq!(d.describe(), "dict[str, list[int]]");
    }

    #[test]
    fn test_union_renders_sorted_and_deduplicated() {
        let d = TypeDescriptor::union(vec![
            TypeDescriptor::Primitive(PrimitiveKind::Str),
            TypeDescriptor::Primitive(PrimitiveKind::Int),
            TypeDescriptor::Primitive(PrimitiveKind::Str),
        ]);
        assert_eq!(d.describe(), "Union[int, str]");
    }

    #[test]
    fn test_depth() {
        assert_eq!(TypeDescriptor::Primitive(PrimitiveKind::Int).depth(), 0);
        let nested = TypeDescriptor::sequence(TypeDescriptor::mapping(
            TypeDescriptor::Primitive(PrimitiveKind::Str),
            TypeDescriptor::optional(TypeDescriptor::Primitive(PrimitiveKind::Int)),
        ));
        assert_eq!(nested.depth(), 3);
    }

    #[test]
    fn test_validate_rejects_bad_bounds() {
        let d = TypeDescriptor::Sequence {
            element: Box::new(TypeDescriptor::Primitive(PrimitiveKind::Int)),
            min_len: 5,
            max_len: 2,
        };
        assert!(matches!(
            d.validate(),
            Err(ConfigurationError::LengthBounds { min: 5, max: 2 })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_union() {
        assert!(matches!(
            TypeDescriptor::union(vec![]).validate(),
            Err(ConfigurationError::EmptyUnion)
        ));
    }

    #[test]
    fn test_validate_recurses_into_children() {
        let d = TypeDescriptor::optional(TypeDescriptor::Set {
            element: Box::new(TypeDescriptor::Primitive(PrimitiveKind::Int)),
            min_len: 3,
            max_len: 1,
        });
        assert!(d.validate().is_err());
    }
}
