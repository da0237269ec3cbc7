//! Resolution of textual type annotations into descriptors.
//!
//! The reflection boundary renders a host language's annotations into a
//! small textual grammar; this module parses that grammar into
//! [`TypeDescriptor`]s. Supported forms:
//!
//! ```text
//! bool  int  float  complex  str  bytes  range  None
//! list[T]  set[T]  dict[K, V]  tuple[A, B]  tuple[T, ...]
//! Optional[T]  Union[A, B]  A | B  A | None
//! Any  object  (empty string = unannotated)
//! ```
//!
//! `X | None` and `Union[X, None]` fold to `Optional[X]`. Anything the
//! grammar does not know fails with a [`ResolutionError`] before any
//! generation begins.

use guesswork_core::{PrimitiveKind, ResolutionError, TypeDescriptor};

/// Resolve one annotation into a descriptor.
pub fn resolve_annotation(annotation: &str) -> Result<TypeDescriptor, ResolutionError> {
    let trimmed = annotation.trim();
    if trimmed.is_empty() {
        return Ok(TypeDescriptor::any());
    }
    let tokens = lex(trimmed).map_err(|reason| ResolutionError::malformed(trimmed, reason))?;
    let mut parser = Parser {
        annotation: trimmed,
        tokens,
        pos: 0,
    };
    let descriptor = parser.parse_union()?;
    if parser.pos != parser.tokens.len() {
        return Err(parser.malformed("trailing tokens after type expression"));
    }
    Ok(descriptor)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    LBracket,
    RBracket,
    Comma,
    Pipe,
    Ellipsis,
}

fn lex(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '.' => {
                for _ in 0..3 {
                    if chars.next_if_eq(&'.').is_none() {
                        return Err("stray '.' (expected '...')".to_string());
                    }
                }
                tokens.push(Token::Ellipsis);
            }
            _ if c.is_whitespace() => {
                chars.next();
            }
            _ if c.is_alphanumeric() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            _ => return Err(format!("unexpected character {:?}", c)),
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    annotation: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn malformed(&self, reason: impl Into<String>) -> ResolutionError {
        ResolutionError::malformed(self.annotation, reason)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_union(&mut self) -> Result<TypeDescriptor, ResolutionError> {
        let mut alternatives = vec![self.parse_term()?];
        while self.peek() == Some(&Token::Pipe) {
            self.advance();
            alternatives.push(self.parse_term()?);
        }
        Ok(fold_union(alternatives))
    }

    fn parse_term(&mut self) -> Result<TypeDescriptor, ResolutionError> {
        let name = match self.advance() {
            Some(Token::Ident(name)) => name,
            Some(token) => return Err(self.malformed(format!("unexpected token {:?}", token))),
            None => return Err(self.malformed("unexpected end of annotation")),
        };

        let (args, trailing_ellipsis) = if self.peek() == Some(&Token::LBracket) {
            self.advance();
            self.parse_args()?
        } else {
            (Vec::new(), false)
        };

        if trailing_ellipsis && name != "tuple" && name != "Tuple" {
            return Err(self.malformed(format!("'...' is only valid inside tuple[], not {}[]", name)));
        }

        self.build(&name, args, trailing_ellipsis)
    }

    /// Parse the bracketed argument list after the '[' has been consumed.
    fn parse_args(&mut self) -> Result<(Vec<TypeDescriptor>, bool), ResolutionError> {
        let mut args = Vec::new();
        let mut trailing_ellipsis = false;
        loop {
            if self.peek() == Some(&Token::Ellipsis) {
                self.advance();
                trailing_ellipsis = true;
            } else {
                args.push(self.parse_union()?);
            }
            match self.advance() {
                Some(Token::Comma) => {
                    if trailing_ellipsis {
                        return Err(self.malformed("'...' must be the last tuple parameter"));
                    }
                }
                Some(Token::RBracket) => break,
                Some(token) => {
                    return Err(self.malformed(format!("unexpected token {:?}", token)))
                }
                None => return Err(self.malformed("unclosed '['")),
            }
        }
        Ok((args, trailing_ellipsis))
    }

    fn build(
        &self,
        name: &str,
        mut args: Vec<TypeDescriptor>,
        trailing_ellipsis: bool,
    ) -> Result<TypeDescriptor, ResolutionError> {
        let primitive_kind = match name {
            "bool" => Some(PrimitiveKind::Bool),
            "int" => Some(PrimitiveKind::Int),
            "float" => Some(PrimitiveKind::Float),
            "complex" => Some(PrimitiveKind::Complex),
            "str" => Some(PrimitiveKind::Str),
            "bytes" => Some(PrimitiveKind::Bytes),
            "range" => Some(PrimitiveKind::Range),
            "None" | "NoneType" => Some(PrimitiveKind::None),
            _ => None,
        };
        if let Some(kind) = primitive_kind {
            return if args.is_empty() {
                Ok(TypeDescriptor::Primitive(kind))
            } else {
                Err(self.malformed(format!("{} takes no parameters", name)))
            };
        }

        match name {
            "Any" | "object" => {
                if args.is_empty() {
                    Ok(TypeDescriptor::any())
                } else {
                    Err(self.malformed("Any takes no parameters"))
                }
            }
            "list" | "List" | "Iterable" => match args.len() {
                0 => Ok(TypeDescriptor::sequence(TypeDescriptor::any())),
                1 => Ok(TypeDescriptor::sequence(args.remove(0))),
                n => Err(self.malformed(format!("{} takes one parameter, got {}", name, n))),
            },
            "set" | "Set" | "frozenset" | "FrozenSet" => match args.len() {
                0 => Ok(TypeDescriptor::set(TypeDescriptor::any())),
                1 => Ok(TypeDescriptor::set(args.remove(0))),
                n => Err(self.malformed(format!("{} takes one parameter, got {}", name, n))),
            },
            "dict" | "Dict" | "Mapping" => match args.len() {
                0 => Ok(TypeDescriptor::mapping(
                    TypeDescriptor::any(),
                    TypeDescriptor::any(),
                )),
                2 => {
                    let value = args.remove(1);
                    let key = args.remove(0);
                    Ok(TypeDescriptor::mapping(key, value))
                }
                n => Err(self.malformed(format!("{} takes two parameters, got {}", name, n))),
            },
            "tuple" | "Tuple" => {
                if trailing_ellipsis {
                    if args.len() != 1 {
                        return Err(
                            self.malformed("tuple[T, ...] takes exactly one element type")
                        );
                    }
                    return Ok(TypeDescriptor::sequence(args.remove(0)));
                }
                if args.is_empty() {
                    return Ok(TypeDescriptor::sequence(TypeDescriptor::any()));
                }
                Ok(TypeDescriptor::tuple(args))
            }
            "Optional" => match args.len() {
                0 => Ok(TypeDescriptor::optional(TypeDescriptor::any())),
                1 => Ok(TypeDescriptor::optional(args.remove(0))),
                n => Err(self.malformed(format!("Optional takes one parameter, got {}", n))),
            },
            "Union" => {
                if args.is_empty() {
                    return Err(self.malformed("Union requires at least one parameter"));
                }
                Ok(fold_union(args))
            }
            other => Err(ResolutionError::UnknownType(other.to_string())),
        }
    }
}

/// Collapse union alternatives: a `None` member turns the union into an
/// `Optional`, and a single remaining alternative stands alone.
fn fold_union(alternatives: Vec<TypeDescriptor>) -> TypeDescriptor {
    let has_none = alternatives
        .iter()
        .any(|a| matches!(a, TypeDescriptor::Primitive(PrimitiveKind::None)));
    let mut rest: Vec<TypeDescriptor> = alternatives
        .into_iter()
        .filter(|a| !matches!(a, TypeDescriptor::Primitive(PrimitiveKind::None)))
        .collect();

    let inner = match rest.len() {
        0 => return TypeDescriptor::Primitive(PrimitiveKind::None),
        1 => rest.remove(0),
        _ => TypeDescriptor::union(rest),
    };

    if has_none {
        TypeDescriptor::optional(inner)
    } else {
        inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_primitives() {
        assert_eq!(resolve_annotation("int").unwrap().describe(), "int");
        assert_eq!(resolve_annotation(" str ").unwrap().describe(), "str");
        assert_eq!(resolve_annotation("None").unwrap().describe(), "None");
    }

    #[test]
    fn test_resolves_nested_containers() {
        let descriptor = resolve_annotation("dict[str, list[int]]").unwrap();
        assert_eq!(descriptor.describe(), "dict[str, list[int]]");

        let descriptor = resolve_annotation("tuple[int, str]").unwrap();
        assert_eq!(descriptor.describe(), "tuple[int, str]");
    }

    #[test]
    fn test_tuple_ellipsis_is_a_sequence() {
        let descriptor = resolve_annotation("tuple[int, ...]").unwrap();
        assert_eq!(descriptor.describe(), "list[int]");
    }

    #[test]
    fn test_unannotated_and_wildcards_resolve_to_any() {
        assert_eq!(resolve_annotation("").unwrap().describe(), "Any");
        assert_eq!(resolve_annotation("Any").unwrap().describe(), "Any");
        assert_eq!(resolve_annotation("object").unwrap().describe(), "Any");
        assert_eq!(resolve_annotation("list").unwrap().describe(), "list[Any]");
    }

    #[test]
    fn test_union_with_none_folds_to_optional() {
        assert_eq!(
            resolve_annotation("int | None").unwrap().describe(),
            "Optional[int]"
        );
        assert_eq!(
            resolve_annotation("Union[str, int, None]").unwrap().describe(),
            "Optional[Union[int, str]]"
        );
        assert_eq!(
            resolve_annotation("Optional[int]").unwrap().describe(),
            "Optional[int]"
        );
    }

    #[test]
    fn test_pipe_union() {
        assert_eq!(
            resolve_annotation("int | str | bool").unwrap().describe(),
            "Union[bool, int, str]"
        );
    }

    #[test]
    fn test_resolution_is_idempotent_via_describe() {
        for annotation in ["dict[str, set[int]]", "Union[int, str]", "Optional[list[float]]"] {
            let first = resolve_annotation(annotation).unwrap().describe();
            let second = resolve_annotation(annotation).unwrap().describe();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_unknown_type_fails() {
        assert!(matches!(
            resolve_annotation("widget"),
            Err(ResolutionError::UnknownType(name)) if name == "widget"
        ));
    }

    #[test]
    fn test_malformed_annotations_fail() {
        assert!(resolve_annotation("list[").is_err());
        assert!(resolve_annotation("dict[str]").is_err());
        assert!(resolve_annotation("int]").is_err());
        assert!(resolve_annotation("int extra").is_err());
        assert!(resolve_annotation("list[int, ...]").is_err());
        assert!(resolve_annotation("int[str]").is_err());
        assert!(resolve_annotation("tuple[..").is_err());
    }
}
