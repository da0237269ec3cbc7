//! Dynamically-shaped values produced by generators and returned by targets.
//!
//! Generators synthesize values whose shape is only known at runtime, so the
//! whole engine speaks one closed [`Value`] enum. Every value carries a total
//! order and a hash (floats compare and hash by bit pattern via
//! `f64::total_cmp`), which lets any observed return value key the guesser's
//! return-value map and lets any value serve as a set element or mapping key.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single runtime value.
///
/// `Set` is kept canonically sorted and deduplicated, and `Map` is kept
/// sorted by key with later duplicate keys overwriting earlier ones, so that
/// structural equality matches logical set/mapping equality. Use
/// [`Value::set`] and [`Value::map`] to construct them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// The empty/none value.
    None,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number, including the inf/-inf/NaN special cases.
    Float(f64),
    /// A complex number.
    Complex { re: f64, im: f64 },
    /// An arithmetic progression with a non-zero step.
    Range { start: i64, stop: i64, step: i64 },
    /// A text string.
    Str(String),
    /// A byte sequence.
    Bytes(Vec<u8>),
    /// An ordered sequence.
    List(Vec<Value>),
    /// An unordered collection, stored sorted and deduplicated.
    Set(Vec<Value>),
    /// A key/value mapping, stored sorted by key.
    Map(Vec<(Value, Value)>),
    /// A fixed-arity tuple.
    Tuple(Vec<Value>),
}

impl Value {
    /// Build a canonical set value: elements are sorted and deduplicated.
    pub fn set(mut elements: Vec<Value>) -> Self {
        elements.sort();
        elements.dedup();
        Value::Set(elements)
    }

    /// Build a canonical mapping value.
    ///
    /// Later duplicate keys overwrite earlier ones, so the resulting mapping
    /// may be shorter than the input. Entries are stored sorted by key.
    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        let mut merged = BTreeMap::new();
        for (key, value) in entries {
            merged.insert(key, value);
        }
        Value::Map(merged.into_iter().collect())
    }

    /// The name of this value's kind, for type-level grouping in reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex { .. } => "complex",
            Value::Range { .. } => "range",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "dict",
            Value::Tuple(_) => "tuple",
        }
    }

    /// Whether this is the none value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// The number of elements for container values, `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::Bytes(b) => Some(b.len()),
            Value::List(v) | Value::Set(v) | Value::Tuple(v) => Some(v.len()),
            Value::Map(m) => Some(m.len()),
            _ => Option::None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::None => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Complex { .. } => 4,
            Value::Range { .. } => 5,
            Value::Str(_) => 6,
            Value::Bytes(_) => 7,
            Value::List(_) => 8,
            Value::Set(_) => 9,
            Value::Map(_) => 10,
            Value::Tuple(_) => 11,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::None, Value::None) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Complex { re: ar, im: ai }, Value::Complex { re: br, im: bi }) => {
                ar.total_cmp(br).then_with(|| ai.total_cmp(bi))
            }
            (
                Value::Range { start: a0, stop: a1, step: a2 },
                Value::Range { start: b0, stop: b1, step: b2 },
            ) => (a0, a1, a2).cmp(&(b0, b1, b2)),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (Value::Set(a), Value::Set(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.cmp(b),
            (Value::Tuple(a), Value::Tuple(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::None => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Complex { re, im } => {
                re.to_bits().hash(state);
                im.to_bits().hash(state);
            }
            Value::Range { start, stop, step } => {
                start.hash(state);
                stop.hash(state);
                step.hash(state);
            }
            Value::Str(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::List(v) | Value::Set(v) | Value::Tuple(v) => v.hash(state),
            Value::Map(m) => m.hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        write!(f, "nan")
    } else if v.is_infinite() {
        write!(f, "{}", if v > 0.0 { "inf" } else { "-inf" })
    } else if v == v.trunc() {
        write!(f, "{:.1}", v)
    } else {
        write!(f, "{}", v)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write_float(f, *v),
            Value::Complex { re, im } => {
                write!(f, "complex(")?;
                write_float(f, *re)?;
                write!(f, ", ")?;
                write_float(f, *im)?;
                write!(f, ")")
            }
            Value::Range { start, stop, step } => write!(f, "range({}, {}, {})", start, stop, step),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bytes(bytes) => {
                write!(f, "b\"")?;
                for byte in bytes {
                    if byte.is_ascii_graphic() || *byte == b' ' {
                        write!(f, "{}", *byte as char)?;
                    } else {
                        write!(f, "\\x{:02x}", byte)?;
                    }
                }
                write!(f, "\"")
            }
            Value::List(v) => {
                write!(f, "[")?;
                write_joined(f, v)?;
                write!(f, "]")
            }
            Value::Set(v) => {
                if v.is_empty() {
                    return write!(f, "set()");
                }
                write!(f, "{{")?;
                write_joined(f, v)?;
                write!(f, "}}")
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Tuple(v) => {
                write!(f, "(")?;
                write_joined(f, v)?;
                if v.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}
