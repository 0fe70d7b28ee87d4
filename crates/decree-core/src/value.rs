//! Runtime values and type hints

use std::fmt;

use itertools::Itertools;
use serde::Serialize;

/// A value flowing between the parser and a registered callable
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value
    None,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String
    Str(String),
    /// Ordered sequence
    List(Vec<Value>),
}

impl Value {
    /// Runtime type of this value, used when a parameter has a default but no annotation
    #[must_use]
    pub fn type_hint(&self) -> TypeHint {
        match self {
            Self::None => TypeHint::Any,
            Self::Bool(_) => TypeHint::Bool,
            Self::Int(_) => TypeHint::Int,
            Self::Float(_) => TypeHint::Float,
            Self::Str(_) => TypeHint::Str,
            Self::List(items) => TypeHint::list(items.first().map_or(TypeHint::Any, Self::type_hint)),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float view; integers widen
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::List(items) => write!(f, "[{}]", items.iter().join(", ")),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Declared type of a parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeHint {
    Str,
    Int,
    Float,
    Bool,
    /// Explicitly untyped
    Any,
    /// Ordered sequence of the inner type
    List(Box<TypeHint>),
    /// Unordered collection of the inner type
    Set(Box<TypeHint>),
    /// Homogeneous tuple of the inner type
    Tuple(Box<TypeHint>),
}

impl TypeHint {
    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    #[must_use]
    pub fn set(inner: Self) -> Self {
        Self::Set(Box::new(inner))
    }

    #[must_use]
    pub fn tuple(inner: Self) -> Self {
        Self::Tuple(Box::new(inner))
    }

    /// Element type if this is a container
    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        match self {
            Self::List(inner) | Self::Set(inner) | Self::Tuple(inner) => Some(inner),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_container(&self) -> bool {
        self.element().is_some()
    }

    /// Primitive used by the grammar. Containers map to untyped.
    #[must_use]
    pub const fn primitive(&self) -> PrimitiveType {
        match self {
            Self::Str => PrimitiveType::String,
            Self::Int => PrimitiveType::Int,
            Self::Float => PrimitiveType::Float,
            Self::Bool => PrimitiveType::Bool,
            Self::Any | Self::List(_) | Self::Set(_) | Self::Tuple(_) => PrimitiveType::Untyped,
        }
    }
}

/// Primitive type of a single command-line value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Int,
    Float,
    Bool,
    /// No type information; parsed as a string
    Untyped,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::Untyped => write!(f, "untyped"),
        }
    }
}
