//! Callable descriptors
//!
//! A [`Function`] is the declaration-time description of a plain function:
//! its identifier, docstring, ordered parameter list and body. Everything the
//! framework infers about the command line is derived from this description
//! once, at registration.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::value::{TypeHint, Value};

/// Body of a registered callable
pub type Body = Box<dyn Fn(Arguments) -> anyhow::Result<Value>>;

/// How a parameter collects its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Ordinary named parameter
    Named,
    /// Catch-all positional collector (`*args`)
    VarArgs,
    /// Catch-all keyword collector (`**kwargs`)
    VarKwargs,
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    kind: ParamKind,
    annotation: Option<TypeHint>,
    default: Option<Value>,
}

impl Parameter {
    /// Create a named parameter with no annotation and no default
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Named,
            annotation: None,
            default: None,
        }
    }

    /// Create a catch-all positional collector
    #[must_use]
    pub fn var_args(name: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::VarArgs,
            ..Self::new(name)
        }
    }

    /// Create a catch-all keyword collector
    #[must_use]
    pub fn var_kwargs(name: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::VarKwargs,
            ..Self::new(name)
        }
    }

    /// Attach a type annotation
    #[must_use]
    pub fn typed(mut self, hint: TypeHint) -> Self {
        self.annotation = Some(hint);
        self
    }

    /// Attach a default value
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    #[must_use]
    pub const fn annotation(&self) -> Option<&TypeHint> {
        self.annotation.as_ref()
    }

    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.kind != ParamKind::Named
    }
}

/// A plain function registered as a command or action
pub struct Function {
    name: String,
    doc: Option<String>,
    params: Vec<Parameter>,
    body: Body,
}

impl Function {
    /// Describe a function by its declared identifier and body
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(Arguments) -> anyhow::Result<Value> + 'static,
    {
        Self {
            name: name.into(),
            doc: None,
            params: Vec::new(),
            body: Box::new(body),
        }
    }

    /// Attach the docstring
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Append a parameter in declaration order
    #[must_use]
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn docstring(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    #[must_use]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Invoke the body. Errors are returned exactly as the body produced them.
    pub fn call(&self, args: Arguments) -> anyhow::Result<Value> {
        (self.body)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Arguments handed to a function body
///
/// Forwarding targets receive only `positional` (the leftover tokens);
/// everything else receives only `keywords`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<String>,
    keywords: BTreeMap<String, Value>,
}

impl Arguments {
    /// Raw tokens for a forwarding target
    #[must_use]
    pub const fn forwarded(tokens: Vec<String>) -> Self {
        Self {
            positional: tokens,
            keywords: BTreeMap::new(),
        }
    }

    /// Parsed keyword values for a regular target
    #[must_use]
    pub const fn keywords(keywords: BTreeMap<String, Value>) -> Self {
        Self {
            positional: Vec::new(),
            keywords,
        }
    }

    #[must_use]
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    #[must_use]
    pub const fn keyword_map(&self) -> &BTreeMap<String, Value> {
        &self.keywords
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.keywords.get(name)
    }

    pub fn str(&self, name: &str) -> Result<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| bad_argument(name, "a string"))
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        self.get(name)
            .and_then(Value::as_int)
            .ok_or_else(|| bad_argument(name, "an integer"))
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        self.get(name)
            .and_then(Value::as_float)
            .ok_or_else(|| bad_argument(name, "a number"))
    }

    pub fn list(&self, name: &str) -> Result<&[Value]> {
        self.get(name)
            .and_then(Value::as_list)
            .ok_or_else(|| bad_argument(name, "a list"))
    }

    /// Flag value; an absent flag reads as `false`
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }
}

fn bad_argument(name: &str, expected: &'static str) -> Error {
    Error::BadArgument {
        name: name.to_string(),
        expected,
    }
}
