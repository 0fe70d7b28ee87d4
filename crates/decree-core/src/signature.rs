//! Signature inspection
//!
//! Turns a [`Function`]'s parameter list into the argument descriptors the
//! grammar is built from. Runs once per callable, at registration.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::function::{Function, ParamKind, Parameter};
use crate::value::{PrimitiveType, Value};

/// Arity of a non-flag argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Single value
    Scalar,
    /// One or more values collected into a list
    Repeated,
}

/// Inferred command-line surface of one parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    pub name: String,
    pub kind: ArgKind,
    pub primitive: PrimitiveType,
    pub required: bool,
    pub default: Option<Value>,
    pub help: Option<String>,
}

impl ArgumentSpec {
    /// Zero-argument `--name` switch
    #[must_use]
    pub fn is_flag(&self) -> bool {
        self.primitive == PrimitiveType::Bool
    }

    #[must_use]
    pub fn is_repeated(&self) -> bool {
        self.kind == ArgKind::Repeated
    }
}

/// Everything the parser builder and dispatcher need to know about a callable
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    args: Vec<ArgumentSpec>,
    forwards: bool,
    parameters: BTreeSet<String>,
}

impl Signature {
    /// Derive argument specs from a function's parameters.
    ///
    /// Catch-all collectors never produce specs. A function whose whole
    /// parameter list is `*args` (optionally followed by `**kwargs`) is
    /// marked as forwarding.
    pub fn inspect(function: &Function, docs: &BTreeMap<String, String>) -> Result<Self> {
        let params = function.params();
        validate(function.name(), params)?;

        let args: Vec<ArgumentSpec> = params
            .iter()
            .filter(|p| !p.is_catch_all())
            .map(|p| argument_spec(p, docs))
            .collect();
        validate_positional_order(function.name(), &args)?;

        let kinds: Vec<ParamKind> = params.iter().map(Parameter::kind).collect();
        let forwards = matches!(
            kinds.as_slice(),
            [ParamKind::VarArgs] | [ParamKind::VarArgs, ParamKind::VarKwargs]
        );

        let parameters = params
            .iter()
            .filter(|p| !p.is_catch_all())
            .map(|p| p.name().to_string())
            .collect();

        tracing::trace!(
            function = function.name(),
            args = args.len(),
            forwards,
            "inspected signature"
        );

        Ok(Self {
            args,
            forwards,
            parameters,
        })
    }

    #[must_use]
    pub fn args(&self) -> &[ArgumentSpec] {
        &self.args
    }

    /// Receives raw leftover tokens instead of parsed keywords
    #[must_use]
    pub const fn forwards(&self) -> bool {
        self.forwards
    }

    /// Whether `name` is a declared (non catch-all) parameter
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        self.parameters.contains(name)
    }
}

fn argument_spec(param: &Parameter, docs: &BTreeMap<String, String>) -> ArgumentSpec {
    let default = param.default_value().cloned();
    let hint = param
        .annotation()
        .cloned()
        .or_else(|| default.as_ref().map(Value::type_hint));

    let (kind, primitive) = match hint {
        Some(hint) => match hint.element() {
            Some(element) => (ArgKind::Repeated, element.primitive()),
            None => (ArgKind::Scalar, hint.primitive()),
        },
        None => (ArgKind::Scalar, PrimitiveType::Untyped),
    };

    let help = docs.get(param.name()).cloned();

    if primitive == PrimitiveType::Bool {
        return ArgumentSpec {
            name: param.name().to_string(),
            kind: ArgKind::Scalar,
            primitive,
            required: false,
            default: Some(default.unwrap_or(Value::Bool(false))),
            help,
        };
    }

    ArgumentSpec {
        name: param.name().to_string(),
        kind,
        primitive,
        required: default.is_none(),
        default,
        help,
    }
}

fn validate(function: &str, params: &[Parameter]) -> Result<()> {
    let mut seen = BTreeSet::new();
    let mut var_args = false;
    let mut var_kwargs = false;

    for param in params {
        if !seen.insert(param.name()) {
            return Err(Error::invalid_signature(
                function,
                format!("duplicate parameter '{}'", param.name()),
            ));
        }
        if var_kwargs {
            return Err(Error::invalid_signature(
                function,
                format!("parameter '{}' follows the keyword catch-all", param.name()),
            ));
        }
        match param.kind() {
            ParamKind::VarArgs if var_args => {
                return Err(Error::invalid_signature(function, "more than one positional catch-all"));
            }
            ParamKind::VarArgs => var_args = true,
            ParamKind::VarKwargs => var_kwargs = true,
            ParamKind::Named if var_args => {
                return Err(Error::invalid_signature(
                    function,
                    format!("parameter '{}' follows the positional catch-all", param.name()),
                ));
            }
            ParamKind::Named => {}
        }
    }
    Ok(())
}

fn validate_positional_order(function: &str, args: &[ArgumentSpec]) -> Result<()> {
    let mut optional_seen: Option<&str> = None;
    let mut repeated_seen: Option<&str> = None;

    for arg in args.iter().filter(|a| !a.is_flag()) {
        if let Some(prev) = repeated_seen {
            return Err(Error::invalid_signature(
                function,
                format!("positional '{}' follows repeated '{prev}'", arg.name),
            ));
        }
        if arg.required {
            if let Some(prev) = optional_seen {
                return Err(Error::invalid_signature(
                    function,
                    format!("required '{}' follows optional '{prev}'", arg.name),
                ));
            }
        } else {
            optional_seen = Some(&arg.name);
        }
        if arg.is_repeated() {
            repeated_seen = Some(&arg.name);
        }
    }
    Ok(())
}
