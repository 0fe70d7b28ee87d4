//! Property-based tests for signature inference and docstring parsing.
//!
//! # Invariants tested:
//! - Catch-all collectors never produce argument specs
//! - Required iff no default, except bool flags which are never required
//! - Container annotations always infer repeated arguments
//! - Docstring parsing never fails, whatever the input
//!
//! Reproducible: set `PROPTEST_SEED` for deterministic runs

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::BTreeMap;

use decree_core::docstring::{parameter_docs, short_description};
use decree_core::{ArgKind, Function, Parameter, PrimitiveType, Signature, TypeHint, Value};
use proptest::prelude::*;

// ═══════════════════════════════════════════════════════════════════════════
// STRATEGIES
// ═══════════════════════════════════════════════════════════════════════════

fn scalar_hint() -> impl Strategy<Value = TypeHint> {
    prop_oneof![
        Just(TypeHint::Str),
        Just(TypeHint::Int),
        Just(TypeHint::Float),
        Just(TypeHint::Any),
    ]
}

fn container_hint() -> impl Strategy<Value = TypeHint> {
    (scalar_hint(), 0..3u8).prop_map(|(inner, which)| match which {
        0 => TypeHint::list(inner),
        1 => TypeHint::set(inner),
        _ => TypeHint::tuple(inner),
    })
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

fn noop(name: &str) -> Function {
    Function::new(name, |_| Ok(Value::None))
}

// ═══════════════════════════════════════════════════════════════════════════
// PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Property: a required scalar keeps its annotated primitive
    #[test]
    fn prop_required_scalar_keeps_primitive(name in identifier(), hint in scalar_hint()) {
        let func = noop("f").param(Parameter::new(name.clone()).typed(hint.clone()));
        let sig = Signature::inspect(&func, &BTreeMap::new()).unwrap();

        prop_assert_eq!(sig.args().len(), 1);
        let spec = &sig.args()[0];
        prop_assert_eq!(&spec.name, &name);
        prop_assert_eq!(spec.kind, ArgKind::Scalar);
        prop_assert_eq!(spec.primitive, hint.primitive());
        prop_assert!(spec.required);
        prop_assert!(sig.accepts(&name));
    }

    /// Property: container annotations always produce repeated arguments
    #[test]
    fn prop_container_is_repeated(hint in container_hint(), with_default in any::<bool>()) {
        let mut param = Parameter::new("items").typed(hint.clone());
        if with_default {
            param = param.default(Value::List(Vec::new()));
        }
        let sig = Signature::inspect(&noop("f").param(param), &BTreeMap::new()).unwrap();
        let spec = &sig.args()[0];

        prop_assert_eq!(spec.kind, ArgKind::Repeated);
        prop_assert_eq!(Some(spec.primitive), hint.element().map(TypeHint::primitive));
        prop_assert_eq!(spec.required, !with_default);
    }

    /// Property: integer defaults infer int and make the argument optional
    #[test]
    fn prop_int_default_is_optional(default in any::<i64>()) {
        let func = noop("f").param(Parameter::new("n").default(default));
        let sig = Signature::inspect(&func, &BTreeMap::new()).unwrap();
        let spec = &sig.args()[0];

        prop_assert_eq!(spec.primitive, PrimitiveType::Int);
        prop_assert!(!spec.required);
        prop_assert_eq!(spec.default.clone(), Some(Value::Int(default)));
    }

    /// Property: bool parameters are flags and never required
    #[test]
    fn prop_bool_is_never_required(default in proptest::option::of(any::<bool>())) {
        let mut param = Parameter::new("verbose").typed(TypeHint::Bool);
        if let Some(d) = default {
            param = param.default(d);
        }
        let sig = Signature::inspect(&noop("f").param(param), &BTreeMap::new()).unwrap();
        let spec = &sig.args()[0];

        prop_assert!(spec.is_flag());
        prop_assert!(!spec.required);
        prop_assert_eq!(spec.default.clone(), Some(Value::Bool(default.unwrap_or(false))));
    }

    /// Property: catch-alls contribute no specs; forwarding only for the pure shapes
    #[test]
    fn prop_catch_alls_never_materialize(names in proptest::collection::btree_set(identifier(), 0..4), kwargs in any::<bool>()) {
        let mut func = noop("f");
        for name in &names {
            func = func.param(Parameter::new(format!("p_{name}")));
        }
        func = func.param(Parameter::var_args("args"));
        if kwargs {
            func = func.param(Parameter::var_kwargs("kwargs"));
        }

        // Named parameters before `*args` are legal; they still make the callable non-forwarding.
        let sig = Signature::inspect(&func, &BTreeMap::new()).unwrap();
        prop_assert_eq!(sig.args().len(), names.len());
        prop_assert_eq!(sig.forwards(), names.is_empty());
        prop_assert!(!sig.accepts("args"));
    }

    /// Property: docstring parsing is total
    #[test]
    fn prop_docstring_parsing_never_panics(doc in "(?s).{0,200}") {
        let _ = short_description(Some(&doc));
        let docs = parameter_docs(Some(&doc));
        for key in docs.keys() {
            prop_assert!(!key.is_empty());
        }
    }

    /// Property: documented parameters round-trip through the parameter section
    #[test]
    fn prop_documented_parameter_is_found(name in identifier(), text in "[a-zA-Z][a-zA-Z ]{0,30}[a-zA-Z]") {
        let doc = format!("Summary.\n\nParameters\n----------\n{name}\n    {text}\n");
        let docs = parameter_docs(Some(&doc));
        prop_assert_eq!(docs.get(&name).map(String::as_str), Some(text.as_str()));
        prop_assert_eq!(short_description(Some(&doc)), Some("Summary.".to_string()));
    }
}
