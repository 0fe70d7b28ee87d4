//! Decree-core - Callable descriptors and signature inference
//!
//! This crate provides:
//! - The value and type-hint model shared with callables
//! - Declaration-time function descriptors
//! - Docstring parsing into short/long help and per-parameter help
//! - Signature inspection into argument specs

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod docstring;
pub mod error;
pub mod function;
pub mod signature;
pub mod value;

pub use docstring::DocInfo;
pub use error::{Error, Result};
pub use function::{Arguments, Body, Function, ParamKind, Parameter};
pub use signature::{ArgKind, ArgumentSpec, Signature};
pub use value::{PrimitiveType, TypeHint, Value};
