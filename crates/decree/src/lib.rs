//! Decree - declarative command-line framework
//!
//! Register plain callables as commands, actions and groups; decree infers
//! the argument grammar from their signatures and docstrings, builds a clap
//! parser and dispatches the parsed line back to the right callable.
//!
//! ```text
//! <program> <command> [<action>] [args...]
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod registry;

pub use app::App;
pub use cli::dispatch::Dispatched;
pub use cli::parse::ParsedInput;
pub use config::{AppConfig, OutputFormat};
pub use error::{Error, Result};
pub use registry::{Action, Command, CommandId, Group, Registry, Target};
