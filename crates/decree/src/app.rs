//! Application entry point
//!
//! An [`App`] owns one [`Registry`] and the [`AppConfig`] it renders help
//! with. Registration happens once at startup; afterwards the registry is
//! only read, for one parse-then-dispatch cycle per process.

use std::ffi::OsString;

use decree_core::Function;

use crate::cli::dispatch::{dispatch, Dispatched};
use crate::cli::parse::{parse_tokens, ParsedInput};
use crate::cli::build_cli;
use crate::config::AppConfig;
use crate::registry::Registry;

#[derive(Debug, Default)]
pub struct App {
    config: AppConfig,
    registry: Registry,
}

impl App {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register `function` as a command named after its identifier
    ///
    /// # Errors
    ///
    /// Returns error on name/alias collisions or an invalid signature
    pub fn command<I, S>(&mut self, function: Function, aliases: I) -> decree_core::Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.register_command(function, aliases)?;
        Ok(self)
    }

    /// Register `function` as a command under an explicit name
    ///
    /// # Errors
    ///
    /// Returns error on name/alias collisions or an invalid signature
    pub fn command_as<I, S>(
        &mut self,
        name: &str,
        function: Function,
        aliases: I,
    ) -> decree_core::Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.register_command_as(name, function, aliases)?;
        Ok(self)
    }

    /// Register `function` as an action of `command`
    ///
    /// # Errors
    ///
    /// Returns error if the command is unknown, the identifier has no
    /// separator, or a name/alias collides within the command's actions
    pub fn action<I, S>(
        &mut self,
        command: &str,
        function: Function,
        aliases: I,
    ) -> decree_core::Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.register_action(command, function, aliases)?;
        Ok(self)
    }

    /// Mount `child` as a command group; its description becomes the group help
    ///
    /// # Errors
    ///
    /// Returns error if `name` is already taken in the command namespace
    pub fn mount(&mut self, name: &str, child: Self) -> decree_core::Result<&mut Self> {
        let Self { config, registry } = child;
        self.registry.mount(name, config.description, registry)?;
        Ok(self)
    }

    /// The clap grammar for everything registered so far
    #[must_use]
    pub fn grammar(&self) -> clap::Command {
        build_cli(&self.registry, &self.config)
    }

    /// Parse `tokens` (program name first) without dispatching
    ///
    /// # Errors
    ///
    /// Returns clap's usage error for malformed input
    pub fn parse_from<I, T>(&self, tokens: I) -> Result<ParsedInput, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        parse_tokens(&self.registry, self.grammar(), tokens)
    }

    /// Parse `tokens` (program name first) and dispatch
    ///
    /// # Errors
    ///
    /// Returns the clap usage error, `CommandNotFound`, or whatever the
    /// invoked callable returned
    pub fn try_run_from<I, T>(&self, tokens: I) -> anyhow::Result<Dispatched>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let input = self.parse_from(tokens)?;
        dispatch(&self.registry, input)
    }

    /// Parse the process arguments and dispatch
    ///
    /// Usage errors, `--help` and `--version` are handled by clap, which
    /// prints and exits.
    ///
    /// # Errors
    ///
    /// Returns `CommandNotFound` or whatever the invoked callable returned
    pub fn run(&self) -> anyhow::Result<Dispatched> {
        let input = self
            .parse_from(std::env::args_os())
            .unwrap_or_else(|err| err.exit());
        dispatch(&self.registry, input)
    }
}
