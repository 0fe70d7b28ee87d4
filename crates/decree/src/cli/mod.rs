//! Grammar construction
//!
//! Builds a clap command tree from a [`Registry`]:
//!
//! ```text
//! <program> <command> [<action>] [args...]
//! <program> <group> <command> [<action>] [args...]
//! ```
//!
//! Parsing itself, usage rendering and usage errors are left to clap.

pub mod dispatch;
pub mod parse;

use clap::builder::ValueParser;
use clap::{Arg, ArgAction};
use decree_core::{ArgumentSpec, DocInfo, PrimitiveType, Signature};

use crate::config::AppConfig;
use crate::registry::{Action, Command, Registry};

/// Parsed-input key carrying the chosen command
pub const COMMAND_KEY: &str = "<command>";
/// Parsed-input key carrying the chosen action
pub const ACTION_KEY: &str = "<action>";
/// Parsed-input key carrying the chosen group path
pub const GROUP_KEY: &str = "<group>";
/// Name of clap's built-in help subcommand and flag
const HELP: &str = "help";
/// Id of the replacement `-h` flag when a parameter is named `help`
const HELP_ID: &str = "<help>";

/// Discriminator keys that never reach a callable
pub const BOOKKEEPING_KEYS: [&str; 3] = [GROUP_KEY, COMMAND_KEY, ACTION_KEY];

/// Build the full grammar for `registry`
pub fn build_cli(registry: &Registry, config: &AppConfig) -> clap::Command {
    let mut root = clap::Command::new(config.program.clone()).version(env!("CARGO_PKG_VERSION"));
    if let Some(description) = &config.description {
        root = root.about(description.clone());
    }
    let root = add_commands(root, registry, config);
    tracing::trace!(program = %config.program, "built grammar");
    root
}

fn add_commands(parent: clap::Command, registry: &Registry, config: &AppConfig) -> clap::Command {
    let mut parent = parent
        .subcommand_value_name("COMMAND")
        .subcommand_help_heading("Commands")
        .subcommand_required(!registry.is_empty())
        .disable_help_subcommand(
            registry.resolve_command(HELP).is_some() || registry.group(HELP).is_some(),
        );

    for command in registry.commands() {
        parent = parent.subcommand(cmd_command(command, registry, config));
    }
    for group in registry.groups() {
        let mut sub = clap::Command::new(group.name().to_string());
        if let Some(description) = group.description() {
            sub = sub.about(description.to_string());
        }
        parent = parent.subcommand(add_commands(sub, group.registry(), config));
    }
    parent
}

fn cmd_command(command: &Command, registry: &Registry, config: &AppConfig) -> clap::Command {
    let sub = named(command.name(), command.doc(), command.aliases().iter(), config);
    let actions = registry.actions_of(command);
    if actions.is_empty() {
        return leaf(sub, command.signature());
    }

    let help_taken = registry.resolve_action(command, HELP).is_some();
    actions.iter().fold(
        sub.subcommand_required(true)
            .subcommand_value_name("ACTION")
            .subcommand_help_heading("Actions")
            .disable_help_subcommand(help_taken),
        |sub, action| sub.subcommand(cmd_action(action, config)),
    )
}

fn cmd_action(action: &Action, config: &AppConfig) -> clap::Command {
    let sub = named(action.name(), action.doc(), action.aliases().iter(), config);
    leaf(sub, action.signature())
}

fn named<'a>(
    name: &str,
    doc: &DocInfo,
    aliases: impl Iterator<Item = &'a String>,
    config: &AppConfig,
) -> clap::Command {
    let aliases: Vec<String> = aliases.cloned().collect();
    let mut sub = clap::Command::new(name.to_string());
    if let Some(short) = &doc.short {
        sub = sub.about(short.clone());
    }
    if let Some(long) = &doc.long {
        sub = sub.long_about(long.clone());
    }
    if config.visible_aliases {
        sub.visible_aliases(aliases)
    } else {
        sub.aliases(aliases)
    }
}

/// Attach a signature's arguments to a leaf grammar node
///
/// A parameter named `help` takes over `--help`; help stays reachable as `-h`.
fn leaf(sub: clap::Command, signature: &Signature) -> clap::Command {
    let sub = signature
        .args()
        .iter()
        .fold(sub, |sub, spec| sub.arg(argument(spec)));

    if !signature.accepts(HELP) {
        return sub;
    }
    sub.disable_help_flag(true).arg(
        Arg::new(HELP_ID)
            .short('h')
            .action(ArgAction::Help)
            .help("Print help"),
    )
}

fn argument(spec: &ArgumentSpec) -> Arg {
    let mut arg = Arg::new(spec.name.clone());
    if let Some(help) = &spec.help {
        arg = arg.help(help.clone());
    }

    if spec.is_flag() {
        return arg.long(spec.name.clone()).action(ArgAction::SetTrue);
    }

    let arg = arg
        .value_parser(value_parser(spec.primitive))
        .required(spec.required);
    let arg = if matches!(spec.primitive, PrimitiveType::Int | PrimitiveType::Float) {
        arg.allow_negative_numbers(true)
    } else {
        arg
    };

    if spec.is_repeated() {
        let arg = arg.action(ArgAction::Append);
        if spec.required {
            arg.num_args(1..)
        } else {
            arg.num_args(0..)
        }
    } else {
        arg.action(ArgAction::Set)
    }
}

fn value_parser(primitive: PrimitiveType) -> ValueParser {
    match primitive {
        PrimitiveType::Int => clap::value_parser!(i64).into(),
        PrimitiveType::Float => clap::value_parser!(f64).into(),
        PrimitiveType::Bool => clap::value_parser!(bool).into(),
        PrimitiveType::String | PrimitiveType::Untyped => ValueParser::string(),
    }
}
