//! Command registry
//!
//! Owns every registered command, the per-command action sets and the alias
//! maps. Populated once at start-up, read-only during dispatch.
//!
//! Two independent namespaces exist per registry:
//! - the command namespace (command names, command aliases, mounted group names)
//! - one action namespace per command (action names and action aliases)

use std::collections::{BTreeSet, HashMap};

use decree_core::{DocInfo, Error, Function, Result, Signature};

/// Separator between the command prefix and the action name in an action's identifier
pub const ACTION_SEPARATOR: char = '_';

const COMMAND_SCOPE: &str = "command";

/// Stable handle of a command inside its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(usize);

/// A top-level operation bound to one callable
#[derive(Debug)]
pub struct Command {
    id: CommandId,
    name: String,
    aliases: BTreeSet<String>,
    function: Function,
    signature: Signature,
    doc: DocInfo,
}

/// A second-level operation nested under a command
#[derive(Debug)]
pub struct Action {
    name: String,
    aliases: BTreeSet<String>,
    function: Function,
    signature: Signature,
    doc: DocInfo,
    owner: CommandId,
}

/// A child registry mounted under a name
#[derive(Debug)]
pub struct Group {
    name: String,
    description: Option<String>,
    registry: Registry,
}

/// Anything the dispatcher can invoke
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Command(&'a Command),
    Action(&'a Action),
}

#[derive(Debug, Default)]
struct ActionSet {
    actions: Vec<Action>,
    names: HashMap<String, usize>,
}

/// Registry of commands, actions and mounted groups
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<Command>,
    command_names: HashMap<String, CommandId>,
    actions: HashMap<CommandId, ActionSet>,
    groups: Vec<Group>,
}

macro_rules! impl_callable {
    ($ty:ty) => {
        impl $ty {
            /// Primary name
            #[must_use]
            pub fn name(&self) -> &str {
                &self.name
            }

            #[must_use]
            pub const fn aliases(&self) -> &BTreeSet<String> {
                &self.aliases
            }

            #[must_use]
            pub const fn function(&self) -> &Function {
                &self.function
            }

            #[must_use]
            pub const fn signature(&self) -> &Signature {
                &self.signature
            }

            #[must_use]
            pub const fn doc(&self) -> &DocInfo {
                &self.doc
            }
        }
    };
}

impl_callable!(Command);
impl_callable!(Action);

impl Command {
    #[must_use]
    pub const fn id(&self) -> CommandId {
        self.id
    }
}

impl Action {
    /// Non-owning link to the command this action belongs to
    #[must_use]
    pub const fn owner(&self) -> CommandId {
        self.owner
    }
}

impl Group {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl<'a> Target<'a> {
    #[must_use]
    pub fn name(&self) -> &'a str {
        match self {
            Self::Command(c) => c.name(),
            Self::Action(a) => a.name(),
        }
    }

    #[must_use]
    pub const fn function(&self) -> &'a Function {
        match self {
            Self::Command(c) => c.function(),
            Self::Action(a) => a.function(),
        }
    }

    #[must_use]
    pub const fn signature(&self) -> &'a Signature {
        match self {
            Self::Command(c) => c.signature(),
            Self::Action(a) => a.signature(),
        }
    }
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing registered and nothing mounted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.groups.is_empty()
    }

    /// Register `function` as a command named after its identifier
    pub fn register_command<I, S>(&mut self, function: Function, aliases: I) -> Result<&Command>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = function.name().to_string();
        self.register_command_as(name, function, aliases)
    }

    /// Register `function` as a command under an explicit name
    pub fn register_command_as<I, S>(
        &mut self,
        name: impl Into<String>,
        function: Function,
        aliases: I,
    ) -> Result<&Command>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let aliases: BTreeSet<String> = aliases.into_iter().map(Into::into).collect();

        if self.name_taken(&name) {
            return Err(Error::NameCollision {
                name,
                scope: COMMAND_SCOPE.to_string(),
            });
        }
        if let Some(alias) = aliases
            .iter()
            .find(|a| **a == name || self.name_taken(a))
        {
            return Err(Error::AliasCollision {
                alias: alias.clone(),
                scope: COMMAND_SCOPE.to_string(),
            });
        }

        let doc = DocInfo::parse(function.docstring());
        let signature = Signature::inspect(&function, &doc.params)?;

        let id = CommandId(self.commands.len());
        self.command_names.insert(name.clone(), id);
        for alias in &aliases {
            self.command_names.insert(alias.clone(), id);
        }

        tracing::debug!(
            command = %name,
            aliases = ?aliases,
            forwards = signature.forwards(),
            "registered command"
        );

        self.commands.push(Command {
            id,
            name,
            aliases,
            function,
            signature,
            doc,
        });
        Ok(&self.commands[id.0])
    }

    /// Register `function` as an action of `command`.
    ///
    /// The action name is the function identifier with its prefix token
    /// stripped: `list_foo` becomes `foo`.
    pub fn register_action<I, S>(
        &mut self,
        command: &str,
        function: Function,
        aliases: I,
    ) -> Result<&Action>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let owner = self
            .resolve_command(command)
            .map(Command::id)
            .ok_or_else(|| Error::CommandNotFound(command.to_string()))?;
        let owner_name = self.commands[owner.0].name.clone();

        let name = action_name(function.name())?;
        let aliases: BTreeSet<String> = aliases.into_iter().map(Into::into).collect();
        let scope = format!("'{owner_name}' action");

        let taken = |key: &str| {
            self.actions
                .get(&owner)
                .is_some_and(|set| set.names.contains_key(key))
        };
        if taken(&name) {
            return Err(Error::NameCollision { name, scope });
        }
        if let Some(alias) = aliases.iter().find(|a| **a == name || taken(a.as_str())) {
            return Err(Error::AliasCollision {
                alias: alias.clone(),
                scope,
            });
        }

        let doc = DocInfo::parse(function.docstring());
        let signature = Signature::inspect(&function, &doc.params)?;

        let set = self.actions.entry(owner).or_default();
        let index = set.actions.len();
        set.names.insert(name.clone(), index);
        for alias in &aliases {
            set.names.insert(alias.clone(), index);
        }

        tracing::debug!(
            command = %owner_name,
            action = %name,
            aliases = ?aliases,
            forwards = signature.forwards(),
            "registered action"
        );

        set.actions.push(Action {
            name,
            aliases,
            function,
            signature,
            doc,
            owner,
        });
        Ok(&set.actions[index])
    }

    /// Mount a child registry as a group of commands under `name`
    pub fn mount(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
        registry: Self,
    ) -> Result<()> {
        let name = name.into();
        if self.name_taken(&name) {
            return Err(Error::NameCollision {
                name,
                scope: COMMAND_SCOPE.to_string(),
            });
        }
        tracing::debug!(group = %name, commands = registry.commands.len(), "mounted group");
        self.groups.push(Group {
            name,
            description,
            registry,
        });
        Ok(())
    }

    /// Alias-transparent command lookup
    #[must_use]
    pub fn resolve_command(&self, name: &str) -> Option<&Command> {
        self.command_names
            .get(name)
            .map(|id| &self.commands[id.0])
    }

    /// Alias-transparent action lookup within one command
    #[must_use]
    pub fn resolve_action(&self, command: &Command, name: &str) -> Option<&Action> {
        let set = self.actions.get(&command.id)?;
        set.names.get(name).map(|i| &set.actions[*i])
    }

    /// Resolve a command, or one of its actions when `action` is given
    pub fn resolve(&self, command: &str, action: Option<&str>) -> Result<Target<'_>> {
        let cmd = self
            .resolve_command(command)
            .ok_or_else(|| Error::CommandNotFound(command.to_string()))?;
        match action {
            None => Ok(Target::Command(cmd)),
            Some(action) => self
                .resolve_action(cmd, action)
                .map(Target::Action)
                .ok_or_else(|| Error::CommandNotFound(format!("{} {action}", cmd.name))),
        }
    }

    /// Commands in declaration order
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Actions of `command` in declaration order
    #[must_use]
    pub fn actions_of(&self, command: &Command) -> &[Action] {
        self.actions
            .get(&command.id)
            .map_or(&[], |set| set.actions.as_slice())
    }

    #[must_use]
    pub fn has_actions(&self, command: &Command) -> bool {
        !self.actions_of(command).is_empty()
    }

    /// Command an action belongs to
    #[must_use]
    pub fn owner(&self, action: &Action) -> Option<&Command> {
        self.commands.get(action.owner.0)
    }

    /// All actions registered next to `action`, itself included
    #[must_use]
    pub fn siblings(&self, action: &Action) -> &[Action] {
        self.owner(action)
            .map_or(&[], |command| self.actions_of(command))
    }

    /// Mounted groups in declaration order
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    fn name_taken(&self, name: &str) -> bool {
        self.command_names.contains_key(name) || self.group(name).is_some()
    }
}

/// Derive an action name from a function identifier
pub fn action_name(identifier: &str) -> Result<String> {
    match identifier.split_once(ACTION_SEPARATOR) {
        Some((prefix, rest)) if !prefix.is_empty() && !rest.is_empty() => Ok(rest.to_string()),
        _ => Err(Error::MalformedActionName(identifier.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use decree_core::{Parameter, TypeHint, Value};

    use super::*;

    fn noop(name: &str) -> Function {
        Function::new(name, |_| Ok(Value::None))
    }

    #[test]
    fn test_alias_resolves_to_same_instance() {
        let mut registry = Registry::new();
        registry.register_command(noop("list"), ["ls", "l"]).unwrap();

        let by_name = registry.resolve_command("list").unwrap();
        for alias in ["ls", "l"] {
            let by_alias = registry.resolve_command(alias).unwrap();
            assert!(std::ptr::eq(by_name, by_alias));
        }
        assert_eq!(registry.commands().len(), 1);
        assert!(registry.resolve_command("missing").is_none());
    }

    #[test]
    fn test_duplicate_command_name_is_rejected() {
        let mut registry = Registry::new();
        registry.register_command(noop("list"), Vec::<String>::new()).unwrap();
        let err = registry
            .register_command(noop("list"), Vec::<String>::new())
            .unwrap_err();
        assert!(matches!(err, Error::NameCollision { ref name, .. } if name == "list"));
        assert_eq!(registry.commands().len(), 1);
    }

    #[test]
    fn test_alias_collisions_are_rejected_atomically() {
        let mut registry = Registry::new();
        registry.register_command(noop("list"), ["ls"]).unwrap();

        let err = registry.register_command(noop("show"), ["s", "ls"]).unwrap_err();
        assert!(matches!(err, Error::AliasCollision { ref alias, .. } if alias == "ls"));
        assert!(registry.resolve_command("s").is_none());
        assert!(registry.resolve_command("show").is_none());

        let err = registry.register_command(noop("show"), ["list"]).unwrap_err();
        assert!(matches!(err, Error::AliasCollision { .. }));

        let err = registry.register_command(noop("show"), ["show"]).unwrap_err();
        assert!(matches!(err, Error::AliasCollision { .. }));
    }

    #[test]
    fn test_primary_name_cannot_reuse_alias() {
        let mut registry = Registry::new();
        registry.register_command(noop("list"), ["ls"]).unwrap();
        let err = registry.register_command(noop("ls"), Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::NameCollision { .. }));
    }

    #[test]
    fn test_register_command_as_overrides_identifier() {
        let mut registry = Registry::new();
        let cmd = registry
            .register_command_as("run", noop("run_impl"), Vec::<String>::new())
            .unwrap();
        assert_eq!(cmd.name(), "run");
        assert_eq!(cmd.function().name(), "run_impl");
    }

    #[test]
    fn test_action_name_strips_prefix() {
        assert_eq!(action_name("list_foo").unwrap(), "foo");
        assert_eq!(action_name("list_foo_bar").unwrap(), "foo_bar");
        assert!(matches!(action_name("list"), Err(Error::MalformedActionName(_))));
        assert!(action_name("list_").is_err());
        assert!(action_name("_foo").is_err());
    }

    #[test]
    fn test_actions_keep_declaration_order_and_owner() {
        let mut registry = Registry::new();
        registry.register_command(noop("queue"), Vec::<String>::new()).unwrap();
        registry.register_action("queue", noop("queue_list"), ["ls"]).unwrap();
        registry.register_action("queue", noop("queue_add"), Vec::<String>::new()).unwrap();
        registry.register_action("queue", noop("queue_drop"), Vec::<String>::new()).unwrap();

        let queue = registry.resolve_command("queue").unwrap();
        let names: Vec<_> = registry.actions_of(queue).iter().map(Action::name).collect();
        assert_eq!(names, ["list", "add", "drop"]);
        assert!(registry.has_actions(queue));

        let list = registry.resolve_action(queue, "ls").unwrap();
        assert_eq!(list.name(), "list");
        assert_eq!(registry.owner(list).map(Command::name), Some("queue"));
        assert_eq!(registry.siblings(list).len(), 3);
    }

    #[test]
    fn test_action_namespace_is_independent() {
        let mut registry = Registry::new();
        registry.register_command(noop("list"), Vec::<String>::new()).unwrap();
        registry.register_command(noop("foo"), Vec::<String>::new()).unwrap();
        registry.register_action("list", noop("list_foo"), Vec::<String>::new()).unwrap();

        match registry.resolve("list", Some("foo")).unwrap() {
            Target::Action(action) => assert_eq!(action.name(), "foo"),
            Target::Command(_) => panic!("expected the action"),
        }
        assert!(matches!(
            registry.resolve("foo", None).unwrap(),
            Target::Command(c) if c.name() == "foo"
        ));
    }

    #[test]
    fn test_action_collisions() {
        let mut registry = Registry::new();
        registry.register_command(noop("queue"), Vec::<String>::new()).unwrap();
        registry.register_action("queue", noop("queue_list"), ["ls"]).unwrap();

        assert!(matches!(
            registry.register_action("queue", noop("other_list"), Vec::<String>::new()),
            Err(Error::NameCollision { .. })
        ));
        assert!(matches!(
            registry.register_action("queue", noop("queue_show"), ["ls"]),
            Err(Error::AliasCollision { .. })
        ));
        assert!(matches!(
            registry.register_action("nope", noop("nope_list"), Vec::<String>::new()),
            Err(Error::CommandNotFound(_))
        ));
        assert!(matches!(
            registry.register_action("queue", noop("queue"), Vec::<String>::new()),
            Err(Error::MalformedActionName(_))
        ));
    }

    #[test]
    fn test_action_registration_through_command_alias() {
        let mut registry = Registry::new();
        registry.register_command(noop("queue"), ["q"]).unwrap();
        let action = registry.register_action("q", noop("queue_list"), Vec::<String>::new()).unwrap();
        assert_eq!(action.name(), "list");
    }

    #[test]
    fn test_resolve_unknown_names() {
        let mut registry = Registry::new();
        registry.register_command(noop("queue"), Vec::<String>::new()).unwrap();
        assert!(matches!(registry.resolve("nope", None), Err(Error::CommandNotFound(_))));
        assert!(matches!(
            registry.resolve("queue", Some("nope")),
            Err(Error::CommandNotFound(ref path)) if path == "queue nope"
        ));
    }

    #[test]
    fn test_mount_shares_command_namespace() {
        let mut child = Registry::new();
        child.register_command(noop("upper"), Vec::<String>::new()).unwrap();

        let mut registry = Registry::new();
        registry.register_command(noop("greet"), Vec::<String>::new()).unwrap();
        assert!(matches!(
            registry.mount("greet", None, Registry::new()),
            Err(Error::NameCollision { .. })
        ));
        registry.mount("text", Some("Text tools".to_string()), child).unwrap();

        let group = registry.group("text").unwrap();
        assert_eq!(group.description(), Some("Text tools"));
        assert!(group.registry().resolve_command("upper").is_some());
        assert!(matches!(
            registry.register_command(noop("text"), Vec::<String>::new()),
            Err(Error::NameCollision { .. })
        ));
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_signature_cached_at_registration() {
        let mut registry = Registry::new();
        let func = noop("add")
            .doc("Add numbers.\n\nParameters\n----------\nvalues\n    numbers to add\n")
            .param(Parameter::new("values").typed(TypeHint::list(TypeHint::Float)));
        let cmd = registry.register_command(func, Vec::<String>::new()).unwrap();
        assert_eq!(cmd.doc().short.as_deref(), Some("Add numbers."));
        assert_eq!(cmd.signature().args()[0].help.as_deref(), Some("numbers to add"));
    }

    #[test]
    fn test_invalid_signature_is_not_registered() {
        let mut registry = Registry::new();
        let func = noop("bad").param(Parameter::new("x")).param(Parameter::new("x"));
        assert!(registry.register_command(func, Vec::<String>::new()).is_err());
        assert!(registry.resolve_command("bad").is_none());
    }

    #[test]
    fn test_failed_first_action_leaves_no_action_set() {
        let mut registry = Registry::new();
        registry.register_command(noop("queue"), Vec::<String>::new()).unwrap();
        let id = registry.resolve_command("queue").unwrap().id();

        let bad = noop("queue_add").param(Parameter::new("x")).param(Parameter::new("x"));
        assert!(registry.register_action("queue", bad, Vec::<String>::new()).is_err());
        assert!(!registry.actions.contains_key(&id));

        assert!(registry
            .register_action("queue", noop("queue_add"), ["add"])
            .is_err());
        assert!(!registry.actions.contains_key(&id));
        assert!(!registry.has_actions(registry.resolve_command("queue").unwrap()));
    }
}
