//! Named action groups and the dispatch registry.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::action::Action;
use crate::client::{CliError, CliResult};

/// A named grouping of related actions.
pub(crate) struct Command {
    name: &'static str,
    description: &'static str,
    actions: BTreeMap<&'static str, Box<dyn Action>>,
}

impl Command {
    pub(crate) fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            actions: BTreeMap::new(),
        }
    }

    /// Register an action under this command.
    pub(crate) fn action(mut self, name: &'static str, action: Box<dyn Action>) -> Self {
        assert!(
            self.actions.insert(name, action).is_none(),
            "duplicate action '{name}' in command '{}'",
            self.name
        );
        self
    }

    fn action_names(&self) -> Vec<&'static str> {
        self.actions.keys().copied().collect()
    }

    fn usage(&self) -> String {
        let mut text = format!("Usage: curator {} <action> [options]\n\nActions:\n", self.name);
        for (name, action) in &self.actions {
            let _ = writeln!(text, "  {name:<14} {}", action.description());
        }
        text
    }
}

/// Resolves `(command, action)` names to a single action.
#[derive(Default)]
pub(crate) struct Registry {
    commands: BTreeMap<&'static str, Command>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(mut self, command: Command) -> Self {
        assert!(
            self.commands.insert(command.name, command).is_none(),
            "duplicate command registration"
        );
        self
    }

    /// Resolve an action, reporting the valid names when either level of
    /// the lookup fails.
    pub(crate) fn resolve(&self, command: &str, action: &str) -> CliResult<&dyn Action> {
        let found = self.commands.get(command).ok_or_else(|| {
            CliError::NotFound(format!(
                "unknown command '{command}' (expected one of: {})",
                self.command_names().join(", ")
            ))
        })?;
        found
            .actions
            .get(action)
            .map(AsRef::as_ref)
            .ok_or_else(|| {
                CliError::NotFound(format!(
                    "unknown action '{action}' for command '{command}' (expected one of: {})",
                    found.action_names().join(", ")
                ))
            })
    }

    /// Usage text for one command, or a not-found error naming the valid
    /// commands.
    pub(crate) fn command_usage(&self, command: &str) -> CliResult<String> {
        self.commands
            .get(command)
            .map(Command::usage)
            .ok_or_else(|| {
                CliError::NotFound(format!(
                    "unknown command '{command}' (expected one of: {})",
                    self.command_names().join(", ")
                ))
            })
    }

    /// Top-level usage text listing every command.
    pub(crate) fn usage(&self) -> String {
        let mut text = String::from("Usage: curator <command> <action> [options]\n\nCommands:\n");
        for (name, command) in &self.commands {
            let _ = writeln!(text, "  {name:<14} {}", command.description);
            let _ = writeln!(text, "  {:<14}   actions: {}", "", command.action_names().join(", "));
        }
        text
    }

    fn command_names(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ParsedOptions, ParserBuilder};
    use crate::client::{AppContext, ExitStatus};
    use crate::validate::Validator;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Action for Noop {
        fn description(&self) -> &'static str {
            "does nothing"
        }

        fn configure(&self, _parser: &mut ParserBuilder) {}

        fn check_options(&self, _validator: &mut Validator) {}

        async fn run(&self, _ctx: &AppContext, _options: &ParsedOptions) -> CliResult<ExitStatus> {
            Ok(ExitStatus::Success)
        }
    }

    fn registry() -> Registry {
        Registry::new().register(
            Command::new("changeset", "changeset actions")
                .action("list", Box::new(Noop))
                .action("promote", Box::new(Noop)),
        )
    }

    #[test]
    fn resolves_registered_actions() {
        let registry = registry();
        let action = registry.resolve("changeset", "list").expect("resolve");
        assert_eq!(action.description(), "does nothing");
    }

    #[test]
    fn unknown_command_lists_valid_names() {
        let err = registry().resolve("bogus", "list").err().expect("unknown");
        assert!(matches!(
            err,
            CliError::NotFound(message)
                if message.contains("bogus") && message.contains("changeset")
        ));
    }

    #[test]
    fn unknown_action_lists_the_commands_actions() {
        let err = registry().resolve("changeset", "bogus").err().expect("unknown");
        assert!(matches!(
            err,
            CliError::NotFound(message)
                if message.contains("bogus") && message.contains("list") && message.contains("promote")
        ));
    }

    #[test]
    fn command_usage_names_each_action() {
        let text = registry().command_usage("changeset").expect("usage");
        assert!(text.contains("list"));
        assert!(text.contains("does nothing"));
    }
}
