use std::collections::HashMap;

pub mod config;
pub mod cooldown;
pub mod home;
pub mod record;
pub mod reset;
pub mod settings;
pub mod stats;
pub mod system;

use crate::cli::core::{CommandError, CommandResult, ShellContext};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(home::definitions());
    commands.extend(record::definitions());
    commands.extend(cooldown::definitions());
    commands.extend(stats::definitions());
    commands.extend(settings::definitions());
    commands.extend(config::definitions());
    commands.extend(reset::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    /// Completion candidates per argument position.
    pub arguments: Vec<Vec<&'static str>>,
}

impl CommandDefinition {
    pub fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Vec<&'static str>>) -> Self {
        self.arguments = arguments;
        self
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|definition| definition.handler)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Parses a whole number, accepting `12,000` and `12_000` groupings.
pub(crate) fn parse_number<T: std::str::FromStr>(
    raw: &str,
    what: &str,
) -> Result<T, CommandError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_'))
        .collect();
    cleaned
        .parse()
        .map_err(|_| {
            CommandError::InvalidArguments(format!("`{}` is not a valid {}.", raw, what))
        })
}
