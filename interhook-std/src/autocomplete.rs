//! Autocomplete route keys.
//!
//! An autocomplete route is identified by the path from the command down to
//! the option being typed into: `command[:group][:sub]:option`. The same
//! string is produced from two directions:
//!
//! - at registration, by walking a [`CommandDefinition`] with
//!   [`AutocompleteKeyBuilder`], which rejects paths the command cannot have;
//! - at dispatch, by [`resolve_focused_path`] following the live event's
//!   option chain down to the focused option.

use interhook_core::{
    CommandDefinition, CommandOption, OptionDefinition, OptionType, ResolveError, RouteError,
};
use std::fmt;
use std::sync::Arc;

/// Separator between path segments.
pub const SEPARATOR: &str = ":";

/// A validated autocomplete route key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AutocompleteKey(String);

impl AutocompleteKey {
    /// The colon-joined path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning the path.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AutocompleteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AutocompleteKey> for String {
    fn from(key: AutocompleteKey) -> Self {
        key.0
    }
}

/// Walks a command definition to build an [`AutocompleteKey`].
///
/// Returned by command registration. Each step checks that the named child
/// exists at the current level and has the expected option type.
///
/// Keys always start with the command name, so the same option name under
/// two commands never collides: `search:query` for a flat command,
/// `admin:user:ban:reason` through a group and sub-command. Keys passed to
/// `route(RouteKind::Autocomplete, ..)` by hand must use the same form.
///
/// ```rust,ignore
/// let key = registry
///     .command(definition, handlers![run])?
///     .sub_command_group("user")?
///     .sub_command("ban")?
///     .option("reason")?;
/// registry.autocomplete(key, handlers![suggest_reasons])?;
/// ```
#[derive(Debug, Clone)]
pub struct AutocompleteKeyBuilder {
    command: Arc<CommandDefinition>,
    segments: Vec<String>,
    cursor: Vec<usize>,
}

impl AutocompleteKeyBuilder {
    /// Start at the root of a command.
    pub fn new(command: Arc<CommandDefinition>) -> Self {
        let segments = vec![command.name.clone()];
        Self {
            command,
            segments,
            cursor: Vec::new(),
        }
    }

    /// The command this builder walks.
    pub fn command(&self) -> &CommandDefinition {
        &self.command
    }

    /// Descend into a sub-command group.
    pub fn sub_command_group(self, name: &str) -> Result<Self, RouteError> {
        self.descend(name, |t| t == OptionType::SubCommandGroup)
    }

    /// Descend into a sub-command.
    pub fn sub_command(self, name: &str) -> Result<Self, RouteError> {
        self.descend(name, |t| t == OptionType::SubCommand)
    }

    /// Finish at a string, integer or number option.
    pub fn option(self, name: &str) -> Result<AutocompleteKey, RouteError> {
        let leaf = self.descend(name, OptionType::supports_autocomplete)?;
        Ok(AutocompleteKey(leaf.joined()))
    }

    fn options(&self) -> &[OptionDefinition] {
        let mut options = self.command.options.as_slice();
        for &index in &self.cursor {
            options = options[index].options.as_slice();
        }
        options
    }

    fn descend(
        mut self,
        name: &str,
        accepts: impl Fn(OptionType) -> bool,
    ) -> Result<Self, RouteError> {
        let found = self
            .options()
            .iter()
            .position(|o| o.name == name && accepts(o.option_type));

        match found {
            Some(index) => {
                self.cursor.push(index);
                self.segments.push(name.to_owned());
                Ok(self)
            }
            None => Err(RouteError::InvalidAutocompletePath {
                segment: name.to_owned(),
                path: self.joined(),
            }),
        }
    }

    fn joined(&self) -> String {
        self.segments.join(SEPARATOR)
    }
}

/// Resolve the route key of a live autocomplete event.
///
/// Walks `options` depth-first. The first focused option ends the walk;
/// options carrying nested options contribute their name to the path.
pub fn resolve_focused_path(
    command_name: &str,
    options: &[CommandOption],
) -> Result<String, ResolveError> {
    let mut path = vec![command_name];
    if find_focused(options, &mut path) {
        Ok(path.join(SEPARATOR))
    } else {
        Err(ResolveError::NoFocusedOption {
            command: command_name.to_owned(),
        })
    }
}

fn find_focused<'a>(options: &'a [CommandOption], path: &mut Vec<&'a str>) -> bool {
    for option in options {
        if option.focused {
            path.push(&option.name);
            return true;
        }
        if !option.options.is_empty() {
            path.push(&option.name);
            if find_focused(&option.options, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}
