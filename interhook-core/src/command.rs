//! Command definition tree.
//!
//! This is the serialisable output of a command schema builder, in the shape
//! the platform expects when commands are uploaded. Routing only reads it:
//! autocomplete keys are validated against the option tree.

use crate::interaction::OptionType;
use serde::{Deserialize, Serialize};

/// A top-level application command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    /// Command name, also its route key.
    pub name: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Options, sub-commands or sub-command groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDefinition>,
}

impl CommandDefinition {
    /// Create a command without options.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Append an option.
    pub fn option(mut self, option: OptionDefinition) -> Self {
        self.options.push(option);
        self
    }

    /// Find a direct child option by name.
    pub fn child(&self, name: &str) -> Option<&OptionDefinition> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// One node of a command's option tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDefinition {
    /// Option name.
    pub name: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Option type.
    #[serde(rename = "type")]
    pub option_type: OptionType,
    /// Whether the user must supply the option.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Whether the option asks the application for suggestions.
    #[serde(default, skip_serializing_if = "is_false")]
    pub autocomplete: bool,
    /// Nested options (sub-commands and groups only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDefinition>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl OptionDefinition {
    /// Create an option of the given type.
    pub fn new(
        option_type: OptionType,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            option_type,
            required: false,
            autocomplete: false,
            options: Vec::new(),
        }
    }

    /// String option.
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionType::String, name, description)
    }

    /// Integer option.
    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionType::Integer, name, description)
    }

    /// Floating point option.
    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionType::Number, name, description)
    }

    /// Sub-command.
    pub fn sub_command(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionType::SubCommand, name, description)
    }

    /// Sub-command group.
    pub fn sub_command_group(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionType::SubCommandGroup, name, description)
    }

    /// Mark the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Enable autocomplete for the option.
    pub fn autocomplete(mut self) -> Self {
        self.autocomplete = true;
        self
    }

    /// Append a nested option.
    pub fn option(mut self, option: OptionDefinition) -> Self {
        self.options.push(option);
        self
    }

    /// Find a direct child option by name.
    pub fn child(&self, name: &str) -> Option<&OptionDefinition> {
        self.options.iter().find(|o| o.name == name)
    }
}
