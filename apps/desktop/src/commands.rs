//! Typed commands read from the terminal and mapped onto controller intents.

use std::str::FromStr;

use client_core::{draft::UnknownDraftField, DraftField};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    ToggleForm,
    Refresh,
    SetField { field: DraftField, value: String },
    Submit,
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'; type 'help' for the list")]
    Unknown(String),
    #[error("usage: set <name|superpower|score> <value>")]
    MissingField,
    #[error(transparent)]
    Field(#[from] UnknownDraftField),
}

impl ViewCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToggleForm => "toggle_form",
            Self::Refresh => "refresh",
            Self::SetField { .. } => "set_field",
            Self::Submit => "submit",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

impl FromStr for ViewCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest),
            None => (line.trim_end(), ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(CommandParseError::Empty),
            "new" | "cancel" | "toggle" | "n" => Ok(Self::ToggleForm),
            "refresh" | "sync" | "r" => Ok(Self::Refresh),
            "submit" | "deploy" | "s" => Ok(Self::Submit),
            "help" | "?" | "h" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "set" => {
                let rest = rest.trim_start();
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value),
                    None => (rest.trim_end(), ""),
                };
                if field.is_empty() {
                    return Err(CommandParseError::MissingField);
                }
                Ok(Self::SetField {
                    field: field.parse()?,
                    value: value.to_string(),
                })
            }
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}

pub const HELP: &str = "\
commands:
  new | cancel          open or close the new hero form
  set name <text>       fill in the hero name
  set superpower <text> fill in the superpower
  set score <number>    humility score, 1 to 10
  submit                deploy the hero in the form
  refresh               re-sync the hero list
  quit                  leave";
