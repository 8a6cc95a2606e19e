//! Output renderers: terminal table and JSON.

pub mod json;
pub mod terminal;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::UserRecord;

/// Trait for rendering a user listing to an output format.
pub trait OutputRenderer {
    /// Render users to a string.
    fn render(&self, users: &[UserRecord]) -> String;
}

/// Selectable output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, aligned table.
    #[default]
    Terminal,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Renderer for this format.
    pub fn renderer(self) -> Box<dyn OutputRenderer> {
        match self {
            OutputFormat::Terminal => Box::new(terminal::TerminalRenderer),
            OutputFormat::Json => Box::new(json::JsonRenderer),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Terminal => write!(f, "terminal"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" | "table" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format: '{other}'. Supported: terminal, json")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_aliases() {
        assert_eq!("TABLE".parse::<OutputFormat>().unwrap(), OutputFormat::Terminal);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn renderer_matches_format() {
        let empty = OutputFormat::Json.renderer().render(&[]);
        assert!(empty.contains("\"count\": 0"));
        let empty = OutputFormat::Terminal.renderer().render(&[]);
        assert!(empty.contains("No users found"));
    }
}
