use crate::error::GenerationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The languages a generator stub can be written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetLanguage {
    #[default]
    JavaScript,
    Python,
    #[serde(rename = "PHP")]
    Php,
    Dart,
    Lua,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 5] = [
        TargetLanguage::JavaScript,
        TargetLanguage::Python,
        TargetLanguage::Php,
        TargetLanguage::Dart,
        TargetLanguage::Lua,
    ];

    /// The generator's name for the language, as used in `Blockly.<name>`.
    pub fn name(&self) -> &'static str {
        match self {
            TargetLanguage::JavaScript => "JavaScript",
            TargetLanguage::Python => "Python",
            TargetLanguage::Php => "PHP",
            TargetLanguage::Dart => "Dart",
            TargetLanguage::Lua => "Lua",
        }
    }

    /// What ends a statement in generated code. New languages must be added here.
    pub fn statement_terminator(&self) -> &'static str {
        match self {
            TargetLanguage::JavaScript | TargetLanguage::Php | TargetLanguage::Dart => ";",
            TargetLanguage::Python | TargetLanguage::Lua => "",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetLanguage {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetLanguage::ALL
            .into_iter()
            .find(|lang| lang.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GenerationError::UnknownLanguage(s.to_string()))
    }
}
