//! Round-trip input for the preview pass.
//!
//! The preview accepts either a block schema (JSON) or hand-written generator
//! source. A schema is registered in an isolated copy of the block registry
//! and rendered into a [`BlockInstance`]; source text is only checked for
//! balanced delimiters and handed back untouched.

use crate::error::GenerationError;
use crate::render::{BlockInstance, BlockRegistry};
use crate::schema::BlockDescriptor;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PreviewFormat {
    /// Block schema text.
    #[default]
    #[serde(rename = "JSON")]
    Json,
    /// Target language source defining the block.
    #[serde(alias = "JavaScript")]
    Source,
    /// Schema if it parses as JSON, source otherwise.
    Manual,
}

impl FromStr for PreviewFormat {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(PreviewFormat::Json),
            "source" | "javascript" => Ok(PreviewFormat::Source),
            "manual" => Ok(PreviewFormat::Manual),
            _ => Err(GenerationError::UnknownOutputFormat(s.to_string())),
        }
    }
}

/// What the preview pass produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Block(BlockInstance),
    /// Source text, accepted as is.
    Source(String),
    /// The schema defines nothing the registry does not already have.
    Unchanged,
}

/// Runs one preview pass over `code`.
///
/// The registry is left exactly as it was, whether the pass succeeds or not.
pub fn render_preview(
    code: &str,
    format: PreviewFormat,
    registry: &mut BlockRegistry,
) -> Result<Preview, GenerationError> {
    if code.trim().is_empty() {
        return Err(GenerationError::EmptyInput);
    }

    let format = match format {
        PreviewFormat::Manual => {
            if serde_json::from_str::<serde_json::Value>(code).is_ok() {
                PreviewFormat::Json
            } else {
                PreviewFormat::Source
            }
        }
        other => other,
    };

    match format {
        PreviewFormat::Json => {
            let descriptor = BlockDescriptor::from_json(code)?;
            let mut scope = registry.isolate();
            scope.register(descriptor);
            let Some(block_type) = scope.changed_types().first().map(|t| t.to_string()) else {
                debug!("schema redefines nothing, skipping preview");
                return Ok(Preview::Unchanged);
            };
            let descriptor = scope
                .get(&block_type)
                .ok_or_else(|| GenerationError::InvalidSchema(block_type.clone()))?;
            let mut instance = BlockInstance::from_descriptor(descriptor)?;
            // A schema without a type is previewed under the name it was registered as.
            instance.block_type = block_type;
            Ok(Preview::Block(instance))
        }
        PreviewFormat::Source => {
            check_balanced(code)?;
            Ok(Preview::Source(code.to_string()))
        }
        PreviewFormat::Manual => Err(GenerationError::UnknownOutputFormat("Manual".to_string())),
    }
}

/// Checks that brackets in C-like source pair up, ignoring string literals
/// and comments.
pub fn check_balanced(code: &str) -> Result<(), GenerationError> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut chars = code.chars().enumerate().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '"' | '\'' | '`' => {
                let mut closed = false;
                while let Some((_, s)) = chars.next() {
                    if s == '\\' {
                        chars.next();
                    } else if s == c {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(GenerationError::UnbalancedSource(format!(
                        "unterminated string starting at {}",
                        pos
                    )));
                }
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                for (_, s) in chars.by_ref() {
                    if s == '\n' {
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut prev = '\0';
                let mut closed = false;
                for (_, s) in chars.by_ref() {
                    if prev == '*' && s == '/' {
                        closed = true;
                        break;
                    }
                    prev = s;
                }
                if !closed {
                    return Err(GenerationError::UnbalancedSource(format!(
                        "unterminated comment starting at {}",
                        pos
                    )));
                }
            }
            '(' | '[' | '{' => stack.push((c, pos)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    _ => {
                        return Err(GenerationError::UnbalancedSource(format!(
                            "unexpected '{}' at {}",
                            c, pos
                        )));
                    }
                }
            }
            _ => {}
        }
    }

    match stack.pop() {
        Some((open, pos)) => Err(GenerationError::UnbalancedSource(format!(
            "'{}' at {} is never closed",
            open, pos
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_source_passes() {
        let code = "Blockly.Blocks['x'] = { init: function() { this.setColour(\"}\"); } }; // )";
        assert!(check_balanced(code).is_ok());
        assert!(check_balanced("/* ( */ f(1)").is_ok());
    }

    #[test]
    fn unbalanced_source_fails() {
        assert!(check_balanced("f(1").is_err());
        assert!(check_balanced("f(1]").is_err());
        assert!(check_balanced("'open").is_err());
        assert!(check_balanced("/* open").is_err());
    }

    #[test]
    fn format_names() {
        assert_eq!("JSON".parse::<PreviewFormat>().unwrap(), PreviewFormat::Json);
        assert_eq!("JavaScript".parse::<PreviewFormat>().unwrap(), PreviewFormat::Source);
        assert!(matches!(
            "XML".parse::<PreviewFormat>(),
            Err(GenerationError::UnknownOutputFormat(_))
        ));
    }
}
