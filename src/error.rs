use thiserror::Error;

/// Errors that can abort a single generation pass.
///
/// None of these are fatal to the caller: a failed pass leaves the previously
/// generated output in place and the next change notification starts over.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("No block definition container found among the top-level blocks")]
    MissingRoot,

    #[error("Nothing to process")]
    EmptyInput,

    #[error("Type '{text}' is not a valid type name: {reason}")]
    MalformedTypeExpression { text: String, reason: String },

    #[error("Unknown format: {0}")]
    UnknownOutputFormat(String),

    #[error("Unknown target language: {0}")]
    UnknownLanguage(String),

    #[error("Invalid block schema: {0}")]
    InvalidSchema(String),

    #[error("Source text does not parse: {0}")]
    UnbalancedSource(String),

    #[error("Failed to serialize block schema: {0}")]
    Serialization(String),
}

impl GenerationError {
    /// Whether this error just means "nothing to do" rather than a failure.
    pub fn is_noop(&self) -> bool {
        matches!(self, GenerationError::MissingRoot | GenerationError::EmptyInput)
    }
}

/// Errors that can occur when converting an editor format into a `Workspace`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkspaceConversionError {
    #[error("Invalid editor data: {0}")]
    ValidationError(String),

    #[error("Block '{id}' has an unrecognized type: '{type_name}'")]
    UnknownBlockType { id: String, type_name: String },

    #[error("Slot '{slot}' of node {id} is already occupied")]
    SlotOccupied { id: usize, slot: String },
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
