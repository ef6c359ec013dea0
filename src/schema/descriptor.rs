use super::number;
use crate::error::GenerationError;
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder help link every generated schema starts out with.
pub const DEFAULT_HELP_URL: &str = "http://www.example.com/";

/// Horizontal alignment of an input row. `Left` is the implicit default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Align {
    #[default]
    Left,
    Centre,
    Right,
}

impl Align {
    pub fn from_field(value: Option<&str>) -> Align {
        match value {
            Some("CENTRE") => Align::Centre,
            Some("RIGHT") => Align::Right,
            _ => Align::Left,
        }
    }

    pub fn is_left(&self) -> bool {
        *self == Align::Left
    }
}

/// A connection type constraint as it appears in the schema.
///
/// `Any` is written as `null`: the connection exists but accepts every type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Constraint {
    Any,
    One(String),
    Many(Vec<String>),
}

/// A field entry of `args0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldArg {
    #[serde(rename = "field_input")]
    Text { name: String, text: String },
    #[serde(rename = "field_number")]
    Number {
        name: String,
        #[serde(with = "number")]
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none", with = "number::option")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none", with = "number::option")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none", with = "number::option")]
        precision: Option<f64>,
    },
    #[serde(rename = "field_angle")]
    Angle {
        name: String,
        #[serde(with = "number")]
        angle: f64,
    },
    #[serde(rename = "field_checkbox")]
    Checkbox { name: String, checked: bool },
    #[serde(rename = "field_colour")]
    Colour { name: String, colour: String },
    #[serde(rename = "field_variable")]
    Variable {
        name: String,
        variable: Option<String>,
    },
    #[serde(rename = "field_dropdown")]
    Dropdown {
        name: String,
        options: Vec<(String, String)>,
    },
    #[serde(rename = "field_image")]
    Image {
        src: String,
        #[serde(with = "number")]
        width: f64,
        #[serde(with = "number")]
        height: f64,
        alt: String,
    },
    /// Static text. Never produced by the compiler (text goes into the
    /// message), but hand-written schemas may use it.
    #[serde(rename = "field_label")]
    Label {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        text: String,
    },
}

impl FieldArg {
    pub fn name(&self) -> Option<&str> {
        match self {
            FieldArg::Text { name, .. }
            | FieldArg::Number { name, .. }
            | FieldArg::Angle { name, .. }
            | FieldArg::Checkbox { name, .. }
            | FieldArg::Colour { name, .. }
            | FieldArg::Variable { name, .. }
            | FieldArg::Dropdown { name, .. } => Some(name),
            FieldArg::Label { name, .. } => name.as_deref(),
            FieldArg::Image { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    #[serde(rename = "input_dummy")]
    Dummy,
    #[serde(rename = "input_value")]
    Value,
    #[serde(rename = "input_statement")]
    Statement,
}

/// An input entry of `args0`. Dummy inputs carry no name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputArg {
    #[serde(rename = "type")]
    pub kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Align::is_left")]
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Field(FieldArg),
    Input(InputArg),
}

/// How the block connects to its neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Connections {
    #[default]
    None,
    Output(Option<Constraint>),
    Statement {
        previous: Option<Constraint>,
        next: Option<Constraint>,
    },
}

/// The declarative block schema.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockDescriptor {
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(
        rename = "lastDummyAlign0",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_dummy_align: Option<Align>,
    #[serde(rename = "message0", default)]
    pub message: String,
    #[serde(rename = "args0", default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Arg>,
    #[serde(rename = "inputsInline", default, skip_serializing_if = "Option::is_none")]
    pub inputs_inline: Option<bool>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub output: Option<Constraint>,
    #[serde(
        rename = "previousStatement",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_statement: Option<Constraint>,
    #[serde(
        rename = "nextStatement",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_statement: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<i64>,
    #[serde(default)]
    pub tooltip: String,
    #[serde(rename = "helpUrl", default)]
    pub help_url: String,
}

/// A key that is present always yields `Some`, even when its value is `null`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Constraint>, D::Error> {
    Constraint::deserialize(deserializer).map(Some)
}

impl BlockDescriptor {
    pub fn connections(&self) -> Connections {
        if self.output.is_some() {
            Connections::Output(self.output.clone())
        } else if self.previous_statement.is_some() || self.next_statement.is_some() {
            Connections::Statement {
                previous: self.previous_statement.clone(),
                next: self.next_statement.clone(),
            }
        } else {
            Connections::None
        }
    }

    pub fn set_connections(&mut self, connections: Connections) {
        let (output, previous, next) = match connections {
            Connections::None => (None, None, None),
            Connections::Output(output) => (output, None, None),
            Connections::Statement { previous, next } => (None, previous, next),
        };
        self.output = output;
        self.previous_statement = previous;
        self.next_statement = next;
    }

    /// Renders the schema as 2-space indented JSON.
    pub fn to_json(&self) -> Result<String, GenerationError> {
        serde_json::to_string_pretty(self).map_err(|e| GenerationError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, GenerationError> {
        serde_json::from_str(json).map_err(|e| GenerationError::InvalidSchema(e.to_string()))
    }
}
