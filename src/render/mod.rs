//! Structural rendering of a block schema.
//!
//! This is the part of block loading the stub generator needs: which fields
//! end up on which input, in which order. Nothing here draws anything.

pub mod registry;

pub use registry::{BlockRegistry, IsolatedRegistry};

use crate::error::GenerationError;
use crate::schema::{Align, Arg, BlockDescriptor, Connections, Constraint, FieldArg, InputKind};

/// The kind of a rendered field.
///
/// Some kinds are specializations of others: an angle is a text input, a
/// variable picker is a dropdown. See [`FieldKind::specializes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Label,
    TextInput,
    Number,
    Angle,
    Checkbox,
    Colour,
    Dropdown,
    Variable,
    Image,
}

impl FieldKind {
    /// The more general kind this one is built on, if any.
    pub fn specializes(&self) -> Option<FieldKind> {
        match self {
            FieldKind::Number | FieldKind::Angle => Some(FieldKind::TextInput),
            FieldKind::Variable => Some(FieldKind::Dropdown),
            _ => None,
        }
    }

    /// True when `self` is `other` or a specialization of it.
    pub fn is_a(&self, other: FieldKind) -> bool {
        let mut current = Some(*self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.specializes();
        }
        false
    }

    fn of(arg: &FieldArg) -> FieldKind {
        match arg {
            FieldArg::Text { .. } => FieldKind::TextInput,
            FieldArg::Number { .. } => FieldKind::Number,
            FieldArg::Angle { .. } => FieldKind::Angle,
            FieldArg::Checkbox { .. } => FieldKind::Checkbox,
            FieldArg::Colour { .. } => FieldKind::Colour,
            FieldArg::Variable { .. } => FieldKind::Variable,
            FieldArg::Dropdown { .. } => FieldKind::Dropdown,
            FieldArg::Image { .. } => FieldKind::Image,
            FieldArg::Label { .. } => FieldKind::Label,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedField {
    pub name: Option<String>,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedInput {
    pub name: Option<String>,
    pub kind: InputKind,
    pub align: Align,
    pub check: Option<Constraint>,
    pub fields: Vec<RenderedField>,
}

/// A block instance built from a schema: its inputs in order, each with its
/// row of fields, plus which connections it has.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInstance {
    pub block_type: String,
    pub inputs: Vec<RenderedInput>,
    pub connections: Connections,
}

enum MessageToken {
    Text(String),
    Arg(usize),
}

/// Splits a message into text runs and 1-based `%N` references. `%%` is a literal `%`.
fn tokenize(message: &str) -> Vec<MessageToken> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut chars = message.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            buffer.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                buffer.push('%');
            }
            Some(d) if d.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    digits.push(*d);
                    chars.next();
                }
                if !buffer.is_empty() {
                    tokens.push(MessageToken::Text(std::mem::take(&mut buffer)));
                }
                // Digits only, so this cannot fail short of overflow.
                tokens.push(MessageToken::Arg(digits.parse().unwrap_or(usize::MAX)));
            }
            _ => buffer.push('%'),
        }
    }
    if !buffer.is_empty() {
        tokens.push(MessageToken::Text(buffer));
    }
    tokens
}

impl BlockInstance {
    /// Interpolates `message0` with `args0` into rows of fields.
    ///
    /// Every field joins the current row; every input closes it. Fields left
    /// over at the end form an implicit dummy input aligned by `lastDummyAlign0`.
    pub fn from_descriptor(descriptor: &BlockDescriptor) -> Result<Self, GenerationError> {
        let mut inputs = Vec::new();
        let mut row: Vec<RenderedField> = Vec::new();
        let mut used = vec![false; descriptor.args.len()];

        for token in tokenize(&descriptor.message) {
            match token {
                MessageToken::Text(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        row.push(RenderedField {
                            name: None,
                            kind: FieldKind::Label,
                        });
                    }
                }
                MessageToken::Arg(index) => {
                    if index == 0 || index > descriptor.args.len() {
                        return Err(GenerationError::InvalidSchema(format!(
                            "message0 references %{} but args0 has {} entries",
                            index,
                            descriptor.args.len()
                        )));
                    }
                    if std::mem::replace(&mut used[index - 1], true) {
                        return Err(GenerationError::InvalidSchema(format!(
                            "message0 references %{} more than once",
                            index
                        )));
                    }
                    match &descriptor.args[index - 1] {
                        Arg::Field(field) => row.push(RenderedField {
                            name: field.name().map(str::to_string),
                            kind: FieldKind::of(field),
                        }),
                        Arg::Input(input) => inputs.push(RenderedInput {
                            name: input.name.clone(),
                            kind: input.kind,
                            align: input.align,
                            check: input.check.clone(),
                            fields: std::mem::take(&mut row),
                        }),
                    }
                }
            }
        }

        if let Some(missing) = used.iter().position(|u| !u) {
            return Err(GenerationError::InvalidSchema(format!(
                "message0 does not reference %{}",
                missing + 1
            )));
        }

        if !row.is_empty() {
            inputs.push(RenderedInput {
                name: None,
                kind: InputKind::Dummy,
                align: descriptor.last_dummy_align.unwrap_or_default(),
                check: None,
                fields: row,
            });
        }

        Ok(Self {
            block_type: descriptor.block_type.clone(),
            inputs,
            connections: descriptor.connections(),
        })
    }

    pub fn has_output(&self) -> bool {
        matches!(self.connections, Connections::Output(_))
    }

    /// Every field paired with the input that owns it, in display order.
    pub fn fields(&self) -> impl Iterator<Item = (&RenderedInput, &RenderedField)> {
        self.inputs
            .iter()
            .flat_map(|input| input.fields.iter().map(move |field| (input, field)))
    }
}
