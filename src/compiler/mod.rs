use crate::error::GenerationError;
use crate::schema::{
    Align, Arg, BlockDescriptor, Connections, Constraint, DEFAULT_HELP_URL, InputArg, InputKind,
};
use crate::schema::number::parse_leading_int;
use crate::workspace::{NodeId, NodeKind, Workspace};
use tracing::{debug, trace, warn};

pub mod fields;
pub mod types;

pub use fields::{FieldToken, extract_fields};
pub use types::{ANY_TYPE, TypeExpression, TypeResolver};

/// The connection layout picked on the root block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionShape {
    /// A single output on the left.
    Output,
    /// Previous and next statement connections.
    Both,
    Top,
    Bottom,
    None,
}

impl ConnectionShape {
    pub fn from_field(value: Option<&str>) -> Self {
        match value {
            Some("LEFT") => ConnectionShape::Output,
            Some("BOTH") => ConnectionShape::Both,
            Some("TOP") => ConnectionShape::Top,
            Some("BOTTOM") => ConnectionShape::Bottom,
            _ => ConnectionShape::None,
        }
    }
}

/// Turns the root block's name into a block type identifier.
///
/// Lowercased and trimmed, every non-word character replaced with `_`, and a
/// leading digit prefixed with `_`.
pub fn block_type_name(raw: &str) -> String {
    let mut name: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Assembles a [`BlockDescriptor`] from the block definition in a workspace.
#[derive(Debug, Clone)]
pub struct Compiler {
    help_url: String,
    tooltip: String,
}

pub struct CompilerBuilder {
    help_url: String,
    tooltip: String,
}

impl CompilerBuilder {
    pub fn new() -> Self {
        Self {
            help_url: DEFAULT_HELP_URL.to_string(),
            tooltip: String::new(),
        }
    }
    pub fn with_help_url(mut self, url: &str) -> Self {
        self.help_url = url.to_string();
        self
    }
    pub fn with_tooltip(mut self, tooltip: &str) -> Self {
        self.tooltip = tooltip.to_string();
        self
    }
    pub fn build(self) -> Compiler {
        Compiler {
            help_url: self.help_url,
            tooltip: self.tooltip,
        }
    }
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        CompilerBuilder::new().build()
    }
}

/// The last input seen while walking the input chain.
struct LastInput {
    kind: InputKind,
    align: Align,
    has_content: bool,
}

impl Compiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    /// Finds the definition container among the top-level blocks and assembles it.
    pub fn compile(&self, workspace: &Workspace) -> Result<BlockDescriptor, GenerationError> {
        if workspace.is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        let root = workspace.root().ok_or(GenerationError::MissingRoot)?;
        self.assemble(workspace, root)
    }

    pub fn assemble(
        &self,
        workspace: &Workspace,
        root: NodeId,
    ) -> Result<BlockDescriptor, GenerationError> {
        let resolver = TypeResolver::new(workspace);
        let mut descriptor = BlockDescriptor {
            block_type: block_type_name(workspace.field(root, "NAME").unwrap_or_default()),
            ..Default::default()
        };

        let mut message: Vec<String> = Vec::new();
        let mut args: Vec<Arg> = Vec::new();
        let mut last_input: Option<LastInput> = None;

        for id in workspace.chain(workspace.slot(root, "INPUTS")) {
            if !workspace.is_enabled(id) {
                trace!(node = id, "skipping disabled input");
                continue;
            }
            let node = workspace.node(id);
            let kind = match node.kind {
                NodeKind::DummyInput => InputKind::Dummy,
                NodeKind::ValueInput => InputKind::Value,
                NodeKind::StatementInput => InputKind::Statement,
                _ => {
                    debug!(node = id, type_name = %node.type_name, "ignoring non-input block in input chain");
                    continue;
                }
            };

            let tokens = extract_fields(workspace, workspace.slot(id, "FIELDS"));
            let has_content = tokens.iter().any(FieldToken::has_content);
            for token in tokens {
                match token {
                    FieldToken::Text(text) => message.push(text),
                    FieldToken::Field(field) => {
                        args.push(Arg::Field(field));
                        message.push(format!("%{}", args.len()));
                    }
                }
            }

            let name = match kind {
                InputKind::Dummy => None,
                _ => Some(node.field("INPUTNAME").unwrap_or_default().to_string()),
            };
            // An "any type" check is the same as no check on an input.
            let check = resolver
                .resolve(Some(id), "TYPE")?
                .to_constraint()?
                .filter(|c| *c != Constraint::Any);
            let align = Align::from_field(node.field("ALIGN"));

            args.push(Arg::Input(InputArg {
                kind,
                name,
                check,
                align,
            }));
            message.push(format!("%{}", args.len()));
            last_input = Some(LastInput {
                kind,
                align,
                has_content,
            });
        }

        // Trailing fields get an implicit dummy input when the schema is loaded,
        // so an explicit one would only add an empty row.
        if let Some(last) = last_input {
            if last.kind == InputKind::Dummy && last.has_content {
                if !last.align.is_left() {
                    descriptor.last_dummy_align = Some(last.align);
                }
                args.pop();
                message.pop();
                trace!("dropped trailing dummy input");
            }
        }

        descriptor.message = message.join(" ");
        descriptor.args = args;

        descriptor.inputs_inline = match workspace.field(root, "INLINE") {
            Some("EXT") => Some(false),
            Some("INT") => Some(true),
            _ => None,
        };

        let constraint = |slot: &str| -> Result<Option<Constraint>, GenerationError> {
            resolver.resolve(Some(root), slot)?.to_constraint()
        };
        let connections = match ConnectionShape::from_field(workspace.field(root, "CONNECTIONS")) {
            ConnectionShape::Output => Connections::Output(constraint("OUTPUTTYPE")?),
            ConnectionShape::Both => Connections::Statement {
                previous: constraint("TOPTYPE")?,
                next: constraint("BOTTOMTYPE")?,
            },
            ConnectionShape::Top => Connections::Statement {
                previous: constraint("TOPTYPE")?,
                next: None,
            },
            ConnectionShape::Bottom => Connections::Statement {
                previous: None,
                next: constraint("BOTTOMTYPE")?,
            },
            ConnectionShape::None => Connections::None,
        };
        descriptor.set_connections(connections);

        if let Some(colour) = workspace.slot(root, "COLOUR") {
            if workspace.is_enabled(colour) {
                let hue = workspace.field(colour, "HUE").unwrap_or_default();
                match parse_leading_int(hue) {
                    Some(hue) => descriptor.colour = Some(hue),
                    None => warn!(hue, "colour block has no numeric hue, leaving colour unset"),
                }
            }
        }

        descriptor.tooltip = self.tooltip.clone();
        descriptor.help_url = self.help_url.clone();

        debug!(
            block_type = %descriptor.block_type,
            args = descriptor.args.len(),
            "assembled block descriptor"
        );
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_type_names() {
        assert_eq!(block_type_name("My Block!"), "my_block_");
        assert_eq!(block_type_name("3d"), "_3d");
        assert_eq!(block_type_name("  spaced  "), "spaced");
        assert_eq!(block_type_name(""), "");
        assert_eq!(block_type_name("naïve"), "na_ve");
    }

    #[test]
    fn connection_shapes() {
        assert_eq!(ConnectionShape::from_field(Some("LEFT")), ConnectionShape::Output);
        assert_eq!(ConnectionShape::from_field(Some("NONE")), ConnectionShape::None);
        assert_eq!(ConnectionShape::from_field(None), ConnectionShape::None);
    }
}
