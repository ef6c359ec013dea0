use super::node::{Node, NodeId, NodeKind, Workspace};
use crate::error::WorkspaceConversionError;
use ahash::AHashMap;
use serde::Deserialize;
use tracing::trace;

/// A trait for editor data models that can be converted into a [`Workspace`].
///
/// This is the seam between whatever the block editor serializes and the
/// arena the compiler walks. Implement it on your own structs to feed a
/// different editor format into the pipeline.
///
/// # Example
///
/// ```rust,no_run
/// use katachi::workspace::{IntoWorkspace, Node, NodeKind, Workspace};
/// use katachi::error::WorkspaceConversionError;
///
/// struct MyBlock { name: String }
///
/// impl IntoWorkspace for MyBlock {
///     fn into_workspace(self) -> Result<Workspace, WorkspaceConversionError> {
///         let mut ws = Workspace::new();
///         ws.add_top(Node::new(NodeKind::Container, "factory_base").with_field("NAME", self.name));
///         Ok(ws)
///     }
/// }
/// ```
pub trait IntoWorkspace {
    /// Consumes the object and converts it into an editor workspace.
    fn into_workspace(self) -> Result<Workspace, WorkspaceConversionError>;
}

/// The editor's serialized tree: top-level blocks with nested children.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EditorTree {
    pub blocks: Vec<EditorBlock>,
}

/// A serialized editor block.
#[derive(Debug, Deserialize, Clone)]
pub struct EditorBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub fields: AHashMap<String, serde_json::Value>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub inputs: AHashMap<String, EditorBlock>,
    #[serde(default)]
    pub next: Option<Box<EditorBlock>>,
    #[serde(default)]
    pub mutation: Option<EditorMutation>,
    #[serde(default, alias = "valueType")]
    pub value_type: Option<String>,
}

/// Extra state carried by blocks with a variable number of parts.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct EditorMutation {
    #[serde(alias = "optionCount", alias = "typeCount")]
    pub items: usize,
}

impl EditorTree {
    pub fn from_json(json: &str) -> Result<Self, WorkspaceConversionError> {
        serde_json::from_str(json)
            .map_err(|e| WorkspaceConversionError::ValidationError(format!("invalid tree: {}", e)))
    }
}

impl IntoWorkspace for EditorTree {
    fn into_workspace(self) -> Result<Workspace, WorkspaceConversionError> {
        TreeConverter::new().convert(self)
    }
}

/// Converts an [`EditorTree`] into a [`Workspace`], optionally aliasing
/// custom block type names onto the built-in kinds.
#[derive(Debug, Default)]
pub struct TreeConverter {
    type_mapping: AHashMap<String, String>,
    strict: bool,
}

impl TreeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treats blocks of type `user_type_name` as if they were `builtin_type_name`.
    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        if NodeKind::from_type_name(builtin_type_name).is_some() {
            self.type_mapping
                .insert(user_type_name.to_string(), builtin_type_name.to_string());
        }
        self
    }

    /// Rejects block types that map onto no known kind instead of ignoring them.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn convert(&self, tree: EditorTree) -> Result<Workspace, WorkspaceConversionError> {
        let mut ws = Workspace::new();
        for block in tree.blocks {
            let id = self.convert_chain(&mut ws, block)?;
            ws.place_on_top(id);
        }
        Ok(ws)
    }

    /// Converts a block and everything reachable through its `next` links.
    fn convert_chain(
        &self,
        ws: &mut Workspace,
        mut block: EditorBlock,
    ) -> Result<NodeId, WorkspaceConversionError> {
        let mut next = block.next.take();
        let head = self.convert_block(ws, block)?;
        let mut prev = head;
        while let Some(boxed) = next {
            let mut sibling = *boxed;
            next = sibling.next.take();
            let id = self.convert_block(ws, sibling)?;
            ws.link(prev, id)?;
            prev = id;
        }
        Ok(head)
    }

    fn convert_block(
        &self,
        ws: &mut Workspace,
        mut block: EditorBlock,
    ) -> Result<NodeId, WorkspaceConversionError> {
        let type_name = self
            .type_mapping
            .get(&block.block_type)
            .cloned()
            .unwrap_or_else(|| block.block_type.clone());

        let kind = match NodeKind::from_type_name(&type_name) {
            Some(kind) => kind,
            None if self.strict => {
                return Err(WorkspaceConversionError::UnknownBlockType {
                    id: block.id.clone().unwrap_or_default(),
                    type_name: block.block_type.clone(),
                });
            }
            None => {
                trace!(type_name = %block.block_type, "unrecognized block type kept as opaque node");
                NodeKind::Other
            }
        };

        let mut node = Node::new(kind, type_name.clone()).disabled(block.disabled);
        for (name, value) in &block.fields {
            node.fields
                .insert(name.clone(), field_text(&block, name, value)?);
        }

        node.item_count = match block.mutation {
            Some(mutation) => mutation.items,
            None => infer_item_count(kind, &block),
        };

        node.value_type = match block.value_type.take() {
            Some(value_type) => Some(value_type),
            None => NodeKind::builtin_value_type(&type_name).map(str::to_string),
        };

        let id = ws.add_node(node);

        // Sorted so arena order does not depend on map iteration order.
        let mut inputs: Vec<(String, EditorBlock)> = block.inputs.into_iter().collect();
        inputs.sort_by(|a, b| a.0.cmp(&b.0));
        for (slot, child) in inputs {
            let child_id = self.convert_chain(ws, child)?;
            ws.attach(id, &slot, child_id)?;
        }
        Ok(id)
    }
}

/// Normalizes a serialized field value into the editor's string form.
fn field_text(
    block: &EditorBlock,
    name: &str,
    value: &serde_json::Value,
) -> Result<String, WorkspaceConversionError> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(true) => Ok("TRUE".to_string()),
        serde_json::Value::Bool(false) => Ok("FALSE".to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(WorkspaceConversionError::ValidationError(format!(
            "field '{}' of block '{}' must be a scalar, found {}",
            name,
            block.id.as_deref().unwrap_or(&block.block_type),
            other
        ))),
    }
}

fn infer_item_count(kind: NodeKind, block: &EditorBlock) -> usize {
    match kind {
        NodeKind::DropdownField => (0..)
            .take_while(|i| {
                block.fields.contains_key(&format!("USER{}", i))
                    || block.fields.contains_key(&format!("CPU{}", i))
            })
            .count(),
        NodeKind::TypeGroup => block
            .inputs
            .keys()
            .filter_map(|k| k.strip_prefix("TYPE")?.parse::<usize>().ok())
            .max()
            .map_or(0, |max| max + 1),
        _ => 0,
    }
}
