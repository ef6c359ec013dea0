use crate::error::WorkspaceConversionError;
use ahash::AHashMap;

/// Index of a node inside a [`Workspace`] arena.
pub type NodeId = usize;

/// The structural role of a node in the editor tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The uneditable root every block definition hangs off.
    Container,
    ValueInput,
    StatementInput,
    DummyInput,
    LiteralText,
    TextField,
    NumberField,
    AngleField,
    CheckboxField,
    ColourField,
    VariableField,
    DropdownField,
    ImageField,
    /// A union of type constraints, stored in `TYPE0..TYPEn` slots.
    TypeGroup,
    /// A free-text type name typed in by the user.
    TypeOther,
    /// A built-in type with a declared value type (`None` means "any").
    TypeAtom,
    ColourHue,
    /// Anything the core does not understand. Ignored by every walk.
    Other,
}

impl NodeKind {
    /// Maps an editor block type name onto a node kind.
    pub fn from_type_name(name: &str) -> Option<NodeKind> {
        let kind = match name {
            "factory_base" => NodeKind::Container,
            "input_value" => NodeKind::ValueInput,
            "input_statement" => NodeKind::StatementInput,
            "input_dummy" => NodeKind::DummyInput,
            "field_static" => NodeKind::LiteralText,
            "field_input" => NodeKind::TextField,
            "field_number" => NodeKind::NumberField,
            "field_angle" => NodeKind::AngleField,
            "field_checkbox" => NodeKind::CheckboxField,
            "field_colour" => NodeKind::ColourField,
            "field_variable" => NodeKind::VariableField,
            "field_dropdown" => NodeKind::DropdownField,
            "field_image" => NodeKind::ImageField,
            "type_group" => NodeKind::TypeGroup,
            "type_other" => NodeKind::TypeOther,
            "type_null" | "type_boolean" | "type_number" | "type_string" | "type_list" => {
                NodeKind::TypeAtom
            }
            "colour_hue" => NodeKind::ColourHue,
            _ => return None,
        };
        Some(kind)
    }

    /// The declared value type of the built-in type atoms.
    pub fn builtin_value_type(name: &str) -> Option<&'static str> {
        match name {
            "type_boolean" => Some("Boolean"),
            "type_number" => Some("Number"),
            "type_string" => Some("String"),
            "type_list" => Some("Array"),
            _ => None,
        }
    }
}

/// A single block of the editor tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// The editor's own type name, kept for diagnostics and `Other` nodes.
    pub type_name: String,
    pub fields: AHashMap<String, String>,
    pub disabled: bool,
    pub value_type: Option<String>,
    /// Number of dropdown options or type group members.
    pub item_count: usize,
    parent: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    slots: AHashMap<String, NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
            fields: AHashMap::new(),
            disabled: false,
            value_type: None,
            item_count: 0,
            parent: None,
            prev: None,
            next: None,
            slots: AHashMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn with_value_type(mut self, value_type: Option<String>) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_item_count(mut self, count: usize) -> Self {
        self.item_count = count;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Arena holding every node of an editor tree.
///
/// Nodes never own each other. Slots and `next` links are plain indices, so a
/// chain of siblings can be walked forwards (`next`) and backwards (`prev`)
/// without any shared ownership.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    nodes: Vec<Node>,
    top: Vec<NodeId>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached node and returns its id.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Adds a node that sits directly on the editor surface.
    pub fn add_top(&mut self, node: Node) -> NodeId {
        let id = self.add_node(node);
        self.top.push(id);
        id
    }

    /// Marks an already added node as sitting on the editor surface. Only the
    /// head of a top-level chain belongs here; its siblings hang off it.
    pub fn place_on_top(&mut self, id: NodeId) {
        if !self.top.contains(&id) {
            self.top.push(id);
        }
    }

    /// Plugs `child` into the named slot of `parent`.
    pub fn attach(
        &mut self,
        parent: NodeId,
        slot: &str,
        child: NodeId,
    ) -> Result<(), WorkspaceConversionError> {
        if self.nodes[parent].slots.contains_key(slot) {
            return Err(WorkspaceConversionError::SlotOccupied {
                id: parent,
                slot: slot.to_string(),
            });
        }
        self.nodes[parent].slots.insert(slot.to_string(), child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Links `next` after `prev` in a sibling chain.
    pub fn link(&mut self, prev: NodeId, next: NodeId) -> Result<(), WorkspaceConversionError> {
        if self.nodes[prev].next.is_some() {
            return Err(WorkspaceConversionError::SlotOccupied {
                id: prev,
                slot: "next".to_string(),
            });
        }
        self.nodes[prev].next = Some(next);
        self.nodes[next].prev = Some(prev);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn top_nodes(&self) -> &[NodeId] {
        &self.top
    }

    pub fn field(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id].field(name)
    }

    pub fn slot(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[id].slots.get(name).copied()
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].next
    }

    /// Returns the first top-level container block, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.top
            .iter()
            .copied()
            .find(|id| self.nodes[*id].kind == NodeKind::Container)
    }

    /// The block whose slot (directly or through a sibling chain) holds `id`.
    pub fn surround_parent(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let node = &self.nodes[current];
            if let Some(parent) = node.parent {
                return Some(parent);
            }
            current = node.prev?;
        }
    }

    /// A node is enabled when neither it nor any enclosing block is disabled.
    pub fn is_enabled(&self, id: NodeId) -> bool {
        if self.nodes[id].disabled {
            return false;
        }
        let mut current = self.surround_parent(id);
        while let Some(parent) = current {
            if self.nodes[parent].disabled {
                return false;
            }
            current = self.surround_parent(parent);
        }
        true
    }

    /// Walks the `next` chain starting at `head`.
    pub fn chain(&self, head: Option<NodeId>) -> Chain<'_> {
        Chain {
            workspace: self,
            current: head,
        }
    }
}

/// Iterator over a singly linked chain of sibling nodes.
pub struct Chain<'a> {
    workspace: &'a Workspace,
    current: Option<NodeId>,
}

impl Iterator for Chain<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.workspace.next(id);
        Some(id)
    }
}
