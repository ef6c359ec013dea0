use crate::error::GenerationError;
use crate::schema::Constraint;
use crate::workspace::{NodeId, NodeKind, Workspace};
use itertools::Itertools;

/// The name a type atom resolves to when it accepts any type. Takes priority
/// over every other name in a list.
pub const ANY_TYPE: &str = "null";

/// A normalized set of type names. Names are stored JSON-encoded (`"\"Number\""`),
/// except for the bare [`ANY_TYPE`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpression {
    Absent,
    Single(String),
    /// Always at least two distinct names, in first-seen order.
    List(Vec<String>),
}

impl TypeExpression {
    /// Builds an expression from raw names, dropping repeats after their first occurrence.
    pub fn from_names(names: Vec<String>) -> Self {
        let mut names: Vec<String> = names.into_iter().unique().collect();
        match names.len() {
            0 => TypeExpression::Absent,
            1 => TypeExpression::Single(names.remove(0)),
            _ => TypeExpression::List(names),
        }
    }

    pub fn names(&self) -> &[String] {
        match self {
            TypeExpression::Absent => &[],
            TypeExpression::Single(name) => std::slice::from_ref(name),
            TypeExpression::List(names) => names,
        }
    }

    /// Encodes the expression as schema text, or `None` when there is no constraint.
    pub fn optional_encode(&self) -> Option<String> {
        match self {
            TypeExpression::Absent => None,
            TypeExpression::Single(name) => Some(name.clone()),
            TypeExpression::List(names) if names.iter().any(|n| n == ANY_TYPE) => {
                Some(ANY_TYPE.to_string())
            }
            TypeExpression::List(names) => Some(format!("[{}]", names.iter().join(", "))),
        }
    }

    /// Parses the encoded form into a schema constraint.
    pub fn to_constraint(&self) -> Result<Option<Constraint>, GenerationError> {
        let Some(encoded) = self.optional_encode() else {
            return Ok(None);
        };
        serde_json::from_str(&encoded)
            .map(Some)
            .map_err(|e| GenerationError::MalformedTypeExpression {
                text: encoded,
                reason: e.to_string(),
            })
    }
}

/// Resolves the type constraint plugged into a slot of some block.
pub struct TypeResolver<'a> {
    workspace: &'a Workspace,
}

impl<'a> TypeResolver<'a> {
    pub fn new(workspace: &'a Workspace) -> Self {
        Self { workspace }
    }

    pub fn resolve(&self, owner: Option<NodeId>, slot: &str) -> Result<TypeExpression, GenerationError> {
        self.names_in(owner, slot).map(TypeExpression::from_names)
    }

    fn names_in(&self, owner: Option<NodeId>, slot: &str) -> Result<Vec<String>, GenerationError> {
        let Some(owner) = owner else {
            return Ok(Vec::new());
        };
        let ws = self.workspace;
        let Some(child) = ws.slot(owner, slot) else {
            return Ok(Vec::new());
        };
        if !ws.is_enabled(owner) || !ws.is_enabled(child) {
            return Ok(Vec::new());
        }

        let node = ws.node(child);
        match node.kind {
            NodeKind::TypeGroup => {
                let mut names = Vec::new();
                for i in 0..node.item_count {
                    names.extend(self.names_in(Some(child), &format!("TYPE{}", i))?);
                }
                Ok(names.into_iter().unique().collect())
            }
            NodeKind::TypeOther => {
                let text = node.field("TYPE").unwrap_or_default();
                validate_type_name(text)?;
                Ok(vec![encode_name(text)])
            }
            _ => Ok(vec![
                node.value_type
                    .as_deref()
                    .map_or_else(|| ANY_TYPE.to_string(), encode_name),
            ]),
        }
    }
}

fn encode_name(name: &str) -> String {
    serde_json::Value::String(name.to_string()).to_string()
}

/// A user-typed type name must be a single visible token.
fn validate_type_name(text: &str) -> Result<(), GenerationError> {
    let reason = if text.trim().is_empty() {
        "type name is empty"
    } else if text.trim() != text {
        "type name has surrounding whitespace"
    } else if text.chars().any(char::is_control) {
        "type name contains control characters"
    } else {
        return Ok(());
    };
    Err(GenerationError::MalformedTypeExpression {
        text: text.to_string(),
        reason: reason.to_string(),
    })
}
