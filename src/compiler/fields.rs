use crate::schema::FieldArg;
use crate::schema::number::parse_field_number;
use crate::workspace::{Node, NodeId, NodeKind, Workspace};
use tracing::trace;

/// One element of a row of fields: plain text or a field definition.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldToken {
    /// Literal text, with `%` already escaped as `%%`.
    Text(String),
    Field(FieldArg),
}

impl FieldToken {
    /// Whether the token contributes anything visible to its row.
    pub fn has_content(&self) -> bool {
        match self {
            FieldToken::Text(text) => !text.trim().is_empty(),
            FieldToken::Field(_) => true,
        }
    }
}

/// Walks a chain of field nodes, skipping disabled ones.
pub fn extract_fields(workspace: &Workspace, head: Option<NodeId>) -> Vec<FieldToken> {
    workspace
        .chain(head)
        .filter(|id| {
            let enabled = workspace.is_enabled(*id);
            if !enabled {
                trace!(node = id, "skipping disabled field");
            }
            enabled
        })
        .filter_map(|id| field_token(workspace.node(id)))
        .collect()
}

fn field_token(node: &Node) -> Option<FieldToken> {
    let text = |name: &str| node.field(name).unwrap_or_default().to_string();
    let number = |name: &str| parse_field_number(node.field(name).unwrap_or_default());

    let field = match node.kind {
        NodeKind::LiteralText => return Some(FieldToken::Text(text("TEXT").replace('%', "%%"))),
        NodeKind::TextField => FieldArg::Text {
            name: text("FIELDNAME"),
            text: text("TEXT"),
        },
        NodeKind::NumberField => {
            let min = number("MIN");
            let max = number("MAX");
            let precision = number("PRECISION");
            FieldArg::Number {
                name: text("FIELDNAME"),
                value: number("VALUE"),
                min: min.is_finite().then_some(min),
                max: max.is_finite().then_some(max),
                precision: (precision != 0.0 && !precision.is_nan()).then_some(precision),
            }
        }
        NodeKind::AngleField => FieldArg::Angle {
            name: text("FIELDNAME"),
            angle: number("ANGLE"),
        },
        NodeKind::CheckboxField => FieldArg::Checkbox {
            name: text("FIELDNAME"),
            checked: node.field("CHECKED") == Some("TRUE"),
        },
        NodeKind::ColourField => FieldArg::Colour {
            name: text("FIELDNAME"),
            colour: text("COLOUR"),
        },
        NodeKind::VariableField => FieldArg::Variable {
            name: text("FIELDNAME"),
            variable: node.field("TEXT").filter(|t| !t.is_empty()).map(str::to_string),
        },
        NodeKind::DropdownField => {
            let options: Vec<(String, String)> = (0..node.item_count)
                .map(|i| (text(&format!("USER{}", i)), text(&format!("CPU{}", i))))
                .collect();
            // A dropdown without options has nothing to offer.
            if options.is_empty() {
                return None;
            }
            FieldArg::Dropdown {
                name: text("FIELDNAME"),
                options,
            }
        }
        NodeKind::ImageField => FieldArg::Image {
            src: text("SRC"),
            width: number("WIDTH"),
            height: number("HEIGHT"),
            alt: text("ALT"),
        },
        _ => return None,
    };
    Some(FieldToken::Field(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_node(min: &str, max: &str, precision: &str) -> Node {
        Node::new(NodeKind::NumberField, "field_number")
            .with_field("FIELDNAME", "NUM")
            .with_field("VALUE", "5")
            .with_field("MIN", min)
            .with_field("MAX", max)
            .with_field("PRECISION", precision)
    }

    #[test]
    fn number_bounds_only_when_finite() {
        let token = field_token(&number_node("-Infinity", "10", "0")).unwrap();
        assert_eq!(
            token,
            FieldToken::Field(FieldArg::Number {
                name: "NUM".to_string(),
                value: 5.0,
                min: None,
                max: Some(10.0),
                precision: None,
            })
        );

        let token = field_token(&number_node("0", "Infinity", "0.5")).unwrap();
        let FieldToken::Field(FieldArg::Number { min, max, precision, .. }) = token else {
            panic!("expected a number field");
        };
        assert_eq!(min, Some(0.0));
        assert_eq!(max, None);
        assert_eq!(precision, Some(0.5));
    }

    #[test]
    fn bounds_at_the_wrong_infinity_are_dropped() {
        let token = field_token(&number_node("Infinity", "-Infinity", "0")).unwrap();
        let FieldToken::Field(FieldArg::Number { min, max, .. }) = token else {
            panic!("expected a number field");
        };
        assert_eq!(min, None);
        assert_eq!(max, None);

        let token = field_token(&number_node("Infinity", "10", "0")).unwrap();
        let FieldToken::Field(FieldArg::Number { min, max, .. }) = token else {
            panic!("expected a number field");
        };
        assert_eq!(min, None);
        assert_eq!(max, Some(10.0));
    }

    #[test]
    fn literal_text_escapes_percent() {
        let node = Node::new(NodeKind::LiteralText, "field_static").with_field("TEXT", "100%");
        assert_eq!(field_token(&node), Some(FieldToken::Text("100%%".to_string())));
    }

    #[test]
    fn empty_variable_becomes_null() {
        let node = Node::new(NodeKind::VariableField, "field_variable")
            .with_field("FIELDNAME", "VAR")
            .with_field("TEXT", "");
        assert_eq!(
            field_token(&node),
            Some(FieldToken::Field(FieldArg::Variable {
                name: "VAR".to_string(),
                variable: None,
            }))
        );
    }

    #[test]
    fn dropdown_without_options_is_dropped() {
        let node = Node::new(NodeKind::DropdownField, "field_dropdown").with_field("FIELDNAME", "MODE");
        assert_eq!(field_token(&node), None);
    }

    #[test]
    fn unknown_kinds_produce_nothing() {
        let node = Node::new(NodeKind::Other, "math_number");
        assert_eq!(field_token(&node), None);
        assert!(!FieldToken::Text("  ".to_string()).has_content());
    }
}
