//! Generator stub emission.
//!
//! Produces the skeleton of a code generator function for a rendered block:
//! one accessor per named field and input, then a body the implementer fills in.

mod language;

pub use language::TargetLanguage;

use crate::render::{BlockInstance, FieldKind};
use crate::schema::InputKind;

/// Default generator namespace.
pub const DEFAULT_NAMESPACE: &str = "Blockly";

/// Field kinds that get an accessor, most specific first. A kind matches the
/// first entry it `is_a`, so a variable field is never mistaken for a plain
/// dropdown, nor an angle for a plain text input.
const ACCESSOR_ORDER: [FieldKind; 7] = [
    FieldKind::Variable,
    FieldKind::Angle,
    FieldKind::Colour,
    FieldKind::Checkbox,
    FieldKind::Dropdown,
    FieldKind::Number,
    FieldKind::TextInput,
];

/// Picks the accessor kind for a field, or `None` for fields with no value.
pub fn accessor_kind(kind: FieldKind) -> Option<FieldKind> {
    ACCESSOR_ORDER.into_iter().find(|general| kind.is_a(*general))
}

fn prefix(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Variable => "variable",
        FieldKind::Angle => "angle",
        FieldKind::Colour => "colour",
        FieldKind::Checkbox => "checkbox",
        FieldKind::Dropdown => "dropdown",
        FieldKind::Number => "number",
        FieldKind::TextInput => "text",
        FieldKind::Label => "label",
        FieldKind::Image => "image",
    }
}

/// `  var <root>_<name>` with the name lowercased and non-word characters replaced.
fn make_var(root: &str, name: &str) -> String {
    let name: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("  var {}_{}", root, name)
}

#[derive(Debug, Clone)]
pub struct StubGenerator {
    language: TargetLanguage,
    namespace: String,
}

impl StubGenerator {
    pub fn new(language: TargetLanguage) -> Self {
        Self {
            language,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn language(&self) -> TargetLanguage {
        self.language
    }

    pub fn generate(&self, block: &BlockInstance) -> String {
        let ns = &self.namespace;
        let lang = self.language.name();
        let mut code = vec![format!(
            "{}.{}['{}'] = function(block) {{",
            ns, lang, block.block_type
        )];

        for input in &block.inputs {
            for field in &input.fields {
                let Some(name) = field.name.as_deref().filter(|n| !n.is_empty()) else {
                    continue;
                };
                let Some(kind) = accessor_kind(field.kind) else {
                    continue;
                };
                let var = make_var(prefix(kind), name);
                let line = match kind {
                    FieldKind::Variable => format!(
                        "{} = {}.{}.variableDB_.getName(block.getFieldValue('{}'), {}.Variables.NAME_TYPE);",
                        var, ns, lang, name, ns
                    ),
                    FieldKind::Checkbox => {
                        format!("{} = block.getFieldValue('{}') == 'TRUE';", var, name)
                    }
                    _ => format!("{} = block.getFieldValue('{}');", var, name),
                };
                code.push(line);
            }

            let Some(name) = input.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            match input.kind {
                InputKind::Value => code.push(format!(
                    "{} = {}.{}.valueToCode(block, '{}', {}.{}.ORDER_ATOMIC);",
                    make_var("value", name),
                    ns,
                    lang,
                    name,
                    ns,
                    lang
                )),
                InputKind::Statement => code.push(format!(
                    "{} = {}.{}.statementToCode(block, '{}');",
                    make_var("statements", name),
                    ns,
                    lang,
                    name
                )),
                InputKind::Dummy => {}
            }
        }

        code.push(format!("  // TODO: Assemble {} into code variable.", lang));
        if block.has_output() {
            code.push("  var code = '...';".to_string());
            code.push("  // TODO: Change ORDER_NONE to the correct strength.".to_string());
            code.push(format!("  return [code, {}.{}.ORDER_NONE];", ns, lang));
        } else {
            code.push(format!(
                "  var code = '...{}\\n';",
                self.language.statement_terminator()
            ));
            code.push("  return code;".to_string());
        }
        code.push("};".to_string());
        code.join("\n")
    }
}
