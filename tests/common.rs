//! Common test utilities for building editor trees.
use katachi::prelude::*;
use serde_json::{Map, Value, json};

/// Links blocks into a `next` chain and returns its head.
#[allow(dead_code)]
pub fn chain(blocks: Vec<Value>) -> Option<Value> {
    blocks.into_iter().rev().fold(None, |next, mut block| {
        if let Some(next) = next {
            block["next"] = next;
        }
        Some(block)
    })
}

/// A block with the given fields and slot children. Empty slots are left out.
#[allow(dead_code)]
pub fn block(block_type: &str, fields: Value, slots: Vec<(&str, Option<Value>)>) -> Value {
    let mut inputs = Map::new();
    for (slot, child) in slots {
        if let Some(child) = child {
            inputs.insert(slot.to_string(), child);
        }
    }
    json!({ "type": block_type, "fields": fields, "inputs": inputs })
}

#[allow(dead_code)]
pub fn text(t: &str) -> Value {
    block("field_static", json!({ "TEXT": t }), vec![])
}

#[allow(dead_code)]
pub fn text_input(name: &str, default: &str) -> Value {
    block("field_input", json!({ "FIELDNAME": name, "TEXT": default }), vec![])
}

#[allow(dead_code)]
pub fn type_atom(block_type: &str) -> Value {
    block(block_type, json!({}), vec![])
}

#[allow(dead_code)]
pub fn type_other(name: &str) -> Value {
    block("type_other", json!({ "TYPE": name }), vec![])
}

#[allow(dead_code)]
pub fn type_group(members: Vec<Value>) -> Value {
    let slots: Vec<(String, Option<Value>)> = members
        .into_iter()
        .enumerate()
        .map(|(i, m)| (format!("TYPE{}", i), Some(m)))
        .collect();
    block(
        "type_group",
        json!({}),
        slots.iter().map(|(s, v)| (s.as_str(), v.clone())).collect(),
    )
}

/// An input block of `kind` (`input_value`, `input_statement`, `input_dummy`).
#[allow(dead_code)]
pub fn input(kind: &str, name: &str, fields: Vec<Value>, check: Option<Value>) -> Value {
    block(
        kind,
        json!({ "INPUTNAME": name, "ALIGN": "LEFT" }),
        vec![("FIELDS", chain(fields)), ("TYPE", check)],
    )
}

#[allow(dead_code)]
pub fn dummy(fields: Vec<Value>) -> Value {
    input("input_dummy", "", fields, None)
}

/// The definition root with a name, connection shape and input chain.
#[allow(dead_code)]
pub fn factory_base(name: &str, connections: &str, inputs: Vec<Value>) -> Value {
    block(
        "factory_base",
        json!({ "NAME": name, "INLINE": "AUTO", "CONNECTIONS": connections }),
        vec![("INPUTS", chain(inputs))],
    )
}

#[allow(dead_code)]
pub fn with_disabled(mut block: Value) -> Value {
    block["disabled"] = json!(true);
    block
}

/// Adds a child to one of a block's slots.
#[allow(dead_code)]
pub fn with_slot(mut block: Value, slot: &str, child: Value) -> Value {
    block["inputs"][slot] = child;
    block
}

#[allow(dead_code)]
pub fn with_field(mut block: Value, name: &str, value: &str) -> Value {
    block["fields"][name] = json!(value);
    block
}

/// Converts top-level blocks into a workspace.
#[allow(dead_code)]
pub fn workspace(blocks: Vec<Value>) -> Workspace {
    let tree: EditorTree =
        serde_json::from_value(json!({ "blocks": blocks })).expect("valid editor tree");
    tree.into_workspace().expect("convertible editor tree")
}

#[allow(dead_code)]
pub fn compile(root: Value) -> BlockDescriptor {
    Compiler::default()
        .compile(&workspace(vec![root]))
        .expect("Failed to compile")
}

/// Compiles and re-parses the schema text as generic JSON.
#[allow(dead_code)]
pub fn compile_json(root: Value) -> Value {
    let schema = compile(root).to_json().expect("Failed to serialize");
    serde_json::from_str(&schema).expect("schema is valid JSON")
}

/// Counts `%N` placeholders in a message, ignoring `%%` escapes.
#[allow(dead_code)]
pub fn placeholders(message: &str) -> Vec<usize> {
    let mut found = Vec::new();
    let mut chars = message.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            continue;
        }
        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }
        if let Ok(n) = digits.parse() {
            found.push(n);
        }
    }
    found
}
