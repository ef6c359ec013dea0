//! Integration tests for katachi
//!
//! End-to-end tests that drive a factory session the way the editor does.
mod common;
use common::*;
use katachi::prelude::*;
use katachi::schema::BlockDescriptor;

fn adder() -> Workspace {
    workspace(vec![with_slot(
        factory_base(
            "adder",
            "LEFT",
            vec![
                input("input_value", "A", vec![text("add")], Some(type_atom("type_number"))),
                input("input_value", "B", vec![text("to")], Some(type_atom("type_number"))),
            ],
        ),
        "OUTPUTTYPE",
        type_atom("type_number"),
    )])
}

#[test]
fn test_factory_generates_schema_and_stub() {
    let mut factory = Factory::new(FactoryConfig::default());
    let output = factory
        .update(&adder())
        .expect("pass succeeds")
        .expect("root exists")
        .clone();

    let schema: serde_json::Value = serde_json::from_str(&output.schema).unwrap();
    assert_eq!(schema["type"], "adder");
    assert_eq!(schema["message0"], "add %1 to %2");
    assert_eq!(schema["output"], "Number");

    let stub = output.stub.expect("stub generated");
    assert!(stub.contains("var value_a = Blockly.JavaScript.valueToCode(block, 'A'"));
    assert!(stub.contains("var value_b = Blockly.JavaScript.valueToCode(block, 'B'"));
    assert!(stub.contains("return [code, Blockly.JavaScript.ORDER_NONE];"));
    assert_eq!(factory.output().map(|o| o.schema.clone()), Some(output.schema));
}

#[test]
fn test_factory_noops_without_root() {
    let mut factory = Factory::new(FactoryConfig::default());
    assert!(factory.update(&workspace(vec![text("lonely")])).unwrap().is_none());
    assert!(factory.update(&Workspace::new()).unwrap().is_none());
    assert!(factory.output().is_none());
}

#[test]
fn test_failed_pass_keeps_previous_output() {
    let mut factory = Factory::new(FactoryConfig::default());
    factory.update(&adder()).unwrap();
    let before = factory.output().cloned();

    let broken = workspace(vec![factory_base(
        "broken",
        "NONE",
        vec![input("input_value", "A", vec![], Some(type_other("")))],
    )]);
    let err = factory.update(&broken).unwrap_err();
    assert!(matches!(err, GenerationError::MalformedTypeExpression { .. }));
    assert_eq!(factory.output().cloned(), before);

    // The next good pass replaces it.
    let fixed = workspace(vec![factory_base("fixed", "NONE", vec![])]);
    let output = factory.update(&fixed).unwrap().unwrap();
    assert!(output.schema.contains("\"type\": \"fixed\""));
}

#[test]
fn test_untitled_block_stub_uses_registered_name() {
    let ws = workspace(vec![factory_base(
        "",
        "LEFT",
        vec![input("input_value", "A", vec![], None)],
    )]);
    let mut factory = Factory::new(FactoryConfig::default());
    let output = factory.update(&ws).unwrap().unwrap();

    assert!(output.schema.contains("\"type\": \"\""));
    let stub = output.stub.as_deref().unwrap();
    assert!(stub.starts_with("Blockly.JavaScript['unnamed'] = function(block) {"));
    assert!(stub.contains("var value_a = Blockly.JavaScript.valueToCode(block, 'A'"));
}

#[test]
fn test_factory_respects_config() {
    let config = FactoryConfig::from_json(
        r#"{ "language": "Python", "namespace": "Gen", "helpUrl": "https://example.org/help" }"#,
    )
    .unwrap();
    let mut factory = Factory::new(config);
    let ws = workspace(vec![factory_base(
        "say",
        "BOTH",
        vec![dummy(vec![text("say"), text_input("MSG", "hi")])],
    )]);
    let output = factory.update(&ws).unwrap().unwrap();

    assert!(output.schema.contains("\"helpUrl\": \"https://example.org/help\""));
    let stub = output.stub.as_deref().unwrap();
    assert!(stub.starts_with("Gen.Python['say'] = function(block) {"));
    assert!(stub.contains("  var text_msg = block.getFieldValue('MSG');"));
    assert!(stub.contains("  var code = '...\\n';"));
}

#[test]
fn test_manual_preview_of_schema_text() {
    let mut factory = Factory::new(FactoryConfig {
        format: PreviewFormat::Manual,
        ..Default::default()
    });
    factory.update(&adder()).unwrap();

    let code = r#"{
      "type": "hand_written",
      "message0": "%1 go %2",
      "args0": [
        { "type": "field_label", "text": "let's" },
        { "type": "input_statement", "name": "BODY" }
      ],
      "previousStatement": null,
      "nextStatement": null
    }"#;
    let stub = factory.preview(code).unwrap().expect("schema renders");
    assert!(stub.starts_with("Blockly.JavaScript['hand_written']"));
    assert!(stub.contains("var statements_body = Blockly.JavaScript.statementToCode(block, 'BODY');"));
    assert!(stub.contains("  var code = '...;\\n';"));
    assert_eq!(factory.output().and_then(|o| o.stub.clone()), Some(stub));
}

#[test]
fn test_manual_preview_of_source_text() {
    let mut registry = BlockRegistry::new();
    let code = "Blockly.Blocks['x'] = { init: function() { this.setOutput(true); } };";
    let preview = render_preview(code, PreviewFormat::Manual, &mut registry).unwrap();
    assert_eq!(preview, Preview::Source(code.to_string()));

    let err = render_preview("function( {", PreviewFormat::Source, &mut registry).unwrap_err();
    assert!(matches!(err, GenerationError::UnbalancedSource(_)));
}

#[test]
fn test_preview_rejects_blank_and_unknown_input() {
    let mut registry = BlockRegistry::new();
    let err = render_preview("   \n", PreviewFormat::Json, &mut registry).unwrap_err();
    assert!(err.is_noop());

    let err = "YAML".parse::<PreviewFormat>().unwrap_err();
    assert_eq!(err, GenerationError::UnknownOutputFormat("YAML".to_string()));

    let err = render_preview("not json", PreviewFormat::Json, &mut registry).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidSchema(_)));
}

#[test]
fn test_preview_leaves_registry_untouched() {
    let mut registry = BlockRegistry::new();
    registry.register(BlockDescriptor {
        block_type: "existing".to_string(),
        ..Default::default()
    });

    let preview = render_preview(r#"{ "message0": "hi" }"#, PreviewFormat::Json, &mut registry).unwrap();
    match preview {
        Preview::Block(block) => {
            assert_eq!(block.block_type, "unnamed");
            assert_eq!(block.inputs.len(), 1);
        }
        other => panic!("Expected a rendered block, got {:?}", other),
    }
    assert_eq!(registry.len(), 1);
    assert!(!registry.contains("unnamed"));

    // A failing render restores the registry too.
    let err = render_preview(r#"{ "type": "bad", "message0": "%3" }"#, PreviewFormat::Json, &mut registry);
    assert!(err.is_err());
    assert!(!registry.contains("bad"));
}

#[test]
fn test_preview_of_known_definition_is_unchanged() {
    let mut registry = BlockRegistry::new();
    let descriptor = BlockDescriptor::from_json(r#"{ "type": "known", "message0": "k" }"#).unwrap();
    registry.register(descriptor.clone());

    let preview = render_preview(&descriptor.to_json().unwrap(), PreviewFormat::Json, &mut registry).unwrap();
    assert_eq!(preview, Preview::Unchanged);
}

#[test]
fn test_generated_schema_feeds_back_into_preview() {
    let schema = Compiler::default().compile(&adder()).unwrap().to_json().unwrap();
    let mut registry = BlockRegistry::new();
    let Preview::Block(block) = render_preview(&schema, PreviewFormat::Json, &mut registry).unwrap() else {
        panic!("Expected a rendered block");
    };
    assert!(block.has_output());
    assert_eq!(
        block.inputs.iter().map(|i| i.name.as_deref()).collect::<Vec<_>>(),
        vec![Some("A"), Some("B")]
    );
    assert_eq!(block.fields().count(), 2);
}
