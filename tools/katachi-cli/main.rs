use clap::{Parser, ValueEnum};
use katachi::prelude::*;
use std::fs;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LanguageCli {
    #[value(name = "javascript")]
    JavaScript,
    Python,
    Php,
    Dart,
    Lua,
}

impl From<LanguageCli> for TargetLanguage {
    fn from(value: LanguageCli) -> Self {
        match value {
            LanguageCli::JavaScript => TargetLanguage::JavaScript,
            LanguageCli::Python => TargetLanguage::Python,
            LanguageCli::Php => TargetLanguage::Php,
            LanguageCli::Dart => TargetLanguage::Dart,
            LanguageCli::Lua => TargetLanguage::Lua,
        }
    }
}

/// Compiles a block definition from the block editor into a block schema and a generator stub
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the editor tree JSON file
    tree_path: String,

    /// Optional JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Target language of the generator stub (overrides the config file)
    #[arg(short, long, value_enum)]
    language: Option<LanguageCli>,

    /// Preview code (schema JSON or generator source) to render instead of the generated schema
    #[arg(long)]
    preview: Option<String>,

    /// How to read the preview code: json, source or manual (overrides the config file)
    #[arg(long)]
    format: Option<String>,

    /// Map a custom editor block type onto a built-in one, as `custom=builtin`
    #[arg(long = "type-map", value_name = "CUSTOM=BUILTIN")]
    type_map: Vec<String>,

    /// Write the schema here instead of stdout
    #[arg(long)]
    schema_out: Option<String>,

    /// Write the generator stub here instead of stdout
    #[arg(long)]
    stub_out: Option<String>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    run(cli);
}

fn run(cli: Cli) {
    let total_start = Instant::now();

    // --- 1. Configuration ---
    let mut config = match &cli.config {
        Some(path) => FactoryConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => FactoryConfig::default(),
    };
    if let Some(language) = cli.language {
        config.language = language.into();
    }
    if let Some(format) = &cli.format {
        config.format = format
            .parse()
            .unwrap_or_else(|e: GenerationError| exit_with_error(&e.to_string()));
    }
    debug!(?config, "configuration loaded");

    // --- 2. Loading and Conversion ---
    let tree_json = fs::read_to_string(&cli.tree_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read editor tree '{}': {}",
            &cli.tree_path, e
        ))
    });
    let tree = EditorTree::from_json(&tree_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse editor tree: {}", e)));

    let mut converter = TreeConverter::new();
    for mapping in &cli.type_map {
        let (custom, builtin) = mapping.split_once('=').unwrap_or_else(|| {
            exit_with_error(&format!(
                "Invalid type mapping '{}', expected CUSTOM=BUILTIN",
                mapping
            ))
        });
        converter = converter.with_type_mapping(custom.trim(), builtin.trim());
    }
    let workspace = converter
        .convert(tree)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert editor tree: {}", e)));
    info!(nodes = workspace.len(), "loaded editor tree");

    // --- 3. Generation ---
    let mut factory = Factory::new(config);
    let output = match factory.update(&workspace) {
        Ok(Some(output)) => output.clone(),
        Ok(None) => {
            info!("No block definition found, nothing to generate");
            return;
        }
        Err(e) => exit_with_error(&format!("Generation failed: {}", e)),
    };

    let mut stub = output.stub;
    if let Some(path) = &cli.preview {
        let code = fs::read_to_string(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read preview code '{}': {}", path, e))
        });
        match factory.preview(&code) {
            Ok(Some(preview_stub)) => stub = Some(preview_stub),
            Ok(None) => info!("Preview code defines no new block, keeping generated stub"),
            Err(e) => exit_with_error(&format!("Preview failed: {}", e)),
        }
    }

    // --- 4. Output ---
    write_or_print(cli.schema_out.as_deref(), &output.schema);
    match stub {
        Some(stub) => write_or_print(cli.stub_out.as_deref(), &stub),
        None => info!("No generator stub produced"),
    }

    info!(elapsed = ?total_start.elapsed(), "done");
}

fn write_or_print(path: Option<&str>, content: &str) {
    match path {
        Some(path) => {
            fs::write(path, content).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path, e))
            });
            info!(path, "wrote output");
        }
        None => println!("{}\n", content),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
