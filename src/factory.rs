use crate::compiler::Compiler;
use crate::config::FactoryConfig;
use crate::error::GenerationError;
use crate::generator::StubGenerator;
use crate::preview::{Preview, PreviewFormat, render_preview};
use crate::render::BlockRegistry;
use crate::workspace::Workspace;
use tracing::{debug, warn};

/// The text produced by one successful generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FactoryOutput {
    /// The block schema as JSON.
    pub schema: String,
    /// The generator stub, when the preview produced a block to inspect.
    pub stub: Option<String>,
}

/// A block factory session.
///
/// Call [`Factory::update`] after every change to the editor tree. A pass that
/// fails leaves the previous output in place; the next change simply tries again.
pub struct Factory {
    config: FactoryConfig,
    compiler: Compiler,
    generator: StubGenerator,
    registry: BlockRegistry,
    output: Option<FactoryOutput>,
}

impl Factory {
    pub fn new(config: FactoryConfig) -> Self {
        let compiler = Compiler::builder()
            .with_help_url(&config.help_url)
            .with_tooltip(&config.tooltip)
            .build();
        let generator = StubGenerator::new(config.language).with_namespace(&config.namespace);
        Self {
            config,
            compiler,
            generator,
            registry: BlockRegistry::new(),
            output: None,
        }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// The last successfully generated output.
    pub fn output(&self) -> Option<&FactoryOutput> {
        self.output.as_ref()
    }

    /// Blocks the preview resolves against, besides the one being built.
    pub fn registry_mut(&mut self) -> &mut BlockRegistry {
        &mut self.registry
    }

    /// Regenerates schema and stub from the editor tree.
    ///
    /// Returns `Ok(None)` when there is nothing to generate from.
    pub fn update(
        &mut self,
        workspace: &Workspace,
    ) -> Result<Option<&FactoryOutput>, GenerationError> {
        let schema = match self.compile_schema(workspace) {
            Ok(schema) => schema,
            Err(e) if e.is_noop() => {
                debug!(reason = %e, "nothing to generate");
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "generation pass failed, keeping previous output");
                return Err(e);
            }
        };

        let stub = match self.stub_for(&schema, PreviewFormat::Json) {
            Ok(stub) => stub,
            Err(e) if e.is_noop() => None,
            Err(e) => {
                warn!(error = %e, "preview failed, keeping previous output");
                return Err(e);
            }
        };

        self.output = Some(FactoryOutput { schema, stub });
        Ok(self.output.as_ref())
    }

    /// Previews hand-supplied code in the configured format and regenerates
    /// the stub from it. Source code yields no stub and leaves the current one.
    pub fn preview(&mut self, code: &str) -> Result<Option<String>, GenerationError> {
        let stub = self.stub_for(code, self.config.format)?;
        if let (Some(stub), Some(output)) = (&stub, self.output.as_mut()) {
            output.stub = Some(stub.clone());
        }
        Ok(stub)
    }

    fn compile_schema(&self, workspace: &Workspace) -> Result<String, GenerationError> {
        self.compiler.compile(workspace)?.to_json()
    }

    fn stub_for(
        &mut self,
        code: &str,
        format: PreviewFormat,
    ) -> Result<Option<String>, GenerationError> {
        match render_preview(code, format, &mut self.registry)? {
            Preview::Block(instance) => {
                debug!(
                    block_type = %instance.block_type,
                    language = %self.generator.language(),
                    "generating stub"
                );
                Ok(Some(self.generator.generate(&instance)))
            }
            Preview::Source(_) | Preview::Unchanged => Ok(None),
        }
    }
}
