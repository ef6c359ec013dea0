use crate::config::FactoryConfig;
use crate::factory::{Factory, FactoryOutput};
use crate::workspace::{EditorTree, IntoWorkspace};
use pyo3::prelude::*;
use pyo3::types::PyDict;

impl<'py> IntoPyObject<'py> for FactoryOutput {
    type Target = PyDict;
    type Output = Bound<'py, Self::Target>;
    type Error = PyErr;

    fn into_pyobject(self, py: Python<'py>) -> Result<Self::Output, Self::Error> {
        let dict = PyDict::new(py);
        dict.set_item("schema", self.schema)?;
        match self.stub {
            Some(stub) => dict.set_item("stub", stub)?,
            None => dict.set_item("stub", py.None())?,
        }
        Ok(dict)
    }
}

/// A block definition compiler.
///
/// Holds one factory session. Each call to `generate` is one generation
/// pass; a failing pass raises but leaves the last good output available
/// through `last_output`.
#[pyclass(name = "Katachi", unsendable)]
struct KatachiPy {
    factory: Factory,
}

#[pymethods]
impl KatachiPy {
    /// Creates a session.
    ///
    /// Args:
    ///     config_json (str | None): Optional JSON configuration, e.g.
    ///         `{"language": "Python", "helpUrl": "..."}`.
    ///
    /// Raises:
    ///     ValueError: If the configuration does not parse.
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => FactoryConfig::from_json(json)
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?,
            None => FactoryConfig::default(),
        };
        Ok(KatachiPy {
            factory: Factory::new(config),
        })
    }

    /// Generates the block schema and generator stub for an editor tree.
    ///
    /// Args:
    ///     tree_json (str): The editor tree, `{"blocks": [...]}`.
    ///
    /// Returns:
    ///     dict | None: `{"schema": str, "stub": str | None}`, or None when
    ///         the tree holds no block definition.
    ///
    /// Raises:
    ///     ValueError: If the tree is malformed or the pass fails.
    fn generate(&mut self, tree_json: &str) -> PyResult<Option<FactoryOutput>> {
        let to_py = |e: String| PyErr::new::<pyo3::exceptions::PyValueError, _>(e);
        let workspace = EditorTree::from_json(tree_json)
            .and_then(IntoWorkspace::into_workspace)
            .map_err(|e| to_py(e.to_string()))?;
        let output = self
            .factory
            .update(&workspace)
            .map_err(|e| to_py(e.to_string()))?;
        Ok(output.cloned())
    }

    /// The output of the last successful pass, if any.
    fn last_output(&self) -> Option<FactoryOutput> {
        self.factory.output().cloned()
    }
}

/// Python bindings for the katachi block definition compiler.
#[pymodule]
fn katachi(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<KatachiPy>()?;
    Ok(())
}
