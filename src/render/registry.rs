use crate::schema::BlockDescriptor;
use ahash::AHashMap;
use std::ops::{Deref, DerefMut};

/// Block type name used when a schema does not declare one.
pub const UNNAMED: &str = "unnamed";

/// The table of block definitions known to the preview.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    definitions: AHashMap<String, BlockDescriptor>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition under its declared type (or [`UNNAMED`]) and
    /// returns the type it was registered under.
    pub fn register(&mut self, descriptor: BlockDescriptor) -> String {
        let block_type = if descriptor.block_type.is_empty() {
            UNNAMED.to_string()
        } else {
            descriptor.block_type.clone()
        };
        self.definitions.insert(block_type.clone(), descriptor);
        block_type
    }

    pub fn get(&self, block_type: &str) -> Option<&BlockDescriptor> {
        self.definitions.get(block_type)
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.definitions.contains_key(block_type)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Hands out a scratch copy of the table. Whatever is registered through
    /// the guard is thrown away when it drops, on every exit path.
    pub fn isolate(&mut self) -> IsolatedRegistry<'_> {
        let saved = self.definitions.clone();
        IsolatedRegistry {
            registry: self,
            saved: Some(saved),
        }
    }
}

/// Scoped access to a registry; the original table is restored on drop.
pub struct IsolatedRegistry<'a> {
    registry: &'a mut BlockRegistry,
    saved: Option<AHashMap<String, BlockDescriptor>>,
}

impl IsolatedRegistry<'_> {
    /// Block types that were added or redefined inside this scope, sorted.
    pub fn changed_types(&self) -> Vec<&str> {
        let saved = self.saved.as_ref();
        let mut changed: Vec<&str> = self
            .registry
            .definitions
            .iter()
            .filter(|(name, def)| saved.and_then(|s| s.get(*name)) != Some(*def))
            .map(|(name, _)| name.as_str())
            .collect();
        changed.sort_unstable();
        changed
    }
}

impl Deref for IsolatedRegistry<'_> {
    type Target = BlockRegistry;

    fn deref(&self) -> &BlockRegistry {
        self.registry
    }
}

impl DerefMut for IsolatedRegistry<'_> {
    fn deref_mut(&mut self) -> &mut BlockRegistry {
        self.registry
    }
}

impl Drop for IsolatedRegistry<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.registry.definitions = saved;
        }
    }
}
