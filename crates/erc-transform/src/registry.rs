//! Transformer lookup by data source.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use erc_model::DataSource;

use crate::sources::{
    BienesTransformer, InversionTransformer, ServiciosTransformer, TurismoTransformer,
};
use crate::transformer::Transformer;

/// Registry of transformers keyed by data source.
///
/// The registry is read-only once built; [`default_registry`] caches the
/// shipped transformers for the life of the process.
pub struct TransformerRegistry {
    transformers: BTreeMap<DataSource, Box<dyn Transformer>>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self {
            transformers: BTreeMap::new(),
        }
    }

    /// Registers a transformer under its source, replacing any previous one.
    pub fn register(&mut self, transformer: Box<dyn Transformer>) {
        self.transformers.insert(transformer.source(), transformer);
    }

    pub fn get(&self, source: DataSource) -> Option<&dyn Transformer> {
        self.transformers.get(&source).map(AsRef::as_ref)
    }

    /// Registered sources in declaration order.
    pub fn sources(&self) -> impl Iterator<Item = DataSource> + '_ {
        self.transformers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl Default for TransformerRegistry {
    /// Registry with every shipped data source.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TurismoTransformer::new()));
        registry.register(Box::new(InversionTransformer::new()));
        registry.register(Box::new(ServiciosTransformer::new()));
        registry.register(Box::new(BienesTransformer::new()));
        registry
    }
}

/// Shared registry of the shipped transformers.
pub fn default_registry() -> &'static TransformerRegistry {
    static REGISTRY: OnceLock<TransformerRegistry> = OnceLock::new();
    REGISTRY.get_or_init(TransformerRegistry::default)
}
