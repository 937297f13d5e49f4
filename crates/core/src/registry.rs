//! Registry for data sources

use crate::data_source::BoxedDataSource;
use crate::error::ConfigError;
use std::collections::BTreeMap;

/// Function that creates a data source
pub type SourceFactory = Box<dyn Fn() -> BoxedDataSource + Send + Sync>;

/// Registry for data sources
///
/// Built-in providers are registered at startup; the scheduler receives the
/// instantiated list and never hardcodes individual provider calls.
pub struct Registry {
    sources: BTreeMap<String, SourceFactory>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            sources: BTreeMap::new(),
        }
    }

    /// Register a data source. A later registration replaces an earlier one.
    pub fn register_source<F>(&mut self, id: &str, factory: F)
    where
        F: Fn() -> BoxedDataSource + Send + Sync + 'static,
    {
        if self.sources.insert(id.to_string(), Box::new(factory)).is_some() {
            log::warn!("Data source '{}' already registered, replacing", id);
        }
    }

    /// Create a data source by ID
    pub fn create_source(&self, id: &str) -> Result<BoxedDataSource, ConfigError> {
        let factory = self
            .sources
            .get(id)
            .ok_or_else(|| ConfigError::invalid("source", id, "unknown data source"))?;
        Ok(factory())
    }

    /// Instantiate every registered source, ordered by ID
    pub fn create_all(&self) -> Vec<BoxedDataSource> {
        self.sources.values().map(|factory| factory()).collect()
    }

    /// List all registered source IDs
    pub fn list_sources(&self) -> Vec<String> {
        self.sources.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::{DataSource, SourceMetadata};
    use crate::error::Unavailable;
    use async_trait::async_trait;
    use inkdash_types::{DataPoint, FieldMetadata};

    struct Dummy(SourceMetadata);

    #[async_trait]
    impl DataSource for Dummy {
        fn metadata(&self) -> &SourceMetadata {
            &self.0
        }
        fn fields(&self) -> Vec<FieldMetadata> {
            Vec::new()
        }
        async fn fetch(&self) -> Result<Vec<DataPoint>, Unavailable> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = Registry::new();
        registry.register_source("b", || Box::new(Dummy(SourceMetadata::new("b", "B", ""))));
        registry.register_source("a", || Box::new(Dummy(SourceMetadata::new("a", "A", ""))));

        assert_eq!(registry.list_sources(), vec!["a", "b"]);
        assert_eq!(registry.create_source("a").unwrap().metadata().id, "a");
        assert!(registry.create_source("zzz").is_err());

        let all = registry.create_all();
        let ids: Vec<_> = all.iter().map(|s| s.metadata().id.clone()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
