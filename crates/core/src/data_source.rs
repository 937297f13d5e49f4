//! Data source trait and related types

use async_trait::async_trait;
use inkdash_types::{DataPoint, FieldMetadata};

use crate::error::Unavailable;

/// Metadata about a data source
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    /// Unique identifier for this source type
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of what this source provides
    pub description: String,
}

impl SourceMetadata {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Trait for all data sources
///
/// A data source pulls one external value set (weather, commit counts, ...)
/// and reports it as data points for the fields it declares. Failures are
/// returned as `Unavailable` and never escalate past the scheduler, which
/// renders every declared field of a failed source as a placeholder.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Get metadata about this source
    fn metadata(&self) -> &SourceMetadata;

    /// Fields this source fills in
    fn fields(&self) -> Vec<FieldMetadata>;

    /// Fetch current values. Must not retry; a miss is shown until next cycle.
    async fn fetch(&self) -> Result<Vec<DataPoint>, Unavailable>;

    /// Whether credentials/identifiers for this source are present
    fn is_configured(&self) -> bool {
        true
    }
}

/// Type-erased data source for dynamic dispatch
pub type BoxedDataSource = Box<dyn DataSource>;
