use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::Document;
use tracing::info;

use super::{memory_store::MemoryStore, mongodb_store::MongoDBStore};
use crate::config::StoreConfig;
use crate::models::{InsertAck, UpdateAck};

/// The two collections the service reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Jobs,
    Applications,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Jobs => write!(f, "jobs"),
            Collection::Applications => write!(f, "applications"),
        }
    }
}

/// The Store trait abstracts the document store. Filters are equality
/// matches on top-level fields; each call is atomic on its own and nothing
/// spans calls.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find(&self, collection: Collection, filter: Document)
        -> Result<Vec<Document>, String>;
    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, String>;
    /// Inserts `document`, assigning an ObjectId `_id` if it has none.
    async fn insert_one(&self, collection: Collection, document: Document)
        -> Result<InsertAck, String>;
    async fn count(&self, collection: Collection, filter: Document) -> Result<u64, String>;
    /// Sets `fields` on the first document matching `filter`.
    async fn set_fields(
        &self,
        collection: Collection,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateAck, String>;
}

/// Creates a concrete store implementation based on the StoreConfig.
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn Store>, String> {
    match config {
        StoreConfig::MongoDB(mongo_config) => {
            let store = MongoDBStore::new(mongo_config).await?;
            info!("Successfully created MongoDB store.");
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => {
            info!("Using in-memory store; documents will not survive a restart.");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
