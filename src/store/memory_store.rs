use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::{Collection, Store};
use crate::models::{InsertAck, UpdateAck};
use crate::utils::bson_json::id_to_string;

/// A process-local `Store` that mimics the subset of MongoDB semantics the
/// handlers rely on: insertion order, generated ObjectIds, equality filters.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

#[async_trait]
impl Store for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Vec<Document>, String> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches(document, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, String> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).and_then(|documents| {
            documents
                .iter()
                .find(|document| matches(document, &filter))
                .cloned()
        }))
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertAck, String> {
        let (id, document) = match document.get("_id").cloned() {
            Some(id) => (id, document),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                let mut with_id = Document::new();
                with_id.insert("_id", id.clone());
                for (key, value) in document {
                    with_id.insert(key, value);
                }
                (id, with_id)
            }
        };

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();
        if documents.iter().any(|existing| existing.get("_id") == Some(&id)) {
            return Err(format!(
                "Duplicate _id {} in {}",
                id_to_string(&id),
                collection
            ));
        }
        documents.push(document);

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id_to_string(&id),
        })
    }

    async fn count(&self, collection: Collection, filter: Document) -> Result<u64, String> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| documents.iter().filter(|d| matches(d, &filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn set_fields(
        &self,
        collection: Collection,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateAck, String> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(&collection)
            .and_then(|documents| documents.iter_mut().find(|d| matches(d, &filter)));

        let Some(document) = target else {
            return Ok(UpdateAck::unmatched());
        };

        let changed = fields
            .iter()
            .any(|(key, value)| document.get(key) != Some(value));
        for (key, value) in fields {
            document.insert(key, value);
        }

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(changed),
            ..Default::default()
        })
    }
}
