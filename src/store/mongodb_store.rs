use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection as MongoCollection};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{InsertAck, UpdateAck};
use crate::store::{Collection, Store};
use crate::utils::bson_json::id_to_string;

fn default_jobs_collection() -> String {
    "jobs".to_string()
}

fn default_applications_collection() -> String {
    "applications".to_string()
}

/// The config struct for MongoDB connections.
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
pub struct MongoDBConfig {
    pub uri: String,
    pub database: String,
    #[serde(default = "default_jobs_collection")]
    pub jobs_collection: String,
    #[serde(default = "default_applications_collection")]
    pub applications_collection: String,
}

/// A concrete `Store` implementation that uses MongoDB.
///
/// One client is created at startup and shared by every request; the driver
/// pools connections underneath it.
pub struct MongoDBStore {
    jobs: MongoCollection<Document>,
    applications: MongoCollection<Document>,
}

impl MongoDBStore {
    /// Connects, pins the stable server API and pings the deployment.
    pub async fn new(config: &MongoDBConfig) -> Result<Self, String> {
        info!("Connecting to MongoDB database '{}'", config.database);

        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| format!("Failed to parse MongoDB URI: {}", e))?;
        client_options.app_name = Some("career-code".to_string());
        client_options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(client_options)
            .map_err(|e| format!("Failed to create MongoDB client: {}", e))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| format!("Failed to ping MongoDB: {}", e))?;
        info!("Pinged MongoDB deployment; connection established.");

        let database = client.database(&config.database);
        Ok(Self {
            jobs: database.collection::<Document>(&config.jobs_collection),
            applications: database.collection::<Document>(&config.applications_collection),
        })
    }

    fn collection(&self, collection: Collection) -> &MongoCollection<Document> {
        match collection {
            Collection::Jobs => &self.jobs,
            Collection::Applications => &self.applications,
        }
    }
}

#[async_trait]
impl Store for MongoDBStore {
    async fn find(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Vec<Document>, String> {
        debug!("find on {} with {}", collection, filter);
        let cursor = self
            .collection(collection)
            .find(filter, None)
            .await
            .map_err(|e| format!("Failed to query {}: {}", collection, e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| format!("Failed to read {} documents: {}", collection, e))
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, String> {
        debug!("find_one on {} with {}", collection, filter);
        self.collection(collection)
            .find_one(filter, None)
            .await
            .map_err(|e| format!("Failed to query {}: {}", collection, e))
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertAck, String> {
        let result = self
            .collection(collection)
            .insert_one(document, None)
            .await
            .map_err(|e| format!("Failed to insert into {}: {}", collection, e))?;

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id_to_string(&result.inserted_id),
        })
    }

    async fn count(&self, collection: Collection, filter: Document) -> Result<u64, String> {
        self.collection(collection)
            .count_documents(filter, None)
            .await
            .map_err(|e| format!("Failed to count {}: {}", collection, e))
    }

    async fn set_fields(
        &self,
        collection: Collection,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateAck, String> {
        let result = self
            .collection(collection)
            .update_one(filter, doc! { "$set": fields }, None)
            .await
            .map_err(|e| format!("Failed to update {}: {}", collection, e))?;

        let upserted_id = result.upserted_id.as_ref().map(id_to_string);
        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        })
    }
}
