//! Job posting endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde_json::Value;
use tracing::{debug, info};

use crate::gates::{BearerAuth, EmailQuery, OwnerEmail};
use crate::models::InsertAck;
use crate::state::AppState;
use crate::store::Collection;
use crate::utils::bson_json::{document_to_json, id_to_string};
use crate::utils::http_helpers::HTTPError;

/// Registers job routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/applications", get(list_employer_jobs))
        .route("/jobs/:id", get(get_job))
}

/// Lists all jobs, or those posted by `email` when given.
async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Value>>, HTTPError> {
    let filter = match query.email.filter(|email| !email.is_empty()) {
        Some(email) => doc! { "hr_email": email },
        None => Document::new(),
    };

    let jobs = state
        .store
        .find(Collection::Jobs, filter)
        .await
        .map_err(HTTPError::internal)?;
    Ok(Json(jobs.into_iter().map(document_to_json).collect()))
}

/// Fetches one job. A malformed id is answered like an unknown one: `null`.
async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>, HTTPError> {
    let Ok(oid) = ObjectId::parse_str(&id) else {
        debug!("Job id '{}' is not an ObjectId", id);
        return Ok(Json(None));
    };

    let job = state
        .store
        .find_one(Collection::Jobs, doc! { "_id": oid })
        .await
        .map_err(HTTPError::internal)?;
    Ok(Json(job.map(document_to_json)))
}

/// Stores the posted job verbatim.
async fn create_job(
    State(state): State<AppState>,
    Json(job): Json<Document>,
) -> Result<Json<InsertAck>, HTTPError> {
    let ack = state
        .store
        .insert_one(Collection::Jobs, job)
        .await
        .map_err(HTTPError::internal)?;
    info!("Created job {}", ack.inserted_id);
    Ok(Json(ack))
}

/// Counts are stored as `Int64`, saturating at `i64::MAX`.
fn count_to_bson(count: u64) -> Bson {
    Bson::Int64(i64::try_from(count).unwrap_or(i64::MAX))
}

/// The caller's own postings, each with the number of applications it has
/// received.
async fn list_employer_jobs(
    State(state): State<AppState>,
    owner: OwnerEmail<BearerAuth>,
) -> Result<Json<Vec<Value>>, HTTPError> {
    let jobs = state
        .store
        .find(Collection::Jobs, doc! { "hr_email": owner.email.as_str() })
        .await
        .map_err(HTTPError::internal)?;

    // One count per job; a failed count fails the whole listing.
    let mut counted = Vec::with_capacity(jobs.len());
    for mut job in jobs {
        let job_id = job.get("_id").map(id_to_string).unwrap_or_default();
        let application_count = state
            .store
            .count(Collection::Applications, doc! { "jobId": job_id })
            .await
            .map_err(HTTPError::internal)?;
        job.insert("application_count", count_to_bson(application_count));
        counted.push(document_to_json(job));
    }

    Ok(Json(counted))
}
