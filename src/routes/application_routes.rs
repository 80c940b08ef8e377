//! Job application endpoints.

use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::gates::{BearerAuth, OwnerEmail};
use crate::models::{InsertAck, UpdateAck};
use crate::state::AppState;
use crate::store::{Collection, Store};
use crate::utils::bson_json::document_to_json;
use crate::utils::http_helpers::HTTPError;

/// Job fields copied onto each application in the applicant's listing.
const ENRICHED_FIELDS: [&str; 3] = ["company", "title", "company_logo"];

/// Registers application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/applications",
            get(list_applicant_applications).post(submit_application),
        )
        .route("/applications/job/:id", get(list_job_applications))
        .route("/applications/:id", patch(update_status))
}

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    status: Bson,
}

/// Stores the posted application verbatim; `jobId` is not checked.
async fn submit_application(
    State(state): State<AppState>,
    Json(application): Json<Document>,
) -> Result<Json<InsertAck>, HTTPError> {
    let ack = state
        .store
        .insert_one(Collection::Applications, application)
        .await
        .map_err(HTTPError::internal)?;
    info!("Stored application {}", ack.inserted_id);
    Ok(Json(ack))
}

/// The caller's applications, each augmented with its job's company, title
/// and logo.
async fn list_applicant_applications(
    State(state): State<AppState>,
    owner: OwnerEmail<BearerAuth>,
) -> Result<Json<Vec<Value>>, HTTPError> {
    let applications = state
        .store
        .find(Collection::Applications, doc! { "applicant": owner.email.as_str() })
        .await
        .map_err(HTTPError::internal)?;

    let mut enriched = Vec::with_capacity(applications.len());
    for mut application in applications {
        enrich(state.store.as_ref(), &mut application).await?;
        enriched.push(document_to_json(application));
    }

    Ok(Json(enriched))
}

/// Copies job metadata onto `application`. A missing or unparsable job
/// reference marks only this item with `enrichment_error`; store failures
/// are returned.
async fn enrich(store: &dyn Store, application: &mut Document) -> Result<(), HTTPError> {
    let job_id = match application.get("jobId") {
        Some(Bson::String(id)) => ObjectId::parse_str(id).ok(),
        Some(Bson::ObjectId(oid)) => Some(*oid),
        _ => None,
    };

    let job = match job_id {
        Some(oid) => store
            .find_one(Collection::Jobs, doc! { "_id": oid })
            .await
            .map_err(HTTPError::internal)?,
        None => None,
    };

    match job {
        Some(job) => {
            for field in ENRICHED_FIELDS {
                if let Some(value) = job.get(field) {
                    application.insert(field, value.clone());
                }
            }
        }
        None => {
            warn!(
                "Application {:?} references missing job {:?}",
                application.get("_id"),
                application.get("jobId")
            );
            application.insert("enrichment_error", "referenced job not found");
        }
    }
    Ok(())
}

/// Applications submitted for job `id`, unenriched.
async fn list_job_applications(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Value>>, HTTPError> {
    let applications = state
        .store
        .find(Collection::Applications, doc! { "jobId": id })
        .await
        .map_err(HTTPError::internal)?;
    Ok(Json(applications.into_iter().map(document_to_json).collect()))
}

/// Sets `status` on application `id`. Any value is accepted; a malformed
/// id matches nothing.
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<UpdateAck>, HTTPError> {
    let Ok(oid) = ObjectId::parse_str(&id) else {
        return Ok(Json(UpdateAck::unmatched()));
    };

    let ack = state
        .store
        .set_fields(
            Collection::Applications,
            doc! { "_id": oid },
            doc! { "status": update.status },
        )
        .await
        .map_err(HTTPError::internal)?;
    info!(
        "Status update on application {}: matched {}, modified {}",
        id, ack.matched_count, ack.modified_count
    );
    Ok(Json(ack))
}
