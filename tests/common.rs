#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use career_code::config::{Config, ConfigV1};
use career_code::models::{InsertAck, UpdateAck};
use career_code::routes::create_router;
use career_code::state::AppState;
use career_code::store::memory_store::MemoryStore;
use career_code::store::{create_store, Collection, Store};
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use mongodb::bson::Document;
use serde_json::Value;
use tower::ServiceExt;

pub const EMPLOYER_TOKEN: &str = "employer-token";
pub const APPLICANT_TOKEN: &str = "applicant-token";
pub const SESSION_SECRET: &str = "test-secret";

const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:3000
logging:
  level: "debug"
  format: "json"
store:
  type: memory
providers:
  - name: "Plain tokens"
    type: "plain"
    tokens:
      - token: employer-token
        email: a@x.com
      - token: applicant-token
        email: b@y.com
session:
  secret: test-secret
cors:
  allowed_origins:
    - http://localhost:5173
"#;

pub fn load_test_config() -> ConfigV1 {
    let config: Config = Figment::new()
        .merge(Yaml::string(TEST_CONFIG))
        .extract()
        .expect("Failed to parse test config YAML");
    config.into_latest()
}

pub async fn build_app() -> Router {
    let config = Arc::new(load_test_config());
    let store = create_store(&config.store)
        .await
        .expect("memory store should build");
    create_router(AppState::new(config, store))
}

/// Builds the router around a caller-supplied store.
pub fn build_app_with_store(store: Arc<dyn Store>) -> Router {
    create_router(AppState::new(Arc::new(load_test_config()), store))
}

/// Which store calls a [`FaultyStore`] fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
    Everything,
    Counts,
}

/// A memory store that reports errors for the calls selected by `fault`.
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub fault: Fault,
}

impl FaultyStore {
    pub fn new(fault: Fault) -> Self {
        FaultyStore {
            inner: MemoryStore::new(),
            fault,
        }
    }

    fn check(&self, collection: Collection) -> Result<(), String> {
        match self.fault {
            Fault::Everything => Err(format!("{} is unreachable", collection)),
            Fault::Counts => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl Store for FaultyStore {
    async fn find(&self, collection: Collection, filter: Document) -> Result<Vec<Document>, String> {
        self.check(collection)?;
        self.inner.find(collection, filter).await
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, String> {
        self.check(collection)?;
        self.inner.find_one(collection, filter).await
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertAck, String> {
        self.check(collection)?;
        self.inner.insert_one(collection, document).await
    }

    async fn count(&self, collection: Collection, _filter: Document) -> Result<u64, String> {
        self.check(collection)?;
        Err(format!("count on {} timed out", collection))
    }

    async fn set_fields(
        &self,
        collection: Collection,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateAck, String> {
        self.check(collection)?;
        self.inner.set_fields(collection, filter, fields).await
    }
}

fn with_connect_info(mut request: Request<Body>) -> Request<Body> {
    request.extensions_mut().insert(ConnectInfo(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        0,
    )));
    request
}

pub fn request(method: Method, path: &str) -> Request<Body> {
    with_connect_info(
        Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("failed to build request"),
    )
}

pub fn json_request(method: Method, path: &str, body: &Value) -> Request<Body> {
    with_connect_info(
        Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("failed to build request"),
    )
}

pub fn request_with_bearer(path: &str, token: &str) -> Request<Body> {
    with_connect_info(
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .expect("failed to build request"),
    )
}

pub fn request_with_cookie(path: &str, cookie: &str) -> Request<Body> {
    with_connect_info(
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .expect("failed to build request"),
    )
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("request should complete")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

/// Posts `body` to `path` and returns the `insertedId` of the ack.
pub async fn insert(app: &Router, path: &str, body: Value) -> String {
    let response = send(app, json_request(Method::POST, path, &body)).await;
    assert_eq!(response.status(), 200, "insert into {} failed", path);
    let ack = body_json(response).await;
    assert_eq!(ack["acknowledged"], true);
    ack["insertedId"]
        .as_str()
        .expect("insertedId should be a string")
        .to_string()
}
