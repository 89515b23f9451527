//! Common test utilities and fixtures for integration tests
//!
//! Builds the full application router (CORS, tracing and panic layers
//! included) over an in-memory store, plus request builders and session
//! helpers shared by every test module.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use devconnect_auth::{AuthConfig, SessionAuthorizer};
use devconnect_common::{ApplicationUniqueness, Config};
use devconnect_jobs::InMemoryJobStore;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test_secret_key_for_testing_only";
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";

/// Application router plus handles on its store and a matching authorizer
pub struct TestApp {
    pub store: InMemoryJobStore,
    pub authorizer: SessionAuthorizer,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_uniqueness(ApplicationUniqueness::CheckThenInsert)
    }

    pub fn with_uniqueness(uniqueness: ApplicationUniqueness) -> Self {
        let mode = match uniqueness {
            ApplicationUniqueness::CheckThenInsert => "check-then-insert",
            ApplicationUniqueness::StoreEnforced => "store",
        };

        let config = Config::from_lookup(|key| match key {
            "JOB_STORE" => Some("memory".to_string()),
            "ACCESS_TOKEN_SECRET" => Some(TEST_SECRET.to_string()),
            "APPLICATION_UNIQUENESS" => Some(mode.to_string()),
            "CORS_ORIGIN" => Some(FRONTEND_ORIGIN.to_string()),
            _ => None,
        })
        .expect("test config should load");

        let store = InMemoryJobStore::new();
        let router = devconnect_app::create_app(&config, Arc::new(store.clone()))
            .expect("test router should build");

        Self {
            store,
            authorizer: SessionAuthorizer::new(AuthConfig::new(TEST_SECRET)),
            router,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Send a request through a fresh clone of the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `Cookie` header value carrying a valid session for `email`
    pub fn session_cookie(&self, email: &str) -> String {
        format!("token={}", self.authorizer.issue(email).unwrap())
    }

    /// Create a posting through the API and return its id
    pub async fn create_job(&self, body: Value) -> String {
        let response = self
            .send(json_request(Method::POST, "/api/v1/allJobs", Some(body)))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()["insertedId"]
            .as_str()
            .expect("insertedId should be a string")
            .to_string()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    /// The `error.code` field of an error body
    pub fn error_code(&self) -> String {
        self.json()["error"]["code"]
            .as_str()
            .expect("error body should carry a code")
            .to_string()
    }
}

/// Build a request with an optional JSON body
pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Build a bodyless request carrying a `Cookie` header
pub fn cookie_request(method: Method, uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// Sign a token with arbitrary timestamps, bypassing the authorizer
pub fn token_with_times(email: &str, iat: i64, exp: i64) -> String {
    encode(
        &Header::default(),
        &json!({ "email": email, "iat": iat, "exp": exp }),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn job_body(category: &str, owner: &str, applicants: u64) -> Value {
    json!({
        "jobCategory": category,
        "userEmail": owner,
        "applicantsNumber": applicants,
        "jobTitle": format!("{category} developer"),
    })
}
