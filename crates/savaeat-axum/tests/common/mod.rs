//! Router test harness over an in-memory database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use savaeat_axum::{AxumContext, CorsConfig, create_router};
use savaeat_core::RoutingPort;
use savaeat_db::TestDb;
use serde_json::{Value, json};
use tower::ServiceExt;

pub struct TestApp {
    router: Router,
    // Keeps the in-memory database alive for the router's lifetime.
    _db: TestDb,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(None).await
    }

    pub async fn with_routing(routing: Arc<dyn RoutingPort>) -> Self {
        Self::build(Some(routing)).await
    }

    async fn build(routing: Option<Arc<dyn RoutingPort>>) -> Self {
        let db = TestDb::new().await.unwrap();
        let ctx = AxumContext::from_pool(db.pool().clone(), routing);
        Self {
            router: create_router(ctx, &CorsConfig::AllowAll),
            _db: db,
        }
    }

    /// Send one request; the body comes back as JSON, or as a JSON string
    /// for plain-text responses, or `Null` when empty.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Register an account and return `(principal id, token)`.
    pub async fn register(&self, request: Value) -> (String, String) {
        let (status, body) = self.post("/api/auth/register", None, request).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        (
            body["user"]["principalId"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    pub async fn register_vendor(&self, name: &str, email: &str, lat: f64, lng: f64) -> (String, String) {
        self.register(vendor_request(name, email, lat, lng)).await
    }

    pub async fn register_client(&self, name: &str, email: &str) -> (String, String) {
        self.register(client_request(name, email)).await
    }
}

pub fn vendor_request(name: &str, email: &str, lat: f64, lng: f64) -> Value {
    json!({
        "role": "vendor",
        "name": name,
        "email": email,
        "password": "secret1",
        "profileImageUrl": "https://img.test/p.png",
        "bannerImageUrl": "https://img.test/b.png",
        "description": "Garba, attiéké",
        "shopName": name,
        "address": "Bè, Lomé",
        "phoneNumber": "+228 90 00 00 00",
        "latitude": lat,
        "longitude": lng
    })
}

pub fn client_request(name: &str, email: &str) -> Value {
    json!({
        "role": "client",
        "name": name,
        "email": email,
        "password": "secret1",
        "profileImageUrl": "https://img.test/c.png",
        "bannerImageUrl": "https://img.test/cb.png"
    })
}
