//! Helpers for driving the router in-process

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use igdl::core::web_server::{build_router, WebState};
use igdl::download::proxy::build_proxy_client;
use igdl::download::ResourceResolver;
use std::sync::Arc;
use tower::ServiceExt;

/// Router backed by the given resolver and a real proxy client.
pub fn test_router(resolver: Arc<dyn ResourceResolver>) -> Router {
    let client = build_proxy_client().expect("proxy client");
    build_router(WebState::new(resolver, client))
}

/// Issue a GET request against the router.
pub async fn get(router: Router, uri: &str) -> Response<Body> {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
