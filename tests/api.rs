//! REST endpoints exercised through the full router.

#![allow(clippy::panic, clippy::indexing_slicing)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{eventually, listing, spawn_app};

#[tokio::test]
async fn health_reports_healthy() {
    let app = spawn_app(Vec::new()).await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn categories_start_with_all() {
    let app = spawn_app(Vec::new()).await;
    let (status, body) = app.get("/config/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Alles");
    assert_eq!(body[0]["selects_all"], true);
    assert_eq!(body.as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn current_card_is_top_of_stack() {
    let app = spawn_app(vec![listing("a", "Huis"), listing("b", "Huis")]).await;
    let (status, body) = app.get("/api/v1/session/current").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "b");
}

#[tokio::test]
async fn current_on_empty_queue_is_conflict() {
    let app = spawn_app(Vec::new()).await;
    let (status, body) = app.get("/api/v1/session/current").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn like_without_body_takes_current_and_reaches_liked_set() {
    let app = spawn_app(vec![listing("a", "Huis"), listing("b", "Studio")]).await;

    let (status, body) = app.request("POST", "/api/v1/session/like", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"], true);
    assert_eq!(body["decision"]["listing"]["id"], "b");
    assert_eq!(body["decision"]["direction"], "like");
    assert_eq!(body["current"]["id"], "a");
    assert_eq!(body["queue_len"], 1);

    let service = std::sync::Arc::clone(&app.service);
    eventually(|| {
        let service = std::sync::Arc::clone(&service);
        async move { service.view().await.liked_count == 1 }
    })
    .await;

    let (status, body) = app.get("/api/v1/liked").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], "b");
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["category"], "Alles");
}

#[tokio::test]
async fn decision_on_unqueued_listing_is_not_applied() {
    let app = spawn_app(vec![listing("a", "Huis")]).await;
    let (status, body) = app
        .request(
            "POST",
            "/api/v1/session/dislike",
            Some(json!({"listing_id": "missing"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"], false);
    assert_eq!(body["queue_len"], 1);
}

#[tokio::test]
async fn malformed_decision_body_is_bad_request() {
    let app = spawn_app(vec![listing("a", "Huis")]).await;
    let Ok(request) = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/session/like")
        .body(axum::body::Body::from("{oops"))
    else {
        panic!("request should build");
    };
    let Ok(response) = tower::ServiceExt::oneshot(app.router.clone(), request).await else {
        panic!("router should answer");
    };
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dislike_on_empty_queue_is_conflict() {
    let app = spawn_app(Vec::new()).await;
    let (status, _) = app.request("POST", "/api/v1/session/dislike", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn undo_restores_card_once() {
    let app = spawn_app(vec![listing("a", "Huis"), listing("b", "Huis")]).await;
    app.request("POST", "/api/v1/session/dislike", None).await;

    let (status, body) = app.request("POST", "/api/v1/session/undo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restored"]["listing"]["id"], "b");
    assert_eq!(body["current"]["id"], "b");

    let (_, body) = app.request("POST", "/api/v1/session/undo", None).await;
    assert!(body["restored"].is_null());
    assert_eq!(body["current"]["id"], "b");
}

#[tokio::test]
async fn filter_and_search_narrow_liked_list() {
    let app = spawn_app(vec![
        listing("a", "Huis"),
        listing("b", "Appartement"),
        listing("c", "Appartement"),
    ])
    .await;
    for _ in 0..3 {
        app.request("POST", "/api/v1/session/like", None).await;
    }
    let service = std::sync::Arc::clone(&app.service);
    eventually(|| {
        let service = std::sync::Arc::clone(&service);
        async move { service.view().await.liked_count == 3 }
    })
    .await;

    let (status, body) = app
        .request("PUT", "/api/v1/liked/filter", Some(json!({"category": "appartement"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matching"], 2);

    let (_, body) = app
        .request("PUT", "/api/v1/liked/search", Some(json!({"query": "WONING C"})))
        .await;
    assert_eq!(body["matching"], 1);

    let (_, body) = app.get("/api/v1/liked").await;
    assert_eq!(body["data"][0]["id"], "c");
    assert_eq!(body["query"], "WONING C");

    let (status, _) = app
        .request("PUT", "/api/v1/liked/filter", Some(json!({"category": "  "})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn liked_list_is_paginated() {
    let app = spawn_app(vec![listing("a", "Huis"), listing("b", "Huis"), listing("c", "Huis")]).await;
    for _ in 0..3 {
        app.request("POST", "/api/v1/session/like", None).await;
    }
    let service = std::sync::Arc::clone(&app.service);
    eventually(|| {
        let service = std::sync::Arc::clone(&service);
        async move { service.view().await.liked_count == 3 }
    })
    .await;

    let (_, body) = app.get("/api/v1/liked?page=2&per_page=2").await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["pagination"]["total_pages"], 2);
}

#[tokio::test]
async fn remove_from_liked_is_accepted_then_applied() {
    let app = spawn_app(vec![listing("a", "Huis")]).await;
    app.request("POST", "/api/v1/session/like", None).await;
    let service = std::sync::Arc::clone(&app.service);
    eventually(|| {
        let service = std::sync::Arc::clone(&service);
        async move { service.view().await.liked_count == 1 }
    })
    .await;

    let (status, _) = app.request("DELETE", "/api/v1/liked/a", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    eventually(|| {
        let service = std::sync::Arc::clone(&service);
        async move { service.view().await.liked_count == 0 }
    })
    .await;
    assert!(app.feed.liked_ids(app.service.user_id()).is_empty());
}

#[tokio::test]
async fn remove_unknown_liked_listing_is_not_found() {
    let app = spawn_app(Vec::new()).await;
    let (status, body) = app.request("DELETE", "/api/v1/liked/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2002);
}

#[tokio::test]
async fn map_and_chats_follow_liked_set() {
    let app = spawn_app(vec![listing("a", "Huis")]).await;
    let (_, body) = app.get("/api/v1/liked/map").await;
    assert_eq!(body["markers"].as_array().map(Vec::len), Some(0));
    assert!(body["bounds"].is_null());

    app.request("POST", "/api/v1/session/like", None).await;
    let service = std::sync::Arc::clone(&app.service);
    eventually(|| {
        let service = std::sync::Arc::clone(&service);
        async move { service.view().await.liked_count == 1 }
    })
    .await;

    let (_, body) = app.get("/api/v1/liked/map").await;
    assert_eq!(body["markers"][0]["listing_id"], "a");

    let (_, body) = app.get("/api/v1/liked/chats").await;
    assert_eq!(body["data"][0]["agent_name"], "Els Peeters");
}

#[tokio::test]
async fn navigation_switches_screens() {
    let app = spawn_app(Vec::new()).await;
    let (_, body) = app.get("/api/v1/navigation").await;
    assert_eq!(body["screen"], "home");

    let (status, body) = app
        .request("PUT", "/api/v1/navigation", Some(json!({"screen": "map"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["screen"], "map");

    let (status, _) = app
        .request("PUT", "/api/v1/navigation", Some(json!({"screen": "settings"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = spawn_app(Vec::new()).await;
    let (status, body) = app.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/session"].is_object());
}
