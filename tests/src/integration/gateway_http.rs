//! # Gateway HTTP Surface
//!
//! The REST layer driven end to end: identity scoping, the error envelope,
//! CORS preflight, and engine failures surfacing with the right statuses.
//! Requests go through `tower::ServiceExt::oneshot`; no sockets involved.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use shared_types::UserId;
    use swap_engine::test_utils::{swappable_slot, FlakyStorage, ManualClock};
    use swap_engine::{EngineConfig, InMemorySwapStorage, SwapService, SystemTimeSource};
    use swap_gateway::{build_router, AppState, GatewayConfig};
    use tower::ServiceExt;

    fn app() -> Router {
        let engine = SwapService::new(
            InMemorySwapStorage::new(),
            SystemTimeSource,
            EngineConfig::for_testing(),
        );
        build_router(AppState::new(Arc::new(engine)), &GatewayConfig::default())
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        user: Option<UserId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user.to_string());
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn slot_body(title: &str, hour: u32) -> Value {
        json!({
            "title": title,
            "start": format!("2025-06-02T{hour:02}:00:00Z"),
            "end": format!("2025-06-02T{hour:02}:30:00Z"),
        })
    }

    #[tokio::test]
    async fn each_header_identity_sees_its_own_data() {
        let app = app();
        let alice = UserId::new();
        let bob = UserId::new();

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/slots",
            Some(alice),
            Some(slot_body("alice only", 9)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, alices) = call(&app, Method::GET, "/api/slots", Some(alice), None).await;
        let (_, bobs) = call(&app, Method::GET, "/api/slots", Some(bob), None).await;

        assert_eq!(alices.as_array().unwrap().len(), 1);
        assert!(bobs.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn every_failure_wears_the_same_envelope() {
        let app = app();
        let alice = UserId::new();
        let bob = UserId::new();

        // Seed one locked pair so a conflict can be provoked.
        let (_, alice_slot) = call(
            &app,
            Method::POST,
            "/api/slots",
            Some(alice),
            Some(slot_body("a", 9)),
        )
        .await;
        let alice_id = alice_slot["id"].as_str().unwrap().to_owned();
        call(
            &app,
            Method::PATCH,
            &format!("/api/slots/{alice_id}/swappable"),
            Some(alice),
            None,
        )
        .await;
        let (_, bob_slot) = call(
            &app,
            Method::POST,
            "/api/slots",
            Some(bob),
            Some(slot_body("b", 10)),
        )
        .await;
        let bob_id = bob_slot["id"].as_str().unwrap().to_owned();
        call(
            &app,
            Method::PATCH,
            &format!("/api/slots/{bob_id}/swappable"),
            Some(bob),
            None,
        )
        .await;
        let propose = json!({ "offered_slot": bob_id, "requested_slot": alice_id });
        let (_, request) = call(
            &app,
            Method::POST,
            "/api/swaps/requests",
            Some(bob),
            Some(propose.clone()),
        )
        .await;
        let request_id = request["id"].as_str().unwrap().to_owned();

        let failures = [
            // Validation: blank title.
            call(
                &app,
                Method::POST,
                "/api/slots",
                Some(alice),
                Some(slot_body("  ", 12)),
            )
            .await,
            // Identity: no header at all.
            call(&app, Method::GET, "/api/slots", None, None).await,
            // Authorization: the requester answering their own proposal.
            call(
                &app,
                Method::POST,
                &format!("/api/swaps/requests/{request_id}/response"),
                Some(bob),
                Some(json!({ "accept": true })),
            )
            .await,
            // Not found: a route that does not exist.
            call(&app, Method::GET, "/api/unknown", Some(alice), None).await,
            // Conflict: proposing an already locked pair.
            call(
                &app,
                Method::POST,
                "/api/swaps/requests",
                Some(bob),
                Some(propose),
            )
            .await,
        ];

        let expected = [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
            StatusCode::CONFLICT,
        ];
        for ((status, body), want) in failures.iter().zip(expected) {
            assert_eq!(*status, want);
            let object = body.as_object().unwrap();
            assert_eq!(object.len(), 1, "only the error key: {body}");
            assert!(object["error"].is_string());
        }
    }

    #[tokio::test]
    async fn reject_then_retry_journey_over_http() {
        let app = app();
        let alice = UserId::new();
        let bob = UserId::new();

        let (_, alice_slot) = call(
            &app,
            Method::POST,
            "/api/slots",
            Some(alice),
            Some(slot_body("alice", 9)),
        )
        .await;
        let alice_id = alice_slot["id"].as_str().unwrap().to_owned();
        call(
            &app,
            Method::PATCH,
            &format!("/api/slots/{alice_id}/swappable"),
            Some(alice),
            None,
        )
        .await;
        let (_, bob_slot) = call(
            &app,
            Method::POST,
            "/api/slots",
            Some(bob),
            Some(slot_body("bob", 15)),
        )
        .await;
        let bob_id = bob_slot["id"].as_str().unwrap().to_owned();
        call(
            &app,
            Method::PATCH,
            &format!("/api/slots/{bob_id}/swappable"),
            Some(bob),
            None,
        )
        .await;

        // First attempt is turned down.
        let propose = json!({ "offered_slot": bob_id, "requested_slot": alice_id });
        let (_, first) = call(
            &app,
            Method::POST,
            "/api/swaps/requests",
            Some(bob),
            Some(propose.clone()),
        )
        .await;
        let first_id = first["id"].as_str().unwrap();
        let (status, outcome) = call(
            &app,
            Method::POST,
            &format!("/api/swaps/requests/{first_id}/response"),
            Some(alice),
            Some(json!({ "accept": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["request"]["status"], "REJECTED");
        assert_eq!(outcome["offered_slot"]["status"], "SWAPPABLE");

        // Rejection reopens the pair; the second attempt succeeds.
        let (status, second) = call(
            &app,
            Method::POST,
            "/api/swaps/requests",
            Some(bob),
            Some(propose),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let second_id = second["id"].as_str().unwrap();
        let (_, outcome) = call(
            &app,
            Method::POST,
            &format!("/api/swaps/requests/{second_id}/response"),
            Some(alice),
            Some(json!({ "accept": true })),
        )
        .await;
        assert_eq!(outcome["request"]["status"], "ACCEPTED");

        // History shows both rounds from each side.
        let (_, stats) = call(&app, Method::GET, "/api/swaps/stats", Some(alice), None).await;
        assert_eq!(stats["total"], 2);
        assert_eq!(stats["rejected"], 1);
        assert_eq!(stats["accepted"], 1);
        assert_eq!(stats["pending"], 0);

        let (_, view) = call(&app, Method::GET, "/api/swaps/my-requests", Some(bob), None).await;
        assert_eq!(view["outgoing"].as_array().unwrap().len(), 2);
        // Newest first.
        assert_eq!(view["outgoing"][0]["id"], second_id);
    }

    #[tokio::test]
    async fn storage_exhaustion_returns_503() {
        let storage = FlakyStorage::new(InMemorySwapStorage::new());
        let handle = storage.clone();
        let engine = SwapService::new(
            storage,
            Arc::new(ManualClock::default()),
            EngineConfig::for_testing(),
        );
        let alice = UserId::new();
        let bob = UserId::new();
        let a = swappable_slot(&engine, alice, "offer", 9);
        let b = swappable_slot(&engine, bob, "target", 10);
        let limit = engine.config().commit_retry_limit;

        let app = build_router(
            AppState::new(Arc::new(engine)),
            &GatewayConfig::default(),
        );

        handle.contend_next_commits(limit);
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/swaps/requests",
            Some(alice),
            Some(json!({ "offered_slot": a.id, "requested_slot": b.id })),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("contention"));
    }

    #[tokio::test]
    async fn cors_preflight_is_answered_for_browser_clients() {
        let app = app();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/slots")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }
}
