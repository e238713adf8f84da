pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::admin::handlers as admin;
use crate::assets::handlers as assets;
use crate::lifecycle::handlers as lifecycle;
use crate::records::handlers as records;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume reads
        .route(
            "/api/v1/resumes",
            get(records::handle_list).post(lifecycle::handle_create),
        )
        .route("/api/v1/resumes/all", get(records::handle_list_all))
        .route("/api/v1/resumes/search", get(records::handle_search))
        .route("/api/v1/resumes/stats", get(records::handle_stats))
        .route(
            "/api/v1/resumes/me",
            get(records::handle_get_mine)
                .put(lifecycle::handle_update_mine)
                .delete(lifecycle::handle_delete_mine),
        )
        .route(
            "/api/v1/resumes/:id",
            get(records::handle_get_by_id)
                .put(lifecycle::handle_update_by_id)
                .delete(lifecycle::handle_delete_by_id),
        )
        .route(
            "/api/v1/resumes/:id/hire-status",
            patch(lifecycle::handle_toggle_hire_status),
        )
        // Draft assets
        .route(
            "/api/v1/drafts/assets/:kind",
            post(assets::handle_replace_asset),
        )
        .route(
            "/api/v1/drafts/assets/:kind/remove",
            post(assets::handle_remove_asset),
        )
        // Admin dashboard
        .route("/api/v1/admin/resumes", get(admin::handle_admin_list))
        .route(
            "/api/v1/admin/resumes/bulk-delete",
            post(admin::handle_bulk_delete),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::assets::AssetKind;
    use crate::records::MemoryQueryCache;
    use crate::testing::{resume, Call, CallLog, FakeAssets, FakeRecords, SharedRecords};

    struct TestApp {
        log: CallLog,
        router: Router,
    }

    impl TestApp {
        fn new(records: FakeRecords, assets: FakeAssets) -> Self {
            let log = CallLog::default();
            let state = AppState {
                records: Arc::new(SharedRecords(Arc::new(records.sharing(&log)))),
                assets: Arc::new(assets.sharing(&log)),
                cache: Arc::new(MemoryQueryCache::new(Duration::from_secs(60))),
            };
            Self {
                log,
                router: build_router(state),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.log.lock().unwrap().clone()
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, body)
        }
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, "Bearer test-token")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, "Bearer test-token")
            .body(Body::empty())
            .unwrap()
    }

    fn complete_draft() -> Value {
        json!({
            "fullName": "Ada Lovelace",
            "jobTitle": "Analyst",
            "category": "c1",
            "photo": "https://x/a.jpg",
            "file": "https://x/a.pdf"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new(FakeRecords::default(), FakeAssets::default());
        let (status, body) = app
            .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_rejects_incomplete_draft_without_remote_calls() {
        let app = TestApp::new(FakeRecords::default(), FakeAssets::default());
        let mut draft = complete_draft();
        draft["fullName"] = json!("");

        let (status, body) = app
            .send(json_request(Method::POST, "/api/v1/resumes", draft))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(app.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_returns_created_resume() {
        let app = TestApp::new(FakeRecords::default(), FakeAssets::default());

        let (status, body) = app
            .send(json_request(Method::POST, "/api/v1/resumes", complete_draft()))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["fullName"], "Ada Lovelace");
        assert_eq!(body["cleanupFailures"], json!([]));
        assert_eq!(app.calls(), vec![Call::Create]);
    }

    #[tokio::test]
    async fn test_create_requires_token() {
        let app = TestApp::new(FakeRecords::default(), FakeAssets::default());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/resumes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(complete_draft().to_string()))
            .unwrap();

        let (status, _) = app.send(request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(app.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_loads_record_then_cascades() {
        let app = TestApp::new(
            FakeRecords::with(vec![resume(
                "r1",
                Some("https://x/a.jpg"),
                Some("https://x/a.pdf"),
            )]),
            FakeAssets::default().failing_deletes(),
        );

        let (status, body) = app
            .send(empty_request(Method::DELETE, "/api/v1/resumes/r1"))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cleanupFailures"].as_array().unwrap().len(), 2);
        assert_eq!(
            app.calls(),
            vec![
                Call::GetById("r1".to_string()),
                Call::DeleteById("r1".to_string()),
                Call::DeleteAsset(AssetKind::Photo, "a.jpg".to_string()),
                Call::DeleteAsset(AssetKind::Document, "a.pdf".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_of_unknown_id_is_not_found() {
        let app = TestApp::new(FakeRecords::default(), FakeAssets::default());

        let (status, _) = app
            .send(empty_request(Method::DELETE, "/api/v1/resumes/nope"))
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(app.calls(), vec![Call::GetById("nope".to_string())]);
    }

    #[tokio::test]
    async fn test_read_after_mutation_is_fresh() {
        let app = TestApp::new(
            FakeRecords::with(vec![resume("r1", None, None)]),
            FakeAssets::default(),
        );

        let (_, before) = app.send(empty_request(Method::GET, "/api/v1/resumes/r1")).await;
        app.send(empty_request(Method::PATCH, "/api/v1/resumes/r1/hire-status"))
            .await;
        let (_, after) = app.send(empty_request(Method::GET, "/api/v1/resumes/r1")).await;

        assert_eq!(before["isHired"], false);
        assert_eq!(after["isHired"], true);
        let gets = app
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::GetById(_)))
            .count();
        assert_eq!(gets, 2);
    }

    #[tokio::test]
    async fn test_get_mine_without_token_is_unauthorized() {
        let app = TestApp::new(FakeRecords::default(), FakeAssets::default());
        let (status, body) = app
            .send(
                Request::builder()
                    .uri("/api/v1/resumes/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_get_mine_when_absent_is_not_found() {
        let app = TestApp::new(FakeRecords::default(), FakeAssets::default());
        let (status, _) = app.send(empty_request(Method::GET, "/api/v1/resumes/me")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bulk_delete_failure_reports_progress() {
        let app = TestApp::new(
            FakeRecords::with(vec![
                resume("r1", None, None),
                resume("r2", None, None),
                resume("r3", None, None),
            ])
            .failing_deletes(&["r2"]),
            FakeAssets::default(),
        );

        let (status, body) = app
            .send(json_request(
                Method::POST,
                "/api/v1/admin/resumes/bulk-delete",
                json!({ "ids": ["r1", "r2", "r3"] }),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "BULK_DELETE_INCOMPLETE");
        assert_eq!(body["error"]["deleted"], json!(["r1"]));
        assert!(!app.calls().contains(&Call::DeleteById("r3".to_string())));
    }

    #[tokio::test]
    async fn test_admin_list_filters_full_list() {
        let mut hired = resume("r2", None, None);
        hired.is_hired = true;
        let app = TestApp::new(
            FakeRecords::with(vec![resume("r1", None, None), hired]),
            FakeAssets::default(),
        );

        let (status, body) = app
            .send(empty_request(Method::GET, "/api/v1/admin/resumes?hired=true"))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["resumes"][0]["_id"], "r2");
    }

    #[tokio::test]
    async fn test_remove_asset_returns_cleared_draft() {
        let app = TestApp::new(FakeRecords::default(), FakeAssets::default());

        let (status, body) = app
            .send(json_request(
                Method::POST,
                "/api/v1/drafts/assets/photo/remove",
                complete_draft(),
            ))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["photo"], Value::Null);
        assert_eq!(body["file"], "https://x/a.pdf");
    }

    #[tokio::test]
    async fn test_failed_remove_returns_unchanged_draft() {
        let app = TestApp::new(FakeRecords::default(), FakeAssets::default().failing_deletes());

        let (status, body) = app
            .send(json_request(
                Method::POST,
                "/api/v1/drafts/assets/pdf/remove",
                complete_draft(),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["draft"]["file"], "https://x/a.pdf");
    }

    #[tokio::test]
    async fn test_replace_asset_via_multipart() {
        let app = TestApp::new(FakeRecords::default(), FakeAssets::default());
        let boundary = "XPORTALBOUNDARY";
        let draft = complete_draft().to_string();
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"draft\"\r\n\r\n\
             {draft}\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"me.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNGDATA\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/drafts/assets/photo")
            .header(header::AUTHORIZATION, "Bearer test-token")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["photo"].as_str().unwrap().ends_with("me.png"));
        assert_eq!(body["data"]["file"], "https://x/a.pdf");
        assert_eq!(
            app.calls(),
            vec![
                Call::DeleteAsset(AssetKind::Photo, "a.jpg".to_string()),
                Call::Upload(AssetKind::Photo),
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_asset_kind_is_rejected() {
        let app = TestApp::new(FakeRecords::default(), FakeAssets::default());
        let (status, _) = app
            .send(json_request(
                Method::POST,
                "/api/v1/drafts/assets/video/remove",
                complete_draft(),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.calls().is_empty());
    }
}
