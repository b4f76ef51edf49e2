pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ingest::handlers as ingest;
use crate::preview::handlers as preview;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(health::health_handler))
        // Ingestion
        .route(
            "/api/v1/cv/parse",
            post(ingest::handle_parse).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Tailoring
        .route("/api/v1/cv/match", post(tailoring::handle_match))
        .route("/api/v1/cv/rewrite", post(tailoring::handle_rewrite))
        // Preview
        .route("/api/v1/cv/edit", post(preview::handle_edit))
        .route("/api/v1/cv/markdown", post(preview::handle_markdown))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::tailoring::policy::RewritePolicy;
    use crate::vocabulary::Vocabulary;

    const JOB: &str =
        "We need a React and TypeScript frontend developer with 3+ years experience building UI.";

    fn app() -> Router {
        build_router(AppState {
            config: Config::default(),
            vocabulary: Arc::new(Vocabulary::default()),
            rewrite_policy: Arc::new(RewritePolicy::HeuristicOnly),
        })
    }

    fn jane() -> Value {
        json!({
            "name": "Jane Doe",
            "summary": "Frontend dev.",
            "skills": [{"name": "React"}],
            "workExperience": [{
                "company": "Acme",
                "position": "Dev",
                "period": "2020-Present",
                "responsibilities": ["Built UI with React"]
            }],
            "education": []
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart(file_name: &str, content_type: &str, contents: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--BOUNDARY\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(b"\r\n--BOUNDARY--\r\n");

        Request::builder()
            .method("POST")
            .uri("/api/v1/cv/parse")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["rewriteBackend"], "heuristic");
    }

    #[tokio::test]
    async fn test_rewrite_end_to_end() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/cv/rewrite",
                json!({"cv": jane(), "jobDescription": JOB}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["matches"]["skills"], json!(["React"]));
        assert_eq!(
            body["rewrittenCv"]["workExperience"][0]["responsibilities"][0],
            "Built UI with React (key skill for this role)"
        );
        assert_eq!(body["originalCv"]["workExperience"][0]["responsibilities"][0], "Built UI with React");
        assert_eq!(body["strategy"], "heuristic");
        let mentions_typescript = body["improvements"]
            .as_array()
            .unwrap()
            .iter()
            .any(|i| i.as_str().unwrap().to_lowercase().contains("typescript"));
        assert!(mentions_typescript);
    }

    #[tokio::test]
    async fn test_short_job_description_is_rejected() {
        for uri in ["/api/v1/cv/rewrite", "/api/v1/cv/match"] {
            let response = app()
                .oneshot(post_json(uri, json!({"cv": jane(), "jobDescription": "React dev"})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = json_body(response).await;
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_match_returns_keywords() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/cv/match",
                json!({"cv": jane(), "jobDescription": JOB}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["keywords"], json!(["typescript", "react", "frontend"]));
        assert_eq!(body["matches"]["experience"], json!(["react"]));
    }

    #[tokio::test]
    async fn test_edit_applies_typed_setters() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/cv/edit",
                json!({
                    "cv": jane(),
                    "edits": [
                        {"field": "position", "index": 0, "value": "Senior Dev"},
                        {"field": "skillLevel", "index": 0, "value": "Expert"}
                    ]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["workExperience"][0]["position"], "Senior Dev");
        assert_eq!(body["skills"][0]["level"], "Expert");
        assert_eq!(body["contactInfo"]["email"], "no-email@example.com");
    }

    #[tokio::test]
    async fn test_edit_out_of_range_is_unprocessable() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/cv/edit",
                json!({"cv": jane(), "edits": [{"field": "company", "index": 3, "value": "X"}]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_markdown_download() {
        let response = app()
            .oneshot(post_json("/api/v1/cv/markdown", json!({"cv": jane()})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/markdown; charset=utf-8"
        );
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("jane-doe-resume.md"));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8(bytes.to_vec()).unwrap().starts_with("# Jane Doe"));
    }

    #[tokio::test]
    async fn test_parse_rejects_unsupported_format() {
        let response = app()
            .oneshot(multipart("cv.txt", "text/plain", b"Jane Doe"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_parse_unreadable_pdf_is_degraded_not_failed() {
        let response = app()
            .oneshot(multipart("cv.pdf", "application/pdf", b"%PDF-1.4 garbage"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["extractionDegraded"], true);
        assert!(body["degradedReason"].is_string());
        assert_eq!(body["resume"]["name"], "Unknown Name");
        assert!(body["resume"]["workExperience"].is_array());
    }
}
