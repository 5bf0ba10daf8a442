pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job seekers
        .route("/", get(handlers::handle_index))
        .route("/index.html", get(handlers::handle_index))
        .route("/jobDetail/:id", get(handlers::handle_job_detail))
        .route("/filter_job", get(handlers::handle_filter_job))
        .route("/search", get(handlers::handle_search))
        // Employers
        .route("/employer.html", get(handlers::handle_employer_form))
        .route("/create_job", post(handlers::handle_create_job))
        .route("/save_job", post(handlers::handle_save_job))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    use crate::classifier::{CategoryClassifier, ClassifierError};
    use crate::store::JobStore;

    struct FixedClassifier(&'static str);

    #[async_trait]
    impl CategoryClassifier for FixedClassifier {
        async fn predict(&self, _description: &str) -> Result<String, ClassifierError> {
            Ok(self.0.to_string())
        }
    }

    struct MissingModel;

    #[async_trait]
    impl CategoryClassifier for MissingModel {
        async fn predict(&self, _description: &str) -> Result<String, ClassifierError> {
            Err(ClassifierError::InvalidArtifact("no model".to_string()))
        }
    }

    const NEW_JOB: &str = "job_title=Night+Nurse&company=City+Hospital\
        &job_description=Care+for+patients%3A+nights&salary=30000\
        &other_information_label=location&other_information=York";

    fn put(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn setup(classifier: Arc<dyn CategoryClassifier>) -> (TempDir, AppState, Router) {
        let dir = tempdir().unwrap();
        put(
            dir.path(),
            "Sales/Job_00001.txt",
            "Title: Sales Rep\nCompany: Market Inc\n",
        );
        put(
            dir.path(),
            "Engineering/Job_00002.txt",
            "Title: Civil Engineer\nCompany: Bridges plc\n",
        );

        let state = AppState::new(JobStore::load(dir.path()).unwrap(), classifier);
        let app = build_router(state.clone());
        (dir, state, app)
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(app, request).await
    }

    async fn post_form(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn titles(body: &Value) -> Vec<String> {
        body["jobs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["Title"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, _state, app) = setup(Arc::new(FixedClassifier("Sales")));
        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_lists_everything() {
        let (_dir, _state, app) = setup(Arc::new(FixedClassifier("Sales")));

        for uri in ["/", "/index.html"] {
            let (status, body) = get_json(&app, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(titles(&body), vec!["Civil Engineer", "Sales Rep"]);
            assert_eq!(body["categories"], serde_json::json!(["Engineering", "Sales"]));
        }
    }

    #[tokio::test]
    async fn test_filter_job() {
        let (_dir, _state, app) = setup(Arc::new(FixedClassifier("Sales")));

        let (_, all) = get_json(&app, "/filter_job?selected_category=All").await;
        assert_eq!(all["jobs"].as_array().unwrap().len(), 2);

        let (_, sales) = get_json(&app, "/filter_job?selected_category=Sales").await;
        assert_eq!(titles(&sales), vec!["Sales Rep"]);

        let (status, none) = get_json(&app, "/filter_job?selected_category=Teaching").await;
        assert_eq!(status, StatusCode::OK);
        assert!(none["jobs"].as_array().unwrap().is_empty());

        let (_, absent) = get_json(&app, "/filter_job").await;
        assert_eq!(absent["jobs"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (_dir, _state, app) = setup(Arc::new(FixedClassifier("Sales")));

        let (_, body) = get_json(&app, "/search?keyword=market").await;
        assert_eq!(titles(&body), vec!["Sales Rep"]);

        let (_, body) = get_json(&app, "/search?keyword=ENGINEER").await;
        assert_eq!(titles(&body), vec!["Civil Engineer"]);

        let (status, body) = get_json(&app, "/search?keyword=astronaut").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["jobs"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_job_detail() {
        let (_dir, _state, app) = setup(Arc::new(FixedClassifier("Sales")));

        let (status, body) = get_json(&app, "/jobDetail/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ID"], "00002");
        assert_eq!(body["Category"], "Engineering");

        let (status, body) = get_json(&app, "/jobDetail/404").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({}));

        let (status, body) = get_json(&app, "/jobDetail/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_employer_form_lists_fields_and_categories() {
        let (_dir, _state, app) = setup(Arc::new(FixedClassifier("Sales")));
        let (status, body) = get_json(&app, "/employer.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fields"][0], "job_title");
        assert_eq!(body["categories"], serde_json::json!(["Engineering", "Sales"]));
    }

    #[tokio::test]
    async fn test_create_job_previews_predicted_category() {
        let (_dir, state, app) = setup(Arc::new(FixedClassifier("Healthcare_Nursing")));

        let (status, body) = post_form(&app, "/create_job", NEW_JOB).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_category"], "Healthcare_Nursing");
        assert_eq!(body["other_info_label"], "Location");
        assert_eq!(body["job"]["Title"], "Night Nurse");
        assert_eq!(body["job"]["Description"], "Care for patients: nights");
        assert_eq!(body["job"]["Location"], "York");

        // Preview does not store anything.
        assert_eq!(state.read_store().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_job_model_failure_is_reported() {
        let (_dir, _state, app) = setup(Arc::new(MissingModel));
        let (status, body) = post_form(&app, "/create_job", NEW_JOB).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "CLASSIFIER_ERROR");
    }

    #[tokio::test]
    async fn test_create_job_rejects_reserved_label() {
        let (_dir, _state, app) = setup(Arc::new(FixedClassifier("Sales")));
        let body = NEW_JOB.replace(
            "other_information_label=location",
            "other_information_label=category",
        );
        let (status, body) = post_form(&app, "/create_job", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_save_job_persists_and_redirects() {
        let (dir, state, app) = setup(Arc::new(FixedClassifier("Sales")));

        let request = Request::builder()
            .method("POST")
            .uri("/save_job")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("{NEW_JOB}&category=Healthcare_Nursing")))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/index.html");

        let path = dir.path().join("Healthcare_Nursing").join("Job_00003.txt");
        assert!(path.is_file());
        {
            let store = state.read_store().unwrap();
            assert_eq!(store.len(), 3);
            assert_eq!(store.list()[2].get("Location"), Some("York"));
        }

        let (_, body) = get_json(&app, "/jobDetail/3").await;
        assert_eq!(body["Title"], "Night Nurse");
        assert_eq!(body["Category"], "Healthcare_Nursing");
        let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
        assert!(keys.contains(&"Salary".to_string()));

        let reloaded = JobStore::load(dir.path()).unwrap();
        assert_eq!(reloaded.get(3), state.read_store().unwrap().get(3));
    }

    #[tokio::test]
    async fn test_save_job_rejects_path_category() {
        let (dir, state, app) = setup(Arc::new(FixedClassifier("Sales")));
        let body = format!("{NEW_JOB}&category=..%2Fescape");
        let (status, body) = post_form(&app, "/save_job", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(state.read_store().unwrap().len(), 2);
        assert!(!dir.path().join("../escape").exists());
    }
}
