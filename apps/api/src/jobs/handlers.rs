//! Axum route handlers for job listings.

use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    response::Redirect,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::jobs::forms::{JobForm, SaveJobForm, FORM_FIELDS};
use crate::models::record::Record;
use crate::state::AppState;
use crate::store::ALL_CATEGORIES;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub selected_category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Record>,
    /// Every category in use, for the filter drop-down.
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EmployerFormResponse {
    pub fields: Vec<&'static str>,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePreviewResponse {
    pub job: Record,
    pub other_info_label: String,
    pub predicted_category: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET / and GET /index.html
pub async fn handle_index(
    State(state): State<AppState>,
) -> Result<Json<JobListResponse>, AppError> {
    let store = state.read_store()?;
    Ok(Json(JobListResponse {
        jobs: store.list().to_vec(),
        categories: store.categories(),
    }))
}

/// GET /employer.html
///
/// Describes the listing form and offers the known categories.
pub async fn handle_employer_form(
    State(state): State<AppState>,
) -> Result<Json<EmployerFormResponse>, AppError> {
    let store = state.read_store()?;
    Ok(Json(EmployerFormResponse {
        fields: FORM_FIELDS.to_vec(),
        categories: store.categories(),
    }))
}

/// GET /jobDetail/:id
///
/// An unknown ID yields an empty object, not a 404. A non-numeric ID is a
/// validation error.
pub async fn handle_job_detail(
    State(state): State<AppState>,
    job_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Record>, AppError> {
    let Path(job_id) = job_id
        .map_err(|e| AppError::Validation(format!("Invalid job id: {}", e.body_text())))?;

    let store = state.read_store()?;
    let record = store.get(job_id).cloned().unwrap_or_default();
    if record.is_empty() {
        debug!("No job with id {job_id}");
    }
    Ok(Json(record))
}

/// GET /filter_job?selected_category=
pub async fn handle_filter_job(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let category = params
        .selected_category
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());
    let store = state.read_store()?;
    Ok(Json(JobListResponse {
        jobs: store.filter(&category),
        categories: store.categories(),
    }))
}

/// GET /search?keyword=
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let keyword = params.keyword.unwrap_or_default();
    let store = state.read_store()?;
    Ok(Json(JobListResponse {
        jobs: store.search(&keyword),
        categories: store.categories(),
    }))
}

/// POST /create_job
///
/// Predicts a category for the submitted listing and echoes it back for the
/// employer to confirm. Nothing is stored yet.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Form(form): Form<JobForm>,
) -> Result<Json<CreatePreviewResponse>, AppError> {
    let job = form.preview()?;
    let other_info_label = form
        .extra_field()?
        .map(|(label, _)| label)
        .unwrap_or_default();

    let predicted_category = state.classifier.predict(&form.job_description).await?;

    Ok(Json(CreatePreviewResponse {
        job,
        other_info_label,
        predicted_category,
    }))
}

/// POST /save_job
///
/// Stores the confirmed listing and sends the browser back to the listing page.
pub async fn handle_save_job(
    State(state): State<AppState>,
    Form(form): Form<SaveJobForm>,
) -> Result<Redirect, AppError> {
    let job = form.into_new_job()?;

    // ID assignment, file write and append happen under one write lock.
    let record = tokio::task::spawn_blocking(move || {
        let mut store = state.write_store()?;
        store.create(job).map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;

    info!("Created job {} in '{}'", record.id(), record.category());
    Ok(Redirect::to("/index.html"))
}
