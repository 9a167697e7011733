use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{patch, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;
use crate::views::{self, AdminDashboard, AnalyticsReport, IssueFilter, StudentDashboard};

#[derive(Deserialize)]
struct StudentIssueQuery {
    status: Option<IssueStatus>,
    search: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
        .route("/issues", get(list_issues).post(create_issue))
        .route("/issues/categories", get(list_categories))
        .route("/issues/{id}", patch(update_issue))
        .route("/students/{id}/issues", get(list_student_issues))
        .route("/dashboard/student", get(student_dashboard))
        .route("/dashboard/admin", get(admin_dashboard))
        .route("/analytics", get(analytics))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.ping().await?;
    Ok(StatusCode::OK)
}

async fn signed_in(state: &AppState) -> Result<User, AppError> {
    state.store.current_user().await.ok_or(AppError::Unauthorized)
}

async fn signed_in_admin(state: &AppState) -> Result<User, AppError> {
    let user = signed_in(state).await?;
    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>
) -> Result<Json<User>, AppError> {
    let user = state.store.login(&req.email, &req.password).await?;
    Ok(Json(user))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>
) -> Result<Json<User>, AppError> {
    require("email", &req.email)?;
    require("password", &req.password)?;
    require("name", &req.name)?;
    let user = state.store.register(req).await?;
    Ok(Json(user))
}

async fn logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn session(State(state): State<AppState>) -> Json<AuthState> {
    Json(state.store.auth().await)
}

async fn list_issues(
    State(state): State<AppState>,
    Query(filter): Query<IssueFilter>
) -> Result<Json<Vec<Issue>>, AppError> {
    signed_in_admin(&state).await?;
    let issues = state.store.issues().await;
    Ok(Json(filter.apply(issues)))
}

async fn create_issue(
    State(state): State<AppState>,
    Json(req): Json<ReportIssueRequest>
) -> Result<(StatusCode, Json<Issue>), AppError> {
    let reporter = signed_in(&state).await?;
    require("title", &req.title)?;
    require("description", &req.description)?;
    require("category", &req.category)?;
    require("location", &req.location)?;

    let issue = state.store.create_issue(req.into_new_issue(&reporter)).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

async fn update_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<IssuePatch>
) -> Result<Json<Issue>, AppError> {
    signed_in_admin(&state).await?;
    let issue = state.store.update_issue(&id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(issue))
}

async fn list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    let issues = state.store.issues().await;
    Json(views::categories(&issues))
}

async fn list_student_issues(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<StudentIssueQuery>
) -> Json<Vec<Issue>> {
    let filter = IssueFilter {
        status: params.status,
        search: params.search,
        ..IssueFilter::default()
    };
    let issues = state.store.student_issues(&id).await;
    Json(filter.apply(issues))
}

async fn student_dashboard(State(state): State<AppState>) -> Result<Json<StudentDashboard>, AppError> {
    let user = signed_in(&state).await?;
    let issues = state.store.student_issues(&user.id).await;
    Ok(Json(views::student_dashboard(&issues)))
}

async fn admin_dashboard(State(state): State<AppState>) -> Result<Json<AdminDashboard>, AppError> {
    signed_in_admin(&state).await?;
    let issues = state.store.issues().await;
    Ok(Json(views::admin_dashboard(&issues, Utc::now())))
}

async fn analytics(State(state): State<AppState>) -> Result<Json<AnalyticsReport>, AppError> {
    signed_in_admin(&state).await?;
    let issues = state.store.issues().await;
    Ok(Json(views::analytics(&issues)))
}
