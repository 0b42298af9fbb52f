//! Student login — verifies the argon2id hash and issues a JWT whose
//! subject is the student id. Also serves the authenticated "me" lookup.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use voting::model::Student;
use voting::store::StudentStore;
use worldvote_core::{Claims, CurrentStudent, ServiceError};

use crate::bootstrap::verify_password;
use crate::routes::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Register login routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/login", post(login_handler))
        .route("/api/v1/auth/me", get(me_handler))
}

/// Handle POST /api/v1/auth/login.
async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let student = authenticate(state.coordinator.students(), &body.email, &body.password)?;

    let config = &state.server_config.jwt;
    let token = issue_token(&student, &config.secret, config.expire_secs)?;

    tracing::info!(student_id = student.id, "student logged in");
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: config.expire_secs,
    }))
}

/// Handle GET /api/v1/auth/me.
async fn me_handler(
    State(state): State<AppState>,
    CurrentStudent(student_id): CurrentStudent,
) -> Result<Json<Student>, ServiceError> {
    Ok(Json(state.coordinator.students().get(student_id)?))
}

/// Verify credentials against the student store.
///
/// Unknown email and wrong password produce the same response — callers
/// must not be able to probe which emails are registered.
pub fn authenticate(
    students: &StudentStore,
    email: &str,
    password: &str,
) -> Result<Student, ServiceError> {
    let invalid = || ServiceError::Unauthorized("invalid email or password".into());

    let student = students
        .find_by_email(email.trim())?
        .ok_or_else(invalid)?;

    if !verify_password(password, &student.password_hash) {
        return Err(invalid());
    }
    Ok(student)
}

/// Sign an access token for the student.
pub fn issue_token(
    student: &Student,
    secret: &str,
    expire_secs: u64,
) -> Result<String, ServiceError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: student.id.to_string(),
        name: student.full_name.clone(),
        iat: now,
        exp: now + expire_secs as i64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ServiceError::Internal(format!("JWT encode failed: {e}")))
}
