use crate::{
    entities::user,
    errors::ServiceError,
    handlers::common::validate_input,
    services::users::{RegisterInput, SignupInput},
    session::Session,
    ApiResponse, AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Response DTOs

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            created_at: model.created_at,
        }
    }
}

// Request DTOs

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Describes the fields a form route expects. The JSON rendition of
/// rendering an empty form.
fn form_descriptor(fields: &[&str]) -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(serde_json::json!({ "fields": fields })))
}

/// Expected login form fields
pub async fn login_form() -> Json<ApiResponse<serde_json::Value>> {
    form_descriptor(&["username", "password"])
}

/// Expected signup form fields
pub async fn signup_form() -> Json<ApiResponse<serde_json::Value>> {
    form_descriptor(&["username", "email", "password"])
}

/// Expected registration form fields
pub async fn register_form() -> Json<ApiResponse<serde_json::Value>> {
    form_descriptor(&["username", "email", "password", "password_confirm"])
}

/// Create an account
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid fields", body = crate::errors::ErrorResponse),
        (status = 409, description = "Username or email taken", body = crate::errors::ErrorResponse),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ServiceError> {
    let input = SignupInput {
        username: payload.username,
        email: payload.email,
        password: payload.password,
    };
    validate_input(&input)?;

    let user = state.services.users.signup(input).await?;

    let mut response = ApiResponse::success(UserResponse::from(user));
    response.message = Some("Account created successfully!".to_string());
    Ok((StatusCode::CREATED, Json(response)))
}

/// Registration form variant of signup with password confirmation
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid fields or password mismatch", body = crate::errors::ErrorResponse),
        (status = 409, description = "Username or email taken", body = crate::errors::ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ServiceError> {
    let input = RegisterInput {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        password_confirm: payload.password_confirm,
    };
    validate_input(&input)?;

    let user = state.services.users.register(input).await?;

    let mut response = ApiResponse::success(UserResponse::from(user));
    response.message = Some("Account created! Please log in.".to_string());
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in, binding the account to the caller's session
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<UserResponse>),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ServiceError> {
    let user = state
        .services
        .users
        .verify_credentials(&payload.username, &payload.password)
        .await?
        .ok_or_else(|| {
            ServiceError::AuthError(
                "Please enter a correct username and password.".to_string(),
            )
        })?;

    session.log_in(user.id);

    let mut response = ApiResponse::success(UserResponse::from(user));
    response.message = Some("You are now logged in.".to_string());
    Ok(Json(response))
}

/// Log out, flushing the whole session (cart included)
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<serde_json::Value>),
    )
)]
pub async fn logout(session: Session) -> Json<ApiResponse<serde_json::Value>> {
    session.log_out();

    let mut response = ApiResponse::success(serde_json::json!({ "logged_out": true }));
    response.message = Some("Logged out successfully!".to_string());
    Json(response)
}
