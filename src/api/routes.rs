//! API route handlers

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::server::SharedState;
use crate::auth::middleware::{extract_credential, CurrentUser};
use crate::auth::models::{LoginRequest, RegisterRequest, User, UserInfo};
use crate::auth::session;
use crate::auth::token::{
    generate_verification_token, TokenOutcome, TokenPurpose, VerificationToken,
};
use crate::store::Category;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

// Shared deny responses. The guard middleware reuses these so a hidden
// admin resource answers exactly like a missing route.

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}

pub fn unauthorized() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::err("Authentication required")),
    )
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::err("Invalid email or password")),
    )
        .into_response()
}

fn with_cookie(mut response: axum::response::Response, cookie: &str) -> axum::response::Response {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Auth routes

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let state = state.read().await;

    if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::err(
                "Username, email and a password of at least 8 characters are required",
            )),
        )
            .into_response();
    }

    let password_hash = match bcrypt::hash(&req.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::err("Registration failed")),
            )
                .into_response();
        }
    };

    let user = User::new(req.username, req.email, password_hash);
    let user_id = user.id.clone();
    let email = user.email.clone();

    if let Err(e) = state.users.insert(user).await {
        return (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::err(e.to_string())),
        )
            .into_response();
    }

    // Only the hash is persisted; the secret leaves through the mailer
    let issued = generate_verification_token();
    state
        .tokens
        .insert(VerificationToken::new(
            user_id,
            TokenPurpose::EmailVerification,
            &issued,
        ))
        .await;
    state.mailer.send_verification_link(&email, &issued.secret).await;

    (
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Registered. Check your email to verify your account.",
        )),
    )
        .into_response()
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let state = state.read().await;

    let Some(user) = state.users.find_by_email(&req.email).await else {
        return invalid_credentials();
    };

    match bcrypt::verify(&req.password, &user.password_hash) {
        Ok(true) => {}
        _ => return invalid_credentials(),
    }

    let credential = state.sessions.create_session(&user.id).await;
    let cookie = session::set_cookie_header(&state.config.session, &credential);

    tracing::info!(user_id = %user.id, "user logged in");

    let response = (
        StatusCode::OK,
        Json(ApiResponse::ok(UserInfo::from(&user))),
    )
        .into_response();
    with_cookie(response, &cookie)
}

/// Revoke the current session. Idempotent: succeeds with the same
/// acknowledgment whether or not a session existed.
pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> impl IntoResponse {
    let state = state.read().await;

    if let Some(credential) = extract_credential(&headers, &state.config.session.cookie_name) {
        state.sessions.clear_session(&credential).await;
    }

    let cookie = session::clear_cookie_header(&state.config.session);
    let response = (StatusCode::OK, Json(ApiResponse::ok("Logged out"))).into_response();
    with_cookie(response, &cookie)
}

pub async fn me(
    State(state): State<SharedState>,
    Extension(current): Extension<CurrentUser>,
) -> impl IntoResponse {
    let Some(principal) = current.0 else {
        return unauthorized().into_response();
    };

    let state = state.read().await;
    match state.users.find_by_id(&principal.user_id).await {
        Some(user) => (
            StatusCode::OK,
            Json(ApiResponse::ok(UserInfo::from(&user))),
        )
            .into_response(),
        None => unauthorized().into_response(),
    }
}

pub async fn verify_email(
    State(state): State<SharedState>,
    Json(req): Json<VerifyEmailRequest>,
) -> impl IntoResponse {
    let state = state.read().await;

    match state
        .tokens
        .consume(&req.token, TokenPurpose::EmailVerification)
        .await
    {
        TokenOutcome::Valid { user_id } => match state.users.mark_email_verified(&user_id).await {
            Ok(()) => (StatusCode::OK, Json(ApiResponse::ok("Email verified"))).into_response(),
            Err(e) => {
                tracing::error!("Consumed token for missing user: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::err("Verification failed")),
                )
                    .into_response()
            }
        },
        TokenOutcome::NotFound => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::err("Verification link is invalid")),
        )
            .into_response(),
        TokenOutcome::Expired => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::err("Verification link has expired")),
        )
            .into_response(),
        TokenOutcome::AlreadyUsed => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::err(
                "Verification link has already been used",
            )),
        )
            .into_response(),
    }
}

/// Mint a reset token for a known email. The acknowledgment is uniform
/// so the endpoint cannot be used to probe for registered addresses.
pub async fn request_password_reset(
    State(state): State<SharedState>,
    Json(req): Json<PasswordResetRequest>,
) -> impl IntoResponse {
    let state = state.read().await;

    if let Some(user) = state.users.find_by_email(&req.email).await {
        let issued = generate_verification_token();
        state
            .tokens
            .insert(VerificationToken::new(
                user.id.clone(),
                TokenPurpose::PasswordReset,
                &issued,
            ))
            .await;
        state
            .mailer
            .send_password_reset_link(&user.email, &issued.secret)
            .await;
    }

    (
        StatusCode::OK,
        Json(ApiResponse::ok(
            "If the email is registered, a reset link is on its way.",
        )),
    )
}

pub async fn confirm_password_reset(
    State(state): State<SharedState>,
    Json(req): Json<PasswordResetConfirm>,
) -> impl IntoResponse {
    let state = state.read().await;

    if req.new_password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::err(
                "Password must be at least 8 characters",
            )),
        )
            .into_response();
    }

    match state
        .tokens
        .consume(&req.token, TokenPurpose::PasswordReset)
        .await
    {
        TokenOutcome::Valid { user_id } => {
            let password_hash = match bcrypt::hash(&req.new_password, bcrypt::DEFAULT_COST) {
                Ok(hash) => hash,
                Err(e) => {
                    tracing::error!("Password hashing failed: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ApiResponse::<()>::err("Password reset failed")),
                    )
                        .into_response();
                }
            };
            match state.users.set_password_hash(&user_id, password_hash).await {
                Ok(()) => (
                    StatusCode::OK,
                    Json(ApiResponse::ok(
                        "Password reset. You can now log in with your new password.",
                    )),
                )
                    .into_response(),
                Err(e) => {
                    tracing::error!("Consumed token for missing user: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ApiResponse::<()>::err("Password reset failed")),
                    )
                        .into_response()
                }
            }
        }
        TokenOutcome::NotFound => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::err("Reset link is invalid")),
        )
            .into_response(),
        TokenOutcome::Expired => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::err("Reset link has expired")),
        )
            .into_response(),
        TokenOutcome::AlreadyUsed => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::err("Reset link has already been used")),
        )
            .into_response(),
    }
}

pub async fn change_password(
    State(state): State<SharedState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> impl IntoResponse {
    let Some(principal) = current.0 else {
        return unauthorized().into_response();
    };

    let state = state.read().await;

    if req.new_password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::err(
                "Password must be at least 8 characters",
            )),
        )
            .into_response();
    }

    let Some(user) = state.users.find_by_id(&principal.user_id).await else {
        return unauthorized().into_response();
    };

    match bcrypt::verify(&req.current_password, &user.password_hash) {
        Ok(true) => {}
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::err("Current password is incorrect")),
            )
                .into_response()
        }
    }

    let password_hash = match bcrypt::hash(&req.new_password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::err("Password change failed")),
            )
                .into_response();
        }
    };

    match state.users.set_password_hash(&user.id, password_hash).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok("Password changed"))).into_response(),
        Err(e) => {
            tracing::error!("Password change failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::err("Password change failed")),
            )
                .into_response()
        }
    }
}

// Page stubs. The rendered storefront lives outside this subsystem;
// these exist to carry the page-flow routing policy.

pub async fn login_page() -> impl IntoResponse {
    Html("<!doctype html><title>Log in</title><h1>Log in to Shopfront</h1>")
}

pub async fn change_password_page() -> impl IntoResponse {
    Html("<!doctype html><title>Change password</title><h1>Change your password</h1>")
}

// Admin category management

pub async fn list_categories(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    let categories = state.categories.list().await;
    (StatusCode::OK, Json(ApiResponse::ok(categories)))
}

pub async fn create_category(
    State(state): State<SharedState>,
    Json(req): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    if req.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::err("Category name is required")),
        )
            .into_response();
    }

    let state = state.read().await;
    let category = Category::new(req.name.trim().to_string());
    let id = category.id.clone();
    state.categories.insert(category).await;
    (StatusCode::CREATED, Json(ApiResponse::ok(id))).into_response()
}

pub async fn delete_category(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;
    match state.categories.delete(&id).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok("deleted".to_string()))).into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::err(e.to_string())),
        )
            .into_response(),
    }
}
