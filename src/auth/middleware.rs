//! Session resolution and access-guard middleware
//!
//! `resolve_session` turns the request cookie into an explicit
//! `CurrentUser` extension; `guard_routes` consults the route table
//! against it. Handlers never read ambient session state.

use crate::api::server::SharedState;
use crate::auth::guard::{self, Decision, DenyBehavior};
use crate::auth::models::Principal;
use crate::auth::session::SessionOutcome;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

/// The request's resolved identity, or `None` for anonymous traffic
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Principal>);

/// Pull the session credential out of the Cookie header
pub fn extract_credential(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    let prefix = format!("{}=", cookie_name);
    for cookie in cookie_header.split(';') {
        if let Some(value) = cookie.trim().strip_prefix(&prefix) {
            return Some(value.to_string());
        }
    }
    None
}

/// Resolve the request credential and attach the identity as an
/// explicit extension. Anonymous requests get `CurrentUser(None)`.
pub async fn resolve_session(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    let (sessions, users, cookie_name) = {
        let state = state.read().await;
        (
            state.sessions.clone(),
            state.users.clone(),
            state.config.session.cookie_name.clone(),
        )
    };

    let mut principal = None;
    if let Some(credential) = extract_credential(req.headers(), &cookie_name) {
        if let SessionOutcome::Authenticated(session) = sessions.get_session(&credential).await {
            if let Some(user) = users.find_by_id(&session.user_id).await {
                principal = Some(Principal::from(&user));
            }
        }
    }

    req.extensions_mut().insert(CurrentUser(principal));
    next.run(req).await
}

/// Enforce the route classification table. Runs after `resolve_session`.
pub async fn guard_routes(req: Request, next: Next) -> Response {
    let Some(policy) = guard::classify(req.uri().path()) else {
        return next.run(req).await;
    };

    let current = req
        .extensions()
        .get::<CurrentUser>()
        .cloned()
        .unwrap_or(CurrentUser(None));

    match guard::check(policy, current.0.as_ref()) {
        Decision::Allow => next.run(req).await,
        Decision::Deny(DenyBehavior::Redirect) => Redirect::to("/login").into_response(),
        // same body as the router fallback, so a hidden resource is
        // indistinguishable from a missing one
        Decision::Deny(DenyBehavior::NotFound) => {
            crate::api::routes::not_found().await.into_response()
        }
        Decision::Deny(DenyBehavior::Unauthorized) => {
            crate::api::routes::unauthorized().into_response()
        }
    }
}
