//! Route classification and access decisions
//!
//! One static table maps every governed route prefix to the capability
//! it demands and what an unauthorized caller sees. Admin sections deny
//! with "not found" so their existence cannot be probed; ordinary
//! authenticated pages redirect to the login page instead.

use crate::auth::models::Principal;

/// Capability a route demands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Open to anonymous traffic
    None,
    /// Any logged-in identity
    Authenticated,
    /// Identities with the administrative flag
    Administrative,
}

/// What an unauthorized caller is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyBehavior {
    /// Send the caller to the login page (page flows)
    Redirect,
    /// Report the resource as missing (admin sections)
    NotFound,
    /// Plain 401 (API flows)
    Unauthorized,
}

/// One governed route prefix
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    pub prefix: &'static str,
    pub capability: Capability,
    pub deny: DenyBehavior,
}

/// The route classification table.
///
/// Deny behavior is chosen per route, not uniformly: admin sections are
/// hidden, account pages redirect, API endpoints answer 401.
pub const ROUTE_TABLE: &[RoutePolicy] = &[
    RoutePolicy {
        prefix: "/admin",
        capability: Capability::Administrative,
        deny: DenyBehavior::NotFound,
    },
    RoutePolicy {
        prefix: "/account",
        capability: Capability::Authenticated,
        deny: DenyBehavior::Redirect,
    },
    RoutePolicy {
        prefix: "/api/auth/me",
        capability: Capability::Authenticated,
        deny: DenyBehavior::Unauthorized,
    },
    RoutePolicy {
        prefix: "/api/auth/change-password",
        capability: Capability::Authenticated,
        deny: DenyBehavior::Unauthorized,
    },
];

/// Allow/deny decision for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyBehavior),
}

/// Find the policy governing a path, longest matching prefix first.
/// Returns `None` for ungoverned routes.
pub fn classify(path: &str) -> Option<&'static RoutePolicy> {
    ROUTE_TABLE
        .iter()
        .filter(|policy| {
            path == policy.prefix
                || path
                    .strip_prefix(policy.prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|policy| policy.prefix.len())
}

/// Evaluate a policy against the resolved identity of the request.
///
/// Missing privilege on an administrative route is always "not found",
/// even when the caller is authenticated, so an unprivileged identity
/// learns nothing it could not learn anonymously.
pub fn check(policy: &RoutePolicy, principal: Option<&Principal>) -> Decision {
    match policy.capability {
        Capability::None => Decision::Allow,
        Capability::Authenticated => match principal {
            Some(_) => Decision::Allow,
            None => Decision::Deny(policy.deny),
        },
        Capability::Administrative => match principal {
            Some(p) if p.admin => Decision::Allow,
            Some(_) => Decision::Deny(DenyBehavior::NotFound),
            None => Decision::Deny(policy.deny),
        },
    }
}
