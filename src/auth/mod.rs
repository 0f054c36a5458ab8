//! Authentication, sessions and access control

pub mod guard;
pub mod middleware;
pub mod models;
pub mod session;
pub mod token;

pub use guard::{Capability, Decision, DenyBehavior, RoutePolicy};
pub use middleware::{extract_credential, CurrentUser};
pub use models::{Principal, User};
pub use session::{Session, SessionManager, SessionOutcome};
pub use token::{generate_verification_token, hash_token, IssuedToken, TokenOutcome, TokenStore};
