//! Session domain module.
//!
//! Everything needed to decide whether an injected cookie set still
//! represents an authenticated merchant session.
//!
//! # Module Structure
//!
//! - `model`: Cookie and session status types
//! - `validator`: Expiry-based validation gate
//! - `policy`: Cookie sanitization before injection
//! - `verify`: Landing URL and page content checks after navigation
//! - `repository`: `CookieSource` trait

mod model;
mod policy;
pub mod repository;
mod validator;
mod verify;

pub use model::{
    AUTH_COOKIE_NAME, DaysRemaining, SameSitePolicy, SanitizedCookie, SessionCookie,
    SessionReport, SessionStatus, SessionWarning,
};
pub use policy::{normalize_domain, normalize_same_site, sanitize_cookie, sanitize_cookies};
pub use repository::CookieSource;
pub use validator::{RENEWAL_WINDOW_DAYS, validate, validate_at};
pub use verify::{DASHBOARD_CONTENT_MARKERS, has_dashboard_content, verify_landing_url};
