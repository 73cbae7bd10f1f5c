//! Session cookie domain model.
//!
//! `SessionCookie` mirrors the cookie export format produced by browser
//! extensions. `SanitizedCookie` is the injection-ready form handed to the
//! browser driver.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display};

/// Name of the cookie that carries the merchant-portal authentication.
pub const AUTH_COOKIE_NAME: &str = "sid";

/// One cookie as supplied by the cookie source.
///
/// Every field except `value` may be absent in an export; sanitization
/// decides what survives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    /// Free-text SameSite value (`"lax"`, `"no_restriction"`, `"unspecified"`, ...).
    #[serde(default)]
    pub same_site: Option<String>,
    /// Expiry as fractional epoch seconds. Absent or non-positive means a
    /// browser-session cookie.
    #[serde(default, rename = "expirationDate")]
    pub expires_at_epoch_seconds: Option<f64>,
    #[serde(default)]
    pub host_only: bool,
    #[serde(default)]
    pub session: bool,
}

impl SessionCookie {
    /// Returns the expiry if it is set and positive.
    pub fn expiry(&self) -> Option<f64> {
        if self.session {
            return None;
        }
        self.expires_at_epoch_seconds.filter(|exp| *exp > 0.0)
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// The closed set of SameSite policies a browser accepts on injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

/// A cookie ready for injection into a browser context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedCookie {
    pub name: String,
    pub value: String,
    /// Bare host domain, never prefixed with `.`.
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSitePolicy,
    /// `None` for browser-session cookies.
    pub expires: Option<f64>,
}

/// Remaining validity of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DaysRemaining {
    Finite(i64),
    /// The `sid` cookie has no expiry.
    Unbounded,
}

impl DaysRemaining {
    pub fn as_finite(&self) -> Option<i64> {
        match self {
            DaysRemaining::Finite(days) => Some(*days),
            DaysRemaining::Unbounded => None,
        }
    }
}

impl fmt::Display for DaysRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaysRemaining::Finite(days) => write!(f, "{} days", days),
            DaysRemaining::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Derived session validity, computed fresh each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub valid: bool,
    pub days_remaining: DaysRemaining,
}

/// Non-fatal signals raised while validating a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionWarning {
    /// The `sid` cookie expires within the renewal window.
    RenewSoon { days_remaining: i64 },
}

impl fmt::Display for SessionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionWarning::RenewSoon { days_remaining } => write!(
                f,
                "session cookie expires in {} days; renew it soon",
                days_remaining
            ),
        }
    }
}

/// Result of a successful validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub status: SessionStatus,
    pub warning: Option<SessionWarning>,
}
