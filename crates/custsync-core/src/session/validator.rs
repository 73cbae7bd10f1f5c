//! Session validation gate.

use chrono::{DateTime, Utc};

use super::model::{
    AUTH_COOKIE_NAME, DaysRemaining, SessionCookie, SessionReport, SessionStatus, SessionWarning,
};
use crate::error::{CustsyncError, Result};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days at or below which a valid session triggers a renewal warning.
pub const RENEWAL_WINDOW_DAYS: i64 = 7;

/// Validates a cookie set against the current time.
pub fn validate(cookies: &[SessionCookie]) -> Result<SessionReport> {
    validate_at(cookies, Utc::now())
}

/// Validates a cookie set against an explicit clock.
///
/// # Errors
///
/// - `NoCookies` when the set is empty
/// - `MissingAuthCookie` when no cookie is named `sid`
/// - `ExpiredSession` when the `sid` expiry is set and leaves zero or fewer days
pub fn validate_at(cookies: &[SessionCookie], now: DateTime<Utc>) -> Result<SessionReport> {
    if cookies.is_empty() {
        return Err(CustsyncError::NoCookies);
    }

    let sid = cookies
        .iter()
        .find(|c| c.is_named(AUTH_COOKIE_NAME))
        .ok_or(CustsyncError::MissingAuthCookie)?;

    let days_remaining = match sid.expiry() {
        Some(expires_at) => DaysRemaining::Finite(days_until(expires_at, now)),
        None => DaysRemaining::Unbounded,
    };

    if let DaysRemaining::Finite(days) = days_remaining
        && days <= 0
    {
        return Err(CustsyncError::ExpiredSession {
            days_remaining: days,
        });
    }

    let warning = match days_remaining {
        DaysRemaining::Finite(days) if days <= RENEWAL_WINDOW_DAYS => {
            tracing::warn!(days_remaining = days, "Session cookie expires soon");
            Some(SessionWarning::RenewSoon {
                days_remaining: days,
            })
        }
        _ => {
            tracing::info!("Session cookie valid for {}", days_remaining);
            None
        }
    };

    Ok(SessionReport {
        status: SessionStatus {
            valid: true,
            days_remaining,
        },
        warning,
    })
}

fn days_until(expires_at: f64, now: DateTime<Utc>) -> i64 {
    let now_secs = now.timestamp_millis() as f64 / 1000.0;
    ((expires_at - now_secs) / SECONDS_PER_DAY).floor() as i64
}
