//! Cookie policy normalization applied before browser injection.

use super::model::{SameSitePolicy, SanitizedCookie, SessionCookie};

/// Coerces a free-text SameSite value into the closed policy set.
///
/// Unknown values fall back to `Lax` rather than being rejected.
pub fn normalize_same_site(raw: Option<&str>) -> SameSitePolicy {
    let Some(raw) = raw else {
        return SameSitePolicy::Lax;
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => SameSitePolicy::Strict,
        "none" => SameSitePolicy::None,
        // "lax", "", "unspecified", "no_restriction" and anything unrecognized
        _ => SameSitePolicy::Lax,
    }
}

/// Strips the leading wildcard dot from a cookie domain.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_start_matches('.').to_string()
}

/// Produces an injection-ready copy of one cookie.
///
/// Returns `None` when the cookie has no usable name or domain.
pub fn sanitize_cookie(cookie: &SessionCookie) -> Option<SanitizedCookie> {
    let name = cookie.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
    let domain = cookie
        .domain
        .as_deref()
        .map(normalize_domain)
        .filter(|d| !d.is_empty())?;

    let path = cookie
        .path
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or("/")
        .to_string();

    Some(SanitizedCookie {
        name: name.to_string(),
        value: cookie.value.clone(),
        domain,
        path,
        secure: cookie.secure,
        http_only: cookie.http_only,
        same_site: normalize_same_site(cookie.same_site.as_deref()),
        expires: cookie.expiry(),
    })
}

/// Sanitizes a whole cookie set, dropping the cookies that cannot be injected.
pub fn sanitize_cookies(cookies: &[SessionCookie]) -> Vec<SanitizedCookie> {
    let sanitized: Vec<SanitizedCookie> = cookies.iter().filter_map(sanitize_cookie).collect();

    let dropped = cookies.len() - sanitized.len();
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped cookies without name or domain");
    }

    sanitized
}
