//! Post-navigation session checks.

use url::Url;

use crate::error::{CustsyncError, Result};

/// Path fragments that indicate a redirect to an authentication page.
const LOGIN_PATH_MARKERS: &[&str] = &["login", "signin", "auth"];

/// Text that appears on the customer analytics page once it rendered.
pub const DASHBOARD_CONTENT_MARKERS: &[&str] =
    &["注文者グループの概要", "注文者分析データ", "Customer"];

/// Fails with `SessionRejected` when the landing URL is an authentication page.
///
/// Only the URL path is inspected; query strings such as `?returnTo=/auth`
/// are ignored. An unparseable URL is inspected as a whole.
pub fn verify_landing_url(landing_url: &str) -> Result<()> {
    let haystack = match Url::parse(landing_url) {
        Ok(url) => url.path().to_ascii_lowercase(),
        Err(_) => landing_url.to_ascii_lowercase(),
    };

    if LOGIN_PATH_MARKERS.iter().any(|m| haystack.contains(m)) {
        return Err(CustsyncError::SessionRejected {
            url: landing_url.to_string(),
        });
    }

    Ok(())
}

/// Returns true if the page text contains any dashboard marker.
pub fn has_dashboard_content(page_text: &str) -> bool {
    DASHBOARD_CONTENT_MARKERS
        .iter()
        .any(|marker| page_text.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirects_are_rejected() {
        for url in [
            "https://merchants.example.com/login?next=/manager",
            "https://auth.example.com/v2/SignIn",
            "https://merchants.example.com/oauth/authorize",
        ] {
            let err = verify_landing_url(url).unwrap_err();
            assert!(matches!(err, CustsyncError::SessionRejected { .. }), "{url}");
        }
    }

    #[test]
    fn test_dashboard_url_is_accepted() {
        let url = "https://merchants.example.com/manager/home/abc/analytics/customers/?dateRangePreset=last_12_weeks";
        assert!(verify_landing_url(url).is_ok());
    }

    #[test]
    fn test_query_string_is_not_inspected() {
        let url = "https://merchants.example.com/manager/home?from=login";
        assert!(verify_landing_url(url).is_ok());
    }

    #[test]
    fn test_dashboard_content_markers() {
        assert!(has_dashboard_content("<h1>注文者グループの概要</h1>"));
        assert!(has_dashboard_content("Customer insights"));
        assert!(!has_dashboard_content("Welcome back"));
    }
}
