use axum::http::{header, HeaderMap};

pub const SESSION_COOKIE: &str = "demo_session";

/// Pulls the session id out of the `Cookie` request header, if present.
pub fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .map(str::to_string)
}

pub fn session_cookie(session_id: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        SESSION_COOKIE, session_id, max_age_secs
    );

    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// A `Max-Age=0` cookie that tells the browser to drop the session cookie.
pub fn expired_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_session_id_from_single_cookie() {
        let headers = headers_with_cookie("demo_session=abc-123");
        assert_eq!(extract_session_id(&headers), Some("abc-123".to_string()));
    }

    #[test]
    fn extracts_session_id_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; demo_session=abc-123; lang=en");
        assert_eq!(extract_session_id(&headers), Some("abc-123".to_string()));
    }

    #[test]
    fn missing_cookie_header_yields_none() {
        assert_eq!(extract_session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn unrelated_cookies_yield_none() {
        let headers = headers_with_cookie("theme=dark; lang=en");
        assert_eq!(extract_session_id(&headers), None);
    }

    #[test]
    fn secure_flag_is_appended_only_in_production() {
        let dev = session_cookie("abc", 86400, false);
        let prod = session_cookie("abc", 86400, true);

        assert!(!dev.contains("Secure"));
        assert!(prod.ends_with("; Secure"));
        assert!(prod.contains("HttpOnly"));
        assert!(prod.contains("SameSite=Strict"));
    }

    #[test]
    fn expired_cookie_has_zero_max_age() {
        assert!(expired_session_cookie(false).contains("Max-Age=0"));
    }
}
