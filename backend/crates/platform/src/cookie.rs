//! Session cookie helpers
//!
//! Builds `Set-Cookie` values for the session token and reads it back from
//! the `Cookie` request header.

use axum::http::{HeaderMap, HeaderValue, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Cookie attributes used for the session token
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    /// `None` makes it a browser-session cookie
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "board_session".to_string(),
            secure: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Plain-HTTP friendly attributes for local development
    pub fn development() -> Self {
        Self {
            secure: false,
            ..Self::default()
        }
    }

    pub fn with_max_age(mut self, secs: i64) -> Self {
        self.max_age_secs = Some(secs);
        self
    }

    /// Build Set-Cookie header value. Session cookies are always HttpOnly.
    pub fn build_set_cookie(&self, value: &str) -> String {
        let max_age = self.max_age_secs.map(|secs| secs.to_string());
        self.build(value, max_age.as_deref())
    }

    /// Build Set-Cookie value that expires the cookie immediately
    pub fn build_delete_cookie(&self) -> String {
        self.build("", Some("0"))
    }

    /// Browsers drop SameSite=None cookies without Secure, deletions included
    fn build(&self, value: &str, max_age: Option<&str>) -> String {
        let mut cookie = format!("{}={}; HttpOnly", self.name, value);

        if self.secure || self.same_site == SameSite::None {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));

        if let Some(max_age) = max_age {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    pub fn set_cookie_header(&self, value: &str) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build_set_cookie(value)).ok()
    }

    pub fn delete_cookie_header(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build_delete_cookie()).ok()
    }

    /// Read this cookie from request headers
    pub fn extract(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.name)
    }
}

/// Extract a cookie value from headers. Empty values count as absent.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|line| line.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_config_build() {
        let config = CookieConfig {
            name: "test".to_string(),
            secure: true,
            same_site: SameSite::Lax,
            path: "/api".to_string(),
            max_age_secs: Some(3600),
        };

        let cookie = config.build_set_cookie("value123");
        assert!(cookie.starts_with("test=value123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/api"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_same_site_none_forces_secure() {
        let config = CookieConfig {
            same_site: SameSite::None,
            ..CookieConfig::development()
        };
        assert!(config.build_set_cookie("v").contains("Secure"));
        assert!(!CookieConfig::development().build_set_cookie("v").contains("Secure"));
    }

    #[test]
    fn test_delete_cookie() {
        let cookie = CookieConfig::default().build_delete_cookie();
        assert!(cookie.starts_with("board_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_delete_cookie_keeps_secure_attribute() {
        let cross_site = CookieConfig {
            same_site: SameSite::None,
            ..CookieConfig::development()
        };
        let cookie = cross_site.build_delete_cookie();
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));

        let secure = CookieConfig {
            secure: true,
            ..CookieConfig::development()
        };
        assert!(secure.build_delete_cookie().contains("Secure"));
        assert!(!CookieConfig::development().build_delete_cookie().contains("Secure"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; session=abc123; other=xyz; empty="),
        );

        assert_eq!(
            extract_cookie(&headers, "session"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
        assert_eq!(extract_cookie(&headers, "empty"), None);
    }

    #[test]
    fn test_extract_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("board_session=tok"));

        let config = CookieConfig::default();
        assert_eq!(config.extract(&headers), Some("tok".to_string()));
    }
}
