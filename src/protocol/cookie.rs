//! Theme cookie handling.
//!
//! The color scheme preference is persisted in a plain cookie so later
//! requests can render the right theme before any hint round-trip.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// How long the theme cookie lives.
pub const THEME_COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Find a cookie value in a `Cookie` header.
///
/// Entries are split on `;`; the first whose trimmed text starts with
/// `name=` wins. The value is the text between the first and second `=`,
/// trimmed, so `a=b=c` yields `b`.
pub fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    let prefix = format!("{}=", name);
    cookie_header
        .split(';')
        .map(str::trim)
        .find(|entry| entry.starts_with(&prefix))
        .and_then(|entry| entry.split('=').nth(1))
        .map(str::trim)
}

/// Format a timestamp as an IMF-fixdate, e.g. `Thu, 01 Jan 1970 00:00:00 GMT`.
pub fn format_http_date(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// The color scheme cookie sent back to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub expires: DateTime<Utc>,
}

impl ThemeCookie {
    /// A cookie expiring [`THEME_COOKIE_MAX_AGE_DAYS`] after `now`.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        path: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: path.into(),
            expires: now + Duration::days(THEME_COOKIE_MAX_AGE_DAYS),
        }
    }
}

/// Renders the `Set-Cookie` value.
impl fmt::Display for ThemeCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Path={}; Expires={}; SameSite=Lax",
            self.name,
            self.value,
            self.path,
            format_http_date(self.expires)
        )
    }
}
