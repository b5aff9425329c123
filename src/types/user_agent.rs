//! Parsed user-agent descriptor consumed by capability detection.

use crate::protocol::parse_int_prefix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of client sent the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// An interactive browser.
    Browser,
    /// A crawler or other automated client.
    Bot,
    /// Anything else (libraries, apps, unknown).
    Other,
}

/// Browser identity used as the capability table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrowserIdentity {
    Chrome,
    EdgeChromium,
    ChromiumWebview,
    Opera,
    Edge,
    EdgeIos,
    Crios,
    Firefox,
    Fxios,
    Safari,
    Ios,
    Samsung,
    Unknown,
}

impl BrowserIdentity {
    /// Look up an identity by its kebab-case name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chrome" => Some(Self::Chrome),
            "edge-chromium" => Some(Self::EdgeChromium),
            "chromium-webview" => Some(Self::ChromiumWebview),
            "opera" => Some(Self::Opera),
            "edge" => Some(Self::Edge),
            "edge-ios" => Some(Self::EdgeIos),
            "crios" => Some(Self::Crios),
            "firefox" => Some(Self::Firefox),
            "fxios" => Some(Self::Fxios),
            "safari" => Some(Self::Safari),
            "ios" => Some(Self::Ios),
            "samsung" => Some(Self::Samsung),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::EdgeChromium => "edge-chromium",
            Self::ChromiumWebview => "chromium-webview",
            Self::Opera => "opera",
            Self::Edge => "edge",
            Self::EdgeIos => "edge-ios",
            Self::Crios => "crios",
            Self::Firefox => "firefox",
            Self::Fxios => "fxios",
            Self::Safari => "safari",
            Self::Ios => "ios",
            Self::Samsung => "samsung",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BrowserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user agent as reported by the user-agent parser.
///
/// Immutable input to the extractors. Only the leading segment of
/// `version` takes part in capability checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUserAgent {
    /// Client category (`browser`, `bot`, `other`).
    #[serde(rename = "type")]
    pub kind: AgentKind,
    /// Browser identity.
    pub name: BrowserIdentity,
    /// Dot-separated version string, e.g. `120.0.6099`.
    pub version: String,
    /// Operating system name, e.g. `Android OS`.
    pub os: Option<String>,
}

impl ParsedUserAgent {
    /// A browser user agent without OS information.
    pub fn browser(name: BrowserIdentity, version: impl Into<String>) -> Self {
        Self {
            kind: AgentKind::Browser,
            name,
            version: version.into(),
            os: None,
        }
    }

    /// A bot user agent.
    pub fn bot() -> Self {
        Self {
            kind: AgentKind::Bot,
            name: BrowserIdentity::Unknown,
            version: String::new(),
            os: None,
        }
    }

    /// Attach an operating system name.
    #[must_use]
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = Some(os.into());
        self
    }

    #[inline]
    pub fn is_browser(&self) -> bool {
        self.kind == AgentKind::Browser
    }

    /// Whether the OS name starts with `android`, ignoring case.
    pub fn is_android(&self) -> bool {
        self.os
            .as_deref()
            .is_some_and(|os| os.to_lowercase().starts_with("android"))
    }

    /// Numeric version segments; a segment without a leading integer is `None`.
    pub fn version_segments(&self) -> Vec<Option<i64>> {
        self.version.split('.').map(parse_int_prefix).collect()
    }

    /// Leading version segment as an unsigned major version.
    pub fn major_version(&self) -> Option<u32> {
        self.version
            .split('.')
            .next()
            .and_then(parse_int_prefix)
            .and_then(|major| u32::try_from(major).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_names() {
        assert_eq!(
            BrowserIdentity::from_name("edge-chromium"),
            Some(BrowserIdentity::EdgeChromium)
        );
        assert_eq!(BrowserIdentity::from_name("netscape"), None);
        assert_eq!(BrowserIdentity::ChromiumWebview.as_str(), "chromium-webview");
    }

    #[test]
    fn test_identity_serde_matches_as_str() {
        let json = serde_json::to_string(&BrowserIdentity::ChromiumWebview).unwrap();
        assert_eq!(json, "\"chromium-webview\"");
    }

    #[test]
    fn test_major_version() {
        let ua = ParsedUserAgent::browser(BrowserIdentity::Chrome, "120.0.6099");
        assert_eq!(ua.major_version(), Some(120));
        assert_eq!(ua.version_segments(), vec![Some(120), Some(0), Some(6099)]);

        let ua = ParsedUserAgent::browser(BrowserIdentity::Chrome, "beta.1");
        assert_eq!(ua.major_version(), None);

        let ua = ParsedUserAgent::browser(BrowserIdentity::Chrome, "");
        assert_eq!(ua.major_version(), None);
    }

    #[test]
    fn test_is_android() {
        let ua = ParsedUserAgent::browser(BrowserIdentity::Opera, "80").with_os("Android OS");
        assert!(ua.is_android());
        let ua = ua.with_os("Windows 10");
        assert!(!ua.is_android());
        assert!(!ParsedUserAgent::browser(BrowserIdentity::Opera, "80").is_android());
    }

    #[test]
    fn test_bot_is_not_browser() {
        assert!(!ParsedUserAgent::bot().is_browser());
    }
}
