//! Regex based user-agent parser.

use super::UserAgentDetector;
use crate::error::{HintsError, Result};
use crate::types::{BrowserIdentity, ParsedUserAgent};
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use regex::Regex;
use std::fmt;
use std::num::NonZeroUsize;

/// Parsed user agents kept by [`BasicUserAgentParser::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

const BOT_RULE: &str =
    r"(?i)bot\b|crawl|spider|slurp|curl/|wget/|ia_archiver|facebookexternalhit|headlesschrome";

// Ordered, first match wins: Chromium derivatives before Chrome, Chrome
// before Safari (Chrome also says "Safari").
const BROWSER_RULES: &[(BrowserIdentity, &str)] = &[
    (BrowserIdentity::EdgeIos, r"EdgiOS/([0-9._]+)"),
    (BrowserIdentity::Samsung, r"SamsungBrowser/([0-9.]+)"),
    (BrowserIdentity::EdgeChromium, r"EdgA?/([0-9.]+)"),
    (BrowserIdentity::Edge, r"Edge/([0-9._]+)"),
    (BrowserIdentity::Opera, r"(?:OPR|Opera)/([0-9.]+)"),
    (BrowserIdentity::ChromiumWebview, r"wv\).*Chrom(?:e|ium)/([0-9.]+)(?::?\s|$)"),
    (BrowserIdentity::Chrome, r"Chrom(?:e|ium)/([0-9.]+)(?::?\s|$)"),
    (BrowserIdentity::Crios, r"CriOS/([0-9.]+)(?::?\s|$)"),
    (BrowserIdentity::Fxios, r"FxiOS/([0-9.]+)"),
    (BrowserIdentity::Firefox, r"Firefox/([0-9.]+)(?:\s|$)"),
    (BrowserIdentity::Ios, r"Version/([0-9._]+).*Mobile.*Safari"),
    (BrowserIdentity::Safari, r"Version/([0-9._]+).*Safari"),
];

// iOS before Mac OS and Android / Chrome OS before Linux.
const OS_RULES: &[(&str, &str)] = &[
    ("iOS", r"iP(?:hone|od|ad)"),
    ("Android OS", r"Android"),
    ("Windows 10", r"Windows NT 10\.0"),
    ("Windows 8.1", r"Windows NT 6\.3"),
    ("Windows 8", r"Windows NT 6\.2"),
    ("Windows 7", r"Windows NT 6\.1"),
    ("Windows Vista", r"Windows NT 6\.0"),
    ("Windows XP", r"Windows NT 5\.1|Windows XP"),
    ("Chrome OS", r"CrOS"),
    ("Mac OS", r"Macintosh|Mac OS X"),
    ("Linux", r"Linux|X11"),
];

/// Version parts kept, padded with `0`.
const VERSION_PARTS: usize = 3;

/// Default [`UserAgentDetector`]: ordered regex rules plus an LRU cache of
/// parse results.
pub struct BasicUserAgentParser {
    bot: Regex,
    browsers: Vec<(BrowserIdentity, Regex)>,
    operating_systems: Vec<(&'static str, Regex)>,
    cache: Mutex<LruCache<String, Option<ParsedUserAgent>>>,
}

impl BasicUserAgentParser {
    /// Parser with a [`DEFAULT_CACHE_CAPACITY`] entry cache.
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Parser caching up to `capacity` user agents.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| {
                HintsError::Config("user agent cache capacity must be non-zero".to_string())
            })?;

        let browsers = BROWSER_RULES
            .iter()
            .map(|(name, rule)| -> Result<_> { Ok((*name, Regex::new(rule)?)) })
            .collect::<Result<Vec<_>>>()?;
        let operating_systems = OS_RULES
            .iter()
            .map(|(name, rule)| -> Result<_> { Ok((*name, Regex::new(rule)?)) })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bot: Regex::new(BOT_RULE)?,
            browsers,
            operating_systems,
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    fn parse_uncached(&self, user_agent: &str) -> Option<ParsedUserAgent> {
        if self.bot.is_match(user_agent) {
            return Some(ParsedUserAgent::bot());
        }

        let (name, version) = self.browsers.iter().find_map(|(name, rule)| {
            rule.captures(user_agent)
                .and_then(|caps| caps.get(1))
                .map(|m| (*name, normalize_version(m.as_str())))
        })?;

        let mut parsed = ParsedUserAgent::browser(name, version);
        parsed.os = self
            .operating_systems
            .iter()
            .find(|(_, rule)| rule.is_match(user_agent))
            .map(|(os, _)| os.to_string());
        Some(parsed)
    }
}

impl fmt::Debug for BasicUserAgentParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.cache.lock();
        f.debug_struct("BasicUserAgentParser")
            .field("browser_rules", &self.browsers.len())
            .field("os_rules", &self.operating_systems.len())
            .field("cached", &cache.len())
            .field("capacity", &cache.cap())
            .finish()
    }
}

/// `13_2_3` → `13.2.3`, `120.0.6099.71` → `120.0.6099`, `17` → `17.0.0`.
fn normalize_version(raw: &str) -> String {
    let mut parts: Vec<&str> = raw
        .split(['.', '_'])
        .filter(|part| !part.is_empty())
        .take(VERSION_PARTS)
        .collect();
    while parts.len() < VERSION_PARTS {
        parts.push("0");
    }
    parts.join(".")
}

#[async_trait]
impl UserAgentDetector for BasicUserAgentParser {
    fn parse(&self, user_agent: &str) -> Option<ParsedUserAgent> {
        if let Some(cached) = self.cache.lock().get(user_agent) {
            return cached.clone();
        }
        let parsed = self.parse_uncached(user_agent);
        self.cache.lock().put(user_agent.to_string(), parsed.clone());
        parsed
    }
}
