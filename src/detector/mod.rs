//! User-agent detection boundary.
//!
//! Hint extraction only needs a coarse descriptor of the client: its kind,
//! browser identity, version and OS. Anything able to produce a
//! [`ParsedUserAgent`] from a `User-Agent` string can be plugged in by
//! implementing [`UserAgentDetector`]; [`BasicUserAgentParser`] is the
//! regex based default.
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`UserAgentDetector`] | Parser boundary, with async detection refined by UA client hints |
//! | [`BasicUserAgentParser`] | Built-in regex parser with an LRU cache |

mod parser;

pub use parser::{BasicUserAgentParser, DEFAULT_CACHE_CAPACITY};

use crate::protocol::constants::headers::SEC_CH_UA_PLATFORM;
use crate::protocol::RequestHeaders;
use crate::types::{BrowserInfo, ClientHint, ParsedUserAgent, UserAgentData, UserAgentHint};
use async_trait::async_trait;
use tracing::trace;

/// Resolves user-agent strings into descriptors.
#[async_trait]
pub trait UserAgentDetector: Send + Sync {
    /// Parse a `User-Agent` string. `None` when nothing was recognized.
    fn parse(&self, user_agent: &str) -> Option<ParsedUserAgent>;

    /// Parse the user agent, then refine it with the user-agent client hints
    /// the browser sent for `hints`.
    ///
    /// The low entropy `Sec-CH-UA-Platform` header is always read. A Windows
    /// platform whose `Sec-CH-UA-Platform-Version` major is 13 or more is
    /// reported as `Windows 11`.
    async fn detect(
        &self,
        user_agent: Option<&str>,
        hints: &[UserAgentHint],
        headers: &RequestHeaders,
    ) -> Option<BrowserInfo> {
        let mut info = BrowserInfo::from(self.parse(user_agent?)?);
        let data = user_agent_data(hints, headers);

        if is_windows_11(&data) {
            info.os = Some("Windows 11".to_string());
        }
        if !data.is_empty() {
            info.ua = Some(data);
        }
        Some(info)
    }
}

/// Strip the quotes of a structured header string (`"Windows"` → `Windows`).
fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Collect the user-agent client hints sent for `hints`.
pub fn user_agent_data(hints: &[UserAgentHint], headers: &RequestHeaders) -> UserAgentData {
    let mut data = UserAgentData {
        platform: headers.get(SEC_CH_UA_PLATFORM).map(|v| unquote(v).to_string()),
        ..Default::default()
    };

    for &hint in hints {
        let Some(raw) = headers.get(hint.request_header()).filter(|v| !v.is_empty()) else {
            continue;
        };
        trace!(hint = hint.key(), raw, "user-agent hint");
        match hint {
            UserAgentHint::Architecture => data.architecture = Some(unquote(raw).to_string()),
            UserAgentHint::Bitness => data.bitness = Some(unquote(raw).to_string()),
            UserAgentHint::Model => data.model = Some(unquote(raw).to_string()),
            UserAgentHint::PlatformVersion => {
                data.platform_version = Some(unquote(raw).to_string())
            }
            // a brand list, kept verbatim
            UserAgentHint::FullVersionList => data.full_version_list = Some(raw.to_string()),
        }
    }
    data
}

fn is_windows_11(data: &UserAgentData) -> bool {
    let major = data
        .platform_version
        .as_deref()
        .and_then(|version| version.split('.').next())
        .and_then(|major| major.trim().parse::<u32>().ok());
    data.platform.as_deref() == Some("Windows") && major.is_some_and(|major| major >= 13)
}
