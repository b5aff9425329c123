//! Browser detection.

use super::HintsWriter;
use crate::config::{DetectOs, HintsConfig};
use crate::detector::UserAgentDetector;
use crate::protocol::constants::headers::USER_AGENT;
use crate::protocol::constants::response::ACCEPT_HINT_HEADERS;
use crate::protocol::{write_client_hint_header, RequestHeaders, ResponseHeaders};
use crate::types::{BrowserInfo, ClientHint, UserAgentHint};
use tracing::{debug, warn};

/// Detect the browser sending the request.
///
/// With `detectOS: "windows-11"` the configured user-agent hints (plus
/// `platformVersion`, needed to tell Windows 11 apart) are requested in
/// `Accept-CH` and detection is refined with the hint headers already
/// sent. That detection is bounded by
/// [`detection_timeout`](HintsConfig::detection_timeout); when it runs out
/// the result is `None`.
///
/// Otherwise the `User-Agent` header alone is parsed.
pub async fn extract_browser(
    config: &HintsConfig,
    headers: &RequestHeaders,
    detector: &dyn UserAgentDetector,
    writer: &dyn HintsWriter,
) -> Option<BrowserInfo> {
    let user_agent = headers.get(USER_AGENT);

    if config.detect_os == DetectOs::Windows11 {
        let mut hints = config.user_agent.clone();
        if !hints.contains(&UserAgentHint::PlatformVersion) {
            hints.push(UserAgentHint::PlatformVersion);
        }

        let mut response = ResponseHeaders::new();
        for hint in &hints {
            write_client_hint_header(&ACCEPT_HINT_HEADERS, hint.header_name(), &mut response);
        }
        writer.write_headers(response);

        return match tokio::time::timeout(
            config.detection_timeout,
            detector.detect(user_agent, &hints, headers),
        )
        .await
        {
            Ok(info) => {
                debug!(
                    browser = ?info.as_ref().map(|i| i.name),
                    os = ?info.as_ref().and_then(|i| i.os.as_deref()),
                    "browser detected"
                );
                info
            }
            Err(_) => {
                warn!(
                    timeout_ms = config.detection_timeout.as_millis() as u64,
                    "browser detection timed out"
                );
                None
            }
        };
    }

    let info = detector.parse(user_agent?).map(BrowserInfo::from);
    debug!(browser = ?info.as_ref().map(|i| i.name), "browser parsed");
    info
}
