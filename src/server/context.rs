//! Per-request negotiation state.

use crate::config::HintsConfig;
use crate::detector::UserAgentDetector;
use crate::extract::{
    extract_browser, extract_critical_hints, extract_device_hints, extract_network_hints,
    HintsWriter,
};
use crate::protocol::constants::headers::USER_AGENT;
use crate::protocol::{RequestHeaders, ResponseHeaders, ThemeCookie};
use crate::types::{ClientHintsState, ParsedUserAgent};
use http::header::{HeaderMap, HeaderName, HeaderValue, SET_COOKIE};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Queued writes and the flush flag, guarded together so nothing can be
/// queued once the flush has taken the queue.
#[derive(Debug, Default)]
struct Pending {
    headers: ResponseHeaders,
    cookies: Vec<ThemeCookie>,
    flushed: bool,
}

/// Response side effects held back until the response is committed.
///
/// Extractors append through [`HintsWriter`]. The accumulated headers and
/// cookies are flushed by exactly one of [`on_rendered`](Self::on_rendered)
/// or [`on_error`](Self::on_error); whichever runs first wins and the other
/// becomes a no-op.
#[derive(Debug, Default)]
pub struct DeferredWrites {
    pending: Mutex<Pending>,
}

impl DeferredWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the headers accumulated so far.
    pub fn pending_headers(&self) -> ResponseHeaders {
        self.pending.lock().headers.clone()
    }

    /// Snapshot of the cookies accumulated so far.
    pub fn pending_cookies(&self) -> Vec<ThemeCookie> {
        self.pending.lock().cookies.clone()
    }

    pub fn is_flushed(&self) -> bool {
        self.pending.lock().flushed
    }

    /// Flush after a successful render. Returns `false` if already flushed.
    pub fn on_rendered(&self, target: &mut HeaderMap) -> bool {
        self.flush(target, "rendered")
    }

    /// Flush on the error path. Returns `false` if already flushed.
    pub fn on_error(&self, target: &mut HeaderMap) -> bool {
        self.flush(target, "error")
    }

    fn flush(&self, target: &mut HeaderMap, path: &'static str) -> bool {
        let (headers, cookies) = {
            let mut pending = self.pending.lock();
            if pending.flushed {
                return false;
            }
            pending.flushed = true;
            (
                std::mem::take(&mut pending.headers),
                std::mem::take(&mut pending.cookies),
            )
        };

        for (name, values) in headers.iter() {
            let joined = values.join(", ");
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&joined)) {
                (Ok(name), Ok(value)) => {
                    target.append(name, value);
                }
                _ => warn!(header = name, value = %joined, "skipping invalid hint header"),
            }
        }
        for cookie in &cookies {
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    target.append(SET_COOKIE, value);
                }
                Err(_) => warn!(cookie = %cookie.name, "skipping invalid theme cookie"),
            }
        }

        debug!(
            path,
            headers = headers.len(),
            cookies = cookies.len(),
            "client hints flushed"
        );
        true
    }
}

impl HintsWriter for DeferredWrites {
    fn write_headers(&self, headers: ResponseHeaders) {
        let mut pending = self.pending.lock();
        if pending.flushed {
            warn!("hint headers written after flush, dropped");
            return;
        }
        pending.headers.extend(headers);
    }

    fn write_cookie(&self, cookie: &ThemeCookie) {
        let mut pending = self.pending.lock();
        if pending.flushed {
            warn!(cookie = %cookie.name, "theme cookie written after flush, dropped");
            return;
        }
        pending.cookies.push(cookie.clone());
    }
}

/// Everything one request needs for negotiation.
///
/// Created once per request; the user agent is parsed here, before any
/// extractor runs, and shared by all of them.
#[derive(Debug)]
pub struct RequestContext {
    headers: RequestHeaders,
    user_agent: Option<ParsedUserAgent>,
    writes: DeferredWrites,
}

impl RequestContext {
    pub fn new(headers: RequestHeaders, detector: &dyn UserAgentDetector) -> Self {
        let user_agent = headers.get(USER_AGENT).and_then(|ua| detector.parse(ua));
        Self {
            headers,
            user_agent,
            writes: DeferredWrites::new(),
        }
    }

    pub fn headers(&self) -> &RequestHeaders {
        &self.headers
    }

    pub fn user_agent(&self) -> Option<&ParsedUserAgent> {
        self.user_agent.as_ref()
    }

    pub fn writes(&self) -> &DeferredWrites {
        &self.writes
    }

    /// Run every enabled extractor concurrently.
    ///
    /// Extractors only share the write accumulator; each fills its own slot
    /// of the returned state.
    pub async fn extract(
        &self,
        config: &HintsConfig,
        detector: &dyn UserAgentDetector,
    ) -> ClientHintsState {
        let user_agent = self.user_agent();
        let headers = &self.headers;
        let writer: &dyn HintsWriter = &self.writes;

        let browser = async {
            if config.detect_enabled() {
                extract_browser(config, headers, detector, writer).await
            } else {
                None
            }
        };
        let critical = async {
            config
                .critical
                .as_ref()
                .map(|critical| extract_critical_hints(critical, headers, user_agent, writer))
        };
        let device = async {
            config
                .device_enabled()
                .then(|| extract_device_hints(&config.device, headers, user_agent, writer))
        };
        let network = async {
            config
                .network_enabled()
                .then(|| extract_network_hints(&config.network, headers, user_agent, writer))
        };

        let (browser, critical, device, network) =
            futures::join!(browser, critical, device, network);
        ClientHintsState {
            browser,
            critical,
            device,
            network,
        }
    }
}
