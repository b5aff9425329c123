//! Per-category hint extraction.
//!
//! Each extractor is a plain function over explicit inputs: the resolved
//! configuration, a request header snapshot and the parsed user agent.
//! Response side effects go through a [`HintsWriter`] so callers decide
//! when (and whether) they reach the wire.
//!
//! | Extractor | Response headers |
//! |-----------|------------------|
//! | [`extract_critical_hints`] | `Accept-CH`, `Vary`, `Critical-CH` + theme cookie |
//! | [`extract_device_hints`] | `Accept-CH` |
//! | [`extract_network_hints`] | `Accept-CH` |
//! | [`extract_browser`] | `Accept-CH` (user-agent hints) |

mod critical;
mod detect;
mod device;
mod network;

pub use critical::{extract_critical_hints, extract_critical_hints_at};
pub use detect::extract_browser;
pub use device::extract_device_hints;
pub use network::extract_network_hints;

use crate::features::{browser_feature_available, BrowserSupport};
use crate::protocol::{
    lookup_header, write_client_hint_header, RequestHeaders, ResponseHeaders, ThemeCookie,
};
use crate::types::{HintSet, ParsedUserAgent};
use tracing::trace;

/// Sink for response side effects produced during extraction.
pub trait HintsWriter: Send + Sync {
    /// Hand over accumulated hint headers.
    fn write_headers(&self, headers: ResponseHeaders);

    /// Hand over the theme cookie. Ignored by default.
    fn write_cookie(&self, _cookie: &ThemeCookie) {}
}

/// A writer that drops everything, for callers that only want the values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardWriter;

impl HintsWriter for DiscardWriter {
    fn write_headers(&self, _headers: ResponseHeaders) {}
}

/// Check availability and read the header of every configured hint.
///
/// Available hints are advertised in each of `targets`.
pub(crate) fn extract_listed_hints<H: BrowserSupport>(
    hints: &[H],
    headers: &RequestHeaders,
    user_agent: Option<&ParsedUserAgent>,
    writer: &dyn HintsWriter,
    targets: &[&str],
) -> HintSet<H> {
    let mut set = HintSet::default();
    let mut response = ResponseHeaders::new();

    for &hint in hints {
        let available = browser_feature_available(user_agent, hint);
        let value = if available {
            lookup_header(hint.kind(), hint.request_header(), headers)
        } else {
            None
        };
        trace!(hint = hint.key(), available, ?value, "hint lookup");

        if available {
            write_client_hint_header(targets, hint.header_name(), &mut response);
        }
        set.insert(hint, available, value);
    }

    if !response.is_empty() {
        writer.write_headers(response);
    }
    set
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;

    /// Writer that keeps everything it is handed.
    #[derive(Debug, Default)]
    pub struct RecordingWriter {
        pub headers: Mutex<ResponseHeaders>,
        pub cookies: Mutex<Vec<ThemeCookie>>,
        pub header_calls: Mutex<usize>,
    }

    impl RecordingWriter {
        pub fn joined(&self, header: &str) -> Option<String> {
            self.headers.lock().joined(header)
        }
    }

    impl HintsWriter for RecordingWriter {
        fn write_headers(&self, headers: ResponseHeaders) {
            *self.header_calls.lock() += 1;
            self.headers.lock().extend(headers);
        }

        fn write_cookie(&self, cookie: &ThemeCookie) {
            self.cookies.lock().push(cookie.clone());
        }
    }
}
