#![doc = include_str!("../README.md")]

//! ## Module Structure
//!
//! - **[types]** - Hint identifiers, parsed user agent and negotiation results
//! - **[protocol]** - Header codec, response header accumulation, theme cookie
//! - **[features]** - Browser capability tables
//! - **[extract]** - One extractor per hint category
//! - **[detector]** - User-agent parser boundary
//! - **[config]** - Options and resolved configuration
//! - **[server]** - Axum middleware and handler extractor
//! - **[error]** - Error types and result handling

pub mod config;
pub mod detector;
pub mod error;
pub mod extract;
pub mod features;
pub mod protocol;
pub mod server;
pub mod types;

pub use config::{ColorSchemeOptions, CriticalHintsConfig, DetectOs, HintsConfig, HintsOptions};
pub use detector::{BasicUserAgentParser, UserAgentDetector};
pub use error::{HintsError, Result};
pub use extract::{DiscardWriter, HintsWriter};
pub use server::{ClientHints, ClientHintsLayer, DeferredWrites, RequestContext};
pub use types::{
    BrowserIdentity, BrowserInfo, ClientHintsState, CriticalHint, CriticalInfo, DeviceHint,
    DeviceInfo, NetworkHint, NetworkInfo, ParsedUserAgent, UserAgentHint,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_to_state_json() {
        let config = HintsOptions::from_json(r#"{"network": ["ect"]}"#)
            .unwrap()
            .resolve()
            .unwrap();
        let chrome = ParsedUserAgent::browser(BrowserIdentity::Chrome, "120.0.0");
        let headers = protocol::RequestHeaders::new().with("ect", "4g");

        let network = extract::extract_network_hints(
            &config.network,
            &headers,
            Some(&chrome),
            &DiscardWriter,
        );
        let state = ClientHintsState {
            network: Some(network),
            ..Default::default()
        };
        assert_eq!(
            state.to_json().unwrap(),
            r#"{"network":{"ectAvailable":true,"ect":"4g"}}"#
        );
    }
}
