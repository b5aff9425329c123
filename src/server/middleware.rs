//! Axum middleware for client hints negotiation.

use super::context::RequestContext;
use crate::config::{HintsConfig, HintsOptions};
use crate::detector::{BasicUserAgentParser, UserAgentDetector};
use crate::error::Result;
use crate::protocol::RequestHeaders;
use axum::{extract::Request, middleware::Next, response::Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::trace;

/// Client hints layer for Axum.
///
/// For every request the layer parses the user agent, runs the enabled
/// extractors, and hands the results to handlers through request
/// extensions. The hint headers and theme cookie they produce are added to
/// the response once the handler has finished.
///
/// # Usage
///
/// ```ignore
/// use axum::{middleware, routing::get, Router};
/// use http_client_hints::{ClientHintsLayer, HintsOptions};
///
/// let options = HintsOptions::from_json(r#"{"network": true}"#)?;
/// let layer = ClientHintsLayer::from_options(&options)?;
///
/// let app = Router::new()
///     .route("/", get(handler))
///     .layer(middleware::from_fn(layer.middleware()));
/// ```
///
/// # Handlers
///
/// ```ignore
/// use http_client_hints::ClientHints;
///
/// async fn handler(ClientHints(hints): ClientHints) -> String {
///     hints.to_json().unwrap_or_default()
/// }
/// ```
///
/// The parsed user agent is also available as
/// `Extension<ParsedUserAgent>` when one was recognized.
#[derive(Clone)]
pub struct ClientHintsLayer {
    config: Arc<HintsConfig>,
    detector: Arc<dyn UserAgentDetector>,
}

impl ClientHintsLayer {
    /// Create a layer using the built-in [`BasicUserAgentParser`].
    pub fn new(config: HintsConfig) -> Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            detector: Arc::new(BasicUserAgentParser::new()?),
        })
    }

    /// Resolve `options` and create a layer.
    pub fn from_options(options: &HintsOptions) -> Result<Self> {
        Self::new(options.resolve()?)
    }

    /// Replace the user-agent detector.
    #[must_use]
    pub fn with_detector(mut self, detector: Arc<dyn UserAgentDetector>) -> Self {
        self.detector = detector;
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &HintsConfig {
        &self.config
    }

    /// Create the middleware function for use with
    /// [`axum::middleware::from_fn`].
    ///
    /// Responses with a 5xx status are flushed through the error path, every
    /// other response through the rendered path; either way the hint headers
    /// are written once.
    #[must_use]
    pub fn middleware(
        &self,
    ) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>>
           + Send
           + Sync
           + Clone {
        let config = self.config.clone();
        let detector = self.detector.clone();

        move |mut req: Request, next: Next| {
            let config = config.clone();
            let detector = detector.clone();
            Box::pin(async move {
                if !config.any_enabled() {
                    return next.run(req).await;
                }

                let headers = RequestHeaders::from_header_map(req.headers());
                let context = RequestContext::new(headers, detector.as_ref());
                let state = context.extract(&config, detector.as_ref()).await;

                if let Some(user_agent) = context.user_agent() {
                    req.extensions_mut().insert(user_agent.clone());
                }
                req.extensions_mut().insert(Arc::new(state));

                let mut response = next.run(req).await;
                if response.status().is_server_error() {
                    context.writes().on_error(response.headers_mut());
                } else {
                    context.writes().on_rendered(response.headers_mut());
                }
                trace!(status = %response.status(), "client hints middleware done");
                response
            })
        }
    }
}

impl std::fmt::Debug for ClientHintsLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHintsLayer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BrowserIdentity, NetworkHint, ParsedUserAgent};
    use async_trait::async_trait;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    /// Detector that reports every client as the same Chrome build.
    struct FixedDetector;

    #[async_trait]
    impl UserAgentDetector for FixedDetector {
        fn parse(&self, _user_agent: &str) -> Option<ParsedUserAgent> {
            Some(ParsedUserAgent::browser(BrowserIdentity::Chrome, "120.0.0"))
        }
    }

    fn app(config: HintsConfig) -> Router {
        let layer = ClientHintsLayer::new(config)
            .unwrap()
            .with_detector(Arc::new(FixedDetector));
        Router::new()
            .route("/", get(|| async { "ok" }))
            .route(
                "/ua",
                get(|req: Request| async move {
                    req.extensions()
                        .get::<ParsedUserAgent>()
                        .map(|ua| ua.name.to_string())
                        .unwrap_or_default()
                }),
            )
            .route("/fail", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .layer(axum::middleware::from_fn(layer.middleware()))
    }

    fn network_config() -> HintsConfig {
        HintsConfig {
            network: vec![NetworkHint::Rtt],
            ..Default::default()
        }
    }

    fn request(uri: &str) -> Request {
        Request::builder()
            .uri(uri)
            .header("user-agent", "anything")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_headers_written_on_success() {
        let response = app(network_config()).oneshot(request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["accept-ch"], "RTT");
    }

    #[tokio::test]
    async fn test_headers_written_on_error() {
        let response = app(network_config()).oneshot(request("/fail")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers().get_all("accept-ch").iter().count(), 1);
    }

    #[tokio::test]
    async fn test_pass_through_when_disabled() {
        let response = app(HintsConfig::default()).oneshot(request("/ua")).await.unwrap();
        assert!(response.headers().get("accept-ch").is_none());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_parsed_user_agent_in_extensions() {
        let response = app(network_config()).oneshot(request("/ua")).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"chrome");
    }

    #[test]
    fn test_config_accessor() {
        let layer = ClientHintsLayer::new(network_config()).unwrap();
        assert!(layer.config().network_enabled());
        assert!(!layer.config().critical_enabled());
    }
}
