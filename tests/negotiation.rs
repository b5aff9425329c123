//! End-to-end negotiation through the axum middleware with the built-in
//! user-agent parser.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::Response,
    routing::get,
    Router,
};
use http_client_hints::{ClientHints, ClientHintsLayer, HintsError, HintsOptions};
use serde_json::Value;
use tower::ServiceExt;

const WINDOWS_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.6099.71 Safari/537.36";
const LINUX_FIREFOX: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

const OPTIONS: &str = r#"{
    "detectBrowser": true,
    "network": ["rtt", "ect"],
    "device": true,
    "critical": {
        "prefersColorScheme": true,
        "prefersColorSchemeOptions": {}
    }
}"#;

async fn hints_json(hints: ClientHints) -> String {
    hints.to_json().unwrap()
}

fn app(options: &str) -> Router {
    let options = HintsOptions::from_json(options).unwrap();
    let layer = ClientHintsLayer::from_options(&options).unwrap();
    Router::new()
        .route("/", get(hints_json))
        .route("/fail", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .layer(middleware::from_fn(layer.middleware()))
}

async fn send(request: Request<Body>) -> (Response, Value) {
    let response = app(OPTIONS).oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (Response::from_parts(parts, Body::empty()), json)
}

fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).map(|v| v.to_str().unwrap())
}

#[tokio::test]
async fn test_chrome_request_negotiates_all_categories() {
    let request = Request::builder()
        .uri("/")
        .header("user-agent", WINDOWS_CHROME)
        .header("sec-ch-prefers-color-scheme", "dark")
        .header("rtt", "100")
        .header("ect", "4g")
        .body(Body::empty())
        .unwrap();
    let (response, json) = send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "accept-ch"),
        Some("Sec-CH-Prefers-Color-Scheme, Device-Memory, RTT, ECT")
    );
    assert_eq!(header(&response, "vary"), Some("Sec-CH-Prefers-Color-Scheme"));
    assert_eq!(header(&response, "critical-ch"), Some("Sec-CH-Prefers-Color-Scheme"));
    let cookie = header(&response, "set-cookie").unwrap();
    assert!(cookie.starts_with("color-scheme=dark; Path=/; Expires="), "{cookie}");
    assert!(cookie.ends_with("GMT; SameSite=Lax"), "{cookie}");

    assert_eq!(json["browser"]["type"], "browser");
    assert_eq!(json["browser"]["name"], "chrome");
    assert_eq!(json["browser"]["version"], "120.0.6099");
    assert_eq!(json["browser"]["os"], "Windows 10");

    assert_eq!(json["critical"]["firstRequest"], false);
    assert_eq!(json["critical"]["prefersColorScheme"], "dark");
    assert_eq!(json["critical"]["colorSchemeFromCookie"], "dark");

    assert_eq!(json["device"]["memoryAvailable"], true);
    assert!(json["device"].get("memory").is_none());

    assert_eq!(json["network"]["rttAvailable"], true);
    assert_eq!(json["network"]["rtt"], 100);
    assert_eq!(json["network"]["ect"], "4g");
    assert!(json["network"].get("downlinkAvailable").is_none());
}

#[tokio::test]
async fn test_first_request_defers_theme_cookie() {
    let request = Request::builder()
        .uri("/")
        .header("user-agent", WINDOWS_CHROME)
        .body(Body::empty())
        .unwrap();
    let (response, json) = send(request).await;

    assert!(header(&response, "accept-ch").is_some());
    assert!(header(&response, "set-cookie").is_none());
    assert_eq!(json["critical"]["firstRequest"], true);
    assert_eq!(json["critical"]["colorSchemeFromCookie"], "light");
    let cookie = json["critical"]["colorSchemeCookie"].as_str().unwrap();
    assert!(cookie.starts_with("color-scheme=light;"), "{cookie}");
}

#[tokio::test]
async fn test_theme_cookie_wins_over_header() {
    let request = Request::builder()
        .uri("/")
        .header("user-agent", WINDOWS_CHROME)
        .header("cookie", "session=abc; color-scheme=light")
        .header("sec-ch-prefers-color-scheme", "dark")
        .body(Body::empty())
        .unwrap();
    let (response, json) = send(request).await;

    assert_eq!(json["critical"]["colorSchemeFromCookie"], "light");
    assert!(json["critical"].get("prefersColorScheme").is_none());
    let cookie = header(&response, "set-cookie").unwrap();
    assert!(cookie.starts_with("color-scheme=light;"), "{cookie}");
}

#[tokio::test]
async fn test_bot_gets_no_hint_headers() {
    let request = Request::builder()
        .uri("/")
        .header("user-agent", GOOGLEBOT)
        .header("sec-ch-prefers-color-scheme", "dark")
        .header("rtt", "100")
        .body(Body::empty())
        .unwrap();
    let (response, json) = send(request).await;

    assert!(header(&response, "accept-ch").is_none());
    assert!(header(&response, "critical-ch").is_none());
    assert!(header(&response, "set-cookie").is_none());
    assert_eq!(json["browser"]["type"], "bot");
    assert_eq!(json["critical"]["firstRequest"], true);
    assert_eq!(json["critical"]["prefersColorSchemeAvailable"], false);
    assert_eq!(json["network"]["rttAvailable"], false);
    assert!(json["network"].get("rtt").is_none());
}

#[tokio::test]
async fn test_unsupported_browser_keeps_defaults() {
    let request = Request::builder()
        .uri("/")
        .header("user-agent", LINUX_FIREFOX)
        .header("ect", "3g")
        .body(Body::empty())
        .unwrap();
    let (response, json) = send(request).await;

    assert!(header(&response, "accept-ch").is_none());
    assert_eq!(json["browser"]["name"], "firefox");
    assert_eq!(json["browser"]["os"], "Linux");
    assert_eq!(json["network"]["ectAvailable"], false);
    assert_eq!(json["device"]["memoryAvailable"], false);
}

#[tokio::test]
async fn test_error_response_flushed_once() {
    let request = Request::builder()
        .uri("/fail")
        .header("user-agent", WINDOWS_CHROME)
        .header("sec-ch-prefers-color-scheme", "light")
        .body(Body::empty())
        .unwrap();
    let (response, _) = send(request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers().get_all("accept-ch").iter().count(), 1);
    assert_eq!(response.headers().get_all("set-cookie").iter().count(), 1);
}

#[tokio::test]
async fn test_missing_user_agent() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (response, json) = send(request).await;

    assert!(header(&response, "accept-ch").is_none());
    assert!(json.get("browser").is_none());
    assert_eq!(json["critical"]["colorSchemeFromCookie"], "light");
}

#[test]
fn test_unknown_hint_rejected() {
    let options = HintsOptions::from_json(r#"{"network": ["bandwidth"]}"#).unwrap();
    let err = ClientHintsLayer::from_options(&options).unwrap_err();
    assert!(matches!(err, HintsError::UnknownHint(ref name) if name == "bandwidth"));
}

#[test]
fn test_malformed_options_rejected() {
    let err = HintsOptions::from_json(r#"{"critical": 3}"#).unwrap_err();
    assert!(matches!(err, HintsError::Json(_)));
}
