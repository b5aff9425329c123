//! Basic client hints server example
//!
//! Serves a page whose theme and layout follow the negotiated hints, and a
//! JSON endpoint echoing everything negotiated for the request.
//!
//! Run with: cargo run --example server_basic
//!
//! Chromium based browsers send the color scheme hint from the second
//! request on (or immediately, since `Critical-CH` triggers a retry).

use axum::{
    middleware,
    response::{Html, IntoResponse},
    routing::{get, Router},
    Json,
};
use http_client_hints::{ClientHints, ClientHintsLayer, HintsOptions};
use serde_json::Value;

const OPTIONS: &str = r#"{
    "detectBrowser": true,
    "detectOS": "windows-11",
    "userAgent": ["architecture", "bitness"],
    "network": true,
    "device": "memory",
    "critical": {
        "viewportSize": true,
        "prefersColorScheme": true,
        "prefersReducedMotion": true,
        "prefersColorSchemeOptions": {
            "themeNames": ["dark", "light"],
            "reloadOnFirstRequest": true
        }
    }
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Client Hints Server Example");
    println!("===========================\n");
    println!("Starting server on http://localhost:3000");

    let options = HintsOptions::from_json(OPTIONS)?;
    let layer = ClientHintsLayer::from_options(&options)?;

    let app = Router::new()
        .route("/", get(handle_page))
        .route("/hints", get(handle_hints))
        .layer(middleware::from_fn(layer.middleware()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn handle_page(hints: ClientHints) -> impl IntoResponse {
    let critical = hints.critical.clone().unwrap_or_default();
    let theme = critical.color_scheme_from_cookie.as_deref().unwrap_or("light");
    let browser = hints
        .browser
        .as_ref()
        .map(|b| format!("{} {} on {}", b.name, b.version, b.os.as_deref().unwrap_or("unknown OS")))
        .unwrap_or_else(|| "unknown browser".to_string());

    println!("\nReceived request:");
    println!("  Browser: {browser}");
    println!("  First request: {}", critical.first_request);
    println!("  Theme: {theme}");
    println!("  Viewport: {:?}x{:?}", critical.viewport_width, critical.viewport_height);

    let (background, foreground) = match theme {
        "dark" => ("#111", "#eee"),
        _ => ("#fff", "#111"),
    };
    Html(format!(
        "<!doctype html>\n<html data-theme=\"{theme}\">\n\
         <body style=\"background:{background};color:{foreground}\">\n\
         <h1>{browser}</h1>\n<p>theme: {theme}</p>\n\
         <p><a href=\"/hints\">negotiated hints</a></p>\n</body>\n</html>\n"
    ))
}

async fn handle_hints(hints: ClientHints) -> impl IntoResponse {
    let body = hints
        .to_json()
        .ok()
        .and_then(|json| serde_json::from_str::<Value>(&json).ok())
        .unwrap_or(Value::Null);
    Json(body)
}
