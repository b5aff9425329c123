//! Axum integration.
//!
//! # Module Organization
//!
//! ```text
//! server/
//! ├── middleware - ClientHintsLayer, the per-request negotiation middleware
//! ├── context    - RequestContext and the deferred header/cookie writes
//! └── extractor  - ClientHints handler extractor
//! ```
//!
//! # Request Flow
//!
//! 1. snapshot the request headers and parse the user agent once,
//! 2. run the enabled extractors concurrently,
//! 3. store the [`ClientHintsState`](crate::types::ClientHintsState) in the
//!    request extensions and call the handler,
//! 4. append the accumulated `Accept-CH` / `Vary` / `Critical-CH` headers
//!    and the theme `Set-Cookie` to the response.

mod context;
mod extractor;
mod middleware;

pub use context::{DeferredWrites, RequestContext};
pub use extractor::ClientHints;
pub use middleware::ClientHintsLayer;
