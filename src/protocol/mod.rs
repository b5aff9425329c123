//! Client hints wire format: header names, value decoding, response header
//! accumulation and the theme cookie.
//!
//! # Specification
//!
//! - [RFC 8942] HTTP Client Hints (`Accept-CH`)
//! - [Critical-CH] Client Hint Reliability
//! - [RFC 8941] Structured Field Values (`?1` / `?0` booleans)
//!
//! [RFC 8942]: https://datatracker.ietf.org/doc/html/rfc8942
//! [Critical-CH]: https://datatracker.ietf.org/doc/html/draft-davidben-http-client-hint-reliability
//! [RFC 8941]: https://datatracker.ietf.org/doc/html/rfc8941

pub mod constants;
mod cookie;
mod headers;

pub use cookie::{cookie_value, format_http_date, ThemeCookie, THEME_COOKIE_MAX_AGE_DAYS};
pub use headers::{
    lookup_boolean, lookup_float, lookup_header, lookup_int, parse_float_prefix,
    parse_int_prefix, write_client_hint_header, HeaderKind, HintValue, RequestHeaders,
    ResponseHeaders,
};
