//! Header codec for client hints.
//!
//! Request headers are snapshotted into a lowercase map once per request,
//! then read through [`lookup_header`], which types the raw value. Response
//! hint headers are accumulated in [`ResponseHeaders`] and written out later
//! in one go.
//!
//! # Value Decoding
//!
//! | Kind | Rule | Example |
//! |------|------|---------|
//! | `String` | verbatim | `4g` |
//! | `Int` | leading integer, rest ignored | `1280px` → 1280 |
//! | `Float` | leading decimal, rest ignored | `2.625` → 2.625 |
//! | `Boolean` | `?1` is true, anything else false ([RFC 8941 Structured Headers]) | `?0` → false |
//!
//! An absent or empty header always decodes to `None`, whatever the kind.
//! A present boolean header is therefore never `None`; callers that need
//! to tell "absent" from "false" must check for `None` first.
//!
//! [RFC 8941 Structured Headers]: https://datatracker.ietf.org/doc/html/rfc8941

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static INT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:0[xX](?P<hex>[0-9a-fA-F]+)|(?P<dec>[0-9]+))")
        .expect("static integer pattern")
});

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("static float pattern")
});

/// How a hint header value is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    String,
    Int,
    Float,
    Boolean,
}

/// A decoded hint header value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HintValue {
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
}

impl HintValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

/// Parse the leading integer of `value`, ignoring trailing garbage.
///
/// Leading whitespace and a sign are accepted, as is a `0x` hex prefix.
/// Values that do not fit in an `i64` yield `None`.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let caps = INT_PREFIX.captures(value)?;
    let negative = value.starts_with('-');
    let magnitude = if let Some(hex) = caps.name("hex") {
        i64::from_str_radix(hex.as_str(), 16).ok()?
    } else {
        caps.name("dec")?.as_str().parse::<i64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the leading decimal number of `value`, ignoring trailing garbage.
pub fn parse_float_prefix(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let matched = FLOAT_PREFIX.find(value)?.as_str();
    let parsed = match matched.trim_start_matches(&['+', '-'][..]) {
        "Infinity" => f64::INFINITY,
        digits => digits.parse::<f64>().ok()?,
    };
    let parsed = if matched.starts_with('-') { -parsed } else { parsed };
    (!parsed.is_nan()).then_some(parsed)
}

/// Snapshot of request headers keyed by lowercase name.
///
/// Repeated `cookie` lines are joined with `"; "`, any other repeated
/// header with `", "`. Values that are not valid UTF-8 are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    headers: BTreeMap<String, String>,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot an HTTP header map.
    #[must_use]
    pub fn from_header_map(headers: &http::HeaderMap) -> Self {
        let mut snapshot = Self::new();
        for (name, value) in headers.iter() {
            if let Ok(value_str) = value.to_str() {
                snapshot.append(name.as_str(), value_str);
            }
        }
        snapshot
    }

    /// Add a header value, joining it onto an existing value of the same name.
    pub fn append(&mut self, name: &str, value: &str) {
        let name_lower = name.to_lowercase();
        let separator = if name_lower == super::constants::headers::COOKIE {
            "; "
        } else {
            ", "
        };
        self.headers
            .entry(name_lower)
            .and_modify(|existing| {
                existing.push_str(separator);
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    /// Builder-style [`append`](Self::append).
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.append(name, value);
        self
    }

    /// Raw value for a lowercase header name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for RequestHeaders {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

/// Read and decode a header.
///
/// Returns `None` when the header is absent, empty, or (for numeric kinds)
/// has no leading number. Never fails.
pub fn lookup_header(kind: HeaderKind, key: &str, headers: &RequestHeaders) -> Option<HintValue> {
    let value = headers.get(key).filter(|v| !v.is_empty())?;
    match kind {
        HeaderKind::String => Some(HintValue::String(value.to_string())),
        HeaderKind::Int => parse_int_prefix(value).map(HintValue::Int),
        HeaderKind::Float => parse_float_prefix(value).map(HintValue::Float),
        HeaderKind::Boolean => Some(HintValue::Boolean(value == "?1")),
    }
}

#[inline]
pub fn lookup_int(key: &str, headers: &RequestHeaders) -> Option<i64> {
    lookup_header(HeaderKind::Int, key, headers).and_then(|v| v.as_int())
}

#[inline]
pub fn lookup_float(key: &str, headers: &RequestHeaders) -> Option<f64> {
    lookup_header(HeaderKind::Float, key, headers).and_then(|v| v.as_float())
}

/// Structured boolean lookup; `None` only when the header is absent or empty.
#[inline]
pub fn lookup_boolean(key: &str, headers: &RequestHeaders) -> Option<bool> {
    lookup_header(HeaderKind::Boolean, key, headers).and_then(|v| v.as_bool())
}

/// Accumulated response hint headers: header name → hint header names.
///
/// Values keep insertion order and are never de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    headers: BTreeMap<String, Vec<String>>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value to a header's list, creating the list if absent.
    pub fn append(&mut self, header: &str, value: &str) {
        self.headers
            .entry(header.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// Append every list of `other` onto this accumulator.
    pub fn extend(&mut self, other: ResponseHeaders) {
        for (header, values) in other.headers {
            self.headers.entry(header).or_default().extend(values);
        }
    }

    pub fn get(&self, header: &str) -> Option<&[String]> {
        self.headers.get(header).map(Vec::as_slice)
    }

    /// Comma-joined value as written to the wire.
    pub fn joined(&self, header: &str) -> Option<String> {
        self.get(header).map(|values| values.join(", "))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Append `hint_header` to every header in `targets`.
///
/// # Examples
///
/// ```
/// use http_client_hints::protocol::{write_client_hint_header, ResponseHeaders};
///
/// let mut headers = ResponseHeaders::new();
/// write_client_hint_header(&["Accept-CH", "Vary"], "Sec-CH-Width", &mut headers);
/// write_client_hint_header(&["Accept-CH"], "Sec-CH-DPR", &mut headers);
/// assert_eq!(headers.joined("Accept-CH").unwrap(), "Sec-CH-Width, Sec-CH-DPR");
/// assert_eq!(headers.joined("Vary").unwrap(), "Sec-CH-Width");
/// ```
pub fn write_client_hint_header(
    targets: &[&str],
    hint_header: &str,
    headers: &mut ResponseHeaders,
) {
    for target in targets {
        headers.append(target, hint_header);
    }
}
