//! Negotiation results.
//!
//! These records are what handlers see. They serialize with camelCase keys
//! and `<hint>Available` flags so they can be embedded as-is in a
//! server-rendered page.

use super::hints::ClientHint;
use super::user_agent::{AgentKind, BrowserIdentity, ParsedUserAgent};
use crate::error::Result;
use crate::protocol::HintValue;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// `Sec-CH-Prefers-Color-Scheme` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    Dark,
    Light,
    NoPreference,
}

impl ColorScheme {
    /// Parse a lowercase header token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            "no-preference" => Some(Self::NoPreference),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::NoPreference => "no-preference",
        }
    }
}

/// `Sec-CH-Prefers-Reduced-Motion` / `Sec-CH-Prefers-Reduced-Transparency` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReducePreference {
    NoPreference,
    Reduce,
}

impl ReducePreference {
    /// Parse a lowercase header token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "no-preference" => Some(Self::NoPreference),
            "reduce" => Some(Self::Reduce),
            _ => None,
        }
    }
}

/// Result of critical hints extraction.
///
/// `first_request` stays `true` until some hint value was actually read
/// from a request header or the theme cookie.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalInfo {
    pub first_request: bool,
    pub prefers_color_scheme_available: bool,
    pub prefers_reduced_motion_available: bool,
    pub prefers_reduced_transparency_available: bool,
    pub viewport_height_available: bool,
    pub viewport_width_available: bool,
    pub width_available: bool,
    pub device_pixel_ratio_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefers_color_scheme: Option<ColorScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefers_reduced_motion: Option<ReducePreference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefers_reduced_transparency: Option<ReducePreference>,
    /// Viewport height in CSS pixels (DPR adjusted when a DPR was read).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_height: Option<i64>,
    /// Viewport width in CSS pixels (DPR adjusted when a DPR was read).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_width: Option<i64>,
    /// Intended display width of the requested image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_pixel_ratio: Option<f64>,
    /// Theme resolved from the cookie, or synthesized from the color scheme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme_from_cookie: Option<String>,
    /// `Set-Cookie` representation of the theme cookie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme_cookie: Option<String>,
}

impl Default for CriticalInfo {
    fn default() -> Self {
        Self {
            first_request: true,
            prefers_color_scheme_available: false,
            prefers_reduced_motion_available: false,
            prefers_reduced_transparency_available: false,
            viewport_height_available: false,
            viewport_width_available: false,
            width_available: false,
            device_pixel_ratio_available: false,
            prefers_color_scheme: None,
            prefers_reduced_motion: None,
            prefers_reduced_transparency: None,
            viewport_height: None,
            viewport_width: None,
            width: None,
            device_pixel_ratio: None,
            color_scheme_from_cookie: None,
            color_scheme_cookie: None,
        }
    }
}

/// One configured hint and what was learned about it.
#[derive(Debug, Clone, PartialEq)]
pub struct HintEntry<H> {
    pub hint: H,
    pub available: bool,
    pub value: Option<HintValue>,
}

/// Results for a configured list of hints.
///
/// Only configured hints have an entry; asking about any other hint
/// yields `None` rather than `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct HintSet<H> {
    entries: Vec<HintEntry<H>>,
}

impl<H> Default for HintSet<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: ClientHint> HintSet<H> {
    /// Record a hint, replacing an earlier entry for the same hint.
    pub fn insert(&mut self, hint: H, available: bool, value: Option<HintValue>) {
        let entry = HintEntry {
            hint,
            available,
            value,
        };
        match self.entries.iter_mut().find(|e| e.hint == hint) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[HintEntry<H>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, hint: H) -> Option<&HintEntry<H>> {
        self.entries.iter().find(|e| e.hint == hint)
    }

    /// `None` when the hint was not configured.
    pub fn available(&self, hint: H) -> Option<bool> {
        self.entry(hint).map(|e| e.available)
    }

    pub fn value(&self, hint: H) -> Option<&HintValue> {
        self.entry(hint).and_then(|e| e.value.as_ref())
    }
}

impl<H: ClientHint> Serialize for HintSet<H> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for entry in &self.entries {
            map.serialize_entry(&format!("{}Available", entry.hint.key()), &entry.available)?;
            if let Some(value) = &entry.value {
                map.serialize_entry(entry.hint.key(), value)?;
            }
        }
        map.end()
    }
}

/// Device hints result.
pub type DeviceInfo = HintSet<super::DeviceHint>;

/// Network hints result.
pub type NetworkInfo = HintSet<super::NetworkHint>;

impl HintSet<super::DeviceHint> {
    /// `Device-Memory` in GiB.
    pub fn memory(&self) -> Option<f64> {
        self.value(super::DeviceHint::Memory).and_then(HintValue::as_float)
    }
}

impl HintSet<super::NetworkHint> {
    /// Raw `Save-Data` token (normally `on`).
    pub fn save_data(&self) -> Option<&str> {
        self.value(super::NetworkHint::SaveData).and_then(HintValue::as_str)
    }

    /// `Downlink` in Mbps.
    pub fn downlink(&self) -> Option<f64> {
        self.value(super::NetworkHint::Downlink).and_then(HintValue::as_float)
    }

    /// `ECT` token.
    pub fn ect(&self) -> Option<&str> {
        self.value(super::NetworkHint::Ect).and_then(HintValue::as_str)
    }

    /// `RTT` in milliseconds.
    pub fn rtt(&self) -> Option<i64> {
        self.value(super::NetworkHint::Rtt).and_then(HintValue::as_int)
    }
}

/// Values reported through user-agent client hint request headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAgentData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_version_list: Option<String>,
}

impl UserAgentData {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Browser detection result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserInfo {
    #[serde(rename = "type")]
    pub kind: AgentKind,
    pub name: BrowserIdentity,
    pub version: String,
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ua: Option<UserAgentData>,
}

impl From<ParsedUserAgent> for BrowserInfo {
    fn from(parsed: ParsedUserAgent) -> Self {
        Self {
            kind: parsed.kind,
            name: parsed.name,
            version: parsed.version,
            os: parsed.os,
            ua: None,
        }
    }
}

/// Everything negotiated for one request, one slot per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientHintsState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<BrowserInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<CriticalInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkInfo>,
}

impl ClientHintsState {
    /// JSON snapshot for server-side rendering.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
