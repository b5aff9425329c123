//! Client hint identifiers.
//!
//! Each category has its own closed enum. The configuration key (what a
//! user writes in the options), the header advertised in `Accept-CH` and
//! the lowercase request header the browser sends back are all derived
//! from the variant.
//!
//! | Category | Hints |
//! |----------|-------|
//! | Critical | `prefersColorScheme`, `prefersReducedMotion`, `prefersReducedTransparency`, `viewportHeight`, `viewportWidth`, `width`, `devicePixelRatio` |
//! | Device | `memory` |
//! | Network | `savedata`, `downlink`, `ect`, `rtt` |
//! | User agent | `architecture`, `bitness`, `model`, `platformVersion`, `fullVersionList` |

use crate::error::{HintsError, Result};
use crate::protocol::HeaderKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common surface of every hint enum.
pub trait ClientHint: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Configuration key, e.g. `savedata`.
    fn key(self) -> &'static str;

    /// Header name as advertised in `Accept-CH`, e.g. `Save-Data`.
    fn header_name(self) -> &'static str;

    /// Request header name in lowercase, e.g. `save-data`.
    fn request_header(self) -> &'static str;

    /// How the request header value is decoded.
    fn kind(self) -> HeaderKind;
}

/// Critical client hints (responsive images and user preference media features).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriticalHint {
    PrefersColorScheme,
    PrefersReducedMotion,
    PrefersReducedTransparency,
    ViewportHeight,
    ViewportWidth,
    Width,
    DevicePixelRatio,
}

impl CriticalHint {
    pub const ALL: [CriticalHint; 7] = [
        Self::PrefersColorScheme,
        Self::PrefersReducedMotion,
        Self::PrefersReducedTransparency,
        Self::ViewportHeight,
        Self::ViewportWidth,
        Self::Width,
        Self::DevicePixelRatio,
    ];
}

impl ClientHint for CriticalHint {
    fn key(self) -> &'static str {
        match self {
            Self::PrefersColorScheme => "prefersColorScheme",
            Self::PrefersReducedMotion => "prefersReducedMotion",
            Self::PrefersReducedTransparency => "prefersReducedTransparency",
            Self::ViewportHeight => "viewportHeight",
            Self::ViewportWidth => "viewportWidth",
            Self::Width => "width",
            Self::DevicePixelRatio => "devicePixelRatio",
        }
    }

    fn header_name(self) -> &'static str {
        match self {
            Self::PrefersColorScheme => "Sec-CH-Prefers-Color-Scheme",
            Self::PrefersReducedMotion => "Sec-CH-Prefers-Reduced-Motion",
            Self::PrefersReducedTransparency => "Sec-CH-Prefers-Reduced-Transparency",
            Self::ViewportHeight => "Sec-CH-Viewport-Height",
            Self::ViewportWidth => "Sec-CH-Viewport-Width",
            Self::Width => "Sec-CH-Width",
            Self::DevicePixelRatio => "Sec-CH-DPR",
        }
    }

    fn request_header(self) -> &'static str {
        match self {
            Self::PrefersColorScheme => "sec-ch-prefers-color-scheme",
            Self::PrefersReducedMotion => "sec-ch-prefers-reduced-motion",
            Self::PrefersReducedTransparency => "sec-ch-prefers-reduced-transparency",
            Self::ViewportHeight => "sec-ch-viewport-height",
            Self::ViewportWidth => "sec-ch-viewport-width",
            Self::Width => "sec-ch-width",
            Self::DevicePixelRatio => "sec-ch-dpr",
        }
    }

    fn kind(self) -> HeaderKind {
        match self {
            Self::PrefersColorScheme
            | Self::PrefersReducedMotion
            | Self::PrefersReducedTransparency => HeaderKind::String,
            Self::ViewportHeight | Self::ViewportWidth | Self::Width => HeaderKind::Int,
            Self::DevicePixelRatio => HeaderKind::Float,
        }
    }
}

/// Device client hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceHint {
    /// `Device-Memory`, approximate RAM in GiB.
    Memory,
}

impl DeviceHint {
    pub const ALL: [DeviceHint; 1] = [Self::Memory];

    /// Look up a device hint by configuration key.
    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|hint| hint.key() == key)
            .ok_or_else(|| HintsError::UnknownHint(key.to_string()))
    }
}

impl ClientHint for DeviceHint {
    fn key(self) -> &'static str {
        match self {
            Self::Memory => "memory",
        }
    }

    fn header_name(self) -> &'static str {
        match self {
            Self::Memory => "Device-Memory",
        }
    }

    fn request_header(self) -> &'static str {
        match self {
            Self::Memory => "device-memory",
        }
    }

    fn kind(self) -> HeaderKind {
        match self {
            Self::Memory => HeaderKind::Float,
        }
    }
}

/// Network client hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkHint {
    /// `Save-Data`, the reduced data usage preference.
    SaveData,
    /// `Downlink`, effective bandwidth in Mbps.
    Downlink,
    /// `ECT`, effective connection type (`slow-2g` .. `4g`).
    Ect,
    /// `RTT`, round trip time in milliseconds.
    Rtt,
}

impl NetworkHint {
    pub const ALL: [NetworkHint; 4] = [Self::SaveData, Self::Downlink, Self::Ect, Self::Rtt];

    /// Look up a network hint by configuration key.
    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|hint| hint.key() == key)
            .ok_or_else(|| HintsError::UnknownHint(key.to_string()))
    }
}

impl ClientHint for NetworkHint {
    fn key(self) -> &'static str {
        match self {
            Self::SaveData => "savedata",
            Self::Downlink => "downlink",
            Self::Ect => "ect",
            Self::Rtt => "rtt",
        }
    }

    fn header_name(self) -> &'static str {
        match self {
            Self::SaveData => "Save-Data",
            Self::Downlink => "Downlink",
            Self::Ect => "ECT",
            Self::Rtt => "RTT",
        }
    }

    fn request_header(self) -> &'static str {
        match self {
            Self::SaveData => "save-data",
            Self::Downlink => "downlink",
            Self::Ect => "ect",
            Self::Rtt => "rtt",
        }
    }

    fn kind(self) -> HeaderKind {
        match self {
            Self::SaveData | Self::Ect => HeaderKind::String,
            Self::Downlink => HeaderKind::Float,
            Self::Rtt => HeaderKind::Int,
        }
    }
}

/// High entropy user-agent client hints (UA-CH).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserAgentHint {
    Architecture,
    Bitness,
    Model,
    PlatformVersion,
    FullVersionList,
}

impl UserAgentHint {
    pub const ALL: [UserAgentHint; 5] = [
        Self::Architecture,
        Self::Bitness,
        Self::Model,
        Self::PlatformVersion,
        Self::FullVersionList,
    ];

    /// Look up a user-agent hint by configuration key.
    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|hint| hint.key() == key)
            .ok_or_else(|| HintsError::UnknownHint(key.to_string()))
    }
}

impl ClientHint for UserAgentHint {
    fn key(self) -> &'static str {
        match self {
            Self::Architecture => "architecture",
            Self::Bitness => "bitness",
            Self::Model => "model",
            Self::PlatformVersion => "platformVersion",
            Self::FullVersionList => "fullVersionList",
        }
    }

    fn header_name(self) -> &'static str {
        match self {
            Self::Architecture => "Sec-CH-UA-Arch",
            Self::Bitness => "Sec-CH-UA-Bitness",
            Self::Model => "Sec-CH-UA-Model",
            Self::PlatformVersion => "Sec-CH-UA-Platform-Version",
            Self::FullVersionList => "Sec-CH-UA-Full-Version-List",
        }
    }

    fn request_header(self) -> &'static str {
        match self {
            Self::Architecture => "sec-ch-ua-arch",
            Self::Bitness => "sec-ch-ua-bitness",
            Self::Model => "sec-ch-ua-model",
            Self::PlatformVersion => "sec-ch-ua-platform-version",
            Self::FullVersionList => "sec-ch-ua-full-version-list",
        }
    }

    fn kind(self) -> HeaderKind {
        HeaderKind::String
    }
}
