//! Browser capability tables.
//!
//! Which hints a browser actually sends depends on its identity and major
//! version. The tables below are plain data: one row per browser identity,
//! each listing the minimum major version per hint, with an optional
//! separate minimum for Android builds.
//!
//! | Hint | chrome / webview | edge-chromium | opera (desktop / android) |
//! |------|------------------|---------------|---------------------------|
//! | prefersColorScheme | 93 | 93 | 79 / 66 |
//! | prefersReducedMotion | 108 | 108 | 94 / 73 |
//! | prefersReducedTransparency | 119 | 119 | 79 |
//! | viewportHeight / viewportWidth | 108 | 108 | 94 / 73 |
//! | width | 46 | 46 | 33 |
//! | devicePixelRatio | 46 | 79 | 33 |
//! | memory | 63 | 79 | 46 / 50 |
//! | savedata | 49 | 79 | 35 |
//! | downlink / ect / rtt | 67 | 79 | 54 / 48 |
//!
//! Browsers missing from a table never get a hint. The lookup is total:
//! a non-browser agent, an unknown identity or an unparsable version all
//! simply mean "not available".
//!
//! # Sources
//!
//! - <https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Sec-CH-Prefers-Color-Scheme#browser_compatibility>
//! - <https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Sec-CH-Prefers-Reduced-Motion#browser_compatibility>
//! - <https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Sec-CH-Prefers-Reduced-Transparency>
//! - <https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/DPR#browser_compatibility>
//! - <https://developer.mozilla.org/en-US/docs/Web/API/Device_Memory_API>
//! - <https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Save-Data>

use crate::types::{
    BrowserIdentity, ClientHint, CriticalHint, DeviceHint, NetworkHint, ParsedUserAgent,
};

/// Minimum major version, split by platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinVersion {
    pub desktop: u32,
    pub android: u32,
}

impl MinVersion {
    /// Same minimum on every platform.
    pub const fn all(version: u32) -> Self {
        Self {
            desktop: version,
            android: version,
        }
    }

    pub const fn split(desktop: u32, android: u32) -> Self {
        Self { desktop, android }
    }

    #[inline]
    pub fn admits(&self, android: bool, major: u32) -> bool {
        major >= if android { self.android } else { self.desktop }
    }
}

/// One table row: a browser identity and its per-hint minimum versions.
#[derive(Debug)]
pub struct BrowserFeatures<H: 'static> {
    pub browser: BrowserIdentity,
    pub features: &'static [(H, MinVersion)],
}

impl<H: ClientHint> BrowserFeatures<H> {
    pub fn min_version(&self, hint: H) -> Option<MinVersion> {
        self.features
            .iter()
            .find(|(candidate, _)| *candidate == hint)
            .map(|(_, min)| *min)
    }
}

/// Hints gated by a capability table.
pub trait BrowserSupport: ClientHint {
    fn support_table() -> &'static [BrowserFeatures<Self>];
}

// Critical hints

static CHROMIUM_CRITICAL: [(CriticalHint, MinVersion); 7] = [
    (CriticalHint::PrefersColorScheme, MinVersion::all(93)),
    (CriticalHint::PrefersReducedMotion, MinVersion::all(108)),
    (CriticalHint::PrefersReducedTransparency, MinVersion::all(119)),
    (CriticalHint::ViewportHeight, MinVersion::all(108)),
    (CriticalHint::ViewportWidth, MinVersion::all(108)),
    // no compatibility data for Sec-CH-Width, DPR data is used
    (CriticalHint::Width, MinVersion::all(46)),
    (CriticalHint::DevicePixelRatio, MinVersion::all(46)),
];

static EDGE_CRITICAL: [(CriticalHint, MinVersion); 7] = [
    (CriticalHint::PrefersColorScheme, MinVersion::all(93)),
    (CriticalHint::PrefersReducedMotion, MinVersion::all(108)),
    (CriticalHint::PrefersReducedTransparency, MinVersion::all(119)),
    (CriticalHint::ViewportHeight, MinVersion::all(108)),
    (CriticalHint::ViewportWidth, MinVersion::all(108)),
    (CriticalHint::Width, MinVersion::all(46)),
    (CriticalHint::DevicePixelRatio, MinVersion::all(79)),
];

static OPERA_CRITICAL: [(CriticalHint, MinVersion); 7] = [
    (CriticalHint::PrefersColorScheme, MinVersion::split(79, 66)),
    (CriticalHint::PrefersReducedMotion, MinVersion::split(94, 73)),
    (CriticalHint::PrefersReducedTransparency, MinVersion::all(79)),
    (CriticalHint::ViewportHeight, MinVersion::split(94, 73)),
    (CriticalHint::ViewportWidth, MinVersion::split(94, 73)),
    (CriticalHint::Width, MinVersion::all(33)),
    (CriticalHint::DevicePixelRatio, MinVersion::all(33)),
];

static CRITICAL_SUPPORT: [BrowserFeatures<CriticalHint>; 4] = [
    BrowserFeatures {
        browser: BrowserIdentity::Chrome,
        features: &CHROMIUM_CRITICAL,
    },
    BrowserFeatures {
        browser: BrowserIdentity::EdgeChromium,
        features: &EDGE_CRITICAL,
    },
    BrowserFeatures {
        browser: BrowserIdentity::ChromiumWebview,
        features: &CHROMIUM_CRITICAL,
    },
    BrowserFeatures {
        browser: BrowserIdentity::Opera,
        features: &OPERA_CRITICAL,
    },
];

// Device hints

static CHROMIUM_DEVICE: [(DeviceHint, MinVersion); 1] = [(DeviceHint::Memory, MinVersion::all(63))];
static EDGE_DEVICE: [(DeviceHint, MinVersion); 1] = [(DeviceHint::Memory, MinVersion::all(79))];
static OPERA_DEVICE: [(DeviceHint, MinVersion); 1] =
    [(DeviceHint::Memory, MinVersion::split(46, 50))];

static DEVICE_SUPPORT: [BrowserFeatures<DeviceHint>; 4] = [
    BrowserFeatures {
        browser: BrowserIdentity::Chrome,
        features: &CHROMIUM_DEVICE,
    },
    BrowserFeatures {
        browser: BrowserIdentity::EdgeChromium,
        features: &EDGE_DEVICE,
    },
    BrowserFeatures {
        browser: BrowserIdentity::ChromiumWebview,
        features: &CHROMIUM_DEVICE,
    },
    BrowserFeatures {
        browser: BrowserIdentity::Opera,
        features: &OPERA_DEVICE,
    },
];

// Network hints

static CHROMIUM_NETWORK: [(NetworkHint, MinVersion); 4] = [
    (NetworkHint::SaveData, MinVersion::all(49)),
    (NetworkHint::Downlink, MinVersion::all(67)),
    (NetworkHint::Ect, MinVersion::all(67)),
    (NetworkHint::Rtt, MinVersion::all(67)),
];

static EDGE_NETWORK: [(NetworkHint, MinVersion); 4] = [
    (NetworkHint::SaveData, MinVersion::all(79)),
    (NetworkHint::Downlink, MinVersion::all(79)),
    (NetworkHint::Ect, MinVersion::all(79)),
    (NetworkHint::Rtt, MinVersion::all(79)),
];

static OPERA_NETWORK: [(NetworkHint, MinVersion); 4] = [
    (NetworkHint::SaveData, MinVersion::all(35)),
    (NetworkHint::Downlink, MinVersion::split(54, 48)),
    (NetworkHint::Ect, MinVersion::split(54, 48)),
    (NetworkHint::Rtt, MinVersion::split(54, 48)),
];

static NETWORK_SUPPORT: [BrowserFeatures<NetworkHint>; 4] = [
    BrowserFeatures {
        browser: BrowserIdentity::Chrome,
        features: &CHROMIUM_NETWORK,
    },
    BrowserFeatures {
        browser: BrowserIdentity::EdgeChromium,
        features: &EDGE_NETWORK,
    },
    BrowserFeatures {
        browser: BrowserIdentity::ChromiumWebview,
        features: &CHROMIUM_NETWORK,
    },
    BrowserFeatures {
        browser: BrowserIdentity::Opera,
        features: &OPERA_NETWORK,
    },
];

impl BrowserSupport for CriticalHint {
    fn support_table() -> &'static [BrowserFeatures<Self>] {
        &CRITICAL_SUPPORT
    }
}

impl BrowserSupport for DeviceHint {
    fn support_table() -> &'static [BrowserFeatures<Self>] {
        &DEVICE_SUPPORT
    }
}

impl BrowserSupport for NetworkHint {
    fn support_table() -> &'static [BrowserFeatures<Self>] {
        &NETWORK_SUPPORT
    }
}

/// Is `hint` available for `user_agent` according to `table`?
pub fn feature_available_in<H: ClientHint>(
    table: &[BrowserFeatures<H>],
    user_agent: Option<&ParsedUserAgent>,
    hint: H,
) -> bool {
    let Some(user_agent) = user_agent.filter(|ua| ua.is_browser()) else {
        return false;
    };
    let Some(row) = table.iter().find(|row| row.browser == user_agent.name) else {
        return false;
    };
    let Some(major) = user_agent.major_version() else {
        return false;
    };
    let android = user_agent.is_android();
    row.min_version(hint)
        .is_some_and(|min| min.admits(android, major))
}

/// Is `hint` available for `user_agent` according to its category table?
#[inline]
pub fn browser_feature_available<H: BrowserSupport>(
    user_agent: Option<&ParsedUserAgent>,
    hint: H,
) -> bool {
    feature_available_in(H::support_table(), user_agent, hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgentKind;

    fn ua(name: BrowserIdentity, version: &str) -> ParsedUserAgent {
        ParsedUserAgent::browser(name, version)
    }

    fn android(name: BrowserIdentity, version: &str) -> ParsedUserAgent {
        ParsedUserAgent::browser(name, version).with_os("Android OS")
    }

    /// Published minimum versions:
    /// `(hint, chrome / webview, edge, opera desktop, opera android)`.
    type Expected<H> = (H, u32, u32, u32, u32);

    const CRITICAL_MINIMUMS: [Expected<CriticalHint>; 7] = [
        (CriticalHint::PrefersColorScheme, 93, 93, 79, 66),
        (CriticalHint::PrefersReducedMotion, 108, 108, 94, 73),
        (CriticalHint::PrefersReducedTransparency, 119, 119, 79, 79),
        (CriticalHint::ViewportHeight, 108, 108, 94, 73),
        (CriticalHint::ViewportWidth, 108, 108, 94, 73),
        (CriticalHint::Width, 46, 46, 33, 33),
        (CriticalHint::DevicePixelRatio, 46, 79, 33, 33),
    ];

    const DEVICE_MINIMUMS: [Expected<DeviceHint>; 1] = [(DeviceHint::Memory, 63, 79, 46, 50)];

    const NETWORK_MINIMUMS: [Expected<NetworkHint>; 4] = [
        (NetworkHint::SaveData, 49, 79, 35, 35),
        (NetworkHint::Downlink, 67, 79, 54, 48),
        (NetworkHint::Ect, 67, 79, 54, 48),
        (NetworkHint::Rtt, 67, 79, 54, 48),
    ];

    /// `(browser, android, minimum)` for every platform a row applies to.
    fn cases<H: Copy>(row: &Expected<H>) -> [(BrowserIdentity, bool, u32); 8] {
        let (_, chromium, edge, opera, opera_android) = *row;
        [
            (BrowserIdentity::Chrome, false, chromium),
            (BrowserIdentity::Chrome, true, chromium),
            (BrowserIdentity::ChromiumWebview, false, chromium),
            (BrowserIdentity::ChromiumWebview, true, chromium),
            (BrowserIdentity::EdgeChromium, false, edge),
            (BrowserIdentity::EdgeChromium, true, edge),
            (BrowserIdentity::Opera, false, opera),
            (BrowserIdentity::Opera, true, opera_android),
        ]
    }

    /// Every hint flips from unavailable to available exactly at its
    /// minimum, for every browser and platform.
    fn assert_boundaries<H: BrowserSupport>(expected: &[Expected<H>]) {
        for row in expected {
            let hint = row.0;
            for (browser, on_android, min) in cases(row) {
                let make = if on_android { android } else { ua };
                let below = make(browser, &format!("{}.0.1", min - 1));
                let at = make(browser, &format!("{min}.0.1"));
                assert!(
                    !browser_feature_available(Some(&below), hint),
                    "{browser} {} (android: {on_android}) should not support {hint:?}",
                    min - 1
                );
                assert!(
                    browser_feature_available(Some(&at), hint),
                    "{browser} {min} (android: {on_android}) should support {hint:?}"
                );
            }
        }
    }

    /// Every table row and entry has a published minimum to check against.
    fn assert_tables_covered<H: BrowserSupport>(expected: &[Expected<H>]) {
        let table = H::support_table();
        assert_eq!(table.len(), 4);
        for row in table {
            assert_eq!(row.features.len(), expected.len(), "{}", row.browser);
            for (hint, _) in row.features {
                assert!(
                    expected.iter().any(|e| e.0 == *hint),
                    "{} {hint:?} has no expected minimum",
                    row.browser
                );
            }
        }
    }

    #[test]
    fn test_critical_boundaries() {
        assert_tables_covered(&CRITICAL_MINIMUMS);
        assert_boundaries(&CRITICAL_MINIMUMS);
    }

    #[test]
    fn test_device_boundaries() {
        assert_tables_covered(&DEVICE_MINIMUMS);
        assert_boundaries(&DEVICE_MINIMUMS);
    }

    #[test]
    fn test_network_boundaries() {
        assert_tables_covered(&NETWORK_MINIMUMS);
        assert_boundaries(&NETWORK_MINIMUMS);
    }

    #[test]
    fn test_opera_android_split() {
        let desktop = ua(BrowserIdentity::Opera, "70.0.0");
        let mobile = android(BrowserIdentity::Opera, "70.0.0");
        assert!(!browser_feature_available(Some(&desktop), CriticalHint::PrefersColorScheme));
        assert!(browser_feature_available(Some(&mobile), CriticalHint::PrefersColorScheme));
    }

    #[test]
    fn test_non_browser_never_available() {
        let mut bot = ua(BrowserIdentity::Chrome, "120");
        bot.kind = AgentKind::Bot;
        for hint in CriticalHint::ALL {
            assert!(!browser_feature_available(Some(&bot), hint));
        }
        assert!(!browser_feature_available(None, NetworkHint::Rtt));
    }

    #[test]
    fn test_unknown_browser_never_available() {
        let firefox = ua(BrowserIdentity::Firefox, "130");
        for hint in CriticalHint::ALL {
            assert!(!browser_feature_available(Some(&firefox), hint));
        }
        assert!(!browser_feature_available(Some(&firefox), DeviceHint::Memory));
    }

    #[test]
    fn test_unparsable_version_is_unavailable() {
        let chrome = ua(BrowserIdentity::Chrome, "canary");
        assert!(!browser_feature_available(Some(&chrome), CriticalHint::Width));
    }

    #[test]
    fn test_trailing_segments_ignored() {
        let chrome = ua(BrowserIdentity::Chrome, "93.x.y");
        assert!(browser_feature_available(Some(&chrome), CriticalHint::PrefersColorScheme));
    }

    #[test]
    fn test_custom_table() {
        static TABLE: [(NetworkHint, MinVersion); 1] = [(NetworkHint::Rtt, MinVersion::all(10))];
        let rows = [BrowserFeatures {
            browser: BrowserIdentity::Firefox,
            features: &TABLE,
        }];
        let firefox = ua(BrowserIdentity::Firefox, "10");
        assert!(feature_available_in(&rows, Some(&firefox), NetworkHint::Rtt));
        assert!(!feature_available_in(&rows, Some(&firefox), NetworkHint::Ect));
    }
}
