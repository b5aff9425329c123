//! Configuration for client hints negotiation.
//!
//! User-facing options ([`HintsOptions`]) are deserialized from JSON and
//! resolved once into an immutable [`HintsConfig`], which is then shared
//! by every request.
//!
//! # Examples
//!
//! ```
//! use http_client_hints::config::HintsOptions;
//! use http_client_hints::types::NetworkHint;
//!
//! let options = HintsOptions::from_json(r#"{
//!     "network": ["rtt", "ect"],
//!     "device": true,
//!     "critical": { "prefersColorScheme": true, "prefersColorSchemeOptions": {} }
//! }"#).unwrap();
//!
//! let config = options.resolve().unwrap();
//! assert_eq!(config.network, vec![NetworkHint::Rtt, NetworkHint::Ect]);
//! assert!(config.critical_enabled());
//! ```

use crate::error::{HintsError, Result};
use crate::types::{ClientHint, DeviceHint, NetworkHint, UserAgentHint};
use serde::Deserialize;
use std::time::Duration;

/// Default upper bound for asynchronous browser detection.
pub const DEFAULT_DETECTION_TIMEOUT_MS: u64 = 500;

/// A hint selection as written by the user: `true`/`false`, one hint name
/// or a list of hint names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HintSelection {
    Flag(bool),
    One(String),
    Many(Vec<String>),
}

impl Default for HintSelection {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl HintSelection {
    /// Flatten into a de-duplicated list; `true` selects `all`.
    pub fn resolve<H: ClientHint>(
        &self,
        all: &[H],
        from_key: fn(&str) -> Result<H>,
    ) -> Result<Vec<H>> {
        let selected = match self {
            Self::Flag(false) => Vec::new(),
            Self::Flag(true) => all.to_vec(),
            Self::One(key) => vec![from_key(key)?],
            Self::Many(keys) => keys.iter().map(|key| from_key(key)).collect::<Result<Vec<_>>>()?,
        };
        let mut unique = Vec::with_capacity(selected.len());
        for hint in selected {
            if !unique.contains(&hint) {
                unique.push(hint);
            }
        }
        Ok(unique)
    }
}

/// `detectOS` as written by the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DetectOsOption {
    Flag(bool),
    Named(String),
}

impl Default for DetectOsOption {
    fn default() -> Self {
        Self::Flag(false)
    }
}

/// Resolved OS detection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectOs {
    #[default]
    Off,
    On,
    /// Tell Windows 11 apart from Windows 10 via `Sec-CH-UA-Platform-Version`.
    Windows11,
}

impl DetectOsOption {
    pub fn resolve(&self) -> Result<DetectOs> {
        match self {
            Self::Flag(false) => Ok(DetectOs::Off),
            Self::Flag(true) => Ok(DetectOs::On),
            Self::Named(name) if name == "windows-11" => Ok(DetectOs::Windows11),
            Self::Named(name) => Err(HintsError::Config(format!("unknown detectOS value: {name}"))),
        }
    }
}

/// Theme cookie handling for `prefersColorScheme`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorSchemeOptions {
    /// Cookie `Path`.
    pub base_url: String,
    /// Theme used when the browser has no preference.
    pub default_theme: String,
    /// Cookie values accepted as a theme.
    pub theme_names: Vec<String>,
    pub cookie_name: String,
    pub dark_theme_name: String,
    pub light_theme_name: String,
    /// The application follows the browser theme and offers no theme switcher.
    pub use_browser_theme_only: bool,
    /// Let the first response go out without a theme cookie so the page can
    /// reload once the hints arrive.
    pub reload_on_first_request: bool,
}

impl Default for ColorSchemeOptions {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            default_theme: "light".to_string(),
            theme_names: vec!["dark".to_string(), "light".to_string()],
            cookie_name: "color-scheme".to_string(),
            dark_theme_name: "dark".to_string(),
            light_theme_name: "light".to_string(),
            use_browser_theme_only: false,
            reload_on_first_request: false,
        }
    }
}

impl ColorSchemeOptions {
    fn validate(&self) -> Result<()> {
        let invalid_token = |s: &str| {
            s.is_empty()
                || s.chars().any(|c| {
                    c.is_control() || c.is_whitespace() || matches!(c, ';' | ',' | '=' | '"')
                })
        };
        if invalid_token(&self.cookie_name) {
            return Err(HintsError::Config(format!(
                "invalid color scheme cookie name: {:?}",
                self.cookie_name
            )));
        }
        let themes = self
            .theme_names
            .iter()
            .chain([&self.default_theme, &self.dark_theme_name, &self.light_theme_name]);
        for theme in themes {
            if invalid_token(theme) {
                return Err(HintsError::Config(format!("invalid theme name: {theme:?}")));
            }
        }
        if !self.base_url.starts_with('/') {
            return Err(HintsError::Config(format!(
                "color scheme base url must start with '/': {:?}",
                self.base_url
            )));
        }
        // Written verbatim as the cookie `Path` attribute.
        if self.base_url.chars().any(|c| c.is_control() || c == ';') {
            return Err(HintsError::Config(format!(
                "invalid color scheme base url: {:?}",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// Critical hints switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CriticalHintsConfig {
    /// `Sec-CH-Viewport-Width` / `Sec-CH-Viewport-Height` (and `Sec-CH-DPR` on mobile).
    pub viewport_size: bool,
    pub prefers_color_scheme: bool,
    pub prefers_reduced_motion: bool,
    pub prefers_reduced_transparency: bool,
    /// `Sec-CH-Width`.
    pub width: bool,
    /// Viewport width used when no hint is available.
    pub client_width: Option<i64>,
    /// Viewport height used when no hint is available.
    pub client_height: Option<i64>,
    /// Without options no theme cookie is read or written.
    pub prefers_color_scheme_options: Option<ColorSchemeOptions>,
}

impl CriticalHintsConfig {
    /// Color scheme options, only when color scheme handling is enabled.
    pub fn color_scheme_options(&self) -> Option<&ColorSchemeOptions> {
        self.prefers_color_scheme_options
            .as_ref()
            .filter(|_| self.prefers_color_scheme)
    }
}

/// User-facing options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HintsOptions {
    pub detect_browser: bool,
    #[serde(rename = "detectOS")]
    pub detect_os: DetectOsOption,
    pub user_agent: HintSelection,
    pub network: HintSelection,
    pub device: HintSelection,
    pub critical: Option<CriticalHintsConfig>,
    pub detection_timeout_ms: u64,
}

impl Default for HintsOptions {
    fn default() -> Self {
        Self {
            detect_browser: false,
            detect_os: DetectOsOption::default(),
            user_agent: HintSelection::default(),
            network: HintSelection::default(),
            device: HintSelection::default(),
            critical: None,
            detection_timeout_ms: DEFAULT_DETECTION_TIMEOUT_MS,
        }
    }
}

impl HintsOptions {
    /// Parse options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and flatten into the runtime configuration.
    pub fn resolve(&self) -> Result<HintsConfig> {
        if let Some(options) = self
            .critical
            .as_ref()
            .and_then(|c| c.prefers_color_scheme_options.as_ref())
        {
            options.validate()?;
        }

        Ok(HintsConfig {
            detect_browser: self.detect_browser,
            detect_os: self.detect_os.resolve()?,
            user_agent: self.user_agent.resolve(&UserAgentHint::ALL, UserAgentHint::from_key)?,
            network: self.network.resolve(&NetworkHint::ALL, NetworkHint::from_key)?,
            device: self.device.resolve(&DeviceHint::ALL, DeviceHint::from_key)?,
            critical: self.critical.clone(),
            detection_timeout: Duration::from_millis(self.detection_timeout_ms),
        })
    }
}

/// Resolved, immutable configuration shared by all requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintsConfig {
    pub detect_browser: bool,
    pub detect_os: DetectOs,
    pub user_agent: Vec<UserAgentHint>,
    pub network: Vec<NetworkHint>,
    pub device: Vec<DeviceHint>,
    pub critical: Option<CriticalHintsConfig>,
    /// Upper bound for asynchronous browser detection.
    pub detection_timeout: Duration,
}

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            detect_browser: false,
            detect_os: DetectOs::Off,
            user_agent: Vec::new(),
            network: Vec::new(),
            device: Vec::new(),
            critical: None,
            detection_timeout: Duration::from_millis(DEFAULT_DETECTION_TIMEOUT_MS),
        }
    }
}

impl HintsConfig {
    #[inline]
    pub fn critical_enabled(&self) -> bool {
        self.critical.is_some()
    }

    #[inline]
    pub fn device_enabled(&self) -> bool {
        !self.device.is_empty()
    }

    #[inline]
    pub fn network_enabled(&self) -> bool {
        !self.network.is_empty()
    }

    /// Browser detection runs when asked for explicitly, for OS detection,
    /// or to read user-agent hints.
    #[inline]
    pub fn detect_enabled(&self) -> bool {
        self.detect_browser || self.detect_os != DetectOs::Off || !self.user_agent.is_empty()
    }

    /// When nothing is enabled the middleware passes requests through untouched.
    pub fn any_enabled(&self) -> bool {
        self.critical_enabled()
            || self.device_enabled()
            || self.network_enabled()
            || self.detect_enabled()
    }
}
