//! Critical hints: user preference media features, viewport and image width.
//!
//! Extraction runs in three stages:
//!
//! 1. availability: which enabled hints the browser can send,
//! 2. collection: read the request headers (and the theme cookie),
//! 3. side effects: advertise the hints and emit the theme cookie.
//!
//! `Sec-CH-DPR` is only requested from mobile browsers (`Sec-CH-UA-Mobile: ?1`)
//! that also support the viewport hints; the viewport size is reported in
//! CSS pixels whenever a device pixel ratio was sent.

use super::HintsWriter;
use crate::config::CriticalHintsConfig;
use crate::features::browser_feature_available;
use crate::protocol::constants::headers::{COOKIE, SEC_CH_UA_MOBILE};
use crate::protocol::constants::response::CRITICAL_HINT_HEADERS;
use crate::protocol::{
    cookie_value, lookup_boolean, lookup_float, lookup_int, write_client_hint_header,
    RequestHeaders, ResponseHeaders, ThemeCookie,
};
use crate::types::{
    ClientHint, ColorScheme, CriticalHint, CriticalInfo, ParsedUserAgent, ReducePreference,
};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

/// Extract critical hints, stamping the theme cookie with the current time.
pub fn extract_critical_hints(
    config: &CriticalHintsConfig,
    headers: &RequestHeaders,
    user_agent: Option<&ParsedUserAgent>,
    writer: &dyn HintsWriter,
) -> CriticalInfo {
    extract_critical_hints_at(config, headers, user_agent, writer, Utc::now())
}

/// [`extract_critical_hints`] with an explicit clock.
pub fn extract_critical_hints_at(
    config: &CriticalHintsConfig,
    headers: &RequestHeaders,
    user_agent: Option<&ParsedUserAgent>,
    writer: &dyn HintsWriter,
    now: DateTime<Utc>,
) -> CriticalInfo {
    let mut info = collect_critical_hints(config, headers, user_agent);

    let response = critical_response_headers(&info, config);
    if !response.is_empty() {
        writer.write_headers(response);
    }

    info.color_scheme_cookie = write_theme_cookie(&info, config, writer, now);

    debug!(
        first_request = info.first_request,
        color_scheme = ?info.prefers_color_scheme,
        theme = ?info.color_scheme_from_cookie,
        "critical hints extracted"
    );
    info
}

fn lookup_availability(
    config: &CriticalHintsConfig,
    headers: &RequestHeaders,
    user_agent: Option<&ParsedUserAgent>,
) -> CriticalInfo {
    let mut info = CriticalInfo::default();

    let Some(user_agent) = user_agent.filter(|ua| ua.is_browser()) else {
        return info;
    };
    let available = |hint: CriticalHint| browser_feature_available(Some(user_agent), hint);

    if config.prefers_color_scheme {
        info.prefers_color_scheme_available = available(CriticalHint::PrefersColorScheme);
    }
    if config.prefers_reduced_motion {
        info.prefers_reduced_motion_available = available(CriticalHint::PrefersReducedMotion);
    }
    if config.prefers_reduced_transparency {
        info.prefers_reduced_transparency_available =
            available(CriticalHint::PrefersReducedTransparency);
    }
    if config.viewport_size {
        info.viewport_height_available = available(CriticalHint::ViewportHeight);
        info.viewport_width_available = available(CriticalHint::ViewportWidth);
    }
    if config.width {
        info.width_available = available(CriticalHint::Width);
    }

    // Sec-CH-UA-Mobile is low entropy: sent without opt-in.
    if (info.viewport_width_available || info.viewport_height_available)
        && lookup_boolean(SEC_CH_UA_MOBILE, headers) == Some(true)
    {
        info.device_pixel_ratio_available = available(CriticalHint::DevicePixelRatio);
    }

    info
}

/// Lowercased, non-empty header value.
fn preference_token(hint: CriticalHint, headers: &RequestHeaders) -> Option<String> {
    headers
        .get(hint.request_header())
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

fn collect_critical_hints(
    config: &CriticalHintsConfig,
    headers: &RequestHeaders,
    user_agent: Option<&ParsedUserAgent>,
) -> CriticalInfo {
    let mut info = lookup_availability(config, headers, user_agent);

    if config.prefers_color_scheme {
        let options = config.prefers_color_scheme_options.as_ref();

        if let Some(options) = options {
            let from_cookie = headers
                .get(COOKIE)
                .and_then(|cookies| cookie_value(cookies, &options.cookie_name))
                .filter(|theme| options.theme_names.iter().any(|name| name.as_str() == *theme));
            if let Some(theme) = from_cookie {
                trace!(theme, "color scheme from cookie");
                info.color_scheme_from_cookie = Some(theme.to_string());
                info.first_request = false;
            }
        }

        if info.color_scheme_from_cookie.is_none() {
            let token = if info.prefers_color_scheme_available {
                preference_token(CriticalHint::PrefersColorScheme, headers)
            } else {
                None
            };
            if let Some(scheme) = token.as_deref().and_then(ColorScheme::from_token) {
                info.prefers_color_scheme = Some(scheme);
                info.first_request = false;
            }

            if let Some(options) = options {
                let theme = match token.as_deref() {
                    None | Some("no-preference") => &options.default_theme,
                    Some("dark") => &options.dark_theme_name,
                    Some(_) => &options.light_theme_name,
                };
                info.color_scheme_from_cookie = Some(theme.clone());
            }
        }
    }

    if info.prefers_reduced_motion_available && config.prefers_reduced_motion {
        let token = preference_token(CriticalHint::PrefersReducedMotion, headers);
        if let Some(preference) = token.as_deref().and_then(ReducePreference::from_token) {
            info.prefers_reduced_motion = Some(preference);
            info.first_request = false;
        }
    }

    // Unlike reduced motion, any unrecognized value counts as no preference.
    if info.prefers_reduced_transparency_available && config.prefers_reduced_transparency {
        if let Some(token) = preference_token(CriticalHint::PrefersReducedTransparency, headers) {
            info.prefers_reduced_transparency = Some(if token == "reduce" {
                ReducePreference::Reduce
            } else {
                ReducePreference::NoPreference
            });
            info.first_request = false;
        }
    }

    info.viewport_height = config.client_height;
    if info.viewport_height_available && config.viewport_size {
        if let Some(height) = lookup_int(CriticalHint::ViewportHeight.request_header(), headers) {
            info.viewport_height = Some(height);
            info.first_request = false;
        }
    }

    info.viewport_width = config.client_width;
    if info.viewport_width_available && config.viewport_size {
        if let Some(width) = lookup_int(CriticalHint::ViewportWidth.request_header(), headers) {
            info.viewport_width = Some(width);
            info.first_request = false;
        }
    }

    if info.device_pixel_ratio_available && config.viewport_size {
        if let Some(dpr) = lookup_float(CriticalHint::DevicePixelRatio.request_header(), headers) {
            info.device_pixel_ratio = Some(dpr);
            info.first_request = false;
            if dpr > 0.0 {
                info.viewport_width = info.viewport_width.map(|w| to_css_pixels(w, dpr));
                info.viewport_height = info.viewport_height.map(|h| to_css_pixels(h, dpr));
            }
        }
    }

    if info.width_available && config.width {
        if let Some(width) = lookup_int(CriticalHint::Width.request_header(), headers) {
            info.width = Some(width);
            info.first_request = false;
        }
    }

    info
}

/// Device pixels to CSS pixels, rounding halves up.
fn to_css_pixels(device_pixels: i64, dpr: f64) -> i64 {
    (device_pixels as f64 / dpr + 0.5).floor() as i64
}

/// Every critical hint goes to `Accept-CH`, `Vary` and `Critical-CH`.
fn critical_response_headers(
    info: &CriticalInfo,
    config: &CriticalHintsConfig,
) -> ResponseHeaders {
    let mut headers = ResponseHeaders::new();
    let mut advertise = |hint: CriticalHint| {
        write_client_hint_header(&CRITICAL_HINT_HEADERS, hint.header_name(), &mut headers)
    };

    if config.prefers_color_scheme && info.prefers_color_scheme_available {
        advertise(CriticalHint::PrefersColorScheme);
    }
    if config.prefers_reduced_motion && info.prefers_reduced_motion_available {
        advertise(CriticalHint::PrefersReducedMotion);
    }
    if config.prefers_reduced_transparency && info.prefers_reduced_transparency_available {
        advertise(CriticalHint::PrefersReducedTransparency);
    }
    // Viewport hints go out in pairs.
    if config.viewport_size && info.viewport_height_available && info.viewport_width_available {
        advertise(CriticalHint::ViewportHeight);
        advertise(CriticalHint::ViewportWidth);
        if info.device_pixel_ratio_available {
            advertise(CriticalHint::DevicePixelRatio);
        }
    }
    if config.width && info.width_available {
        advertise(CriticalHint::Width);
    }

    headers
}

/// Hand the theme cookie to `writer` and return its `Set-Cookie` text.
///
/// On a first request with `reload_on_first_request` disabled the cookie
/// is not written, but its text is still returned.
fn write_theme_cookie(
    info: &CriticalInfo,
    config: &CriticalHintsConfig,
    writer: &dyn HintsWriter,
    now: DateTime<Utc>,
) -> Option<String> {
    let options = config.color_scheme_options()?;
    let theme = info
        .color_scheme_from_cookie
        .as_deref()
        .unwrap_or(options.default_theme.as_str());
    let cookie = ThemeCookie::new(&options.cookie_name, theme, &options.base_url, now);

    if !info.first_request || options.reload_on_first_request {
        writer.write_cookie(&cookie);
    } else {
        trace!(cookie = %cookie.name, "first request, theme cookie deferred");
    }

    Some(cookie.to_string())
}
