//! Core client hints types.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ParsedUserAgent`] | Parser output consumed by capability detection |
//! | [`CriticalHint`], [`DeviceHint`], [`NetworkHint`], [`UserAgentHint`] | Hint identifiers per category |
//! | [`CriticalInfo`] | Critical hints result |
//! | [`DeviceInfo`], [`NetworkInfo`] | Results for configured hint lists |
//! | [`BrowserInfo`] | Browser detection result |
//! | [`ClientHintsState`] | Per-request aggregate handed to handlers |

mod hints;
mod info;
mod user_agent;

pub use hints::*;
pub use info::*;
pub use user_agent::*;
