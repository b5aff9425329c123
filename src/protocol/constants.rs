//! Header names used during negotiation.

/// Request header names (lowercase, as stored in [`RequestHeaders`](super::RequestHeaders)).
pub mod headers {
    pub const USER_AGENT: &str = "user-agent";
    pub const COOKIE: &str = "cookie";
    /// Low entropy header, sent without opt-in.
    pub const SEC_CH_UA_MOBILE: &str = "sec-ch-ua-mobile";
    /// Low entropy header, sent without opt-in.
    pub const SEC_CH_UA_PLATFORM: &str = "sec-ch-ua-platform";
}

/// Response header names.
pub mod response {
    pub const ACCEPT_CH: &str = "Accept-CH";
    pub const VARY: &str = "Vary";
    pub const CRITICAL_CH: &str = "Critical-CH";

    /// Every critical hint listed in `Critical-CH` must also be present in
    /// `Accept-CH` and `Vary`.
    pub const CRITICAL_HINT_HEADERS: [&str; 3] = [ACCEPT_CH, VARY, CRITICAL_CH];

    /// Device, network and user-agent hints are only advertised.
    pub const ACCEPT_HINT_HEADERS: [&str; 1] = [ACCEPT_CH];
}
