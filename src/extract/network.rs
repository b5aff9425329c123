//! Network hints (`Save-Data`, `Downlink`, `ECT`, `RTT`).

use super::{extract_listed_hints, HintsWriter};
use crate::protocol::constants::response::ACCEPT_HINT_HEADERS;
use crate::protocol::RequestHeaders;
use crate::types::{NetworkHint, NetworkInfo, ParsedUserAgent};

/// Extract the configured network hints and advertise the available ones in `Accept-CH`.
///
/// Values are typed per hint: `savedata` and `ect` as strings, `downlink`
/// as a float, `rtt` as an integer.
pub fn extract_network_hints(
    hints: &[NetworkHint],
    headers: &RequestHeaders,
    user_agent: Option<&ParsedUserAgent>,
    writer: &dyn HintsWriter,
) -> NetworkInfo {
    extract_listed_hints(hints, headers, user_agent, writer, &ACCEPT_HINT_HEADERS)
}
