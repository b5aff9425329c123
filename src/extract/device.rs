//! Device hints (`Device-Memory`).

use super::{extract_listed_hints, HintsWriter};
use crate::protocol::constants::response::ACCEPT_HINT_HEADERS;
use crate::protocol::RequestHeaders;
use crate::types::{DeviceHint, DeviceInfo, ParsedUserAgent};

/// Extract the configured device hints and advertise the available ones in `Accept-CH`.
pub fn extract_device_hints(
    hints: &[DeviceHint],
    headers: &RequestHeaders,
    user_agent: Option<&ParsedUserAgent>,
    writer: &dyn HintsWriter,
) -> DeviceInfo {
    extract_listed_hints(hints, headers, user_agent, writer, &ACCEPT_HINT_HEADERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::testing::RecordingWriter;
    use crate::types::BrowserIdentity;

    #[test]
    fn test_memory_read_when_available() {
        let headers = RequestHeaders::new().with("Device-Memory", "8");
        let chrome = ParsedUserAgent::browser(BrowserIdentity::Chrome, "120.0.0");
        let writer = RecordingWriter::default();

        let info = extract_device_hints(&[DeviceHint::Memory], &headers, Some(&chrome), &writer);
        assert_eq!(info.available(DeviceHint::Memory), Some(true));
        assert_eq!(info.memory(), Some(8.0));
        assert_eq!(writer.joined("Accept-CH").unwrap(), "Device-Memory");
        assert!(writer.joined("Vary").is_none());
    }

    #[test]
    fn test_memory_ignored_when_unavailable() {
        let headers = RequestHeaders::new().with("device-memory", "8");
        let old_edge = ParsedUserAgent::browser(BrowserIdentity::EdgeChromium, "78");
        let writer = RecordingWriter::default();

        let info = extract_device_hints(&[DeviceHint::Memory], &headers, Some(&old_edge), &writer);
        assert_eq!(info.available(DeviceHint::Memory), Some(false));
        assert_eq!(info.memory(), None);
        assert_eq!(*writer.header_calls.lock(), 0);
    }

    #[test]
    fn test_nothing_configured() {
        let chrome = ParsedUserAgent::browser(BrowserIdentity::Chrome, "120");
        let writer = crate::extract::DiscardWriter;
        let info = extract_device_hints(&[], &RequestHeaders::new(), Some(&chrome), &writer);
        assert!(info.is_empty());
        assert_eq!(info.available(DeviceHint::Memory), None);
    }
}
