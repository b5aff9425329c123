//! Handler access to negotiated hints.

use crate::types::ClientHintsState;
use axum::extract::FromRequestParts;
use http::request::Parts;
use std::convert::Infallible;
use std::ops::Deref;
use std::sync::Arc;

/// Axum extractor for the hints negotiated by [`ClientHintsLayer`](super::ClientHintsLayer).
///
/// Never rejects: without the layer (or when it is a pass-through) the
/// state is empty.
#[derive(Debug, Clone, Default)]
pub struct ClientHints(pub Arc<ClientHintsState>);

impl Deref for ClientHints {
    type Target = ClientHintsState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ClientHints
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .extensions
                .get::<Arc<ClientHintsState>>()
                .cloned()
                .unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CriticalInfo;

    #[tokio::test]
    async fn test_missing_state_is_empty() {
        let (mut parts, _) = http::Request::new(()).into_parts();
        let hints = ClientHints::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(*hints, ClientHintsState::default());
    }

    #[tokio::test]
    async fn test_reads_state_from_extensions() {
        let (mut parts, _) = http::Request::new(()).into_parts();
        let state = ClientHintsState {
            critical: Some(CriticalInfo::default()),
            ..Default::default()
        };
        parts.extensions.insert(Arc::new(state.clone()));

        let hints = ClientHints::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(*hints, state);
        assert!(hints.critical.as_ref().unwrap().first_request);
    }
}
