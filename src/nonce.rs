//! Per-request CSP nonce.
//!
//! Responsibility:
//! - Generate one cryptographically random token per request
//! - Expose it to the header applier and to handlers rendering markup
//!
//! The nonce travels in the request extensions. `middleware::nonce::apply`
//! inserts a fresh `NonceService` for every request; nothing caches it.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{Extensions, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::NonceError;

/// Number of random bytes behind one nonce.
pub const NONCE_BYTES: usize = 20;

/// Anything that can hand out the current request's nonce.
pub trait NonceProvider {
    fn request_nonce(&self) -> &str;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonceService {
    value: Arc<str>,
}

impl NonceService {
    /// 20 random bytes from the OS, base64 encoded.
    pub fn generate() -> Result<Self, NonceError> {
        let mut bytes = [0u8; NONCE_BYTES];
        getrandom::fill(&mut bytes).map_err(NonceError::Entropy)?;
        Ok(Self {
            value: STANDARD.encode(bytes).into(),
        })
    }

    #[cfg(test)]
    pub(crate) fn from_value(value: &str) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// `nonce="<value>"`, ready to drop into an HTML tag.
    pub fn attribute(&self) -> String {
        format!("nonce=\"{}\"", self.value)
    }
}

impl NonceProvider for NonceService {
    fn request_nonce(&self) -> &str {
        &self.value
    }
}

/// Nonce of the current request.
///
/// Fails with [`NonceError::NotConfigured`] when no nonce was registered for
/// the request; callers render markup from it and must not silently go on.
pub fn get_nonce(extensions: &Extensions) -> Result<&str, NonceError> {
    extensions
        .get::<NonceService>()
        .map(NonceService::value)
        .ok_or(NonceError::NotConfigured)
}

pub fn get_nonce_attribute(extensions: &Extensions) -> Result<String, NonceError> {
    extensions
        .get::<NonceService>()
        .map(NonceService::attribute)
        .ok_or(NonceError::NotConfigured)
}

/// Handler-side access to the request nonce.
/// Rejects with 500 when the nonce layer is not installed.
#[derive(Clone, Debug)]
pub struct CspNonce(pub NonceService);

impl CspNonce {
    pub fn value(&self) -> &str {
        self.0.value()
    }

    pub fn attribute(&self) -> String {
        self.0.attribute()
    }
}

impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = NonceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<NonceService>()
            .cloned()
            .map(CspNonce)
            .ok_or(NonceError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonces_are_unique() {
        let a = NonceService::generate().unwrap();
        let b = NonceService::generate().unwrap();
        assert_ne!(a.value(), b.value());
    }

    #[test]
    fn nonce_is_base64_of_twenty_bytes() {
        let n = NonceService::generate().unwrap();
        let decoded = STANDARD.decode(n.value()).unwrap();
        assert_eq!(decoded.len(), NONCE_BYTES);
        assert_eq!(n.value().len(), 28);
    }

    #[test]
    fn accessors_read_from_extensions() {
        let mut ext = Extensions::new();
        ext.insert(NonceService::from_value("mock-nonce"));

        assert_eq!(get_nonce(&ext).unwrap(), "mock-nonce");
        assert_eq!(get_nonce_attribute(&ext).unwrap(), "nonce=\"mock-nonce\"");
    }

    #[test]
    fn missing_nonce_fails_loudly() {
        let ext = Extensions::new();
        let err = get_nonce(&ext).unwrap_err();
        assert!(matches!(err, NonceError::NotConfigured));
        assert_eq!(err.to_string(), "NonceService is not configured");
        assert!(get_nonce_attribute(&ext).is_err());
    }
}
