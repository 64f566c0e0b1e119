/*
 * Responsibility
 * - middleware public interface (re-exports)
 * - apply(...) wiring the nonce and security headers layers in the right order
 */
pub mod nonce;
pub mod security_headers;

use std::sync::Arc;

use axum::Router;

use crate::settings::SecurityHeadersSettings;

pub use security_headers::{SecurityHeadersLayer, SecurityHeadersService};

/// Security headers with a per-request CSP nonce.
///
/// The nonce layer is added last so it runs first and the nonce is in the
/// request extensions by the time the headers are evaluated.
pub fn apply<S>(router: Router<S>, settings: Arc<SecurityHeadersSettings>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    nonce::apply(security_headers::apply(router, settings))
}
