//! Request-scoped CSP nonce registration.
//!
//! Inserts a freshly generated `NonceService` into the extensions of every
//! request so the security headers middleware and handlers see the same value.
//! Must wrap the security headers middleware (see `middleware::apply`).

use axum::{Router, body::Body, http::Request, middleware, middleware::Next, response::Response};

use crate::nonce::NonceService;

pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn(nonce_middleware))
}

async fn nonce_middleware(mut req: Request<Body>, next: Next) -> Response {
    match NonceService::generate() {
        Ok(nonce) => {
            req.extensions_mut().insert(nonce);
        }
        Err(err) => {
            // The CSP header keeps its 'nonce' placeholder; handlers asking
            // for the nonce get NonceError::NotConfigured.
            tracing::warn!(error = %err, "csp nonce generation failed");
        }
    }

    next.run(req).await
}
