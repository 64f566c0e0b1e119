//! Security-related response headers for browser clients.
//!
//! This middleware is intended to be applied at the Router level
//! (not inside individual handlers).
//!
//! Responsibility:
//! - Evaluate the header rules against the request path and nonce
//! - Forward the request unconditionally
//! - Add the evaluated headers to the response unless the handler already set them

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::Router;
use axum::http::{Request, Response};
use tower::{Layer, Service};

use crate::applier;
use crate::nonce::{NonceProvider, NonceService};
use crate::settings::SecurityHeadersSettings;

/// Apply the security headers middleware to all routes of `router`.
pub fn apply<S>(router: Router<S>, settings: Arc<SecurityHeadersSettings>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(SecurityHeadersLayer::new(settings))
}

#[derive(Clone, Debug)]
pub struct SecurityHeadersLayer {
    settings: Arc<SecurityHeadersSettings>,
}

impl SecurityHeadersLayer {
    pub fn new(settings: Arc<SecurityHeadersSettings>) -> Self {
        Self { settings }
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersService {
            inner,
            settings: Arc::clone(&self.settings),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SecurityHeadersService<S> {
    inner: S,
    settings: Arc<SecurityHeadersSettings>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for SecurityHeadersService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + 'static,
    S::Future: Send + 'static,
    S::Error: 'static,
    ReqBody: 'static,
    ResBody: 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // Everything is evaluated before the request moves on.
        let nonce = req.extensions().get::<NonceService>();
        let pending = applier::evaluate(
            &self.settings,
            req.uri().path(),
            nonce.map(|n| n as &dyn NonceProvider),
        );

        let future = self.inner.call(req);

        Box::pin(async move {
            let mut response = future.await?;
            pending.apply(response.headers_mut());
            Ok(response)
        })
    }
}
