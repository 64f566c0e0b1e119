//! Per-request header evaluation, independent of the HTTP framework.
//!
//! `evaluate` decides which of the ten headers apply to a request and with
//! which value; `PendingHeaders::apply` writes them to a sink without
//! replacing headers that are already there.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, trace, warn};

use crate::headers;
use crate::nonce::NonceProvider;
use crate::policy::NONCE_PLACEHOLDER;
use crate::settings::SecurityHeadersSettings;

/// Response header sink with "add if absent" semantics.
pub trait HeaderSink {
    /// Adds the header unless one with the same name exists. Returns whether
    /// it was added.
    fn add_if_absent(&mut self, name: HeaderName, value: HeaderValue) -> bool;
}

impl HeaderSink for HeaderMap {
    fn add_if_absent(&mut self, name: HeaderName, value: HeaderValue) -> bool {
        if self.contains_key(&name) {
            return false;
        }
        self.insert(name, value);
        true
    }
}

/// Headers computed for one request, waiting for the response.
#[derive(Debug, Clone, Default)]
pub struct PendingHeaders {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl PendingHeaders {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn get(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.headers.iter().map(|(n, v)| (n, v))
    }

    pub fn apply<S: HeaderSink + ?Sized>(self, sink: &mut S) {
        for (name, value) in self.headers {
            if sink.add_if_absent(name.clone(), value) {
                trace!(header = %name, "security header added");
            } else {
                debug!(header = %name, "security header already present, left untouched");
            }
        }
    }

    fn push(&mut self, name: HeaderName, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(v) => self.headers.push((name, v)),
            Err(err) => warn!(
                header = %name,
                value,
                error = %err,
                "invalid security header value, header skipped"
            ),
        }
    }

    fn push_static(&mut self, name: HeaderName, value: Option<&'static str>) {
        if let Some(value) = value {
            self.headers.push((name, HeaderValue::from_static(value)));
        }
    }
}

/// Evaluates all header rules for a request to `path`.
///
/// The nonce provider is only consulted when a CSP header is actually emitted.
pub fn evaluate(
    settings: &SecurityHeadersSettings,
    path: &str,
    nonce: Option<&dyn NonceProvider>,
) -> PendingHeaders {
    let mut pending = PendingHeaders::default();

    pending.push_static(headers::X_FRAME_OPTIONS, settings.x_frame_option.header_value());
    pending.push_static(
        headers::X_CONTENT_TYPE_OPTIONS,
        settings.x_content_type_options.header_value(),
    );

    if let Some(csp) = content_security_policy(settings, path, nonce) {
        pending.push(headers::CONTENT_SECURITY_POLICY, &csp);
    }

    if settings.use_permission_policy {
        if let Some(policy) = &settings.permission_policy {
            pending.push(headers::PERMISSIONS_POLICY, policy.policy_string());
        }
    }

    pending.push_static(
        headers::X_PERMITTED_CROSS_DOMAIN_POLICIES,
        settings.x_permitted_cross_domain_policies.header_value(),
    );
    pending.push_static(headers::REFERRER_POLICY, settings.referrer_policy.header_value());

    if settings.use_clear_site_data {
        if let Some(data) = &settings.clear_site_data {
            pending.push(headers::CLEAR_SITE_DATA, &data.to_string());
        }
    }

    pending.push_static(
        headers::CROSS_ORIGIN_EMBEDDER_POLICY,
        settings.cross_origin_embedder_policy.header_value(),
    );
    pending.push_static(
        headers::CROSS_ORIGIN_OPENER_POLICY,
        settings.cross_origin_opener_policy.header_value(),
    );
    pending.push_static(
        headers::CROSS_ORIGIN_RESOURCE_POLICY,
        settings.cross_origin_resource_policy.header_value(),
    );

    pending
}

fn content_security_policy(
    settings: &SecurityHeadersSettings,
    path: &str,
    nonce: Option<&dyn NonceProvider>,
) -> Option<String> {
    if !settings.use_content_security_policy {
        return None;
    }
    let policy = settings.content_security_policy.as_ref()?;

    if settings.is_csp_exempt(path) {
        debug!(path, "path exempt from content security policy");
        return None;
    }

    let value = policy.policy_string();
    Some(match nonce {
        Some(provider) => value.replace(
            NONCE_PLACEHOLDER,
            &format!("'nonce-{}'", provider.request_nonce()),
        ),
        None => value.to_string(),
    })
}
