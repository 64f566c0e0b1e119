/*
 * Responsibility
 * - The merged security header settings (one value per header kind)
 * - Hard-coded secure defaults (layer 1 of the resolution)
 * - Resolution from configuration and code lives in `resolve`
 *
 * Settings are built once and shared read-only (behind an Arc) by every
 * request. A reload builds a new value instead of mutating this one.
 */
mod resolve;

pub use resolve::DEFAULT_SECTION;

use crate::clear_site_data::ClearSiteData;
use crate::headers::{
    CrossOriginEmbedderPolicy, CrossOriginOpenerPolicy, CrossOriginResourcePolicy, ReferrerPolicy,
    XContentTypeOptions, XFrameOption, XPermittedCrossDomainPolicies,
};
use crate::policy::{
    ContentSecurityPolicy, ContentSecurityPolicyBuilder, PermissionPolicy, PermissionPolicyBuilder,
};

pub const DEFAULT_CONTENT_SECURITY_POLICY: &str = "default-src 'self'; object-src 'none'; child-src 'self'; frame-ancestors 'none'; upgrade-insecure-requests; block-all-mixed-content";

pub const DEFAULT_PERMISSION_POLICY: &str = "accelerometer=(),autoplay=(),camera=(),display-capture=(),document-domain=(),encrypted-media=(),fullscreen=(),geolocation=(),gyroscope=(),magnetometer=(),microphone=(),midi=(),payment=(),picture-in-picture=(),publickey-credentials-get=(),screen-wake-lock=(),sync-xhr=(self),usb=(),web-share=(),xr-spatial-tracking=()";

#[derive(Debug, Clone)]
pub struct SecurityHeadersSettings {
    pub x_frame_option: XFrameOption,
    pub x_content_type_options: XContentTypeOptions,
    pub use_content_security_policy: bool,
    pub content_security_policy: Option<ContentSecurityPolicy>,
    /// Path substrings (case-insensitive) for which no CSP header is sent.
    pub content_security_policy_ignore_urls: Vec<String>,
    pub use_permission_policy: bool,
    pub permission_policy: Option<PermissionPolicy>,
    pub x_permitted_cross_domain_policies: XPermittedCrossDomainPolicies,
    pub referrer_policy: ReferrerPolicy,
    pub use_clear_site_data: bool,
    pub clear_site_data: Option<ClearSiteData>,
    pub cross_origin_embedder_policy: CrossOriginEmbedderPolicy,
    pub cross_origin_opener_policy: CrossOriginOpenerPolicy,
    pub cross_origin_resource_policy: CrossOriginResourcePolicy,
}

impl Default for SecurityHeadersSettings {
    fn default() -> Self {
        Self {
            x_frame_option: XFrameOption::Deny,
            x_content_type_options: XContentTypeOptions::NoSniff,
            use_content_security_policy: true,
            content_security_policy: Some(
                ContentSecurityPolicyBuilder::with_literal(DEFAULT_CONTENT_SECURITY_POLICY).build(),
            ),
            content_security_policy_ignore_urls: Vec::new(),
            use_permission_policy: true,
            permission_policy: Some(
                PermissionPolicyBuilder::with_literal(DEFAULT_PERMISSION_POLICY).build(),
            ),
            x_permitted_cross_domain_policies: XPermittedCrossDomainPolicies::None,
            referrer_policy: ReferrerPolicy::NoReferrer,
            use_clear_site_data: true,
            clear_site_data: Some(
                ClearSiteData::new()
                    .clear_cache()
                    .clear_cookies()
                    .clear_storage(),
            ),
            cross_origin_embedder_policy: CrossOriginEmbedderPolicy::RequireCorp,
            cross_origin_opener_policy: CrossOriginOpenerPolicy::SameOrigin,
            cross_origin_resource_policy: CrossOriginResourcePolicy::SameOrigin,
        }
    }
}

impl SecurityHeadersSettings {
    /// Settings that emit no header at all.
    pub fn disabled() -> Self {
        Self {
            x_frame_option: XFrameOption::NoHeader,
            x_content_type_options: XContentTypeOptions::NoHeader,
            use_content_security_policy: false,
            content_security_policy: None,
            content_security_policy_ignore_urls: Vec::new(),
            use_permission_policy: false,
            permission_policy: None,
            x_permitted_cross_domain_policies: XPermittedCrossDomainPolicies::NoHeader,
            referrer_policy: ReferrerPolicy::NoHeader,
            use_clear_site_data: false,
            clear_site_data: None,
            cross_origin_embedder_policy: CrossOriginEmbedderPolicy::NoHeader,
            cross_origin_opener_policy: CrossOriginOpenerPolicy::NoHeader,
            cross_origin_resource_policy: CrossOriginResourcePolicy::NoHeader,
        }
    }

    /// True when `path` contains one of the CSP ignore entries, ignoring case.
    pub fn is_csp_exempt(&self, path: &str) -> bool {
        if self.content_security_policy_ignore_urls.is_empty() {
            return false;
        }
        let path = path.to_lowercase();
        self.content_security_policy_ignore_urls
            .iter()
            .filter(|url| !url.is_empty())
            .any(|url| path.contains(&url.to_lowercase()))
    }
}
