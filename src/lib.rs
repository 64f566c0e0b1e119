//! Browser security response headers for axum/tower services.
//!
//! Builds X-Frame-Options, X-Content-Type-Options, Content-Security-Policy
//! (with a per-request nonce), Permissions-Policy, Clear-Site-Data,
//! Referrer-Policy, X-Permitted-Cross-Domain-Policies and the three
//! Cross-Origin-* headers from one [`SecurityHeadersSettings`] value, resolved
//! from defaults, configuration and code, and adds them to every response.
//!
//! ```ignore
//! let tree = ConfigTree::from_json_file("appsettings.json")?;
//! let settings = SecurityHeadersSettings::from_config_with(&tree, DEFAULT_SECTION, |s| {
//!     s.content_security_policy = Some(
//!         ContentSecurityPolicyBuilder::new()
//!             .add_default_src(|d| d.allow_self())
//!             .add_script_src(|d| d.allow_self().nonce())
//!             .build(),
//!     );
//! })?;
//! let app = middleware::apply(router, Arc::new(settings));
//! ```

pub mod applier;
pub mod clear_site_data;
pub mod config_tree;
pub mod error;
pub mod headers;
pub mod middleware;
pub mod nonce;
pub mod policy;
pub mod settings;

pub use applier::{HeaderSink, PendingHeaders, evaluate};
pub use clear_site_data::ClearSiteData;
pub use config_tree::{ConfigSection, ConfigTree};
pub use error::{ConfigError, NonceError, ParseHeaderValueError};
pub use nonce::{CspNonce, NonceProvider, NonceService, get_nonce, get_nonce_attribute};
pub use policy::{
    ContentSecurityPolicy, ContentSecurityPolicyBuilder, Directive, DirectiveKind,
    PermissionPolicy, PermissionPolicyBuilder, Policy,
};
pub use settings::{DEFAULT_SECTION, SecurityHeadersSettings};
