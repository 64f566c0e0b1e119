//! Three-layer settings resolution: defaults, then configuration, then code.
//!
//! Configuration only overrides what it names. The policy sub-objects (CSP,
//! Permissions-Policy, Clear-Site-Data) are rebuilt from their subsection when
//! that subsection exists and left at their defaults otherwise.

use std::str::FromStr;

use tracing::debug;

use crate::clear_site_data::ClearSiteData;
use crate::config_tree::{ConfigSection, ConfigTree};
use crate::error::{ConfigError, ParseHeaderValueError};
use crate::policy::{ContentSecurityPolicyBuilder, PermissionPolicyBuilder};

use super::SecurityHeadersSettings;

/// Section read when the caller does not name one.
pub const DEFAULT_SECTION: &str = "SecurityHeaders";

impl SecurityHeadersSettings {
    /// Defaults adjusted by `configure`.
    pub fn from_fn<F>(configure: F) -> Self
    where
        F: FnOnce(&mut SecurityHeadersSettings),
    {
        let mut settings = Self::default();
        configure(&mut settings);
        settings
    }

    /// Defaults overlaid with `section` of `tree`. A missing section yields
    /// the defaults.
    pub fn from_config(tree: &ConfigTree, section: &str) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        match tree.section(section) {
            Some(s) => settings.bind(&s, section)?,
            None => debug!(section, "security headers section not found, using defaults"),
        }
        Ok(settings)
    }

    /// Defaults, then configuration, then `configure` as the last word.
    pub fn from_config_with<F>(
        tree: &ConfigTree,
        section: &str,
        configure: F,
    ) -> Result<Self, ConfigError>
    where
        F: FnOnce(&mut SecurityHeadersSettings),
    {
        let mut settings = Self::from_config(tree, section)?;
        configure(&mut settings);
        Ok(settings)
    }

    fn bind(&mut self, section: &ConfigSection<'_>, name: &str) -> Result<(), ConfigError> {
        bind_parsed(section, name, "XFrameOption", &mut self.x_frame_option)?;
        bind_parsed(
            section,
            name,
            "XContentTypeOptions",
            &mut self.x_content_type_options,
        )?;
        bind_parsed(
            section,
            name,
            "XPermittedCrossDomainPolicies",
            &mut self.x_permitted_cross_domain_policies,
        )?;
        bind_parsed(section, name, "ReferrerPolicy", &mut self.referrer_policy)?;
        bind_parsed(
            section,
            name,
            "CrossOriginEmbedderPolicy",
            &mut self.cross_origin_embedder_policy,
        )?;
        bind_parsed(
            section,
            name,
            "CrossOriginOpenerPolicy",
            &mut self.cross_origin_opener_policy,
        )?;
        bind_parsed(
            section,
            name,
            "CrossOriginResourcePolicy",
            &mut self.cross_origin_resource_policy,
        )?;

        bind_bool(
            section,
            name,
            "UseContentSecurityPolicy",
            &mut self.use_content_security_policy,
        )?;
        bind_bool(section, name, "UsePermissionPolicy", &mut self.use_permission_policy)?;
        bind_bool(section, name, "UseClearSiteData", &mut self.use_clear_site_data)?;

        if let Some(urls) = section
            .field("ContentSecurityPolicyIgnoreUrls")
            .and_then(|s| s.as_string_array())
        {
            self.content_security_policy_ignore_urls = urls;
        }

        if let Some(csp) = section.field("ContentSecurityPolicy") {
            debug!(section = name, "content security policy read from configuration");
            self.content_security_policy = Some(
                ContentSecurityPolicyBuilder::new()
                    .read_from_section(&csp)
                    .build(),
            );
        }

        if let Some(pp) = section.field("PermissionPolicy") {
            debug!(section = name, "permission policy read from configuration");
            self.permission_policy = Some(PermissionPolicyBuilder::new().read_from_section(&pp).build());
        }

        if let Some(csd) = section.field("ClearSiteData") {
            if let Some(data) = ClearSiteData::from_config(&csd) {
                debug!(section = name, value = %data, "clear-site-data read from configuration");
                self.clear_site_data = Some(data);
            }
        }

        Ok(())
    }
}

fn bind_parsed<T>(
    section: &ConfigSection<'_>,
    section_name: &str,
    field: &str,
    target: &mut T,
) -> Result<(), ConfigError>
where
    T: FromStr<Err = ParseHeaderValueError>,
{
    let Some(raw) = section.field(field).and_then(|s| s.as_string()) else {
        return Ok(());
    };
    *target = raw
        .parse()
        .map_err(|_| ConfigError::invalid(format!("{section_name}:{field}"), raw.as_str()))?;
    Ok(())
}

fn bind_bool(
    section: &ConfigSection<'_>,
    section_name: &str,
    field: &str,
    target: &mut bool,
) -> Result<(), ConfigError> {
    let Some(raw) = section.field(field).and_then(|s| s.as_string()) else {
        return Ok(());
    };
    *target = match raw.trim().to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        _ => return Err(ConfigError::invalid(format!("{section_name}:{field}"), raw)),
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::{
        CrossOriginEmbedderPolicy, CrossOriginOpenerPolicy, CrossOriginResourcePolicy,
        ReferrerPolicy, XContentTypeOptions, XFrameOption, XPermittedCrossDomainPolicies,
    };
    use crate::settings::DEFAULT_CONTENT_SECURITY_POLICY;
    use serde_json::json;

    fn overridden_pairs(section: &str) -> ConfigTree {
        ConfigTree::from_pairs([
            (format!("{section}:XFrameOption"), "sameorigin"),
            (format!("{section}:XContentTypeOptions"), "no_header"),
            (format!("{section}:XPermittedCrossDomainPolicies"), "all"),
            (format!("{section}:ReferrerPolicy"), "strict_origin"),
            (format!("{section}:ClearSiteData:0"), "*"),
            (format!("{section}:CrossOriginEmbedderPolicy"), "unsafe_none"),
            (format!("{section}:CrossOriginOpenerPolicy"), "unsafe_none"),
            (format!("{section}:CrossOriginResourcePolicy"), "cross_origin"),
            (format!("{section}:ContentSecurityPolicyIgnoreUrls:0"), "index.html"),
        ])
    }

    fn assert_overrides_applied(s: &SecurityHeadersSettings) {
        assert_eq!(s.x_frame_option, XFrameOption::SameOrigin);
        assert_eq!(s.x_content_type_options, XContentTypeOptions::NoHeader);
        assert_eq!(
            s.x_permitted_cross_domain_policies,
            XPermittedCrossDomainPolicies::All
        );
        assert_eq!(s.referrer_policy, ReferrerPolicy::StrictOrigin);
        assert_eq!(
            s.clear_site_data.as_ref().map(ToString::to_string).as_deref(),
            Some("\"*\"")
        );
        assert_eq!(
            s.cross_origin_embedder_policy,
            CrossOriginEmbedderPolicy::UnsafeNone
        );
        assert_eq!(s.cross_origin_opener_policy, CrossOriginOpenerPolicy::UnsafeNone);
        assert_eq!(
            s.cross_origin_resource_policy,
            CrossOriginResourcePolicy::CrossOrigin
        );
        assert_eq!(s.content_security_policy_ignore_urls, ["index.html"]);
    }

    #[test]
    fn closure_configures_settings() {
        let settings = SecurityHeadersSettings::from_fn(|s| {
            s.x_frame_option = XFrameOption::SameOrigin;
            s.x_content_type_options = XContentTypeOptions::NoHeader;
            s.x_permitted_cross_domain_policies = XPermittedCrossDomainPolicies::All;
            s.referrer_policy = ReferrerPolicy::StrictOrigin;
            s.clear_site_data = Some(ClearSiteData::from_values(["*"]));
            s.cross_origin_embedder_policy = CrossOriginEmbedderPolicy::UnsafeNone;
            s.cross_origin_opener_policy = CrossOriginOpenerPolicy::UnsafeNone;
            s.cross_origin_resource_policy = CrossOriginResourcePolicy::CrossOrigin;
            s.content_security_policy_ignore_urls = vec!["index.html".into()];
        });

        assert_overrides_applied(&settings);
    }

    #[test]
    fn configuration_overrides_defaults() {
        let tree = overridden_pairs("SecurityHeaders");
        let settings = SecurityHeadersSettings::from_config(&tree, DEFAULT_SECTION).unwrap();

        assert_overrides_applied(&settings);
        // Subsections that are absent keep their defaults.
        assert_eq!(
            settings.content_security_policy.unwrap().policy_string(),
            DEFAULT_CONTENT_SECURITY_POLICY
        );
        assert!(settings.permission_policy.is_some());
    }

    #[test]
    fn wrong_section_name_yields_defaults() {
        let tree = overridden_pairs("WrongSectionName");
        let settings = SecurityHeadersSettings::from_config(&tree, DEFAULT_SECTION).unwrap();

        assert_eq!(settings.x_frame_option, XFrameOption::Deny);
        assert_eq!(settings.referrer_policy, ReferrerPolicy::NoReferrer);
        assert_eq!(
            settings.clear_site_data.unwrap().to_string(),
            "\"cache\",\"cookies\",\"storage\""
        );
        assert!(settings.content_security_policy_ignore_urls.is_empty());
    }

    #[test]
    fn code_callback_wins_over_configuration() {
        let tree = ConfigTree::from_pairs([("SecurityHeaders:XFrameOption", "sameorigin")]);
        let settings = SecurityHeadersSettings::from_config_with(&tree, DEFAULT_SECTION, |s| {
            s.x_frame_option = XFrameOption::Deny;
        })
        .unwrap();

        assert_eq!(settings.x_frame_option, XFrameOption::Deny);
    }

    #[test]
    fn policy_subsections_replace_defaults() {
        let tree = ConfigTree::new(json!({
            "SecurityHeaders": {
                "ContentSecurityPolicy": {
                    "default-src": ["'self'"],
                    "script-src": ["'self'", "'nonce'"]
                },
                "PermissionPolicy": {
                    "camera": [],
                    "geolocation": ["self"]
                },
                "UseClearSiteData": false
            }
        }));

        let settings = SecurityHeadersSettings::from_config(&tree, DEFAULT_SECTION).unwrap();

        assert_eq!(
            settings.content_security_policy.unwrap().policy_string(),
            "default-src 'self'; script-src 'self' 'nonce';"
        );
        assert_eq!(
            settings.permission_policy.unwrap().policy_string(),
            "camera=(), geolocation=(self)"
        );
        assert!(!settings.use_clear_site_data);
        assert!(settings.clear_site_data.is_some());
    }

    #[test]
    fn clear_site_data_subsection_replaces_only_when_non_empty() {
        let tree = ConfigTree::new(json!({
            "SecurityHeaders": { "ClearSiteData": [""] }
        }));
        let settings = SecurityHeadersSettings::from_config(&tree, DEFAULT_SECTION).unwrap();
        // The list is not empty, so it replaces the default even though every
        // token is filtered out.
        assert!(settings.clear_site_data.unwrap().is_empty());

        let tree = ConfigTree::new(json!({
            "SecurityHeaders": { "ClearSiteData": [], "XFrameOption": "deny" }
        }));
        let settings = SecurityHeadersSettings::from_config(&tree, DEFAULT_SECTION).unwrap();
        assert_eq!(
            settings.clear_site_data.unwrap().to_string(),
            "\"cache\",\"cookies\",\"storage\""
        );
    }

    #[test]
    fn snake_case_keys_and_legacy_none_are_accepted() {
        let tree = ConfigTree::new(json!({
            "security_headers": {
                "x_frame_option": "none",
                "referrer_policy": "same-origin",
                "use_permission_policy": "FALSE"
            }
        }));
        let settings = SecurityHeadersSettings::from_config(&tree, "security_headers").unwrap();

        assert_eq!(settings.x_frame_option, XFrameOption::NoHeader);
        assert_eq!(settings.referrer_policy, ReferrerPolicy::SameOrigin);
        assert!(!settings.use_permission_policy);
    }

    #[test]
    fn invalid_values_are_reported() {
        let tree = ConfigTree::from_pairs([("SecurityHeaders:XFrameOption", "allow-from")]);
        let err = SecurityHeadersSettings::from_config(&tree, DEFAULT_SECTION).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { ref key, ref value }
                if key == "SecurityHeaders:XFrameOption" && value == "allow-from"
        ));

        let tree = ConfigTree::from_pairs([("SecurityHeaders:UseClearSiteData", "yes")]);
        assert!(SecurityHeadersSettings::from_config(&tree, DEFAULT_SECTION).is_err());
    }
}
