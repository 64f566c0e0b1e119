//! Policy directive model shared by Content-Security-Policy and Permissions-Policy.
//!
//! Responsibility:
//! - Keep an ordered map of uniquely named directives (add-or-get)
//! - Render the full header value once and cache it
//! - Fall back to a literal, pre-formatted value when no directive was added
//!
//! A `Policy` is assembled by a builder and read-only afterwards: the only
//! mutating entry point (`entry`) is crate-private and used by the builders.

/// Declares an immutable policy header type and its builder over [`Policy`]:
/// literal seeding, add-or-configure directives, configuration reading and an
/// `add_<directive>` helper per well-known directive name.
macro_rules! policy_builder {
    (
        $(#[$policy_doc:meta])*
        policy $policy:ident;
        builder $builder:ident;
        kind $kind:ident;
        helpers {
            $( $(#[$doc:meta])* $method:ident => $name:literal, )+
        }
    ) => {
        $(#[$policy_doc])*
        #[derive(Debug, Clone)]
        pub struct $policy($crate::policy::Policy);

        impl $policy {
            pub fn builder() -> $builder {
                $builder::new()
            }

            /// Header value, rendered on first use.
            pub fn policy_string(&self) -> &str {
                self.0.policy_string()
            }

            pub fn directive(&self, name: &str) -> Option<&$crate::policy::Directive> {
                self.0.directive(name)
            }

            pub fn as_policy(&self) -> &$crate::policy::Policy {
                &self.0
            }
        }

        #[derive(Debug)]
        pub struct $builder {
            policy: $crate::policy::Policy,
        }

        impl Default for $builder {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $builder {
            pub fn new() -> Self {
                Self {
                    policy: $crate::policy::Policy::new($crate::policy::DirectiveKind::$kind),
                }
            }

            /// Seeds the builder with an already formatted policy. The literal is
            /// emitted verbatim unless a directive is added afterwards.
            pub fn with_literal(literal: impl Into<String>) -> Self {
                Self {
                    policy: $crate::policy::Policy::with_literal(
                        $crate::policy::DirectiveKind::$kind,
                        literal,
                    ),
                }
            }

            /// Configures the directive `name`, creating it if it does not exist yet.
            pub fn directive<F>(mut self, name: &str, configure: F) -> Self
            where
                F: for<'a> FnOnce(
                    &'a mut $crate::policy::Directive,
                ) -> &'a mut $crate::policy::Directive,
            {
                configure(self.policy.entry(name));
                self
            }

            pub fn add_directive<I, S>(mut self, name: &str, sources: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.policy.add_sources(name, sources);
                self
            }

            /// Reads directives from `section` of `tree`: every child key is a
            /// directive name, its string array the allowed sources.
            pub fn read_from_config(
                self,
                tree: &$crate::config_tree::ConfigTree,
                section: &str,
            ) -> Self {
                match tree.section(section) {
                    Some(s) => self.read_from_section(&s),
                    None => self,
                }
            }

            pub fn read_from_section(
                mut self,
                section: &$crate::config_tree::ConfigSection<'_>,
            ) -> Self {
                self.policy.read_from_config(section);
                self
            }

            pub fn build(self) -> $policy {
                $policy(self.policy)
            }

            $(
                $(#[$doc])*
                pub fn $method<F>(self, configure: F) -> Self
                where
                    F: for<'a> FnOnce(
                        &'a mut $crate::policy::Directive,
                    ) -> &'a mut $crate::policy::Directive,
                {
                    self.directive($name, configure)
                }
            )+
        }
    };
}

mod csp;
mod directive;
mod permissions;

use std::sync::OnceLock;

pub use csp::{ContentSecurityPolicy, ContentSecurityPolicyBuilder};
pub use directive::{Directive, DirectiveKind, NONCE_PLACEHOLDER};
pub use permissions::{PermissionPolicy, PermissionPolicyBuilder};

use crate::config_tree::ConfigSection;

#[derive(Debug, Clone)]
pub struct Policy {
    kind: DirectiveKind,
    directives: Vec<Directive>,
    literal: Option<String>,
    rendered: OnceLock<String>,
}

impl Policy {
    pub(crate) fn new(kind: DirectiveKind) -> Self {
        Self {
            kind,
            directives: Vec::new(),
            literal: None,
            rendered: OnceLock::new(),
        }
    }

    pub(crate) fn with_literal(kind: DirectiveKind, literal: impl Into<String>) -> Self {
        Self {
            literal: Some(literal.into()),
            ..Self::new(kind)
        }
    }

    pub fn kind(&self) -> DirectiveKind {
        self.kind
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name() == name)
    }

    /// Returns the directive named `name`, creating it first if needed.
    pub(crate) fn entry(&mut self, name: &str) -> &mut Directive {
        let idx = match self.directives.iter().position(|d| d.name() == name) {
            Some(idx) => idx,
            None => {
                self.directives.push(Directive::new(name, self.kind));
                self.directives.len() - 1
            }
        };
        &mut self.directives[idx]
    }

    /// Full header value. Computed on first call.
    pub fn policy_string(&self) -> &str {
        self.rendered.get_or_init(|| {
            if self.directives.is_empty() {
                if let Some(literal) = &self.literal {
                    return literal.clone();
                }
            }
            self.render()
        })
    }

    fn render(&self) -> String {
        match self.kind {
            DirectiveKind::Content => self
                .directives
                .iter()
                .map(ToString::to_string)
                .collect::<String>()
                .trim()
                .to_string(),
            DirectiveKind::Permission => self
                .directives
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
                .trim()
                .to_string(),
        }
    }

    /// Adds `sources` to the directive `name`, creating it first if needed.
    pub(crate) fn add_sources<I, S>(&mut self, name: &str, sources: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let directive = self.entry(name);
        for source in sources {
            directive.add_source(source);
        }
    }

    /// Adds one directive per child key of `section`, using the child's string
    /// array as the directive's sources.
    pub(crate) fn read_from_config(&mut self, section: &ConfigSection<'_>) {
        for child in section.children() {
            self.add_sources(child.key(), child.as_string_array().unwrap_or_default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_returns_existing_directive() {
        let mut policy = Policy::new(DirectiveKind::Content);
        policy.entry("default-src").allow_self();
        policy.entry("default-src").add_source("https:");

        assert_eq!(policy.directives().len(), 1);
        assert_eq!(policy.policy_string(), "default-src 'self' https:;");
    }

    #[test]
    fn literal_is_used_until_a_directive_is_added() {
        let policy = Policy::with_literal(DirectiveKind::Content, "default-src 'none'");
        assert_eq!(policy.policy_string(), "default-src 'none'");

        let mut policy = Policy::with_literal(DirectiveKind::Content, "default-src 'none'");
        policy.entry("img-src").allow_self();
        assert_eq!(policy.policy_string(), "img-src 'self';");
    }

    #[test]
    fn permission_directives_are_comma_joined() {
        let mut policy = Policy::new(DirectiveKind::Permission);
        policy.entry("camera");
        policy.entry("sync-xhr").allow_self();
        assert_eq!(policy.policy_string(), "camera=(), sync-xhr=(self)");
    }

    #[test]
    fn empty_policy_renders_empty_string() {
        assert_eq!(Policy::new(DirectiveKind::Content).policy_string(), "");
        assert_eq!(Policy::new(DirectiveKind::Permission).policy_string(), "");
    }
}
