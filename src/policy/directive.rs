use std::fmt;

/// Rendering grammar of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `name src1 src2; ` (Content-Security-Policy)
    Content,
    /// `name=(src1 "src2")` (Permissions-Policy)
    Permission,
}

/// One named clause of a policy header with its allowed sources.
///
/// Sources are deduplicated on insert and rendered in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    name: String,
    kind: DirectiveKind,
    sources: Vec<String>,
}

impl Directive {
    pub fn new(name: impl Into<String>, kind: DirectiveKind) -> Self {
        Self {
            name: name.into(),
            kind,
            sources: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DirectiveKind {
        self.kind
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Adds a source token. Adding a token twice is a no-op.
    pub fn add_source(&mut self, source: impl Into<String>) -> &mut Self {
        let source = source.into();
        if !self.sources.contains(&source) {
            self.sources.push(source);
        }
        self
    }

    /// `'self'` for content policies, `self` for permission policies.
    pub fn allow_self(&mut self) -> &mut Self {
        match self.kind {
            DirectiveKind::Content => self.add_source("'self'"),
            DirectiveKind::Permission => self.add_source("self"),
        }
    }

    // The keyword helpers below are Content-Security-Policy tokens; a
    // Permissions-Policy allowlist only knows `self` and quoted origins.

    pub fn allow_none(&mut self) -> &mut Self {
        self.content_source("'none'")
    }

    pub fn allow_all(&mut self) -> &mut Self {
        self.content_source("*")
    }

    pub fn unsafe_inline(&mut self) -> &mut Self {
        self.content_source("'unsafe-inline'")
    }

    pub fn unsafe_eval(&mut self) -> &mut Self {
        self.content_source("'unsafe-eval'")
    }

    /// Placeholder replaced with `'nonce-<value>'` when the header is emitted.
    pub fn nonce(&mut self) -> &mut Self {
        self.content_source(NONCE_PLACEHOLDER)
    }

    fn content_source(&mut self, token: &str) -> &mut Self {
        debug_assert_eq!(
            self.kind,
            DirectiveKind::Content,
            "{token} is a content-security-policy keyword, not valid on `{}`",
            self.name
        );
        self.add_source(token)
    }

    fn fmt_content(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sources.is_empty() {
            return f.write_str(self.name.trim());
        }

        f.write_str(&self.name)?;
        for source in self.sources.iter().filter(|s| !s.trim().is_empty()) {
            write!(f, " {source}")?;
        }
        f.write_str("; ")
    }

    fn fmt_permission(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=(", self.name)?;
        // The empty token is written bare; whitespace-only tokens are dropped.
        let sources = self
            .sources
            .iter()
            .filter(|s| s.is_empty() || !s.trim().is_empty());
        for (i, source) in sources.enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if source == "self" || source.is_empty() {
                f.write_str(source)?;
            } else {
                write!(f, "\"{source}\"")?;
            }
        }
        f.write_str(")")
    }
}

pub const NONCE_PLACEHOLDER: &str = "'nonce'";

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DirectiveKind::Content => self.fmt_content(f),
            DirectiveKind::Permission => self.fmt_permission(f),
        }
    }
}
