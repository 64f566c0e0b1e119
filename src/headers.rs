//! Header names and the tri-state header values.
//!
//! Every header kind has exactly one `NoHeader` variant meaning "do not emit
//! this header at all". All other variants map to the literal value written
//! on the wire.
//!
//! Parsing accepts the wire value or its snake_case spelling, case-insensitively
//! (`same_origin`, `same-origin` and `SAME_ORIGIN` are the same token). The
//! deprecated `none` spelling of "no header" is folded into `NoHeader` for the
//! kinds that used to carry it.

use std::fmt;
use std::str::FromStr;

use axum::http::HeaderName;
use axum::http::header;

use crate::error::ParseHeaderValueError;

pub const X_FRAME_OPTIONS: HeaderName = header::X_FRAME_OPTIONS;
pub const X_CONTENT_TYPE_OPTIONS: HeaderName = header::X_CONTENT_TYPE_OPTIONS;
pub const CONTENT_SECURITY_POLICY: HeaderName = header::CONTENT_SECURITY_POLICY;
pub const REFERRER_POLICY: HeaderName = header::REFERRER_POLICY;
pub const PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");
pub const X_PERMITTED_CROSS_DOMAIN_POLICIES: HeaderName =
    HeaderName::from_static("x-permitted-cross-domain-policies");
pub const CLEAR_SITE_DATA: HeaderName = HeaderName::from_static("clear-site-data");
pub const CROSS_ORIGIN_EMBEDDER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-embedder-policy");
pub const CROSS_ORIGIN_OPENER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy");
pub const CROSS_ORIGIN_RESOURCE_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-resource-policy");

fn normalize_token(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('_', "-")
}

macro_rules! header_value_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $variant:ident => $value:literal, )+
        }
        legacy_none_is_no_header = $legacy:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            NoHeader,
            $( $variant, )+
        }

        impl $name {
            /// Value written on the wire, `None` when the header is omitted.
            pub fn header_value(&self) -> Option<&'static str> {
                match self {
                    Self::NoHeader => None,
                    $( Self::$variant => Some($value), )+
                }
            }

            pub fn is_no_header(&self) -> bool {
                matches!(self, Self::NoHeader)
            }
        }

        impl FromStr for $name {
            type Err = ParseHeaderValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let token = normalize_token(s);
                if token == "no-header" || ($legacy && token == "none") {
                    return Ok(Self::NoHeader);
                }
                $(
                    if token == $value {
                        return Ok(Self::$variant);
                    }
                )+
                Err(ParseHeaderValueError {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.header_value().unwrap_or("no_header"))
            }
        }
    };
}

header_value_enum! {
    /// `X-Frame-Options`
    XFrameOption("X-Frame-Options") {
        Deny => "deny",
        SameOrigin => "sameorigin",
    }
    legacy_none_is_no_header = true
}

header_value_enum! {
    /// `X-Content-Type-Options`
    XContentTypeOptions("X-Content-Type-Options") {
        NoSniff => "nosniff",
    }
    legacy_none_is_no_header = true
}

header_value_enum! {
    /// `X-Permitted-Cross-Domain-Policies`
    ///
    /// Here `None` is a real value: the header is sent with `none`.
    XPermittedCrossDomainPolicies("X-Permitted-Cross-Domain-Policies") {
        None => "none",
        MasterOnly => "master-only",
        ByContentType => "by-content-type",
        ByFtpFilename => "by-ftp-filename",
        All => "all",
    }
    legacy_none_is_no_header = false
}

header_value_enum! {
    /// `Referrer-Policy`
    ReferrerPolicy("Referrer-Policy") {
        NoReferrer => "no-referrer",
        NoReferrerWhenDowngrade => "no-referrer-when-downgrade",
        Origin => "origin",
        OriginWhenCrossOrigin => "origin-when-cross-origin",
        SameOrigin => "same-origin",
        StrictOrigin => "strict-origin",
        StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
        UnsafeUrl => "unsafe-url",
    }
    legacy_none_is_no_header = true
}

header_value_enum! {
    /// `Cross-Origin-Embedder-Policy`
    CrossOriginEmbedderPolicy("Cross-Origin-Embedder-Policy") {
        UnsafeNone => "unsafe-none",
        RequireCorp => "require-corp",
    }
    legacy_none_is_no_header = true
}

header_value_enum! {
    /// `Cross-Origin-Opener-Policy`
    CrossOriginOpenerPolicy("Cross-Origin-Opener-Policy") {
        UnsafeNone => "unsafe-none",
        SameOriginAllowPopups => "same-origin-allow-popups",
        SameOrigin => "same-origin",
    }
    legacy_none_is_no_header = true
}

header_value_enum! {
    /// `Cross-Origin-Resource-Policy`
    CrossOriginResourcePolicy("Cross-Origin-Resource-Policy") {
        SameSite => "same-site",
        SameOrigin => "same-origin",
        CrossOrigin => "cross-origin",
    }
    legacy_none_is_no_header = true
}
