//! Validated proxy definitions.

use crate::error::ValidationError;
use crate::params::VhostProxyParams;

/// How a mapping's path is matched by Apache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Literal path prefix, rendered as `ProxyPass`/`ProxyPassReverse`.
    Exact,
    /// Regular-expression pattern, rendered as
    /// `ProxyPassMatch`/`ProxyPassReverseMatch`.
    Pattern,
}

/// One path-or-pattern to destination-URL mapping.
///
/// The URL is opaque to the engine: only its scheme token is ever inspected,
/// the address is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyMapping {
    pub path: String,
    pub url: String,
    pub kind: MatchKind,
}

/// A validated proxy definition: the normalized mapping list plus static
/// flags. Immutable after validation, discarded after rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyDefinition {
    pub mappings: Vec<ProxyMapping>,
    pub proxy_requests: bool,
    pub preserve_host: bool,
    pub no_proxy_uris: Vec<String>,
    pub interpolate: bool,
}

impl VhostProxyParams {
    /// Validate the raw parameters and normalize the four mapping sources
    /// into one ordered mapping list.
    ///
    /// Source concatenation order is fixed: `proxy_dest`, `proxy_dest_match`,
    /// `proxy_pass` entries, `proxy_pass_match` entries. Relative order
    /// within a list is preserved. Combining sources is allowed; only overall
    /// non-emptiness is required.
    pub fn validate(&self) -> Result<ProxyDefinition, ValidationError> {
        if self.proxy_dest.is_none()
            && self.proxy_dest_match.is_none()
            && self.proxy_pass.is_empty()
            && self.proxy_pass_match.is_empty()
        {
            return Err(ValidationError::NoMappingSource);
        }

        let mut mappings = Vec::new();

        if let Some(url) = &self.proxy_dest {
            mappings.push(ProxyMapping {
                path: "/".to_string(),
                url: url.clone(),
                kind: MatchKind::Exact,
            });
        }
        if let Some(url) = &self.proxy_dest_match {
            mappings.push(ProxyMapping {
                path: "/".to_string(),
                url: url.clone(),
                kind: MatchKind::Pattern,
            });
        }
        for entry in &self.proxy_pass {
            mappings.push(ProxyMapping {
                path: entry.path.clone(),
                url: entry.url.clone(),
                kind: MatchKind::Exact,
            });
        }
        for entry in &self.proxy_pass_match {
            mappings.push(ProxyMapping {
                path: entry.path.clone(),
                url: entry.url.clone(),
                kind: MatchKind::Pattern,
            });
        }

        Ok(ProxyDefinition {
            mappings,
            proxy_requests: self.proxy_requests,
            preserve_host: self.proxy_preserve_host,
            no_proxy_uris: self.no_proxy_uris.clone(),
            interpolate: self.interpolate,
        })
    }
}
