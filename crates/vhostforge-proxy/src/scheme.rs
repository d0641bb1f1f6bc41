//! Destination URL schemes and the Apache modules they require.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::definition::ProxyDefinition;

/// Protocol scheme of a proxy destination URL.
///
/// Only the schemes the engine knows about are enumerated. Anything else
/// resolves to `None` in [`Scheme::from_url`] and contributes no module
/// requirement beyond the defaults; an unknown scheme is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
    /// HTTP/2 over TLS.
    H2,
    /// HTTP/2 cleartext.
    H2c,
    Ajp,
    /// Local socket address (`unix:/path|scheme://host/`).
    Unix,
}

impl Scheme {
    /// Scheme token as it appears in a URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::H2 => "h2",
            Scheme::H2c => "h2c",
            Scheme::Ajp => "ajp",
            Scheme::Unix => "unix",
        }
    }

    /// Sniff the scheme of a destination URL.
    ///
    /// Takes the token before the first `:`, so socket addresses of the form
    /// `unix:/sock|http://host/` resolve to `unix`. Matching is
    /// case-insensitive; unknown tokens yield `None`.
    pub fn from_url(url: &str) -> Option<Scheme> {
        let token = url.split(':').next().unwrap_or_default();
        match token.to_ascii_lowercase().as_str() {
            "http" => Some(Scheme::Http),
            "https" => Some(Scheme::Https),
            "h2" => Some(Scheme::H2),
            "h2c" => Some(Scheme::H2c),
            "ajp" => Some(Scheme::Ajp),
            "unix" => Some(Scheme::Unix),
            _ => None,
        }
    }

    /// Module required on top of the defaults for this scheme.
    ///
    /// New scheme-to-module rules go here; call sites apply the lookup
    /// uniformly across every mapping shape.
    pub fn extra_module(&self) -> Option<ApacheModule> {
        match self {
            Scheme::H2 | Scheme::H2c => Some(ApacheModule::ProxyHttp2),
            _ => None,
        }
    }
}

/// Apache proxy modules the generated configuration depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApacheModule {
    Proxy,
    ProxyHttp,
    ProxyHttp2,
}

impl ApacheModule {
    /// Symbolic module name as registered with the module sink.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApacheModule::Proxy => "proxy",
            ApacheModule::ProxyHttp => "proxy_http",
            ApacheModule::ProxyHttp2 => "proxy_http2",
        }
    }
}

impl fmt::Display for ApacheModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modules required by the definition's destinations.
///
/// The base proxy modules are always present; per-scheme extras are unioned
/// across every mapping, bare destinations and listed mappings alike.
pub fn required_modules(definition: &ProxyDefinition) -> BTreeSet<ApacheModule> {
    let mut modules = BTreeSet::from([ApacheModule::Proxy, ApacheModule::ProxyHttp]);
    for mapping in &definition.mappings {
        if let Some(module) = Scheme::from_url(&mapping.url).and_then(|s| s.extra_module()) {
            modules.insert(module);
        }
    }
    modules
}
