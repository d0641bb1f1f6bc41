//! Caller-facing parameters for one named proxy definition.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::render::PROXY_FRAGMENT_ORDER;

/// One path-to-URL mapping as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathMapping {
    pub path: String,
    pub url: String,
}

/// Raw inputs for one reverse-proxy definition on one virtual host.
///
/// Mirrors the parameter surface of the `ProxyPass` directive family: up to
/// four combinable mapping sources plus static flags. At least one mapping
/// source must be set; everything else defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VhostProxyParams {
    /// Name of this proxy definition, used in the fragment identifier.
    pub name: String,
    /// Virtual host the fragment belongs to.
    pub vhost: String,
    /// Listening port of the virtual host (used in the target file name only).
    pub port: u16,
    /// Priority prefix of the vhost configuration file name.
    #[serde(default = "default_priority")]
    pub priority: u32,
    /// Position of the proxy section among all fragments of the vhost file.
    #[serde(default = "default_order")]
    pub order: u32,

    /// Destination URL proxying the whole vhost (`ProxyPass /`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_dest: Option<String>,
    /// Destination URL proxying the whole vhost with pattern matching
    /// (`ProxyPassMatch /`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_dest_match: Option<String>,
    /// Exact path mappings (`ProxyPass`/`ProxyPassReverse` pairs).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proxy_pass: Vec<PathMapping>,
    /// Pattern mappings (`ProxyPassMatch`/`ProxyPassReverseMatch` pairs).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proxy_pass_match: Vec<PathMapping>,

    /// Emit `ProxyRequests On` instead of the reverse-proxy default `Off`.
    #[serde(default)]
    pub proxy_requests: bool,
    /// Emit `ProxyPreserveHost On`.
    #[serde(default)]
    pub proxy_preserve_host: bool,
    /// URIs excluded from proxying (`ProxyPass <uri> !`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_proxy_uris: Vec<String>,
    /// Substitute `${name}` tokens in destination URLs before emission.
    #[serde(default)]
    pub interpolate: bool,
}

fn default_priority() -> u32 {
    25
}

fn default_order() -> u32 {
    PROXY_FRAGMENT_ORDER
}

impl VhostProxyParams {
    /// Name of the vhost configuration file this fragment is assembled into.
    pub fn target_file(&self) -> String {
        format!("{}-{}-{}.conf", self.priority, self.vhost, self.port)
    }

    /// Identifier of the fragment within the target file.
    pub fn fragment_name(&self) -> String {
        format!("{}-{}-proxy", self.vhost, self.name)
    }

    /// Load parameters from a YAML or JSON file, decided by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let params = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
        Ok(params)
    }
}
