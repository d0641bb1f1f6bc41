//! Rendering of proxy definitions into Apache directive text.

use crate::definition::{MatchKind, ProxyDefinition};
use crate::interpolate::Interpolator;

/// Default position of the proxy section among the fragments assembled into
/// one vhost configuration file.
pub const PROXY_FRAGMENT_ORDER: u32 = 170;

fn on_off(value: bool) -> &'static str {
    if value {
        "On"
    } else {
        "Off"
    }
}

/// Render the directive block for one validated definition.
///
/// The layout is a stable contract relied on by fragment assembly: the block
/// opens with a blank line and the `## Proxy rules` comment, every directive
/// line is indented exactly two spaces, exclusions precede all pass/reverse
/// pairs, mappings render in definition order, and there is no trailing blank
/// line. Rendering cannot fail once validation has succeeded.
pub fn render_body(definition: &ProxyDefinition, interpolator: &dyn Interpolator) -> String {
    let mut body = String::from("\n  ## Proxy rules\n");
    body.push_str(&format!(
        "  ProxyRequests {}\n",
        on_off(definition.proxy_requests)
    ));
    body.push_str(&format!(
        "  ProxyPreserveHost {}\n",
        on_off(definition.preserve_host)
    ));

    // Exclusions are registered before the generic passes they short-circuit;
    // Apache evaluates ProxyPass directives first match wins.
    for uri in &definition.no_proxy_uris {
        body.push_str(&format!("  ProxyPass {uri} !\n"));
    }

    for mapping in &definition.mappings {
        let url = if definition.interpolate {
            interpolator.interpolate(&mapping.url)
        } else {
            mapping.url.clone()
        };
        match mapping.kind {
            MatchKind::Exact => {
                body.push_str(&format!("  ProxyPass {} {}\n", mapping.path, url));
                body.push_str(&format!("  ProxyPassReverse {} {}\n", mapping.path, url));
            }
            MatchKind::Pattern => {
                body.push_str(&format!("  ProxyPassMatch {} {}\n", mapping.path, url));
                body.push_str(&format!(
                    "  ProxyPassReverseMatch {} {}\n",
                    mapping.path, url
                ));
            }
        }
    }

    body
}
