//! Apache reverse-proxy vhost fragment generation.
//!
//! This library renders the proxy directive block for one named proxy
//! definition on one virtual host: it validates the caller's mapping inputs,
//! infers which Apache proxy modules the destinations require, and emits
//! deterministic directive text registered under a caller-supplied ordering
//! key. It can be used as a standalone library or through the
//! `vhostforge-proxy` CLI binary.
//!
//! # Example
//!
//! ```
//! use vhostforge_proxy::{evaluate, FragmentStore, LoadedModules, Verbatim, VhostProxyParams};
//!
//! let params: VhostProxyParams = serde_yaml::from_str(
//!     r#"
//! name: myproxy
//! vhost: default
//! port: 80
//! priority: 15
//! proxy_pass:
//!   - path: /
//!     url: http://localhost:8080/
//! "#,
//! )
//! .unwrap();
//!
//! let mut fragments = FragmentStore::new();
//! let mut modules = LoadedModules::new();
//! let fragment = evaluate(&params, &Verbatim, &mut fragments, &mut modules).unwrap();
//!
//! assert_eq!(fragment.target_file, "15-default-80.conf");
//! assert!(modules.contains("proxy_http"));
//! ```

mod definition;
mod error;
mod interpolate;
mod params;
mod render;
mod scheme;
mod sink;

// Re-export public types
pub use definition::{MatchKind, ProxyDefinition, ProxyMapping};
pub use error::{EngineError, ValidationError};
pub use interpolate::{Interpolator, MapInterpolator, Verbatim};
pub use params::{PathMapping, VhostProxyParams};
pub use render::{render_body, PROXY_FRAGMENT_ORDER};
pub use scheme::{required_modules, ApacheModule, Scheme};
pub use sink::{FragmentSink, FragmentStore, LoadedModules, ModuleSink, RenderedFragment};

use std::collections::BTreeSet;

/// Validate and render one proxy definition without touching any sink.
///
/// Returns the fragment together with the set of modules its destinations
/// require. Useful when the caller wants to inspect the result before
/// registering it.
pub fn render_definition(
    params: &VhostProxyParams,
    interpolator: &dyn Interpolator,
) -> Result<(RenderedFragment, BTreeSet<ApacheModule>), ValidationError> {
    let definition = params.validate()?;
    let modules = required_modules(&definition);
    let fragment = RenderedFragment {
        name: params.fragment_name(),
        target_file: params.target_file(),
        order: params.order,
        body: render_body(&definition, interpolator),
    };

    tracing::debug!(
        fragment = %fragment.name,
        target = %fragment.target_file,
        order = fragment.order,
        mappings = definition.mappings.len(),
        "rendered proxy fragment"
    );

    Ok((fragment, modules))
}

/// Evaluate one proxy definition end to end.
///
/// Validates, renders, then registers every required module followed by the
/// fragment itself. A failed validation performs no sink call at all, so
/// partial output is impossible. Sink failures are fatal.
pub fn evaluate(
    params: &VhostProxyParams,
    interpolator: &dyn Interpolator,
    fragments: &mut dyn FragmentSink,
    modules: &mut dyn ModuleSink,
) -> Result<RenderedFragment, EngineError> {
    let (fragment, required) = render_definition(params, interpolator)?;

    for module in &required {
        modules
            .require(module.as_str())
            .map_err(|source| EngineError::ModuleSink {
                module: module.as_str().to_string(),
                source,
            })?;
    }

    fragments
        .submit(&fragment)
        .map_err(|source| EngineError::FragmentSink {
            target: fragment.target_file.clone(),
            source,
        })?;

    Ok(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_params(extra: &str) -> VhostProxyParams {
        let yaml = format!(
            r#"
name: myproxy
vhost: default
port: 80
priority: 15
{extra}"#
        );
        serde_yaml::from_str(&yaml).unwrap()
    }

    #[test]
    fn test_evaluate_canonical_proxy_pass() {
        let params = make_params(
            r#"proxy_pass:
  - path: /
    url: http://localhost:8080/
"#,
        );

        let mut fragments = FragmentStore::new();
        let mut modules = LoadedModules::new();
        let fragment = evaluate(&params, &Verbatim, &mut fragments, &mut modules).unwrap();

        assert_eq!(fragment.name, "default-myproxy-proxy");
        assert_eq!(fragment.target_file, "15-default-80.conf");
        assert_eq!(fragment.order, 170);
        let expected = concat!(
            "\n",
            "  ## Proxy rules\n",
            "  ProxyRequests Off\n",
            "  ProxyPreserveHost Off\n",
            "  ProxyPass / http://localhost:8080/\n",
            "  ProxyPassReverse / http://localhost:8080/\n",
        );
        assert_eq!(fragment.body, expected);

        assert_eq!(modules.iter().collect::<Vec<_>>(), vec!["proxy", "proxy_http"]);
        assert_eq!(fragments.fragments().len(), 1);
        assert_eq!(fragments.fragments()[0], fragment);
    }

    #[test]
    fn test_failed_validation_touches_no_sink() {
        let params = make_params("");

        let mut fragments = FragmentStore::new();
        let mut modules = LoadedModules::new();
        let err = evaluate(&params, &Verbatim, &mut fragments, &mut modules).unwrap_err();

        assert!(err.to_string().starts_with("At least one of"));
        assert!(fragments.is_empty());
        assert!(modules.is_empty());
    }

    #[test]
    fn test_h2_requires_http2_module_via_every_shape() {
        let shapes = [
            "proxy_dest: h2://localhost:8080/\n",
            "proxy_dest_match: h2://localhost:8080/\n",
            "proxy_pass:\n  - path: /\n    url: h2://localhost:8080/\n",
            "proxy_pass_match:\n  - path: /\n    url: h2://localhost:8080/\n",
        ];

        for shape in shapes {
            let params = make_params(shape);
            let (_, required) = render_definition(&params, &Verbatim).unwrap();
            assert!(
                required.contains(&ApacheModule::ProxyHttp2),
                "shape: {shape}"
            );
            assert!(required.contains(&ApacheModule::Proxy));
            assert!(required.contains(&ApacheModule::ProxyHttp));
        }
    }

    #[test]
    fn test_plain_http_never_requires_http2_module() {
        let params = make_params("proxy_dest: http://localhost:8080/\n");
        let (_, required) = render_definition(&params, &Verbatim).unwrap();
        assert!(!required.contains(&ApacheModule::ProxyHttp2));
    }

    #[test]
    fn test_pattern_list_renders_match_pair() {
        let params = make_params("proxy_pass_match:\n  - path: /\n    url: h2://localhost:8080/\n");
        let (fragment, _) = render_definition(&params, &Verbatim).unwrap();

        assert!(fragment.body.contains("  ProxyPassMatch / h2://localhost:8080/\n"));
        assert!(fragment.body.contains("  ProxyPassReverseMatch / h2://localhost:8080/\n"));
    }

    #[test]
    fn test_evaluate_with_interpolation() {
        let mut interpolator = MapInterpolator::default();
        interpolator.set("backend", "app01");

        let params = make_params(
            r#"interpolate: true
proxy_pass:
  - path: /
    url: http://${backend}:8080/
"#,
        );

        let mut fragments = FragmentStore::new();
        let mut modules = LoadedModules::new();
        let fragment = evaluate(&params, &interpolator, &mut fragments, &mut modules).unwrap();

        assert!(fragment.body.contains("  ProxyPass / http://app01:8080/\n"));
    }

    #[test]
    fn test_assembled_vhost_contains_fragment_in_order() {
        let params = make_params("proxy_dest: http://localhost:8080/\n");

        let mut fragments = FragmentStore::new();
        let mut modules = LoadedModules::new();
        fragments
            .submit(&RenderedFragment {
                name: "default-header".to_string(),
                target_file: "15-default-80.conf".to_string(),
                order: 0,
                body: "<VirtualHost *:80>\n".to_string(),
            })
            .unwrap();
        evaluate(&params, &Verbatim, &mut fragments, &mut modules).unwrap();

        let assembled = fragments.assemble("15-default-80.conf");
        assert!(assembled.starts_with("<VirtualHost *:80>\n"));
        assert!(assembled.contains("  ## Proxy rules\n"));
    }

    #[test]
    fn test_fragment_sink_failure_is_fatal() {
        struct RejectingSink;

        impl FragmentSink for RejectingSink {
            fn submit(&mut self, _fragment: &RenderedFragment) -> anyhow::Result<()> {
                anyhow::bail!("target file is sealed")
            }
        }

        let params = make_params("proxy_dest: http://localhost:8080/\n");
        let mut modules = LoadedModules::new();
        let err = evaluate(&params, &Verbatim, &mut RejectingSink, &mut modules).unwrap_err();

        match err {
            EngineError::FragmentSink { target, .. } => {
                assert_eq!(target, "15-default-80.conf");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
