//! Destination-URL interpolation.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("token pattern"));

/// Substitutes parameter tokens in destination URLs.
///
/// Substitution happens after mapping normalization and before line assembly;
/// the renderer consults the interpolator only when the definition's
/// `interpolate` flag is set.
pub trait Interpolator {
    fn interpolate(&self, input: &str) -> String;
}

/// Leaves destinations untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Interpolator for Verbatim {
    fn interpolate(&self, input: &str) -> String {
        input.to_string()
    }
}

/// Replaces `${name}` tokens from a fixed variable map.
///
/// Tokens without a binding are left in place.
#[derive(Debug, Clone, Default)]
pub struct MapInterpolator {
    vars: HashMap<String, String>,
}

impl MapInterpolator {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// Add or replace a variable binding.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl Interpolator for MapInterpolator {
    fn interpolate(&self, input: &str) -> String {
        TOKEN
            .replace_all(input, |caps: &Captures<'_>| match self.vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbatim_passes_through() {
        assert_eq!(
            Verbatim.interpolate("http://${backend}:8080/"),
            "http://${backend}:8080/"
        );
    }

    #[test]
    fn test_map_interpolator_substitutes_bound_tokens() {
        let mut interpolator = MapInterpolator::default();
        interpolator.set("backend", "app01");
        interpolator.set("backend_port", "9000");

        assert_eq!(
            interpolator.interpolate("http://${backend}:${backend_port}/"),
            "http://app01:9000/"
        );
    }

    #[test]
    fn test_unbound_tokens_are_preserved() {
        let interpolator = MapInterpolator::default();
        assert_eq!(
            interpolator.interpolate("http://${missing}/"),
            "http://${missing}/"
        );
    }

    #[test]
    fn test_non_token_dollar_signs_untouched() {
        let mut interpolator = MapInterpolator::default();
        interpolator.set("x", "y");
        assert_eq!(interpolator.interpolate("http://host/$1"), "http://host/$1");
        assert_eq!(interpolator.interpolate("http://host/${}"), "http://host/${}");
    }
}
