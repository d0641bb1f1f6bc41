//! Error types for proxy-definition evaluation.

use thiserror::Error;

/// Rejected proxy definition input.
///
/// Raised during validation only. Rendering cannot fail once a definition has
/// been validated, so a failed evaluation never produces partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// None of the four mapping sources was supplied.
    ///
    /// The "At least one of" prefix is relied on by existing callers.
    #[error(
        "At least one of proxy_dest, proxy_pass, proxy_pass_match or proxy_dest_match must be set"
    )]
    NoMappingSource,
}

/// Failure of a full evaluation, including sink contract violations.
///
/// Sink failures are fatal and never retried.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The module-requirement sink rejected a registration.
    #[error("module sink failed for '{module}'")]
    ModuleSink {
        module: String,
        #[source]
        source: anyhow::Error,
    },

    /// The fragment sink rejected the rendered fragment.
    #[error("fragment sink failed for '{target}'")]
    FragmentSink {
        target: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_mapping_source_message_contract() {
        let message = ValidationError::NoMappingSource.to_string();
        assert!(message.starts_with("At least one of"));
        assert!(message.contains("proxy_dest"));
        assert!(message.contains("proxy_pass_match"));
    }

    #[test]
    fn test_engine_error_wraps_validation() {
        let err = EngineError::from(ValidationError::NoMappingSource);
        assert!(err.to_string().starts_with("At least one of"));
    }
}
