//! Normalizer configuration
//!
//! Every field has a default, so an empty document (or no document at all)
//! yields the standard behavior.

use serde::{Deserialize, Serialize};

use crate::types::TypeMode;

/// Compiler-generated dispatch wrapper for public functions
pub const PUBLIC_DISPATCH: &str = "public_dispatch";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Functions removed from the canonical artifact, matched by exact name
    pub excluded_functions: Vec<String>,
    /// Treatment of unknown type kinds when sizing or filling parameters
    pub type_mode: TypeMode,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            excluded_functions: vec![PUBLIC_DISPATCH.to_string()],
            type_mode: TypeMode::Lenient,
        }
    }
}

impl NormalizerConfig {
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_functions.iter().any(|n| n == name)
    }

    pub fn strict(mut self) -> Self {
        self.type_mode = TypeMode::Strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_excludes_dispatch_wrapper_only() {
        let config = NormalizerConfig::default();
        assert!(config.is_excluded("public_dispatch"));
        assert!(!config.is_excluded("public_dispatch_v2"));
        assert!(!config.is_excluded("transfer"));
        assert_eq!(config.type_mode, TypeMode::Lenient);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: NormalizerConfig = serde_json::from_str(r#"{"type_mode": "strict"}"#).unwrap();
        assert_eq!(config.type_mode, TypeMode::Strict);
        assert_eq!(config.excluded_functions, vec![PUBLIC_DISPATCH.to_string()]);
    }

    #[test]
    fn test_strict_builder() {
        assert_eq!(NormalizerConfig::default().strict().type_mode, TypeMode::Strict);
    }
}
