//! Generator configuration.

use serde::{Deserialize, Serialize};

use crate::bootstrap::BootstrapPolicy;
use crate::decl::Signature;
use crate::error::ConfigurationError;

/// Policy inputs that are not derived from the registry itself.
///
/// ```toml
/// dropped_param_types = ["VLServer", "DMparams"]
///
/// [bootstrap]
/// functions = ["glGetString", "glGetIntegerv"]
/// require_declared = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
	pub bootstrap: BootstrapPolicy,
	/// Functions with a parameter type containing any of these are dropped before
	/// reduction; their types are not defined by any header the output can include.
	pub dropped_param_types: Vec<String>,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			bootstrap: BootstrapPolicy::default(),
			dropped_param_types: vec!["VLServer".to_string(), "DMparams".to_string()],
		}
	}
}

impl GeneratorConfig {
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
		toml::from_str(text).map_err(|e| ConfigurationError::Config(e.to_string()))
	}

	pub fn with_bootstrap(mut self, bootstrap: BootstrapPolicy) -> Self {
		self.bootstrap = bootstrap;
		self
	}

	/// Returns true if a function with this signature is dropped.
	pub fn drops(&self, signature: &Signature) -> bool {
		self.dropped_param_types.iter().any(|t| signature.mentions_type(t))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_is_default() {
		assert_eq!(GeneratorConfig::from_toml_str("").unwrap(), GeneratorConfig::default());
	}

	#[test]
	fn partial_document_keeps_other_defaults() {
		let config = GeneratorConfig::from_toml_str(
			r#"
			[bootstrap]
			functions = ["glGetString"]
			require_declared = true
			"#,
		)
		.unwrap();
		assert_eq!(config.bootstrap, BootstrapPolicy::strict(["glGetString"]));
		assert_eq!(config.dropped_param_types, vec!["VLServer", "DMparams"]);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = GeneratorConfig::from_toml_str("bootstrap_functions = []").unwrap_err();
		assert!(matches!(err, ConfigurationError::Config(_)));
	}

	#[test]
	fn drops_matches_type_fragments() {
		let config = GeneratorConfig::default();
		let weird = Signature::new("int").param("VLServer", "svr").param("int", "n");
		let normal = Signature::new("void").param("GLenum", "mode");
		assert!(config.drops(&weird));
		assert!(!config.drops(&normal));
	}
}
