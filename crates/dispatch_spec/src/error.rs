use crate::decl::ApiFamily;

/// Build-time errors. All of them are fixed by correcting the input registry or policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
	#[error("duplicate function declaration: {name}")]
	DuplicateFunction { name: String },

	#[error("{name} is declared as an alias of unknown function {target}")]
	DanglingAlias { name: String, target: String },

	#[error("alias chain starting at {name} loops back on itself")]
	AliasCycle { name: String },

	/// A root that already has dependents was declared as an alias.
	#[error("{name} already has {dependents} alias(es) and cannot become an alias of {target}")]
	TransitiveAlias {
		name: String,
		target: String,
		dependents: usize,
	},

	#[error("{name} is already an alias of {existing}")]
	AlreadyAliased { name: String, existing: String },

	#[error("{requirement} requires undeclared function {name}")]
	UnknownFunction { requirement: String, name: String },

	#[error("feature {feature}: unknown API {api:?}")]
	UnknownApi { feature: String, api: String },

	#[error("feature {feature}: invalid version number {number:?}")]
	InvalidVersion { feature: String, number: String },

	#[error("bootstrap function {name} is not declared")]
	UnknownBootstrap { name: String },

	#[error("invalid configuration: {0}")]
	Config(String),
}

/// Environment detection could not establish the facts provider conditions depend on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{family} autoinit failed: {reason}")]
pub struct AutoinitError {
	pub family: ApiFamily,
	pub reason: String,
}

impl AutoinitError {
	pub fn new(family: ApiFamily, reason: impl Into<String>) -> Self {
		Self {
			family,
			reason: reason.into(),
		}
	}
}
