//! Declarations handed over by the registry parser.
//!
//! These are plain data with no cross-links: alias names stay strings until
//! [`crate::AliasForest::reduce`] runs.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// One typed parameter of a function signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
	pub ty: String,
	pub name: String,
}

/// Return type plus ordered parameters.
///
/// Opaque to the dispatch engine; only emitters of call-through code read it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signature {
	pub ret_type: String,
	#[serde(default)]
	pub params: Vec<Param>,
}

impl Signature {
	pub fn new(ret_type: impl Into<String>) -> Self {
		Self {
			ret_type: ret_type.into(),
			params: Vec::new(),
		}
	}

	/// Appends a parameter.
	pub fn param(mut self, ty: impl Into<String>, name: impl Into<String>) -> Self {
		self.params.push(Param {
			ty: ty.into(),
			name: name.into(),
		});
		self
	}

	pub fn returns_void(&self) -> bool {
		self.ret_type.trim() == "void"
	}

	/// Parameter declaration list, `void` when there are no parameters.
	pub fn args_decl(&self) -> String {
		if self.params.is_empty() {
			return "void".to_string();
		}
		self.params
			.iter()
			.map(|p| format!("{} {}", p.ty, p.name))
			.collect::<Vec<_>>()
			.join(", ")
	}

	/// Argument pass-through list for call-through bodies.
	pub fn args_list(&self) -> String {
		self.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
	}

	/// Returns true if any parameter type contains `fragment`.
	pub fn mentions_type(&self, fragment: &str) -> bool {
		self.params.iter().any(|p| p.ty.contains(fragment))
	}
}

/// A declared function with its raw, unresolved alias target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
	pub name: String,
	#[serde(flatten)]
	pub signature: Signature,
	#[serde(default)]
	pub alias: Option<String>,
}

impl FunctionDecl {
	pub fn new(name: impl Into<String>, signature: Signature) -> Self {
		Self {
			name: name.into(),
			signature,
			alias: None,
		}
	}

	/// Marks this declaration as an alias of `target`.
	pub fn alias_of(mut self, target: impl Into<String>) -> Self {
		self.alias = Some(target.into());
		self
	}

	/// Name of the function-pointer type emitted for this function.
	pub fn ptr_type(&self) -> String {
		format!("PFN{}", self.name.to_uppercase())
	}

	pub fn family(&self) -> ApiFamily {
		ApiFamily::for_function(&self.name)
	}
}

/// A versioned API feature (`gl 4.3`, `gles2 2.0`, `glx 1.4`, ...) and the commands it requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDecl {
	pub api: String,
	pub number: String,
	#[serde(default)]
	pub commands: Vec<String>,
}

impl FeatureDecl {
	pub fn new(api: impl Into<String>, number: impl Into<String>) -> Self {
		Self {
			api: api.into(),
			number: number.into(),
			commands: Vec::new(),
		}
	}

	pub fn require(mut self, command: impl Into<String>) -> Self {
		self.commands.push(command.into());
		self
	}

	pub fn label(&self) -> String {
		format!("{} {}", self.api, self.number)
	}
}

/// An extension, the `|`-separated API set it supports, and the commands it requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDecl {
	pub name: String,
	pub supported: String,
	#[serde(default)]
	pub commands: Vec<String>,
}

impl ExtensionDecl {
	pub fn new(name: impl Into<String>, supported: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			supported: supported.into(),
			commands: Vec::new(),
		}
	}

	pub fn require(mut self, command: impl Into<String>) -> Self {
		self.commands.push(command.into());
		self
	}

	pub fn supports(&self, api: &str) -> bool {
		self.supported.split('|').any(|s| s == api)
	}
}

/// Everything the registry parser produces for one registry file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryDecl {
	pub functions: Vec<FunctionDecl>,
	pub features: Vec<FeatureDecl>,
	pub extensions: Vec<ExtensionDecl>,
}

impl RegistryDecl {
	pub fn from_json(text: &str) -> Result<Self, ConfigurationError> {
		serde_json::from_str(text).map_err(|e| ConfigurationError::Config(e.to_string()))
	}
}

/// Which autoinit gate a function's resolution goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiFamily {
	/// Core GL and GLES entry points.
	Gl,
	/// Window-system binding entry points (`glX*`).
	Glx,
}

impl ApiFamily {
	pub fn for_function(name: &str) -> Self {
		if name.starts_with("glX") { Self::Glx } else { Self::Gl }
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Gl => "gl",
			Self::Glx => "glx",
		}
	}
}

impl std::fmt::Display for ApiFamily {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
