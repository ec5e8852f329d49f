//! Translation of feature and extension statements into provider templates.
//!
//! A template is a provider with its loader symbol left open; each command a
//! statement requires instantiates it with the command's own name.

use std::sync::Arc;

use crate::decl::{ExtensionDecl, FeatureDecl};
use crate::error::ConfigurationError;
use crate::provider::{Condition, Loader, LoaderKind, Provider};

/// Highest desktop GL version whose entry points are exported directly by the ABI.
const GL_DLSYM_MAX: u32 = 12;
/// Highest GLES version whose entry points are exported directly.
const GLES_DLSYM_MAX: u32 = 20;
/// Highest GLX version whose entry points are exported directly.
const GLX_DLSYM_MAX: u32 = 13;

/// `(condition, loader kind, description)` shared by every command of one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTemplate {
	pub condition: Condition,
	pub loader: LoaderKind,
	pub description: Arc<str>,
}

impl ProviderTemplate {
	pub fn instantiate(&self, symbol: &str) -> Provider {
		Provider {
			condition: self.condition.clone(),
			loader: Loader {
				kind: self.loader,
				symbol: Arc::from(symbol),
			},
			description: self.description.clone(),
		}
	}
}

/// Parses a `major.minor` feature number into `major * 10 + minor`.
pub fn parse_version(feature: &FeatureDecl) -> Result<u32, ConfigurationError> {
	let invalid = || ConfigurationError::InvalidVersion {
		feature: feature.label(),
		number: feature.number.clone(),
	};
	let (major, minor) = feature.number.split_once('.').ok_or_else(invalid)?;
	let major: u32 = major.parse().map_err(|_| invalid())?;
	let minor: u32 = minor.parse().map_err(|_| invalid())?;
	if minor > 9 {
		return Err(invalid());
	}
	Ok(major * 10 + minor)
}

fn loader_for(version: u32, dlsym_max: u32) -> LoaderKind {
	if version <= dlsym_max { LoaderKind::Dlsym } else { LoaderKind::GetProcAddress }
}

/// Builds the template for a versioned feature.
pub fn feature_template(feature: &FeatureDecl) -> Result<ProviderTemplate, ConfigurationError> {
	let version = parse_version(feature)?;
	let number = &feature.number;

	let (condition, loader, description) = match feature.api.as_str() {
		"gl" => {
			let min_version = (version > GL_DLSYM_MAX).then_some(version);
			(
				Condition::DesktopGl { min_version },
				loader_for(version, GL_DLSYM_MAX),
				format!("Desktop OpenGL {number}"),
			)
		}
		"gles2" => (
			Condition::GlesVersion { min: version },
			loader_for(version, GLES_DLSYM_MAX),
			format!("OpenGL ES {number}"),
		),
		"gles1" => (
			Condition::GlesExact { version: 10 },
			loader_for(version, GLES_DLSYM_MAX),
			"OpenGL ES 1.0".to_string(),
		),
		"glx" => (
			Condition::GlxVersion { min: version },
			loader_for(version, GLX_DLSYM_MAX),
			format!("GLX {number}"),
		),
		api => {
			return Err(ConfigurationError::UnknownApi {
				feature: feature.label(),
				api: api.to_string(),
			});
		}
	};

	Ok(ProviderTemplate {
		condition,
		loader,
		description: description.into(),
	})
}

/// Builds the templates for an extension: GLX first, then GL, for whichever it supports.
pub fn extension_templates(extension: &ExtensionDecl) -> Vec<ProviderTemplate> {
	let name: Arc<str> = Arc::from(extension.name.as_str());
	let mut templates = Vec::with_capacity(2);

	if extension.supports("glx") {
		templates.push(ProviderTemplate {
			condition: Condition::GlxExtension(name.clone()),
			loader: LoaderKind::GetProcAddress,
			description: format!("GLX extension \"{name}\"").into(),
		});
	}
	if extension.supports("gl") {
		templates.push(ProviderTemplate {
			condition: Condition::GlExtension(name.clone()),
			loader: LoaderKind::GetProcAddress,
			description: format!("GL extension \"{name}\"").into(),
		});
	}

	templates
}
