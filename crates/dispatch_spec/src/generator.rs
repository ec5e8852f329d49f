//! Two-phase canonicalization pipeline.
//!
//! Declarations and requirements are collected first with no cross-links;
//! [`Generator::canonicalize`] then drops unusable functions, reduces aliases, merges
//! provider lists and applies the bootstrap override.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::alias::AliasForest;
use crate::canonical::{CanonicalGroup, CanonicalSet, FunctionRecord, SlotId};
use crate::config::GeneratorConfig;
use crate::decl::{ExtensionDecl, FeatureDecl, FunctionDecl, RegistryDecl};
use crate::error::ConfigurationError;
use crate::features::{ProviderTemplate, extension_templates, feature_template};
use crate::provider::Provider;

struct Entry {
	decl: FunctionDecl,
	providers: Vec<Provider>,
}

/// Collects declarations and requirements for one registry.
pub struct Generator {
	config: GeneratorConfig,
	entries: IndexMap<Arc<str>, Entry>,
}

impl Default for Generator {
	fn default() -> Self {
		Self::new(GeneratorConfig::default())
	}
}

impl Generator {
	pub fn new(config: GeneratorConfig) -> Self {
		Self {
			config,
			entries: IndexMap::new(),
		}
	}

	/// Declares every function of `registry`, then attaches feature and extension providers.
	pub fn from_registry(config: GeneratorConfig, registry: &RegistryDecl) -> Result<Self, ConfigurationError> {
		let mut generator = Self::new(config);
		generator.load(registry)?;
		Ok(generator)
	}

	pub fn config(&self) -> &GeneratorConfig {
		&self.config
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn load(&mut self, registry: &RegistryDecl) -> Result<(), ConfigurationError> {
		for decl in &registry.functions {
			self.declare(decl.clone())?;
		}
		for feature in &registry.features {
			self.require_feature(feature)?;
		}
		for extension in &registry.extensions {
			self.require_extension(extension)?;
		}
		Ok(())
	}

	pub fn declare(&mut self, decl: FunctionDecl) -> Result<(), ConfigurationError> {
		let name: Arc<str> = Arc::from(decl.name.as_str());
		if self.entries.contains_key(&name) {
			return Err(ConfigurationError::DuplicateFunction { name: decl.name });
		}
		self.entries.insert(
			name,
			Entry {
				decl,
				providers: Vec::new(),
			},
		);
		Ok(())
	}

	/// Attaches an explicit provider to a declared function.
	pub fn require(&mut self, function: &str, provider: Provider) -> Result<(), ConfigurationError> {
		let entry = self.entries.get_mut(function).ok_or_else(|| ConfigurationError::UnknownFunction {
			requirement: format!("provider {:?}", provider.description),
			name: function.to_string(),
		})?;
		entry.providers.push(provider);
		Ok(())
	}

	pub fn require_feature(&mut self, feature: &FeatureDecl) -> Result<(), ConfigurationError> {
		let template = feature_template(feature)?;
		self.require_all(&feature.label(), &template, &feature.commands)
	}

	pub fn require_extension(&mut self, extension: &ExtensionDecl) -> Result<(), ConfigurationError> {
		for template in extension_templates(extension) {
			self.require_all(&extension.name, &template, &extension.commands)?;
		}
		Ok(())
	}

	fn require_all(&mut self, requirement: &str, template: &ProviderTemplate, commands: &[String]) -> Result<(), ConfigurationError> {
		for command in commands {
			let entry = self.entries.get_mut(command.as_str()).ok_or_else(|| ConfigurationError::UnknownFunction {
				requirement: requirement.to_string(),
				name: command.clone(),
			})?;
			entry.providers.push(template.instantiate(command));
		}
		Ok(())
	}

	/// Runs the offline pass and returns the immutable result.
	pub fn canonicalize(self) -> Result<CanonicalSet, ConfigurationError> {
		let Self { config, entries } = self;

		let entries: Vec<Entry> = entries
			.into_values()
			.filter(|entry| {
				let dropped = config.drops(&entry.decl.signature);
				if dropped {
					tracing::debug!(function = %entry.decl.name, "canonicalize.drop");
				}
				!dropped
			})
			.collect();

		let mut forest = AliasForest::new();
		for entry in &entries {
			forest.declare(&entry.decl.name, entry.decl.alias.as_deref())?;
		}
		forest.reduce()?;

		// Slot of a root is the number of roots declared before it.
		let mut slot_index = Vec::with_capacity(entries.len());
		let mut groups = Vec::new();
		for (idx, entry) in entries.iter().enumerate() {
			slot_index.push(SlotId::from_index(groups.len()));
			if !forest.is_root(idx) {
				continue;
			}
			let aliases = forest.aliased_by(idx).to_vec();
			let mut providers = entry.providers.clone();
			for &alias in &aliases {
				providers.extend(entries[alias].providers.iter().cloned());
			}
			groups.push(CanonicalGroup {
				root: idx,
				aliases,
				providers,
				family: entry.decl.family(),
			});
		}

		let records = entries
			.into_iter()
			.enumerate()
			.map(|(idx, entry)| FunctionRecord {
				name: Arc::from(entry.decl.name.as_str()),
				family: entry.decl.family(),
				alias_of: forest.alias_of(idx).map(|root| Arc::from(forest.name(root))),
				slot: slot_index[forest.root_of(idx)],
				signature: entry.decl.signature,
				providers: entry.providers,
			})
			.collect();

		let mut set = CanonicalSet::from_parts(records, groups);
		set.apply_bootstrap(&config.bootstrap)?;

		tracing::debug!(functions = set.records().len(), groups = set.len(), "canonicalize.done");
		Ok(set)
	}
}

#[cfg(test)]
mod tests;
