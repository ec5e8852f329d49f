//! Bootstrap override.
//!
//! The environment queries behind provider conditions are themselves dispatched
//! functions. Resolving them through their declared providers would require
//! evaluating those same queries first, so they are pinned to one unconditional
//! direct-symbol provider.

use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalSet;
use crate::error::ConfigurationError;
use crate::provider::Provider;

/// Version and extension string queries, plus the entry point the platform ABI
/// guarantees as a public symbol.
pub const DEFAULT_BOOTSTRAP_FUNCTIONS: &[&str] = &["glGetString", "glGetIntegerv", "glXGetProcAddress"];

/// Which functions are bootstrap primitives, and how strictly to check them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapPolicy {
	pub functions: Vec<String>,
	/// Fail when a listed function is not declared. Off by default because one list
	/// is shared by registries that each declare only some of the primitives.
	pub require_declared: bool,
}

impl Default for BootstrapPolicy {
	fn default() -> Self {
		Self {
			functions: DEFAULT_BOOTSTRAP_FUNCTIONS.iter().map(|s| s.to_string()).collect(),
			require_declared: false,
		}
	}
}

impl BootstrapPolicy {
	/// A policy that rejects undeclared names.
	pub fn strict<I, S>(functions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			functions: functions.into_iter().map(Into::into).collect(),
			require_declared: true,
		}
	}

	pub fn contains(&self, name: &str) -> bool {
		self.functions.iter().any(|f| f == name)
	}
}

impl CanonicalSet {
	/// Replaces the provider list of every bootstrap function's group.
	///
	/// Must run after alias reduction and merging: it is the only step that discards
	/// an already merged list, and it covers a bootstrap primitive declared as an alias.
	pub(crate) fn apply_bootstrap(&mut self, policy: &BootstrapPolicy) -> Result<(), ConfigurationError> {
		for name in &policy.functions {
			let Some(&idx) = self.by_name.get(name.as_str()) else {
				if policy.require_declared {
					return Err(ConfigurationError::UnknownBootstrap { name: name.clone() });
				}
				tracing::debug!(function = %name, "bootstrap.undeclared");
				continue;
			};

			let record = &mut self.records[idx];
			let provider = Provider::always_present(record.name.clone());
			record.providers = vec![provider.clone()];
			let slot = record.slot;
			self.groups[slot.as_usize()].providers = vec![provider];
			tracing::trace!(function = %name, slot = slot.as_u32(), "bootstrap.override");
		}
		Ok(())
	}
}
