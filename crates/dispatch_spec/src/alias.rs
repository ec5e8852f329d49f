//! Alias-graph reduction.
//!
//! # Role
//!
//! Collapses the forest of raw alias names into links that point straight at a root.
//! Nodes are addressed by declaration index; every ordering this module produces
//! follows declaration order, never hash-map iteration.
//!
//! # Invariants
//!
//! - After [`AliasForest::reduce`], every linked node's target has no link of its own.
//! - A root's `aliased_by` lists each transitive member exactly once, in declaration order.
//! - A node with dependents can never become an alias (transitivity is rejected).

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::ConfigurationError;

#[derive(Debug, Clone, Default)]
struct Node {
	/// Raw alias name from the declaration; rewritten to the root name once linked.
	raw_alias: Option<Arc<str>>,
	alias_of: Option<usize>,
	aliased_by: Vec<usize>,
}

/// Alias links between declared functions.
#[derive(Debug, Clone, Default)]
pub struct AliasForest {
	names: Vec<Arc<str>>,
	index: FxHashMap<Arc<str>, usize>,
	nodes: Vec<Node>,
}

impl AliasForest {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Materializes a function and its raw alias name without linking anything.
	///
	/// Returns the node's declaration index.
	pub fn declare(&mut self, name: &str, raw_alias: Option<&str>) -> Result<usize, ConfigurationError> {
		if self.index.contains_key(name) {
			return Err(ConfigurationError::DuplicateFunction { name: name.to_string() });
		}
		let idx = self.nodes.len();
		let name: Arc<str> = Arc::from(name);
		self.names.push(name.clone());
		self.index.insert(name, idx);
		self.nodes.push(Node {
			raw_alias: raw_alias.map(Arc::from),
			..Node::default()
		});
		Ok(idx)
	}

	/// Links every declared alias directly to its root.
	///
	/// Every pending link is computed and checked before any is written, so a failed
	/// reduce leaves the forest untouched.
	pub fn reduce(&mut self) -> Result<(), ConfigurationError> {
		let mut pending = Vec::new();
		for idx in 0..self.nodes.len() {
			if self.nodes[idx].raw_alias.is_some() && self.nodes[idx].alias_of.is_none() {
				let root = self.check_link(idx, self.find_root(idx)?)?;
				pending.push((idx, root));
			}
		}

		for (idx, root) in pending {
			self.write_link(idx, root);
			tracing::trace!(alias = %self.names[idx], root = %self.names[root], "alias.link");
		}
		Ok(())
	}

	/// Declares `alias` as an alias of `target` after declaration time.
	///
	/// A target that is itself an alias is flattened to its root.
	pub fn link(&mut self, alias: &str, target: &str) -> Result<(), ConfigurationError> {
		let alias_idx = self.lookup(alias).ok_or_else(|| ConfigurationError::UnknownFunction {
			requirement: format!("alias link to {target}"),
			name: alias.to_string(),
		})?;
		let target_idx = self.lookup(target).ok_or_else(|| ConfigurationError::DanglingAlias {
			name: alias.to_string(),
			target: target.to_string(),
		})?;
		self.link_index(alias_idx, target_idx)
	}

	fn link_index(&mut self, alias: usize, target: usize) -> Result<(), ConfigurationError> {
		let root = self.check_link(alias, target)?;
		self.write_link(alias, root);
		Ok(())
	}

	/// Validates linking `alias` under `target` and returns the root it will point at.
	///
	/// Pending links in one reduce never invalidate each other: only roots gain
	/// dependents, and roots are never pending.
	fn check_link(&self, alias: usize, target: usize) -> Result<usize, ConfigurationError> {
		let dependents = self.nodes[alias].aliased_by.len();
		if dependents > 0 {
			return Err(ConfigurationError::TransitiveAlias {
				name: self.names[alias].to_string(),
				target: self.names[target].to_string(),
				dependents,
			});
		}
		if let Some(existing) = self.nodes[alias].alias_of {
			return Err(ConfigurationError::AlreadyAliased {
				name: self.names[alias].to_string(),
				existing: self.names[existing].to_string(),
			});
		}

		let root = self.nodes[target].alias_of.unwrap_or(target);
		if root == alias {
			return Err(ConfigurationError::AliasCycle {
				name: self.names[alias].to_string(),
			});
		}
		Ok(root)
	}

	fn write_link(&mut self, alias: usize, root: usize) {
		let node = &mut self.nodes[alias];
		node.alias_of = Some(root);
		node.raw_alias = Some(self.names[root].clone());
		self.nodes[root].aliased_by.push(alias);
	}

	/// Follows raw alias names until a node without one.
	fn find_root(&self, start: usize) -> Result<usize, ConfigurationError> {
		let mut current = start;
		let mut hops = 0;
		while let Some(target) = &self.nodes[current].raw_alias {
			current = self.lookup(target).ok_or_else(|| ConfigurationError::DanglingAlias {
				name: self.names[current].to_string(),
				target: target.to_string(),
			})?;
			hops += 1;
			if hops > self.nodes.len() {
				return Err(ConfigurationError::AliasCycle {
					name: self.names[start].to_string(),
				});
			}
		}
		Ok(current)
	}

	pub fn lookup(&self, name: &str) -> Option<usize> {
		self.index.get(name).copied()
	}

	pub fn name(&self, idx: usize) -> &str {
		&self.names[idx]
	}

	pub fn alias_of(&self, idx: usize) -> Option<usize> {
		self.nodes[idx].alias_of
	}

	/// Aliases registered against `idx`, in discovery order.
	pub fn aliased_by(&self, idx: usize) -> &[usize] {
		&self.nodes[idx].aliased_by
	}

	/// Current alias name of `idx`: the raw declared name before reduction, the root after.
	pub fn alias_name(&self, idx: usize) -> Option<&str> {
		self.nodes[idx].raw_alias.as_deref()
	}

	pub fn is_root(&self, idx: usize) -> bool {
		self.nodes[idx].raw_alias.is_none()
	}

	/// Returns the root of `idx`, which is `idx` itself for roots.
	pub fn root_of(&self, idx: usize) -> usize {
		self.nodes[idx].alias_of.unwrap_or(idx)
	}
}

#[cfg(test)]
mod tests;
