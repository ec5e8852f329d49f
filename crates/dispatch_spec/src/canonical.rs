//! Canonical dispatch groups produced by [`crate::Generator::canonicalize`].
//!
//! # Role
//!
//! Immutable output of the offline pass. Declaration emitters read the
//! [`FunctionRecord`]s; the runtime allocates one slot per [`CanonicalGroup`] and
//! resolves through the group's merged provider list.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::decl::{ApiFamily, Signature};
use crate::provider::Provider;

/// Dense index of a canonical group, and of its dispatch slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u32);

impl SlotId {
	pub const fn new(raw: u32) -> Self {
		Self(raw)
	}

	pub(crate) fn from_index(idx: usize) -> Self {
		debug_assert!(idx <= u32::MAX as usize);
		Self(idx as u32)
	}

	pub const fn as_u32(self) -> u32 {
		self.0
	}

	pub const fn as_usize(self) -> usize {
		self.0 as usize
	}
}

/// One declared function after reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionRecord {
	pub name: Arc<str>,
	pub signature: Signature,
	pub family: ApiFamily,
	/// Root this function delegates to; `None` for roots.
	pub alias_of: Option<Arc<str>>,
	/// Slot shared by the whole alias group.
	pub slot: SlotId,
	/// Providers this function's own requirements declared, before merging.
	pub providers: Vec<Provider>,
}

impl FunctionRecord {
	pub fn is_alias(&self) -> bool {
		self.alias_of.is_some()
	}

	pub fn ptr_type(&self) -> String {
		format!("PFN{}", self.name.to_uppercase())
	}
}

/// An alias root and everything that delegates to it.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalGroup {
	/// Record index of the root.
	pub root: usize,
	/// Record indices of the aliases, in discovery order.
	pub aliases: Vec<usize>,
	/// Root providers followed by each alias's providers. Order is significant.
	pub providers: Vec<Provider>,
	pub family: ApiFamily,
}

/// The complete, read-only result of canonicalization.
#[derive(Debug, Clone)]
pub struct CanonicalSet {
	pub(crate) records: Vec<FunctionRecord>,
	pub(crate) groups: Vec<CanonicalGroup>,
	pub(crate) by_name: FxHashMap<Arc<str>, usize>,
}

impl CanonicalSet {
	pub(crate) fn from_parts(records: Vec<FunctionRecord>, groups: Vec<CanonicalGroup>) -> Self {
		let by_name = records.iter().enumerate().map(|(idx, r)| (r.name.clone(), idx)).collect();
		Self { records, groups, by_name }
	}

	/// Number of canonical groups, which is the number of dispatch slots.
	pub fn len(&self) -> usize {
		self.groups.len()
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}

	pub fn slots(&self) -> impl Iterator<Item = SlotId> + '_ {
		(0..self.groups.len()).map(SlotId::from_index)
	}

	/// Returns the group behind `slot`.
	///
	/// # Panics
	///
	/// If `slot` did not come from this set.
	pub fn group(&self, slot: SlotId) -> &CanonicalGroup {
		&self.groups[slot.as_usize()]
	}

	pub fn get_group(&self, slot: SlotId) -> Option<&CanonicalGroup> {
		self.groups.get(slot.as_usize())
	}

	/// Root record of the group behind `slot`.
	pub fn root(&self, slot: SlotId) -> &FunctionRecord {
		&self.records[self.group(slot).root]
	}

	/// Merged, ordered provider list of the group behind `slot`.
	pub fn providers(&self, slot: SlotId) -> &[Provider] {
		&self.group(slot).providers
	}

	pub fn aliases(&self, slot: SlotId) -> impl Iterator<Item = &FunctionRecord> + '_ {
		self.group(slot).aliases.iter().map(|&idx| &self.records[idx])
	}

	/// All records in declaration order, roots and aliases alike.
	pub fn records(&self) -> &[FunctionRecord] {
		&self.records
	}

	pub fn record(&self, name: &str) -> Option<&FunctionRecord> {
		self.by_name.get(name).map(|&idx| &self.records[idx])
	}

	/// Slot used by `name`, whether it is a root or an alias.
	pub fn slot_of(&self, name: &str) -> Option<SlotId> {
		self.record(name).map(|r| r.slot)
	}
}
