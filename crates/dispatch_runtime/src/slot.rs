//! Dispatch slots and per-context tables.
//!
//! # Role
//!
//! Pure state containers. A slot moves from unresolved (zero) to resolved exactly once;
//! nothing here decides *what* to store.

use std::sync::atomic::{AtomicUsize, Ordering};

use gldispatch_spec::SlotId;

use crate::addr::ProcAddr;

const UNRESOLVED: usize = 0;

/// Cached address of one canonical function within one context.
#[derive(Debug, Default)]
pub struct Slot(AtomicUsize);

impl Slot {
	pub const fn new() -> Self {
		Self(AtomicUsize::new(UNRESOLVED))
	}

	#[inline]
	pub fn get(&self) -> Option<ProcAddr> {
		ProcAddr::new(self.0.load(Ordering::Acquire))
	}

	pub fn is_resolved(&self) -> bool {
		self.get().is_some()
	}

	/// Stores `addr` if the slot is still unresolved and returns the slot's final value.
	///
	/// When another thread published first, its address is returned and `addr` is
	/// discarded, so every caller observes a single value.
	pub fn publish(&self, addr: ProcAddr) -> ProcAddr {
		match self.0.compare_exchange(UNRESOLVED, addr.get(), Ordering::AcqRel, Ordering::Acquire) {
			Ok(_) => addr,
			Err(existing) => ProcAddr::new(existing).unwrap_or(addr),
		}
	}
}

/// One slot per canonical group, scoped to one dispatch context.
#[derive(Debug)]
pub struct DispatchTable {
	slots: Box<[Slot]>,
}

impl DispatchTable {
	/// Creates `len` unresolved slots.
	pub fn new(len: usize) -> Self {
		Self {
			slots: (0..len).map(|_| Slot::new()).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// # Panics
	///
	/// If `id` is out of range for this table.
	#[inline]
	pub fn slot(&self, id: SlotId) -> &Slot {
		&self.slots[id.as_usize()]
	}

	pub fn get(&self, id: SlotId) -> Option<&Slot> {
		self.slots.get(id.as_usize())
	}

	pub fn resolved_count(&self) -> usize {
		self.slots.iter().filter(|s| s.is_resolved()).count()
	}
}
