//! Dispatch contexts and the current-context handle.
//!
//! # Role
//!
//! A [`DispatchContext`] owns one [`DispatchTable`] for a shared [`CanonicalSet`], so
//! two GL contexts with different capabilities never share cached addresses.
//!
//! # Current context
//!
//! Generated call-through code has no context argument. It looks one up with
//! [`current`]: the calling thread's context installed by [`make_current`], falling back
//! to the process-wide context installed by [`set_default`].
//!
//! # Invariants
//!
//! - [`CurrentGuard`] restores exactly the context that was current when it was created.
//!   - Enforced in: `CurrentGuard::drop`.
//! - The resolve path takes no locks; only autoinit may block, once per family.
//!   - Enforced in: [`DispatchContext::try_resolve`].

use std::cell::RefCell;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use gldispatch_spec::{CanonicalSet, Environment, SlotId};
use tracing::debug;

use crate::addr::ProcAddr;
use crate::env::AutoinitGates;
use crate::error::UnresolvableSymbol;
use crate::fatal::FatalPolicy;
use crate::loader::SymbolLoader;
use crate::resolve::Resolver;
use crate::slot::DispatchTable;

thread_local! {
	static CURRENT: RefCell<Option<Arc<DispatchContext>>> = const { RefCell::new(None) };
}

static DEFAULT: ArcSwapOption<DispatchContext> = ArcSwapOption::const_empty();

/// Per-context dispatch state.
pub struct DispatchContext {
	set: Arc<CanonicalSet>,
	table: DispatchTable,
	env: Arc<dyn Environment>,
	loader: Arc<dyn SymbolLoader>,
	gates: AutoinitGates,
	policy: FatalPolicy,
}

impl std::fmt::Debug for DispatchContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DispatchContext")
			.field("slots", &self.table.len())
			.field("resolved", &self.table.resolved_count())
			.field("gates", &self.gates)
			.field("policy", &self.policy)
			.finish_non_exhaustive()
	}
}

impl DispatchContext {
	/// Creates a context with every slot unresolved and the default [`FatalPolicy`].
	pub fn new(set: Arc<CanonicalSet>, env: Arc<dyn Environment>, loader: Arc<dyn SymbolLoader>) -> Self {
		let table = DispatchTable::new(set.len());
		Self {
			set,
			table,
			env,
			loader,
			gates: AutoinitGates::new(),
			policy: FatalPolicy::default(),
		}
	}

	pub fn builder(set: Arc<CanonicalSet>) -> ContextBuilder {
		ContextBuilder {
			set,
			env: None,
			loader: None,
			policy: FatalPolicy::default(),
		}
	}

	pub fn with_policy(mut self, policy: FatalPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn canonical(&self) -> &Arc<CanonicalSet> {
		&self.set
	}

	pub fn table(&self) -> &DispatchTable {
		&self.table
	}

	pub fn environment(&self) -> &dyn Environment {
		&*self.env
	}

	pub fn policy(&self) -> FatalPolicy {
		self.policy
	}

	pub fn gates(&self) -> &AutoinitGates {
		&self.gates
	}

	pub fn slot_of(&self, name: &str) -> Option<SlotId> {
		self.set.slot_of(name)
	}

	/// Cached address of `slot`, without resolving.
	pub fn resolved(&self, slot: SlotId) -> Option<ProcAddr> {
		self.table.get(slot).and_then(|s| s.get())
	}

	/// Returns the cached address, resolving and publishing it on first use.
	///
	/// Concurrent first calls may all run the resolver; every caller gets the address
	/// that was published first.
	pub fn try_resolve(&self, slot: SlotId) -> Result<ProcAddr, UnresolvableSymbol> {
		let Some(cell) = self.table.get(slot) else {
			return Err(UnresolvableSymbol::unknown(format!("<slot {}>", slot.as_u32())));
		};
		if let Some(addr) = cell.get() {
			return Ok(addr);
		}

		let resolver = Resolver {
			set: &self.set,
			env: &*self.env,
			loader: &*self.loader,
			gates: &self.gates,
		};
		let addr = cell.publish(resolver.resolve(slot)?);
		debug!(function = %self.set.root(slot).name, slot = slot.as_u32(), addr = ?addr, "slot.resolved");
		Ok(addr)
	}

	pub fn try_resolve_name(&self, name: &str) -> Result<ProcAddr, UnresolvableSymbol> {
		let slot = self.slot_of(name).ok_or_else(|| UnresolvableSymbol::unknown(name))?;
		self.try_resolve(slot)
	}

	/// Like [`Self::try_resolve`], but hands failures to the context's [`FatalPolicy`].
	pub fn address(&self, slot: SlotId) -> ProcAddr {
		self.try_resolve(slot).unwrap_or_else(|err| self.policy.fail(err))
	}

	/// Resolves `slot` and calls `f` with its address.
	///
	/// This is the body of every generated call-through: `f` casts the address to the
	/// function's pointer type and forwards the arguments.
	#[inline]
	pub fn invoke<R>(&self, slot: SlotId, f: impl FnOnce(ProcAddr) -> R) -> R {
		f(self.address(slot))
	}

	/// [`Self::invoke`] for callers that only know the function's name.
	///
	/// Aliases resolve through their group's slot.
	pub fn invoke_by_name<R>(&self, name: &str, f: impl FnOnce(ProcAddr) -> R) -> R {
		match self.try_resolve_name(name) {
			Ok(addr) => f(addr),
			Err(err) => self.policy.fail(err),
		}
	}
}

/// Assembles a [`DispatchContext`] with per-context knobs.
pub struct ContextBuilder {
	set: Arc<CanonicalSet>,
	env: Option<Arc<dyn Environment>>,
	loader: Option<Arc<dyn SymbolLoader>>,
	policy: FatalPolicy,
}

impl ContextBuilder {
	pub fn environment(mut self, env: Arc<dyn Environment>) -> Self {
		self.env = Some(env);
		self
	}

	pub fn loader(mut self, loader: Arc<dyn SymbolLoader>) -> Self {
		self.loader = Some(loader);
		self
	}

	pub fn policy(mut self, policy: FatalPolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Returns `None` until both an environment and a loader are set.
	pub fn build(self) -> Option<DispatchContext> {
		let env = self.env?;
		let loader = self.loader?;
		Some(DispatchContext::new(self.set, env, loader).with_policy(self.policy))
	}
}

/// Restores the previously current context when dropped.
///
/// Guards must be dropped in reverse order of creation; debug builds assert it.
/// Not `Send`: the guard must be dropped on the thread that created it.
#[must_use = "the context stops being current when the guard is dropped"]
pub struct CurrentGuard {
	previous: Option<Arc<DispatchContext>>,
	installed: *const DispatchContext,
}

impl Drop for CurrentGuard {
	fn drop(&mut self) {
		let previous = self.previous.take();
		CURRENT.with(|cell| {
			let mut current = cell.borrow_mut();
			debug_assert!(
				current.as_ref().is_some_and(|ctx| std::ptr::eq(Arc::as_ptr(ctx), self.installed)),
				"CurrentGuard dropped out of order"
			);
			*current = previous;
		});
	}
}

/// Makes `ctx` the calling thread's current context until the guard drops.
pub fn make_current(ctx: Arc<DispatchContext>) -> CurrentGuard {
	let installed = Arc::as_ptr(&ctx);
	let previous = CURRENT.with(|cell| cell.replace(Some(ctx)));
	CurrentGuard { previous, installed }
}

/// Installs the process-wide fallback context, returning the one it replaces.
pub fn set_default(ctx: Option<Arc<DispatchContext>>) -> Option<Arc<DispatchContext>> {
	DEFAULT.swap(ctx)
}

/// The calling thread's current context, else the process default.
pub fn current() -> Option<Arc<DispatchContext>> {
	CURRENT.with(|cell| cell.borrow().clone()).or_else(|| DEFAULT.load_full())
}

/// Runs `f` against [`current`], or returns `None` when no context is installed.
pub fn with_current<R>(f: impl FnOnce(&DispatchContext) -> R) -> Option<R> {
	current().map(|ctx| f(&ctx))
}
