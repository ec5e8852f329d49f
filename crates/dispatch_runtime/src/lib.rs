//! Runtime dispatch for canonical function groups.
//!
//! # Purpose
//!
//! Every canonical group from [`gldispatch_spec::CanonicalSet`] owns one [`Slot`] per
//! [`DispatchContext`]. The first call through an unresolved slot runs the lazy resolver;
//! later calls go straight through the cached address.
//!
//! # Mental Model
//!
//! 1. **Context:** [`DispatchContext::new`] pairs the shared canonical set with a fresh
//!    [`DispatchTable`], the host [`Environment`] and the host [`SymbolLoader`].
//! 2. **Lookup:** generated call-through code finds its context through [`current`]
//!    (thread-local, falling back to the process default) and calls
//!    [`DispatchContext::invoke`].
//! 3. **Resolve:** on a miss, the context runs the family's autoinit gate, selects a
//!    provider and publishes the loaded address into the slot.
//! 4. **Fail:** an unresolvable function is handed to the context's [`FatalPolicy`].
//!
//! # Concurrency
//!
//! - **Cached calls:** one atomic load.
//! - **Resolution:** lock-free per slot; concurrent first calls may each resolve, but only
//!   the first published address is ever observed.
//! - **Autoinit:** exactly once per family per context.
//!
//! # Invariants
//!
//! - A slot never holds a null address and never returns to unresolved.
//!   - Enforced in: [`Slot::publish`].
//! - Resolution of one slot never blocks resolution of another.
//!   - Enforced in: [`DispatchContext::try_resolve`] (no locks on the resolve path).

mod addr;
mod context;
mod env;
mod error;
mod fatal;
mod loader;
#[cfg(feature = "libloading")]
pub mod platform;
mod resolve;
mod slot;

pub use addr::ProcAddr;
pub use context::{ContextBuilder, CurrentGuard, DispatchContext, current, make_current, set_default, with_current};
pub use env::{AutoinitGates, EnvState, StaticEnvironment};
pub use error::{ResolveFailure, UnresolvableSymbol};
pub use fatal::FatalPolicy;
pub use gldispatch_spec::{ApiFamily, AutoinitError, CanonicalSet, Environment, SlotId};
pub use loader::{FnLoader, SymbolLoader};
pub use resolve::{Resolver, select_provider};
pub use slot::{DispatchTable, Slot};
