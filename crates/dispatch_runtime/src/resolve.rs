//! Lazy resolution of one canonical group.
//!
//! # Role
//!
//! Pure lookup: produces an address or an [`UnresolvableSymbol`] and never writes a
//! slot. Publishing the result is the context's job.
//!
//! # Selection order
//!
//! 1. The family's autoinit gate must have succeeded.
//! 2. The first unconditional provider, if any, wins without evaluating any other
//!    condition. Bootstrap queries rely on this to avoid recursing into themselves.
//! 3. Otherwise the first provider whose condition holds wins.
//! 4. The winner's loader must produce an address; later providers are not tried.

use gldispatch_spec::{CanonicalSet, Environment, Provider, SlotId};
use tracing::trace;

use crate::addr::ProcAddr;
use crate::env::AutoinitGates;
use crate::error::{ResolveFailure, UnresolvableSymbol};
use crate::loader::SymbolLoader;

/// Picks the provider to load from, or `None` if no condition holds.
pub fn select_provider<'a>(providers: &'a [Provider], env: &dyn Environment) -> Option<&'a Provider> {
	providers
		.iter()
		.find(|p| p.condition.is_always())
		.or_else(|| providers.iter().find(|p| p.condition.evaluate(env)))
}

/// Borrowed view of everything one resolution needs.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
	pub set: &'a CanonicalSet,
	pub env: &'a dyn Environment,
	pub loader: &'a dyn SymbolLoader,
	pub gates: &'a AutoinitGates,
}

impl Resolver<'_> {
	pub fn resolve(&self, slot: SlotId) -> Result<ProcAddr, UnresolvableSymbol> {
		let Some(group) = self.set.get_group(slot) else {
			return Err(UnresolvableSymbol::unknown(format!("<slot {}>", slot.as_u32())));
		};
		let fail = |cause| UnresolvableSymbol::for_slot(self.set, slot, cause);

		self.gates
			.ensure(group.family, self.env)
			.map_err(|err| fail(ResolveFailure::Autoinit(err)))?;

		let provider = select_provider(&group.providers, self.env).ok_or_else(|| fail(ResolveFailure::NoProvider))?;
		trace!(
			function = %self.set.root(slot).name,
			provider = %provider.description,
			loader = %provider.loader,
			"resolve.selected"
		);

		self.loader.load(&provider.loader).ok_or_else(|| {
			fail(ResolveFailure::LoaderMiss {
				loader: provider.loader.clone(),
			})
		})
	}
}
