use gldispatch_spec::{Loader, LoaderKind};

use crate::addr::ProcAddr;

/// Host symbol lookup, shared by every slot of a context.
///
/// Both lookups answer `None` for "not found". They may be called concurrently from
/// any thread that resolves a slot.
pub trait SymbolLoader: Send + Sync {
	/// Direct exported-symbol lookup in the loaded GL library.
	fn dlsym(&self, symbol: &str) -> Option<ProcAddr>;

	/// The platform's get-proc-address entry point.
	fn get_proc_address(&self, symbol: &str) -> Option<ProcAddr>;

	fn load(&self, loader: &Loader) -> Option<ProcAddr> {
		match loader.kind {
			LoaderKind::Dlsym => self.dlsym(&loader.symbol),
			LoaderKind::GetProcAddress => self.get_proc_address(&loader.symbol),
		}
	}
}

/// Adapts a closure over `(kind, symbol)` into a [`SymbolLoader`].
#[derive(Debug, Clone)]
pub struct FnLoader<F>(pub F);

impl<F> SymbolLoader for FnLoader<F>
where
	F: Fn(LoaderKind, &str) -> Option<ProcAddr> + Send + Sync,
{
	fn dlsym(&self, symbol: &str) -> Option<ProcAddr> {
		(self.0)(LoaderKind::Dlsym, symbol)
	}

	fn get_proc_address(&self, symbol: &str) -> Option<ProcAddr> {
		(self.0)(LoaderKind::GetProcAddress, symbol)
	}
}
