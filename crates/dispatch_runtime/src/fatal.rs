use tracing::error;

use crate::error::UnresolvableSymbol;

/// What a context does when a dispatched call cannot be resolved.
///
/// The call has no meaningful return value to fall back on, so both policies diverge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FatalPolicy {
	/// Log, print the diagnostic to stderr and abort the process.
	#[default]
	Abort,
	/// Unwind with the [`UnresolvableSymbol`] as the panic payload, so an embedding host
	/// can `catch_unwind` and downcast it.
	Panic,
}

impl FatalPolicy {
	pub fn fail(self, err: UnresolvableSymbol) -> ! {
		error!(function = %err.function, cause = ?err.cause, "dispatch.unresolvable");
		match self {
			Self::Abort => {
				eprintln!("{err}");
				std::process::abort()
			}
			Self::Panic => std::panic::panic_any(err),
		}
	}
}
