//! Host-supplied view of the running environment.

use crate::decl::ApiFamily;
use crate::error::AutoinitError;

/// Environment queries consulted by provider conditions.
///
/// Implementations are supplied by the host platform layer. Queries must be
/// idempotent: two threads resolving the same function may both evaluate them.
pub trait Environment: Send + Sync {
	/// Detects the facts the other queries depend on.
	///
	/// Called at most once per family per dispatch context, before any condition of
	/// that family is evaluated. Must not resolve dispatched functions through the
	/// general mechanism.
	fn autoinit(&self, family: ApiFamily) -> Result<(), AutoinitError> {
		let _ = family;
		Ok(())
	}

	fn is_desktop_gl(&self) -> bool;

	/// Current GL or GLES version, encoded `major * 10 + minor`.
	fn gl_version(&self) -> u32;

	/// Current GLX version, encoded `major * 10 + minor`.
	fn glx_version(&self) -> u32;

	fn has_gl_extension(&self, name: &str) -> bool;

	fn has_glx_extension(&self, name: &str) -> bool;
}
