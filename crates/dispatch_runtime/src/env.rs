//! Environment state and the per-context autoinit gates.

use std::sync::OnceLock;

use gldispatch_spec::{ApiFamily, AutoinitError, Environment};
use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

/// Snapshot of what the host has detected about the current GL/GLX context.
///
/// Versions are encoded `major * 10 + minor`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvState {
	pub desktop_gl: bool,
	pub gl_version: u32,
	pub glx_version: u32,
	pub gl_extensions: FxHashSet<String>,
	pub glx_extensions: FxHashSet<String>,
	/// When set, autoinit fails with this reason for every family.
	pub undetermined: Option<String>,
}

impl EnvState {
	pub fn desktop(gl_version: u32) -> Self {
		Self {
			desktop_gl: true,
			gl_version,
			..Self::default()
		}
	}

	pub fn gles(gl_version: u32) -> Self {
		Self {
			desktop_gl: false,
			gl_version,
			..Self::default()
		}
	}

	pub fn with_glx(mut self, glx_version: u32) -> Self {
		self.glx_version = glx_version;
		self
	}

	pub fn with_gl_extension(mut self, name: impl Into<String>) -> Self {
		self.gl_extensions.insert(name.into());
		self
	}

	pub fn with_glx_extension(mut self, name: impl Into<String>) -> Self {
		self.glx_extensions.insert(name.into());
		self
	}

	pub fn undetermined(reason: impl Into<String>) -> Self {
		Self {
			undetermined: Some(reason.into()),
			..Self::default()
		}
	}
}

/// An [`Environment`] backed by host-written state.
///
/// Suited to hosts that detect the context once (or on every make-current) and to
/// tests. Updates are visible to conditions evaluated afterwards; slots already
/// resolved keep their addresses.
#[derive(Debug, Default)]
pub struct StaticEnvironment {
	state: RwLock<EnvState>,
}

impl StaticEnvironment {
	pub fn new(state: EnvState) -> Self {
		Self {
			state: RwLock::new(state),
		}
	}

	pub fn set(&self, state: EnvState) {
		*self.state.write() = state;
	}

	pub fn update(&self, f: impl FnOnce(&mut EnvState)) {
		f(&mut self.state.write());
	}

	pub fn snapshot(&self) -> EnvState {
		self.state.read().clone()
	}
}

impl Environment for StaticEnvironment {
	fn autoinit(&self, family: ApiFamily) -> Result<(), AutoinitError> {
		match &self.state.read().undetermined {
			Some(reason) => Err(AutoinitError::new(family, reason.clone())),
			None => Ok(()),
		}
	}

	fn is_desktop_gl(&self) -> bool {
		self.state.read().desktop_gl
	}

	fn gl_version(&self) -> u32 {
		self.state.read().gl_version
	}

	fn glx_version(&self) -> u32 {
		self.state.read().glx_version
	}

	fn has_gl_extension(&self, name: &str) -> bool {
		self.state.read().gl_extensions.contains(name)
	}

	fn has_glx_extension(&self, name: &str) -> bool {
		self.state.read().glx_extensions.contains(name)
	}
}

/// Run-exactly-once autoinit outcome per [`ApiFamily`].
///
/// The first resolution of a family runs [`Environment::autoinit`]; concurrent callers
/// block until it finishes and every caller sees the same recorded outcome.
#[derive(Debug, Default)]
pub struct AutoinitGates {
	gl: OnceLock<Result<(), AutoinitError>>,
	glx: OnceLock<Result<(), AutoinitError>>,
}

impl AutoinitGates {
	pub fn new() -> Self {
		Self::default()
	}

	fn gate(&self, family: ApiFamily) -> &OnceLock<Result<(), AutoinitError>> {
		match family {
			ApiFamily::Gl => &self.gl,
			ApiFamily::Glx => &self.glx,
		}
	}

	pub fn ensure(&self, family: ApiFamily, env: &dyn Environment) -> Result<(), AutoinitError> {
		self.gate(family)
			.get_or_init(|| {
				let outcome = env.autoinit(family);
				match &outcome {
					Ok(()) => debug!(family = %family, "autoinit.done"),
					Err(err) => warn!(family = %family, reason = %err.reason, "autoinit.failed"),
				}
				outcome
			})
			.clone()
	}

	/// Outcome of a family's autoinit, or `None` if it has not run.
	pub fn outcome(&self, family: ApiFamily) -> Option<&Result<(), AutoinitError>> {
		self.gate(family).get()
	}
}
