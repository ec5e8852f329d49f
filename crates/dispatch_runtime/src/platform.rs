//! [`SymbolLoader`] backed by a dynamically loaded library.
//!
//! `dlsym` lookups go straight to the library's export table. `get_proc_address`
//! lookups go through the library's own get-proc-address entry point (for example
//! `glXGetProcAddressARB` or `eglGetProcAddress`), when it exports one.

use std::ffi::{CString, c_char, c_void};
use std::path::Path;

use libloading::Library;
use tracing::{debug, warn};

use crate::addr::ProcAddr;
use crate::loader::SymbolLoader;

type GetProcAddressFn = unsafe extern "C" fn(*const c_char) -> *const c_void;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
	#[error("failed to load {path}: {source}")]
	Open {
		path: String,
		#[source]
		source: libloading::Error,
	},
}

pub struct LibrarySymbols {
	library: Library,
	get_proc_address: Option<GetProcAddressFn>,
}

impl std::fmt::Debug for LibrarySymbols {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LibrarySymbols")
			.field("has_get_proc_address", &self.get_proc_address.is_some())
			.finish_non_exhaustive()
	}
}

impl LibrarySymbols {
	/// Opens the GL library at `path`.
	///
	/// `gpa_symbol` names the library's get-proc-address entry point; without one, every
	/// get-proc-address lookup misses.
	///
	/// # Safety
	///
	/// Loading a library runs its initializers. `path` must name a library that is safe
	/// to load into this process, and `gpa_symbol`, when given, must have the signature
	/// `fn(*const c_char) -> *const c_void`.
	pub unsafe fn open(path: impl AsRef<Path>, gpa_symbol: Option<&str>) -> Result<Self, PlatformError> {
		let path = path.as_ref();
		// SAFETY: forwarded to the caller.
		let library = unsafe { Library::new(path) }.map_err(|source| PlatformError::Open {
			path: path.display().to_string(),
			source,
		})?;
		debug!(path = %path.display(), "platform.open");
		// SAFETY: forwarded to the caller.
		Ok(unsafe { Self::from_library(library, gpa_symbol) })
	}

	/// Uses the symbols already loaded into this process.
	///
	/// # Safety
	///
	/// As for [`Self::open`], for `gpa_symbol`.
	#[cfg(unix)]
	pub unsafe fn this_process(gpa_symbol: Option<&str>) -> Self {
		let library = Library::from(libloading::os::unix::Library::this());
		// SAFETY: forwarded to the caller.
		unsafe { Self::from_library(library, gpa_symbol) }
	}

	unsafe fn from_library(library: Library, gpa_symbol: Option<&str>) -> Self {
		let get_proc_address = gpa_symbol.and_then(|name| {
			// SAFETY: the caller vouches for the entry point's signature.
			match unsafe { library.get::<GetProcAddressFn>(name.as_bytes()) } {
				Ok(symbol) => Some(*symbol),
				Err(err) => {
					warn!(symbol = name, error = %err, "platform.gpa_missing");
					None
				}
			}
		});
		Self {
			library,
			get_proc_address,
		}
	}

	pub fn has_get_proc_address(&self) -> bool {
		self.get_proc_address.is_some()
	}
}

impl SymbolLoader for LibrarySymbols {
	fn dlsym(&self, symbol: &str) -> Option<ProcAddr> {
		// SAFETY: the address is only read, never called here.
		let found = unsafe { self.library.get::<*const c_void>(symbol.as_bytes()) }.ok()?;
		ProcAddr::from_ptr(*found)
	}

	fn get_proc_address(&self, symbol: &str) -> Option<ProcAddr> {
		let gpa = self.get_proc_address?;
		let name = CString::new(symbol).ok()?;
		// SAFETY: `gpa` came from the library that `self` keeps loaded.
		ProcAddr::from_ptr(unsafe { gpa(name.as_ptr()) })
	}
}
