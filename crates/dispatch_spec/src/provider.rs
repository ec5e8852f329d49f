//! Provider model: one way of obtaining a function's address.
//!
//! # Role
//!
//! Pure value types. A [`Provider`] pairs a typed [`Condition`] with a [`Loader`] and a
//! diagnostic description. Provider lists are ordered and first-match-wins, so nothing
//! here sorts or deduplicates.

use std::fmt;
use std::sync::Arc;

use crate::env::Environment;

type PredicateFn = dyn Fn(&dyn Environment) -> bool + Send + Sync;

/// Host-defined condition with its captured parameters.
#[derive(Clone)]
pub struct Predicate {
	label: Arc<str>,
	check: Arc<PredicateFn>,
}

impl Predicate {
	pub fn new(label: impl Into<Arc<str>>, check: impl Fn(&dyn Environment) -> bool + Send + Sync + 'static) -> Self {
		Self {
			label: label.into(),
			check: Arc::new(check),
		}
	}

	pub fn label(&self) -> &str {
		&self.label
	}
}

impl fmt::Debug for Predicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Predicate").field(&self.label).finish()
	}
}

impl PartialEq for Predicate {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.check, &other.check)
	}
}

/// Boolean predicate over environment state.
///
/// Versions are encoded `major * 10 + minor`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
	/// Unconditionally available.
	Always,
	/// Desktop GL, optionally at or above a version.
	DesktopGl { min_version: Option<u32> },
	/// GLES at or above a version.
	GlesVersion { min: u32 },
	/// GLES at exactly a version.
	GlesExact { version: u32 },
	/// GLX at or above a version.
	GlxVersion { min: u32 },
	GlExtension(Arc<str>),
	GlxExtension(Arc<str>),
	Custom(Predicate),
}

impl Condition {
	pub fn is_always(&self) -> bool {
		matches!(self, Self::Always)
	}

	pub fn evaluate(&self, env: &dyn Environment) -> bool {
		match self {
			Self::Always => true,
			Self::DesktopGl { min_version } => env.is_desktop_gl() && min_version.is_none_or(|v| env.gl_version() >= v),
			Self::GlesVersion { min } => !env.is_desktop_gl() && env.gl_version() >= *min,
			Self::GlesExact { version } => !env.is_desktop_gl() && env.gl_version() == *version,
			Self::GlxVersion { min } => env.glx_version() >= *min,
			Self::GlExtension(name) => env.has_gl_extension(name),
			Self::GlxExtension(name) => env.has_glx_extension(name),
			Self::Custom(predicate) => (predicate.check)(env),
		}
	}
}

impl fmt::Display for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Always => f.write_str("true"),
			Self::DesktopGl { min_version: None } => f.write_str("desktop"),
			Self::DesktopGl { min_version: Some(v) } => write!(f, "desktop && gl_version >= {v}"),
			Self::GlesVersion { min } => write!(f, "!desktop && gl_version >= {min}"),
			Self::GlesExact { version } => write!(f, "!desktop && gl_version == {version}"),
			Self::GlxVersion { min } => write!(f, "glx_version >= {min}"),
			Self::GlExtension(name) => write!(f, "has_gl_extension({name:?})"),
			Self::GlxExtension(name) => write!(f, "has_glx_extension({name:?})"),
			Self::Custom(predicate) => f.write_str(predicate.label()),
		}
	}
}

/// Lookup path used by a [`Loader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoaderKind {
	/// Direct exported-symbol lookup in the loaded library.
	Dlsym,
	/// The platform's conditional get-proc-address entry point.
	GetProcAddress,
}

impl fmt::Display for LoaderKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Dlsym => f.write_str("dlsym"),
			Self::GetProcAddress => f.write_str("get_proc_address"),
		}
	}
}

/// A lookup path bound to the symbol it looks up.
///
/// The symbol is the name of the function whose requirement created the provider, so
/// a group may be resolved through one of its aliases' names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Loader {
	pub kind: LoaderKind,
	pub symbol: Arc<str>,
}

impl Loader {
	pub fn dlsym(symbol: impl Into<Arc<str>>) -> Self {
		Self {
			kind: LoaderKind::Dlsym,
			symbol: symbol.into(),
		}
	}

	pub fn proc_address(symbol: impl Into<Arc<str>>) -> Self {
		Self {
			kind: LoaderKind::GetProcAddress,
			symbol: symbol.into(),
		}
	}
}

impl fmt::Display for Loader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}({:?})", self.kind, self.symbol)
	}
}

/// One way to obtain a callable address for a function.
#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
	pub condition: Condition,
	pub loader: Loader,
	/// Human-readable label listed in diagnostics.
	pub description: Arc<str>,
}

impl Provider {
	pub fn new(condition: Condition, loader: Loader, description: impl Into<Arc<str>>) -> Self {
		Self {
			condition,
			loader,
			description: description.into(),
		}
	}

	/// The single provider installed on bootstrap functions.
	pub fn always_present(symbol: impl Into<Arc<str>>) -> Self {
		Self::new(Condition::Always, Loader::dlsym(symbol), "always present")
	}
}
