use std::fmt;
use std::sync::Arc;

use gldispatch_spec::{AutoinitError, CanonicalSet, Loader, SlotId};

/// Why a function could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveFailure {
	/// No provider's condition held (or the group has no providers).
	NoProvider,
	/// The selected provider's loader returned no address.
	LoaderMiss { loader: Loader },
	/// The family's autoinit failed earlier in this context.
	Autoinit(AutoinitError),
	/// The name or slot is not part of the context's canonical set.
	UnknownFunction,
}

/// Fatal run-time failure: a dispatched function has no usable implementation.
///
/// Displays in the classic diagnostic form:
///
/// ```text
/// No provider of "glFoo()" found.  Requires one of:
///     Desktop OpenGL 3.0
///     GL extension "GL_ARB_foo"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvableSymbol {
	/// Root name of the canonical group.
	pub function: Arc<str>,
	/// Descriptions of every merged provider, in order. Empty means "unknown".
	pub requires: Vec<Arc<str>>,
	pub cause: ResolveFailure,
}

impl UnresolvableSymbol {
	pub(crate) fn for_slot(set: &CanonicalSet, slot: SlotId, cause: ResolveFailure) -> Self {
		Self {
			function: set.root(slot).name.clone(),
			requires: set.providers(slot).iter().map(|p| p.description.clone()).collect(),
			cause,
		}
	}

	pub(crate) fn unknown(function: impl Into<Arc<str>>) -> Self {
		Self {
			function: function.into(),
			requires: Vec::new(),
			cause: ResolveFailure::UnknownFunction,
		}
	}
}

impl fmt::Display for UnresolvableSymbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "No provider of \"{}()\" found.  Requires one of:", self.function)?;
		if self.requires.is_empty() {
			f.write_str("    unknown")?;
		} else {
			for (idx, description) in self.requires.iter().enumerate() {
				if idx > 0 {
					f.write_str("\n")?;
				}
				write!(f, "    {description}")?;
			}
		}
		match &self.cause {
			ResolveFailure::NoProvider => Ok(()),
			ResolveFailure::LoaderMiss { loader } => write!(f, "\n({loader} returned no address)"),
			ResolveFailure::Autoinit(err) => write!(f, "\n({err})"),
			ResolveFailure::UnknownFunction => f.write_str("\n(not a dispatched function)"),
		}
	}
}

impl std::error::Error for UnresolvableSymbol {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match &self.cause {
			ResolveFailure::Autoinit(err) => Some(err),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lists_every_requirement() {
		let err = UnresolvableSymbol {
			function: "glFoo".into(),
			requires: vec!["Desktop OpenGL 3.0".into(), "GL extension \"GL_ARB_foo\"".into()],
			cause: ResolveFailure::NoProvider,
		};
		assert_eq!(
			err.to_string(),
			"No provider of \"glFoo()\" found.  Requires one of:\n    Desktop OpenGL 3.0\n    GL extension \"GL_ARB_foo\""
		);
	}

	#[test]
	fn empty_requirements_read_unknown() {
		let err = UnresolvableSymbol::unknown("glBogus");
		assert_eq!(
			err.to_string(),
			"No provider of \"glBogus()\" found.  Requires one of:\n    unknown\n(not a dispatched function)"
		);
	}

	#[test]
	fn loader_miss_names_the_lookup() {
		let err = UnresolvableSymbol {
			function: "glFoo".into(),
			requires: vec!["always present".into()],
			cause: ResolveFailure::LoaderMiss {
				loader: Loader::dlsym("glFoo"),
			},
		};
		assert!(err.to_string().ends_with("\n(dlsym(\"glFoo\") returned no address)"));
	}
}
