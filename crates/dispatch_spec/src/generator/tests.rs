use pretty_assertions::assert_eq;

use super::*;
use crate::bootstrap::BootstrapPolicy;
use crate::decl::{ApiFamily, Signature};
use crate::provider::{Condition, Loader};

fn void_fn(name: &str) -> FunctionDecl {
	FunctionDecl::new(name, Signature::new("void"))
}

fn provider(description: &str, symbol: &str) -> Provider {
	Provider::new(
		Condition::GlExtension(Arc::from(description)),
		Loader::proc_address(symbol),
		description,
	)
}

fn descriptions(providers: &[Provider]) -> Vec<&str> {
	providers.iter().map(|p| &*p.description).collect()
}

/// Root `[P1, P2]` plus one alias `[P3]` merges to exactly `[P1, P2, P3]`.
#[test]
fn test_root_providers_precede_alias_providers() {
	let mut generator = Generator::default();
	generator.declare(void_fn("glF")).unwrap();
	generator.declare(void_fn("glFEXT").alias_of("glF")).unwrap();
	generator.require("glF", provider("P1", "glF")).unwrap();
	generator.require("glFEXT", provider("P3", "glFEXT")).unwrap();
	generator.require("glF", provider("P2", "glF")).unwrap();

	let set = generator.canonicalize().unwrap();
	let slot = set.slot_of("glF").unwrap();
	assert_eq!(set.slot_of("glFEXT"), Some(slot));
	assert_eq!(set.len(), 1);
	assert_eq!(descriptions(set.providers(slot)), vec!["P1", "P2", "P3"]);
	assert_eq!(set.providers(slot)[2].loader, Loader::proc_address("glFEXT"));

	let alias = set.record("glFEXT").unwrap();
	assert_eq!(alias.alias_of.as_deref(), Some("glF"));
	assert_eq!(descriptions(&alias.providers), vec!["P3"]);
}

/// Aliases contribute in declaration order, even when declared before their root.
#[test]
fn test_alias_providers_follow_declaration_order() {
	let mut generator = Generator::default();
	generator.declare(void_fn("glBARB").alias_of("glB")).unwrap();
	generator.declare(void_fn("glB")).unwrap();
	generator.declare(void_fn("glBEXT").alias_of("glBARB")).unwrap();
	generator.require("glBEXT", provider("ext", "glBEXT")).unwrap();
	generator.require("glBARB", provider("arb", "glBARB")).unwrap();
	generator.require("glB", provider("core", "glB")).unwrap();

	let set = generator.canonicalize().unwrap();
	let slot = set.slot_of("glB").unwrap();
	assert_eq!(descriptions(set.providers(slot)), vec!["core", "arb", "ext"]);
	let aliases: Vec<_> = set.aliases(slot).map(|r| &*r.name).collect();
	assert_eq!(aliases, vec!["glBARB", "glBEXT"]);
}

#[test]
fn test_slots_follow_root_declaration_order() {
	let mut generator = Generator::default();
	for decl in [
		void_fn("glA"),
		void_fn("glAEXT").alias_of("glA"),
		void_fn("glB"),
		void_fn("glXC"),
	] {
		generator.declare(decl).unwrap();
	}
	let set = generator.canonicalize().unwrap();

	assert_eq!(set.len(), 3);
	let roots: Vec<_> = set.slots().map(|s| &*set.root(s).name).collect();
	assert_eq!(roots, vec!["glA", "glB", "glXC"]);
	assert_eq!(set.group(set.slot_of("glXC").unwrap()).family, ApiFamily::Glx);
	assert_eq!(set.group(set.slot_of("glB").unwrap()).family, ApiFamily::Gl);
}

/// Every bootstrap name ends with one unconditional provider, whatever the registry said.
#[test]
fn test_bootstrap_functions_end_with_single_unconditional_provider() {
	let mut generator = Generator::default();
	generator.declare(FunctionDecl::new("glGetString", Signature::new("const GLubyte *").param("GLenum", "name"))).unwrap();
	generator.declare(void_fn("glGetIntegerv")).unwrap();
	generator.require_feature(&FeatureDecl::new("gl", "1.0").require("glGetString").require("glGetIntegerv")).unwrap();
	generator.require_feature(&FeatureDecl::new("gles2", "2.0").require("glGetString")).unwrap();
	generator.require("glGetIntegerv", provider("weird", "glGetIntegerv")).unwrap();

	let set = generator.canonicalize().unwrap();
	for name in ["glGetString", "glGetIntegerv"] {
		let slot = set.slot_of(name).unwrap();
		let providers = set.providers(slot);
		assert_eq!(providers.len(), 1, "{name}");
		assert_eq!(providers[0], Provider::always_present(name));
		assert_eq!(set.record(name).unwrap().providers, vec![Provider::always_present(name)]);
	}
}

/// A bootstrap primitive declared as an alias pins its whole group.
#[test]
fn test_bootstrap_alias_overrides_whole_group() {
	let mut generator = Generator::default();
	generator.declare(void_fn("glXGetProcAddressARB")).unwrap();
	generator.declare(void_fn("glXGetProcAddress").alias_of("glXGetProcAddressARB")).unwrap();
	generator
		.require_extension(&ExtensionDecl::new("GLX_ARB_get_proc_address", "glx").require("glXGetProcAddressARB"))
		.unwrap();

	let set = generator.canonicalize().unwrap();
	let slot = set.slot_of("glXGetProcAddressARB").unwrap();
	assert_eq!(set.providers(slot), &[Provider::always_present("glXGetProcAddress")]);
	assert_eq!(
		set.record("glXGetProcAddress").unwrap().providers,
		vec![Provider::always_present("glXGetProcAddress")]
	);
}

#[test]
fn test_strict_bootstrap_rejects_undeclared_name() {
	let config = GeneratorConfig::default().with_bootstrap(BootstrapPolicy::strict(["glGetString"]));
	let mut generator = Generator::new(config);
	generator.declare(void_fn("glFlush")).unwrap();
	assert_eq!(
		generator.canonicalize().unwrap_err(),
		ConfigurationError::UnknownBootstrap { name: "glGetString".into() }
	);
}

#[test]
fn test_default_bootstrap_skips_undeclared_names() {
	let mut generator = Generator::default();
	generator.declare(void_fn("glXSwapBuffers")).unwrap();
	assert!(generator.canonicalize().is_ok());
}

#[test]
fn test_requirement_for_undeclared_function() {
	let mut generator = Generator::default();
	let err = generator.require_feature(&FeatureDecl::new("gl", "2.0").require("glMissing")).unwrap_err();
	assert_eq!(
		err,
		ConfigurationError::UnknownFunction {
			requirement: "gl 2.0".into(),
			name: "glMissing".into(),
		}
	);
}

#[test]
fn test_functions_with_unusable_types_are_dropped() {
	let mut generator = Generator::default();
	generator.declare(FunctionDecl::new("glXCreateGLXVideoSourceSGIX", Signature::new("GLXVideoSourceSGIX").param("VLServer", "server"))).unwrap();
	generator.declare(void_fn("glXWaitGL")).unwrap();
	generator.require_feature(&FeatureDecl::new("glx", "1.0").require("glXWaitGL").require("glXCreateGLXVideoSourceSGIX")).unwrap();

	let set = generator.canonicalize().unwrap();
	assert!(set.record("glXCreateGLXVideoSourceSGIX").is_none());
	assert_eq!(set.len(), 1);
}

#[test]
fn test_duplicate_declaration() {
	let mut generator = Generator::default();
	generator.declare(void_fn("glFlush")).unwrap();
	assert!(matches!(generator.declare(void_fn("glFlush")), Err(ConfigurationError::DuplicateFunction { .. })));
}

/// `F` has two conditional providers; alias `F2` is always present. The merged list
/// carries the unconditional provider last, for the resolver to prefer.
#[test]
fn test_unconditional_alias_provider_is_merged() {
	let mut generator = Generator::default();
	generator.declare(void_fn("F")).unwrap();
	generator.declare(void_fn("F2").alias_of("F")).unwrap();
	generator.require_feature(&FeatureDecl::new("gles2", "2.0").require("F")).unwrap();
	generator.require_extension(&ExtensionDecl::new("X", "gl").require("F")).unwrap();
	generator.require("F2", Provider::always_present("F2")).unwrap();

	let set = generator.canonicalize().unwrap();
	let providers = set.providers(set.slot_of("F2").unwrap());
	assert_eq!(descriptions(providers), vec!["OpenGL ES 2.0", "GL extension \"X\"", "always present"]);
	assert!(providers[2].condition.is_always());
}
