use super::*;

fn forest(decls: &[(&str, Option<&str>)]) -> AliasForest {
	let mut forest = AliasForest::new();
	for (name, alias) in decls {
		forest.declare(name, *alias).expect("unique names");
	}
	forest
}

fn names(forest: &AliasForest, idxs: &[usize]) -> Vec<String> {
	idxs.iter().map(|&i| forest.name(i).to_string()).collect()
}

/// A three-hop chain collapses so every member points straight at the root.
#[test]
fn test_chain_flattens_to_single_hop() {
	let mut f = forest(&[
		("glFramebufferTextureEXT", Some("glFramebufferTextureARB")),
		("glFramebufferTextureARB", Some("glFramebufferTexture")),
		("glFramebufferTexture", None),
		("glFramebufferTextureOES", Some("glFramebufferTextureEXT")),
	]);
	f.reduce().expect("reduce");

	let root = f.lookup("glFramebufferTexture").unwrap();
	for name in ["glFramebufferTextureEXT", "glFramebufferTextureARB", "glFramebufferTextureOES"] {
		let idx = f.lookup(name).unwrap();
		assert_eq!(f.alias_of(idx), Some(root), "{name}");
		assert_eq!(f.alias_name(idx), Some("glFramebufferTexture"));
		assert_eq!(f.alias_of(root), None);
	}

	assert_eq!(
		names(&f, f.aliased_by(root)),
		vec!["glFramebufferTextureEXT", "glFramebufferTextureARB", "glFramebufferTextureOES"],
		"each member exactly once, in declaration order"
	);
	for name in ["glFramebufferTextureEXT", "glFramebufferTextureARB"] {
		assert!(f.aliased_by(f.lookup(name).unwrap()).is_empty());
	}
}

/// Forward references are fine: the alias can be declared before its target.
#[test]
fn test_forward_reference() {
	let mut f = forest(&[("glAttachObjectARB", Some("glAttachShader")), ("glAttachShader", None)]);
	f.reduce().unwrap();
	assert_eq!(f.root_of(0), 1);
	assert!(f.is_root(1));
}

#[test]
fn test_root_and_membership_independent_of_declaration_order() {
	let decls = [
		("a", Some("b")),
		("b", Some("c")),
		("c", None),
		("d", Some("a")),
		("e", None),
		("f", Some("e")),
	];

	let reference = {
		let mut f = forest(&decls);
		f.reduce().unwrap();
		f
	};

	let mut reversed: Vec<_> = decls.to_vec();
	reversed.reverse();
	let mut rotated: Vec<_> = decls.to_vec();
	rotated.rotate_left(2);

	for order in [reversed, rotated] {
		let mut f = forest(&order);
		f.reduce().unwrap();
		for (name, _) in decls {
			let root_here = f.name(f.root_of(f.lookup(name).unwrap()));
			let root_ref = reference.name(reference.root_of(reference.lookup(name).unwrap()));
			assert_eq!(root_here, root_ref, "{name}");
		}
		let mut members = names(&f, f.aliased_by(f.lookup("c").unwrap()));
		members.sort();
		assert_eq!(members, vec!["a", "b", "d"]);
	}
}

#[test]
fn test_dangling_alias_is_rejected() {
	let mut f = forest(&[("glFooEXT", Some("glFoo"))]);
	let err = f.reduce().unwrap_err();
	assert_eq!(
		err,
		ConfigurationError::DanglingAlias {
			name: "glFooEXT".into(),
			target: "glFoo".into(),
		}
	);
	assert_eq!(f.alias_of(0), None, "failed reduce leaves no partial links");
}

#[test]
fn test_cycle_is_rejected() {
	let mut f = forest(&[("a", Some("b")), ("b", Some("a"))]);
	assert!(matches!(f.reduce(), Err(ConfigurationError::AliasCycle { .. })));

	let mut own = forest(&[("a", Some("a"))]);
	assert!(matches!(own.reduce(), Err(ConfigurationError::AliasCycle { .. })));
}

#[test]
fn test_duplicate_declaration_is_rejected() {
	let mut f = AliasForest::new();
	f.declare("glFlush", None).unwrap();
	assert_eq!(
		f.declare("glFlush", None).unwrap_err(),
		ConfigurationError::DuplicateFunction { name: "glFlush".into() }
	);
}

/// A root that already has dependents cannot later be declared an alias.
#[test]
fn test_root_with_dependents_cannot_become_alias() {
	let mut f = forest(&[("a", None), ("b", None), ("c", None)]);
	f.link("a", "b").unwrap();

	let err = f.link("b", "c").unwrap_err();
	assert_eq!(
		err,
		ConfigurationError::TransitiveAlias {
			name: "b".into(),
			target: "c".into(),
			dependents: 1,
		}
	);
	assert!(f.is_root(f.lookup("b").unwrap()));
}

/// The same rejection applies when an incremental link lands on a declared alias
/// before the batch pass runs.
#[test]
fn test_incremental_link_onto_unreduced_alias_rejected_by_reduce() {
	let mut f = forest(&[("a", None), ("b", Some("c")), ("c", None)]);
	f.link("a", "b").unwrap();
	assert!(matches!(f.reduce(), Err(ConfigurationError::TransitiveAlias { ref name, .. }) if name == "b"));
}

#[test]
fn test_rejected_reduce_writes_no_earlier_links() {
	let mut f = forest(&[("a", None), ("x", Some("c")), ("b", Some("c")), ("c", None)]);
	f.link("a", "b").unwrap();
	assert!(matches!(f.reduce(), Err(ConfigurationError::TransitiveAlias { ref name, .. }) if name == "b"));

	let x = f.lookup("x").unwrap();
	assert_eq!(f.alias_of(x), None);
	assert!(f.aliased_by(f.lookup("c").unwrap()).is_empty());
}

#[test]
fn test_link_flattens_target_that_is_an_alias() {
	let mut f = forest(&[("root", None), ("mid", None), ("leaf", None)]);
	f.link("mid", "root").unwrap();
	f.link("leaf", "mid").unwrap();

	let root = f.lookup("root").unwrap();
	assert_eq!(f.alias_of(f.lookup("leaf").unwrap()), Some(root));
	assert_eq!(names(&f, f.aliased_by(root)), vec!["mid", "leaf"]);
}

#[test]
fn test_double_link_is_rejected() {
	let mut f = forest(&[("a", None), ("b", None), ("c", None)]);
	f.link("a", "b").unwrap();
	assert_eq!(
		f.link("a", "c").unwrap_err(),
		ConfigurationError::AlreadyAliased {
			name: "a".into(),
			existing: "b".into(),
		}
	);
}

#[test]
fn test_link_to_unknown_target() {
	let mut f = forest(&[("a", None)]);
	assert!(matches!(f.link("a", "zz"), Err(ConfigurationError::DanglingAlias { .. })));
	assert!(matches!(f.link("zz", "a"), Err(ConfigurationError::UnknownFunction { .. })));
}
