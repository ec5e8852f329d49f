#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Offline analysis for lazily dispatched native API surfaces.
//!
//! # Purpose
//!
//! Turns declared functions (signatures plus raw alias names) and the feature and
//! extension statements that make them available into canonical dispatch groups: one
//! group per alias root, each carrying a single ordered provider list. The runtime
//! crate allocates exactly one dispatch slot per group.
//!
//! # Mental Model
//!
//! 1. **Declare:** [`Generator::declare`] materializes functions and raw alias names with
//!    no cross-links. Requirements attach [`Provider`]s to the declaring function.
//! 2. **Reduce:** [`AliasForest`] collapses alias chains so every alias points straight
//!    at its root.
//! 3. **Merge:** a root's providers come first, then each alias's providers in
//!    declaration order.
//! 4. **Override:** [`BootstrapPolicy`] functions get a single unconditional
//!    direct-symbol provider, replacing whatever the registry declared.
//!
//! The result is an immutable [`CanonicalSet`].
//!
//! # Invariants
//!
//! - Alias links are at most one hop deep and acyclic.
//!   - Enforced in: [`AliasForest::reduce`], [`AliasForest::link`].
//! - Provider order is first-match-wins; merging never reorders or deduplicates.
//!   - Enforced in: `Generator::canonicalize`.
//! - Bootstrap groups end with exactly one [`Condition::Always`] provider.
//!   - Enforced in: `CanonicalSet::apply_bootstrap`.

pub mod alias;
pub mod bootstrap;
pub mod canonical;
pub mod config;
pub mod decl;
pub mod env;
pub mod error;
pub mod features;
pub mod generator;
pub mod provider;

pub use alias::AliasForest;
pub use bootstrap::{BootstrapPolicy, DEFAULT_BOOTSTRAP_FUNCTIONS};
pub use canonical::{CanonicalGroup, CanonicalSet, FunctionRecord, SlotId};
pub use config::GeneratorConfig;
pub use decl::{ApiFamily, ExtensionDecl, FeatureDecl, FunctionDecl, Param, RegistryDecl, Signature};
pub use env::Environment;
pub use error::{AutoinitError, ConfigurationError};
pub use features::{ProviderTemplate, extension_templates, feature_template, parse_version};
pub use generator::Generator;
pub use provider::{Condition, Loader, LoaderKind, Predicate, Provider};
