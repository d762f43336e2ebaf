//! Operator overload resolution for the catalog.
//!
//! Given an operator name, the argument types of a call and the library the
//! call is compiled in, binds the call to exactly one registered operator,
//! inserting implicit scalar conversions where needed, or explains why no
//! unique binding exists.
//!
//! # Layers
//!
//! - `types`: scalar types and the "is" compatibility predicate
//! - `conversion`: declared conversions, scored conversion paths, the path
//!   cache and the pluggable path finder
//! - `library`: library dependencies and name resolution paths
//! - `operator`: overload sets, per-call scoring and `resolve_call`
//! - `catalog`: the owning facade and its lock
//!
//! Resolution is deterministic: the same catalog state and call always bind
//! to the same operator, or fail the same way.

mod catalog;
mod config;
mod context;
mod conversion;
mod error;
mod library;
mod operator;
mod types;

pub use catalog::{Catalog, CatalogGuard, SharedCatalog};
pub use config::ResolverConfig;
pub use context::ResolveContext;
pub use conversion::{
    CachedPath, Conversion, ConversionDef, ConversionEdge, ConversionPathFinder,
    ConversionRegistry, GraphPathFinder, ScalarConversionPath, ScalarConversionPathCache,
    ScalarConversionPaths,
};
pub use error::{CatalogError, ClosestCandidate, ResolutionFailure};
pub use library::{LibraryEntry, LibraryGraph, NameResolutionPath, ResolutionLevel};
pub use operator::{
    BoundOperator, ConversionContext, Operator, OperatorBinding, OperatorDef, OperatorMap,
    OperatorMaps, OperatorMatch, OperatorMatches, OperatorSignature, OperatorSignatures,
};
pub use types::{ScalarTypeEntry, TypeRegistry};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=catalog_resolve=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
