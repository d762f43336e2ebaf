//! End-to-end resolution scenarios against the public `Catalog` API.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use catalog_ir::{Idx, LibraryId, Name, OperatorId, Signature};
use catalog_resolve::{
    CachedPath, Catalog, CatalogError, ConversionDef, GraphPathFinder, NameResolutionPath,
    OperatorDef, ResolutionFailure, ResolutionLevel, ResolveContext, ScalarConversionPathCache,
};
use pretty_assertions::assert_eq;

struct Fixture {
    catalog: Catalog,
    short: Idx,
    integer: Idx,
    long: Idx,
    decimal: Idx,
    add: Name,
}

impl Fixture {
    fn new() -> Self {
        catalog_resolve::init_tracing();
        let mut catalog = Catalog::default();
        let short = catalog.add_scalar_type("Short", None, None).unwrap();
        let integer = catalog.add_scalar_type("Integer", None, None).unwrap();
        let long = catalog.add_scalar_type("Long", None, None).unwrap();
        let decimal = catalog.add_scalar_type("Decimal", None, None).unwrap();
        let add = catalog.intern("Add");
        Fixture {
            catalog,
            short,
            integer,
            long,
            decimal,
            add,
        }
    }

    fn widening(&mut self, source: Idx, target: Idx) {
        let name = self.catalog.intern("Widen");
        self.catalog
            .add_conversion(ConversionDef::widening(name, source, target))
            .unwrap();
    }

    fn add_overload(&mut self, params: &[Idx]) -> OperatorId {
        self.catalog
            .add_operator(OperatorDef::new(self.add, Signature::from_types(params)))
            .unwrap()
    }

    fn call_add(&mut self, args: &[Idx]) -> Option<OperatorId> {
        let path = system_path();
        self.catalog
            .resolve_call(self.add, &path, &Signature::from_types(args), false)
            .operator_id()
    }
}

fn system_path() -> NameResolutionPath {
    NameResolutionPath::new(vec![ResolutionLevel::new([LibraryId::SYSTEM])])
}

#[test]
fn scenario_a_exact_overload_wins() {
    let mut fx = Fixture::new();
    let (integer, decimal) = (fx.integer, fx.decimal);
    fx.widening(integer, decimal);
    let int_int = fx.add_overload(&[integer, integer]);
    fx.add_overload(&[integer, decimal]);

    let path = system_path();
    let binding =
        fx.catalog
            .resolve_call(fx.add, &path, &Signature::from_types(&[integer, integer]), false);
    let bound = binding.operator.expect("bound");
    assert_eq!(bound.operator, int_int);
    assert!(bound.is_exact);
    assert!(bound.conversions.iter().all(Option::is_none));
}

#[test]
fn scenario_b_equal_conversions_are_ambiguous() {
    let mut fx = Fixture::new();
    let (short, integer, decimal) = (fx.short, fx.integer, fx.decimal);
    fx.widening(short, integer);
    fx.widening(short, decimal);
    fx.add_overload(&[integer, integer]);
    fx.add_overload(&[decimal, decimal]);

    let path = system_path();
    let binding =
        fx.catalog
            .resolve_call(fx.add, &path, &Signature::from_types(&[short, short]), false);
    assert!(!binding.is_resolved());
    match binding.failure() {
        Some(ResolutionFailure::Ambiguous { candidates, .. }) => {
            assert_eq!(candidates, vec![fx.add]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[test]
fn scenario_c_shorter_conversion_wins() {
    let mut fx = Fixture::new();
    let (short, integer, long, decimal) = (fx.short, fx.integer, fx.long, fx.decimal);
    fx.widening(short, integer);
    fx.widening(short, long);
    fx.widening(long, decimal);
    let int_int = fx.add_overload(&[integer, integer]);
    fx.add_overload(&[decimal, decimal]);

    assert_eq!(fx.call_add(&[short, short]), Some(int_int));
}

#[test]
fn scenario_d_clearing_a_type_keeps_unrelated_entries() {
    let mut fx = Fixture::new();
    let (short, integer, decimal) = (fx.short, fx.integer, fx.decimal);
    fx.widening(short, integer);
    fx.widening(short, decimal);

    let finder = GraphPathFinder::new(
        fx.catalog.conversions(),
        fx.catalog.config().max_conversion_path_length,
    );
    let mut cache = ScalarConversionPathCache::new();
    {
        let mut ctx =
            ResolveContext::new(fx.catalog.types(), &finder, &mut cache, fx.catalog.config());
        assert!(ctx.conversion_path(short, decimal).is_some());
        assert!(ctx.conversion_path(short, integer).is_some());
    }

    cache.clear_scalar_type(decimal);
    assert_eq!(cache.get(short, decimal), CachedPath::Unknown);
    assert!(matches!(cache.get(short, integer), CachedPath::Path(_)));
}

#[test]
fn scenario_e_resolves_at_system_level() {
    let mut catalog = Catalog::default();
    let base = catalog.create_library("Base", &[]).unwrap();
    let app = catalog.create_library("App", &[base]).unwrap();
    let foo = catalog.intern("Foo");
    let op = catalog
        .add_operator(OperatorDef::new(foo, Signature::empty()).in_library(LibraryId::SYSTEM))
        .unwrap();

    let path = catalog.name_resolution_path(app).unwrap();
    assert_eq!(path.len(), 3);
    assert!(path.levels()[2].contains(LibraryId::SYSTEM));

    let binding = catalog.resolve_call(foo, &path, &Signature::empty(), false);
    assert_eq!(binding.operator_id(), Some(op));
}

#[test]
fn failed_duplicate_insert_keeps_binding() {
    let mut fx = Fixture::new();
    let integer = fx.integer;
    let original = fx.add_overload(&[integer, integer]);
    let before = fx.call_add(&[integer, integer]);

    let result = fx
        .catalog
        .add_operator(OperatorDef::new(fx.add, Signature::from_types(&[integer, integer])));
    assert_eq!(
        result,
        Err(CatalogError::DuplicateSignature {
            name: fx.add,
            existing: original
        })
    );
    assert_eq!(fx.call_add(&[integer, integer]), before);
    assert_eq!(before, Some(original));
}

#[test]
fn exact_match_outside_path_found_by_fallback() {
    let mut catalog = Catalog::default();
    let integer = catalog.add_scalar_type("Integer", None, None).unwrap();
    let app = catalog.create_library("App", &[]).unwrap();
    let other = catalog.create_library("Other", &[]).unwrap();
    let name = catalog.intern("Other.Scale");
    let op = catalog
        .add_operator(OperatorDef::new(name, Signature::from_types(&[integer])).in_library(other))
        .unwrap();

    let binding = catalog
        .resolve_in_library(app, "Scale", &Signature::from_types(&[integer]))
        .unwrap();
    assert_eq!(binding.operator_id(), Some(op));
}

#[test]
fn nearer_library_shadows_system() {
    let mut catalog = Catalog::default();
    let integer = catalog.add_scalar_type("Integer", None, None).unwrap();
    let app = catalog.create_library("App", &[]).unwrap();
    let system_abs = catalog.intern("System.Abs");
    let app_abs = catalog.intern("App.Abs");
    let signature = Signature::from_types(&[integer]);
    catalog
        .add_operator(OperatorDef::new(system_abs, signature.clone()).in_library(LibraryId::SYSTEM))
        .unwrap();
    let mine = catalog
        .add_operator(OperatorDef::new(app_abs, signature.clone()).in_library(app))
        .unwrap();

    let binding = catalog.resolve_in_library(app, "Abs", &signature).unwrap();
    assert_eq!(binding.operator_id(), Some(mine));
    assert_eq!(binding.operator.map(|b| b.map), Some(app_abs));
}

#[test]
fn subtype_argument_needs_no_conversion() {
    let mut catalog = Catalog::default();
    let number = catalog.add_scalar_type("Number", None, None).unwrap();
    let money = catalog
        .add_scalar_type("Money", Some(number), None)
        .unwrap();
    let negate = catalog.intern("Negate");
    let op = catalog
        .add_operator(OperatorDef::new(negate, Signature::from_types(&[number])))
        .unwrap();

    let binding = catalog.resolve_call(
        negate,
        &system_path(),
        &Signature::from_types(&[money]),
        false,
    );
    let bound = binding.operator.expect("bound");
    assert_eq!(bound.operator, op);
    assert!(bound.is_exact);
}

#[test]
fn exact_only_call_ignores_conversions() {
    let mut fx = Fixture::new();
    let (short, integer) = (fx.short, fx.integer);
    fx.widening(short, integer);
    fx.add_overload(&[integer]);

    let path = system_path();
    let args = Signature::from_types(&[short]);
    assert!(!fx.catalog.resolve_call(fx.add, &path, &args, true).is_resolved());
    assert!(fx.catalog.resolve_call(fx.add, &path, &args, false).is_resolved());
}
