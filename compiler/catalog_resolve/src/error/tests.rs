use super::*;
use catalog_ir::SignatureElement;
use pretty_assertions::assert_eq;

#[test]
fn catalog_error_codes() {
    assert_eq!(
        CatalogError::UnknownOperator(OperatorId::new(3)).code(),
        ErrorCode::E2002
    );
    assert_eq!(
        CatalogError::ReservedType(Idx::GENERIC).code(),
        ErrorCode::E2008
    );
    assert_eq!(
        CatalogError::UnknownLibrary(LibraryId::SYSTEM).code(),
        ErrorCode::E2005
    );
}

#[test]
fn exhausted_id_space_is_an_internal_error() {
    let interner = StringInterner::new();
    let error = CatalogError::CapacityExceeded { kind: "operator" };

    assert_eq!(error.code(), ErrorCode::E9001);
    let diag = error.to_diagnostic(&interner);
    assert_eq!(diag.to_string(), "error[E9001]: no free operator ids left");
}

#[test]
fn duplicate_signature_diagnostic_names_operator() {
    let interner = StringInterner::new();
    let name = interner.intern("Math.Add");
    let error = CatalogError::DuplicateSignature {
        name,
        existing: OperatorId::new(7),
    };

    let diag = error.to_diagnostic(&interner);
    assert_eq!(diag.code, ErrorCode::E2001);
    assert_eq!(
        diag.message,
        "operator `Math.Add` already has an overload with this signature"
    );
    assert_eq!(diag.notes, vec!["the existing overload is OperatorId(7)"]);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn not_found_diagnostic() {
    let interner = StringInterner::new();
    let types = TypeRegistry::new(&interner);
    let failure = ResolutionFailure::NotFound {
        name: interner.intern("Frobnicate"),
    };

    assert_eq!(failure.code(), ErrorCode::E1001);
    let diag = failure.to_diagnostic(&interner, &types);
    assert_eq!(diag.message, "unknown operator `Frobnicate`");
}

#[test]
fn no_matching_signature_suggests_closest() {
    let interner = StringInterner::new();
    let mut types = TypeRegistry::new(&interner);
    let integer = types
        .register(interner.intern("Integer"), None, None)
        .expect("fresh");
    let text = types
        .register(interner.intern("Text"), None, None)
        .expect("fresh");
    let name = interner.intern("Add");

    let failure = ResolutionFailure::NoMatchingSignature {
        name,
        signature: Signature::from_types(&[text]),
        candidates: vec![name],
        closest: Some(ClosestCandidate {
            operator: OperatorId::new(0),
            name,
            signature: Signature::new([SignatureElement::value(integer)]),
        }),
    };

    let diag = failure.to_diagnostic(&interner, &types);
    assert_eq!(diag.code, ErrorCode::E1002);
    assert_eq!(diag.message, "no overload of `Add` accepts (Text)");
    assert_eq!(diag.notes, vec!["candidates: Add"]);
    assert_eq!(diag.suggestions[0].message, "did you mean `Add(Integer)`?");
}

#[test]
fn ambiguous_diagnostic_lists_candidates() {
    let interner = StringInterner::new();
    let types = TypeRegistry::new(&interner);
    let failure = ResolutionFailure::Ambiguous {
        name: interner.intern("Max"),
        signature: Signature::from_types(&[Idx::GENERIC]),
        candidates: vec![interner.intern("A.Max"), interner.intern("B.Max")],
    };

    let diag = failure.to_diagnostic(&interner, &types);
    assert_eq!(diag.code, ErrorCode::E1003);
    assert_eq!(diag.message, "ambiguous call to `Max` with (generic)");
    assert_eq!(diag.notes, vec!["candidates: A.Max, B.Max"]);
}
