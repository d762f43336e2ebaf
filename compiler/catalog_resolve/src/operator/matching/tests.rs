use super::*;
use crate::conversion::ConversionEdge;
use catalog_ir::{ConversionId, Name};
use pretty_assertions::assert_eq;

const SHORT: Idx = Idx::from_raw(1);
const INTEGER: Idx = Idx::from_raw(2);
const DECIMAL: Idx = Idx::from_raw(3);

fn overload(operator: u32, types: &[Idx]) -> OperatorSignature {
    OperatorSignature {
        operator: OperatorId::new(operator),
        name: Name::EMPTY,
        library: None,
        signature: Signature::from_types(types),
    }
}

/// A path of `length` hops, the first `narrowing` of which narrow.
fn path(length: u32, narrowing: u32) -> ScalarConversionPath {
    ScalarConversionPath::from_edges((0..length).map(|i| ConversionEdge {
        id: ConversionId::new(i),
        source: Idx::from_raw(100 + i),
        target: Idx::from_raw(101 + i),
        narrowing: i < narrowing,
    }))
}

/// A candidate that converts every position through `paths`.
fn converting<'a>(
    overload: &'a OperatorSignature,
    paths: &[Option<ScalarConversionPath>],
) -> OperatorMatch<'a> {
    let mut candidate = OperatorMatch::new(overload);
    for p in paths {
        candidate.push_conversion(ConversionContext::new(SHORT, INTEGER, p.clone()));
    }
    candidate
}

#[test]
fn exact_candidate() {
    let add = overload(0, &[INTEGER, INTEGER]);
    let candidate = OperatorMatch::exact(&add);
    assert!(candidate.is_exact());
    assert!(candidate.is_match());
    assert!(!candidate.is_partial());
    assert_eq!(candidate.narrowing_score(), 0);
    assert_eq!(candidate.path_length(), 0);
    assert_eq!(candidate.conversions().len(), 2);
    assert!(candidate.conversions().iter().all(Option::is_none));
}

#[test]
fn compatible_positions_are_exact() {
    let add = overload(0, &[Idx::GENERIC]);
    let mut candidate = OperatorMatch::new(&add);
    candidate.push_compatible();
    assert!(candidate.is_exact());
}

#[test]
fn conversions_accumulate() {
    let add = overload(0, &[INTEGER, DECIMAL]);
    let mut candidate = OperatorMatch::new(&add);
    candidate.push_compatible();
    candidate.push_conversion(ConversionContext::new(SHORT, DECIMAL, Some(path(2, 1))));

    assert!(candidate.is_partial());
    assert_eq!(candidate.narrowing_score(), -1);
    assert_eq!(candidate.path_length(), 2);
    assert_eq!(candidate.convertible_count(), 2);
}

#[test]
fn unconvertible_position_saturates() {
    let add = overload(0, &[INTEGER, DECIMAL, DECIMAL]);
    let mut candidate = OperatorMatch::new(&add);
    candidate.push_conversion(ConversionContext::new(SHORT, INTEGER, Some(path(1, 1))));
    candidate.push_unconvertible();
    candidate.push_conversion(ConversionContext::new(SHORT, DECIMAL, Some(path(1, 0))));

    assert!(!candidate.is_match());
    assert!(!candidate.is_exact());
    assert_eq!(candidate.narrowing_score(), i32::MIN);
    assert_eq!(candidate.path_length(), usize::MAX);
    assert_eq!(candidate.convertible_count(), 2);
    assert_eq!(candidate.partial_narrowing_score(), -1);
    assert_eq!(candidate.partial_path_length(), 2);
}

#[test]
fn exact_outranks_partial() {
    let a = overload(0, &[INTEGER]);
    let b = overload(1, &[DECIMAL]);
    let mut matches = OperatorMatches::new();
    matches.add(converting(&a, &[Some(path(1, 0))]));
    matches.add(OperatorMatch::exact(&b));

    assert!(matches.is_exact());
    assert!(!matches.is_ambiguous());
    assert_eq!(
        matches.best_match().map(OperatorMatch::operator),
        Some(OperatorId::new(1))
    );
}

#[test]
fn higher_narrowing_score_wins() {
    let a = overload(0, &[INTEGER]);
    let b = overload(1, &[DECIMAL]);
    let mut matches = OperatorMatches::new();
    matches.add(converting(&a, &[Some(path(1, 1))]));
    matches.add(converting(&b, &[Some(path(3, 0))]));

    assert!(matches.is_partial());
    assert_eq!(matches.best_narrowing_score(), 0);
    assert_eq!(
        matches.best_match().map(OperatorMatch::operator),
        Some(OperatorId::new(1))
    );
}

#[test]
fn shorter_wins_on_equal_score() {
    let a = overload(0, &[INTEGER]);
    let b = overload(1, &[DECIMAL]);
    let mut matches = OperatorMatches::new();
    matches.add(converting(&a, &[Some(path(2, 0))]));
    matches.add(converting(&b, &[Some(path(1, 0))]));

    assert_eq!(matches.shortest_path_length(), 1);
    assert_eq!(
        matches.best_match().map(OperatorMatch::operator),
        Some(OperatorId::new(1))
    );
}

#[test]
fn tied_partials_are_ambiguous() {
    let a = overload(0, &[INTEGER]);
    let b = overload(1, &[DECIMAL]);
    let mut matches = OperatorMatches::new();
    matches.add(converting(&a, &[Some(path(1, 0))]));
    matches.add(converting(&b, &[Some(path(1, 0))]));

    assert!(matches.best_match().is_none());
    assert!(matches.is_ambiguous());
    assert!(!matches.is_exact());
}

#[test]
fn colliding_exacts_do_not_bind() {
    let a = overload(0, &[INTEGER]);
    let b = overload(1, &[INTEGER]);
    let mut matches = OperatorMatches::new();
    matches.add(OperatorMatch::exact(&a));
    matches.add(OperatorMatch::exact(&b));

    assert!(matches.best_match().is_none());
    assert!(matches.is_ambiguous());
}

#[test]
fn duplicate_operator_rejected() {
    let a = overload(0, &[INTEGER]);
    let mut matches = OperatorMatches::new();
    assert!(matches.add(OperatorMatch::exact(&a)));
    assert!(!matches.add(converting(&a, &[Some(path(1, 0))])));
    assert_eq!(matches.len(), 1);
}

#[test]
fn remove_recomputes_selection() {
    let a = overload(0, &[INTEGER]);
    let b = overload(1, &[DECIMAL]);
    let mut matches = OperatorMatches::new();
    matches.add(converting(&a, &[Some(path(1, 0))]));
    matches.add(converting(&b, &[Some(path(1, 0))]));
    assert!(matches.best_match().is_none());

    let removed = matches.remove(OperatorId::new(0)).expect("present");
    assert_eq!(removed.operator(), OperatorId::new(0));
    assert_eq!(
        matches.best_match().map(OperatorMatch::operator),
        Some(OperatorId::new(1))
    );

    matches.clear();
    assert!(matches.is_empty());
    assert_eq!(matches.best_narrowing_score(), i32::MIN);
}

#[test]
fn unconvertible_candidates_never_bind() {
    let a = overload(0, &[INTEGER]);
    let mut matches = OperatorMatches::new();
    matches.add(converting(&a, &[None]));

    assert_eq!(matches.len(), 1);
    assert!(matches.best_match().is_none());
    assert!(!matches.is_ambiguous());
}

#[test]
fn pruning_against_current_best() {
    let a = overload(0, &[INTEGER, INTEGER]);
    let b = overload(1, &[DECIMAL, DECIMAL]);
    let mut matches = OperatorMatches::new();

    let early = converting(&b, &[Some(path(1, 1))]);
    assert!(!matches.would_prune(&early));

    matches.add(converting(&a, &[Some(path(1, 0)), Some(path(1, 0))]));
    assert!(matches.would_prune(&early));
    assert!(matches.would_prune(&converting(&b, &[Some(path(3, 0))])));
    assert!(!matches.would_prune(&converting(&b, &[Some(path(2, 0))])));
}

#[test]
fn closest_match_prefers_more_convertible_positions() {
    let a = overload(0, &[INTEGER, INTEGER]);
    let b = overload(1, &[DECIMAL, DECIMAL]);
    let mut matches = OperatorMatches::new();
    matches.add(converting(&a, &[Some(path(1, 1)), None]));
    matches.add(converting(&b, &[None, None]));

    assert!(matches.best_match().is_none());
    assert_eq!(
        matches.closest_match().map(OperatorMatch::operator),
        Some(OperatorId::new(0))
    );
}

#[test]
fn closest_match_tie_breaks_on_score_then_length() {
    let a = overload(0, &[INTEGER, INTEGER]);
    let b = overload(1, &[DECIMAL, DECIMAL]);
    let c = overload(2, &[SHORT, SHORT]);
    let mut matches = OperatorMatches::new();
    matches.add(converting(&a, &[Some(path(1, 1)), None]));
    matches.add(converting(&b, &[Some(path(2, 0)), None]));
    matches.add(converting(&c, &[Some(path(3, 0)), None]));

    assert_eq!(
        matches.closest_match().map(OperatorMatch::operator),
        Some(OperatorId::new(1))
    );
}

#[test]
fn closest_match_requires_unique_winner() {
    let a = overload(0, &[INTEGER]);
    let b = overload(1, &[DECIMAL]);
    let mut matches = OperatorMatches::new();
    matches.add(converting(&a, &[None]));
    matches.add(converting(&b, &[None]));

    assert!(matches.closest_match().is_none());
}
