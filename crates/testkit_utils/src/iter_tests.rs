use super::*;

#[test]
fn test_pairs_preserves_order() {
    let collected: Vec<_> = pairs([("a", 1), ("b", 2), ("c", 3)]).collect();
    assert_eq!(collected, vec![("a", 1), ("b", 2), ("c", 3)]);
}

#[test]
fn test_pairs_stops_when_consumer_stops() {
    let first: Vec<_> = pairs(vec![(1, "x"), (2, "y"), (3, "z")]).take(1).collect();
    assert_eq!(first, vec![(1, "x")]);
}

#[test]
fn test_check_pairs_accepts_subset_in_any_order() {
    let expected = [("a", 1), ("b", 2), ("c", 3)];
    check_pairs(pairs([("c", 3), ("a", 1)]), &expected);
}

#[test]
fn test_check_pairs_accepts_empty_iterator() {
    let expected: [(&str, i32); 1] = [("a", 1)];
    check_pairs(std::iter::empty(), &expected);
}

#[test]
#[should_panic(expected = "unexpected value: \"b\", 5")]
fn test_check_pairs_rejects_unknown_value() {
    let expected = [("a", 1), ("b", 2)];
    check_pairs(pairs([("a", 1), ("b", 5)]), &expected);
}

#[test]
#[should_panic(expected = "unexpected value")]
fn test_check_pairs_checks_every_pair() {
    // A matching first pair must not end the check early
    let expected = [(1, 'x')];
    check_pairs(pairs([(1, 'x'), (2, 'y')]), &expected);
}
