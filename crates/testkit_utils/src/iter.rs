//! Key/value pair iterators and assertions over them.

use std::fmt::Debug;

/// Iterate over `(key, value)` pairs in the given order.
///
/// Handy for feeding a fixed sequence into code that consumes an iterator of
/// pairs; the consumer may stop early.
pub fn pairs<K, V, I>(values: I) -> impl Iterator<Item = (K, V)>
where
    I: IntoIterator<Item = (K, V)>,
{
    values.into_iter()
}

/// Assert that every pair produced by `iter` appears in `expected`.
///
/// Panics at the caller's location on the first pair that is not expected.
/// Order is not checked and expected pairs may go unseen.
#[track_caller]
pub fn check_pairs<K, V, I>(iter: I, expected: &[(K, V)])
where
    I: IntoIterator<Item = (K, V)>,
    K: PartialEq + Debug,
    V: PartialEq + Debug,
{
    for (key, value) in iter {
        let found = expected.iter().any(|(k, v)| *k == key && *v == value);
        if !found {
            panic!("unexpected value: {:?}, {:?}", key, value);
        }
    }
}

#[cfg(test)]
#[path = "iter_tests.rs"]
mod tests;
