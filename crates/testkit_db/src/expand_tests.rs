use super::*;
use std::collections::HashMap;

fn expand_with(input: &str, values: &[(&str, &str)]) -> String {
    let values: HashMap<String, String> = values
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    expand(input, |name| values.get(name).cloned())
}

#[test]
fn test_expand_braced_and_bare_names() {
    let out = expand_with(
        "SET search_path TO ${schema}; SELECT '$table';",
        &[("schema", "tenant_1"), ("table", "accounts")],
    );
    assert_eq!(out, "SET search_path TO tenant_1; SELECT 'accounts';");
}

#[test]
fn test_expand_unknown_names_become_empty() {
    assert_eq!(expand_with("a${missing}b", &[]), "ab");
    assert_eq!(expand_with("a $missing b", &[]), "a  b");
}

#[test]
fn test_expand_name_stops_at_non_name_byte() {
    assert_eq!(
        expand_with("$schema.accounts", &[("schema", "s1")]),
        "s1.accounts"
    );
}

#[test]
fn test_expand_special_single_character_names() {
    assert_eq!(
        expand_with("$1abc $$ ${#}", &[("1", "one"), ("$", "dollar"), ("#", "hash")]),
        "oneabc dollar hash"
    );
}

#[test]
fn test_expand_keeps_dollar_without_name() {
    assert_eq!(expand_with("price: $ 5", &[]), "price: $ 5");
    assert_eq!(expand_with("ends with $", &[]), "ends with $");
    assert_eq!(expand_with("$.field", &[]), "$.field");
}

#[test]
fn test_expand_drops_malformed_braces() {
    assert_eq!(expand_with("a${}b", &[]), "ab");
    assert_eq!(expand_with("a${unterminated", &[]), "aunterminated");
}

#[test]
fn test_expand_without_references_is_identity() {
    let sql = "CREATE TABLE t (id INT PRIMARY KEY); -- ünïcode ok";
    assert_eq!(expand_with(sql, &[("id", "x")]), sql);
}

#[test]
fn test_expand_handles_utf8_around_references() {
    assert_eq!(
        expand_with("é${name}ü", &[("name", "ß")]),
        "éßü"
    );
}
