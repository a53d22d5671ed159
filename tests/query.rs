use cord_miner::search::elastic::{query_format, MAX_QUERY_LEN};

#[test]
fn punctuation_is_mapped_to_spaces() {
    assert_eq!(query_format("flu, cough", "sentence"), "sentence:(flu  cough)");
}

#[test]
fn boolean_connectors_are_removed() {
    assert_eq!(query_format("cats AND dogs", "sentence"), "sentence:(cats dogs)");
    assert_eq!(query_format("cats and dogs", "sentence"), "sentence:(cats dogs)");
}

#[test]
fn long_queries_are_truncated() {
    let query = "a".repeat(MAX_QUERY_LEN * 2);
    let formatted = query_format(&query, "sentence");
    assert_eq!(formatted.len(), "sentence:()".len() + MAX_QUERY_LEN);
}
