use tripdata_core::tokenizer::{normalize_query, search_terms};

#[test]
fn it_normalizes_queries_to_one_key() {
    assert_eq!(normalize_query("  Jaipur  "), "jaipur");
    assert_eq!(normalize_query("jaipur"), normalize_query("  JAIPUR\n"));
}

#[test]
fn it_keeps_repeated_terms() {
    let words = search_terms("goa GOA temple");
    assert_eq!(words, vec!["goa".to_string(), "goa".to_string(), "temple".to_string()]);
}

#[test]
fn blank_query_has_no_terms() {
    assert!(search_terms("   ").is_empty());
}
