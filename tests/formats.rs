//! Output formats over real FML token trees

use fml_highlight::formats::FormatRegistry;
use fml_highlight::languages::fml;
use serde_json::{json, Value};

fn render(source: &str, format: &str) -> String {
    FormatRegistry::with_defaults()
        .serialize(&fml::tokenize(source), format)
        .unwrap()
}

#[test]
fn test_tree_metadata_line() {
    insta::assert_snapshot!(render("/// url = 'http://x.org/m'\n", "tree"), @r###"
    metadata-info
      comment "///"
      · " "
      metadata-key/property "url"
      · " "
      metadata-value
        operator "="
        · " "
        string "'http://x.org/m'"
    · "\n"
    "###);
}

#[test]
fn test_tree_rule() {
    insta::assert_snapshot!(render("src.id -> tgt.id;", "tree"), @r###"
    path "src.id"
    · " "
    transformation-arrow/operator "->"
    · " "
    path "tgt.id"
    punctuation ";"
    "###);
}

#[test]
fn test_json_matches_token_shape() {
    let value: Value = serde_json::from_str(&render("map \"http://a.org\"", "json")).unwrap();
    assert_eq!(
        value,
        json!([
            {"type": "structure-keyword", "content": "map", "alias": "keyword"},
            " ",
            {
                "type": "string",
                "content": ["\"", {"type": "url", "content": "http://a.org"}, "\""]
            }
        ])
    );
}

#[test]
fn test_json_empty_input() {
    let value: Value = serde_json::from_str(&render("", "json")).unwrap();
    assert_eq!(value, json!([""]));
}

#[test]
fn test_html_spans() {
    assert_eq!(
        render("a << b", "html"),
        "<span class=\"token identifier\">a</span> \
         <span class=\"token conceptmap-operator operator\">&lt;&lt;</span> \
         <span class=\"token identifier\">b</span>"
    );
}
