use super::*;
use crate::entry_config::{
    FieldMatcherConfig, FieldMatcherType, FieldType, VALUE_PATH_LITERAL, VALUE_PATH_PASSWORD,
    VALUE_PATH_USERNAME,
};

fn field_with(value_path: &str, matcher_configs: Vec<FieldMatcherConfig>) -> Field {
    Field {
        uuid: "field-1".to_string(),
        name: None,
        value: None,
        value_path: value_path.to_string(),
        field_type: FieldType::Text,
        page: 1,
        placeholder_handling: None,
        matcher_configs,
    }
}

fn custom(ids: &[&str], names: &[&str], html_type: Option<&str>, selector: Option<&str>) -> FieldMatcherConfig {
    FieldMatcherConfig {
        matcher_type: Some(FieldMatcherType::Custom),
        custom_matcher: Some(CustomMatcher {
            ids: ids.iter().map(|s| s.to_string()).collect(),
            names: names.iter().map(|s| s.to_string()).collect(),
            html_type: html_type.map(String::from),
            query_selector: selector.map(String::from),
        }),
    }
}

fn dom(id: Option<&str>, name: Option<&str>, html_type: Option<&str>) -> DomField {
    DomField {
        id: id.map(String::from),
        name: name.map(String::from),
        html_type: html_type.map(String::from),
        ..DomField::default()
    }
}

#[test]
fn test_first_id_match_wins() {
    let field = field_with(VALUE_PATH_LITERAL, vec![custom(&["pwd1"], &[], None, None)]);
    let candidates = vec![dom(Some("pwd1"), None, None), dom(Some("pwd2"), None, None)];

    let bound = resolve_binding(&field, &candidates).unwrap();
    assert_eq!(bound.id.as_deref(), Some("pwd1"));
}

#[test]
fn test_id_before_name() {
    let field = field_with(VALUE_PATH_LITERAL, vec![custom(&["email"], &["login"], None, None)]);
    let candidates = vec![dom(Some("other"), Some("login"), None), dom(Some("email"), None, None)];

    let binding = bind_field(&field, &candidates, &SimpleSelectorEngine);
    assert_eq!(binding.candidate_index, Some(1));
    assert_eq!(binding.rule, BindingRule::Id);
}

#[test]
fn test_ids_are_tried_in_order() {
    let field = field_with(VALUE_PATH_LITERAL, vec![custom(&["missing", "second"], &[], None, None)]);
    let candidates = vec![dom(Some("second"), None, None)];
    assert_eq!(bind_field(&field, &candidates, &SimpleSelectorEngine).candidate_index, Some(0));
}

#[test]
fn test_name_when_no_id_matches() {
    let field = field_with(VALUE_PATH_LITERAL, vec![custom(&["gone"], &["login"], None, None)]);
    let candidates = vec![dom(Some("a"), Some("search"), None), dom(Some("b"), Some("login"), None)];

    let binding = bind_field(&field, &candidates, &SimpleSelectorEngine);
    assert_eq!(binding.candidate_index, Some(1));
    assert_eq!(binding.rule, BindingRule::Name);
}

#[test]
fn test_html_type_only_matcher() {
    let field = field_with(VALUE_PATH_LITERAL, vec![custom(&[], &[], Some("email"), None)]);
    let candidates = vec![dom(None, None, Some("checkbox")), dom(None, Some("e"), Some("text"))];

    let binding = bind_field(&field, &candidates, &SimpleSelectorEngine);
    assert_eq!(binding.candidate_index, Some(1));
    assert_eq!(binding.rule, BindingRule::HtmlType);

}

#[test]
fn test_html_type_after_missing_ids_and_names() {
    let field = field_with(
        VALUE_PATH_LITERAL,
        vec![custom(&["user"], &["login"], Some("email"), None)],
    );
    let candidates = vec![dom(Some("other"), None, Some("email"))];

    let binding = bind_field(&field, &candidates, &SimpleSelectorEngine);
    assert_eq!(binding.candidate_index, Some(0));
    assert_eq!(binding.rule, BindingRule::HtmlType);

    // An id hit still wins over a type-compatible candidate earlier on the page
    let candidates = vec![dom(Some("other"), None, Some("email")), dom(Some("user"), None, Some("text"))];
    let binding = bind_field(&field, &candidates, &SimpleSelectorEngine);
    assert_eq!(binding.candidate_index, Some(1));
    assert_eq!(binding.rule, BindingRule::Id);

    // No type on the matcher and no id/name hit leaves the field unbound
    let field = field_with(VALUE_PATH_LITERAL, vec![custom(&["gone"], &[], None, None)]);
    assert_eq!(bind_field(&field, &candidates, &SimpleSelectorEngine).rule, BindingRule::Unbound);
}

#[test]
fn test_query_selector_is_authoritative() {
    let field = field_with(
        VALUE_PATH_LITERAL,
        vec![custom(&["pwd1"], &["password"], None, Some("input[name=otp]"))],
    );
    let candidates = vec![
        dom(Some("pwd1"), Some("password"), Some("password")),
        dom(Some("code"), Some("otp"), None),
    ];
    let binding = bind_field(&field, &candidates, &SimpleSelectorEngine);
    assert_eq!(binding.candidate_index, Some(1));
    assert_eq!(binding.rule, BindingRule::QuerySelector);

    // No selector hit means no binding even though the id would match
    let field = field_with(VALUE_PATH_LITERAL, vec![custom(&["pwd1"], &[], None, Some("#nowhere"))]);
    let binding = bind_field(&field, &candidates, &SimpleSelectorEngine);
    assert_eq!(binding.candidate_index, None);
    assert_eq!(binding.rule, BindingRule::Unbound);
}

struct EverythingMatches;

impl SelectorEngine for EverythingMatches {
    fn matches(&self, _candidate: &DomField, _selector: &str) -> bool {
        true
    }
}

#[test]
fn test_host_selector_engine_and_ambiguity() {
    let field = field_with(VALUE_PATH_LITERAL, vec![custom(&[], &[], None, Some("div:has(> input)"))]);
    let candidates = vec![dom(Some("a"), None, None), dom(Some("b"), None, None)];

    let binding = bind_field(&field, &candidates, &EverythingMatches);
    assert_eq!(binding.candidate_index, Some(0));
    assert_eq!(
        binding.diagnostics,
        vec![Diagnostic::MatcherResolutionAmbiguous {
            field_uuid: "field-1".to_string(),
            candidates: 2,
        }]
    );
}

#[test]
fn test_first_custom_matcher_is_used() {
    let field = field_with(
        VALUE_PATH_LITERAL,
        vec![
            FieldMatcherConfig {
                matcher_type: Some(FieldMatcherType::PasswordDefaultHeuristic),
                custom_matcher: Some(CustomMatcher {
                    ids: vec!["ignored".to_string()],
                    ..CustomMatcher::default()
                }),
            },
            FieldMatcherConfig {
                matcher_type: None,
                custom_matcher: Some(CustomMatcher {
                    ids: vec!["used".to_string()],
                    ..CustomMatcher::default()
                }),
            },
        ],
    );
    let candidates = vec![dom(Some("ignored"), None, None), dom(Some("used"), None, None)];
    assert_eq!(bind_field(&field, &candidates, &SimpleSelectorEngine).candidate_index, Some(1));
}

#[test]
fn test_standard_references_without_custom_matcher() {
    let mut username_dom = dom(Some("u"), None, None);
    username_dom.recognized_as = Some(StandardField::Username);
    let candidates = vec![dom(Some("search"), None, None), username_dom, dom(Some("p"), None, Some("password"))];

    let username = field_with(VALUE_PATH_USERNAME, vec![]);
    let binding = bind_field(&username, &candidates, &SimpleSelectorEngine);
    assert_eq!(binding.candidate_index, Some(1));
    assert_eq!(binding.rule, BindingRule::StandardUsername);

    let password = field_with(VALUE_PATH_PASSWORD, vec![]);
    let binding = bind_field(&password, &candidates, &SimpleSelectorEngine);
    assert_eq!(binding.candidate_index, Some(2));
    assert_eq!(binding.rule, BindingRule::StandardPassword);

    let other = field_with("customKey", vec![]);
    assert!(resolve_binding(&other, &candidates).is_none());
}

#[test]
fn test_bind_fields_json_api() {
    let input_json = r#"{
        "fields": [
            {"uuid": "a", "valuePath": ".", "type": "Text",
             "matcherConfigs": [{"matcherType": "Custom", "customMatcher": {"ids": ["pwd1"]}}]},
            {"uuid": "b", "valuePath": "notes", "type": "Text"}
        ],
        "candidates": [{"id": "pwd1"}, {"id": "pwd2"}]
    }"#;

    let output_json = bind_fields_json(input_json).unwrap();
    let output: FieldMatcherOutput = serde_json::from_str(&output_json).unwrap();
    assert_eq!(output.bindings.len(), 2);
    assert_eq!(output.bindings[0].candidate_index, Some(0));
    assert_eq!(output.bindings[1].rule, BindingRule::Unbound);
}

#[test]
fn test_host_json_uses_camel_case_keys() {
    let input_json = r#"{
        "fields": [{"uuid": "p", "valuePath": "password", "type": "Password"}],
        "candidates": [
            {"id": "q", "htmlType": "search", "tagName": "input"},
            {"id": "pw", "htmlType": "password", "recognizedAs": "Password"}
        ]
    }"#;

    let output_json = bind_fields_json(input_json).unwrap();
    let output: serde_json::Value = serde_json::from_str(&output_json).unwrap();
    let binding = &output["bindings"][0];
    assert_eq!(binding["fieldUuid"], "p");
    assert_eq!(binding["candidateIndex"], 1);
    assert_eq!(binding["rule"], "standardPassword");
}
