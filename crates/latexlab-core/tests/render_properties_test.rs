use latexlab_core::template::TemplateEngine;
use latexlab_core::LatexlabError;
use latexlab_testkit::fixtures::{write_fixture_templates, write_template, SIMPLE_CONFIG};
use latexlab_testkit::temp_dir_in_workspace;
use serde_json::{json, Map, Value};

fn vars(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected mapping"),
    }
}

fn assert_no_markers(rendered: &str) {
    for marker in ["<<", ">>", "<%", "%>", "<#", "#>"] {
        assert!(
            !rendered.contains(marker),
            "unresolved marker {} in:\n{}",
            marker,
            rendered
        );
    }
}

#[test]
fn test_required_fields_only_leave_no_markers() {
    let temp = temp_dir_in_workspace();
    write_fixture_templates(temp.path());
    let engine = TemplateEngine::new(temp.path()).unwrap();

    let template = engine.load_template("report").unwrap();
    let rendered = engine
        .render(&template, &vars(json!({"title": "Pendulum"})))
        .unwrap();

    assert_no_markers(&rendered);
    assert!(rendered.contains("\\documentclass[11pt]{article}"));
    assert!(rendered.contains("% pages: 10"));
    assert!(!rendered.contains("abstract"));
}

#[test]
fn test_missing_required_field() {
    let temp = temp_dir_in_workspace();
    write_fixture_templates(temp.path());
    let engine = TemplateEngine::new(temp.path()).unwrap();

    let err = engine
        .generate_document("report", &Map::new(), None, false)
        .unwrap_err();
    assert!(matches!(err, LatexlabError::MissingRequiredField { ref field } if field == "title"));
}

#[test]
fn test_out_of_range_value() {
    let temp = temp_dir_in_workspace();
    write_fixture_templates(temp.path());
    let engine = TemplateEngine::new(temp.path()).unwrap();

    for pages in [json!(0), json!(51), json!("100")] {
        let err = engine
            .generate_document("report", &vars(json!({"title": "T", "pages": pages})), None, false)
            .unwrap_err();
        assert!(matches!(err, LatexlabError::OutOfRange { .. }), "{}", err);
    }
}

#[test]
fn test_invalid_choice_value() {
    let temp = temp_dir_in_workspace();
    write_fixture_templates(temp.path());
    let engine = TemplateEngine::new(temp.path()).unwrap();

    let err = engine
        .generate_document(
            "report",
            &vars(json!({"title": "T", "font_size": "14pt"})),
            None,
            false,
        )
        .unwrap_err();
    assert!(matches!(err, LatexlabError::InvalidChoice { .. }));
    assert!(err.to_string().contains("10pt, 11pt, 12pt"));
}

#[test]
fn test_type_mismatch_value() {
    let temp = temp_dir_in_workspace();
    write_fixture_templates(temp.path());
    let engine = TemplateEngine::new(temp.path()).unwrap();

    let err = engine
        .generate_document("report", &vars(json!({"title": "T", "pages": "ten"})), None, false)
        .unwrap_err();
    assert!(matches!(err, LatexlabError::TypeMismatch { .. }));
}

#[test]
fn test_rendering_is_idempotent() {
    let temp = temp_dir_in_workspace();
    write_fixture_templates(temp.path());
    let variables = vars(json!({
        "title": "Pendulum",
        "pages": "12",
        "abstract": "We swing things.\nThen measure."
    }));

    let first = TemplateEngine::new(temp.path())
        .unwrap()
        .generate_document("report", &variables, None, false)
        .unwrap();
    let engine = TemplateEngine::new(temp.path()).unwrap();
    let second = engine
        .generate_document("report", &variables, None, false)
        .unwrap();
    let third = engine
        .generate_document("report", &variables, None, false)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second, third);
    assert!(first.contains("We swing things.\nThen measure."));
}

#[test]
fn test_list_matches_files_on_disk() {
    let temp = temp_dir_in_workspace();
    let engine = TemplateEngine::new(temp.path()).unwrap();
    assert!(engine.list_templates().is_empty());

    for name in ["thesis", "abstract", "memo"] {
        write_template(temp.path(), name, "<< title >>", SIMPLE_CONFIG);
    }
    std::fs::write(temp.path().join("memo.tex"), "not a template").unwrap();

    assert_eq!(engine.list_templates(), vec!["abstract", "memo", "thesis"]);
    assert_eq!(engine.list_templates(), engine.list_templates());
}

#[test]
fn test_malformed_config_is_reported() {
    let temp = temp_dir_in_workspace();
    write_template(
        temp.path(),
        "bad",
        "<< title >>",
        "name: bad\ndescription: d\ndocument_type: poster\n",
    );
    let engine = TemplateEngine::new(temp.path()).unwrap();

    let err = engine.load_template("bad").unwrap_err();
    assert!(matches!(err, LatexlabError::ConfigMalformed { .. }));
    assert!(err.to_string().contains("poster"), "{}", err);
}
