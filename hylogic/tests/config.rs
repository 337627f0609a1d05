use hylogic::prelude::*;

#[test]
fn defaults() {
    let config = EngineConfig::from_toml_str("").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.max_rows, 64);
    assert_eq!(config.max_attempts, 3);
    assert!(!config.skip_basic_columns);
}

#[test]
fn extra_language_is_registered() {
    let config = EngineConfig::from_toml_str(
        r#"
        max_rows = 16

        [[languages]]
        name = "Tiny"
        letters = "PQR"
        negation = "-"
        conjunction = "&"
        "#,
    )
    .unwrap();
    assert_eq!(config.max_rows, 16);

    let languages = config.languages().unwrap();
    let mut names: Vec<&str> = languages.names().collect();
    names.sort();
    assert_eq!(names, ["Predicate", "Sentential", "Tiny"]);

    let tiny = languages.get("Tiny").unwrap();
    let parser = FormulaParser::new(tiny);
    assert!(parser.is_sentence("(P & -Q)"));
    assert!(!parser.is_sentence("(P ∧ Q)"));
    assert!(!parser.is_sentence("S"));
}

#[test]
fn unknown_language() {
    let languages = Languages::builtin();
    assert!(languages.get("Modal").unwrap_err().is_unknown_language());
    assert_eq!(languages.get(Language::PREDICATE).unwrap(), &Language::predicate());
}

#[test]
fn overlapping_glyphs_are_rejected() {
    let err = EngineConfig::from_toml_str(
        r#"
        [[languages]]
        name = "Broken"
        letters = "PQ"
        negation = "P"
        "#,
    )
    .unwrap_err();
    assert!(err.is_overlapping_glyph(), "{err}");
}

#[test]
fn reserved_glyphs_are_rejected() {
    let err = EngineConfig::from_toml_str(
        r#"
        [[languages]]
        name = "Broken"
        conjunction = ","
        "#,
    )
    .unwrap_err();
    assert!(err.is_reserved_glyph(), "{err}");
}

#[test]
fn malformed_toml() {
    let err = EngineConfig::from_toml_str("max_rows = \"many\"").unwrap_err();
    assert!(err.is_toml());
    let d = Diagnostic::from(&err);
    assert_eq!(d.title, "Configuration error");
}

#[test]
fn toml_round_trip() {
    let config = EngineConfig {
        max_rows: 8,
        extra_languages: vec![Language {
            name: "Copy".to_string(),
            ..Language::predicate()
        }],
        ..EngineConfig::default()
    };
    let text = config.to_toml_string().unwrap();
    assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
}

#[test]
fn missing_file() {
    let err = EngineConfig::load(std::path::Path::new("/nonexistent/hylogic.toml")).unwrap_err();
    assert!(err.is_io());
}
