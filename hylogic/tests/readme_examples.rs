use hylogic::prelude::*;

#[test]
fn readme_parsing_example() {
    let lang = Language::predicate();
    let parser = FormulaParser::new(&lang);

    let f = parser.parse_formula("∀x(Fx→x≠a)").unwrap();
    assert_eq!(f.to_string(), "∀x(Fx → x ≠ a)");
    assert!(parser.parse_expression("f(a, x)").unwrap().is_term());
}

#[test]
fn readme_matching_example() {
    let lang = Language::predicate();
    let parser = FormulaParser::new(&lang);
    let schema = parser.parse_formula("(α → (β → α))").unwrap();

    let mut session = MatchSession::new();
    let good = parser.parse_formula("(Fa → (P → Fa))").unwrap();
    session.match_formula(&schema, &good).unwrap();
    assert_eq!(session.instantiate_formula(&schema), good);

    session.clear();
    let bad = parser.parse_formula("(Fa → (P → Fb))").unwrap();
    let err = session.match_formula(&schema, &bad).unwrap_err();
    assert!(err.is_variable_conflict());
}

#[test]
fn readme_truth_table_example() {
    let lang = Language::sentential();
    let table = TruthTableSetup::new(&lang)
        .basic(["P", "Q"])
        .main(["(P → Q)"])
        .rows(4)
        .build()
        .unwrap();

    let main = table.main_columns()[0];
    assert_eq!(
        table.key().to_strings()[main].clone().unwrap(),
        ["T", "F", "T", "T"]
    );

    let user = UserTable::from_table(&table);
    assert!(validate_table(&table, &user, &ValidatorOptions::default()).is_ok());
}

#[test]
fn readme_config_example() {
    let config = EngineConfig::from_toml_str(
        r#"
        max_rows = 128
        max_attempts = 5
        skip_basic_columns = false

        [[languages]]
        name = "Tiny"
        letters = "PQR"
        negation = "-"
        conjunction = "&"
        "#,
    )
    .unwrap();
    assert_eq!(config.max_rows, 128);
    assert_eq!(config.max_attempts, 5);
    assert!(config.languages().unwrap().get("Tiny").is_ok());
}
