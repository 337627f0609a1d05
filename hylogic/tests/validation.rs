use hylogic::prelude::*;

fn conditional_table(lang: &Language) -> TruthTable {
    TruthTableSetup::new(lang)
        .basic(["P", "Q"])
        .main(["(P → Q)"])
        .build()
        .unwrap()
}

#[test]
fn copied_key_passes() {
    let lang = Language::sentential();
    let table = conditional_table(&lang);
    let user = UserTable::from_table(&table);
    assert_eq!(validate_table(&table, &user, &ValidatorOptions::default()), Ok(()));
}

#[test]
fn values_are_case_insensitive() {
    let lang = Language::sentential();
    let table = conditional_table(&lang);
    let mut user = UserTable::from_table(&table);
    for column in &mut user.values {
        for cell in column {
            *cell = cell.to_lowercase();
        }
    }
    assert!(validate_table(&table, &user, &ValidatorOptions::default()).is_ok());
}

#[test]
fn wrong_columns_are_reported_without_cells() {
    let lang = Language::sentential();
    let table = conditional_table(&lang);
    let mut user = UserTable::from_table(&table);
    user.values[4][1] = "T".to_string();
    user.values[0][3] = String::new();

    let err = validate_table(&table, &user, &ValidatorOptions::default()).unwrap_err();
    assert_eq!(err, ValidationError::ColumnValueMismatch { columns: vec![0, 4] });
}

#[test]
fn basic_columns_can_be_skipped() {
    let lang = Language::sentential();
    let table = conditional_table(&lang);
    let mut user = UserTable::from_table(&table);
    user.values[0] = vec![String::new(); 4];

    let options = ValidatorOptions {
        skip_basic_columns: true,
    };
    assert!(validate_table(&table, &user, &options).is_ok());
    assert!(
        validate_table(&table, &user, &ValidatorOptions::default())
            .unwrap_err()
            .is_column_value_mismatch()
    );
}

#[test]
fn highlighting_must_mark_main_columns_only() {
    let lang = Language::sentential();
    let table = conditional_table(&lang);
    let mut user = UserTable::from_table(&table);
    user.highlighted = vec![true, false, false, false, false, false];

    let err = validate_table(&table, &user, &ValidatorOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::HighlightPolicyViolation {
            missing: vec![4],
            unexpected: vec![0],
        }
    );
}

#[test]
fn values_are_checked_before_highlighting() {
    let lang = Language::sentential();
    let table = conditional_table(&lang);
    let mut user = UserTable::from_table(&table);
    user.values[3][0] = "F".to_string();
    user.highlighted.clear();
    assert!(
        validate_table(&table, &user, &ValidatorOptions::default())
            .unwrap_err()
            .is_column_value_mismatch()
    );
}

#[test]
fn shape_is_checked_first() {
    let lang = Language::sentential();
    let table = conditional_table(&lang);
    let mut user = UserTable::from_table(&table);
    user.values[2].pop();
    assert!(
        validate_table(&table, &user, &ValidatorOptions::default())
            .unwrap_err()
            .is_table_shape()
    );

    let empty = UserTable::default();
    assert_eq!(
        validate_table(&table, &empty, &ValidatorOptions::default()).unwrap_err(),
        ValidationError::TableShape {
            columns: 0,
            rows: 0,
            expected_columns: 6,
            expected_rows: 4,
        }
    );
}

#[test]
fn attempts_follow_the_configured_budget() {
    let lang = Language::sentential();
    let table = conditional_table(&lang);
    let config = EngineConfig::default();
    let mut attempts = Attempts::from_config(&config);

    let mut wrong = UserTable::from_table(&table);
    wrong.values[5][0] = "F".to_string();
    let options = ValidatorOptions::from(&config);

    let result = validate_table(&table, &wrong, &options);
    assert_eq!(attempts.record(&result), AttemptOutcome::Retry { remaining: 2 });
    let result = validate_table(&table, &UserTable::from_table(&table), &options);
    assert!(attempts.record(&result).is_passed());
    assert_eq!(attempts.remaining(), 1);
}

#[test]
fn diagnostics_do_not_leak_cells() {
    let lang = Language::sentential();
    let table = conditional_table(&lang);
    let mut user = UserTable::from_table(&table);
    user.values[4][1] = "T".to_string();
    let err = validate_table(&table, &user, &ValidatorOptions::default()).unwrap_err();
    let d = Diagnostic::from(&err);
    assert_eq!(d.message(), "column(s) 4 contain wrong values");
    assert!(!d.message().contains("row"));
}
