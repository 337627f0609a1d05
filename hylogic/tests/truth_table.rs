use hylogic::error::OperandRole;
use hylogic::prelude::*;
use hylogic::truth::{Interpretation, interpretations};

fn column(table: &TruthTable, c: usize) -> Vec<&'static str> {
    table.key().to_strings()[c].clone().unwrap()
}

fn sentential() -> Language {
    Language::sentential()
}

#[test]
fn interpretations_count_down_from_all_true() {
    let rows: Vec<Interpretation> = interpretations(2).collect();
    assert_eq!(rows.len(), 4);
    let as_text: Vec<String> = rows
        .iter()
        .map(|r| r.values().iter().map(|v| v.as_str()).collect())
        .collect();
    assert_eq!(as_text, ["TT", "TF", "FT", "FF"]);
    assert_eq!(Interpretation::for_row(3, 5).values().len(), 3);
}

#[test]
fn conditional_table_layout() {
    let lang = sentential();
    let table = TruthTableSetup::new(&lang)
        .basic(["P", "Q"])
        .main(["(P → Q)"])
        .rows(4)
        .build()
        .unwrap();

    let head: Vec<String> = table.head().iter().map(TableHeadItem::text).collect();
    assert_eq!(head, ["P", "Q", "", "(P", " → ", "Q)"]);
    assert_eq!(table.basic_columns(), [true, true, false, false, false, false]);
    assert_eq!(table.highlight(), [false, false, false, false, true, false]);
    assert_eq!(table.main_columns(), [4]);

    assert_eq!(column(&table, 0), ["T", "T", "F", "F"]);
    assert_eq!(column(&table, 1), ["T", "F", "T", "F"]);
    assert!(table.key().column(2).is_none());
    assert_eq!(column(&table, 3), ["T", "T", "F", "F"]);
    assert_eq!(column(&table, 4), ["T", "F", "T", "T"]);
    assert_eq!(column(&table, 5), ["T", "F", "T", "F"]);
}

#[test]
fn every_connective() {
    let lang = sentential();
    let cases = [
        ("(P → Q)", ["T", "F", "T", "T"]),
        ("(P ∧ Q)", ["T", "F", "F", "F"]),
        ("(P ∨ Q)", ["T", "T", "T", "F"]),
        ("(P ↔ Q)", ["T", "F", "F", "T"]),
        ("(P ↑ Q)", ["F", "T", "T", "T"]),
        ("(P ↓ Q)", ["F", "F", "F", "T"]),
    ];
    for (text, expected) in cases {
        let table = TruthTableSetup::new(&lang)
            .basic(["P", "Q"])
            .main([text])
            .build()
            .unwrap();
        assert_eq!(column(&table, table.main_columns()[0]), expected, "{text}");
    }
}

#[test]
fn negation_column_sits_before_its_operand() {
    let lang = sentential();
    let table = TruthTableSetup::new(&lang)
        .basic(["P", "Q", "R"])
        .main(["(~P → (Q ∧ R))"])
        .build()
        .unwrap();
    let head: Vec<String> = table.head().iter().map(TableHeadItem::text).collect();
    assert_eq!(head[4..], ["(~", "P", " → ", "(Q", " ∧ ", "R))"]);
    assert_eq!(column(&table, 4), ["F", "F", "F", "F", "T", "T", "T", "T"]);
    assert_eq!(column(&table, 6), ["T", "T", "T", "T", "T", "F", "F", "F"]);
    assert_eq!(table.main_columns(), [6]);
}

#[test]
fn several_main_formulas_are_separated() {
    let lang = sentential();
    let table = TruthTableSetup::new(&lang)
        .basic(["P"])
        .main(["~P", "(P ∨ ~P)"])
        .build()
        .unwrap();
    let dividers: Vec<usize> = table
        .head()
        .iter()
        .enumerate()
        .filter(|(_, h)| h.divider_column)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(dividers, [1, 4]);
    assert_eq!(table.main_columns(), [2, 6]);
    assert_eq!(column(&table, 6), ["T", "T"]);
}

#[test]
fn predicate_atomics_are_basic() {
    let lang = Language::predicate();
    let table = TruthTableSetup::new(&lang)
        .basic(["a = b", "∀xFx"])
        .main(["(a ≠ b ∨ ∀xFx)"])
        .build()
        .unwrap();
    let head: Vec<String> = table.head().iter().map(TableHeadItem::text).collect();
    assert_eq!(head[3..], ["(a ≠ b", " ∨ ", "∀xFx)"]);
    assert_eq!(column(&table, 3), ["F", "F", "T", "T"]);
    assert_eq!(column(&table, 4), ["T", "F", "T", "T"]);
}

#[test]
fn identity_over_bracketed_term() {
    let lang = Language::predicate();
    let table = TruthTableSetup::new(&lang)
        .basic(["(a + b) = c"])
        .main(["(a + b) = c"])
        .build()
        .unwrap();
    assert_eq!(table.main_columns(), [2]);
    assert_eq!(column(&table, 2), ["T", "F"]);

    let table = TruthTableSetup::new(&lang)
        .basic(["(a + b) = c", "P"])
        .main(["((a + b) = c → P)"])
        .build()
        .unwrap();
    let head: Vec<String> = table.head().iter().map(TableHeadItem::text).collect();
    assert_eq!(head[3..], ["((a + b) = c", " → ", "P)"]);
    assert_eq!(column(&table, 3), ["T", "T", "F", "F"]);
    assert_eq!(column(&table, 4), ["T", "F", "T", "T"]);

    let table = TruthTableSetup::new(&lang)
        .basic(["(a + b) = c"])
        .main(["~(a + b) = c"])
        .build()
        .unwrap();
    let head: Vec<String> = table.head().iter().map(TableHeadItem::text).collect();
    assert_eq!(head[2..], ["~", "(a + b) = c"]);
    assert_eq!(column(&table, 2), ["F", "T"]);
}

#[test]
fn quantifier_scope_is_one_column() {
    let lang = Language::predicate();
    let table = TruthTableSetup::new(&lang)
        .basic(["Ga", "∀x~Fx"])
        .main(["∀x~Fx → ~Ga"])
        .build()
        .unwrap();
    let head: Vec<String> = table.head().iter().map(TableHeadItem::text).collect();
    assert_eq!(head[3..], ["∀x~Fx", " → ", "~", "Ga"]);
}

#[test]
fn setup_errors_in_order() {
    let lang = sentential();
    let setup = || TruthTableSetup::new(&lang);

    assert_eq!(setup().main(["P"]).build().unwrap_err(), SetupError::NoBasicFormula);
    assert_eq!(
        setup().basic(["P", " "]).build().unwrap_err(),
        SetupError::EmptyBasicFormula { position: 2 }
    );
    assert!(matches!(
        setup().basic(["P", "(Q"]).build().unwrap_err(),
        SetupError::MalformedOperand { role: OperandRole::Basic, position: 2, .. }
    ));
    let err = setup().basic(["Q", "P"]).build().unwrap_err();
    assert!(err.is_setup_order_violation());
    assert!(setup().basic(["P", "P"]).build().unwrap_err().is_setup_order_violation());
    assert_eq!(
        setup().basic(["P", "Q"]).rows(3).build().unwrap_err(),
        SetupError::RowCountMismatch {
            declared: 3,
            expected: 4,
            basic_count: 2
        }
    );
    assert!(setup().basic(["P"]).rows(0).build().unwrap_err().is_row_count_mismatch());
    assert!(matches!(
        setup().basic(["P"]).main(["(P →"]).build().unwrap_err(),
        SetupError::MalformedOperand { role: OperandRole::Main, position: 1, .. }
    ));
}

#[test]
fn row_limit() {
    let lang = sentential();
    let letters = ["A", "B", "C", "D", "E", "F", "G"];
    let err = TruthTableSetup::new(&lang).basic(letters).build().unwrap_err();
    assert_eq!(err, SetupError::RowLimitExceeded { rows: 128, limit: 64 });

    let config = EngineConfig {
        max_rows: 128,
        ..EngineConfig::default()
    };
    let table = TruthTableSetup::new(&lang)
        .with_config(&config)
        .basic(letters)
        .build()
        .unwrap();
    assert_eq!(table.rows(), 128);
}

#[test]
fn undeclared_basic_formula_names_its_column() {
    let lang = sentential();
    let err = TruthTableSetup::new(&lang)
        .basic(["P"])
        .main(["(P ∧ Q)"])
        .build()
        .unwrap_err();
    match err {
        SetupError::UndeclaredBasicDependency {
            formula,
            subformula,
            column,
        } => {
            assert_eq!(formula.text, "(P ∧ Q)");
            assert_eq!(subformula.text, "Q");
            assert_eq!(column, 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn terms_are_not_sentences() {
    let lang = Language::predicate();
    let err = TruthTableSetup::new(&lang).basic(["f(a)"]).build().unwrap_err();
    assert!(matches!(
        err,
        SetupError::MalformedOperand { ref reason, .. } if reason == "it is a term"
    ));
}

#[test]
fn printed_table() {
    let lang = sentential();
    let table = TruthTableSetup::new(&lang)
        .basic(["P"])
        .main(["~P"])
        .build()
        .unwrap();
    assert_eq!(table.to_string(), "P |~ P \nT |F T \nF |T F \n");
}
