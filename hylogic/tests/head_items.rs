use hylogic::head::Alignment;
use hylogic::prelude::*;

fn texts(items: &[TableHeadItem]) -> Vec<String> {
    items.iter().map(TableHeadItem::text).collect()
}

fn sentential_ops() -> OperatorSet {
    Language::sentential().operator_set()
}

#[test]
fn balanced_input_never_fails() {
    let ops = sentential_ops();
    for text in ["P", "(P∧Q)", "((P → Q) ↔ ~(R ∨ S))", "[P ∧ {Q ∨ R}]", "~~P"] {
        assert!(
            head_items(text, &ops, &Language::sentential().brackets).is_ok(),
            "{text}"
        );
    }
}

#[test]
fn concatenation_reproduces_input_up_to_spacing() {
    let ops = sentential_ops();
    let brackets = Language::sentential().brackets;
    for text in ["(P∧Q)", "((P→Q)↔~(R∨S))", "~[P ↓ Q]"] {
        let joined: String = texts(&head_items(text, &ops, &brackets).unwrap()).concat();
        let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        assert_eq!(strip(&joined), strip(text));
    }
}

#[test]
fn binary_operators_are_padded() {
    let items = head_items("(P∧Q)", &sentential_ops(), &[Brackets::ROUND]).unwrap();
    assert_eq!(texts(&items), ["(P", " ∧ ", "Q)"]);
    assert!(items.iter().all(TableHeadItem::holds_values));
}

#[test]
fn unary_operator_after_brackets() {
    let items = head_items("(~P ∨ Q)", &sentential_ops(), &[Brackets::ROUND]).unwrap();
    assert_eq!(texts(&items), ["(~", "P", " ∨ ", "Q)"]);
}

#[test]
fn stray_close_bracket_is_reported() {
    let err = head_items("P)", &sentential_ops(), &[Brackets::ROUND]).unwrap_err();
    assert!(err.is_unexpected_close_bracket());
    let LayoutError::UnexpectedCloseBracket { position, .. } = err;
    assert_eq!(position, 1);
}

#[test]
fn predicate_items() {
    let lang = Language::predicate();
    let items = language_head_items(&lang, "∀x(Fx → Gx) ∧ ~a = b").unwrap();
    assert_eq!(texts(&items), ["∀x(Fx → Gx)", " ∧ ", "~", "a = b"]);
    let items = language_head_items(&lang, "(∃y < f(a))y ≠ a ∨ Rab").unwrap();
    assert_eq!(texts(&items), ["(∃y < f(a))y ≠ a", " ∨ ", "Rab"]);
}

#[test]
fn default_layout_is_centered() {
    let items = head_items("P", &sentential_ops(), &[Brackets::ROUND]).unwrap();
    assert_eq!(items[0].layout.alignment, Alignment::Center);
    assert_eq!(items[0].layout.min_width, 2);
    assert!(!items[0].blank_column);
    assert!(!items[0].divider_column);

    let divider = TableHeadItem::divider();
    assert!(divider.blank_column && divider.divider_column);
    assert!(!divider.holds_values());
}

#[test]
fn bracketed_term_stays_with_its_relation() {
    let lang = Language::predicate();
    let items = language_head_items(&lang, "(a + b) = c").unwrap();
    assert_eq!(texts(&items), ["(a + b) = c"]);
    let items = language_head_items(&lang, "((a + b) = c → P)").unwrap();
    assert_eq!(texts(&items), ["((a + b) = c", " → ", "P)"]);
    let items = language_head_items(&lang, "~(a + b) = c").unwrap();
    assert_eq!(texts(&items), ["~", "(a + b) = c"]);
}
