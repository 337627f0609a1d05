use hylogic::expr::{FormulaKind, Restriction, TermKind};
use hylogic::prelude::*;

fn predicate() -> Language {
    Language::predicate()
}

#[test]
fn sentential_connectives() {
    let lang = Language::sentential();
    let parser = FormulaParser::new(&lang);
    for (text, ty) in [
        ("(P → Q)", ExprType::Conditional),
        ("(P ∧ Q)", ExprType::Conjunction),
        ("(P ∨ Q)", ExprType::Disjunction),
        ("(P ↔ Q)", ExprType::Biconditional),
        ("(P ↑ Q)", ExprType::Nand),
        ("(P ↓ Q)", ExprType::Nor),
        ("~P", ExprType::Negation),
        ("P", ExprType::SentenceLetter),
    ] {
        let f = parser.parse_formula(text).unwrap();
        assert_eq!(f.type_(), ty, "{text}");
    }
}

#[test]
fn outer_brackets_are_optional() {
    let lang = Language::sentential();
    let parser = FormulaParser::new(&lang);
    let bare = parser.parse_formula("P → (Q ∧ R)").unwrap();
    let bracketed = parser.parse_formula("[P → {Q ∧ R}]").unwrap();
    assert_eq!(bare, bracketed);
    // only the outermost formula may drop them
    assert!(parser.parse_formula("P → Q ∧ R").is_err());
    assert!(parser.parse_formula("~P → Q").is_ok());
}

#[test]
fn mismatched_brackets_are_rejected() {
    let lang = Language::sentential();
    let parser = FormulaParser::new(&lang);
    assert!(parser.parse_formula("(P → Q]").is_err());
    assert!(parser.parse_formula("(P → Q").is_err());
}

#[test]
fn unknown_glyph_is_a_lexing_error() {
    let lang = Language::sentential();
    let err = FormulaParser::new(&lang).parse_formula("P ⊕ Q").unwrap_err();
    assert_eq!(err.text, "P ⊕ Q");
    assert!(err.messages.iter().all(|m| m.starts_with("lexing error:")));
}

#[test]
fn indexed_symbols() {
    let lang = predicate();
    let parser = FormulaParser::new(&lang);
    let f = parser.parse_formula("P₁ ∧ Fx2a'").unwrap();
    let FormulaKind::Binary { left, right, .. } = f.kind() else {
        panic!("expected a conjunction, got {f:?}");
    };
    assert!(matches!(left.kind(), FormulaKind::Letter(s) if s.text() == "P₁"));
    let FormulaKind::Relation { args, .. } = right.kind() else {
        panic!("expected a relation");
    };
    assert_eq!(args.len(), 2);
    assert!(args[0].is_variable());
}

#[test]
fn relations_and_terms() {
    let lang = predicate();
    let parser = FormulaParser::new(&lang);

    let f = parser.parse_formula("Rf(a, x)(b + c)").unwrap();
    let FormulaKind::Relation { relation, args } = f.kind() else {
        panic!("expected a relation");
    };
    assert_eq!(relation.text(), "R");
    assert_eq!(args[0].type_(), ExprType::Function);
    assert_eq!(args[1].type_(), ExprType::InfixFunction);

    assert_eq!(parser.parse_formula("a = b").unwrap().type_(), ExprType::InfixRelation);
    assert_eq!(parser.parse_term("f(g(a), x)").unwrap().type_(), ExprType::Function);
}

#[test]
fn negated_infix_is_a_negation() {
    let lang = predicate();
    let parser = FormulaParser::new(&lang);
    let written = parser.parse_formula("a ≠ b").unwrap();
    let spelled = parser.parse_formula("~a = b").unwrap();
    assert_eq!(written.type_(), ExprType::Negation);
    assert_eq!(written, spelled);
    assert_eq!(written.to_string(), "a ≠ b");
    assert_eq!(spelled.to_string(), "~a = b");
}

#[test]
fn quantifier_forms() {
    let lang = predicate();
    let parser = FormulaParser::new(&lang);

    let plain = parser.parse_formula("∀xFx").unwrap();
    assert_eq!(plain.type_(), ExprType::Universal);

    let bounded = parser.parse_formula("(∃x < a)Fx").unwrap();
    assert_eq!(bounded.type_(), ExprType::BoundedExistential);

    let restricted = parser.parse_formula("(∀x: Gx)Fx").unwrap();
    assert_eq!(restricted.type_(), ExprType::RestrictedUniversal);
    let FormulaKind::Quantified { op, .. } = restricted.kind() else {
        panic!("expected a quantified formula");
    };
    assert!(matches!(&op.restriction, Restriction::Restricted { formula, .. } if formula.to_string() == "Gx"));

    // only variables can be bound
    assert!(parser.parse_formula("∀aFa").is_err());
}

#[test]
fn metavariables() {
    let lang = predicate();
    let parser = FormulaParser::new(&lang);

    assert_eq!(parser.parse_formula("α").unwrap().type_(), ExprType::MFormula);
    assert_eq!(parser.parse_formula("α(a, τ)").unwrap().type_(), ExprType::MComplexFormula);
    assert_eq!(parser.parse_formula("Γ").unwrap().type_(), ExprType::AnyExpression);
    assert_eq!(parser.parse_term("τ").unwrap().type_(), ExprType::MTerm);
    assert_eq!(parser.parse_term("τ(a)").unwrap().type_(), ExprType::MComplexTerm);
    assert_eq!(parser.parse_term("ν").unwrap().type_(), ExprType::PMTerm);
    assert!(parser.parse_formula("∀ν(α → β)").unwrap().has_metavariables());
}

#[test]
fn substitution_transforms() {
    let lang = predicate();
    let parser = FormulaParser::new(&lang);

    let inline = parser.parse_formula("Fx[a/x]").unwrap();
    let stacked = parser.parse_formula("Fx^x_a").unwrap();
    let t = inline.transform().unwrap();
    assert_eq!(t.variable.to_string(), "x");
    assert_eq!(t.term.to_string(), "a");
    assert!(!*t.combines);
    assert!(*stacked.transform().unwrap().combines);
    // the notation is presentation only
    assert_eq!(inline, stacked);

    let term = parser.parse_term("f(x)[b/x]").unwrap();
    assert!(matches!(term.kind(), TermKind::Function { .. }));
    assert!(term.transform().is_some());
}

#[test]
fn expression_classification() {
    let lang = predicate();
    let parser = FormulaParser::new(&lang);
    assert!(parser.parse_expression("Fa").unwrap().is_formula());
    assert!(parser.parse_expression("(a × b)").unwrap().is_term());
    assert!(parser.is_sentence("∃x(Fx ∧ x = a)"));
    assert!(!parser.is_sentence("f(a)"));
    assert!(parser.parse_expression("(Fa").is_err());
}

#[test]
fn rendering_parses_back() {
    let lang = predicate();
    let parser = FormulaParser::new(&lang);
    for text in [
        "(P ∧ Q) → ~R",
        "∀x((∃y: Ry)Rxy → ~(x = f(a) ∧ Gx[b/x]))",
        "(∀x ≤ (a + b))(Fx ↔ x ≮ c)",
        "α(τ) ∨ ~Γ",
        "(Fx → Gx)^x_a",
    ] {
        let f = parser.parse_formula(text).unwrap();
        let again = parser.parse_formula(&f.to_string()).unwrap();
        assert_eq!(f, again, "{text} rendered as {f}");
    }
}
